//! Where the CLI reads its config and writes its log.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Log written by the current run; earlier runs are archived beside it.
const LATEST_LOG: &str = "latest.log";

/// Archived run logs kept after rotation.
const KEPT_RUN_LOGS: usize = 10;

/// Locations for one CLI run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Default grid config, used when `--config` is not given.
    pub grid_config: PathBuf,
    /// Directory holding `latest.log` and the archived run logs.
    pub log_dir: PathBuf,
}

impl Paths {
    /// Platform locations: XDG config and cache dirs on Linux, the usual
    /// application directories on macOS and Windows.
    pub fn platform() -> Option<Self> {
        let dirs = ProjectDirs::from("dev", "queuedeck", "queuedeck")?;
        Some(Self::under(dirs.config_dir(), dirs.cache_dir()))
    }

    pub fn under(config_dir: &Path, cache_dir: &Path) -> Self {
        Self {
            grid_config: config_dir.join("grid.toml"),
            log_dir: cache_dir.to_path_buf(),
        }
    }

    /// Archive the previous run's log and return the path for this run's.
    ///
    /// The archive is named after the previous log's modification time, so
    /// archived names sort oldest first and only the newest
    /// [`KEPT_RUN_LOGS`] are kept.
    pub fn start_run_log(&self) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.log_dir)?;
        let latest = self.log_dir.join(LATEST_LOG);

        if let Ok(modified) = fs::metadata(&latest).and_then(|m| m.modified()) {
            let stamp = chrono::DateTime::<chrono::Local>::from(modified).format("%Y%m%d_%H%M%S%.3f");
            fs::rename(&latest, self.log_dir.join(format!("run-{}.log", stamp)))?;
        }

        let mut archived: Vec<PathBuf> = fs::read_dir(&self.log_dir)?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| is_run_log(p))
            .collect();
        archived.sort();
        let excess = archived.len().saturating_sub(KEPT_RUN_LOGS);
        for old in &archived[..excess] {
            if let Err(e) = fs::remove_file(old) {
                eprintln!("Warning: could not remove {}: {}", old.display(), e);
            }
        }

        Ok(latest)
    }
}

fn is_run_log(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("run-") && n.ends_with(".log"))
}
