//! Grid config loading.

use std::fs;
use std::path::Path;

use log::{debug, info};
use queuedeck_grid::GridConfig;

use crate::error::CliError;

/// Load the grid config.
///
/// An explicit path must exist. Without one, `default` is used when present,
/// otherwise the built-in defaults.
pub fn load(explicit: Option<&Path>, default: Option<&Path>) -> Result<GridConfig, CliError> {
    if let Some(path) = explicit {
        return read(path);
    }
    match default {
        Some(path) if path.exists() => read(path),
        _ => {
            debug!("No grid config found, using defaults");
            Ok(GridConfig::default())
        }
    }
}

fn read(path: &Path) -> Result<GridConfig, CliError> {
    let content = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse(&content).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded grid config from {}", path.display());
    Ok(config)
}

fn parse(content: &str) -> Result<GridConfig, toml::de::Error> {
    toml::from_str(content)
}
