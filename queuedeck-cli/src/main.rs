mod config;
mod error;
mod paths;
mod query;
mod render;
mod replay;

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use queuedeck_grid::{
    GridConfig, GridPipeline, GridRecord, QueueMessage, ServiceEntry, TrackingEntry, ViewMode,
};
use serde::de::DeserializeOwned;
use simplelog::{Config, LevelFilter, WriteLogger};
use tokio::time::Duration;

use crate::error::CliError;
use crate::paths::Paths;

#[derive(Parser)]
#[command(name = "queuedeck")]
#[command(about = "Filter, sort and page through queuedeck record dumps")]
struct Cli {
    /// Grid config file (TOML). Defaults to <config dir>/grid.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write the log here instead of the cache directory.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Log at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one page of filtered and sorted records
    Page {
        #[command(flatten)]
        input: Input,

        /// Column filter as column=value; multi-select values are comma separated
        #[arg(long = "filter", value_name = "COLUMN=VALUE")]
        filters: Vec<String>,

        /// Global search text
        #[arg(long)]
        search: Option<String>,

        /// Sort key as column[:asc|:desc]; repeat for secondary keys
        #[arg(long = "sort", value_name = "COLUMN[:DIR]")]
        sorts: Vec<String>,

        /// Zero-based page index
        #[arg(long, default_value = "0")]
        page: usize,

        /// Rows per page (overrides the config)
        #[arg(long)]
        page_size: Option<usize>,

        /// Print facet counts for filterable columns
        #[arg(long)]
        facets: bool,
    },
    /// Replay scroll offsets through the virtualized window
    Scroll {
        #[command(flatten)]
        input: Input,

        /// Viewport size
        #[arg(long, default_value = "400")]
        container: f64,

        /// Comma-separated scroll offsets, replayed in order
        #[arg(long)]
        offsets: String,

        /// Frame interval in milliseconds
        #[arg(long, default_value = "16")]
        frame_ms: u64,
    },
}

#[derive(Args)]
struct Input {
    /// JSON file holding an array of records
    file: PathBuf,

    /// Record type stored in the file
    #[arg(long, value_enum)]
    kind: Kind,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Messages,
    Tracking,
    Services,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let paths = Paths::platform();

    if let Err(e) = init_logging(cli.log_file.as_deref(), paths.as_ref(), cli.verbose) {
        eprintln!("Warning: {}", e);
    }

    let default_config = paths.map(|p| p.grid_config);
    if let Err(e) = run(cli, default_config.as_deref()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(explicit: Option<&Path>, paths: Option<&Paths>, verbose: bool) -> Result<(), CliError> {
    let path = match (explicit, paths) {
        (Some(path), _) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| CliError::Logging(e.to_string()))?;
            }
            path.to_path_buf()
        }
        (None, Some(paths)) => paths
            .start_run_log()
            .map_err(|e| CliError::Logging(e.to_string()))?,
        (None, None) => return Err(CliError::Logging("no cache directory".to_string())),
    };
    let file = File::create(&path).map_err(|e| CliError::Logging(e.to_string()))?;
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    WriteLogger::init(level, Config::default(), file)
        .map_err(|e| CliError::Logging(e.to_string()))
}

async fn run(cli: Cli, default_config: Option<&Path>) -> Result<(), CliError> {
    let config = config::load(cli.config.as_deref(), default_config)?;

    match cli.command {
        Commands::Page {
            input,
            filters,
            search,
            sorts,
            page,
            page_size,
            facets,
        } => {
            let request = PageRequest {
                filters,
                search,
                sorts,
                page,
                page_size,
                facets,
            };
            match input.kind {
                Kind::Messages => print_page::<QueueMessage>(&input.file, config, &request),
                Kind::Tracking => print_page::<TrackingEntry>(&input.file, config, &request),
                Kind::Services => print_page::<ServiceEntry>(&input.file, config, &request),
            }
        }
        Commands::Scroll {
            input,
            container,
            offsets,
            frame_ms,
        } => {
            let offsets = query::offsets(&offsets)?;
            let frame = Duration::from_millis(frame_ms.max(1));
            match input.kind {
                Kind::Messages => {
                    print_scroll::<QueueMessage>(&input.file, config, container, offsets, frame).await
                }
                Kind::Tracking => {
                    print_scroll::<TrackingEntry>(&input.file, config, container, offsets, frame).await
                }
                Kind::Services => {
                    print_scroll::<ServiceEntry>(&input.file, config, container, offsets, frame).await
                }
            }
        }
    }
}

struct PageRequest {
    filters: Vec<String>,
    search: Option<String>,
    sorts: Vec<String>,
    page: usize,
    page_size: Option<usize>,
    facets: bool,
}

fn load_records<R: DeserializeOwned>(path: &Path) -> Result<Vec<R>, CliError> {
    let content = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<R> = serde_json::from_str(&content).map_err(|source| CliError::Records {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

fn print_page<R>(path: &Path, mut config: GridConfig, request: &PageRequest) -> Result<(), CliError>
where
    R: GridRecord + DeserializeOwned,
{
    config.mode = ViewMode::Paginated;
    if let Some(size) = request.page_size {
        config.page_size = size;
    }

    let records = load_records::<R>(path)?;
    let mut grid = R::grid(records, config)?;
    let filters = query::filter_state(grid.columns(), &request.filters, request.search.as_deref())?;
    grid.set_filter_state(filters);
    grid.set_sort_state(query::sort_state(&request.sorts)?);
    grid.set_page_index(request.page);

    let snapshot = grid.snapshot();
    render::warnings(&snapshot.warnings);

    if let (Some(page), Some(info)) = (snapshot.page(), snapshot.page_info()) {
        let columns: Vec<_> = grid.visible_columns().collect();
        print!("{}", render::table(&columns, &page.rows, &snapshot.warnings));
        println!("{}", render::page_footer(&info));
    }
    if request.facets {
        println!();
        print!("{}", render::facets(&grid));
    }
    Ok(())
}

async fn print_scroll<R>(
    path: &Path,
    mut config: GridConfig,
    container: f64,
    offsets: Vec<f64>,
    frame: Duration,
) -> Result<(), CliError>
where
    R: GridRecord + DeserializeOwned,
{
    config.mode = ViewMode::Virtualized;
    let records = load_records::<R>(path)?;
    let mut grid: GridPipeline<R> = R::grid(records, config)?;
    render::warnings(&grid.snapshot().warnings);

    let reports = replay::replay(&mut grid, container, offsets, frame).await;
    for report in &reports {
        println!("{}", render::frame(report));
        let ids: Vec<String> = report.ids.iter().map(ToString::to_string).collect();
        println!("  {}", ids.join(" "));
    }
    Ok(())
}
