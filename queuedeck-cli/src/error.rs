//! CLI error type.

use std::path::PathBuf;

use queuedeck_grid::GridError;

/// Anything that stops a command from running.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse records in {}: {source}", path.display())]
    Records {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to set up logging: {0}")]
    Logging(String),

    #[error("Invalid {flag} argument '{value}': {reason}")]
    Argument {
        flag: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error(transparent)]
    Grid(#[from] GridError),
}
