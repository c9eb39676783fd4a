//! Grid configuration.

use serde::{Deserialize, Serialize};

use crate::selection::SelectionMode;

/// How the sorted rows reach the rendering side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Only the rows in the scroll window are handed out.
    #[default]
    Virtualized,
    /// Rows are handed out one page at a time.
    Paginated,
}

/// Per-grid configuration.
///
/// Every field has a default, so a config file only lists what it changes.
///
/// ```
/// use queuedeck_grid::{GridConfig, ViewMode};
///
/// let config = GridConfig::new().paginated(50).identity_column("messageId");
/// assert_eq!(config.mode, ViewMode::Paginated);
/// assert_eq!(config.page_size, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Virtualized or paginated output.
    pub mode: ViewMode,
    /// Size assumed for rows that have not been measured yet.
    pub estimated_item_size: f64,
    /// Extra rows rendered on each side of the viewport.
    pub overscan: usize,
    /// Rows per page in paginated mode.
    pub page_size: usize,
    /// Column whose value identifies a row. Falls back to the row index.
    pub identity_column: Option<String>,
    /// Overrides which columns the global search looks at.
    pub search_columns: Option<Vec<String>>,
    /// Selection behaviour.
    pub selection: SelectionMode,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            mode: ViewMode::Virtualized,
            estimated_item_size: 48.0,
            overscan: 5,
            page_size: 20,
            identity_column: None,
            search_columns: None,
            selection: SelectionMode::Multi,
        }
    }
}

impl GridConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use virtualized output with the given row estimate and overscan.
    pub fn virtualized(mut self, estimated_item_size: f64, overscan: usize) -> Self {
        self.mode = ViewMode::Virtualized;
        self.estimated_item_size = estimated_item_size;
        self.overscan = overscan;
        self
    }

    /// Use paginated output with the given page size.
    pub fn paginated(mut self, page_size: usize) -> Self {
        self.mode = ViewMode::Paginated;
        self.page_size = page_size;
        self
    }

    /// Identify rows by a column's value.
    pub fn identity_column(mut self, column: impl Into<String>) -> Self {
        self.identity_column = Some(column.into());
        self
    }

    /// Restrict the global search to these columns.
    pub fn search_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the selection mode.
    pub fn selection(mut self, mode: SelectionMode) -> Self {
        self.selection = mode;
        self
    }
}
