//! Error and warning types for the grid engine.
//!
//! Only table construction can fail. Everything that goes wrong while
//! recomputing a view degrades to a [`GridWarning`] that travels with the
//! snapshot, so the rendering side can show what is still computable.

use std::any::Any;

use crate::row::RowId;

/// Fatal configuration errors raised while building a grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Two column descriptors share the same id.
    #[error("Duplicate column id: {0}")]
    DuplicateColumn(String),

    /// The configured identity column is not one of the descriptors.
    #[error("Unknown identity column: {0}")]
    UnknownIdentityColumn(String),

    /// A grid needs at least one column.
    #[error("Grid has no columns")]
    NoColumns,
}

/// Non-fatal problems surfaced alongside a recomputed snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
pub enum GridWarning {
    /// Filter value kind does not match the column's filter variant.
    #[error("Filter on column '{column}' expects {expected}, got {actual}; ignored")]
    FilterTypeMismatch {
        /// Column the filter was set on.
        column: String,
        /// Kind the column's filter variant accepts.
        expected: &'static str,
        /// Kind that was supplied.
        actual: &'static str,
    },

    /// A filter was set on a column without a filter variant.
    #[error("Column '{0}' is not filterable; filter ignored")]
    ColumnNotFilterable(String),

    /// A column accessor panicked while reading row values.
    #[error("Accessor for column '{column}' panicked: {message}")]
    AccessorPanicked {
        /// Column whose accessor failed.
        column: String,
        /// Panic payload message.
        message: String,
    },

    /// A custom comparator panicked while sorting.
    #[error("Comparator for column '{column}' panicked: {message}")]
    ComparatorPanicked {
        /// Column whose comparator failed.
        column: String,
        /// Panic payload message.
        message: String,
    },

    /// Two records resolved to the same row id.
    #[error("Duplicate row id {id}; row {index} falls back to its index")]
    DuplicateRowId {
        /// The id that collided.
        id: RowId,
        /// Original index of the row that lost the id.
        index: usize,
    },

    /// A measured item size was negative or not finite.
    #[error("Ignored invalid measured size for row {index}")]
    InvalidMeasurement {
        /// Window index the measurement was reported for.
        index: usize,
    },

    /// A page size of zero was requested.
    #[error("Page size must be at least 1; using 1")]
    InvalidPageSize,
}

/// Extract a human-readable message from a panic payload.
///
/// Panics can carry either `&str` or `String` payloads. Anything else maps to
/// a generic message.
pub fn panic_message(panic: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Collects warnings for a single recomputation, dropping duplicates.
#[derive(Debug, Default, Clone)]
pub(crate) struct WarningSink {
    warnings: Vec<GridWarning>,
}

impl WarningSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record a warning. Repeats within one recomputation are ignored.
    pub(crate) fn push(&mut self, warning: GridWarning) {
        if !self.warnings.contains(&warning) {
            log::warn!("{}", warning);
            self.warnings.push(warning);
        }
    }

    pub(crate) fn extend(&mut self, warnings: impl IntoIterator<Item = GridWarning>) {
        for warning in warnings {
            self.push(warning);
        }
    }

    pub(crate) fn into_vec(self) -> Vec<GridWarning> {
        self.warnings
    }
}
