//! Column descriptors.

use std::cmp::Ordering;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::panic_message;
use crate::value::Value;

/// Reads a cell value out of a record.
pub type Accessor<T> = Arc<dyn Fn(&T) -> Value + Send + Sync>;

/// Orders two cell values of the same column (ascending).
pub type Comparator = Arc<dyn Fn(&Value, &Value) -> Ordering + Send + Sync>;

/// How a column can be filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterVariant {
    /// Case-insensitive substring match on the string form.
    Text,
    /// Membership in a set of selected values.
    MultiSelect,
}

/// Column configuration.
///
/// Columns are configured once per grid. Only their visibility changes
/// afterwards, and that lives in the pipeline's visibility state.
///
/// # Examples
///
/// ```
/// use queuedeck_grid::{Column, Value};
///
/// struct Msg { queue: String, deliveries: i64 }
///
/// let columns: Vec<Column<Msg>> = vec![
///     Column::new("queue", "Queue", |m: &Msg| Value::from(&m.queue))
///         .multi_select()
///         .searchable(),
///     Column::new("deliveries", "Deliveries", |m: &Msg| Value::from(m.deliveries))
///         .sortable(),
/// ];
/// assert!(columns[1].sortable);
/// ```
pub struct Column<T> {
    /// Unique identifier for this column.
    pub id: String,
    /// Header text.
    pub header: String,
    /// Filter variant, if the column can be filtered.
    pub filter_variant: Option<FilterVariant>,
    /// Whether the column takes part in sorting.
    pub sortable: bool,
    /// Whether the global search looks at this column.
    pub searchable: bool,
    /// Initial visibility.
    pub visible: bool,
    accessor: Accessor<T>,
    comparator: Option<Comparator>,
}

impl<T> Column<T> {
    /// Create a new column with the given id, header and accessor.
    pub fn new(
        id: impl Into<String>,
        header: impl Into<String>,
        accessor: impl Fn(&T) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            filter_variant: None,
            sortable: false,
            searchable: false,
            visible: true,
            accessor: Arc::new(accessor),
            comparator: None,
        }
    }

    /// Enable substring filtering.
    pub fn text_filter(mut self) -> Self {
        self.filter_variant = Some(FilterVariant::Text);
        self
    }

    /// Enable set-membership filtering (and facets).
    pub fn multi_select(mut self) -> Self {
        self.filter_variant = Some(FilterVariant::MultiSelect);
        self
    }

    /// Make the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Include the column in the global search.
    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    /// Hide the column initially.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Use a custom ascending comparator instead of [`Value::compare`].
    ///
    /// Setting a comparator also makes the column sortable.
    pub fn comparator(
        mut self,
        comparator: impl Fn(&Value, &Value) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        self.comparator = Some(Arc::new(comparator));
        self.sortable = true;
        self
    }

    /// Whether the column can be filtered.
    pub fn is_filterable(&self) -> bool {
        self.filter_variant.is_some()
    }

    /// Read the cell value for a record.
    pub fn value(&self, record: &T) -> Value {
        (self.accessor)(record)
    }

    /// Read one cell value, catching a panicking accessor.
    pub fn try_value(&self, record: &T) -> Result<Value, String> {
        panic::catch_unwind(AssertUnwindSafe(|| (self.accessor)(record)))
            .map_err(|payload| panic_message(&payload))
    }

    /// Read the cell values for many records, catching a panicking accessor.
    ///
    /// Returns the panic message on failure.
    pub(crate) fn try_values<'a, I>(&self, records: I) -> Result<Vec<Value>, String>
    where
        I: Iterator<Item = &'a T>,
        T: 'a,
    {
        let accessor = &self.accessor;
        panic::catch_unwind(AssertUnwindSafe(|| records.map(|r| accessor(r)).collect()))
            .map_err(|payload| panic_message(&payload))
    }

    /// Ascending comparison for two cell values of this column.
    pub(crate) fn compare(&self, a: &Value, b: &Value) -> Ordering {
        match &self.comparator {
            Some(cmp) => cmp(a, b),
            None => a.compare(b),
        }
    }

    pub(crate) fn has_comparator(&self) -> bool {
        self.comparator.is_some()
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            filter_variant: self.filter_variant,
            sortable: self.sortable,
            searchable: self.searchable,
            visible: self.visible,
            accessor: Arc::clone(&self.accessor),
            comparator: self.comparator.clone(),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("filter_variant", &self.filter_variant)
            .field("sortable", &self.sortable)
            .field("searchable", &self.searchable)
            .field("visible", &self.visible)
            .field("comparator", &self.comparator.is_some())
            .finish()
    }
}

/// Look up a column by id.
pub(crate) fn find_column<'a, T>(columns: &'a [Column<T>], id: &str) -> Option<&'a Column<T>> {
    columns.iter().find(|c| c.id == id)
}
