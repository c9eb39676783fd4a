//! Per-recomputation cache of accessor results.
//!
//! Filter, sort and facet stages all read the same columns. Each column's
//! accessor runs at most once per recomputation, over every row.

use std::collections::HashMap;

use crate::column::Column;
use crate::error::{GridWarning, WarningSink};
use crate::row::Row;
use crate::value::Value;

pub(crate) struct CellCache<'a, T> {
    rows: &'a [Row<T>],
    columns: HashMap<String, Option<Vec<Value>>>,
}

impl<'a, T> CellCache<'a, T> {
    pub(crate) fn new(rows: &'a [Row<T>]) -> Self {
        Self {
            rows,
            columns: HashMap::new(),
        }
    }

    pub(crate) fn rows(&self) -> &'a [Row<T>] {
        self.rows
    }

    /// Evaluate a column if it has not been evaluated yet.
    ///
    /// A panicking accessor leaves the column marked as failed and pushes a
    /// warning once.
    pub(crate) fn ensure(&mut self, column: &Column<T>, warnings: &mut WarningSink) {
        if self.columns.contains_key(&column.id) {
            return;
        }
        let values = match column.try_values(self.rows.iter().map(|r| r.record.as_ref())) {
            Ok(values) => Some(values),
            Err(message) => {
                warnings.push(GridWarning::AccessorPanicked {
                    column: column.id.clone(),
                    message,
                });
                None
            }
        };
        self.columns.insert(column.id.clone(), values);
    }

    /// Values of an evaluated column, indexed like the row slice.
    ///
    /// `None` if the column was never evaluated or its accessor failed.
    pub(crate) fn get(&self, column: &str) -> Option<&[Value]> {
        self.columns.get(column).and_then(|v| v.as_deref())
    }

    /// Evaluate then borrow.
    pub(crate) fn values(&mut self, column: &Column<T>, warnings: &mut WarningSink) -> Option<&[Value]> {
        self.ensure(column, warnings);
        self.get(&column.id)
    }
}
