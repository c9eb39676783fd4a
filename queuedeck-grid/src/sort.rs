//! Sort engine: stable multi-key ordering.

use std::cell::Cell;
use std::cmp::Ordering;
use std::panic::{self, AssertUnwindSafe};

use crate::cells::CellCache;
use crate::column::{Column, find_column};
use crate::error::{GridWarning, WarningSink, panic_message};
use crate::row::Row;
use crate::state::SortState;
use crate::value::Value;

/// Result of [`apply`].
#[derive(Debug)]
pub struct SortOutcome<T> {
    /// Rows in sorted order.
    pub rows: Vec<Row<T>>,
    /// Non-fatal problems met while sorting.
    pub warnings: Vec<GridWarning>,
}

/// Sort rows by the keys in `state`.
///
/// The sort is stable: rows equal on every key keep their input order.
/// Keys on unknown or non-sortable columns are skipped. A comparator that
/// panics drops its key for this call and produces a warning.
pub fn apply<T>(rows: &[Row<T>], columns: &[Column<T>], state: &SortState) -> SortOutcome<T> {
    let mut warnings = WarningSink::new();
    let mut cells = CellCache::new(rows);
    let positions: Vec<usize> = (0..rows.len()).collect();
    let sorted = order(&mut cells, &positions, columns, state, &mut warnings);
    SortOutcome {
        rows: sorted.into_iter().map(|i| rows[i].clone()).collect(),
        warnings: warnings.into_vec(),
    }
}

/// A resolved sort key.
struct ActiveKey<'a, T> {
    column: &'a Column<T>,
    values: &'a [Value],
    descending: bool,
}

impl<T> ActiveKey<'_, T> {
    fn compare(&self, a: usize, b: usize) -> Ordering {
        let (x, y) = (&self.values[a], &self.values[b]);
        if self.column.has_comparator() {
            let ord = self.column.compare(x, y);
            if self.descending { ord.reverse() } else { ord }
        } else {
            x.compare_directed(y, self.descending)
        }
    }
}

/// Order `positions` (indices into the cached rows) by the sort state.
pub(crate) fn order<T>(
    cells: &mut CellCache<'_, T>,
    positions: &[usize],
    columns: &[Column<T>],
    state: &SortState,
    warnings: &mut WarningSink,
) -> Vec<usize> {
    let mut resolved = Vec::new();
    for key in state.keys() {
        match find_column(columns, &key.column_id) {
            Some(column) if column.sortable => {
                cells.ensure(column, warnings);
                resolved.push((column, key.direction.is_desc()));
            }
            Some(_) => log::debug!("Ignoring sort on non-sortable column '{}'", key.column_id),
            None => log::debug!("Ignoring sort on unknown column '{}'", key.column_id),
        }
    }

    let cells = &*cells;
    let mut keys: Vec<ActiveKey<'_, T>> = resolved
        .into_iter()
        .filter_map(|(column, descending)| {
            cells.get(&column.id).map(|values| ActiveKey {
                column,
                values,
                descending,
            })
        })
        .collect();

    let mut sorted = positions.to_vec();
    if keys.is_empty() {
        return sorted;
    }

    // A panicking comparator aborts the pass; drop its key and start over
    // from input order so the result never mixes partial orderings.
    loop {
        let active: Cell<Option<usize>> = Cell::new(None);
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            sorted.sort_by(|&a, &b| {
                for (k, key) in keys.iter().enumerate() {
                    active.set(Some(k));
                    let ord = key.compare(a, b);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                active.set(None);
                Ordering::Equal
            });
        }));

        match result {
            Ok(()) => return sorted,
            Err(payload) => {
                let Some(failed) = active.get() else {
                    // Not raised by a comparator; keep input order.
                    return positions.to_vec();
                };
                let key = keys.remove(failed);
                warnings.push(GridWarning::ComparatorPanicked {
                    column: key.column.id.clone(),
                    message: panic_message(&payload),
                });
                sorted = positions.to_vec();
                if keys.is_empty() {
                    return sorted;
                }
            }
        }
    }
}
