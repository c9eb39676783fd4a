//! Row model: identity-wrapped records.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::error::{GridWarning, WarningSink};

/// Stable identity of a row.
///
/// Derived from the identity column when one is configured, otherwise the
/// row's original index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    /// Key read from the identity column.
    Key(String),
    /// Fallback: position in the record collection.
    Index(usize),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Key(key) => f.write_str(key),
            RowId::Index(index) => write!(f, "#{}", index),
        }
    }
}

impl From<&str> for RowId {
    fn from(key: &str) -> Self {
        RowId::Key(key.to_string())
    }
}

impl From<usize> for RowId {
    fn from(index: usize) -> Self {
        RowId::Index(index)
    }
}

/// A record flowing through the pipeline.
#[derive(Debug)]
pub struct Row<T> {
    /// Stable identity.
    pub id: RowId,
    /// Position in the raw record collection.
    pub index: usize,
    /// The wrapped record.
    pub record: Arc<T>,
}

impl<T> Clone for Row<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            index: self.index,
            record: Arc::clone(&self.record),
        }
    }
}

/// All rows of the current record collection, in original order.
#[derive(Debug)]
pub struct RowModel<T> {
    rows: Vec<Row<T>>,
    positions: HashMap<RowId, usize>,
}

impl<T> Default for RowModel<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<T> RowModel<T> {
    /// Wrap records into rows, returning any identity problems met.
    ///
    /// `identity` is the column whose value becomes the row id. Rows whose
    /// identity value is empty, or whose accessor panics, fall back to their
    /// index; so does the second of two rows sharing a key.
    pub fn from_records(records: Vec<T>, identity: Option<&Column<T>>) -> (Self, Vec<GridWarning>) {
        let mut warnings = WarningSink::new();
        let model = Self::build(records, identity, &mut warnings);
        (model, warnings.into_vec())
    }

    pub(crate) fn build(
        records: Vec<T>,
        identity: Option<&Column<T>>,
        warnings: &mut WarningSink,
    ) -> Self {
        let keys: Vec<Option<String>> = match identity {
            Some(column) => match column.try_values(records.iter()) {
                Ok(values) => values
                    .into_iter()
                    .map(|v| Some(v.to_string()).filter(|s| !s.is_empty()))
                    .collect(),
                Err(message) => {
                    warnings.push(GridWarning::AccessorPanicked {
                        column: column.id.clone(),
                        message,
                    });
                    vec![None; records.len()]
                }
            },
            None => vec![None; records.len()],
        };

        let mut rows = Vec::with_capacity(records.len());
        let mut positions = HashMap::with_capacity(records.len());

        for (index, (record, key)) in records.into_iter().zip(keys).enumerate() {
            let mut id = key.map(RowId::Key).unwrap_or(RowId::Index(index));
            match positions.entry(id.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
                Entry::Occupied(_) => {
                    warnings.push(GridWarning::DuplicateRowId {
                        id: id.clone(),
                        index,
                    });
                    id = RowId::Index(index);
                    positions.insert(id.clone(), index);
                }
            }
            rows.push(Row {
                id,
                index,
                record: Arc::new(record),
            });
        }

        Self { rows, positions }
    }

    /// All rows in original order.
    pub fn rows(&self) -> &[Row<T>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row at an original index.
    pub fn get(&self, index: usize) -> Option<&Row<T>> {
        self.rows.get(index)
    }

    /// Original index of a row id.
    pub fn position(&self, id: &RowId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Whether a row id exists in the collection.
    pub fn contains(&self, id: &RowId) -> bool {
        self.positions.contains_key(id)
    }
}
