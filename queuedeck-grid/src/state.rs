//! Table state slices owned by the pipeline.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::value::Value;

// =============================================================================
// Filters
// =============================================================================

/// A per-column filter value.
///
/// Deserializes from a JSON string (`Text`) or array (`Set`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Substring to search for.
    Text(String),
    /// Values a multi-select column must match one of.
    Set(HashSet<Value>),
}

impl FilterValue {
    /// Build a set filter from anything yielding values.
    pub fn set<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        FilterValue::Set(values.into_iter().map(Into::into).collect())
    }

    /// Name of the value kind, for warnings.
    pub fn kind(&self) -> &'static str {
        match self {
            FilterValue::Text(_) => "text",
            FilterValue::Set(_) => "set",
        }
    }

    /// Whether the filter constrains nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Text(text) => text.is_empty(),
            FilterValue::Set(values) => values.is_empty(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(text: &str) -> Self {
        FilterValue::Text(text.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(text: String) -> Self {
        FilterValue::Text(text)
    }
}

impl From<HashSet<Value>> for FilterValue {
    fn from(values: HashSet<Value>) -> Self {
        FilterValue::Set(values)
    }
}

/// Column filters plus the global search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Filter value per column id.
    #[serde(default)]
    pub columns: HashMap<String, FilterValue>,
    /// Global search text, matched against searchable columns.
    #[serde(default)]
    pub global: Option<String>,
}

impl FilterState {
    /// Create an empty filter state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column filter.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.columns.insert(column.into(), value.into());
        self
    }

    /// Builder-style global search.
    pub fn with_global(mut self, text: impl Into<String>) -> Self {
        self.global = Some(text.into());
        self
    }

    /// Filter for a column, if any.
    pub fn get(&self, column: &str) -> Option<&FilterValue> {
        self.columns.get(column)
    }

    /// The global search text, if non-empty.
    pub fn global_search(&self) -> Option<&str> {
        self.global.as_deref().filter(|s| !s.is_empty())
    }

    /// Whether no filter constrains anything.
    pub fn is_empty(&self) -> bool {
        self.global_search().is_none() && self.columns.values().all(FilterValue::is_empty)
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Returns `true` for descending order.
    pub fn is_desc(self) -> bool {
        self == SortDirection::Desc
    }

    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// One entry of the sort state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortKey {
    /// Column to sort by.
    pub column_id: String,
    /// Direction for this key.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortKey {
    /// Ascending key.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column_id: column.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending key.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column_id: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Ordered sort keys; the first entry is the primary key.
///
/// A column id appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortState {
    keys: Vec<SortKey>,
}

impl SortState {
    /// Create an empty sort state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from keys, keeping the first occurrence of each column.
    pub fn from_keys(keys: impl IntoIterator<Item = SortKey>) -> Self {
        let mut state = Self::new();
        for key in keys {
            if state.direction_of(&key.column_id).is_none() {
                state.keys.push(key);
            }
        }
        state
    }

    /// The keys in priority order.
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Whether no sort is applied.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Direction of a column, if it is sorted.
    pub fn direction_of(&self, column: &str) -> Option<SortDirection> {
        self.keys
            .iter()
            .find(|k| k.column_id == column)
            .map(|k| k.direction)
    }

    /// Set a column's direction.
    ///
    /// Non-additive replaces the whole state. Additive updates an existing
    /// key in place or appends a new lowest-priority key.
    pub fn set(&mut self, column: &str, direction: SortDirection, additive: bool) {
        if !additive {
            self.keys.clear();
        }
        match self.keys.iter_mut().find(|k| k.column_id == column) {
            Some(key) => key.direction = direction,
            None => self.keys.push(SortKey {
                column_id: column.to_string(),
                direction,
            }),
        }
    }

    /// Remove a column from the sort. Returns true if it was present.
    pub fn remove(&mut self, column: &str) -> bool {
        let before = self.keys.len();
        self.keys.retain(|k| k.column_id != column);
        self.keys.len() != before
    }

    /// Cycle a column through ascending, descending and unsorted.
    ///
    /// Returns the column's new direction.
    pub fn toggle(&mut self, column: &str, additive: bool) -> Option<SortDirection> {
        match self.direction_of(column) {
            None => {
                self.set(column, SortDirection::Asc, additive);
                Some(SortDirection::Asc)
            }
            Some(SortDirection::Asc) => {
                self.set(column, SortDirection::Desc, additive);
                Some(SortDirection::Desc)
            }
            Some(SortDirection::Desc) => {
                if additive {
                    self.remove(column);
                } else {
                    self.keys.clear();
                }
                None
            }
        }
    }

    /// Drop every key.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Keep only keys matching the predicate.
    pub(crate) fn retain(&mut self, f: impl FnMut(&SortKey) -> bool) {
        self.keys.retain(f);
    }
}

// =============================================================================
// Visibility
// =============================================================================

/// Column visibility. Columns not present are visible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisibilityState {
    columns: HashMap<String, bool>,
}

impl VisibilityState {
    /// Whether a column is visible.
    pub fn is_visible(&self, column: &str) -> bool {
        self.columns.get(column).copied().unwrap_or(true)
    }

    /// Set a column's visibility. Returns true if it changed.
    pub fn set(&mut self, column: &str, visible: bool) -> bool {
        let previous = self.is_visible(column);
        self.columns.insert(column.to_string(), visible);
        previous != visible
    }
}
