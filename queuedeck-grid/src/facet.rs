//! Facet calculator: distinct values and counts per filterable column.
//!
//! A column's counts cover the rows that pass every filter except the
//! column's own, so a filter UI can show how many rows each candidate value
//! would keep if it were selected.

use std::collections::HashMap;

use crate::cells::CellCache;
use crate::column::Column;
use crate::error::{GridWarning, WarningSink};
use crate::filter::{self, FilterMasks};
use crate::row::Row;
use crate::state::FilterState;
use crate::value::Value;

/// Distinct-value counts for one column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facet {
    counts: HashMap<Value, usize>,
    total: usize,
}

impl Facet {
    /// Count how often each value occurs.
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut facet = Facet::default();
        for value in values {
            *facet.counts.entry(value.clone()).or_insert(0) += 1;
            facet.total += 1;
        }
        facet
    }

    /// Count for one value (0 if absent).
    pub fn count(&self, value: &Value) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    /// All value counts.
    pub fn counts(&self) -> &HashMap<Value, usize> {
        &self.counts
    }

    /// Sum of all counts: the rows passing every other filter.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if no values were counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries ordered by value (nulls last).
    pub fn sorted_by_value(&self) -> Vec<(Value, usize)> {
        let mut entries: Vec<_> = self.counts.iter().map(|(v, c)| (v.clone(), *c)).collect();
        entries.sort_by(|a, b| a.0.compare(&b.0));
        entries
    }

    /// Entries ordered by descending count, ties by value.
    pub fn sorted_by_count(&self) -> Vec<(Value, usize)> {
        let mut entries = self.sorted_by_value();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

/// Facets keyed by column id.
pub type Facets = HashMap<String, Facet>;

/// Result of [`compute`].
#[derive(Debug)]
pub struct FacetOutcome {
    /// One facet per filterable column whose accessor could be read.
    pub facets: Facets,
    /// Non-fatal problems met while counting.
    pub warnings: Vec<GridWarning>,
}

/// Compute facets for every filterable column.
pub fn compute<T>(rows: &[Row<T>], columns: &[Column<T>], state: &FilterState) -> FacetOutcome {
    let mut warnings = WarningSink::new();
    let mut cells = CellCache::new(rows);
    let masks = filter::evaluate(&mut cells, columns, state, &mut warnings);
    let facets = from_masks(&mut cells, &masks, columns, &mut warnings);
    FacetOutcome {
        facets,
        warnings: warnings.into_vec(),
    }
}

/// Facets from already evaluated filter masks.
pub(crate) fn from_masks<T>(
    cells: &mut CellCache<'_, T>,
    masks: &FilterMasks,
    columns: &[Column<T>],
    warnings: &mut WarningSink,
) -> Facets {
    let len = cells.rows().len();
    let mut facets = Facets::new();

    for column in columns.iter().filter(|c| c.is_filterable()) {
        let Some(values) = cells.values(column, warnings) else {
            continue;
        };
        let facet = Facet::from_values(
            (0..len)
                .filter(|&i| masks.passes(i, Some(&column.id)))
                .map(|i| &values[i]),
        );
        facets.insert(column.id.clone(), facet);
    }

    facets
}
