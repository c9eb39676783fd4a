//! Filter engine.
//!
//! Every column filter and the global search is evaluated independently into
//! a pass mask over the rows. A row is kept when all masks pass. Keeping the
//! masks separate lets the facet stage leave one column's filter out without
//! re-evaluating the others.

use std::collections::HashSet;

use crate::cells::CellCache;
use crate::column::{Column, FilterVariant, find_column};
use crate::error::{GridWarning, WarningSink};
use crate::row::Row;
use crate::state::{FilterState, FilterValue};
use crate::value::Value;

/// Which filter a mask came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MaskSource {
    Column(String),
    Global,
}

/// Pass masks for every active filter, indexed like the row slice.
#[derive(Debug, Clone, Default)]
pub(crate) struct FilterMasks {
    masks: Vec<(MaskSource, Vec<bool>)>,
}

impl FilterMasks {
    /// Whether row `index` passes every mask, optionally ignoring one column.
    pub(crate) fn passes(&self, index: usize, except: Option<&str>) -> bool {
        self.masks.iter().all(|(source, mask)| {
            let skipped = matches!((source, except), (MaskSource::Column(id), Some(ex)) if id == ex);
            skipped || mask[index]
        })
    }

    /// Positions of rows passing every mask.
    pub(crate) fn passing(&self, len: usize, except: Option<&str>) -> Vec<usize> {
        (0..len).filter(|&i| self.passes(i, except)).collect()
    }
}

/// Result of [`apply`].
#[derive(Debug)]
pub struct FilterOutcome<T> {
    /// Rows that passed, in input order.
    pub rows: Vec<Row<T>>,
    /// Non-fatal problems met while filtering.
    pub warnings: Vec<GridWarning>,
}

/// Filter rows against a filter state.
///
/// Unknown column ids are ignored. Mismatched filter values and failing
/// accessors make that column a no-op and produce a warning.
pub fn apply<T>(rows: &[Row<T>], columns: &[Column<T>], state: &FilterState) -> FilterOutcome<T> {
    let mut warnings = WarningSink::new();
    let mut cells = CellCache::new(rows);
    let masks = evaluate(&mut cells, columns, state, &mut warnings);
    FilterOutcome {
        rows: masks
            .passing(rows.len(), None)
            .into_iter()
            .map(|i| rows[i].clone())
            .collect(),
        warnings: warnings.into_vec(),
    }
}

/// Build pass masks for every active filter in `state`.
pub(crate) fn evaluate<T>(
    cells: &mut CellCache<'_, T>,
    columns: &[Column<T>],
    state: &FilterState,
    warnings: &mut WarningSink,
) -> FilterMasks {
    let mut masks = Vec::new();

    // Sorted for a deterministic warning order.
    let mut entries: Vec<_> = state.columns.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    for (column_id, value) in entries {
        let Some(column) = find_column(columns, column_id) else {
            log::debug!("Ignoring filter on unknown column '{}'", column_id);
            continue;
        };
        let Some(variant) = column.filter_variant else {
            warnings.push(GridWarning::ColumnNotFilterable(column_id.clone()));
            continue;
        };
        let Some(predicate) = Predicate::new(variant, value) else {
            warnings.push(GridWarning::FilterTypeMismatch {
                column: column_id.clone(),
                expected: expected_kind(variant),
                actual: value.kind(),
            });
            continue;
        };
        if value.is_empty() {
            continue;
        }
        let Some(values) = cells.values(column, warnings) else {
            continue;
        };
        let mask = values.iter().map(|v| predicate.test(v)).collect();
        masks.push((MaskSource::Column(column_id.clone()), mask));
    }

    if let Some(search) = state.global_search()
        && let Some(mask) = global_mask(cells, columns, search, warnings)
    {
        masks.push((MaskSource::Global, mask));
    }

    FilterMasks { masks }
}

/// OR across searchable columns. `None` when no searchable column could be read.
fn global_mask<T>(
    cells: &mut CellCache<'_, T>,
    columns: &[Column<T>],
    search: &str,
    warnings: &mut WarningSink,
) -> Option<Vec<bool>> {
    let needle = search.to_lowercase();
    let mut mask: Option<Vec<bool>> = None;

    for column in columns.iter().filter(|c| c.searchable) {
        let Some(values) = cells.values(column, warnings) else {
            continue;
        };
        let hits = mask.get_or_insert_with(|| vec![false; values.len()]);
        for (hit, value) in hits.iter_mut().zip(values) {
            *hit = *hit || value.contains_text(&needle);
        }
    }

    mask
}

fn expected_kind(variant: FilterVariant) -> &'static str {
    match variant {
        FilterVariant::Text => "text",
        FilterVariant::MultiSelect => "set",
    }
}

/// A column filter checked against single cell values.
enum Predicate<'a> {
    Text(String),
    Set(&'a HashSet<Value>),
}

impl<'a> Predicate<'a> {
    /// `None` when the value kind does not fit the variant.
    fn new(variant: FilterVariant, filter: &'a FilterValue) -> Option<Self> {
        match (variant, filter) {
            (FilterVariant::Text, FilterValue::Text(text)) => Some(Predicate::Text(text.to_lowercase())),
            (FilterVariant::MultiSelect, FilterValue::Set(selected)) => Some(Predicate::Set(selected)),
            _ => None,
        }
    }

    fn test(&self, value: &Value) -> bool {
        match self {
            Predicate::Text(needle) => value.contains_text(needle),
            Predicate::Set(selected) => selected.is_empty() || selected.contains(value),
        }
    }
}

/// Whether a single cell value passes a filter.
///
/// `None` when the filter value does not fit the variant.
pub fn matches(variant: FilterVariant, filter: &FilterValue, value: &Value) -> Option<bool> {
    Predicate::new(variant, filter).map(|p| p.test(value))
}
