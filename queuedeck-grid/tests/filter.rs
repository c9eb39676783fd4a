mod common;

use common::{Item, columns, ids, rows, status_items};
use queuedeck_grid::filter::{self, matches};
use queuedeck_grid::{Column, FilterState, FilterValue, FilterVariant, GridWarning, Value};

#[test]
fn test_empty_filter_is_identity() {
    let rows = rows(status_items());
    let out = filter::apply(&rows, &columns(), &FilterState::new());
    assert_eq!(ids(&out.rows), ids(&rows));
    assert!(out.warnings.is_empty());
}

#[test]
fn test_multi_select_keeps_matching_rows_in_order() {
    let rows = rows(status_items());
    let state = FilterState::new().with("status", FilterValue::set(["inactive"]));
    let out = filter::apply(&rows, &columns(), &state);
    assert_eq!(ids(&out.rows), vec![6, 7, 8, 9]);
}

#[test]
fn test_text_filter_is_case_insensitive_substring() {
    let rows = rows(status_items());
    let state = FilterState::new().with("name", "ITEM-1");
    let out = filter::apply(&rows, &columns(), &state);
    assert_eq!(ids(&out.rows), vec![1]);
}

#[test]
fn test_filters_are_conjunctive() {
    let rows = rows(status_items());
    let state = FilterState::new()
        .with("status", FilterValue::set(["active"]))
        .with("priority", FilterValue::set([0i64]));
    let out = filter::apply(&rows, &columns(), &state);
    // priority = id % 3
    assert_eq!(ids(&out.rows), vec![0, 3]);
}

#[test]
fn test_filter_never_grows_and_is_idempotent() {
    let rows = rows(status_items());
    let state = FilterState::new()
        .with("name", "item")
        .with("status", FilterValue::set(["active", "inactive"]));
    let once = filter::apply(&rows, &columns(), &state);
    assert!(once.rows.len() <= rows.len());
    let twice = filter::apply(&once.rows, &columns(), &state);
    assert_eq!(ids(&once.rows), ids(&twice.rows));
}

#[test]
fn test_empty_set_passes_everything() {
    let rows = rows(status_items());
    let state = FilterState::new().with("status", FilterValue::set(Vec::<Value>::new()));
    let out = filter::apply(&rows, &columns(), &state);
    assert_eq!(out.rows.len(), rows.len());
}

#[test]
fn test_unknown_column_is_ignored() {
    let rows = rows(status_items());
    let state = FilterState::new().with("nope", "x");
    let out = filter::apply(&rows, &columns(), &state);
    assert_eq!(out.rows.len(), rows.len());
    assert!(out.warnings.is_empty());
}

#[test]
fn test_type_mismatch_is_a_warning_and_a_no_op() {
    let rows = rows(status_items());
    let state = FilterState::new().with("status", "active");
    let out = filter::apply(&rows, &columns(), &state);
    assert_eq!(out.rows.len(), rows.len());
    assert_eq!(
        out.warnings,
        vec![GridWarning::FilterTypeMismatch {
            column: "status".to_string(),
            expected: "set",
            actual: "text",
        }]
    );
}

#[test]
fn test_filter_on_unfilterable_column_warns() {
    let rows = rows(status_items());
    let state = FilterState::new().with("id", "1");
    let out = filter::apply(&rows, &columns(), &state);
    assert_eq!(out.rows.len(), rows.len());
    assert_eq!(
        out.warnings,
        vec![GridWarning::ColumnNotFilterable("id".to_string())]
    );
}

#[test]
fn test_global_search_matches_any_searchable_column() {
    let rows = rows(status_items());
    let state = FilterState::new().with_global("-7");
    let out = filter::apply(&rows, &columns(), &state);
    assert_eq!(ids(&out.rows), vec![7]);
}

#[test]
fn test_global_search_skips_non_searchable_columns() {
    let rows = rows(status_items());
    // "inactive" only appears in the status column, which is not searchable.
    let state = FilterState::new().with_global("inactive");
    let out = filter::apply(&rows, &columns(), &state);
    assert!(out.rows.is_empty());
}

#[test]
fn test_panicking_accessor_disables_its_filter() {
    let mut cols = columns();
    cols.push(
        Column::new("broken", "Broken", |_: &Item| -> Value { panic!("boom") }).text_filter(),
    );
    let rows = rows(status_items());
    let state = FilterState::new().with("broken", "x");
    let out = filter::apply(&rows, &cols, &state);
    assert_eq!(out.rows.len(), rows.len());
    assert_eq!(
        out.warnings,
        vec![GridWarning::AccessorPanicked {
            column: "broken".to_string(),
            message: "boom".to_string(),
        }]
    );
}

#[test]
fn test_matches_single_values() {
    let set = FilterValue::set(["a", "b"]);
    assert_eq!(matches(FilterVariant::MultiSelect, &set, &Value::from("a")), Some(true));
    assert_eq!(matches(FilterVariant::MultiSelect, &set, &Value::Null), Some(false));
    assert_eq!(matches(FilterVariant::Text, &set, &Value::from("a")), None);

    let text = FilterValue::from("Dead");
    assert_eq!(
        matches(FilterVariant::Text, &text, &Value::from("deadLettered")),
        Some(true)
    );
}
