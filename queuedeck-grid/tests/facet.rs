mod common;

use common::{columns, rows, status_items};
use queuedeck_grid::facet::{self, Facet};
use queuedeck_grid::{FilterState, FilterValue, Value};

#[test]
fn test_facet_ignores_its_own_filter() {
    let rows = rows(status_items());
    let state = FilterState::new().with("status", FilterValue::set(["active"]));
    let out = facet::compute(&rows, &columns(), &state);

    let status = &out.facets["status"];
    assert_eq!(status.count(&Value::from("active")), 6);
    assert_eq!(status.count(&Value::from("inactive")), 4);
    assert_eq!(status.total(), 10);
}

#[test]
fn test_facet_respects_other_filters() {
    let rows = rows(status_items());
    let state = FilterState::new().with("status", FilterValue::set(["active"]));
    let out = facet::compute(&rows, &columns(), &state);

    // Only the six active rows count towards priority: ids 0..6, id % 3.
    let priority = &out.facets["priority"];
    assert_eq!(priority.count(&Value::from(0i64)), 2);
    assert_eq!(priority.count(&Value::from(1i64)), 2);
    assert_eq!(priority.count(&Value::from(2i64)), 2);
    assert_eq!(priority.total(), 6);
}

#[test]
fn test_facet_counts_sum_to_rows_passing_other_filters() {
    let rows = rows(status_items());
    let state = FilterState::new()
        .with("status", FilterValue::set(["inactive"]))
        .with("priority", FilterValue::set([1i64]))
        .with("name", "item");
    let out = facet::compute(&rows, &columns(), &state);

    for (column, facet) in &out.facets {
        let sum: usize = facet.counts().values().sum();
        assert_eq!(sum, facet.total(), "column {}", column);
    }
    // Without its own filter, status sees priority == 1: ids 1, 4, 7.
    assert_eq!(out.facets["status"].total(), 3);
    // Without its own filter, priority sees inactive: ids 6..10.
    assert_eq!(out.facets["priority"].total(), 4);
}

#[test]
fn test_only_filterable_columns_get_facets() {
    let rows = rows(status_items());
    let out = facet::compute(&rows, &columns(), &FilterState::new());
    let mut keys: Vec<_> = out.facets.keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, vec!["name", "priority", "status"]);
}

#[test]
fn test_nulls_are_counted() {
    let values = [Value::Null, Value::from("a"), Value::Null];
    let facet = Facet::from_values(&values);
    assert_eq!(facet.count(&Value::Null), 2);
    assert_eq!(facet.len(), 2);
}

#[test]
fn test_sorted_views() {
    let values = [
        Value::from("b"),
        Value::from("a"),
        Value::from("b"),
        Value::from("c"),
        Value::from("b"),
        Value::from("a"),
    ];
    let facet = Facet::from_values(&values);
    assert_eq!(
        facet.sorted_by_value(),
        vec![
            (Value::from("a"), 2),
            (Value::from("b"), 3),
            (Value::from("c"), 1),
        ]
    );
    assert_eq!(facet.sorted_by_count()[0], (Value::from("b"), 3));
}
