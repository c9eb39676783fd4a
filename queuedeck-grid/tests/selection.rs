mod common;

use common::{grid, many_items, status_items};
use queuedeck_grid::{FilterValue, GridConfig, RowId, Selection, SelectionMode, SortDirection};

fn id(n: u32) -> RowId {
    RowId::Key(n.to_string())
}

#[test]
fn test_single_mode_replaces_selection() {
    let mut selection = Selection::new(SelectionMode::Single);
    assert!(selection.toggle(id(1)));
    assert!(selection.toggle(id(2)));
    assert!(!selection.is_selected(&id(1)));
    assert!(selection.is_selected(&id(2)));
    assert!(selection.toggle(id(2)));
    assert!(selection.is_empty());
}

#[test]
fn test_none_mode_ignores_everything() {
    let mut selection = Selection::new(SelectionMode::None);
    assert!(!selection.toggle(id(1)));
    assert!(!selection.select_all(&[id(1), id(2)]));
    assert!(selection.is_empty());
}

#[test]
fn test_multi_mode_toggles_independently() {
    let mut selection = Selection::new(SelectionMode::Multi);
    selection.toggle(id(1));
    selection.toggle(id(2));
    selection.toggle(id(1));
    assert_eq!(selection.len(), 1);
    assert!(selection.is_selected(&id(2)));
}

#[test]
fn test_selection_survives_sort_and_filter() {
    let mut grid = grid(status_items(), GridConfig::new().paginated(20));
    grid.toggle_selection(id(3));
    grid.toggle_selection(id(8));

    grid.set_sort("id", SortDirection::Desc, false);
    assert!(grid.is_selected(&id(3)));
    assert!(grid.is_selected(&id(8)));
    assert_eq!(grid.selected_visible_count(), 2);

    grid.set_filter("status", FilterValue::set(["active"]));
    assert!(grid.is_selected(&id(8)));
    assert_eq!(grid.selection().len(), 2);
    assert_eq!(grid.selected_visible_count(), 1);

    grid.clear_filters();
    assert_eq!(grid.selected_visible_count(), 2);
}

#[test]
fn test_select_all_filtered() {
    let mut grid = grid(status_items(), GridConfig::new());
    grid.set_filter("status", FilterValue::set(["inactive"]));
    grid.select_all_filtered();
    assert_eq!(grid.selection().len(), 4);
    assert_eq!(grid.selected_visible_count(), 4);

    grid.clear_selection();
    assert!(grid.selection().is_empty());
}

#[test]
fn test_refresh_prunes_vanished_ids() {
    let mut grid = grid(many_items(10), GridConfig::new());
    grid.toggle_selection(id(2));
    grid.toggle_selection(id(9));

    grid.set_records(many_items(5));
    assert!(grid.is_selected(&id(2)));
    assert!(!grid.is_selected(&id(9)));
    assert_eq!(grid.selection().len(), 1);
}

#[test]
fn test_unknown_ids_are_not_selected() {
    let mut grid = grid(many_items(5), GridConfig::new());
    let published = grid.snapshot().generation;

    grid.toggle_selection(id(42));
    assert!(grid.selection().is_empty());
    assert!(!grid.is_selected(&id(42)));
    assert_eq!(grid.snapshot().generation, published);

    grid.select_all(&[id(1), id(77)]);
    assert_eq!(grid.selection().len(), 1);
    assert!(grid.is_selected(&id(1)));
    assert_eq!(grid.selected_visible_count(), 1);
}
