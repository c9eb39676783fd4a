use queuedeck_grid::{ScrollAlign, VirtualRange, Virtualizer};

fn viewport(count: usize, size: f64, overscan: usize, container: f64, scroll: f64) -> Virtualizer {
    let mut v = Virtualizer::with_count(count, size, overscan);
    v.set_container_size(container);
    v.set_scroll_offset(scroll);
    v
}

#[test]
fn test_uniform_window_with_overscan() {
    let v = viewport(1000, 48.0, 5, 400.0, 960.0);
    assert_eq!(
        v.range(),
        Some(VirtualRange {
            start_index: 20,
            end_index: 28,
            overscan_start: 15,
            overscan_end: 33,
        })
    );
    assert_eq!(v.total_size(), 48_000.0);
}

#[test]
fn test_row_starting_at_bottom_edge_is_in_core() {
    let v = viewport(20, 48.0, 0, 480.0, 0.0);
    let range = v.range().unwrap();
    assert_eq!((range.start_index, range.end_index), (0, 10));

    let v = viewport(20, 48.0, 0, 480.0, 48.0);
    let range = v.range().unwrap();
    assert_eq!((range.start_index, range.end_index), (1, 11));
}

#[test]
fn test_overscan_clamps_to_data_bounds() {
    let top = viewport(100, 10.0, 5, 50.0, 0.0).range().unwrap();
    assert_eq!(top.start_index, 0);
    assert_eq!(top.overscan_start, 0);

    let bottom = viewport(100, 10.0, 5, 50.0, 950.0).range().unwrap();
    assert_eq!(bottom.end_index, 99);
    assert_eq!(bottom.overscan_end, 99);
}

#[test]
fn test_range_covers_viewport_for_every_offset() {
    let sizes: Vec<f64> = (0..200).map(|i| 10.0 + (i % 7) as f64 * 3.0).collect();
    let mut v = Virtualizer::new(10.0, 2);
    v.set_sizes(sizes.iter().copied());
    v.set_container_size(120.0);

    let mut offset = 0.0;
    while offset <= v.max_scroll_offset() {
        v.set_scroll_offset(offset);
        let range = v.range().unwrap();
        let first = v.item_start(range.start_index).unwrap();
        let last = range.end_index;
        let last_end = v.item_start(last).unwrap() + v.item_size(last).unwrap();

        assert!(range.overscan_start <= range.start_index);
        assert!(range.start_index <= range.end_index);
        assert!(range.end_index <= range.overscan_end);
        assert!(range.overscan_end < v.len());
        assert!(first <= offset, "offset {}", offset);
        assert!(
            last_end >= (offset + 120.0).min(v.total_size()),
            "offset {}",
            offset
        );
        offset += 7.5;
    }
}

#[test]
fn test_resize_only_shifts_later_offsets() {
    let mut v = Virtualizer::with_count(10, 20.0, 0);
    assert!(v.resize_item(4, 50.0));
    assert_eq!(v.item_start(4), Some(80.0));
    assert_eq!(v.item_start(5), Some(130.0));
    assert_eq!(v.item_start(9), Some(210.0));
    assert_eq!(v.total_size(), 230.0);

    assert!(!v.resize_item(4, 50.0));
    assert!(!v.resize_item(10, 5.0));
}

#[test]
fn test_empty_data_has_no_range() {
    let v = viewport(0, 48.0, 5, 400.0, 0.0);
    assert_eq!(v.range(), None);
    let layout = v.layout();
    assert!(layout.items.is_empty());
    assert_eq!(layout.total_size, 0.0);
}

#[test]
fn test_zero_container_has_no_range() {
    let v = viewport(50, 48.0, 5, 0.0, 0.0);
    assert_eq!(v.range(), None);
    assert_eq!(v.total_size(), 2400.0);
}

#[test]
fn test_layout_spacing_adds_up() {
    let v = viewport(1000, 48.0, 5, 400.0, 960.0);
    let layout = v.layout();
    let rendered: f64 = layout.items.iter().map(|i| i.size).sum();
    assert_eq!(layout.items.len(), 19);
    assert_eq!(layout.top_offset, 15.0 * 48.0);
    assert_eq!(layout.top_offset + rendered + layout.bottom_offset, layout.total_size);
}

#[test]
fn test_scroll_offset_clamps_after_shrink() {
    let mut v = viewport(100, 10.0, 0, 100.0, 850.0);
    v.reset(20);
    v.clamp_scroll_offset();
    assert_eq!(v.scroll_offset(), 100.0);
    v.set_scroll_offset(-5.0);
    assert_eq!(v.scroll_offset(), 0.0);
}

#[test]
fn test_offset_for_index_alignments() {
    let v = viewport(100, 10.0, 0, 50.0, 200.0);
    assert_eq!(v.offset_for_index(30, ScrollAlign::Start), Some(300.0));
    assert_eq!(v.offset_for_index(30, ScrollAlign::End), Some(260.0));
    assert_eq!(v.offset_for_index(30, ScrollAlign::Center), Some(280.0));
    // Already visible: stays put.
    assert_eq!(v.offset_for_index(22, ScrollAlign::Auto), Some(200.0));
    assert_eq!(v.offset_for_index(10, ScrollAlign::Auto), Some(100.0));
    assert_eq!(v.offset_for_index(99, ScrollAlign::Start), Some(950.0));
    assert_eq!(v.offset_for_index(100, ScrollAlign::Start), None);
}
