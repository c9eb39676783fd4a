//! Virtualizer: which rows to render for a scroll position.
//!
//! Keeps a prefix-sum array over item sizes so offset lookups are a binary
//! search. Size corrections only touch the suffix after the corrected item.

use serde::{Deserialize, Serialize};

/// Inclusive index range of rows to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualRange {
    /// First row at least partially inside the viewport.
    pub start_index: usize,
    /// Last row at least partially inside the viewport.
    pub end_index: usize,
    /// `start_index` extended by the overscan.
    pub overscan_start: usize,
    /// `end_index` extended by the overscan.
    pub overscan_end: usize,
}

impl VirtualRange {
    /// Number of rows to render, overscan included.
    pub fn rendered_count(&self) -> usize {
        self.overscan_end - self.overscan_start + 1
    }

    /// Whether `index` lies in the un-overscanned core.
    pub fn core_contains(&self, index: usize) -> bool {
        (self.start_index..=self.end_index).contains(&index)
    }
}

/// Placement of one rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VirtualItem {
    /// Position in the sorted rows.
    pub index: usize,
    /// Offset of the row's leading edge.
    pub start: f64,
    /// Current size (measured or estimated).
    pub size: f64,
}

impl VirtualItem {
    /// Offset of the row's trailing edge.
    pub fn end(&self) -> f64 {
        self.start + self.size
    }
}

/// Rows to render plus the spacing around them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualLayout {
    /// Index range, or `None` when nothing is visible.
    pub range: Option<VirtualRange>,
    /// One entry per rendered row.
    pub items: Vec<VirtualItem>,
    /// Space before the first rendered row.
    pub top_offset: f64,
    /// Space after the last rendered row.
    pub bottom_offset: f64,
    /// Size of all rows together.
    pub total_size: f64,
}

/// Where to place a row when scrolling to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollAlign {
    /// Row's leading edge at the viewport's leading edge.
    Start,
    /// Row centered in the viewport.
    Center,
    /// Row's trailing edge at the viewport's trailing edge.
    End,
    /// Scroll the least amount that brings the row fully into view.
    #[default]
    Auto,
}

/// Prefix-sum index over item sizes plus viewport geometry.
#[derive(Debug, Clone)]
pub struct Virtualizer {
    /// `offsets[i]` is where item `i` starts; `offsets[len]` is the total.
    offsets: Vec<f64>,
    sizes: Vec<f64>,
    estimated_size: f64,
    overscan: usize,
    scroll_offset: f64,
    container_size: f64,
}

impl Default for Virtualizer {
    fn default() -> Self {
        Self::new(48.0, 5)
    }
}

impl Virtualizer {
    /// Create an empty virtualizer.
    pub fn new(estimated_size: f64, overscan: usize) -> Self {
        Self {
            offsets: vec![0.0],
            sizes: Vec::new(),
            estimated_size: sanitize(estimated_size),
            overscan,
            scroll_offset: 0.0,
            container_size: 0.0,
        }
    }

    /// Create a virtualizer with `count` items at the estimated size.
    pub fn with_count(count: usize, estimated_size: f64, overscan: usize) -> Self {
        let mut v = Self::new(estimated_size, overscan);
        v.reset(count);
        v
    }

    // -------------------------------------------------------------------------
    // Sizes
    // -------------------------------------------------------------------------

    /// Replace all sizes and rebuild the prefix sums.
    pub fn set_sizes(&mut self, sizes: impl IntoIterator<Item = f64>) {
        self.sizes = sizes.into_iter().map(sanitize).collect();
        self.offsets = Vec::with_capacity(self.sizes.len() + 1);
        self.offsets.push(0.0);

        let mut total = 0.0;
        for size in &self.sizes {
            total += size;
            self.offsets.push(total);
        }
    }

    /// Reset to `count` items at the estimated size.
    pub fn reset(&mut self, count: usize) {
        let estimate = self.estimated_size;
        self.set_sizes(std::iter::repeat_n(estimate, count));
    }

    /// Correct one item's size. Returns true if anything changed.
    ///
    /// Only `offsets[index + 1..]` are shifted.
    pub fn resize_item(&mut self, index: usize, size: f64) -> bool {
        let Some(current) = self.sizes.get_mut(index) else {
            return false;
        };
        let size = sanitize(size);
        let delta = size - *current;
        if delta == 0.0 {
            return false;
        }
        *current = size;
        for offset in &mut self.offsets[index + 1..] {
            *offset += delta;
        }
        true
    }

    /// The size new items start with.
    pub fn estimated_size(&self) -> f64 {
        self.estimated_size
    }

    /// Change the estimate. Applies to items set afterwards.
    pub fn set_estimated_size(&mut self, size: f64) {
        self.estimated_size = sanitize(size);
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Check if there are no items.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Current size of an item.
    pub fn item_size(&self, index: usize) -> Option<f64> {
        self.sizes.get(index).copied()
    }

    /// Leading edge of an item. O(1).
    pub fn item_start(&self, index: usize) -> Option<f64> {
        (index < self.sizes.len()).then(|| self.offsets[index])
    }

    /// Sum of all item sizes. O(1).
    pub fn total_size(&self) -> f64 {
        self.offsets.last().copied().unwrap_or(0.0)
    }

    /// Index of the item covering `offset`: the first whose trailing edge
    /// lies beyond it. O(log n). Clamped to the last item.
    pub fn index_at_offset(&self, offset: f64) -> Option<usize> {
        if self.sizes.is_empty() {
            return None;
        }
        let index = self.offsets[1..].partition_point(|&end| end <= offset);
        Some(index.min(self.sizes.len() - 1))
    }

    // -------------------------------------------------------------------------
    // Viewport
    // -------------------------------------------------------------------------

    /// Current scroll offset.
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Set the scroll offset. Negative offsets are treated as 0.
    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.scroll_offset = sanitize(offset);
    }

    /// Current container size.
    pub fn container_size(&self) -> f64 {
        self.container_size
    }

    /// Set the container size.
    pub fn set_container_size(&mut self, size: f64) {
        self.container_size = if size.is_finite() { size } else { 0.0 };
    }

    /// Overscan in rows on each side.
    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Set the overscan.
    pub fn set_overscan(&mut self, overscan: usize) {
        self.overscan = overscan;
    }

    /// Largest scroll offset that still fills the container.
    pub fn max_scroll_offset(&self) -> f64 {
        (self.total_size() - self.container_size).max(0.0)
    }

    /// Pull the scroll offset back into `0..=max_scroll_offset()`.
    pub fn clamp_scroll_offset(&mut self) {
        self.scroll_offset = self.scroll_offset.clamp(0.0, self.max_scroll_offset());
    }

    /// Scroll offset that brings `index` into view with the given alignment.
    pub fn offset_for_index(&self, index: usize, align: ScrollAlign) -> Option<f64> {
        let start = self.item_start(index)?;
        let size = self.sizes[index];
        let viewport = self.container_size.max(0.0);
        let offset = match align {
            ScrollAlign::Start => start,
            ScrollAlign::End => start + size - viewport,
            ScrollAlign::Center => start + size / 2.0 - viewport / 2.0,
            ScrollAlign::Auto => {
                if start < self.scroll_offset {
                    start
                } else if start + size > self.scroll_offset + viewport {
                    start + size - viewport
                } else {
                    self.scroll_offset
                }
            }
        };
        Some(offset.clamp(0.0, self.max_scroll_offset()))
    }

    // -------------------------------------------------------------------------
    // Window
    // -------------------------------------------------------------------------

    /// Visible range for the current geometry.
    ///
    /// `None` when there are no items or the container has no size.
    pub fn range(&self) -> Option<VirtualRange> {
        let count = self.sizes.len();
        if count == 0 || self.container_size <= 0.0 {
            return None;
        }
        let last = count - 1;
        let ends = &self.offsets[1..];
        let limit = self.scroll_offset + self.container_size;

        let start_index = ends.partition_point(|&end| end <= self.scroll_offset).min(last);
        let end_index = ends.partition_point(|&end| end <= limit).clamp(start_index, last);

        Some(VirtualRange {
            start_index,
            end_index,
            overscan_start: start_index.saturating_sub(self.overscan),
            overscan_end: (end_index + self.overscan).min(last),
        })
    }

    /// Range plus item placements and spacing.
    pub fn layout(&self) -> VirtualLayout {
        let total_size = self.total_size();
        let Some(range) = self.range() else {
            return VirtualLayout {
                total_size,
                ..VirtualLayout::default()
            };
        };
        let items = (range.overscan_start..=range.overscan_end)
            .map(|index| VirtualItem {
                index,
                start: self.offsets[index],
                size: self.sizes[index],
            })
            .collect();
        VirtualLayout {
            range: Some(range),
            items,
            top_offset: self.offsets[range.overscan_start],
            bottom_offset: total_size - self.offsets[range.overscan_end + 1],
            total_size,
        }
    }
}

/// Sizes and offsets are finite and non-negative.
fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
