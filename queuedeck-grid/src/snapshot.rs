//! Derived views handed to the rendering side.

use std::sync::Arc;

use crate::error::GridWarning;
use crate::facet::{Facet, Facets};
use crate::pagination::{Page, PageInfo};
use crate::row::{Row, RowId, RowModel};
use crate::selection::Selection;
use crate::state::{FilterState, SortState, VisibilityState};
use crate::virtualizer::{VirtualItem, VirtualRange};

/// Rows inside the scroll window, with the spacing around them.
#[derive(Debug)]
pub struct VisibleWindow<T> {
    /// Rows to render, overscan included.
    pub rows: Vec<Row<T>>,
    /// Index range into the sorted rows, `None` when nothing is visible.
    pub range: Option<VirtualRange>,
    /// Placement of each rendered row, parallel to `rows`.
    pub items: Vec<VirtualItem>,
    /// Space before the first rendered row.
    pub top_offset: f64,
    /// Space after the last rendered row.
    pub bottom_offset: f64,
    /// Size of all sorted rows together.
    pub total_size: f64,
}

impl<T> VisibleWindow<T> {
    /// A window with nothing to render.
    pub fn empty(total_size: f64) -> Self {
        Self {
            rows: Vec::new(),
            range: None,
            items: Vec::new(),
            top_offset: 0.0,
            bottom_offset: 0.0,
            total_size,
        }
    }

    /// Whether there is nothing to render.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T> Clone for VisibleWindow<T> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            range: self.range,
            items: self.items.clone(),
            top_offset: self.top_offset,
            bottom_offset: self.bottom_offset,
            total_size: self.total_size,
        }
    }
}

/// Output of the view stage, depending on the grid's mode.
#[derive(Debug)]
pub enum ViewOutput<T> {
    /// Virtualized mode.
    Window(VisibleWindow<T>),
    /// Paginated mode.
    Page(Page<T>, PageInfo),
}

/// A complete, consistent set of derived views.
///
/// Snapshots are immutable. The pipeline publishes a new one after every
/// recomputation and subscribers never see intermediate state.
#[derive(Debug)]
pub struct GridSnapshot<T> {
    /// Increases by one with every published snapshot.
    pub generation: u64,
    pub(crate) model: Arc<RowModel<T>>,
    pub(crate) filtered: Arc<Vec<usize>>,
    pub(crate) sorted: Arc<Vec<usize>>,
    pub(crate) facets: Arc<Facets>,
    /// Window or page, depending on the mode.
    pub view: ViewOutput<T>,
    /// Filters the views were computed from.
    pub filter_state: FilterState,
    /// Sort keys the views were computed from.
    pub sort_state: SortState,
    /// Column visibility.
    pub visibility: VisibilityState,
    /// Selected row ids.
    pub selection: Selection,
    /// Selected rows that pass the filters.
    pub selected_visible: usize,
    /// Problems met during this recomputation.
    pub warnings: Vec<GridWarning>,
}

impl<T> GridSnapshot<T> {
    /// Number of rows before filtering.
    pub fn row_count(&self) -> usize {
        self.model.len()
    }

    /// Number of rows passing the filters.
    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    /// Rows passing the filters, in original order.
    pub fn filtered_rows(&self) -> impl Iterator<Item = &Row<T>> {
        self.filtered.iter().map(|&i| &self.model.rows()[i])
    }

    /// Filtered rows in sorted order.
    pub fn sorted_rows(&self) -> impl Iterator<Item = &Row<T>> {
        self.sorted.iter().map(|&i| &self.model.rows()[i])
    }

    /// Sorted row at a window/page position.
    pub fn sorted_row(&self, index: usize) -> Option<&Row<T>> {
        self.sorted.get(index).map(|&i| &self.model.rows()[i])
    }

    /// Ids of the filtered rows, in sorted order.
    pub fn sorted_ids(&self) -> Vec<RowId> {
        self.sorted_rows().map(|r| r.id.clone()).collect()
    }

    /// All facets.
    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    /// Facet for one column.
    pub fn facet(&self, column: &str) -> Option<&Facet> {
        self.facets.get(column)
    }

    /// The scroll window, in virtualized mode.
    pub fn window(&self) -> Option<&VisibleWindow<T>> {
        match &self.view {
            ViewOutput::Window(window) => Some(window),
            ViewOutput::Page(..) => None,
        }
    }

    /// The current page, in paginated mode.
    pub fn page(&self) -> Option<&Page<T>> {
        match &self.view {
            ViewOutput::Page(page, _) => Some(page),
            ViewOutput::Window(_) => None,
        }
    }

    /// Page position, in paginated mode.
    pub fn page_info(&self) -> Option<PageInfo> {
        match &self.view {
            ViewOutput::Page(_, info) => Some(*info),
            ViewOutput::Window(_) => None,
        }
    }
}
