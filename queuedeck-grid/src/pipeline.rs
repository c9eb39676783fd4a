//! Pipeline coordinator.
//!
//! [`GridPipeline`] owns every state slice of a grid. Discrete mutations
//! (filter edits, sort clicks, data refreshes) recompute
//! `filter -> sort -> facets -> page | window` immediately. Geometry events
//! (scroll, resize, measurement) are coalesced and recompute only the window,
//! once per [`GridPipeline::on_frame`]. Each recomputation publishes one
//! complete [`GridSnapshot`] to subscribers.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, error, trace};

use crate::cells::CellCache;
use crate::column::{Column, find_column};
use crate::config::{GridConfig, ViewMode};
use crate::error::{GridError, GridWarning, WarningSink, panic_message};
use crate::facet::{self, Facet, Facets};
use crate::filter;
use crate::frame::{FrameScheduler, PendingFrame};
use crate::pagination::{Page, PageInfo};
use crate::row::{RowId, RowModel};
use crate::selection::Selection;
use crate::snapshot::{GridSnapshot, ViewOutput, VisibleWindow};
use crate::sort;
use crate::state::{FilterState, FilterValue, SortDirection, SortState, VisibilityState};
use crate::virtualizer::{ScrollAlign, Virtualizer};

/// Handle returned by [`GridPipeline::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type Subscriber<T> = Box<dyn FnMut(&GridSnapshot<T>)>;

/// Owner of all grid state and the single point of recomputation.
pub struct GridPipeline<T> {
    columns: Vec<Column<T>>,
    identity: Option<usize>,
    mode: ViewMode,

    model: Arc<RowModel<T>>,
    filters: FilterState,
    sort: SortState,
    visibility: VisibilityState,
    selection: Selection,
    page_index: usize,
    page_size: usize,

    virtualizer: Virtualizer,
    /// Measured sizes by row id, so they survive re-sorts and refreshes.
    measured: HashMap<RowId, f64>,
    frames: FrameScheduler,

    filtered: Arc<Vec<usize>>,
    sorted: Arc<Vec<usize>>,
    facets: Arc<Facets>,
    /// Warnings raised between recomputations, surfaced with the next one.
    pending_warnings: Vec<GridWarning>,

    generation: u64,
    snapshot: Arc<GridSnapshot<T>>,
    subscribers: Vec<(SubscriptionId, Subscriber<T>)>,
    next_subscription: usize,
}

impl<T> fmt::Debug for GridPipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridPipeline")
            .field("columns", &self.columns.len())
            .field("rows", &self.model.len())
            .field("mode", &self.mode)
            .field("generation", &self.generation)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<T> GridPipeline<T> {
    /// Create an empty grid.
    ///
    /// Fails only on configuration errors: no columns, duplicate column ids
    /// or an identity column that is not among the columns.
    pub fn new(columns: Vec<Column<T>>, config: GridConfig) -> Result<Self, GridError> {
        Self::with_records(columns, config, Vec::new())
    }

    /// Create a grid and load its first records.
    pub fn with_records(
        mut columns: Vec<Column<T>>,
        config: GridConfig,
        records: Vec<T>,
    ) -> Result<Self, GridError> {
        if columns.is_empty() {
            return Err(GridError::NoColumns);
        }
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.id.as_str()) {
                return Err(GridError::DuplicateColumn(column.id.clone()));
            }
        }
        let identity = match &config.identity_column {
            Some(id) => Some(
                columns
                    .iter()
                    .position(|c| &c.id == id)
                    .ok_or_else(|| GridError::UnknownIdentityColumn(id.clone()))?,
            ),
            None => None,
        };
        if let Some(search) = &config.search_columns {
            for column in &mut columns {
                column.searchable = search.contains(&column.id);
            }
        }

        let mut pending_warnings = Vec::new();
        if config.page_size == 0 {
            pending_warnings.push(GridWarning::InvalidPageSize);
        }

        let mut visibility = VisibilityState::default();
        for column in columns.iter().filter(|c| !c.visible) {
            visibility.set(&column.id, false);
        }

        let mut sink = WarningSink::new();
        let model = Arc::new(RowModel::build(
            records,
            identity.map(|i| &columns[i]),
            &mut sink,
        ));
        pending_warnings.extend(sink.into_vec());

        let empty_snapshot = GridSnapshot {
            generation: 0,
            model: Arc::clone(&model),
            filtered: Arc::default(),
            sorted: Arc::default(),
            facets: Arc::default(),
            view: ViewOutput::Window(VisibleWindow::empty(0.0)),
            filter_state: FilterState::default(),
            sort_state: SortState::default(),
            visibility: visibility.clone(),
            selection: Selection::new(config.selection),
            selected_visible: 0,
            warnings: Vec::new(),
        };

        let mut pipeline = Self {
            columns,
            identity,
            mode: config.mode,
            model,
            filters: FilterState::default(),
            sort: SortState::default(),
            visibility,
            selection: Selection::new(config.selection),
            page_index: 0,
            page_size: config.page_size.max(1),
            virtualizer: Virtualizer::new(config.estimated_item_size, config.overscan),
            measured: HashMap::new(),
            frames: FrameScheduler::new(),
            filtered: Arc::default(),
            sorted: Arc::default(),
            facets: Arc::default(),
            pending_warnings,
            generation: 0,
            snapshot: Arc::new(empty_snapshot),
            subscribers: Vec::new(),
            next_subscription: 0,
        };
        pipeline.recompute();
        Ok(pipeline)
    }

    // -------------------------------------------------------------------------
    // Columns
    // -------------------------------------------------------------------------

    /// All column descriptors, in configured order.
    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    /// Columns currently visible, in configured order.
    pub fn visible_columns(&self) -> impl Iterator<Item = &Column<T>> {
        self.columns
            .iter()
            .filter(|c| self.visibility.is_visible(&c.id))
    }

    /// Show or hide a column. Unknown ids are ignored.
    pub fn set_column_visible(&mut self, column: &str, visible: bool) {
        if !self.has_column(column) {
            debug!("Ignoring visibility change for unknown column '{}'", column);
            return;
        }
        if self.visibility.set(column, visible) {
            self.recompute();
        }
    }

    fn has_column(&self, column: &str) -> bool {
        find_column(&self.columns, column).is_some()
    }

    // -------------------------------------------------------------------------
    // Records
    // -------------------------------------------------------------------------

    /// Replace the working set.
    ///
    /// Filters, sort keys, visibility and scroll position persist. Selected
    /// ids and measured sizes for rows that no longer exist are dropped.
    pub fn set_records(&mut self, records: Vec<T>) {
        let mut sink = WarningSink::new();
        let identity = self.identity.map(|i| &self.columns[i]);
        let model = RowModel::build(records, identity, &mut sink);
        self.pending_warnings.extend(sink.into_vec());

        let dropped = self.selection.retain(|id| model.contains(id));
        if dropped > 0 {
            debug!("Pruned {} selected ids after refresh", dropped);
        }
        self.measured.retain(|id, _| model.contains(id));

        self.model = Arc::new(model);
        self.recompute();
    }

    /// Number of rows before filtering.
    pub fn row_count(&self) -> usize {
        self.model.len()
    }

    // -------------------------------------------------------------------------
    // Filters
    // -------------------------------------------------------------------------

    /// Set a column filter. Unknown column ids are ignored.
    pub fn set_filter(&mut self, column: &str, value: impl Into<FilterValue>) {
        if !self.has_column(column) {
            debug!("Ignoring filter on unknown column '{}'", column);
            return;
        }
        self.filters.columns.insert(column.to_string(), value.into());
        self.recompute();
    }

    /// Remove a column filter.
    pub fn clear_filter(&mut self, column: &str) {
        if self.filters.columns.remove(column).is_some() {
            self.recompute();
        }
    }

    /// Set the global search text. An empty string clears it.
    pub fn set_global_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.filters.global = (!text.is_empty()).then_some(text);
        self.recompute();
    }

    /// Replace the whole filter state. Unknown column ids are dropped.
    pub fn set_filter_state(&mut self, mut state: FilterState) {
        state.columns.retain(|id, _| {
            let known = find_column(&self.columns, id).is_some();
            if !known {
                debug!("Dropping filter on unknown column '{}'", id);
            }
            known
        });
        self.filters = state;
        self.recompute();
    }

    /// Remove every filter and the global search.
    pub fn clear_filters(&mut self) {
        self.filters = FilterState::default();
        self.recompute();
    }

    /// Current filter state.
    pub fn filter_state(&self) -> &FilterState {
        &self.filters
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Sort by a column.
    ///
    /// Non-additive replaces the sort state; additive updates the column in
    /// place or appends it as the lowest-priority key. Unknown and
    /// non-sortable columns are ignored.
    pub fn set_sort(&mut self, column: &str, direction: SortDirection, additive: bool) {
        if !self.is_sortable(column) {
            return;
        }
        self.sort.set(column, direction, additive);
        self.recompute();
    }

    /// Cycle a column through ascending, descending and unsorted.
    pub fn toggle_sort(&mut self, column: &str, additive: bool) -> Option<SortDirection> {
        if !self.is_sortable(column) {
            return None;
        }
        let direction = self.sort.toggle(column, additive);
        self.recompute();
        direction
    }

    /// Replace the whole sort state. Unknown and non-sortable columns are dropped.
    pub fn set_sort_state(&mut self, mut state: SortState) {
        state.retain(|key| self.is_sortable(&key.column_id));
        self.sort = state;
        self.recompute();
    }

    /// Remove every sort key.
    pub fn clear_sort(&mut self) {
        self.sort.clear();
        self.recompute();
    }

    /// Current sort state.
    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    fn is_sortable(&self, column: &str) -> bool {
        match find_column(&self.columns, column) {
            Some(c) if c.sortable => true,
            Some(_) => {
                debug!("Ignoring sort on non-sortable column '{}'", column);
                false
            }
            None => {
                debug!("Ignoring sort on unknown column '{}'", column);
                false
            }
        }
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Toggle a row's selection.
    ///
    /// Ids not in the current record collection are ignored.
    pub fn toggle_selection(&mut self, id: RowId) {
        if !self.model.contains(&id) {
            debug!("Ignoring selection of unknown row {}", id);
            return;
        }
        if self.selection.toggle(id) {
            self.recompute();
        }
    }

    /// Select every given id that exists in the current record collection.
    pub fn select_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a RowId>) {
        let model = Arc::clone(&self.model);
        if self.selection.select_all(ids.into_iter().filter(|id| model.contains(id))) {
            self.recompute();
        }
    }

    /// Select every row passing the filters.
    pub fn select_all_filtered(&mut self) {
        let model = Arc::clone(&self.model);
        let filtered = Arc::clone(&self.filtered);
        self.select_all(filtered.iter().map(|&i| &model.rows()[i].id));
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        if self.selection.clear() {
            self.recompute();
        }
    }

    /// Current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Whether a row is selected.
    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selection.is_selected(id)
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Switch between virtualized and paginated output.
    pub fn set_mode(&mut self, mode: ViewMode) {
        if self.mode != mode {
            self.mode = mode;
            self.recompute();
        }
    }

    /// Current output mode.
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Go to a page. Out-of-range indices are clamped.
    pub fn set_page_index(&mut self, page_index: usize) {
        self.page_index = page_index;
        self.recompute();
    }

    /// Change the page size. Zero is replaced by 1 with a warning.
    pub fn set_page_size(&mut self, page_size: usize) {
        if page_size == 0 {
            self.pending_warnings.push(GridWarning::InvalidPageSize);
        }
        self.page_size = page_size.max(1);
        self.recompute();
    }

    /// Go to the next page, if any.
    pub fn next_page(&mut self) {
        let info = PageInfo::new(self.sorted.len(), self.page_index, self.page_size);
        if info.has_next() {
            self.set_page_index(info.page_index + 1);
        }
    }

    /// Go to the previous page, if any.
    pub fn previous_page(&mut self) {
        let info = PageInfo::new(self.sorted.len(), self.page_index, self.page_size);
        if info.has_previous() {
            self.set_page_index(info.page_index - 1);
        }
    }

    // -------------------------------------------------------------------------
    // Geometry (frame-coalesced)
    // -------------------------------------------------------------------------

    /// Record a new scroll offset. Applied on the next frame.
    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.frames.schedule_scroll(offset);
    }

    /// Record a new container size. Applied on the next frame.
    pub fn set_container_size(&mut self, size: f64) {
        self.frames.schedule_resize(size);
    }

    /// Report the rendered size of the row at a sorted position.
    ///
    /// The prefix sums are corrected right away; the window is recomputed on
    /// the next frame.
    pub fn report_measured_size(&mut self, index: usize, size: f64) {
        if !size.is_finite() || size < 0.0 {
            self.pending_warnings
                .push(GridWarning::InvalidMeasurement { index });
            return;
        }
        let Some(&position) = self.sorted.get(index) else {
            debug!("Ignoring measurement for out-of-range row {}", index);
            return;
        };
        let id = self.model.rows()[position].id.clone();
        self.measured.insert(id, size);
        if self.virtualizer.resize_item(index, size) {
            self.frames.schedule_measure();
        }
    }

    /// Scroll so the row at a sorted position is in view.
    pub fn scroll_to_index(&mut self, index: usize, align: ScrollAlign) {
        self.apply_pending_geometry();
        if let Some(offset) = self.virtualizer.offset_for_index(index, align) {
            self.frames.schedule_scroll(offset);
        }
    }

    /// Whether geometry changes are waiting for [`GridPipeline::on_frame`].
    pub fn has_pending_frame(&self) -> bool {
        self.frames.is_pending() || !self.pending_warnings.is_empty()
    }

    /// Run the coalesced window recomputation for this frame.
    ///
    /// Returns true if a snapshot was published.
    pub fn on_frame(&mut self) -> bool {
        if !self.has_pending_frame() {
            return false;
        }
        self.apply_pending_geometry();
        let warnings = std::mem::take(&mut self.pending_warnings);
        self.publish(warnings);
        true
    }

    /// Scroll offset after all pending events.
    pub fn scroll_offset(&self) -> f64 {
        self.frames
            .pending_scroll()
            .unwrap_or_else(|| self.virtualizer.scroll_offset())
    }

    /// The prefix-sum index over the sorted rows.
    pub fn virtualizer(&self) -> &Virtualizer {
        &self.virtualizer
    }

    fn apply_pending_geometry(&mut self) {
        if let Some(job) = self.frames.take() {
            self.apply_geometry(job);
        }
    }

    fn apply_geometry(&mut self, job: PendingFrame) {
        if let Some(size) = job.container_size {
            self.virtualizer.set_container_size(size);
        }
        if let Some(offset) = job.scroll_offset {
            self.virtualizer.set_scroll_offset(offset);
        }
        self.virtualizer.clamp_scroll_offset();
        trace!(
            "Applied frame job {} ({} events)",
            job.generation, job.events
        );
    }

    // -------------------------------------------------------------------------
    // Output
    // -------------------------------------------------------------------------

    /// The last published snapshot.
    pub fn snapshot(&self) -> Arc<GridSnapshot<T>> {
        Arc::clone(&self.snapshot)
    }

    /// Rows in the scroll window (virtualized mode).
    pub fn visible_window(&self) -> Option<VisibleWindow<T>> {
        self.snapshot.window().cloned()
    }

    /// Rows on the current page (paginated mode).
    pub fn page(&self) -> Option<Page<T>> {
        self.snapshot.page().cloned()
    }

    /// Facet counts for a filterable column.
    pub fn facets(&self, column: &str) -> Option<&Facet> {
        self.facets.get(column)
    }

    /// Number of selected rows that pass the filters.
    pub fn selected_visible_count(&self) -> usize {
        self.snapshot.selected_visible
    }

    /// Register a callback fired once per published snapshot.
    pub fn subscribe(&mut self, callback: impl FnMut(&GridSnapshot<T>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    // -------------------------------------------------------------------------
    // Recomputation
    // -------------------------------------------------------------------------

    /// Full recomputation after a discrete mutation.
    ///
    /// Any pending frame job is folded in first, so the published snapshot
    /// reflects the latest geometry and the stale job never runs.
    fn recompute(&mut self) {
        let started = Instant::now();
        self.apply_pending_geometry();

        let mut warnings = WarningSink::new();
        warnings.extend(std::mem::take(&mut self.pending_warnings));

        let model = Arc::clone(&self.model);
        let mut cells = CellCache::new(model.rows());
        let masks = filter::evaluate(&mut cells, &self.columns, &self.filters, &mut warnings);
        let filtered = masks.passing(model.len(), None);
        let sorted = sort::order(&mut cells, &filtered, &self.columns, &self.sort, &mut warnings);
        let facets = facet::from_masks(&mut cells, &masks, &self.columns, &mut warnings);

        self.filtered = Arc::new(filtered);
        self.sorted = Arc::new(sorted);
        self.facets = Arc::new(facets);

        let estimate = self.virtualizer.estimated_size();
        self.virtualizer.set_sizes(self.sorted.iter().map(|&i| {
            self.measured
                .get(&model.rows()[i].id)
                .copied()
                .unwrap_or(estimate)
        }));
        self.virtualizer.clamp_scroll_offset();

        trace!(
            "Recomputed {} -> {} rows in {:?}",
            model.len(),
            self.sorted.len(),
            started.elapsed()
        );
        self.publish(warnings.into_vec());
    }

    /// Build the view stage and publish a snapshot.
    fn publish(&mut self, warnings: Vec<GridWarning>) {
        let view = match self.mode {
            ViewMode::Virtualized => ViewOutput::Window(self.build_window()),
            ViewMode::Paginated => {
                let info = PageInfo::new(self.sorted.len(), self.page_index, self.page_size);
                if info.page_index != self.page_index {
                    debug!(
                        "Clamped page index {} -> {}",
                        self.page_index, info.page_index
                    );
                    self.page_index = info.page_index;
                }
                let rows = self.sorted[info.range()]
                    .iter()
                    .map(|&i| self.model.rows()[i].clone())
                    .collect();
                let page = Page {
                    rows,
                    page_index: info.page_index,
                    page_count: info.page_count,
                };
                ViewOutput::Page(page, info)
            }
        };

        let selected_visible = self
            .selection
            .count_in(self.filtered.iter().map(|&i| &self.model.rows()[i].id));

        self.generation += 1;
        let snapshot = Arc::new(GridSnapshot {
            generation: self.generation,
            model: Arc::clone(&self.model),
            filtered: Arc::clone(&self.filtered),
            sorted: Arc::clone(&self.sorted),
            facets: Arc::clone(&self.facets),
            view,
            filter_state: self.filters.clone(),
            sort_state: self.sort.clone(),
            visibility: self.visibility.clone(),
            selection: self.selection.clone(),
            selected_visible,
            warnings,
        });
        self.snapshot = Arc::clone(&snapshot);

        for (id, subscriber) in &mut self.subscribers {
            let result = panic::catch_unwind(AssertUnwindSafe(|| subscriber(&*snapshot)));
            if let Err(payload) = result {
                error!(
                    "Subscriber {:?} panicked: {}",
                    id,
                    panic_message(&payload)
                );
            }
        }
    }

    fn build_window(&self) -> VisibleWindow<T> {
        let layout = self.virtualizer.layout();
        let rows = layout
            .items
            .iter()
            .map(|item| self.model.rows()[self.sorted[item.index]].clone())
            .collect();
        VisibleWindow {
            rows,
            range: layout.range,
            items: layout.items,
            top_offset: layout.top_offset,
            bottom_offset: layout.bottom_offset,
            total_size: layout.total_size,
        }
    }
}
