//! Table state controller.
//!
//! The controller owns every piece of client-side table state and turns
//! user interaction into a [`QueryIntent`] for the caller's refetch
//! callback. Pagination, sorting, layout and selection apply
//! synchronously; filter edits are buffered in a [`Debounce`] and commit
//! together once the input has been quiet for the configured interval.
//!
//! Refetch runs whenever the intent differs from the last one emitted and
//! the caller is not loading, so a single transition (or a
//! [`TableController::batch`]) emits at most once.

use std::sync::Arc;
use std::time::Instant;

use crate::clock::{Clock, SystemClock};
use crate::settings::SettingsProvider;
use crate::timer::Debounce;

use super::column::ColumnDef;
use super::config::TableConfig;
use super::error::TableError;
use super::layout::{ColumnLayout, LayoutSlice};
use super::persist::LayoutPersistence;
use super::query::{
    ColumnFilter, ColumnSort, FilterValue, QueryIntent, RESERVED_PARAMS, RefetchRequest, RequestSeq,
    SortDirection,
};
use super::row::{HeaderView, RowView, TableRow};
use super::state::{TableState, find_filter, upsert_filter};

/// Callback invoked with each new query intent.
pub type RefetchFn = Box<dyn FnMut(&RefetchRequest) + Send>;

/// Builder for [`TableController`].
pub struct TableControllerBuilder<R> {
    columns: Vec<ColumnDef>,
    config: TableConfig,
    initial: Option<TableState>,
    clock: Arc<dyn Clock>,
    persistence: Option<LayoutPersistence>,
    refetch: Option<RefetchFn>,
    is_loading: bool,
    page_count: Option<usize>,
    rows: Vec<R>,
}

impl<R: TableRow> TableControllerBuilder<R> {
    /// Set the table configuration.
    pub fn config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the initial state snapshot.
    ///
    /// Defaults to [`TableState::new`] for the columns and config.
    pub fn initial_state(mut self, state: TableState) -> Self {
        self.initial = Some(state);
        self
    }

    /// Use a specific clock for the filter debounce.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Persist column layout under `prefix`.
    pub fn persist(mut self, settings: SettingsProvider, prefix: impl Into<String>) -> Self {
        self.persistence = Some(LayoutPersistence::new(settings, prefix));
        self
    }

    /// Set the refetch callback.
    pub fn on_refetch(mut self, refetch: impl FnMut(&RefetchRequest) + Send + 'static) -> Self {
        self.refetch = Some(Box::new(refetch));
        self
    }

    /// Whether the caller is currently loading.
    pub fn loading(mut self, is_loading: bool) -> Self {
        self.is_loading = is_loading;
        self
    }

    /// Total pages, from the last server response.
    pub fn page_count(mut self, page_count: usize) -> Self {
        self.page_count = Some(page_count);
        self
    }

    /// Rows already loaded for the initial state.
    pub fn rows(mut self, rows: Vec<R>) -> Self {
        self.rows = rows;
        self
    }

    /// Mount the controller.
    ///
    /// Saved layout is read once here. Mounting does not call refetch; the
    /// initial intent is available from [`TableController::intent`].
    pub fn build(self) -> Result<TableController<R>, TableError> {
        for (i, column) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|c| c.id == column.id) {
                return Err(TableError::DuplicateColumn(column.id.clone()));
            }
            if column.filterable && RESERVED_PARAMS.contains(&column.id.as_str()) {
                return Err(TableError::ReservedColumn(column.id.clone()));
            }
        }

        let mut state = self
            .initial
            .unwrap_or_else(|| TableState::new(&self.columns, &self.config));
        validate_state(&state, &self.columns)?;
        state.pagination.page = state.pagination.page.max(1);
        if state.pagination.per_page == 0 {
            state.pagination.per_page = self.config.default_page_size.max(1);
        }
        state.layout.reconcile(&self.columns);
        let default_layout = state.layout.clone();

        if let Some(persistence) = &self.persistence {
            let applied = persistence.hydrate(&mut state.layout, &self.columns);
            log::debug!(
                "Hydrated {} layout slices for '{}'",
                applied,
                persistence.prefix()
            );
        }

        let mut controller = TableController {
            filter_debounce: Debounce::new(self.config.debounce),
            columns: self.columns,
            config: self.config,
            default_layout,
            last_emitted: QueryIntent {
                page: 0,
                per_page: 0,
                sort: None,
                filters: Default::default(),
            },
            state,
            clock: self.clock,
            persistence: self.persistence,
            refetch: self
                .refetch
                .unwrap_or_else(|| Box::new(|_: &RefetchRequest| {}) as RefetchFn),
            is_loading: self.is_loading,
            page_count: self.page_count,
            rows: self.rows,
            next_seq: 0,
            latest_seq: None,
            batch_depth: 0,
        };
        controller.last_emitted = controller.intent();
        Ok(controller)
    }
}

fn validate_state(state: &TableState, columns: &[ColumnDef]) -> Result<(), TableError> {
    if let Some(sort) = &state.sorting {
        let column = lookup(columns, &sort.column)?;
        if !column.sortable {
            return Err(TableError::NotSortable(column.id.clone()));
        }
    }
    for filter in &state.filters {
        let column = lookup(columns, &filter.column)?;
        if !column.filterable {
            return Err(TableError::NotFilterable(column.id.clone()));
        }
    }
    Ok(())
}

fn lookup<'a>(columns: &'a [ColumnDef], id: &str) -> Result<&'a ColumnDef, TableError> {
    columns
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| TableError::UnknownColumn(id.to_string()))
}

/// Client-side state of one table instance.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use deskkit::table::{ColumnDef, ColumnSort, TableController, TableRow};
///
/// #[derive(Clone)]
/// struct Driver { id: u32, name: String }
///
/// impl TableRow for Driver {
///     fn id(&self) -> String { self.id.to_string() }
///     fn cell(&self, column: &str) -> Option<String> {
///         (column == "name").then(|| self.name.clone())
///     }
/// }
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let mut table = TableController::<Driver>::builder(vec![
///     ColumnDef::new("name", "Name").sortable().filterable(),
/// ])
/// .on_refetch(move |request| sink.lock().unwrap().push(request.intent.clone()))
/// .build()
/// .unwrap();
///
/// table.set_page(3);
/// table.set_sort(Some(ColumnSort::asc("name"))).unwrap();
///
/// let seen = seen.lock().unwrap();
/// assert_eq!(seen.len(), 2);
/// assert_eq!(seen[1].page, 1);
/// ```
pub struct TableController<R> {
    columns: Vec<ColumnDef>,
    config: TableConfig,
    state: TableState,
    default_layout: ColumnLayout,
    filter_debounce: Debounce<Vec<ColumnFilter>>,
    clock: Arc<dyn Clock>,
    persistence: Option<LayoutPersistence>,
    refetch: RefetchFn,
    is_loading: bool,
    page_count: Option<usize>,
    rows: Vec<R>,
    last_emitted: QueryIntent,
    next_seq: u64,
    latest_seq: Option<RequestSeq>,
    batch_depth: usize,
}

impl<R> std::fmt::Debug for TableController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableController")
            .field("state", &self.state)
            .field("is_loading", &self.is_loading)
            .field("page_count", &self.page_count)
            .field("rows", &self.rows.len())
            .field("pending_filters", &self.filter_debounce.pending())
            .finish_non_exhaustive()
    }
}

impl<R: TableRow> TableController<R> {
    /// Start building a controller for the given columns.
    pub fn builder(columns: Vec<ColumnDef>) -> TableControllerBuilder<R> {
        TableControllerBuilder {
            columns,
            config: TableConfig::default(),
            initial: None,
            clock: Arc::new(SystemClock),
            persistence: None,
            refetch: None,
            is_loading: false,
            page_count: None,
            rows: Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // State access
    // -------------------------------------------------------------------------

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column(&self, id: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn page(&self) -> usize {
        self.state.pagination.page
    }

    pub fn per_page(&self) -> usize {
        self.state.pagination.per_page
    }

    /// Total pages, if a response has reported it.
    pub fn page_count(&self) -> Option<usize> {
        self.page_count
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn sorting(&self) -> Option<&ColumnSort> {
        self.state.sorting.as_ref()
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// The query the current state describes.
    pub fn intent(&self) -> QueryIntent {
        let filters = self
            .columns
            .iter()
            .filter(|c| c.filterable)
            .map(|c| (c.id.clone(), self.state.filter(&c.id).cloned()))
            .collect();
        QueryIntent {
            page: self.state.pagination.page,
            per_page: self.state.pagination.per_page,
            sort: self.state.sorting.clone(),
            filters,
        }
    }

    /// Visible headers in display order.
    pub fn headers(&self) -> Vec<HeaderView> {
        self.state
            .layout
            .visible_ids()
            .filter_map(|id| self.column(id))
            .map(|column| HeaderView {
                column: column.id.clone(),
                label: column.header.clone(),
                size: self.state.layout.size_of(&column.id).or(column.size),
                align: column.align,
                sortable: column.sortable,
                filterable: column.filterable,
                sort: self
                    .state
                    .sorting
                    .as_ref()
                    .filter(|s| s.column == column.id)
                    .map(|s| s.direction),
                filter: self.state.filter(&column.id).cloned(),
            })
            .collect()
    }

    /// Current rows with cells in visible-column order.
    pub fn row_views(&self) -> Vec<RowView> {
        let visible: Vec<&str> = self.state.layout.visible_ids().collect();
        self.rows
            .iter()
            .map(|row| {
                let id = row.id();
                RowView {
                    selected: self.state.selection.is_selected(&id),
                    cells: visible
                        .iter()
                        .map(|column| row.cell(column).unwrap_or_default())
                        .collect(),
                    id,
                }
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Request sequencing
    // -------------------------------------------------------------------------

    /// Sequence number of the most recent refetch.
    pub fn latest_request(&self) -> Option<RequestSeq> {
        self.latest_seq
    }

    /// Whether a response for `seq` is still wanted.
    pub fn is_latest(&self, seq: RequestSeq) -> bool {
        self.latest_seq == Some(seq)
    }

    /// Apply a server response if it answers the latest request.
    ///
    /// Stale responses are dropped and `false` is returned. Accepting a
    /// response clears the loading flag.
    pub fn apply_response(&mut self, seq: RequestSeq, rows: Vec<R>, page_count: usize) -> bool {
        if !self.is_latest(seq) {
            log::debug!("Dropping stale response {} (latest {:?})", seq, self.latest_seq);
            return false;
        }
        self.rows = rows;
        self.page_count = Some(page_count);
        self.set_loading(false);
        true
    }

    /// Refetch the current intent even though it has not changed.
    ///
    /// Used for the first load after mount and for retries. Ignores the
    /// loading flag, and any earlier request becomes stale.
    pub fn reload(&mut self) -> RequestSeq {
        self.emit(self.intent())
    }

    // -------------------------------------------------------------------------
    // Caller inputs
    // -------------------------------------------------------------------------

    /// Update the caller's loading flag.
    ///
    /// Refetch is suppressed while loading. When loading ends, any state
    /// change made in the meantime is emitted once.
    pub fn set_loading(&mut self, is_loading: bool) {
        if self.is_loading == is_loading {
            return;
        }
        self.is_loading = is_loading;
        if !is_loading {
            self.sync();
        }
    }

    /// Update the total page count.
    pub fn set_page_count(&mut self, page_count: usize) {
        self.page_count = Some(page_count);
    }

    /// Replace the current rows.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Go to a page, clamped to `1..=page_count` when the count is known.
    pub fn set_page(&mut self, page: usize) -> bool {
        let max = self.page_count.map(|n| n.max(1)).unwrap_or(usize::MAX);
        let page = page.clamp(1, max);
        if page == self.state.pagination.page {
            return false;
        }
        self.state.pagination.page = page;
        self.sync();
        true
    }

    pub fn can_next_page(&self) -> bool {
        self.page_count
            .is_none_or(|count| self.state.pagination.page < count)
    }

    pub fn can_previous_page(&self) -> bool {
        self.state.pagination.page > 1
    }

    pub fn next_page(&mut self) -> bool {
        self.can_next_page() && self.set_page(self.state.pagination.page + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        self.can_previous_page() && self.set_page(self.state.pagination.page - 1)
    }

    pub fn first_page(&mut self) -> bool {
        self.set_page(1)
    }

    /// Go to the last known page. No-op until a page count is known.
    pub fn last_page(&mut self) -> bool {
        match self.page_count {
            Some(count) => self.set_page(count),
            None => false,
        }
    }

    /// Change rows per page. Always returns to the first page.
    pub fn set_page_size(&mut self, per_page: usize) -> Result<bool, TableError> {
        if per_page == 0 {
            return Err(TableError::InvalidPageSize);
        }
        if per_page == self.state.pagination.per_page {
            return Ok(false);
        }
        self.state.pagination.per_page = per_page;
        self.state.pagination.page = 1;
        self.sync();
        Ok(true)
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Set or clear the sort. A change returns to the first page at once.
    pub fn set_sort(&mut self, sort: Option<ColumnSort>) -> Result<bool, TableError> {
        if let Some(sort) = &sort {
            let column = self.require_column(&sort.column)?;
            if !column.sortable {
                return Err(TableError::NotSortable(column.id.clone()));
            }
        }
        if sort == self.state.sorting {
            return Ok(false);
        }
        self.state.sorting = sort;
        self.state.pagination.page = 1;
        self.sync();
        Ok(true)
    }

    /// Cycle a column through ascending, descending and unsorted.
    pub fn toggle_sort(&mut self, column: &str) -> Result<Option<SortDirection>, TableError> {
        let next = match &self.state.sorting {
            Some(current) if current.column == column => match current.direction {
                SortDirection::Asc => Some(SortDirection::Desc),
                SortDirection::Desc => None,
            },
            _ => Some(SortDirection::Asc),
        };
        self.set_sort(next.map(|direction| ColumnSort {
            column: column.to_string(),
            direction,
        }))?;
        Ok(next)
    }

    // -------------------------------------------------------------------------
    // Filters
    // -------------------------------------------------------------------------

    /// Edit a column filter. The edit commits after the debounce interval;
    /// blank values remove the filter.
    pub fn set_filter(
        &mut self,
        column: &str,
        value: impl Into<FilterValue>,
    ) -> Result<(), TableError> {
        self.require_filterable(column)?;
        let mut draft = self.draft_filters();
        match value.into().normalize() {
            Some(value) => upsert_filter(&mut draft, column.to_string(), value),
            None => draft.retain(|f| f.column != column),
        }
        self.schedule_filters(draft);
        Ok(())
    }

    /// Remove a column filter, debounced like any other edit.
    pub fn clear_filter(&mut self, column: &str) -> Result<(), TableError> {
        self.require_filterable(column)?;
        let mut draft = self.draft_filters();
        draft.retain(|f| f.column != column);
        self.schedule_filters(draft);
        Ok(())
    }

    /// Remove every filter, debounced.
    pub fn clear_filters(&mut self) {
        self.schedule_filters(Vec::new());
    }

    /// The value a filter input should show, including uncommitted edits.
    pub fn pending_filter(&self, column: &str) -> Option<&FilterValue> {
        match self.filter_debounce.pending() {
            Some(draft) => find_filter(draft, column),
            None => self.state.filter(column),
        }
    }

    /// Whether filter edits are waiting for the quiet period.
    pub fn has_pending_filters(&self) -> bool {
        self.filter_debounce.is_pending()
    }

    /// When pending filter edits will commit.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.filter_debounce.deadline()
    }

    /// Commit pending filter edits whose quiet period has elapsed.
    ///
    /// Event loops call this when [`next_deadline`](Self::next_deadline)
    /// passes. Returns `true` if the committed filters changed.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        match self.filter_debounce.poll(now) {
            Some(draft) => self.commit_filter_draft(draft),
            None => false,
        }
    }

    /// Commit pending filter edits now, skipping the rest of the quiet period.
    pub fn commit_filters(&mut self) -> bool {
        match self.filter_debounce.flush() {
            Some(draft) => self.commit_filter_draft(draft),
            None => false,
        }
    }

    fn draft_filters(&self) -> Vec<ColumnFilter> {
        self.filter_debounce
            .pending()
            .cloned()
            .unwrap_or_else(|| self.state.filters.clone())
    }

    fn schedule_filters(&mut self, draft: Vec<ColumnFilter>) {
        let now = self.clock.now();
        if self.filter_debounce.schedule(draft, now) {
            log::trace!("Filter edit replaced pending commit");
        }
    }

    fn commit_filter_draft(&mut self, draft: Vec<ColumnFilter>) -> bool {
        if draft == self.state.filters {
            return false;
        }
        log::debug!("Committing {} column filters", draft.len());
        self.state.filters = draft;
        self.state.pagination.page = 1;
        self.sync();
        true
    }

    // -------------------------------------------------------------------------
    // Column layout
    // -------------------------------------------------------------------------

    pub fn set_column_visibility(&mut self, column: &str, visible: bool) -> Result<bool, TableError> {
        self.require_column(column)?;
        if self.state.layout.is_visible(column) == visible {
            return Ok(false);
        }
        self.state
            .layout
            .visibility
            .insert(column.to_string(), visible);
        self.persist(LayoutSlice::Visibility);
        Ok(true)
    }

    pub fn toggle_column_visibility(&mut self, column: &str) -> Result<bool, TableError> {
        let visible = self.state.layout.is_visible(column);
        self.set_column_visibility(column, !visible)?;
        Ok(!visible)
    }

    /// Replace the column order. Unknown ids are dropped and missing
    /// columns are appended.
    pub fn set_column_order(&mut self, order: Vec<String>) -> bool {
        let order = super::layout::reconcile_order(order, &self.columns);
        if order == self.state.layout.order {
            return false;
        }
        self.state.layout.order = order;
        self.persist(LayoutSlice::Order);
        true
    }

    pub fn move_column(&mut self, column: &str, to: usize) -> Result<bool, TableError> {
        self.require_column(column)?;
        let moved = self.state.layout.move_column(column, to);
        if moved {
            self.persist(LayoutSlice::Order);
        }
        Ok(moved)
    }

    pub fn set_column_size(&mut self, column: &str, size: u16) -> Result<bool, TableError> {
        self.require_column(column)?;
        if self.state.layout.size_of(column) == Some(size) {
            return Ok(false);
        }
        self.state.layout.sizing.insert(column.to_string(), size);
        self.persist(LayoutSlice::Sizing);
        Ok(true)
    }

    /// Return every column to its default width.
    pub fn reset_column_sizing(&mut self) {
        if self.state.layout.sizing == self.default_layout.sizing {
            return;
        }
        self.state.layout.sizing = self.default_layout.sizing.clone();
        self.persist(LayoutSlice::Sizing);
    }

    /// Restore the mount-time layout and forget the saved one.
    pub fn reset_layout(&mut self) {
        self.state.layout = self.default_layout.clone();
        if let Some(persistence) = &self.persistence {
            persistence.clear();
        }
    }

    fn persist(&self, slice: LayoutSlice) {
        if let Some(persistence) = &self.persistence {
            persistence.save(&self.state.layout, slice);
        }
    }

    // -------------------------------------------------------------------------
    // Row selection
    // -------------------------------------------------------------------------

    pub fn set_row_selected(&mut self, row: &str, selected: bool) -> bool {
        self.state.selection.set(row, selected)
    }

    pub fn toggle_row_selected(&mut self, row: &str) -> bool {
        self.state.selection.toggle(row)
    }

    /// Select every row on the current page. Returns how many were added.
    pub fn select_all_rows(&mut self) -> usize {
        let ids: Vec<String> = self.rows.iter().map(TableRow::id).collect();
        ids.iter()
            .filter(|id| self.state.selection.set(id, true))
            .count()
    }

    pub fn clear_selection(&mut self) -> bool {
        self.state.selection.clear()
    }

    pub fn selected_row_ids(&self) -> Vec<String> {
        self.state.selection.selected_ids()
    }

    // -------------------------------------------------------------------------
    // Emission
    // -------------------------------------------------------------------------

    /// Apply several mutations as one transition.
    ///
    /// Refetch runs at most once, after `f` returns.
    pub fn batch<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let result = {
            let mut guard = BatchGuard::enter(self);
            f(&mut *guard)
        };
        if self.batch_depth == 0 {
            self.sync();
        }
        result
    }

    /// Emit the current intent if it changed since the last emission.
    fn sync(&mut self) {
        if self.batch_depth > 0 || self.is_loading {
            return;
        }
        let intent = self.intent();
        if intent == self.last_emitted {
            return;
        }
        self.emit(intent);
    }

    fn emit(&mut self, intent: QueryIntent) -> RequestSeq {
        self.next_seq += 1;
        let seq = RequestSeq::new(self.next_seq);
        log::trace!("Refetch {}: {}", seq, intent.to_json());
        self.last_emitted = intent.clone();
        self.latest_seq = Some(seq);
        (self.refetch)(&RefetchRequest { seq, intent });
        seq
    }

    fn require_column(&self, id: &str) -> Result<&ColumnDef, TableError> {
        lookup(&self.columns, id)
    }

    fn require_filterable(&self, id: &str) -> Result<&ColumnDef, TableError> {
        let column = self.require_column(id)?;
        if !column.filterable {
            return Err(TableError::NotFilterable(id.to_string()));
        }
        Ok(column)
    }
}

/// Holds one level of batch depth; released even if the batch unwinds.
struct BatchGuard<'a, R> {
    table: &'a mut TableController<R>,
}

impl<'a, R> BatchGuard<'a, R> {
    fn enter(table: &'a mut TableController<R>) -> Self {
        table.batch_depth += 1;
        Self { table }
    }
}

impl<R> std::ops::Deref for BatchGuard<'_, R> {
    type Target = TableController<R>;

    fn deref(&self) -> &Self::Target {
        self.table
    }
}

impl<R> std::ops::DerefMut for BatchGuard<'_, R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.table
    }
}

impl<R> Drop for BatchGuard<'_, R> {
    fn drop(&mut self) {
        self.table.batch_depth -= 1;
    }
}

impl<R> Drop for TableController<R> {
    fn drop(&mut self) {
        if self.filter_debounce.cancel().is_some() {
            log::debug!("Discarded pending filter edit on unmount");
        }
    }
}
