//! Table state snapshot.

use super::column::ColumnDef;
use super::config::TableConfig;
use super::layout::ColumnLayout;
use super::query::{ColumnFilter, ColumnSort, FilterValue};
use super::selection::RowSelection;

/// Current page and page size. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

/// Everything a table instance tracks on the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    pub pagination: Pagination,
    pub sorting: Option<ColumnSort>,
    /// Committed filters, in the order they were first applied.
    pub filters: Vec<ColumnFilter>,
    pub layout: ColumnLayout,
    pub selection: RowSelection,
}

impl TableState {
    /// Default state for a set of columns.
    pub fn new(columns: &[ColumnDef], config: &TableConfig) -> Self {
        Self {
            pagination: Pagination {
                page: 1,
                per_page: config.default_page_size,
            },
            sorting: None,
            filters: Vec::new(),
            layout: ColumnLayout::from_columns(columns),
            selection: RowSelection::new(config.selection_mode),
        }
    }

    /// Start on a specific page.
    pub fn with_page(mut self, page: usize) -> Self {
        self.pagination.page = page.max(1);
        self
    }

    /// Start with a specific page size (zero is ignored).
    pub fn with_page_size(mut self, per_page: usize) -> Self {
        if per_page > 0 {
            self.pagination.per_page = per_page;
        }
        self
    }

    /// Start sorted.
    pub fn with_sort(mut self, sort: ColumnSort) -> Self {
        self.sorting = Some(sort);
        self
    }

    /// Start with a committed filter.
    pub fn with_filter(mut self, column: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        let column = column.into();
        match value.into().normalize() {
            Some(value) => upsert_filter(&mut self.filters, column, value),
            None => self.filters.retain(|f| f.column != column),
        }
        self
    }

    /// Start with a specific column layout.
    pub fn with_layout(mut self, layout: ColumnLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Committed filter value for a column.
    pub fn filter(&self, column: &str) -> Option<&FilterValue> {
        find_filter(&self.filters, column)
    }
}

pub(crate) fn find_filter<'a>(filters: &'a [ColumnFilter], column: &str) -> Option<&'a FilterValue> {
    filters
        .iter()
        .find(|f| f.column == column)
        .map(|f| &f.value)
}

/// Replace a column's filter in place, or append it.
pub(crate) fn upsert_filter(filters: &mut Vec<ColumnFilter>, column: String, value: FilterValue) {
    match filters.iter_mut().find(|f| f.column == column) {
        Some(existing) => existing.value = value,
        None => filters.push(ColumnFilter { column, value }),
    }
}
