//! Table configuration types.

use std::time::Duration;

use super::selection::SelectionMode;

/// Quiet period before filter edits are committed.
pub const DEFAULT_FILTER_DEBOUNCE: Duration = Duration::from_millis(300);

/// Rows per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Per-table configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// How long filter edits must be quiet before they commit.
    pub debounce: Duration,

    /// Rows per page for a fresh table.
    pub default_page_size: usize,

    /// Page sizes offered by the pagination control.
    pub page_size_options: Vec<usize>,

    /// How rows can be selected.
    pub selection_mode: SelectionMode,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_FILTER_DEBOUNCE,
            default_page_size: DEFAULT_PAGE_SIZE,
            page_size_options: vec![10, 20, 50, 100],
            selection_mode: SelectionMode::Multi,
        }
    }
}

impl TableConfig {
    /// Set the filter debounce interval.
    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the default page size (zero is ignored).
    pub fn page_size(mut self, per_page: usize) -> Self {
        if per_page > 0 {
            self.default_page_size = per_page;
        }
        self
    }

    /// Set the offered page sizes.
    pub fn page_size_options(mut self, options: Vec<usize>) -> Self {
        self.page_size_options = options.into_iter().filter(|n| *n > 0).collect();
        self
    }

    /// Set the selection mode.
    pub fn selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }
}
