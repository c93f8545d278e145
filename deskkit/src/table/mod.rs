//! Table state controller.
//!
//! Server-driven tables keep their rows on the server: the client only
//! tracks which page, sort and filters it wants, plus purely local layout
//! and selection. [`TableController`] owns that state and hands a
//! [`QueryIntent`] to a caller-supplied refetch callback whenever the
//! query changes.
//!
//! - Pagination, sorting, layout and selection update synchronously.
//! - Filter edits are debounced and commit as one change.
//! - Committed sort or filter changes always return to page 1.
//! - Column layout can be persisted through a [`SettingsProvider`](crate::settings::SettingsProvider).

mod column;
mod config;
mod controller;
mod error;
mod layout;
mod persist;
mod query;
mod row;
mod selection;
mod state;

pub use column::{Alignment, ColumnDef};
pub use config::{DEFAULT_FILTER_DEBOUNCE, DEFAULT_PAGE_SIZE, TableConfig};
pub use controller::{RefetchFn, TableController, TableControllerBuilder};
pub use error::TableError;
pub use layout::{ColumnLayout, LayoutSlice, reconcile_order};
pub use persist::LayoutPersistence;
pub use query::{
    ColumnFilter, ColumnSort, FilterValue, QueryIntent, RESERVED_PARAMS, RefetchRequest,
    RequestSeq, SortDirection,
};
pub use row::{HeaderView, RowView, TableRow};
pub use selection::{RowSelection, SelectionMode};
pub use state::{Pagination, TableState};
