//! Row trait and the views the renderer reads.

use super::column::Alignment;
use super::query::{FilterValue, SortDirection};

/// Trait for items that can be displayed as rows in a table.
///
/// ```
/// use deskkit::table::TableRow;
///
/// #[derive(Clone)]
/// struct Locker {
///     id: u32,
///     site: String,
/// }
///
/// impl TableRow for Locker {
///     fn id(&self) -> String {
///         self.id.to_string()
///     }
///
///     fn cell(&self, column: &str) -> Option<String> {
///         match column {
///             "id" => Some(self.id.to_string()),
///             "site" => Some(self.site.clone()),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait TableRow: Clone {
    /// Unique identifier for this row.
    ///
    /// Used for stable selection across pages.
    fn id(&self) -> String;

    /// Display text for a column, `None` if the row has no such column.
    fn cell(&self, column: &str) -> Option<String>;
}

/// A visible header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub column: String,
    pub label: String,
    pub size: Option<u16>,
    pub align: Alignment,
    pub sortable: bool,
    pub filterable: bool,
    /// Active sort on this column.
    pub sort: Option<SortDirection>,
    /// Committed filter on this column.
    pub filter: Option<FilterValue>,
}

/// A rendered row: cells in visible-column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: String,
    pub selected: bool,
    pub cells: Vec<String>,
}
