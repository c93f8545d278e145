//! Column definitions.

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Column configuration.
///
/// Columns describe what the server list endpoint can do with a field
/// (filter it, sort by it) and how the column is laid out by default.
///
/// # Examples
///
/// ```
/// use deskkit::table::{Alignment, ColumnDef};
///
/// let columns = vec![
///     ColumnDef::new("id", "ID").size(80),
///     ColumnDef::new("name", "Name").sortable().filterable(),
///     ColumnDef::new("balance", "Balance").align(Alignment::Right).hidden(),
/// ];
/// assert!(columns[1].filterable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Stable identifier, also the query parameter name for filters and sort.
    pub id: String,
    /// Header text.
    pub header: String,
    /// Default width in pixels, if the column has a static size.
    pub size: Option<u16>,
    /// Horizontal alignment.
    pub align: Alignment,
    /// Whether the column takes part in server-side filtering.
    pub filterable: bool,
    /// Whether the server can sort by this column.
    pub sortable: bool,
    /// Whether the column is visible before any user preference applies.
    pub visible: bool,
}

impl ColumnDef {
    pub fn new(id: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            size: None,
            align: Alignment::Left,
            filterable: false,
            sortable: false,
            visible: true,
        }
    }

    /// Set the default width.
    pub fn size(mut self, size: u16) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the column alignment.
    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Mark the column as filterable.
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    /// Make the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Hide the column by default.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}
