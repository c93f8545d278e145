//! Column layout: order, visibility and sizing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::column::ColumnDef;

/// Which part of the layout changed, for targeted persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutSlice {
    Order,
    Visibility,
    Sizing,
}

impl LayoutSlice {
    pub const ALL: [LayoutSlice; 3] = [Self::Order, Self::Visibility, Self::Sizing];

    /// Suffix of the storage key for this slice.
    pub fn key_suffix(self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Visibility => "visibility",
            Self::Sizing => "sizing",
        }
    }
}

/// Order, visibility and pixel sizing of a table's columns.
///
/// A column missing from `visibility` is visible; a column missing from
/// `sizing` uses its natural width.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub order: Vec<String>,
    pub visibility: BTreeMap<String, bool>,
    pub sizing: BTreeMap<String, u16>,
}

impl ColumnLayout {
    /// Default layout derived from column definitions.
    pub fn from_columns(columns: &[ColumnDef]) -> Self {
        Self {
            order: columns.iter().map(|c| c.id.clone()).collect(),
            visibility: columns
                .iter()
                .filter(|c| !c.visible)
                .map(|c| (c.id.clone(), false))
                .collect(),
            sizing: columns
                .iter()
                .filter_map(|c| c.size.map(|size| (c.id.clone(), size)))
                .collect(),
        }
    }

    pub fn is_visible(&self, column: &str) -> bool {
        self.visibility.get(column).copied().unwrap_or(true)
    }

    pub fn size_of(&self, column: &str) -> Option<u16> {
        self.sizing.get(column).copied()
    }

    /// Visible column ids in display order.
    pub fn visible_ids(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .map(String::as_str)
            .filter(|id| self.is_visible(id))
    }

    /// Move a column to a new position, clamped to the end.
    ///
    /// Returns `false` if the column is not part of the order.
    pub fn move_column(&mut self, column: &str, to: usize) -> bool {
        let Some(from) = self.order.iter().position(|id| id == column) else {
            return false;
        };
        let id = self.order.remove(from);
        let to = to.min(self.order.len());
        self.order.insert(to, id);
        from != to
    }

    /// Make the layout agree with the current column definitions.
    ///
    /// Unknown ids are pruned everywhere; columns missing from the order
    /// are appended in definition order.
    pub fn reconcile(&mut self, columns: &[ColumnDef]) {
        self.order = reconcile_order(std::mem::take(&mut self.order), columns);
        self.visibility.retain(|id, _| columns.iter().any(|c| &c.id == id));
        self.sizing.retain(|id, _| columns.iter().any(|c| &c.id == id));
    }
}

/// Keep known ids from `saved` (first occurrence wins) and append any
/// column the saved order does not mention.
pub fn reconcile_order(saved: Vec<String>, columns: &[ColumnDef]) -> Vec<String> {
    let mut order: Vec<String> = Vec::with_capacity(columns.len());
    for id in saved {
        if columns.iter().any(|c| c.id == id) && !order.contains(&id) {
            order.push(id);
        }
    }
    for column in columns {
        if !order.contains(&column.id) {
            order.push(column.id.clone());
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("id", "ID").size(60),
            ColumnDef::new("name", "Name"),
            ColumnDef::new("phone", "Phone").hidden(),
        ]
    }

    #[test]
    fn test_defaults_from_columns() {
        let layout = ColumnLayout::from_columns(&columns());
        assert_eq!(layout.order, vec!["id", "name", "phone"]);
        assert!(!layout.is_visible("phone"));
        assert_eq!(layout.size_of("id"), Some(60));
        assert_eq!(layout.visible_ids().collect::<Vec<_>>(), vec!["id", "name"]);
    }

    #[test]
    fn test_reconcile_prunes_and_appends() {
        let saved = vec!["name".into(), "gone".into(), "name".into(), "id".into()];
        assert_eq!(
            reconcile_order(saved, &columns()),
            vec!["name", "id", "phone"]
        );
    }

    #[test]
    fn test_move_column_clamps() {
        let mut layout = ColumnLayout::from_columns(&columns());
        assert!(layout.move_column("id", 10));
        assert_eq!(layout.order, vec!["name", "phone", "id"]);
        assert!(!layout.move_column("missing", 0));
    }
}
