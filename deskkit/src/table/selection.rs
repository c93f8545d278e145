//! Row selection keyed by row id.

use std::collections::BTreeMap;

/// Selection mode for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// No selection allowed.
    None,
    /// Single row selection (radio-button style).
    Single,
    /// Multiple rows can be selected (checkbox style).
    #[default]
    Multi,
}

/// Tracks selected rows by id.
///
/// Selection survives pagination because it is keyed by row id, not by
/// position. It is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection {
    pub mode: SelectionMode,
    selected: BTreeMap<String, bool>,
}

impl RowSelection {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            selected: BTreeMap::new(),
        }
    }

    /// Set the selection flag for a row. Returns true if selection changed.
    pub fn set(&mut self, row: &str, selected: bool) -> bool {
        match self.mode {
            SelectionMode::None => false,
            _ if !selected => self.selected.remove(row).is_some(),
            _ if self.is_selected(row) => false,
            SelectionMode::Single => {
                self.selected.clear();
                self.selected.insert(row.to_string(), true);
                true
            }
            SelectionMode::Multi => {
                self.selected.insert(row.to_string(), true);
                true
            }
        }
    }

    /// Toggle selection for a row. Returns true if selection changed.
    pub fn toggle(&mut self, row: &str) -> bool {
        let selected = self.is_selected(row);
        self.set(row, !selected)
    }

    pub fn is_selected(&self, row: &str) -> bool {
        self.selected.get(row).copied().unwrap_or(false)
    }

    /// Clear all selections.
    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    /// Selected row ids, sorted.
    pub fn selected_ids(&self) -> Vec<String> {
        self.selected
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.selected.values().filter(|selected| **selected).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
