//! Column layout persistence.
//!
//! Each layout slice lives under its own key, `<prefix>.order`,
//! `<prefix>.visibility` and `<prefix>.sizing`, so one unreadable value
//! only resets that slice. Storage problems never reach the caller: the
//! table keeps working with in-memory layout for the session.

use std::collections::BTreeMap;

use crate::settings::SettingsProvider;

use super::column::ColumnDef;
use super::layout::{ColumnLayout, LayoutSlice, reconcile_order};

/// Reads and writes one table's layout under a key prefix.
#[derive(Debug, Clone)]
pub struct LayoutPersistence {
    settings: SettingsProvider,
    prefix: String,
}

impl LayoutPersistence {
    pub fn new(settings: SettingsProvider, prefix: impl Into<String>) -> Self {
        Self {
            settings,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Storage key for one slice.
    pub fn key(&self, slice: LayoutSlice) -> String {
        format!("{}.{}", self.prefix, slice.key_suffix())
    }

    /// Apply saved slices on top of `layout`. Returns how many applied.
    pub fn hydrate(&self, layout: &mut ColumnLayout, columns: &[ColumnDef]) -> usize {
        let known = |id: &String| columns.iter().any(|c| &c.id == id);
        let mut applied = 0;

        if let Some(order) = self.load::<Vec<String>>(LayoutSlice::Order) {
            layout.order = reconcile_order(order, columns);
            applied += 1;
        }
        if let Some(visibility) = self.load::<BTreeMap<String, bool>>(LayoutSlice::Visibility) {
            layout
                .visibility
                .extend(visibility.into_iter().filter(|(id, _)| known(id)));
            applied += 1;
        }
        if let Some(sizing) = self.load::<BTreeMap<String, u16>>(LayoutSlice::Sizing) {
            layout
                .sizing
                .extend(sizing.into_iter().filter(|(id, _)| known(id)));
            applied += 1;
        }

        applied
    }

    /// Write one slice back.
    pub fn save(&self, layout: &ColumnLayout, slice: LayoutSlice) {
        let key = self.key(slice);
        let result = match slice {
            LayoutSlice::Order => self.settings.set(&key, &layout.order),
            LayoutSlice::Visibility => self.settings.set(&key, &layout.visibility),
            LayoutSlice::Sizing => self.settings.set(&key, &layout.sizing),
        };
        if let Err(e) = result {
            log::warn!("Layout not saved to {}: {}", key, e);
        }
    }

    /// Forget every saved slice.
    pub fn clear(&self) {
        for slice in LayoutSlice::ALL {
            let key = self.key(slice);
            if let Err(e) = self.settings.delete(&key) {
                log::debug!("Layout key {} not removed: {}", key, e);
            }
        }
    }

    fn load<T: serde::de::DeserializeOwned>(&self, slice: LayoutSlice) -> Option<T> {
        let key = self.key(slice);
        match self.settings.get::<T>(&key) {
            Ok(value) => value,
            Err(e) => {
                log::debug!("Ignoring saved layout {}: {}", key, e);
                None
            }
        }
    }
}
