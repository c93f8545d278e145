//! Item registration.
//!
//! Menu items and select options are registered into their root rather
//! than passed as a list, so callers can include or leave out entries with
//! ordinary control flow. The registration lives exactly as long as its
//! [`ItemHandle`].

use std::fmt;
use std::sync::Arc;

use super::ShellError;
use super::root::ShellScope;

/// Callback run when a menu item is activated. Receives the item value.
pub type SelectFn = Arc<dyn Fn(&str) + Send + Sync>;

/// Identifier of one registration, unique within its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u64);

impl ItemId {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__item_{}", self.0)
    }
}

/// Visual variant of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemVariant {
    #[default]
    Default,
    Destructive,
}

/// Props of a menu item or select option.
#[derive(Clone)]
pub struct ItemProps {
    pub value: String,
    pub label: String,
    pub variant: ItemVariant,
    pub disabled: bool,
    pub hidden: bool,
    pub on_select: Option<SelectFn>,
}

impl fmt::Debug for ItemProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemProps")
            .field("value", &self.value)
            .field("label", &self.label)
            .field("variant", &self.variant)
            .field("disabled", &self.disabled)
            .field("hidden", &self.hidden)
            .field("on_select", &self.on_select.is_some())
            .finish()
    }
}

impl ItemProps {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            variant: ItemVariant::Default,
            disabled: false,
            hidden: false,
            on_select: None,
        }
    }

    /// Render with the destructive variant.
    pub fn destructive(mut self) -> Self {
        self.variant = ItemVariant::Destructive;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Keep the registration but leave the item out of rendered content.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Run `f` when the item is activated.
    pub fn on_select(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_select = Some(Arc::new(f));
        self
    }
}

/// An item as stored in its root.
#[derive(Debug, Clone)]
pub(crate) struct RegisteredItem {
    pub id: ItemId,
    pub props: ItemProps,
}

/// A live registration. Dropping it removes the item from its root.
#[derive(Debug)]
pub struct ItemHandle {
    id: ItemId,
    scope: ShellScope,
}

impl ItemHandle {
    pub(crate) fn new(id: ItemId, scope: ShellScope) -> Self {
        Self { id, scope }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Replace the item's props, keeping its position.
    pub fn update(&self, props: ItemProps) -> Result<(), ShellError> {
        self.modify(|item| item.props = props)
    }

    /// Show or hide the item without unregistering it.
    pub fn set_hidden(&self, hidden: bool) -> Result<(), ShellError> {
        self.modify(|item| item.props.hidden = hidden)
    }

    pub fn set_disabled(&self, disabled: bool) -> Result<(), ShellError> {
        self.modify(|item| item.props.disabled = disabled)
    }

    fn modify(&self, f: impl FnOnce(&mut RegisteredItem)) -> Result<(), ShellError> {
        self.scope.write("Item", |inner| {
            if let Some(item) = inner.items.iter_mut().find(|item| item.id == self.id) {
                f(item);
            }
        })
    }
}

impl Drop for ItemHandle {
    fn drop(&mut self) {
        let id = self.id;
        self.scope
            .write_if_attached(|inner| inner.items.retain(|item| item.id != id));
    }
}
