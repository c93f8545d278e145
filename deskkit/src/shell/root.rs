//! Shell root state and the scope handed to its parts.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use super::ShellError;
use super::item::{ItemHandle, ItemId, ItemProps, RegisteredItem};
use super::viewport::{DeviceClass, DeviceClassSource};

/// Callback for select value changes. `None` means the selection was cleared.
pub type ChangeFn = Arc<dyn Fn(Option<&str>) + Send + Sync>;

/// Callback for open-state changes.
pub type OpenChangeFn = Arc<dyn Fn(bool) + Send + Sync>;

/// Which compound component a shell implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellKind {
    Dialog,
    Menu,
    Select,
}

/// Shared state of one mounted shell.
pub(crate) struct ShellInner {
    pub kind: ShellKind,
    pub open: bool,
    pub disabled: bool,
    pub title: Option<String>,
    pub description: Option<String>,
    pub placeholder: Option<String>,
    pub show_close_button: bool,
    pub value: Option<String>,
    pub on_change: Option<ChangeFn>,
    pub on_open_change: Option<OpenChangeFn>,
    /// Registered items in registration order.
    pub items: Vec<RegisteredItem>,
    /// Per-root id counter for item registrations.
    pub next_item_id: u64,
}

impl ShellInner {
    fn new(kind: ShellKind) -> Self {
        Self {
            kind,
            open: false,
            disabled: false,
            title: None,
            description: None,
            placeholder: None,
            show_close_button: true,
            value: None,
            on_change: None,
            on_open_change: None,
            items: Vec::new(),
            next_item_id: 0,
        }
    }

    /// Items that should render, in registration order.
    pub fn visible_items(&self) -> impl Iterator<Item = &RegisteredItem> {
        self.items.iter().filter(|item| !item.props.hidden)
    }
}

/// Snapshot of the state every part reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellContext {
    pub kind: ShellKind,
    pub is_open: bool,
    pub is_mobile: bool,
    pub disabled: bool,
}

impl ShellContext {
    pub fn device(&self) -> DeviceClass {
        if self.is_mobile {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }
}

/// The root of a responsive shell.
///
/// Owns the shared state. Parts get a [`ShellScope`] from
/// [`scope`](Self::scope); once the root is dropped every scope is
/// detached and its parts fail with [`ShellError::OutsideRoot`].
pub struct ShellRoot {
    inner: Arc<RwLock<ShellInner>>,
    device: Arc<dyn DeviceClassSource>,
}

impl std::fmt::Debug for ShellRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellRoot")
            .field("context", &self.context())
            .finish_non_exhaustive()
    }
}

impl ShellRoot {
    fn new(kind: ShellKind, device: Arc<dyn DeviceClassSource>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ShellInner::new(kind))),
            device,
        }
    }

    /// A modal dialog on desktop, a drawer on mobile.
    pub fn dialog(device: Arc<dyn DeviceClassSource>) -> Self {
        Self::new(ShellKind::Dialog, device)
    }

    /// A dropdown menu on desktop, a bottom sheet on mobile.
    pub fn menu(device: Arc<dyn DeviceClassSource>) -> Self {
        Self::new(ShellKind::Menu, device)
    }

    /// An anchored select on desktop, a bottom sheet on mobile.
    pub fn select(device: Arc<dyn DeviceClassSource>) -> Self {
        Self::new(ShellKind::Select, device)
    }

    /// Set the dialog or drawer title.
    pub fn title(self, title: impl Into<String>) -> Self {
        self.write().title = Some(title.into());
        self
    }

    /// Set the dialog description.
    pub fn description(self, description: impl Into<String>) -> Self {
        self.write().description = Some(description.into());
        self
    }

    /// Whether the dialog renders its own close button.
    pub fn show_close_button(self, show: bool) -> Self {
        self.write().show_close_button = show;
        self
    }

    /// Text shown by a select trigger with nothing selected.
    pub fn placeholder(self, placeholder: impl Into<String>) -> Self {
        self.write().placeholder = Some(placeholder.into());
        self
    }

    /// Initial select value.
    pub fn value(self, value: impl Into<String>) -> Self {
        self.write().value = Some(value.into());
        self
    }

    /// Called whenever activation changes the select value.
    pub fn on_change(self, f: impl Fn(Option<&str>) + Send + Sync + 'static) -> Self {
        self.write().on_change = Some(Arc::new(f));
        self
    }

    /// Called whenever the shell opens or closes.
    pub fn on_open_change(self, f: impl Fn(bool) + Send + Sync + 'static) -> Self {
        self.write().on_open_change = Some(Arc::new(f));
        self
    }

    /// Start disabled.
    pub fn disabled(self, disabled: bool) -> Self {
        self.write().disabled = disabled;
        self
    }

    /// Handle for the shell's parts.
    pub fn scope(&self) -> ShellScope {
        ShellScope {
            inner: Arc::downgrade(&self.inner),
            device: Arc::clone(&self.device),
        }
    }

    pub fn context(&self) -> ShellContext {
        context_of(&self.read(), self.device.as_ref())
    }

    pub fn kind(&self) -> ShellKind {
        self.read().kind
    }

    pub fn is_open(&self) -> bool {
        self.read().open
    }

    pub fn open(&self) -> bool {
        set_open(&self.inner, true)
    }

    pub fn close(&self) -> bool {
        set_open(&self.inner, false)
    }

    /// Open or close. Opening a disabled shell does nothing.
    pub fn set_open(&self, open: bool) -> bool {
        set_open(&self.inner, open)
    }

    /// Disabling an open shell closes it.
    pub fn set_disabled(&self, disabled: bool) {
        self.write().disabled = disabled;
        if disabled {
            self.close();
        }
    }

    /// Current select value.
    pub fn selected(&self) -> Option<String> {
        self.read().value.clone()
    }

    /// Set the select value without running `on_change`.
    pub fn set_selected(&self, value: Option<String>) {
        self.write().value = value;
    }

    /// Number of registered items, hidden ones included.
    pub fn registered_items(&self) -> usize {
        self.read().items.len()
    }

    fn read(&self) -> RwLockReadGuard<'_, ShellInner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ShellInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn context_of(inner: &ShellInner, device: &dyn DeviceClassSource) -> ShellContext {
    ShellContext {
        kind: inner.kind,
        is_open: inner.open,
        is_mobile: device.is_mobile(),
        disabled: inner.disabled,
    }
}

/// Open or close, running the open-change callback outside the lock.
fn set_open(inner: &RwLock<ShellInner>, open: bool) -> bool {
    let callback = {
        let mut guard = inner.write().unwrap_or_else(|e| e.into_inner());
        if guard.open == open || (open && guard.disabled) {
            return false;
        }
        guard.open = open;
        guard.on_open_change.clone()
    };
    if let Some(callback) = callback {
        callback(open);
    }
    true
}

/// Handle passed to every part of a shell.
///
/// Holds a weak reference: parts never keep a root alive.
#[derive(Clone)]
pub struct ShellScope {
    inner: Weak<RwLock<ShellInner>>,
    device: Arc<dyn DeviceClassSource>,
}

impl std::fmt::Debug for ShellScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellScope")
            .field("attached", &self.is_attached())
            .finish_non_exhaustive()
    }
}

impl ShellScope {
    /// Whether the root is still mounted.
    pub fn is_attached(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Read the shared context on behalf of `component`.
    pub fn context(&self, component: &'static str) -> Result<ShellContext, ShellError> {
        self.read(component, |inner| context_of(inner, self.device.as_ref()))
    }

    /// Open or close the shell on behalf of `component`.
    pub fn set_open(&self, component: &'static str, open: bool) -> Result<bool, ShellError> {
        let inner = self.upgrade(component)?;
        Ok(set_open(&inner, open))
    }

    /// Register an item. It stays registered until the handle is dropped.
    pub fn register(&self, props: ItemProps) -> Result<ItemHandle, ShellError> {
        let id = self.write("Item", |inner| {
            inner.next_item_id += 1;
            let id = ItemId::new(inner.next_item_id);
            inner.items.push(RegisteredItem { id, props });
            id
        })?;
        Ok(ItemHandle::new(id, self.clone()))
    }

    pub(crate) fn read<T>(
        &self,
        component: &'static str,
        f: impl FnOnce(&ShellInner) -> T,
    ) -> Result<T, ShellError> {
        let inner = self.upgrade(component)?;
        let guard = inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(f(&*guard))
    }

    pub(crate) fn write<T>(
        &self,
        component: &'static str,
        f: impl FnOnce(&mut ShellInner) -> T,
    ) -> Result<T, ShellError> {
        let inner = self.upgrade(component)?;
        let mut guard = inner.write().unwrap_or_else(|e| e.into_inner());
        Ok(f(&mut *guard))
    }

    /// Run `f` only if the root is still mounted.
    pub(crate) fn write_if_attached(&self, f: impl FnOnce(&mut ShellInner)) {
        if let Some(inner) = self.inner.upgrade() {
            let mut guard = inner.write().unwrap_or_else(|e| e.into_inner());
            f(&mut *guard);
        }
    }

    fn upgrade(&self, component: &'static str) -> Result<Arc<RwLock<ShellInner>>, ShellError> {
        self.inner
            .upgrade()
            .ok_or(ShellError::OutsideRoot { component })
    }
}
