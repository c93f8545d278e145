//! Responsive compound-component shell.
//!
//! One shell (a dialog, a dropdown menu or a select) is described once and
//! renders either as a desktop overlay or as a mobile bottom sheet,
//! depending on the viewport at render time. All parts share one piece of
//! state owned by the [`ShellRoot`]:
//!
//! - [`Trigger`] opens and closes the shell; menus with no visible items
//!   render no trigger at all.
//! - [`Content`] lists the registered, visible items and handles activation.
//! - [`Close`] runs the caller's click handler and closes the shell.
//!
//! Parts receive a [`ShellScope`] from the root instead of discovering it
//! ambiently. A scope does not keep its root alive, so a part that outlives
//! its root fails with [`ShellError::OutsideRoot`] on the next render or
//! interaction instead of silently doing nothing.
//!
//! Items register themselves through [`ShellScope::register`] and stay
//! registered for as long as the returned [`ItemHandle`] lives. Dropping
//! the handle unregisters the item, so ordinary control flow decides which
//! entries exist.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use deskkit::shell::{Content, DeviceClass, FixedDevice, ItemProps, Outline, ShellRoot, Trigger};
//!
//! let menu = ShellRoot::menu(Arc::new(FixedDevice(DeviceClass::Mobile)));
//! let scope = menu.scope();
//! let can_refund = false;
//!
//! let _edit = scope.register(ItemProps::new("edit", "Edit order")).unwrap();
//! let _refund = can_refund
//!     .then(|| scope.register(ItemProps::new("refund", "Refund")))
//!     .transpose()
//!     .unwrap();
//!
//! let trigger = Trigger::new(&scope, "Actions");
//! trigger.click().unwrap();
//!
//! let content = Content::new(&scope);
//! let rendered = content.render(&Outline).unwrap().unwrap();
//! assert!(rendered.to_string().contains("Edit order"));
//! assert!(!rendered.to_string().contains("Refund"));
//! ```

mod close;
mod content;
mod item;
mod root;
mod toolkit;
mod trigger;
mod viewport;

pub use close::{ClickFn, Close};
pub use content::{Activation, Align, Content};
pub use item::{ItemHandle, ItemId, ItemProps, ItemVariant, SelectFn};
pub use root::{ChangeFn, OpenChangeFn, ShellContext, ShellKind, ShellRoot, ShellScope};
pub use toolkit::{
    CloseView, ContentView, ItemView, Outline, OutlineNode, Primitive, Toolkit, TriggerView,
};
pub use trigger::{ButtonSize, ButtonVariant, Trigger};
pub use viewport::{
    DEFAULT_MOBILE_BREAKPOINT, DeviceClass, DeviceClassSource, FixedDevice, Viewport,
    ViewportConfig,
};

use thiserror::Error;

/// Errors from shell parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    /// A part was rendered or used after its root went away.
    #[error("{component} must be used within its shell root")]
    OutsideRoot { component: &'static str },

    /// Activation named a value that no visible item has.
    #[error("no visible item with value '{0}'")]
    UnknownItem(String),
}
