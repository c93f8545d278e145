//! Rendering seam between shell parts and a UI toolkit.
//!
//! Parts compute plain views; a [`Toolkit`] turns them into its own nodes.
//! [`Outline`] is a text toolkit used by the console and by tests.

use std::fmt;

use super::content::Align;
use super::item::{ItemId, ItemVariant};
use super::root::ShellKind;
use super::trigger::{ButtonSize, ButtonVariant};
use super::viewport::DeviceClass;

/// The toolkit primitive a part is rendered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Modal,
    Drawer,
    DropdownMenu,
    Popover,
    BottomSheet,
}

impl Primitive {
    pub fn for_shell(kind: ShellKind, device: DeviceClass) -> Self {
        match (kind, device) {
            (ShellKind::Dialog, DeviceClass::Desktop) => Self::Modal,
            (ShellKind::Dialog, DeviceClass::Mobile) => Self::Drawer,
            (ShellKind::Menu, DeviceClass::Desktop) => Self::DropdownMenu,
            (ShellKind::Select, DeviceClass::Desktop) => Self::Popover,
            (_, DeviceClass::Mobile) => Self::BottomSheet,
        }
    }

    pub fn device(self) -> DeviceClass {
        match self {
            Self::Modal | Self::DropdownMenu | Self::Popover => DeviceClass::Desktop,
            Self::Drawer | Self::BottomSheet => DeviceClass::Mobile,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Modal => "modal",
            Self::Drawer => "drawer",
            Self::DropdownMenu => "dropdown-menu",
            Self::Popover => "popover",
            Self::BottomSheet => "bottom-sheet",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerView {
    pub primitive: Primitive,
    pub label: String,
    pub disabled: bool,
    pub variant: ButtonVariant,
    pub size: ButtonSize,
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: ItemId,
    pub value: String,
    pub label: String,
    pub variant: ItemVariant,
    pub disabled: bool,
    /// Whether this is the current select value.
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentView {
    pub primitive: Primitive,
    pub align: Align,
    pub title: Option<String>,
    pub description: Option<String>,
    pub show_close_button: bool,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseView {
    pub primitive: Primitive,
    pub label: String,
}

/// A UI toolkit able to draw shell parts.
pub trait Toolkit {
    type Node;

    fn trigger(&self, view: &TriggerView) -> Self::Node;
    fn content(&self, view: &ContentView) -> Self::Node;
    fn close(&self, view: &CloseView) -> Self::Node;
}

/// Renders parts as indented text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Outline;

/// A node produced by [`Outline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineNode {
    Trigger(TriggerView),
    Content(ContentView),
    Close(CloseView),
}

impl OutlineNode {
    pub fn primitive(&self) -> Primitive {
        match self {
            Self::Trigger(view) => view.primitive,
            Self::Content(view) => view.primitive,
            Self::Close(view) => view.primitive,
        }
    }
}

impl Toolkit for Outline {
    type Node = OutlineNode;

    fn trigger(&self, view: &TriggerView) -> OutlineNode {
        OutlineNode::Trigger(view.clone())
    }

    fn content(&self, view: &ContentView) -> OutlineNode {
        OutlineNode::Content(view.clone())
    }

    fn close(&self, view: &CloseView) -> OutlineNode {
        OutlineNode::Close(view.clone())
    }
}

impl fmt::Display for OutlineNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trigger(view) => {
                write!(f, "[{}-trigger] {}", view.primitive, view.label)?;
                if view.disabled {
                    f.write_str(" (disabled)")?;
                }
                if view.expanded {
                    f.write_str(" (open)")?;
                }
                Ok(())
            }
            Self::Content(view) => {
                write!(f, "[{}]", view.primitive)?;
                if view.primitive.device() == DeviceClass::Desktop {
                    let align = match view.align {
                        Align::Start => "start",
                        Align::Center => "center",
                        Align::End => "end",
                    };
                    write!(f, " align={}", align)?;
                }
                if let Some(title) = &view.title {
                    write!(f, "\n  # {}", title)?;
                }
                if let Some(description) = &view.description {
                    write!(f, "\n  {}", description)?;
                }
                for item in &view.items {
                    let marker = if item.selected { '*' } else { '-' };
                    write!(f, "\n  {} {}", marker, item.label)?;
                    if item.variant == ItemVariant::Destructive {
                        f.write_str(" (destructive)")?;
                    }
                    if item.disabled {
                        f.write_str(" (disabled)")?;
                    }
                }
                if view.show_close_button {
                    f.write_str("\n  [x]")?;
                }
                Ok(())
            }
            Self::Close(view) => write!(f, "[{}-close] {}", view.primitive, view.label),
        }
    }
}
