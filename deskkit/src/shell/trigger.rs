//! Trigger part.

use super::ShellError;
use super::root::{ShellKind, ShellScope};
use super::toolkit::{Primitive, Toolkit, TriggerView};

const COMPONENT: &str = "Trigger";

/// Visual variant forwarded to the trigger button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonVariant {
    #[default]
    Default,
    Outline,
    Ghost,
    Destructive,
}

/// Size forwarded to the trigger button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonSize {
    Small,
    #[default]
    Medium,
    Large,
    Icon,
}

/// The control that opens a shell.
///
/// Wraps its label in the desktop trigger primitive or the mobile sheet
/// trigger, with the same props in both branches.
#[derive(Debug, Clone)]
pub struct Trigger {
    scope: ShellScope,
    label: String,
    disabled: bool,
    variant: ButtonVariant,
    size: ButtonSize,
}

impl Trigger {
    pub fn new(scope: &ShellScope, label: impl Into<String>) -> Self {
        Self {
            scope: scope.clone(),
            label: label.into(),
            disabled: false,
            variant: ButtonVariant::default(),
            size: ButtonSize::default(),
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn size(mut self, size: ButtonSize) -> Self {
        self.size = size;
        self
    }

    /// What to render, or `None` for a menu with no visible items.
    pub fn view(&self) -> Result<Option<TriggerView>, ShellError> {
        let context = self.scope.context(COMPONENT)?;
        self.scope.read(COMPONENT, |inner| {
            if inner.kind == ShellKind::Menu && inner.visible_items().next().is_none() {
                return None;
            }
            let label = match inner.kind {
                ShellKind::Select => inner
                    .value
                    .as_deref()
                    .and_then(|value| {
                        inner
                            .visible_items()
                            .find(|item| item.props.value == value)
                            .map(|item| item.props.label.clone())
                    })
                    .or_else(|| inner.placeholder.clone())
                    .unwrap_or_else(|| self.label.clone()),
                _ => self.label.clone(),
            };
            Some(TriggerView {
                primitive: Primitive::for_shell(context.kind, context.device()),
                label,
                disabled: self.disabled || context.disabled,
                variant: self.variant,
                size: self.size,
                expanded: context.is_open,
            })
        })
    }

    pub fn render<K: Toolkit>(&self, toolkit: &K) -> Result<Option<K::Node>, ShellError> {
        Ok(self.view()?.map(|view| toolkit.trigger(&view)))
    }

    /// Toggle the shell. Returns whether it is open afterwards.
    ///
    /// Disabled triggers and menus without items leave the state alone.
    pub fn click(&self) -> Result<bool, ShellError> {
        let context = self.scope.context(COMPONENT)?;
        if self.disabled || context.disabled || self.view()?.is_none() {
            return Ok(context.is_open);
        }
        self.scope.set_open(COMPONENT, !context.is_open)?;
        Ok(!context.is_open)
    }
}
