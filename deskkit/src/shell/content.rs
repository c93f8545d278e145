//! Content part and item activation.

use super::ShellError;
use super::root::{ShellKind, ShellScope};
use super::toolkit::{ContentView, ItemView, Primitive, Toolkit};

const COMPONENT: &str = "Content";

/// Where desktop content anchors relative to its trigger.
///
/// Bottom sheets ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    Start,
    #[default]
    Center,
    End,
}

/// What activating an item did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// The item was chosen. For selects this is the new value.
    Selected(String),
    /// The already-selected option was chosen again and the value cleared.
    Cleared,
    /// The item is disabled, or the whole shell is.
    Ignored,
}

/// The open surface of a shell: an overlay on desktop, a sheet on mobile.
#[derive(Debug, Clone)]
pub struct Content {
    scope: ShellScope,
    align: Align,
}

impl Content {
    pub fn new(scope: &ShellScope) -> Self {
        Self {
            scope: scope.clone(),
            align: Align::default(),
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// What to render, or `None` while the shell is closed.
    pub fn view(&self) -> Result<Option<ContentView>, ShellError> {
        let context = self.scope.context(COMPONENT)?;
        if !context.is_open {
            return Ok(None);
        }
        let primitive = Primitive::for_shell(context.kind, context.device());
        self.scope.read(COMPONENT, |inner| {
            let items = inner
                .visible_items()
                .map(|item| ItemView {
                    id: item.id,
                    value: item.props.value.clone(),
                    label: item.props.label.clone(),
                    variant: item.props.variant,
                    disabled: item.props.disabled,
                    selected: inner.kind == ShellKind::Select
                        && inner.value.as_deref() == Some(item.props.value.as_str()),
                })
                .collect();
            Some(ContentView {
                primitive,
                align: self.align,
                title: inner.title.clone(),
                description: inner.description.clone(),
                show_close_button: inner.kind == ShellKind::Dialog && inner.show_close_button,
                items,
            })
        })
    }

    pub fn render<K: Toolkit>(&self, toolkit: &K) -> Result<Option<K::Node>, ShellError> {
        Ok(self.view()?.map(|view| toolkit.content(&view)))
    }

    /// Values of the visible items, in order. Available while closed too.
    pub fn items(&self) -> Result<Vec<String>, ShellError> {
        self.scope.read(COMPONENT, |inner| {
            inner
                .visible_items()
                .map(|item| item.props.value.clone())
                .collect()
        })
    }

    /// Activate the visible item with `value`.
    ///
    /// Selects toggle off when the current value is chosen again. Any
    /// successful activation closes the shell, in both presentations.
    pub fn activate(&self, value: &str) -> Result<Activation, ShellError> {
        let (activation, on_change, on_select) = self.scope.write(COMPONENT, |inner| {
            let Some(item) = inner.visible_items().find(|item| item.props.value == value) else {
                return Err(ShellError::UnknownItem(value.to_string()));
            };
            if inner.disabled || item.props.disabled {
                return Ok((Activation::Ignored, None, None));
            }
            let on_select = item.props.on_select.clone();

            if inner.kind != ShellKind::Select {
                return Ok((Activation::Selected(value.to_string()), None, on_select));
            }
            let activation = if inner.value.as_deref() == Some(value) {
                inner.value = None;
                Activation::Cleared
            } else {
                inner.value = Some(value.to_string());
                Activation::Selected(value.to_string())
            };
            Ok((activation, inner.on_change.clone(), on_select))
        })??;

        if activation == Activation::Ignored {
            return Ok(activation);
        }
        log::debug!("Activated '{}': {:?}", value, activation);

        if let Some(on_select) = on_select {
            on_select(value);
        }
        if let Some(on_change) = on_change {
            match &activation {
                Activation::Selected(value) => on_change(Some(value.as_str())),
                _ => on_change(None),
            }
        }
        // Callbacks may have dropped the root.
        if self.scope.is_attached() {
            self.scope.set_open(COMPONENT, false)?;
        }
        Ok(activation)
    }
}
