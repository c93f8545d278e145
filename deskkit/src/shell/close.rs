//! Close part.

use std::sync::Arc;

use super::ShellError;
use super::root::ShellScope;
use super::toolkit::{CloseView, Primitive, Toolkit};

const COMPONENT: &str = "Close";

/// Caller click handler forwarded by [`Close`].
pub type ClickFn = Arc<dyn Fn() + Send + Sync>;

/// Runs the caller's click handler, then closes the shell.
///
/// The same part serves both presentations.
#[derive(Clone)]
pub struct Close {
    scope: ShellScope,
    label: String,
    on_click: Option<ClickFn>,
}

impl std::fmt::Debug for Close {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Close")
            .field("label", &self.label)
            .field("on_click", &self.on_click.is_some())
            .finish_non_exhaustive()
    }
}

impl Close {
    pub fn new(scope: &ShellScope, label: impl Into<String>) -> Self {
        Self {
            scope: scope.clone(),
            label: label.into(),
            on_click: None,
        }
    }

    pub fn on_click(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_click = Some(Arc::new(f));
        self
    }

    pub fn view(&self) -> Result<CloseView, ShellError> {
        let context = self.scope.context(COMPONENT)?;
        Ok(CloseView {
            primitive: Primitive::for_shell(context.kind, context.device()),
            label: self.label.clone(),
        })
    }

    pub fn render<K: Toolkit>(&self, toolkit: &K) -> Result<K::Node, ShellError> {
        Ok(toolkit.close(&self.view()?))
    }

    /// Returns whether the click closed the shell.
    pub fn click(&self) -> Result<bool, ShellError> {
        self.scope.context(COMPONENT)?;
        if let Some(on_click) = &self.on_click {
            on_click();
        }
        if !self.scope.is_attached() {
            return Ok(false);
        }
        self.scope.set_open(COMPONENT, false)
    }
}
