//! Bootstrap-style alert containers: `:::success`, `:::danger`,
//! `:::warning` and `:::info`.

use super::{ContainerDirective, RenderHint};

/// Alert flavour, one per supported directive name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Danger,
    Warning,
    Info,
}

impl AlertKind {
    /// Every supported alert, in registration order.
    pub const ALL: [Self; 4] = [Self::Success, Self::Danger, Self::Warning, Self::Info];

    /// Directive name and class suffix.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Danger => "danger",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// Renders `:::<kind>` as `<div class="alert alert-<kind>">`.
#[derive(Debug, Clone, Copy)]
pub struct AlertDirective {
    kind: AlertKind,
}

impl AlertDirective {
    #[must_use]
    pub fn new(kind: AlertKind) -> Self {
        Self { kind }
    }
}

impl ContainerDirective for AlertDirective {
    fn name(&self) -> &str {
        self.kind.as_str()
    }

    fn hint(&self) -> RenderHint {
        RenderHint {
            tag: "div",
            classes: vec!["alert".to_owned(), format!("alert-{}", self.kind.as_str())],
        }
    }
}
