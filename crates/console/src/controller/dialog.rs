//! Modal state for a list screen.

use super::resource::{FormMode, Resource, ResourceForm};

/// What the list screen is showing on top of the table.
#[derive(Debug, Clone)]
pub enum Dialog<R: Resource> {
    Closed,
    Create {
        form: R::Form,
        error: Option<String>,
    },
    Edit {
        target: R,
        form: R::Form,
        error: Option<String>,
    },
    View {
        target: R,
    },
    ConfirmDelete {
        target: R,
    },
}

impl<R: Resource> Default for Dialog<R> {
    fn default() -> Self {
        Self::Closed
    }
}

impl<R: Resource> Dialog<R> {
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Mode of the open form, if the dialog is a form.
    #[must_use]
    pub const fn form_mode(&self) -> Option<FormMode> {
        match self {
            Self::Create { .. } => Some(FormMode::Create),
            Self::Edit { .. } => Some(FormMode::Edit),
            _ => None,
        }
    }

    /// The form being filled in, if any.
    #[must_use]
    pub const fn form(&self) -> Option<&R::Form> {
        match self {
            Self::Create { form, .. } | Self::Edit { form, .. } => Some(form),
            _ => None,
        }
    }

    /// The record the dialog is about, if any.
    #[must_use]
    pub const fn target(&self) -> Option<&R> {
        match self {
            Self::Edit { target, .. } | Self::View { target } | Self::ConfirmDelete { target } => {
                Some(target)
            }
            _ => None,
        }
    }

    /// Error shown inside the form.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Create { error, .. } | Self::Edit { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    /// Keep the submitted values and show `message` inside the form.
    pub(crate) fn fail(&mut self, mut submitted: R::Form, message: String) {
        if let Self::Create { form, error } | Self::Edit { form, error, .. } = self {
            submitted.scrub();
            *form = submitted;
            *error = Some(message);
        }
    }
}
