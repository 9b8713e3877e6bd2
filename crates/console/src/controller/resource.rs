//! What a record kind must provide to be managed by a list controller.

use std::fmt;

use pustakalaya_core::ResourceKind;
use serde::Serialize;

/// A record kind listed, searched, and edited through a [`ListController`].
///
/// [`ListController`]: super::ListController
pub trait Resource: Clone + fmt::Debug + Send + Sync + 'static {
    /// Opaque identifier.
    type Id: Clone
        + Eq
        + fmt::Display
        + fmt::Debug
        + From<String>
        + Serialize
        + Send
        + Sync
        + 'static;

    /// Editable fields, as typed by staff.
    type Form: ResourceForm;

    /// Which kind this is, for labels and messages.
    const KIND: ResourceKind;

    /// Whether existing records can be edited.
    const EDITABLE: bool = true;

    fn id(&self) -> &Self::Id;

    /// Text fields searched by the list filter.
    fn search_fields(&self) -> Vec<&str>;

    /// Edit form pre-populated from this record.
    fn edit_form(&self) -> Self::Form;

    /// Case-insensitive containment match against the search fields.
    ///
    /// `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self
                .search_fields()
                .into_iter()
                .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Whether a form creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// The editable fields of a record kind.
///
/// Fields are kept as entered so an invalid submission can be shown again
/// unchanged; [`validate`](Self::validate) turns them into the typed request
/// payload.
pub trait ResourceForm: Clone + Default + fmt::Debug + Send + Sync + 'static {
    /// Typed request body sent to the API.
    type Draft: Serialize + fmt::Debug + Send + Sync;

    /// Check required fields and parse numbers.
    ///
    /// # Errors
    ///
    /// Returns the message to show inside the dialog.
    fn validate(&self, mode: FormMode) -> Result<Self::Draft, String>;

    /// Clear write-only fields before the form is shown again.
    fn scrub(&mut self) {}
}

/// Trimmed value of a required text field.
pub(crate) fn required(value: &str, label: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(format!("{label} is required"))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Parse a required whole-number field.
pub(crate) fn required_count(value: &str, label: &str) -> Result<u32, String> {
    required(value, label)?
        .parse::<u32>()
        .map_err(|_| format!("{label} must be a whole number"))
}
