//! Generic list controller shared by every resource screen.

use std::sync::Arc;

use thiserror::Error;

use super::collection::{Pager, ResourceList};
use super::dialog::Dialog;
use super::resource::{FormMode, Resource, ResourceForm};
use crate::gateway::{GatewayError, ResourceGateway};

/// Errors from submitting a create or edit form.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// No create or edit form is open.
    #[error("no form is open")]
    NoForm,

    /// The form failed local validation; nothing was sent.
    #[error("{0}")]
    Invalid(String),

    /// The API call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl SubmitError {
    /// Text suitable for showing to staff.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NoForm | Self::Invalid(_) => self.to_string(),
            Self::Gateway(e) => e.user_message(),
        }
    }
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// Staff declined the confirmation; nothing was sent.
    Cancelled,
}

/// State and operations behind one list screen.
///
/// Owns the fetched collection, the filter and page, the open dialog, and
/// the screen's error banner. A failed fetch keeps the previous collection
/// on screen; a failed submit keeps the dialog open with the typed values.
pub struct ListController<R: Resource> {
    gateway: Arc<dyn ResourceGateway<R>>,
    list: ResourceList<R>,
    dialog: Dialog<R>,
    error: Option<String>,
    loaded: bool,
    is_loading: bool,
    is_submitting: bool,
}

impl<R: Resource> std::fmt::Debug for ListController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListController")
            .field("kind", &R::KIND)
            .field("items", &self.list.items().len())
            .field("filter", &self.list.filter())
            .field("page", &self.list.page())
            .field("dialog_open", &self.dialog.is_open())
            .field("error", &self.error)
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}

impl<R: Resource> ListController<R> {
    #[must_use]
    pub fn new(gateway: Arc<dyn ResourceGateway<R>>) -> Self {
        Self {
            gateway,
            list: ResourceList::new(),
            dialog: Dialog::Closed,
            error: None,
            loaded: false,
            is_loading: false,
            is_submitting: false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn list(&self) -> &ResourceList<R> {
        &self.list
    }

    #[must_use]
    pub fn items(&self) -> &[R] {
        self.list.items()
    }

    #[must_use]
    pub fn visible(&self) -> Vec<&R> {
        self.list.visible()
    }

    #[must_use]
    pub fn pager(&self) -> Pager {
        self.list.pager()
    }

    #[must_use]
    pub fn filter(&self) -> &str {
        self.list.filter()
    }

    #[must_use]
    pub const fn dialog(&self) -> &Dialog<R> {
        &self.dialog
    }

    /// Banner error from the last fetch or delete.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn has_loaded(&self) -> bool {
        self.loaded
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    #[must_use]
    pub fn find(&self, id: &R::Id) -> Option<&R> {
        self.list.find(id)
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Fetch the whole collection, replacing what is shown.
    ///
    /// On failure the previous collection stays and the banner shows why.
    ///
    /// # Errors
    ///
    /// Returns the gateway error after recording it in the banner.
    pub async fn load(&mut self) -> Result<(), GatewayError> {
        self.is_loading = true;
        let result = self.gateway.fetch_all().await;
        self.is_loading = false;

        match result {
            Ok(items) => {
                tracing::debug!(kind = %R::KIND, count = items.len(), "Collection loaded");
                self.list.replace_all(items);
                self.error = None;
                self.loaded = true;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(kind = %R::KIND, error = %e, "Collection fetch failed");
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Fetch on first display, or again after [`invalidate`](Self::invalidate).
    ///
    /// # Errors
    ///
    /// Returns the gateway error after recording it in the banner.
    pub async fn ensure_loaded(&mut self) -> Result<(), GatewayError> {
        if self.loaded {
            return Ok(());
        }
        self.load().await
    }

    /// Mark the collection stale so the next display fetches it again.
    pub const fn invalidate(&mut self) {
        self.loaded = false;
    }

    /// Forget everything, as if the screen had never been shown.
    pub fn reset(&mut self) {
        self.list = ResourceList::new();
        self.dialog = Dialog::Closed;
        self.error = None;
        self.loaded = false;
        self.is_loading = false;
        self.is_submitting = false;
    }

    // =========================================================================
    // Filtering and paging
    // =========================================================================

    /// Show only matching items, starting from page 1.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.list.set_filter(text);
    }

    pub fn set_page(&mut self, page: usize) {
        self.list.set_page(page);
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    // =========================================================================
    // Dialogs
    // =========================================================================

    pub fn begin_create(&mut self) {
        self.dialog = Dialog::Create {
            form: R::Form::default(),
            error: None,
        };
    }

    /// Open the edit form pre-populated from the record with `id`.
    ///
    /// Returns `false` if the record is unknown or the kind is not editable.
    pub fn begin_edit(&mut self, id: &R::Id) -> bool {
        if !R::EDITABLE {
            return false;
        }
        let Some(target) = self.list.find(id).cloned() else {
            return false;
        };
        self.dialog = Dialog::Edit {
            form: target.edit_form(),
            target,
            error: None,
        };
        true
    }

    /// Open the read-only view of the record with `id`.
    pub fn begin_view(&mut self, id: &R::Id) -> bool {
        let Some(target) = self.list.find(id).cloned() else {
            return false;
        };
        self.dialog = Dialog::View { target };
        true
    }

    /// Ask for confirmation before deleting the record with `id`.
    pub fn begin_remove(&mut self, id: &R::Id) -> bool {
        let Some(target) = self.list.find(id).cloned() else {
            return false;
        };
        self.dialog = Dialog::ConfirmDelete { target };
        true
    }

    pub fn close_dialog(&mut self) {
        self.dialog = Dialog::Closed;
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Submit the open create or edit form.
    ///
    /// On success the server's copy of the record is appended (create) or
    /// replaces the old one in place (edit), and the dialog closes.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Invalid` without sending anything if validation
    /// fails, or `SubmitError::Gateway` if the API call fails. Either way the
    /// dialog stays open showing the message.
    pub async fn submit(&mut self, form: R::Form) -> Result<(), SubmitError> {
        let Some(mode) = self.dialog.form_mode() else {
            return Err(SubmitError::NoForm);
        };

        let draft = match form.validate(mode) {
            Ok(draft) => draft,
            Err(message) => {
                self.dialog.fail(form, message.clone());
                return Err(SubmitError::Invalid(message));
            }
        };

        self.is_submitting = true;
        let result = match mode {
            FormMode::Create => self.gateway.create(&draft).await,
            FormMode::Edit => {
                let Some(id) = self.dialog.target().map(|t| t.id().clone()) else {
                    self.is_submitting = false;
                    return Err(SubmitError::NoForm);
                };
                self.gateway.update(&id, &draft).await
            }
        };
        self.is_submitting = false;

        match result {
            Ok(record) => {
                tracing::info!(kind = %R::KIND, id = %record.id(), ?mode, "Record saved");
                match mode {
                    FormMode::Create => self.list.push(record),
                    FormMode::Edit => self.list.upsert(record),
                }
                self.dialog = Dialog::Closed;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(kind = %R::KIND, error = %e, ?mode, "Record save failed");
                self.dialog.fail(form, e.user_message());
                Err(e.into())
            }
        }
    }

    /// Delete the record with `id` once `confirm` approves the prompt.
    ///
    /// # Errors
    ///
    /// Returns the gateway error after recording it in the banner; the
    /// collection is left unchanged.
    pub async fn remove(
        &mut self,
        id: &R::Id,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<RemoveOutcome, GatewayError> {
        if !confirm(&R::KIND.delete_prompt()) {
            self.close_dialog();
            return Ok(RemoveOutcome::Cancelled);
        }

        self.is_submitting = true;
        let result = self.gateway.delete(id).await;
        self.is_submitting = false;
        self.close_dialog();

        match result {
            Ok(()) => {
                tracing::info!(kind = %R::KIND, %id, "Record deleted");
                self.list.remove(id);
                Ok(RemoveOutcome::Removed)
            }
            Err(e) => {
                tracing::warn!(kind = %R::KIND, %id, error = %e, "Record delete failed");
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }
}
