//! The transfer desk: a source-book picker, the transfer form, and the
//! transfer history.

use std::sync::Arc;

use pustakalaya_core::{Book, BookId, Transfer, TransferId};

use super::collection::{Pager, ResourceList};
use super::forms::TransferForm;
use super::list::{ListController, RemoveOutcome, SubmitError};
use super::resource::{FormMode, ResourceForm};
use crate::gateway::{GatewayError, ResourceGateway, TransferQueries};

/// Shown after a transfer is recorded.
pub const TRANSFER_ADDED_NOTICE: &str = "Book transfer added successfully!";

/// Shown after a transfer is deleted.
pub const TRANSFER_DELETED_NOTICE: &str = "Transfer deleted successfully!";

/// The transfer form, open once a source book is chosen.
#[derive(Debug, Clone)]
pub struct TransferDraftForm {
    pub book: Book,
    pub form: TransferForm,
    pub error: Option<String>,
}

/// State behind the transfer screen.
pub struct TransferDesk {
    transfers: ListController<Transfer>,
    books: ResourceList<Book>,
    queries: Arc<dyn TransferQueries>,
    books_loaded: bool,
    form: Option<TransferDraftForm>,
    error: Option<String>,
    notice: Option<String>,
    is_submitting: bool,
}

impl TransferDesk {
    #[must_use]
    pub fn new(
        transfers: Arc<dyn ResourceGateway<Transfer>>,
        queries: Arc<dyn TransferQueries>,
    ) -> Self {
        Self {
            transfers: ListController::new(transfers),
            books: ResourceList::new(),
            queries,
            books_loaded: false,
            form: None,
            error: None,
            notice: None,
            is_submitting: false,
        }
    }

    #[must_use]
    pub const fn transfers(&self) -> &ListController<Transfer> {
        &self.transfers
    }

    /// The picker's books, filtered and paged separately from transfers.
    #[must_use]
    pub const fn books(&self) -> &ResourceList<Book> {
        &self.books
    }

    #[must_use]
    pub fn book_pager(&self) -> Pager {
        self.books.pager()
    }

    #[must_use]
    pub const fn form(&self) -> Option<&TransferDraftForm> {
        self.form.as_ref()
    }

    /// Banner error: the picker fetch, or the transfer list's own banner.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref().or_else(|| self.transfers.error())
    }

    /// Success message from the last mutation.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Fetch the books the picker offers.
    ///
    /// # Errors
    ///
    /// Returns the gateway error after recording it in the banner; the
    /// previous books stay listed.
    pub async fn load_books(&mut self) -> Result<(), GatewayError> {
        match self.queries.transferable_books().await {
            Ok(books) => {
                tracing::debug!(count = books.len(), "Transfer picker loaded");
                self.books.replace_all(books);
                self.books_loaded = true;
                self.error = None;
                self.refresh_selection();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Transfer picker fetch failed");
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Fetch both lists.
    ///
    /// # Errors
    ///
    /// Returns the first gateway error; both fetches are always attempted.
    pub async fn reload(&mut self) -> Result<(), GatewayError> {
        let transfers = self.transfers.load().await;
        let books = self.load_books().await;
        transfers.and(books)
    }

    /// Fetch whichever list has not been fetched yet.
    ///
    /// # Errors
    ///
    /// Returns the first gateway error.
    pub async fn ensure_loaded(&mut self) -> Result<(), GatewayError> {
        let transfers = self.transfers.ensure_loaded().await;
        let books = if self.books_loaded {
            Ok(())
        } else {
            self.load_books().await
        };
        transfers.and(books)
    }

    /// Keep the selected book's count in step with the latest fetch.
    fn refresh_selection(&mut self) {
        if let Some(open) = self.form.as_mut() {
            match self.books.find(&open.book.id) {
                Some(book) => open.book = book.clone(),
                None => self.form = None,
            }
        }
    }

    /// Mark the picker stale, e.g. after a book was edited elsewhere.
    pub const fn invalidate_books(&mut self) {
        self.books_loaded = false;
    }

    pub fn set_book_filter(&mut self, text: impl Into<String>) {
        self.books.set_filter(text);
    }

    pub fn set_book_page(&mut self, page: usize) {
        self.books.set_page(page);
    }

    pub fn set_page(&mut self, page: usize) {
        self.transfers.set_page(page);
    }

    pub fn dismiss(&mut self) {
        self.error = None;
        self.notice = None;
        self.transfers.dismiss_error();
    }

    pub fn reset(&mut self) {
        self.transfers.reset();
        self.books = ResourceList::new();
        self.books_loaded = false;
        self.form = None;
        self.error = None;
        self.notice = None;
        self.is_submitting = false;
    }

    // =========================================================================
    // Transfer form
    // =========================================================================

    /// Choose the source book and open the form for it.
    ///
    /// Returns `false` if the picker does not list `id`.
    pub fn select_book(&mut self, id: &BookId) -> bool {
        let Some(book) = self.books.find(id).cloned() else {
            return false;
        };
        self.form = Some(TransferDraftForm {
            form: TransferForm {
                book_id: book.id.to_string(),
                count: "1".to_string(),
                destination: String::new(),
            },
            book,
            error: None,
        });
        self.notice = None;
        true
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    /// Record a transfer from the selected book.
    ///
    /// Incomplete forms and counts above the book's copies are refused
    /// without contacting the server. A recorded transfer clears the form
    /// and re-fetches both lists, since the server changes the book's count.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Invalid` for a refused form, or
    /// `SubmitError::Gateway` if the server call fails. The form stays open
    /// showing the message.
    pub async fn submit_transfer(&mut self, mut submitted: TransferForm) -> Result<(), SubmitError> {
        let Some(open) = self.form.as_mut() else {
            return Err(SubmitError::Invalid(
                super::forms::TRANSFER_INCOMPLETE_MESSAGE.to_string(),
            ));
        };
        // The selected book is the source, whatever the page posted.
        submitted.book_id = open.book.id.to_string();

        let draft = submitted
            .validate(FormMode::Create)
            .and_then(|draft| {
                if draft.count > open.book.copy_count {
                    Err(format!(
                        "Cannot transfer {} books. Only {} available.",
                        draft.count, open.book.copy_count
                    ))
                } else {
                    Ok(draft)
                }
            });
        let draft = match draft {
            Ok(draft) => draft,
            Err(message) => {
                open.form = submitted;
                open.error = Some(message.clone());
                return Err(SubmitError::Invalid(message));
            }
        };

        self.is_submitting = true;
        let result = self.queries.record_transfer(&draft).await;
        self.is_submitting = false;

        if let Err(e) = result {
            tracing::warn!(book_id = %draft.book_id, error = %e, "Transfer failed");
            if let Some(open) = self.form.as_mut() {
                open.form = submitted;
                open.error = Some(e.user_message());
            }
            return Err(e.into());
        }

        tracing::info!(book_id = %draft.book_id, count = draft.count, "Transfer recorded");
        self.form = None;
        // The transfer is recorded even if the refresh fails.
        let _ = self.reload().await;
        self.notice = Some(TRANSFER_ADDED_NOTICE.to_string());
        Ok(())
    }

    // =========================================================================
    // Transfer history
    // =========================================================================

    pub fn begin_remove(&mut self, id: &TransferId) -> bool {
        self.transfers.begin_remove(id)
    }

    pub fn close_dialog(&mut self) {
        self.transfers.close_dialog();
    }

    /// Delete a transfer once `confirm` approves, then re-fetch both lists.
    ///
    /// # Errors
    ///
    /// Returns the gateway error after recording it in the banner.
    pub async fn remove_transfer(
        &mut self,
        id: &TransferId,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<RemoveOutcome, GatewayError> {
        let outcome = self.transfers.remove(id, confirm).await?;
        if outcome == RemoveOutcome::Removed {
            let _ = self.reload().await;
            self.notice = Some(TRANSFER_DELETED_NOTICE.to_string());
        }
        Ok(outcome)
    }
}
