//! Transfer desk calls that sit outside the generic record endpoints.

use async_trait::async_trait;
use pustakalaya_core::{Book, ResourceKind};
use tracing::instrument;

use super::records::TRANSFERS_SCRIPT;
use super::{ApiClient, GatewayError, Operation, TransferQueries, fallback_message};
use crate::controller::forms::TransferDraft;

#[async_trait]
impl TransferQueries for ApiClient {
    #[instrument(skip(self))]
    async fn transferable_books(&self) -> Result<Vec<Book>, GatewayError> {
        let url = self.endpoint(TRANSFERS_SCRIPT, &[("action", "fetch_books")])?;
        self.get_data(url, "Failed to fetch books").await
    }

    /// The add reply carries no usable record, so only `success` is checked.
    #[instrument(skip(self), fields(book_id = %draft.book_id, count = draft.count))]
    async fn record_transfer(&self, draft: &TransferDraft) -> Result<(), GatewayError> {
        let url = self.endpoint(TRANSFERS_SCRIPT, &[("action", Operation::Create.verb())])?;
        self.post_unit(
            url,
            draft,
            &fallback_message(ResourceKind::Transfer, Operation::Create),
        )
        .await
    }
}
