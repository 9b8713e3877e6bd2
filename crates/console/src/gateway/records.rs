//! CRUD endpoints for the four resource kinds.
//!
//! Every management script follows one convention: `?action=fetch` (GET)
//! returns the collection, `?action=add` and `?action=update` (POST) return
//! the stored record, and `?action=delete` (POST) takes the id under a
//! kind-specific key.

use async_trait::async_trait;
use pustakalaya_core::{Book, Donor, Librarian, ResourceKind, Transfer};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use super::{ApiClient, Draft, GatewayError, Operation, ResourceGateway, fallback_message};
use crate::controller::Resource;

/// Where a resource kind's management script lives and how it names ids.
struct Endpoint {
    script: &'static str,
    delete_key: &'static str,
}

const BOOKS: Endpoint = Endpoint {
    script: "p_books_management_web.php",
    delete_key: "bookId",
};

const DONORS: Endpoint = Endpoint {
    script: "p_donors_management_web.php",
    delete_key: "donorId",
};

const LIBRARIANS: Endpoint = Endpoint {
    script: "p_librarians_management_web.php",
    delete_key: "librarianId",
};

pub(crate) const TRANSFERS_SCRIPT: &str = "p_book_transfer_web.php";

const TRANSFERS: Endpoint = Endpoint {
    script: TRANSFERS_SCRIPT,
    delete_key: "transferId",
};

/// Update body: the draft's fields plus the record id.
#[derive(Serialize)]
struct WithId<'a, I, D> {
    id: &'a I,
    #[serde(flatten)]
    draft: &'a D,
}

impl ApiClient {
    async fn fetch_records<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        kind: ResourceKind,
    ) -> Result<Vec<T>, GatewayError> {
        let url = self.endpoint(endpoint.script, &[("action", Operation::Fetch.verb())])?;
        self.get_data(url, &fallback_message(kind, Operation::Fetch))
            .await
    }

    async fn create_record<T, D>(
        &self,
        endpoint: &Endpoint,
        kind: ResourceKind,
        draft: &D,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        D: Serialize + Sync,
    {
        let url = self.endpoint(endpoint.script, &[("action", Operation::Create.verb())])?;
        self.post_data(url, draft, &fallback_message(kind, Operation::Create))
            .await
    }

    async fn update_record<T, I, D>(
        &self,
        endpoint: &Endpoint,
        kind: ResourceKind,
        id: &I,
        draft: &D,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        I: Serialize + Sync,
        D: Serialize + Sync,
    {
        let url = self.endpoint(endpoint.script, &[("action", Operation::Update.verb())])?;
        self.post_data(
            url,
            &WithId { id, draft },
            &fallback_message(kind, Operation::Update),
        )
        .await
    }

    async fn delete_record<I: Serialize + Sync>(
        &self,
        endpoint: &Endpoint,
        kind: ResourceKind,
        id: &I,
    ) -> Result<(), GatewayError> {
        let url = self.endpoint(endpoint.script, &[("action", Operation::Delete.verb())])?;
        let mut body = serde_json::Map::new();
        body.insert(
            endpoint.delete_key.to_string(),
            serde_json::to_value(id).map_err(|e| GatewayError::Malformed(e.to_string()))?,
        );
        self.post_unit(url, &body, &fallback_message(kind, Operation::Delete))
            .await
    }
}

/// Implements `ResourceGateway` for a resource kind backed by `ApiClient`.
macro_rules! record_gateway {
    ($resource:ty, $endpoint:expr) => {
        #[async_trait]
        impl ResourceGateway<$resource> for ApiClient {
            #[instrument(skip(self))]
            async fn fetch_all(&self) -> Result<Vec<$resource>, GatewayError> {
                self.fetch_records(&$endpoint, <$resource>::KIND).await
            }

            #[instrument(skip(self, draft))]
            async fn create(&self, draft: &Draft<$resource>) -> Result<$resource, GatewayError> {
                self.create_record(&$endpoint, <$resource>::KIND, draft).await
            }

            #[instrument(skip(self, draft), fields(id = %id))]
            async fn update(
                &self,
                id: &<$resource as Resource>::Id,
                draft: &Draft<$resource>,
            ) -> Result<$resource, GatewayError> {
                if !<$resource>::EDITABLE {
                    return Err(GatewayError::Unsupported {
                        kind: <$resource>::KIND,
                        operation: Operation::Update,
                    });
                }
                self.update_record(&$endpoint, <$resource>::KIND, id, draft)
                    .await
            }

            #[instrument(skip(self), fields(id = %id))]
            async fn delete(&self, id: &<$resource as Resource>::Id) -> Result<(), GatewayError> {
                self.delete_record(&$endpoint, <$resource>::KIND, id).await
            }
        }
    };
}

record_gateway!(Book, BOOKS);
record_gateway!(Donor, DONORS);
record_gateway!(Librarian, LIBRARIANS);
record_gateway!(Transfer, TRANSFERS);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pustakalaya_core::BookId;

    use super::*;

    #[test]
    fn test_update_body_flattens_draft() {
        #[derive(Serialize)]
        struct Draft {
            name: &'static str,
            phone: &'static str,
        }

        let id = BookId::new("9");
        let json = serde_json::to_value(WithId {
            id: &id,
            draft: &Draft {
                name: "Ram",
                phone: "98",
            },
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "9", "name": "Ram", "phone": "98"})
        );
    }
}
