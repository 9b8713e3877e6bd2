//! Remote library API gateway.
//!
//! Translates console intents into HTTP/JSON calls against the library API
//! and converts the API's `{ success, data, message }` envelope into typed
//! results.
//!
//! # Architecture
//!
//! - [`ResourceGateway`] is the seam the generic list controller talks to;
//!   one implementation per resource kind lives on [`ApiClient`]
//! - Entity-specific queries ([`DonorQueries`], [`TransferQueries`]),
//!   [`StatsSource`], and [`Authenticator`] are separate traits so each
//!   controller depends on only what it calls
//! - Every call is a single request/response round trip with no retry
//!
//! # Errors
//!
//! All failures collapse into three user-visible kinds: the request never
//! completed ([`GatewayError::Network`]), the server refused it
//! ([`GatewayError::Rejected`]), or the reply could not be understood
//! ([`GatewayError::Malformed`]).

pub mod auth;
pub mod client;
pub mod donors;
pub mod envelope;
pub mod records;
pub mod stats;
pub mod transfers;

pub use auth::Credentials;
pub use client::ApiClient;

use async_trait::async_trait;
use pustakalaya_core::{
    Book, DonatedBook, DonationCertificate, DonorId, LibraryStats, ResourceKind, Session,
};
use thiserror::Error;

use crate::controller::forms::TransferDraft;
use crate::controller::{Resource, ResourceForm};

/// Shown when a request could not complete.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection and try again.";

/// Shown when a reply could not be understood.
pub const MALFORMED_RESPONSE_MESSAGE: &str =
    "The library server sent a response that could not be read. Please try again.";

/// Errors that can occur when talking to the library API.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request could not be sent or the reply could not be received.
    #[error("HTTP error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// The reply was not a well-formed envelope, or its data had the wrong shape.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// An endpoint URL could not be built from the configured base.
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// The resource does not offer this operation.
    #[error("{operation} is not supported for {kind}")]
    Unsupported {
        kind: ResourceKind,
        operation: Operation,
    },
}

impl GatewayError {
    /// Text suitable for showing to staff.
    ///
    /// Server messages are passed through verbatim; transport and parsing
    /// details stay in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) | Self::Url(_) => NETWORK_ERROR_MESSAGE.to_string(),
            Self::Rejected(message) => message.clone(),
            Self::Malformed(_) => MALFORMED_RESPONSE_MESSAGE.to_string(),
            Self::Unsupported { kind, operation } => {
                format!("{}s cannot be {}", kind.title(), operation.past_participle())
            }
        }
    }
}

/// A mutating or reading operation on a resource collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Verb used by the API's `action` parameter and in messages.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Create => "add",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    const fn past_participle(self) -> &'static str {
        match self {
            Self::Fetch => "fetched",
            Self::Create => "added",
            Self::Update => "updated",
            Self::Delete => "deleted",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verb())
    }
}

/// Message used when the server refuses an operation without saying why.
#[must_use]
pub fn fallback_message(kind: ResourceKind, operation: Operation) -> String {
    match operation {
        Operation::Fetch => format!("Failed to fetch {}", kind.plural()),
        _ => format!("Failed to {} {}", operation.verb(), kind.singular()),
    }
}

/// Draft payload produced by validating a resource's form.
pub type Draft<R> = <<R as Resource>::Form as ResourceForm>::Draft;

/// CRUD access to one kind of resource.
#[async_trait]
pub trait ResourceGateway<R: Resource>: Send + Sync {
    /// Fetch the full, unpaginated collection.
    async fn fetch_all(&self) -> Result<Vec<R>, GatewayError>;

    /// Create a record and return the server's canonical representation.
    async fn create(&self, draft: &Draft<R>) -> Result<R, GatewayError>;

    /// Update a record and return the server's canonical representation.
    async fn update(&self, id: &R::Id, draft: &Draft<R>) -> Result<R, GatewayError>;

    /// Delete a record.
    async fn delete(&self, id: &R::Id) -> Result<(), GatewayError>;
}

/// Read-only queries about a single donor.
#[async_trait]
pub trait DonorQueries: Send + Sync {
    /// Books the donor has given, each with its donation date.
    async fn donated_books(&self, donor: &DonorId) -> Result<Vec<DonatedBook>, GatewayError>;

    /// The donor's most recent certificate, if one was issued.
    async fn latest_certificate(
        &self,
        donor: &DonorId,
    ) -> Result<Option<DonationCertificate>, GatewayError>;

    /// Absolute location of a certificate image.
    fn certificate_url(&self, certificate: &DonationCertificate) -> Option<String>;
}

/// Queries backing the transfer desk's book picker.
#[async_trait]
pub trait TransferQueries: Send + Sync {
    /// Books that can be chosen as the source of a transfer.
    async fn transferable_books(&self) -> Result<Vec<Book>, GatewayError>;

    /// Record a transfer. The server decrements the source book's count.
    async fn record_transfer(&self, draft: &TransferDraft) -> Result<(), GatewayError>;
}

/// Source of the program-wide counters.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn fetch_stats(&self) -> Result<LibraryStats, GatewayError>;
}

/// Exchanges staff credentials for an identity.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<Session, GatewayError>;
}
