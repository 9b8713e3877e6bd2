//! Library API HTTP client.
//!
//! Provides the shared transport for every gateway implementation: endpoint
//! resolution against the configured base URL, JSON request bodies, and
//! envelope decoding.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::GatewayError;
use super::envelope::Envelope;
use crate::config::ApiConfig;

/// Library API client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    uploads_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("uploads_url", &self.inner.uploads_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new client for the configured API.
    ///
    /// No request timeout is set unless the configuration asks for one.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Network` if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client: builder.build()?,
                base_url: config.base_url.clone(),
                uploads_url: config.uploads_url.clone(),
            }),
        })
    }

    /// Base URL endpoint scripts are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve a path relative to the uploads location.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Url` if the path cannot be joined.
    pub fn upload_url(&self, relative_path: &str) -> Result<Url, GatewayError> {
        Ok(self
            .inner
            .uploads_url
            .join(relative_path.trim_start_matches('/'))?)
    }

    /// Build an endpoint URL for `script` with the given query parameters.
    pub(crate) fn endpoint(&self, script: &str, query: &[(&str, &str)]) -> Result<Url, GatewayError> {
        let mut url = self.inner.base_url.join(script)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// GET `url` and decode the envelope's data.
    #[instrument(skip(self, fallback), fields(url = %url))]
    pub(crate) async fn get_data<T: DeserializeOwned>(
        &self,
        url: Url,
        fallback: &str,
    ) -> Result<T, GatewayError> {
        self.send(self.inner.client.get(url))
            .await?
            .into_data(fallback)
    }

    /// POST a JSON `body` to `url` and decode the envelope's data.
    #[instrument(skip(self, body, fallback), fields(url = %url))]
    pub(crate) async fn post_data<B, T>(
        &self,
        url: Url,
        body: &B,
        fallback: &str,
    ) -> Result<T, GatewayError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.inner.client.post(url).json(body))
            .await?
            .into_data(fallback)
    }

    /// POST a JSON `body` to `url` and only check the envelope's success flag.
    #[instrument(skip(self, body, fallback), fields(url = %url))]
    pub(crate) async fn post_unit<B>(
        &self,
        url: Url,
        body: &B,
        fallback: &str,
    ) -> Result<(), GatewayError>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.send(self.inner.client.post(url).json(body))
            .await?
            .into_unit(fallback)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Envelope, GatewayError> {
        let response = request.send().await.inspect_err(|e| {
            tracing::warn!(error = %e, "Library API request failed");
        })?;
        let status = response.status();
        let body = response.bytes().await?;

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "Library API replied");

        Envelope::parse(status, &body).inspect_err(|e| {
            tracing::warn!(error = %e, status = status.as_u16(), "Unreadable library API reply");
        })
    }
}
