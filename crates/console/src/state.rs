//! Application state shared across handlers.

use std::sync::Arc;

use pustakalaya_core::{Book, Donor, Librarian};
use tokio::sync::{Mutex, RwLock};

use crate::config::ConsoleConfig;
use crate::controller::{DonorDetails, ListController, TransferDesk};
use crate::gateway::{ApiClient, GatewayError};
use crate::session::{IdentityStore, SessionHolder};
use crate::stats::StatsAggregator;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Each screen's controller sits
/// behind its own mutex, so requests against one screen run one at a time
/// while other screens stay responsive.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ConsoleConfig,
    api: ApiClient,
    session: RwLock<SessionHolder>,
    books: Mutex<ListController<Book>>,
    donors: Mutex<ListController<Donor>>,
    donor_details: Mutex<DonorDetails>,
    librarians: Mutex<ListController<Librarian>>,
    transfers: Mutex<TransferDesk>,
    stats: Mutex<StatsAggregator>,
}

impl AppState {
    /// Create a new application state and restore any stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ConsoleConfig, store: Box<dyn IdentityStore>) -> Result<Self, GatewayError> {
        let api = ApiClient::new(&config.api)?;
        let shared = Arc::new(api.clone());

        let mut session = SessionHolder::new(store);
        session.restore();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                books: Mutex::new(ListController::new(shared.clone())),
                donors: Mutex::new(ListController::new(shared.clone())),
                donor_details: Mutex::new(DonorDetails::new(shared.clone())),
                librarians: Mutex::new(ListController::new(shared.clone())),
                transfers: Mutex::new(TransferDesk::new(shared.clone(), shared.clone())),
                stats: Mutex::new(StatsAggregator::new(shared)),
                session: RwLock::new(session),
                config,
                api,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    /// The remote API client, also used as the authenticator.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn session(&self) -> &RwLock<SessionHolder> {
        &self.inner.session
    }

    #[must_use]
    pub fn books(&self) -> &Mutex<ListController<Book>> {
        &self.inner.books
    }

    #[must_use]
    pub fn donors(&self) -> &Mutex<ListController<Donor>> {
        &self.inner.donors
    }

    #[must_use]
    pub fn donor_details(&self) -> &Mutex<DonorDetails> {
        &self.inner.donor_details
    }

    #[must_use]
    pub fn librarians(&self) -> &Mutex<ListController<Librarian>> {
        &self.inner.librarians
    }

    #[must_use]
    pub fn transfers(&self) -> &Mutex<TransferDesk> {
        &self.inner.transfers
    }

    #[must_use]
    pub fn stats(&self) -> &Mutex<StatsAggregator> {
        &self.inner.stats
    }

    /// Drop every screen's state, so the next staff member starts clean.
    pub async fn reset_screens(&self) {
        self.inner.books.lock().await.reset();
        self.inner.donors.lock().await.reset();
        self.inner.donor_details.lock().await.reset();
        self.inner.librarians.lock().await.reset();
        self.inner.transfers.lock().await.reset();
        self.inner.stats.lock().await.reset();
    }
}
