//! Program-wide counters shown above every screen.

use std::sync::Arc;

use pustakalaya_core::LibraryStats;

use crate::gateway::{GatewayError, StatsSource};

/// The four counters and the state of the last fetch.
///
/// A failed refresh keeps whatever counters were shown before.
pub struct StatsAggregator {
    source: Arc<dyn StatsSource>,
    stats: Option<LibraryStats>,
    error: Option<String>,
    loaded: bool,
    is_loading: bool,
}

impl StatsAggregator {
    #[must_use]
    pub fn new(source: Arc<dyn StatsSource>) -> Self {
        Self {
            source,
            stats: None,
            error: None,
            loaded: false,
            is_loading: false,
        }
    }

    /// The last counters fetched, if any fetch has succeeded.
    #[must_use]
    pub const fn stats(&self) -> Option<&LibraryStats> {
        self.stats.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Fetch all four counters in one call.
    ///
    /// # Errors
    ///
    /// Returns the gateway error after recording it for display.
    pub async fn refresh(&mut self) -> Result<(), GatewayError> {
        self.is_loading = true;
        let result = self.source.fetch_stats().await;
        self.is_loading = false;
        self.loaded = true;

        match result {
            Ok(stats) => {
                self.stats = Some(stats);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Stats fetch failed");
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Fetch on first display after login.
    ///
    /// # Errors
    ///
    /// Returns the gateway error after recording it for display.
    pub async fn ensure_loaded(&mut self) -> Result<(), GatewayError> {
        if self.loaded {
            return Ok(());
        }
        self.refresh().await
    }

    pub fn reset(&mut self) {
        self.stats = None;
        self.error = None;
        self.loaded = false;
        self.is_loading = false;
    }
}
