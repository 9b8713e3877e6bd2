//! Program-wide counters endpoint.

use async_trait::async_trait;
use pustakalaya_core::LibraryStats;
use tracing::instrument;

use super::{ApiClient, GatewayError, StatsSource};

const SCRIPT: &str = "p_stats_web.php";

#[async_trait]
impl StatsSource for ApiClient {
    #[instrument(skip(self))]
    async fn fetch_stats(&self) -> Result<LibraryStats, GatewayError> {
        let url = self.endpoint(SCRIPT, &[])?;
        self.get_data(url, "Failed to fetch stats").await
    }
}
