//! Donor detail queries: donated books and the latest certificate.

use async_trait::async_trait;
use pustakalaya_core::{DonatedBook, DonationCertificate, DonorId};
use tracing::instrument;

use super::{ApiClient, DonorQueries, GatewayError};

const SCRIPT: &str = "p_donors_management_web.php";

#[async_trait]
impl DonorQueries for ApiClient {
    #[instrument(skip(self), fields(donor_id = %donor))]
    async fn donated_books(&self, donor: &DonorId) -> Result<Vec<DonatedBook>, GatewayError> {
        let url = self.endpoint(
            SCRIPT,
            &[("action", "getDonatedBooks"), ("donorId", donor.as_str())],
        )?;
        self.get_data(url, "Failed to fetch donated books").await
    }

    #[instrument(skip(self), fields(donor_id = %donor))]
    async fn latest_certificate(
        &self,
        donor: &DonorId,
    ) -> Result<Option<DonationCertificate>, GatewayError> {
        let url = self.endpoint(
            SCRIPT,
            &[("action", "getLatestCertificate"), ("donorId", donor.as_str())],
        )?;
        self.get_data(url, "Failed to fetch certificate").await
    }

    fn certificate_url(&self, certificate: &DonationCertificate) -> Option<String> {
        self.upload_url(&certificate.file_path)
            .map(String::from)
            .inspect_err(|e| {
                tracing::warn!(error = %e, path = %certificate.file_path, "Bad certificate path");
            })
            .ok()
    }
}
