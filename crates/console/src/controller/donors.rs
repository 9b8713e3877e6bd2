//! Per-donor detail panels: donated books and the latest certificate.

use std::sync::Arc;

use pustakalaya_core::{DonatedBook, DonationCertificate, Donor, DonorId};

use crate::gateway::{DonorQueries, GatewayError};

/// The donated-books panel for one donor.
#[derive(Debug, Clone)]
pub struct DonatedBooksPanel {
    pub donor: Donor,
    pub books: Vec<DonatedBook>,
    /// Sum of the copy counts across `books`.
    pub total_copies: u64,
}

/// The latest certificate looked up for one donor.
#[derive(Debug, Clone)]
pub struct CertificatePanel {
    pub donor_id: DonorId,
    /// `None` when no certificate was issued or the lookup failed.
    pub certificate: Option<DonationCertificate>,
    pub image_url: Option<String>,
}

/// Detail lookups that sit beside the donor list.
pub struct DonorDetails {
    queries: Arc<dyn DonorQueries>,
    certificate: Option<CertificatePanel>,
    donated: Option<DonatedBooksPanel>,
    error: Option<String>,
}

impl DonorDetails {
    #[must_use]
    pub fn new(queries: Arc<dyn DonorQueries>) -> Self {
        Self {
            queries,
            certificate: None,
            donated: None,
            error: None,
        }
    }

    /// Look up the donor's latest certificate.
    ///
    /// Lookup failures are not shown to staff; the panel just reports that
    /// no certificate is available.
    pub async fn show_certificate(&mut self, donor: &Donor) {
        let certificate = match self.queries.latest_certificate(&donor.id).await {
            Ok(certificate) => certificate,
            Err(e) => {
                tracing::debug!(donor_id = %donor.id, error = %e, "No certificate available");
                None
            }
        };
        let image_url = certificate
            .as_ref()
            .and_then(|c| self.queries.certificate_url(c));

        self.certificate = Some(CertificatePanel {
            donor_id: donor.id.clone(),
            certificate,
            image_url,
        });
    }

    /// The certificate panel, if it was looked up for `donor_id`.
    #[must_use]
    pub fn certificate_for(&self, donor_id: &DonorId) -> Option<&CertificatePanel> {
        self.certificate
            .as_ref()
            .filter(|panel| &panel.donor_id == donor_id)
    }

    /// Fetch the books `donor` has given and open the panel.
    ///
    /// On failure the panel opens empty and the error banner explains why.
    ///
    /// # Errors
    ///
    /// Returns the gateway error after recording it in the banner.
    pub async fn show_donated_books(&mut self, donor: &Donor) -> Result<(), GatewayError> {
        self.error = None;
        let result = self.queries.donated_books(&donor.id).await;

        let (books, outcome) = match result {
            Ok(books) => (books, Ok(())),
            Err(e) => {
                tracing::warn!(donor_id = %donor.id, error = %e, "Donated books fetch failed");
                self.error = Some(e.user_message());
                (Vec::new(), Err(e))
            }
        };

        self.donated = Some(DonatedBooksPanel {
            donor: donor.clone(),
            total_copies: DonatedBook::total_copies(&books),
            books,
        });
        outcome
    }

    #[must_use]
    pub const fn donated_books(&self) -> Option<&DonatedBooksPanel> {
        self.donated.as_ref()
    }

    pub fn close_donated_books(&mut self) {
        self.donated = None;
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn reset(&mut self) {
        self.certificate = None;
        self.donated = None;
        self.error = None;
    }
}
