//! Donors, the books they gave, and their donation certificates.

use serde::{Deserialize, Serialize};

use crate::models::Book;
use crate::types::lenient;
use crate::types::{BookId, CertificateId, DonorId};

/// A person or organization that donated books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donor {
    pub id: DonorId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub address: Option<String>,
    #[serde(
        rename = "totalDonations",
        default,
        deserialize_with = "lenient::count"
    )]
    pub total_donation_count: u32,
    #[serde(
        rename = "lastDonationDate",
        default,
        deserialize_with = "lenient::optional_text"
    )]
    pub last_donation_date: Option<String>,
    #[serde(rename = "donatedBooks", default, deserialize_with = "lenient::list")]
    pub donated_book_ids: Vec<BookId>,
}

/// A book as returned by a donor's donated-books query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonatedBook {
    #[serde(flatten)]
    pub book: Book,
    #[serde(rename = "donationDate", default, deserialize_with = "lenient::text")]
    pub donation_date: String,
}

impl DonatedBook {
    /// Total copies across a donor's donated books.
    #[must_use]
    pub fn total_copies(books: &[Self]) -> u64 {
        books.iter().map(|b| u64::from(b.book.copy_count)).sum()
    }
}

/// The most recent donation certificate issued to a donor.
///
/// `file_path` is relative to the API's uploads location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationCertificate {
    #[serde(rename = "f_id")]
    pub id: CertificateId,
    #[serde(rename = "f_path", deserialize_with = "lenient::text")]
    pub file_path: String,
    #[serde(rename = "f_createdat", default, deserialize_with = "lenient::text")]
    pub created_at: String,
    #[serde(rename = "f_updatedat", default, deserialize_with = "lenient::text")]
    pub updated_at: String,
}
