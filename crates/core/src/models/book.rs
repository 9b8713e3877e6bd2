//! Donated book records.

use serde::{Deserialize, Serialize};

use crate::types::lenient;
use crate::types::{BookId, DonorId, UserId};

/// A donated book title held by the program.
///
/// `copy_count` is the number of physical copies still at the book's
/// current location. The server decrements it when a transfer is recorded,
/// so clients re-fetch instead of computing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub author: String,
    #[serde(rename = "count", default, deserialize_with = "lenient::count")]
    pub copy_count: u32,
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: String,
    /// Weak reference; the donor may have been deleted since.
    #[serde(rename = "donorId", default)]
    pub donor_id: Option<DonorId>,
    #[serde(rename = "destination", default, deserialize_with = "lenient::text")]
    pub current_location: String,
    #[serde(rename = "addedBy", default)]
    pub recorded_by: Option<UserId>,
    #[serde(rename = "addedDate", default, deserialize_with = "lenient::text")]
    pub date_added: String,
}

impl Book {
    /// Whether at least one copy is available to transfer.
    #[must_use]
    pub const fn is_transferable(&self) -> bool {
        self.copy_count > 0
    }
}
