//! Librarian accounts.

use serde::{Deserialize, Serialize};

use crate::types::LibrarianId;
use crate::types::lenient;

/// A staff member who records donations and transfers.
///
/// The account password is write-only and never appears here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Librarian {
    pub id: LibrarianId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: String,
    #[serde(rename = "joinDate", default, deserialize_with = "lenient::text")]
    pub join_date: String,
    #[serde(rename = "booksRecorded", default, deserialize_with = "lenient::count")]
    pub books_recorded_count: u32,
    #[serde(
        rename = "totalDonationsProcessed",
        default,
        deserialize_with = "lenient::count"
    )]
    pub donations_processed_count: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_librarian_from_wire() {
        let librarian: Librarian = serde_json::from_str(
            r#"{
                "id": "3",
                "name": "Hari Thapa",
                "email": "hari@pustakalaya.org",
                "phone": "9800000001",
                "joinDate": "2023-11-20",
                "booksRecorded": "41",
                "totalDonationsProcessed": 17,
                "password": "never-read"
            }"#,
        )
        .unwrap();

        assert_eq!(librarian.books_recorded_count, 41);
        assert_eq!(librarian.donations_processed_count, 17);
        let json = serde_json::to_string(&librarian).unwrap();
        assert!(!json.contains("never-read"));
    }
}
