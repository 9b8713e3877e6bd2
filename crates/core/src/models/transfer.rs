//! Inter-location book transfers.

use serde::{Deserialize, Serialize};

use crate::types::lenient;
use crate::types::{BookId, TransferId};

/// A movement of copies of one book to another location.
///
/// At creation time `copies_moved` was at most the source book's copy
/// count; the server decremented the book accordingly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    #[serde(rename = "t_id")]
    pub id: TransferId,
    #[serde(rename = "tb_id")]
    pub book_id: BookId,
    #[serde(rename = "tb_count", default, deserialize_with = "lenient::count")]
    pub copies_moved: u32,
    #[serde(rename = "t_destination", default, deserialize_with = "lenient::text")]
    pub destination: String,
    #[serde(rename = "t_createdAt", default, deserialize_with = "lenient::text")]
    pub created_at: String,
    #[serde(rename = "t_updatedAt", default, deserialize_with = "lenient::text")]
    pub updated_at: String,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub book_title: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub book_author: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub book_category: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_from_wire_with_numeric_ids() {
        let transfer: Transfer = serde_json::from_str(
            r#"{
                "t_id": 12,
                "tb_id": 4,
                "t_destination": "Branch Library, Butwal",
                "tb_count": "2",
                "t_createdAt": "2024-07-01 09:00:00",
                "t_updatedAt": "2024-07-01 09:00:00",
                "book_title": "Seto Dharti"
            }"#,
        )
        .unwrap();

        assert_eq!(transfer.id, TransferId::new("12"));
        assert_eq!(transfer.book_id, BookId::new("4"));
        assert_eq!(transfer.copies_moved, 2);
        assert_eq!(transfer.book_title.as_deref(), Some("Seto Dharti"));
        assert_eq!(transfer.book_author, None);
    }
}
