//! Program-wide counters.

use serde::{Deserialize, Serialize};

use crate::types::lenient;

/// Aggregate counters, delivered together by a single stats call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStats {
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_books: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_donors: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_librarians: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_donations: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_from_wire() {
        let stats: LibraryStats = serde_json::from_str(
            r#"{"totalBooks": "1250", "totalDonors": 311, "totalLibrarians": 6, "totalDonations": "402"}"#,
        )
        .unwrap();
        assert_eq!(
            stats,
            LibraryStats {
                total_books: 1250,
                total_donors: 311,
                total_librarians: 6,
                total_donations: 402,
            }
        );
    }
}
