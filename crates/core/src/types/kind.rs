//! The four record kinds the console manages.

use serde::{Deserialize, Serialize};

/// A kind of record managed through the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Book,
    Donor,
    Librarian,
    Transfer,
}

impl ResourceKind {
    /// All kinds, in navigation order.
    pub const ALL: [Self; 4] = [Self::Book, Self::Donor, Self::Librarian, Self::Transfer];

    /// Lowercase singular noun, used inside messages ("Failed to update book").
    #[must_use]
    pub const fn singular(self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::Donor => "donor",
            Self::Librarian => "librarian",
            Self::Transfer => "transfer",
        }
    }

    /// Lowercase plural noun ("Failed to fetch books").
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Book => "books",
            Self::Donor => "donors",
            Self::Librarian => "librarians",
            Self::Transfer => "transfers",
        }
    }

    /// Capitalized singular noun for headings and buttons.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Book => "Book",
            Self::Donor => "Donor",
            Self::Librarian => "Librarian",
            Self::Transfer => "Transfer",
        }
    }

    /// Prompt shown before deleting a record of this kind.
    #[must_use]
    pub fn delete_prompt(self) -> String {
        format!("Are you sure you want to delete this {}?", self.singular())
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.plural())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| s == kind.singular() || s == kind.plural())
            .ok_or_else(|| format!("unknown resource: {s}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_prompt() {
        assert_eq!(
            ResourceKind::Donor.delete_prompt(),
            "Are you sure you want to delete this donor?"
        );
    }

    #[test]
    fn test_parse_singular_and_plural() {
        assert_eq!("books".parse::<ResourceKind>().unwrap(), ResourceKind::Book);
        assert_eq!(
            "librarian".parse::<ResourceKind>().unwrap(),
            ResourceKind::Librarian
        );
        assert!("patrons".parse::<ResourceKind>().is_err());
    }
}
