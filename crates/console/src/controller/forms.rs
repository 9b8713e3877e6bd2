//! Create/edit forms for each resource kind and their request payloads.

use pustakalaya_core::{
    Book, BookId, Donor, DonorId, Librarian, LibrarianId, ResourceKind, Transfer, TransferId,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use super::resource::{FormMode, Resource, ResourceForm, required, required_count};

/// Shown when the transfer form is incomplete.
pub const TRANSFER_INCOMPLETE_MESSAGE: &str =
    "Please select a book, enter destination, and specify count greater than 0";

// =============================================================================
// Books
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub copy_count: String,
    /// Only offered when recording a new book.
    #[serde(default)]
    pub donor_id: String,
}

#[derive(Debug, Serialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub category: String,
    #[serde(rename = "count")]
    pub copy_count: u32,
    #[serde(rename = "donorId", skip_serializing_if = "Option::is_none")]
    pub donor_id: Option<DonorId>,
}

impl ResourceForm for BookForm {
    type Draft = BookDraft;

    fn validate(&self, mode: FormMode) -> Result<BookDraft, String> {
        let donor_id = match mode {
            FormMode::Create => Some(self.donor_id.trim())
                .filter(|id| !id.is_empty())
                .map(DonorId::from),
            FormMode::Edit => None,
        };

        Ok(BookDraft {
            title: required(&self.title, "Title")?,
            author: required(&self.author, "Author")?,
            category: required(&self.category, "Category")?,
            copy_count: required_count(&self.copy_count, "Copy count")?,
            donor_id,
        })
    }
}

impl Resource for Book {
    type Id = BookId;
    type Form = BookForm;
    const KIND: ResourceKind = ResourceKind::Book;

    fn id(&self) -> &BookId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.author.as_str(),
            self.category.as_str(),
        ]
    }

    fn edit_form(&self) -> BookForm {
        BookForm {
            title: self.title.clone(),
            author: self.author.clone(),
            category: self.category.clone(),
            copy_count: self.copy_count.to_string(),
            donor_id: String::new(),
        }
    }
}

// =============================================================================
// Donors
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DonorForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct DonorDraft {
    pub name: String,
    pub phone: String,
}

impl ResourceForm for DonorForm {
    type Draft = DonorDraft;

    fn validate(&self, _mode: FormMode) -> Result<DonorDraft, String> {
        Ok(DonorDraft {
            name: required(&self.name, "Name")?,
            phone: required(&self.phone, "Phone")?,
        })
    }
}

impl Resource for Donor {
    type Id = DonorId;
    type Form = DonorForm;
    const KIND: ResourceKind = ResourceKind::Donor;

    fn id(&self) -> &DonorId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.phone.as_str()]
    }

    fn edit_form(&self) -> DonorForm {
        DonorForm {
            name: self.name.clone(),
            phone: self.phone.clone(),
        }
    }
}

// =============================================================================
// Librarians
// =============================================================================

/// Librarian account form.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, Default, Deserialize)]
pub struct LibrarianForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// Required on create; left blank on edit to keep the current password.
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for LibrarianForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibrarianForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub struct LibrarianDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "expose_password"
    )]
    pub password: Option<SecretString>,
}

#[allow(clippy::ref_option)] // signature required by serde's serialize_with
fn expose_password<S: Serializer>(
    password: &Option<SecretString>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match password {
        Some(password) => serializer.serialize_str(password.expose_secret()),
        None => serializer.serialize_none(),
    }
}

impl ResourceForm for LibrarianForm {
    type Draft = LibrarianDraft;

    fn validate(&self, mode: FormMode) -> Result<LibrarianDraft, String> {
        let name = required(&self.name, "Name")?;
        let email = required(&self.email, "Email")?;
        let phone = required(&self.phone, "Phone")?;
        // Passwords are sent exactly as typed.
        let password = match mode {
            FormMode::Create => {
                required(&self.password, "Password")?;
                Some(self.password.clone())
            }
            FormMode::Edit => Some(self.password.clone()).filter(|p| !p.trim().is_empty()),
        };

        Ok(LibrarianDraft {
            name,
            email,
            phone,
            password: password.map(SecretString::from),
        })
    }

    fn scrub(&mut self) {
        self.password.clear();
    }
}

impl Resource for Librarian {
    type Id = LibrarianId;
    type Form = LibrarianForm;
    const KIND: ResourceKind = ResourceKind::Librarian;

    fn id(&self) -> &LibrarianId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
        ]
    }

    fn edit_form(&self) -> LibrarianForm {
        LibrarianForm {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            password: String::new(),
        }
    }
}

// =============================================================================
// Transfers
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransferForm {
    #[serde(default)]
    pub book_id: String,
    #[serde(default)]
    pub count: String,
    #[serde(default)]
    pub destination: String,
}

#[derive(Debug, Serialize)]
pub struct TransferDraft {
    #[serde(rename = "bookId")]
    pub book_id: BookId,
    pub count: u32,
    pub destination: String,
}

impl ResourceForm for TransferForm {
    type Draft = TransferDraft;

    fn validate(&self, _mode: FormMode) -> Result<TransferDraft, String> {
        let book_id = self.book_id.trim();
        let destination = self.destination.trim();
        let count = self.count.trim().parse::<u32>().unwrap_or(0);

        if book_id.is_empty() || destination.is_empty() || count == 0 {
            return Err(TRANSFER_INCOMPLETE_MESSAGE.to_string());
        }

        Ok(TransferDraft {
            book_id: BookId::from(book_id),
            count,
            destination: destination.to_string(),
        })
    }
}

impl Resource for Transfer {
    type Id = TransferId;
    type Form = TransferForm;
    const KIND: ResourceKind = ResourceKind::Transfer;
    const EDITABLE: bool = false;

    fn id(&self) -> &TransferId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.destination.as_str()];
        fields.extend(self.book_title.as_deref());
        fields
    }

    fn edit_form(&self) -> TransferForm {
        TransferForm {
            book_id: self.book_id.to_string(),
            count: self.copies_moved.to_string(),
            destination: self.destination.clone(),
        }
    }
}
