//! Records exchanged with the remote library API.

pub mod book;
pub mod donor;
pub mod librarian;
pub mod session;
pub mod stats;
pub mod transfer;

pub use book::Book;
pub use donor::{DonatedBook, DonationCertificate, Donor};
pub use librarian::Librarian;
pub use session::Session;
pub use stats::LibraryStats;
pub use transfer::Transfer;
