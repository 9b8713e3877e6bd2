//! Screen controllers.
//!
//! Each screen is a plain state machine over a gateway trait object: the
//! generic [`ListController`] behind Books, Donors, and Librarians, plus
//! [`DonorDetails`] and [`TransferDesk`] for the panels that do not fit the
//! list shape. Controllers never render; route handlers read their state.

pub mod collection;
pub mod dialog;
pub mod donors;
pub mod forms;
pub mod list;
pub mod resource;
pub mod transfers;

pub use collection::{PAGE_SIZE, Pager, ResourceList};
pub use dialog::Dialog;
pub use donors::{CertificatePanel, DonatedBooksPanel, DonorDetails};
pub use list::{ListController, RemoveOutcome, SubmitError};
pub use resource::{FormMode, Resource, ResourceForm};
pub use transfers::{TRANSFER_ADDED_NOTICE, TRANSFER_DELETED_NOTICE, TransferDesk};
