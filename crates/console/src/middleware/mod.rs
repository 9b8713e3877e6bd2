//! Request extractors.

pub mod auth;
pub mod form;

pub use auth::{OptionalSession, RequireSession};
pub use form::ConsoleForm;
