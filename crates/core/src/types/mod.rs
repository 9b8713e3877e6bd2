//! Core types for Pustakalaya.
//!
//! This module provides type-safe wrappers for the identifiers and
//! enumerations the remote library API exchanges.

pub mod id;
pub mod kind;
pub mod lenient;
pub mod role;

pub use id::*;
pub use kind::ResourceKind;
pub use role::{Role, RoleError};
