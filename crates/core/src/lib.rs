//! Pustakalaya Core - Shared types for the library-donation console.
//!
//! This crate provides the types used across the Pustakalaya components:
//! - `console` - Browser console, controllers, and the remote API gateway
//! - `cli` - Terminal front end over the same controllers
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! persistence. Every type here mirrors a payload of the remote library API,
//! so the serde attributes carry the wire names while the Rust field names
//! describe what the value means.
//!
//! # Modules
//!
//! - [`types`] - Opaque IDs, staff roles, resource kinds, lenient deserializers
//! - [`models`] - Books, donors, librarians, transfers, stats, and the session

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
