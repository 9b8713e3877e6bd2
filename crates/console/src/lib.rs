//! Pustakalaya Console library.
//!
//! The staff console for the library-donation program: a browser front end
//! over the remote library API, plus the controllers and gateway it is built
//! on. The `pk` terminal client reuses the same controllers.
//!
//! # Layers
//!
//! - [`gateway`] - Typed calls against the API's JSON envelope
//! - [`controller`] - Screen state: lists, filters, paging, dialogs, forms
//! - [`session`] - The logged-in identity and where it is kept
//! - [`stats`] - The four library counters
//! - [`routes`] - Server-rendered pages over the controllers
//!
//! # Security
//!
//! The console holds one process-wide session, so it must only listen on
//! loopback (the default). Anyone who can reach the port acts as the signed
//! in staff member.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod controller;
pub mod error;
pub mod filters;
pub mod gateway;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;
pub mod stats;

use std::path::Path;

use axum::Router;
use tower_http::services::ServeDir;

use state::AppState;

/// Build the console application: every route plus the stylesheet directory.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    routes::routes()
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}
