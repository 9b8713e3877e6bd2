//! HTTP-layer errors and Sentry user context.
//!
//! Gateway failures never reach this type; screens recover from them and
//! show a banner. `AppError` covers what is left: unknown records and
//! request bodies that do not decode. Panics reach Sentry through its
//! panic integration.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pustakalaya_core::Session;
use thiserror::Error;

/// Application-level error type for the console.
#[derive(Debug, Error)]
pub enum AppError {
    /// No record with this id is on screen.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The submitted form could not be decoded.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        tracing::debug!(error = %self, %status, "Console request refused");

        (status, self.to_string()).into_response()
    }
}

/// Set the Sentry user context from the signed-in staff member.
pub fn set_sentry_user(session: &Session) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(session.user_id.to_string()),
            email: Some(session.email.clone()).filter(|e| !e.is_empty()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
