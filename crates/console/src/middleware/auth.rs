//! Session extractors for route handlers.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use pustakalaya_core::Session;

use crate::state::AppState;

/// Extractor that requires a signed-in staff member.
///
/// Without a session the request is redirected to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireSession(session): RequireSession) -> impl IntoResponse {
///     format!("Welcome, {}", session.display_name)
/// }
/// ```
pub struct RequireSession(pub Session);

/// Rejection returned when no one is signed in.
pub struct LoginRequired;

impl IntoResponse for LoginRequired {
    fn into_response(self) -> Response {
        Redirect::to("/login").into_response()
    }
}

impl FromRequestParts<AppState> for RequireSession {
    type Rejection = LoginRequired;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state
            .session()
            .read()
            .await
            .current()
            .cloned()
            .map(Self)
            .ok_or(LoginRequired)
    }
}

/// Extractor that optionally gets the signed-in staff member.
pub struct OptionalSession(pub Option<Session>);

impl FromRequestParts<AppState> for OptionalSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(state.session().read().await.current().cloned()))
    }
}
