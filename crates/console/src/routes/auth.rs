//! Login and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use super::Screen;
use crate::gateway::Credentials;
use crate::middleware::{ConsoleForm, OptionalSession, RequireSession};
use crate::state::AppState;

/// Login form body.
///
/// Implements `Debug` manually to redact the password.
#[derive(Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    /// Kept so a failed attempt does not clear the field.
    pub email: String,
    pub error: Option<String>,
}

/// Login page; signed-in staff go straight to the console.
pub async fn login_page(OptionalSession(session): OptionalSession) -> Response {
    if session.is_some() {
        return Redirect::to(Screen::HOME.path()).into_response();
    }
    LoginTemplate {
        email: String::new(),
        error: None,
    }
    .into_response()
}

/// Verify the credentials and start a session.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    ConsoleForm(form): ConsoleForm<LoginForm>,
) -> Response {
    // Whatever the previous staff member left behind is dropped.
    state.reset_screens().await;

    let credentials = Credentials::new(form.email.clone(), form.password);

    let mut holder = state.session().write().await;
    match holder.login(state.api(), credentials).await {
        Ok(_) => Redirect::to(Screen::HOME.path()).into_response(),
        Err(e) => {
            LoginTemplate {
                email: form.email,
                error: Some(e.user_message()),
            }
            .into_response()
        }
    }
}

/// End the session and forget every screen's state.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, RequireSession(session): RequireSession) -> Redirect {
    state.session().write().await.logout();
    state.reset_screens().await;
    tracing::debug!(user_id = %session.user_id, "Screens reset after logout");
    Redirect::to("/login")
}
