//! Stats card retry.

use axum::{extract::State, response::Redirect};
use serde::Deserialize;
use tracing::instrument;

use super::Screen;
use crate::middleware::{ConsoleForm, RequireSession};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RefreshForm {
    #[serde(default)]
    pub return_to: String,
}

/// Only local paths are followed; anything else goes home.
fn safe_return_path(raw: &str) -> &str {
    if raw.starts_with('/') && !raw.starts_with("//") && !raw.contains('\\') {
        raw
    } else {
        Screen::HOME.path()
    }
}

/// Fetch the counters again and go back to the page that asked.
#[instrument(skip_all)]
pub async fn refresh(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
    ConsoleForm(form): ConsoleForm<RefreshForm>,
) -> Redirect {
    // The cards show a failure themselves.
    let _ = state.stats().lock().await.refresh().await;
    Redirect::to(safe_return_path(&form.return_to))
}
