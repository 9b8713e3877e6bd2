//! Generic handlers for the list screens.
//!
//! Books, Donors, and Librarians share one set of handlers, parameterized by
//! [`ResourceScreen`]. Every handler locks the screen's controller, applies
//! one intent, and either redirects back to the list or renders the screen
//! with the dialog the intent opened.

use async_trait::async_trait;
use axum::{
    Router,
    extract::{OriginalUri, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use pustakalaya_core::Session;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::instrument;

use super::Screen;
use super::chrome::Chrome;
use super::views::{PagerView, list_href};
use crate::controller::{Dialog, FormMode, ListController, RemoveOutcome, Resource};
use crate::error::AppError;
use crate::middleware::{ConsoleForm, RequireSession};
use crate::state::AppState;

/// A record kind with its own list screen.
#[async_trait]
pub trait ResourceScreen: Resource<Form: DeserializeOwned> {
    const SCREEN: Screen;

    fn controller(state: &AppState) -> &Mutex<ListController<Self>>;

    /// Extra lookups before the view dialog is shown.
    async fn prepare_view(_state: &AppState, _target: &Self) {}

    /// Invalidate other screens after a record changed.
    async fn after_mutation(_state: &AppState) {}

    /// Render the screen from the controller's current state.
    async fn render(state: &AppState, chrome: Chrome, controller: &ListController<Self>)
    -> Response;
}

/// Everything a list screen shows besides its dialog.
#[derive(Debug, Clone)]
pub struct ListPage<R> {
    pub path: &'static str,
    pub rows: Vec<R>,
    pub filter: String,
    pub pager: PagerView,
    pub error: Option<String>,
    pub has_loaded: bool,
    /// "No books found matching your criteria."
    pub empty_message: String,
}

impl<R: ResourceScreen> ListPage<R> {
    #[must_use]
    pub fn new(controller: &ListController<R>) -> Self {
        let path = R::SCREEN.path();
        let filter = controller.filter().to_string();
        let pager = PagerView::new(&controller.pager(), R::KIND.plural(), |page| {
            list_href(path, "page", "q", &filter, page)
        });

        Self {
            path,
            rows: controller.visible().into_iter().cloned().collect(),
            pager,
            error: controller.error().map(str::to_string),
            has_loaded: controller.has_loaded(),
            empty_message: format!("No {} found matching your criteria.", R::KIND.plural()),
            filter,
        }
    }
}

/// `?q=filter&page=n`
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub page: Option<String>,
}

/// Delete confirmation answer.
#[derive(Debug, Deserialize)]
pub struct ConfirmForm {
    #[serde(default)]
    pub confirm: String,
}

impl ConfirmForm {
    #[must_use]
    pub fn approved(&self) -> bool {
        self.confirm.eq_ignore_ascii_case("yes")
    }
}

/// Page numbers that do not parse are ignored.
pub(crate) fn parse_page(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|page| page.trim().parse().ok())
}

/// Path and query of the request as the browser sent it.
pub(crate) fn current_path(uri: &OriginalUri) -> String {
    uri.path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string)
}

/// Create the routes for one list screen.
pub fn routes<R: ResourceScreen>() -> Router<AppState> {
    Router::new()
        .route("/", get(index::<R>).post(create::<R>))
        .route("/new", get(new::<R>))
        .route("/reload", post(reload::<R>))
        .route("/dismiss", post(dismiss::<R>))
        .route("/{id}", get(show::<R>).post(update::<R>))
        .route("/{id}/edit", get(edit::<R>))
        .route("/{id}/delete", get(confirm_delete::<R>).post(delete::<R>))
}

async fn render<R: ResourceScreen>(
    state: &AppState,
    session: &Session,
    controller: &ListController<R>,
    uri: &OriginalUri,
) -> Response {
    let chrome = Chrome::build(state, session, R::SCREEN, current_path(uri)).await;
    R::render(state, chrome, controller).await
}

fn back_to_list<R: ResourceScreen>() -> Response {
    Redirect::to(R::SCREEN.path()).into_response()
}

fn not_found<R: ResourceScreen>(id: &R::Id) -> AppError {
    AppError::NotFound(format!("{} {id}", R::KIND.singular()))
}

/// The list, filtered and paged by the query string.
#[instrument(skip_all, fields(screen = R::SCREEN.path()))]
pub async fn index<R: ResourceScreen>(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    uri: OriginalUri,
    Query(query): Query<ListQuery>,
) -> Response {
    let mut controller = R::controller(&state).lock().await;
    if let Some(q) = query.q
        && q != controller.filter()
    {
        controller.set_filter(q);
    }
    if let Some(page) = parse_page(query.page.as_deref()) {
        controller.set_page(page);
    }
    controller.close_dialog();
    // A failed fetch shows in the banner.
    let _ = controller.ensure_loaded().await;

    render(&state, &session, &controller, &uri).await
}

/// Open the create dialog.
#[instrument(skip_all, fields(screen = R::SCREEN.path()))]
pub async fn new<R: ResourceScreen>(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    uri: OriginalUri,
) -> Response {
    let mut controller = R::controller(&state).lock().await;
    let _ = controller.ensure_loaded().await;
    controller.begin_create();
    render(&state, &session, &controller, &uri).await
}

/// Submit the create dialog.
#[instrument(skip_all, fields(screen = R::SCREEN.path()))]
pub async fn create<R: ResourceScreen>(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    uri: OriginalUri,
    ConsoleForm(form): ConsoleForm<R::Form>,
) -> Response {
    let mut controller = R::controller(&state).lock().await;
    if controller.dialog().form_mode() != Some(FormMode::Create) {
        controller.begin_create();
    }

    if controller.submit(form).await.is_ok() {
        drop(controller);
        R::after_mutation(&state).await;
        return back_to_list::<R>();
    }
    render(&state, &session, &controller, &uri).await
}

/// Open the read-only view of one record.
///
/// # Errors
///
/// Returns 404 if the record is not in the list.
#[instrument(skip_all, fields(screen = R::SCREEN.path(), id = %id))]
pub async fn show<R: ResourceScreen>(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    uri: OriginalUri,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = R::Id::from(id);
    let mut controller = R::controller(&state).lock().await;
    let _ = controller.ensure_loaded().await;
    if !controller.begin_view(&id) {
        return Err(not_found::<R>(&id));
    }
    if let Some(target) = controller.dialog().target() {
        R::prepare_view(&state, target).await;
    }
    Ok(render(&state, &session, &controller, &uri).await)
}

/// Open the edit dialog for one record.
///
/// # Errors
///
/// Returns 404 if the record is not in the list or cannot be edited.
#[instrument(skip_all, fields(screen = R::SCREEN.path(), id = %id))]
pub async fn edit<R: ResourceScreen>(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    uri: OriginalUri,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = R::Id::from(id);
    let mut controller = R::controller(&state).lock().await;
    let _ = controller.ensure_loaded().await;
    if !controller.begin_edit(&id) {
        return Err(not_found::<R>(&id));
    }
    Ok(render(&state, &session, &controller, &uri).await)
}

/// Submit the edit dialog.
///
/// # Errors
///
/// Returns 404 if the record is not in the list or cannot be edited.
#[instrument(skip_all, fields(screen = R::SCREEN.path(), id = %id))]
pub async fn update<R: ResourceScreen>(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    uri: OriginalUri,
    Path(id): Path<String>,
    ConsoleForm(form): ConsoleForm<R::Form>,
) -> Result<Response, AppError> {
    let id = R::Id::from(id);
    let mut controller = R::controller(&state).lock().await;
    let editing = matches!(controller.dialog(), Dialog::Edit { target, .. } if target.id() == &id);
    if !editing && !controller.begin_edit(&id) {
        return Err(not_found::<R>(&id));
    }

    if controller.submit(form).await.is_ok() {
        drop(controller);
        R::after_mutation(&state).await;
        return Ok(back_to_list::<R>());
    }
    Ok(render(&state, &session, &controller, &uri).await)
}

/// Ask before deleting one record.
///
/// # Errors
///
/// Returns 404 if the record is not in the list.
#[instrument(skip_all, fields(screen = R::SCREEN.path(), id = %id))]
pub async fn confirm_delete<R: ResourceScreen>(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    uri: OriginalUri,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = R::Id::from(id);
    let mut controller = R::controller(&state).lock().await;
    let _ = controller.ensure_loaded().await;
    if !controller.begin_remove(&id) {
        return Err(not_found::<R>(&id));
    }
    Ok(render(&state, &session, &controller, &uri).await)
}

/// Delete one record if the confirmation was approved.
#[instrument(skip_all, fields(screen = R::SCREEN.path(), id = %id))]
pub async fn delete<R: ResourceScreen>(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
    Path(id): Path<String>,
    ConsoleForm(answer): ConsoleForm<ConfirmForm>,
) -> Response {
    let id = R::Id::from(id);
    let mut controller = R::controller(&state).lock().await;
    let outcome = controller.remove(&id, |_| answer.approved()).await;
    drop(controller);

    if matches!(outcome, Ok(RemoveOutcome::Removed)) {
        R::after_mutation(&state).await;
    }
    back_to_list::<R>()
}

/// Retry the list fetch.
#[instrument(skip_all, fields(screen = R::SCREEN.path()))]
pub async fn reload<R: ResourceScreen>(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
) -> Response {
    let _ = R::controller(&state).lock().await.load().await;
    back_to_list::<R>()
}

/// Dismiss the banner.
#[instrument(skip_all, fields(screen = R::SCREEN.path()))]
pub async fn dismiss<R: ResourceScreen>(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
) -> Response {
    R::controller(&state).lock().await.dismiss_error();
    back_to_list::<R>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(Some("3")), Some(3));
        assert_eq!(parse_page(Some(" 2 ")), Some(2));
        assert_eq!(parse_page(Some("two")), None);
        assert_eq!(parse_page(None), None);
    }

    #[test]
    fn test_confirm_answer() {
        let yes = ConfirmForm {
            confirm: "yes".to_string(),
        };
        let no = ConfirmForm {
            confirm: "no".to_string(),
        };
        assert!(yes.approved());
        assert!(!no.approved());
        assert!(!ConfirmForm {
            confirm: String::new()
        }
        .approved());
    }
}
