//! Book transfer screen.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{OriginalUri, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use pustakalaya_core::{Book, BookId, Session, Transfer, TransferId};
use serde::Deserialize;
use tracing::instrument;

use super::Screen;
use super::chrome::Chrome;
use super::resource::{ConfirmForm, current_path, parse_page};
use super::views::{DialogView, PagerView, list_href};
use crate::controller::forms::TransferForm;
use crate::controller::{RemoveOutcome, TransferDesk};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{ConsoleForm, RequireSession};
use crate::state::AppState;

const PATH: &str = Screen::BookTransfer.path();

/// `?bq=book filter&bpage=n&page=n`
#[derive(Debug, Deserialize)]
pub struct DeskQuery {
    pub bq: Option<String>,
    pub bpage: Option<String>,
    pub page: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "transfers.html")]
pub struct TransfersTemplate {
    pub chrome: Chrome,
    pub books: Vec<Book>,
    pub book_filter: String,
    pub book_pager: PagerView,
    pub transfers: Vec<Transfer>,
    pub transfer_pager: PagerView,
    pub has_loaded: bool,
    pub selected: Option<Book>,
    pub form: TransferForm,
    pub form_error: Option<String>,
    pub dialog: DialogView<Transfer>,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub books_href: &'static str,
}

impl TransfersTemplate {
    fn new(chrome: Chrome, desk: &TransferDesk) -> Self {
        let book_filter = desk.books().filter().to_string();
        let book_pager = PagerView::new(&desk.book_pager(), "books", |page| {
            list_href(PATH, "bpage", "bq", &book_filter, page)
        });
        let history = desk.transfers();
        let transfer_pager = PagerView::new(&history.pager(), "transfers", |page| {
            format!("{PATH}?page={page}")
        });
        let open = desk.form();

        Self {
            chrome,
            books: desk.books().visible().into_iter().cloned().collect(),
            book_filter,
            book_pager,
            transfers: history.visible().into_iter().cloned().collect(),
            transfer_pager,
            has_loaded: history.has_loaded(),
            selected: open.map(|open| open.book.clone()),
            form: open.map(|open| open.form.clone()).unwrap_or_default(),
            form_error: open.and_then(|open| open.error.clone()),
            dialog: DialogView::new(history.dialog(), PATH),
            error: desk.error().map(str::to_string),
            notice: desk.notice().map(str::to_string),
            books_href: Screen::Books.path(),
        }
    }
}

/// Create the transfer screen routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/select/{id}", post(select))
        .route("/cancel", post(cancel))
        .route("/reload", post(reload))
        .route("/dismiss", post(dismiss))
        .route("/{id}/delete", get(confirm_delete).post(delete))
}

async fn render(state: &AppState, session: &Session, desk: &TransferDesk, uri: &OriginalUri) -> Response {
    let chrome = Chrome::build(state, session, Screen::BookTransfer, current_path(uri)).await;
    TransfersTemplate::new(chrome, desk).into_response()
}

fn back_to_desk() -> Response {
    Redirect::to(PATH).into_response()
}

/// Transfers change book counts, so the book list must be re-fetched.
async fn invalidate_books(state: &AppState) {
    state.books().lock().await.invalidate();
}

/// The desk: book picker, open form, and transfer history.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    uri: OriginalUri,
    Query(query): Query<DeskQuery>,
) -> Response {
    let mut desk = state.transfers().lock().await;
    if let Some(bq) = query.bq
        && bq != desk.books().filter()
    {
        desk.set_book_filter(bq);
    }
    if let Some(page) = parse_page(query.bpage.as_deref()) {
        desk.set_book_page(page);
    }
    if let Some(page) = parse_page(query.page.as_deref()) {
        desk.set_page(page);
    }
    desk.close_dialog();
    // Failures show in the banner.
    let _ = desk.ensure_loaded().await;

    render(&state, &session, &desk, &uri).await
}

/// Choose the source book.
///
/// # Errors
///
/// Returns 404 if the picker does not list the book.
#[instrument(skip(state, _session))]
pub async fn select(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = BookId::from(id);
    let mut desk = state.transfers().lock().await;
    let _ = desk.ensure_loaded().await;
    if !desk.select_book(&id) {
        return Err(AppError::NotFound(format!("book {id}")));
    }
    Ok(back_to_desk())
}

/// Record a transfer from the selected book.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    uri: OriginalUri,
    ConsoleForm(form): ConsoleForm<TransferForm>,
) -> Response {
    let mut desk = state.transfers().lock().await;
    if desk.submit_transfer(form).await.is_ok() {
        drop(desk);
        invalidate_books(&state).await;
        return back_to_desk();
    }
    // No form open means the selection was lost; show the desk again.
    if desk.form().is_none() {
        return back_to_desk();
    }
    render(&state, &session, &desk, &uri).await
}

#[instrument(skip_all)]
pub async fn cancel(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
) -> Response {
    state.transfers().lock().await.cancel_form();
    back_to_desk()
}

/// Retry both fetches.
#[instrument(skip_all)]
pub async fn reload(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
) -> Response {
    let _ = state.transfers().lock().await.reload().await;
    back_to_desk()
}

#[instrument(skip_all)]
pub async fn dismiss(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
) -> Response {
    state.transfers().lock().await.dismiss();
    back_to_desk()
}

/// Ask before deleting a transfer.
///
/// # Errors
///
/// Returns 404 if the transfer is not in the history.
#[instrument(skip(state, session, uri))]
pub async fn confirm_delete(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    uri: OriginalUri,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = TransferId::from(id);
    let mut desk = state.transfers().lock().await;
    let _ = desk.ensure_loaded().await;
    if !desk.begin_remove(&id) {
        return Err(AppError::NotFound(format!("transfer {id}")));
    }
    Ok(render(&state, &session, &desk, &uri).await)
}

/// Delete a transfer if the confirmation was approved.
#[instrument(skip(state, _session, answer))]
pub async fn delete(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
    Path(id): Path<String>,
    ConsoleForm(answer): ConsoleForm<ConfirmForm>,
) -> Response {
    let id = TransferId::from(id);
    let mut desk = state.transfers().lock().await;
    let outcome = desk.remove_transfer(&id, |_| answer.approved()).await;
    drop(desk);

    if matches!(outcome, Ok(RemoveOutcome::Removed)) {
        invalidate_books(&state).await;
    }
    back_to_desk()
}
