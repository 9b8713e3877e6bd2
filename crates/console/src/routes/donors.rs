//! Donor management screen, with the certificate and donated-books panels.

use askama::Template;
use askama_web::WebTemplate;
use async_trait::async_trait;
use axum::{
    Router,
    extract::{OriginalUri, Path, State},
    response::{IntoResponse, Response},
    routing::get,
};
use pustakalaya_core::{Donor, DonorId};
use tokio::sync::Mutex;
use tracing::instrument;

use super::Screen;
use super::chrome::Chrome;
use super::resource::{self, ListPage, ResourceScreen, current_path};
use super::views::DialogView;
use crate::controller::{CertificatePanel, DonatedBooksPanel, ListController};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireSession;
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "donors.html")]
pub struct DonorsTemplate {
    pub chrome: Chrome,
    pub page: ListPage<Donor>,
    pub dialog: DialogView<Donor>,
    /// Shown inside the view dialog.
    pub certificate: Option<CertificatePanel>,
    pub donated: Option<DonatedBooksPanel>,
    pub details_error: Option<String>,
}

impl DonorsTemplate {
    async fn build(
        state: &AppState,
        chrome: Chrome,
        controller: &ListController<Donor>,
        donated: Option<DonatedBooksPanel>,
    ) -> Self {
        let details = state.donor_details().lock().await;
        let certificate = controller
            .dialog()
            .target()
            .filter(|_| controller.dialog().form_mode().is_none())
            .and_then(|donor| details.certificate_for(&donor.id))
            .cloned();

        Self {
            chrome,
            page: ListPage::new(controller),
            dialog: DialogView::new(controller.dialog(), Screen::Donors.path()),
            certificate,
            donated,
            details_error: details.error().map(str::to_string),
        }
    }
}

#[async_trait]
impl ResourceScreen for Donor {
    const SCREEN: Screen = Screen::Donors;

    fn controller(state: &AppState) -> &Mutex<ListController<Self>> {
        state.donors()
    }

    async fn prepare_view(state: &AppState, target: &Self) {
        state.donor_details().lock().await.show_certificate(target).await;
    }

    async fn after_mutation(state: &AppState) {
        state.donor_details().lock().await.reset();
    }

    async fn render(state: &AppState, chrome: Chrome, controller: &ListController<Self>) -> Response {
        DonorsTemplate::build(state, chrome, controller, None)
            .await
            .into_response()
    }
}

/// The donor screen's routes plus the donated-books panel.
pub fn routes() -> Router<AppState> {
    resource::routes::<Donor>().route("/{id}/books", get(donated_books))
}

/// Open the donated-books panel for one donor.
///
/// # Errors
///
/// Returns 404 if the donor is not in the list.
#[instrument(skip(state, session, uri))]
pub async fn donated_books(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    uri: OriginalUri,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = DonorId::from(id);
    let mut controller = state.donors().lock().await;
    let _ = controller.ensure_loaded().await;
    let Some(donor) = controller.find(&id).cloned() else {
        return Err(AppError::NotFound(format!("donor {id}")));
    };
    controller.close_dialog();

    let donated = {
        let mut details = state.donor_details().lock().await;
        // A failure opens the panel empty with the banner set.
        let _ = details.show_donated_books(&donor).await;
        details.donated_books().cloned()
    };

    let chrome = Chrome::build(&state, &session, Screen::Donors, current_path(&uri)).await;
    Ok(DonorsTemplate::build(&state, chrome, &controller, donated)
        .await
        .into_response())
}
