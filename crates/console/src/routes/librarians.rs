//! Librarian management screen.

use askama::Template;
use askama_web::WebTemplate;
use async_trait::async_trait;
use axum::response::{IntoResponse, Response};
use pustakalaya_core::Librarian;
use tokio::sync::Mutex;

use super::Screen;
use super::chrome::Chrome;
use super::resource::{ListPage, ResourceScreen};
use super::views::DialogView;
use crate::controller::ListController;
use crate::filters;
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "librarians.html")]
pub struct LibrariansTemplate {
    pub chrome: Chrome,
    pub page: ListPage<Librarian>,
    pub dialog: DialogView<Librarian>,
}

#[async_trait]
impl ResourceScreen for Librarian {
    const SCREEN: Screen = Screen::Librarians;

    fn controller(state: &AppState) -> &Mutex<ListController<Self>> {
        state.librarians()
    }

    async fn render(_state: &AppState, chrome: Chrome, controller: &ListController<Self>) -> Response {
        LibrariansTemplate {
            chrome,
            page: ListPage::new(controller),
            dialog: DialogView::new(controller.dialog(), Screen::Librarians.path()),
        }
        .into_response()
    }
}
