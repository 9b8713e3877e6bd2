//! Book management screen.

use askama::Template;
use askama_web::WebTemplate;
use async_trait::async_trait;
use axum::response::{IntoResponse, Response};
use pustakalaya_core::{Book, Donor};
use tokio::sync::Mutex;

use super::Screen;
use super::chrome::Chrome;
use super::resource::{ListPage, ResourceScreen};
use super::views::DialogView;
use crate::controller::{FormMode, ListController};
use crate::filters;
use crate::state::AppState;

/// A donor offered when recording a new book.
#[derive(Debug, Clone)]
pub struct DonorOption {
    pub id: String,
    pub label: String,
}

impl From<&Donor> for DonorOption {
    fn from(donor: &Donor) -> Self {
        Self {
            id: donor.id.to_string(),
            label: format!("{} ({})", donor.name, donor.phone),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "books.html")]
pub struct BooksTemplate {
    pub chrome: Chrome,
    pub page: ListPage<Book>,
    pub dialog: DialogView<Book>,
    pub donors: Vec<DonorOption>,
    pub transfer_href: &'static str,
}

#[async_trait]
impl ResourceScreen for Book {
    const SCREEN: Screen = Screen::Books;

    fn controller(state: &AppState) -> &Mutex<ListController<Self>> {
        state.books()
    }

    async fn after_mutation(state: &AppState) {
        state.transfers().lock().await.invalidate_books();
    }

    async fn render(state: &AppState, chrome: Chrome, controller: &ListController<Self>) -> Response {
        // Only a new book records its donor.
        let donors = if controller.dialog().form_mode() == Some(FormMode::Create) {
            let mut donors = state.donors().lock().await;
            let _ = donors.ensure_loaded().await;
            donors.items().iter().map(DonorOption::from).collect()
        } else {
            Vec::new()
        };

        BooksTemplate {
            chrome,
            page: ListPage::new(controller),
            dialog: DialogView::new(controller.dialog(), Screen::Books.path()),
            donors,
            transfer_href: Screen::BookTransfer.path(),
        }
        .into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_donor_option_label() {
        let donor: Donor = serde_json::from_value(serde_json::json!({
            "id": 7, "name": "Gita Sharma", "phone": "9841000000"
        }))
        .unwrap();
        let option = DonorOption::from(&donor);
        assert_eq!(option.id, "7");
        assert_eq!(option.label, "Gita Sharma (9841000000)");
    }
}
