//! HTTP route handlers for the console.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action
//! POST /logout                 - Logout action
//! POST /stats/refresh          - Retry the stats cards
//!
//! # Record screens (/books, /donors, /librarians)
//! GET  /{screen}               - List (?q=filter&page=n)
//! POST /{screen}               - Submit the create dialog
//! GET  /{screen}/new           - Create dialog
//! POST /{screen}/reload        - Retry the list fetch
//! POST /{screen}/dismiss       - Dismiss the banner
//! GET  /{screen}/{id}          - View dialog
//! POST /{screen}/{id}          - Submit the edit dialog
//! GET  /{screen}/{id}/edit     - Edit dialog
//! GET  /{screen}/{id}/delete   - Delete confirmation
//! POST /{screen}/{id}/delete   - Delete action (confirm=yes|no)
//! GET  /donors/{id}/books      - Donated books panel
//!
//! # Transfer desk
//! GET  /book-transfer                  - Desk (?bq=book filter&bpage=n&page=n)
//! POST /book-transfer                  - Record a transfer
//! POST /book-transfer/select/{id}      - Choose the source book
//! POST /book-transfer/cancel           - Close the transfer form
//! POST /book-transfer/reload           - Retry both fetches
//! POST /book-transfer/dismiss          - Dismiss the banner
//! GET  /book-transfer/{id}/delete      - Delete confirmation
//! POST /book-transfer/{id}/delete      - Delete action
//!
//! # Fallback
//! GET  /                       - Redirect to /books
//! *                            - Redirect to /books (or /login without a session)
//! ```

pub mod auth;
pub mod books;
pub mod chrome;
pub mod donors;
pub mod librarians;
pub mod resource;
pub mod stats;
pub mod transfers;
pub mod views;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use pustakalaya_core::{Book, Librarian};

use crate::middleware::OptionalSession;
use crate::state::AppState;

/// A routed page of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Books,
    BookTransfer,
    Donors,
    Librarians,
}

impl Screen {
    /// Screens linked from the header, in display order.
    pub const NAV: [Self; 3] = [Self::Books, Self::Donors, Self::Librarians];

    /// Where signed-in staff land.
    pub const HOME: Self = Self::Books;

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Books => "/books",
            Self::BookTransfer => "/book-transfer",
            Self::Donors => "/donors",
            Self::Librarians => "/librarians",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Books => "Books",
            Self::BookTransfer => "Book Transfer",
            Self::Donors => "Donors",
            Self::Librarians => "Librarians",
        }
    }

    /// Page heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Books => "Book Management",
            Self::BookTransfer => "Book Transfer",
            Self::Donors => "Donor Management",
            Self::Librarians => "Librarian Management",
        }
    }
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// `/` and unknown paths go to the home screen, or to login first.
async fn fallback(OptionalSession(session): OptionalSession) -> Redirect {
    if session.is_some() {
        Redirect::to(Screen::HOME.path())
    } else {
        Redirect::to("/login")
    }
}

/// Create all routes for the console.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/", get(fallback))
        // Auth
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/stats/refresh", post(stats::refresh))
        // Record screens
        .nest(Screen::Books.path(), resource::routes::<Book>())
        .nest(Screen::Donors.path(), donors::routes())
        .nest(Screen::Librarians.path(), resource::routes::<Librarian>())
        // Transfer desk
        .nest(Screen::BookTransfer.path(), transfers::routes())
        .fallback(fallback)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::util::ServiceExt;

    use super::*;
    use crate::config::{ApiConfig, ConsoleConfig};
    use crate::session::MemoryIdentityStore;

    fn app() -> Router {
        let api = ApiConfig::new("http://127.0.0.1:9/", None, None).unwrap();
        let config = ConsoleConfig::new(api, "unused-session.json".into());
        let state = AppState::new(config, Box::new(MemoryIdentityStore::new())).unwrap();
        routes().with_state(state)
    }

    async fn get(uri: &str) -> axum::response::Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app().oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        assert_eq!(get("/health").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_signed_out_requests_go_to_login() {
        for uri in ["/", "/librarians", "/nowhere"] {
            let response = get(uri).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(response.headers()[header::LOCATION], "/login");
        }
    }

    #[tokio::test]
    async fn test_undecodable_form_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("email=asha"))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&body).starts_with("Bad request:"));
    }

    #[test]
    fn test_nav_omits_transfer_desk() {
        let labels: Vec<&str> = Screen::NAV.iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["Books", "Donors", "Librarians"]);
    }
}
