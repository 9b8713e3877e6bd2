//! Integration tests for the Pustakalaya console.
//!
//! Every test runs against a [`wiremock`] stand-in for the remote library
//! API, so nothing outside the process is needed:
//!
//! ```bash
//! cargo test -p pustakalaya-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `gateway_envelope` - wire format of each endpoint and envelope handling
//! - `controller_flow` - list controllers and the transfer desk over HTTP
//! - `session_login` - login, persistence, and logout through the store
//! - `console_routes` - the axum router driven in-process with `oneshot`

#![allow(clippy::missing_panics_doc)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use pustakalaya_console::config::{ApiConfig, ConsoleConfig};
use pustakalaya_console::gateway::ApiClient;
use pustakalaya_console::session::FileIdentityStore;
use pustakalaya_console::state::AppState;
use pustakalaya_core::{Role, Session, UserId};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Remote API
// =============================================================================

/// API settings pointing at the mock server.
#[must_use]
pub fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig::new(&format!("{}/", server.uri()), None, None).expect("mock server URL is valid")
}

#[must_use]
pub fn api_client(server: &MockServer) -> ApiClient {
    ApiClient::new(&api_config(server)).expect("HTTP client builds")
}

/// The same client behind an `Arc`, as controllers hold it.
#[must_use]
pub fn shared_client(server: &MockServer) -> Arc<ApiClient> {
    Arc::new(api_client(server))
}

/// A successful reply carrying `data`.
#[must_use]
pub fn success(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

/// A successful reply with no payload.
#[must_use]
pub fn success_unit() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true }))
}

/// A refusal with the server's own message.
#[must_use]
pub fn rejection(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": false, "message": message }))
}

/// Serve the stats cards, which every signed-in page asks for.
pub async fn mount_stats(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/p_stats_web.php"))
        .respond_with(success(json!({
            "totalBooks": 1520,
            "totalDonors": 311,
            "totalLibrarians": 6,
            "totalDonations": 402,
        })))
        .mount(server)
        .await;
}

// =============================================================================
// Fixtures
// =============================================================================

#[must_use]
pub fn book_json(id: &str, title: &str, count: u32) -> Value {
    json!({
        "id": id,
        "title": title,
        "author": "Laxmi Prasad Devkota",
        "count": count,
        "category": "Poetry",
        "donorId": "d1",
        "destination": "Main Hall",
        "addedBy": "1",
        "addedDate": "2024-03-05 14:22:10",
    })
}

#[must_use]
pub fn donor_json(id: &str, name: &str, phone: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "phone": phone,
        "email": null,
        "totalDonations": 2,
        "lastDonationDate": "2024-02-11",
        "donatedBooks": [],
    })
}

#[must_use]
pub fn librarian_json(id: &str, name: &str, email: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "email": email,
        "phone": "9800000000",
        "joinDate": "2023-09-01",
        "booksRecorded": 40,
        "totalDonationsProcessed": 12,
    })
}

#[must_use]
pub fn transfer_json(id: u32, book_id: &str, count: u32, destination: &str) -> Value {
    json!({
        "t_id": id,
        "tb_id": book_id,
        "tb_count": count,
        "t_destination": destination,
        "t_createdAt": "2024-04-01 10:00:00",
        "t_updatedAt": "2024-04-01 10:00:00",
        "book_title": "Muna Madan",
    })
}

/// The login reply's `data` for an administrator.
#[must_use]
pub fn admin_login_json() -> Value {
    json!({ "id": 1, "email": "asha@pustakalaya.org", "name": "Asha", "role": "admin" })
}

#[must_use]
pub fn admin_session() -> Session {
    Session {
        user_id: UserId::new("1"),
        email: "asha@pustakalaya.org".to_string(),
        display_name: "Asha".to_string(),
        role: Role::Admin,
    }
}

// =============================================================================
// Console
// =============================================================================

/// A console wired to the mock server, with its session file in a
/// temporary directory that lives as long as this value.
pub struct TestConsole {
    pub state: AppState,
    pub app: Router,
    pub session_file: PathBuf,
    _dir: TempDir,
}

impl TestConsole {
    /// A console with nobody logged in.
    #[must_use]
    pub fn new(server: &MockServer) -> Self {
        Self::build(server, None)
    }

    /// A console that restores `session` from its session file at start-up.
    #[must_use]
    pub fn signed_in(server: &MockServer, session: &Session) -> Self {
        Self::build(server, Some(session))
    }

    fn build(server: &MockServer, session: Option<&Session>) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let session_file = dir.path().join("session.json");
        if let Some(session) = session {
            let record = serde_json::to_vec(session).expect("session serializes");
            std::fs::write(&session_file, record).expect("session file written");
        }

        let config = ConsoleConfig::new(api_config(server), session_file.clone());
        let store = FileIdentityStore::new(&session_file);
        let state = AppState::new(config, Box::new(store)).expect("state builds");
        let app = pustakalaya_console::app(state.clone(), &static_dir());

        Self {
            state,
            app,
            session_file,
            _dir: dir,
        }
    }

    pub async fn get(&self, uri: &str) -> Reply {
        let request = Request::builder()
            .uri(uri)
            .method("GET")
            .body(Body::empty())
            .expect("request builds");
        self.send(request).await
    }

    /// POST a URL-encoded form body.
    pub async fn post_form(&self, uri: &str, body: &str) -> Reply {
        let request = Request::builder()
            .uri(uri)
            .method("POST")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .expect("request builds");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> Reply {
        let response = self.app.clone().oneshot(request).await.expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        Reply {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

/// What the router answered.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Reply {
    /// The redirect target, if the reply is a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }
}

fn static_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../console/static")
}
