//! Wire format of the library API endpoints.
//!
//! Each test mounts the exact script, action and body the gateway is
//! expected to use, so a drift in the request shape fails the match.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use pustakalaya_console::config::ApiConfig;
use pustakalaya_console::controller::forms::{BookDraft, DonorDraft, TransferDraft};
use pustakalaya_console::gateway::auth::LOGIN_FAILED_MESSAGE;
use pustakalaya_console::gateway::{
    ApiClient, Authenticator, Credentials, DonorQueries, GatewayError, MALFORMED_RESPONSE_MESSAGE,
    NETWORK_ERROR_MESSAGE, ResourceGateway, StatsSource, TransferQueries,
};
use pustakalaya_core::{Book, BookId, Donor, DonorId, Librarian, Role, Transfer, TransferId};
use pustakalaya_integration_tests::{
    api_client, book_json, donor_json, librarian_json, rejection, success, success_unit,
    transfer_json,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Envelope handling
// ============================================================================

#[tokio::test]
async fn test_fetch_books_decodes_envelope_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/p_books_management_web.php"))
        .and(query_param("action", "fetch"))
        .respond_with(success(json!([
            book_json("1", "Muna Madan", 4),
            book_json("2", "Shakuntala", 7),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let books = ResourceGateway::<Book>::fetch_all(&api_client(&server))
        .await
        .unwrap();

    assert_eq!(books.len(), 2);
    assert_eq!(books[0].title, "Muna Madan");
    assert_eq!(books[1].copy_count, 7);
    assert_eq!(books[0].current_location, "Main Hall");
}

#[tokio::test]
async fn test_server_message_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/p_librarians_management_web.php"))
        .respond_with(rejection("Session expired"))
        .mount(&server)
        .await;

    let err = ResourceGateway::<Librarian>::fetch_all(&api_client(&server))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Rejected(_)));
    assert_eq!(err.user_message(), "Session expired");
}

#[tokio::test]
async fn test_refusal_without_message_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/p_donors_management_web.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let err = ResourceGateway::<Donor>::fetch_all(&api_client(&server))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Failed to fetch donors");
}

#[tokio::test]
async fn test_error_status_with_envelope_still_reads_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/p_login_web.php"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "success": false, "message": "Invalid password" })),
        )
        .mount(&server)
        .await;

    let err = api_client(&server)
        .login(&Credentials::new("asha@pustakalaya.org", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Invalid password");
}

#[tokio::test]
async fn test_non_json_reply_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/p_stats_web.php"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<b>Fatal error</b>"))
        .mount(&server)
        .await;

    let err = api_client(&server).fetch_stats().await.unwrap_err();

    assert!(matches!(err, GatewayError::Malformed(_)));
    assert_eq!(err.user_message(), MALFORMED_RESPONSE_MESSAGE);
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    // Port 9 (discard) is not listening on loopback in test environments.
    let config = ApiConfig::new("http://127.0.0.1:9/", None, None).unwrap();
    let client = ApiClient::new(&config).unwrap();

    let err = client.fetch_stats().await.unwrap_err();

    assert!(matches!(err, GatewayError::Network(_)));
    assert_eq!(err.user_message(), NETWORK_ERROR_MESSAGE);
}

// ============================================================================
// Login and stats
// ============================================================================

#[tokio::test]
async fn test_login_sends_trimmed_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/p_login_web.php"))
        .and(body_json(json!({ "email": "asha@pustakalaya.org", "password": " pw " })))
        .respond_with(success(json!({
            "id": 1, "email": "asha@pustakalaya.org", "name": "Asha", "role": "admin"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = api_client(&server)
        .login(&Credentials::new("  asha@pustakalaya.org ", " pw "))
        .await
        .unwrap();

    assert_eq!(session.display_name, "Asha");
    assert_eq!(session.role, Role::Admin);
}

#[tokio::test]
async fn test_login_refusal_without_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/p_login_web.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let err = api_client(&server)
        .login(&Credentials::new("asha@pustakalaya.org", "pw"))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), LOGIN_FAILED_MESSAGE);
}

#[tokio::test]
async fn test_stats_accept_numeric_strings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/p_stats_web.php"))
        .respond_with(success(json!({
            "totalBooks": "1250", "totalDonors": 311, "totalLibrarians": "6", "totalDonations": 402
        })))
        .mount(&server)
        .await;

    let stats = api_client(&server).fetch_stats().await.unwrap();

    assert_eq!(stats.total_books, 1250);
    assert_eq!(stats.total_librarians, 6);
}

// ============================================================================
// Record mutations
// ============================================================================

#[tokio::test]
async fn test_create_book_posts_draft_with_donor() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/p_books_management_web.php"))
        .and(query_param("action", "add"))
        .and(body_json(json!({
            "title": "Muna Madan", "author": "Laxmi Prasad Devkota",
            "category": "Poetry", "count": 3, "donorId": "d1"
        })))
        .respond_with(success(book_json("9", "Muna Madan", 3)))
        .expect(1)
        .mount(&server)
        .await;

    let draft = BookDraft {
        title: "Muna Madan".to_string(),
        author: "Laxmi Prasad Devkota".to_string(),
        category: "Poetry".to_string(),
        copy_count: 3,
        donor_id: Some(DonorId::new("d1")),
    };
    let book = ResourceGateway::<Book>::create(&api_client(&server), &draft)
        .await
        .unwrap();

    assert_eq!(book.id, BookId::new("9"));
}

#[tokio::test]
async fn test_update_donor_sends_id_with_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/p_donors_management_web.php"))
        .and(query_param("action", "update"))
        .and(body_json(json!({ "id": "3", "name": "Sita Sharma", "phone": "9841000000" })))
        .respond_with(success(donor_json("3", "Sita Sharma", "9841000000")))
        .expect(1)
        .mount(&server)
        .await;

    let draft = DonorDraft {
        name: "Sita Sharma".to_string(),
        phone: "9841000000".to_string(),
    };
    let donor = ResourceGateway::<Donor>::update(&api_client(&server), &DonorId::new("3"), &draft)
        .await
        .unwrap();

    assert_eq!(donor.name, "Sita Sharma");
}

#[tokio::test]
async fn test_delete_uses_kind_specific_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/p_book_transfer_web.php"))
        .and(query_param("action", "delete"))
        .and(body_json(json!({ "transferId": "12" })))
        .respond_with(success_unit())
        .expect(1)
        .mount(&server)
        .await;

    ResourceGateway::<Transfer>::delete(&api_client(&server), &TransferId::new("12"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_refusal_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/p_donors_management_web.php"))
        .and(query_param("action", "delete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let err = ResourceGateway::<Donor>::delete(&api_client(&server), &DonorId::new("3"))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Failed to delete donor");
}

// ============================================================================
// Donor and transfer queries
// ============================================================================

#[tokio::test]
async fn test_donated_books_and_certificate() {
    let server = MockServer::start().await;
    let mut donated = book_json("1", "Muna Madan", 2);
    donated["donationDate"] = json!("2024-02-11");
    Mock::given(method("GET"))
        .and(path("/p_donors_management_web.php"))
        .and(query_param("action", "getDonatedBooks"))
        .and(query_param("donorId", "3"))
        .respond_with(success(json!([donated])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p_donors_management_web.php"))
        .and(query_param("action", "getLatestCertificate"))
        .and(query_param("donorId", "3"))
        .respond_with(success(json!({
            "f_id": 5, "f_path": "certificates/3.png",
            "f_createdat": "2024-02-11 09:00:00", "f_updatedat": "2024-02-11 09:00:00"
        })))
        .mount(&server)
        .await;

    let client = api_client(&server);
    let donor = DonorId::new("3");

    let books = client.donated_books(&donor).await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].donation_date, "2024-02-11");

    let certificate = client.latest_certificate(&donor).await.unwrap().unwrap();
    assert_eq!(
        client.certificate_url(&certificate).unwrap(),
        format!("{}/uploads/certificates/3.png", server.uri())
    );
}

#[tokio::test]
async fn test_missing_certificate_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/p_donors_management_web.php"))
        .and(query_param("action", "getLatestCertificate"))
        .respond_with(success(json!(null)))
        .mount(&server)
        .await;

    let certificate = api_client(&server)
        .latest_certificate(&DonorId::new("3"))
        .await
        .unwrap();

    assert!(certificate.is_none());
}

#[tokio::test]
async fn test_transfer_history_and_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/p_book_transfer_web.php"))
        .and(query_param("action", "fetch"))
        .respond_with(success(json!([transfer_json(12, "1", 2, "Bhaktapur")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p_book_transfer_web.php"))
        .and(query_param("action", "fetch_books"))
        .respond_with(success(json!([book_json("1", "Muna Madan", 4)])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/p_book_transfer_web.php"))
        .and(query_param("action", "add"))
        .and(body_partial_json(json!({ "bookId": "1", "count": 2 })))
        .respond_with(success_unit())
        .expect(1)
        .mount(&server)
        .await;

    let client = api_client(&server);

    let history = ResourceGateway::<Transfer>::fetch_all(&client).await.unwrap();
    assert_eq!(history[0].id, TransferId::new("12"));
    assert_eq!(history[0].destination, "Bhaktapur");

    let books = client.transferable_books().await.unwrap();
    assert_eq!(books[0].copy_count, 4);

    let draft = TransferDraft {
        book_id: BookId::new("1"),
        count: 2,
        destination: "Bhaktapur".to_string(),
    };
    client.record_transfer(&draft).await.unwrap();
}

#[tokio::test]
async fn test_librarian_fetch_reads_counters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/p_librarians_management_web.php"))
        .and(query_param("action", "fetch"))
        .respond_with(success(json!([librarian_json("4", "Hari", "hari@pustakalaya.org")])))
        .mount(&server)
        .await;

    let librarians = ResourceGateway::<Librarian>::fetch_all(&api_client(&server))
        .await
        .unwrap();

    assert_eq!(librarians[0].books_recorded_count, 40);
    assert_eq!(librarians[0].donations_processed_count, 12);
}

#[tokio::test]
async fn test_transfer_update_is_refused_without_a_request() {
    let server = MockServer::start().await;

    let draft = TransferDraft {
        book_id: BookId::new("1"),
        count: 1,
        destination: "Patan".to_string(),
    };
    let err = ResourceGateway::<Transfer>::update(&api_client(&server), &TransferId::new("12"), &draft)
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Unsupported { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}
