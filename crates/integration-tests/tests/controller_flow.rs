//! Screen controllers driven against the mocked library API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use pustakalaya_console::controller::forms::{BookForm, LibrarianForm, TransferForm};
use pustakalaya_console::controller::{
    DonorDetails, ListController, PAGE_SIZE, RemoveOutcome, SubmitError, TRANSFER_ADDED_NOTICE,
    TransferDesk,
};
use pustakalaya_console::stats::StatsAggregator;
use pustakalaya_core::{Book, BookId, Donor, DonorId, Librarian, LibrarianId, TransferId};
use pustakalaya_integration_tests::{
    book_json, donor_json, librarian_json, mount_stats, rejection, shared_client, success,
    success_unit, transfer_json,
};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOOKS: &str = "/p_books_management_web.php";
const LIBRARIANS: &str = "/p_librarians_management_web.php";
const TRANSFERS: &str = "/p_book_transfer_web.php";

async fn mount_fetch(server: &MockServer, script: &str, action: &str, data: Value) {
    Mock::given(method("GET"))
        .and(path(script))
        .and(query_param("action", action))
        .respond_with(success(data))
        .mount(server)
        .await;
}

fn many_books(total: usize) -> Value {
    let books: Vec<Value> = (1..=total)
        .map(|n| {
            let title = if n % 5 == 0 { format!("Shakuntala {n}") } else { format!("Muna Madan {n}") };
            book_json(&n.to_string(), &title, 2)
        })
        .collect();
    Value::Array(books)
}

// ============================================================================
// List controller
// ============================================================================

#[tokio::test]
async fn test_filter_and_pages_are_applied_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(BOOKS))
        .and(query_param("action", "fetch"))
        .respond_with(success(many_books(25)))
        .expect(1)
        .mount(&server)
        .await;

    let mut books = ListController::<Book>::new(shared_client(&server));
    books.ensure_loaded().await.unwrap();
    books.ensure_loaded().await.unwrap();

    assert_eq!(books.visible().len(), PAGE_SIZE);
    assert_eq!(books.pager().total_pages, 3);

    books.set_page(3);
    assert_eq!(books.visible().len(), 5);
    assert_eq!(books.pager().first_item, 21);

    books.set_filter("shakuntala");
    assert_eq!(books.pager().page, 1);
    assert_eq!(books.visible().len(), 5);
    assert!(!books.pager().is_visible());
}

#[tokio::test]
async fn test_failed_reload_keeps_previous_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LIBRARIANS))
        .respond_with(success(json!([librarian_json("4", "Hari", "hari@pustakalaya.org")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(LIBRARIANS))
        .respond_with(rejection("Database unavailable"))
        .mount(&server)
        .await;

    let mut librarians = ListController::<Librarian>::new(shared_client(&server));
    librarians.load().await.unwrap();
    assert!(librarians.load().await.is_err());

    assert_eq!(librarians.items().len(), 1);
    assert_eq!(librarians.error(), Some("Database unavailable"));

    librarians.dismiss_error();
    assert!(librarians.error().is_none());
}

#[tokio::test]
async fn test_created_book_is_appended_without_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(BOOKS))
        .and(query_param("action", "fetch"))
        .respond_with(success(json!([book_json("1", "Muna Madan", 4)])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(BOOKS))
        .and(query_param("action", "add"))
        .respond_with(success(book_json("2", "Shakuntala", 1)))
        .expect(1)
        .mount(&server)
        .await;

    let mut books = ListController::<Book>::new(shared_client(&server));
    books.ensure_loaded().await.unwrap();
    books.begin_create();
    books
        .submit(BookForm {
            title: "Shakuntala".to_string(),
            author: "Laxmi Prasad Devkota".to_string(),
            category: "Drama".to_string(),
            copy_count: "1".to_string(),
            ..BookForm::default()
        })
        .await
        .unwrap();

    assert!(!books.dialog().is_open());
    let titles: Vec<&str> = books.items().iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Muna Madan", "Shakuntala"]);
}

#[tokio::test]
async fn test_invalid_form_is_refused_before_sending() {
    let server = MockServer::start().await;
    mount_fetch(&server, BOOKS, "fetch", json!([])).await;
    Mock::given(method("POST"))
        .and(path(BOOKS))
        .respond_with(success_unit())
        .expect(0)
        .mount(&server)
        .await;

    let mut books = ListController::<Book>::new(shared_client(&server));
    books.ensure_loaded().await.unwrap();
    books.begin_create();
    let err = books
        .submit(BookForm {
            author: "Laxmi Prasad Devkota".to_string(),
            copy_count: "2".to_string(),
            ..BookForm::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, SubmitError::Invalid(_)));
    assert!(books.dialog().is_open());
    assert!(books.dialog().error().is_some());
}

#[tokio::test]
async fn test_edit_replaces_record_in_place() {
    let server = MockServer::start().await;
    mount_fetch(
        &server,
        LIBRARIANS,
        "fetch",
        json!([
            librarian_json("4", "Hari", "hari@pustakalaya.org"),
            librarian_json("5", "Gita", "gita@pustakalaya.org"),
        ]),
    )
    .await;
    // A blank password on edit is left out of the body.
    Mock::given(method("POST"))
        .and(path(LIBRARIANS))
        .and(query_param("action", "update"))
        .and(body_json(json!({
            "id": "4", "name": "Hari Prasad", "email": "hari@pustakalaya.org", "phone": "9800000000"
        })))
        .respond_with(success(librarian_json("4", "Hari Prasad", "hari@pustakalaya.org")))
        .expect(1)
        .mount(&server)
        .await;

    let mut librarians = ListController::<Librarian>::new(shared_client(&server));
    librarians.ensure_loaded().await.unwrap();
    assert!(librarians.begin_edit(&LibrarianId::new("4")));
    librarians
        .submit(LibrarianForm {
            name: "Hari Prasad".to_string(),
            email: "hari@pustakalaya.org".to_string(),
            phone: "9800000000".to_string(),
            password: String::new(),
        })
        .await
        .unwrap();

    assert_eq!(librarians.items()[0].name, "Hari Prasad");
    assert_eq!(librarians.items().len(), 2);
}

#[tokio::test]
async fn test_server_refusal_keeps_dialog_open() {
    let server = MockServer::start().await;
    mount_fetch(&server, LIBRARIANS, "fetch", json!([])).await;
    Mock::given(method("POST"))
        .and(path(LIBRARIANS))
        .and(query_param("action", "add"))
        .respond_with(rejection("Email already registered"))
        .mount(&server)
        .await;

    let mut librarians = ListController::<Librarian>::new(shared_client(&server));
    librarians.ensure_loaded().await.unwrap();
    librarians.begin_create();
    let err = librarians
        .submit(LibrarianForm {
            name: "Gita".to_string(),
            email: "gita@pustakalaya.org".to_string(),
            phone: "9800000001".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Email already registered");
    assert_eq!(librarians.dialog().error(), Some("Email already registered"));
    assert!(librarians.items().is_empty());
}

#[tokio::test]
async fn test_cancelled_delete_sends_nothing() {
    let server = MockServer::start().await;
    mount_fetch(&server, "/p_donors_management_web.php", "fetch", json!([
        donor_json("3", "Sita Sharma", "9841000000"),
    ]))
    .await;
    Mock::given(method("POST"))
        .and(path("/p_donors_management_web.php"))
        .respond_with(success_unit())
        .expect(0)
        .mount(&server)
        .await;

    let mut donors = ListController::<Donor>::new(shared_client(&server));
    donors.ensure_loaded().await.unwrap();
    let outcome = donors
        .remove(&DonorId::new("3"), |prompt| {
            assert_eq!(prompt, "Are you sure you want to delete this donor?");
            false
        })
        .await
        .unwrap();

    assert_eq!(outcome, RemoveOutcome::Cancelled);
    assert_eq!(donors.items().len(), 1);
}

#[tokio::test]
async fn test_failed_delete_keeps_row_and_sets_banner() {
    let server = MockServer::start().await;
    mount_fetch(&server, BOOKS, "fetch", json!([book_json("1", "Muna Madan", 4)])).await;
    Mock::given(method("POST"))
        .and(path(BOOKS))
        .and(query_param("action", "delete"))
        .and(body_json(json!({ "bookId": "1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let mut books = ListController::<Book>::new(shared_client(&server));
    books.ensure_loaded().await.unwrap();
    assert!(books.remove(&BookId::new("1"), |_| true).await.is_err());

    assert_eq!(books.items().len(), 1);
    assert_eq!(books.error(), Some("Failed to delete book"));
}

// ============================================================================
// Donor details
// ============================================================================

#[tokio::test]
async fn test_donated_books_panel_totals_copies() {
    let server = MockServer::start().await;
    let mut first = book_json("1", "Muna Madan", 2);
    first["donationDate"] = json!("2024-02-11");
    let mut second = book_json("2", "Shakuntala", 3);
    second["donationDate"] = json!("2024-03-01");
    mount_fetch(&server, "/p_donors_management_web.php", "getDonatedBooks", json!([first, second]))
        .await;

    let donor: Donor = serde_json::from_value(donor_json("3", "Sita Sharma", "9841000000")).unwrap();
    let mut details = DonorDetails::new(shared_client(&server));
    details.show_donated_books(&donor).await.unwrap();

    let panel = details.donated_books().unwrap();
    assert_eq!(panel.books.len(), 2);
    assert_eq!(panel.total_copies, 5);
    assert!(details.error().is_none());
}

#[tokio::test]
async fn test_certificate_lookup_failure_is_quiet() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/p_donors_management_web.php"))
        .and(query_param("action", "getLatestCertificate"))
        .respond_with(rejection("No certificate found"))
        .mount(&server)
        .await;

    let donor: Donor = serde_json::from_value(donor_json("3", "Sita Sharma", "9841000000")).unwrap();
    let mut details = DonorDetails::new(shared_client(&server));
    details.show_certificate(&donor).await;

    let panel = details.certificate_for(&donor.id).unwrap();
    assert!(panel.certificate.is_none());
    assert!(panel.image_url.is_none());
    assert!(details.error().is_none());
    assert!(details.certificate_for(&DonorId::new("4")).is_none());
}

// ============================================================================
// Transfer desk
// ============================================================================

#[tokio::test]
async fn test_transfer_over_available_count_is_refused_locally() {
    let server = MockServer::start().await;
    mount_fetch(&server, TRANSFERS, "fetch", json!([])).await;
    mount_fetch(&server, TRANSFERS, "fetch_books", json!([book_json("1", "Muna Madan", 4)])).await;
    Mock::given(method("POST"))
        .and(path(TRANSFERS))
        .respond_with(success_unit())
        .expect(0)
        .mount(&server)
        .await;

    let client = shared_client(&server);
    let mut desk = TransferDesk::new(client.clone(), client);
    desk.ensure_loaded().await.unwrap();
    assert!(desk.select_book(&BookId::new("1")));

    let err = desk
        .submit_transfer(TransferForm {
            book_id: "1".to_string(),
            count: "5".to_string(),
            destination: "Bhaktapur".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Cannot transfer 5 books. Only 4 available.");
    assert_eq!(
        desk.form().unwrap().error.as_deref(),
        Some("Cannot transfer 5 books. Only 4 available.")
    );
}

#[tokio::test]
async fn test_recorded_transfer_reloads_both_lists() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TRANSFERS))
        .and(query_param("action", "fetch"))
        .respond_with(success(json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(TRANSFERS))
        .and(query_param("action", "fetch"))
        .respond_with(success(json!([transfer_json(12, "1", 3, "Bhaktapur")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(TRANSFERS))
        .and(query_param("action", "fetch_books"))
        .respond_with(success(json!([book_json("1", "Muna Madan", 4)])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(TRANSFERS))
        .and(query_param("action", "fetch_books"))
        .respond_with(success(json!([book_json("1", "Muna Madan", 1)])))
        .mount(&server)
        .await;
    // Whatever book id the page posts, the selected book is the source.
    Mock::given(method("POST"))
        .and(path(TRANSFERS))
        .and(query_param("action", "add"))
        .and(body_json(json!({ "bookId": "1", "count": 3, "destination": "Bhaktapur" })))
        .respond_with(success_unit())
        .expect(1)
        .mount(&server)
        .await;

    let client = shared_client(&server);
    let mut desk = TransferDesk::new(client.clone(), client);
    desk.ensure_loaded().await.unwrap();
    assert!(desk.select_book(&BookId::new("1")));
    desk.submit_transfer(TransferForm {
        book_id: "99".to_string(),
        count: " 3 ".to_string(),
        destination: " Bhaktapur ".to_string(),
    })
    .await
    .unwrap();

    assert!(desk.form().is_none());
    assert_eq!(desk.notice(), Some(TRANSFER_ADDED_NOTICE));
    assert_eq!(desk.books().items()[0].copy_count, 1);
    assert_eq!(desk.transfers().items()[0].id, TransferId::new("12"));
}

#[tokio::test]
async fn test_picker_failure_shows_in_desk_banner() {
    let server = MockServer::start().await;
    mount_fetch(&server, TRANSFERS, "fetch", json!([])).await;
    Mock::given(method("GET"))
        .and(path(TRANSFERS))
        .and(query_param("action", "fetch_books"))
        .respond_with(rejection("Books unavailable"))
        .mount(&server)
        .await;

    let client = shared_client(&server);
    let mut desk = TransferDesk::new(client.clone(), client);
    assert!(desk.ensure_loaded().await.is_err());

    assert_eq!(desk.error(), Some("Books unavailable"));
    assert!(desk.transfers().has_loaded());
    assert!(!desk.select_book(&BookId::new("1")));
}

// ============================================================================
// Stats
// ============================================================================

#[tokio::test]
async fn test_stats_are_fetched_once_until_refreshed() {
    let server = MockServer::start().await;
    mount_stats(&server).await;

    let mut stats = StatsAggregator::new(shared_client(&server));
    stats.ensure_loaded().await.unwrap();
    stats.ensure_loaded().await.unwrap();
    stats.refresh().await.unwrap();

    assert_eq!(stats.stats().unwrap().total_books, 1520);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}
