//! Helpers shared between endpoint tests.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use axum::http::StatusCode;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, Error,
    account::{AccountId, core::AccountResponse},
    endpoints::{self, format_endpoint},
    report::{Mailer, ReportEmail},
    routing::build_router,
};

/// A [Mailer] that records outgoing emails instead of sending them.
#[derive(Clone, Default)]
pub struct FakeMailer {
    sent: Arc<Mutex<Vec<ReportEmail>>>,
    fail_next: Arc<AtomicBool>,
}

impl FakeMailer {
    /// The emails sent through this mailer so far.
    pub fn sent_emails(&self) -> Vec<ReportEmail> {
        self.sent.lock().unwrap().clone()
    }

    /// Make the next call to [Mailer::send] fail with a delivery error.
    pub fn fail_next_send(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

impl Mailer for FakeMailer {
    fn send(&self, email: ReportEmail) -> Result<(), Error> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(Error::Delivery("fake mailer failure".to_owned()));
        }

        self.sent.lock().unwrap().push(email);

        Ok(())
    }
}

/// The password used by the sign-up helpers.
pub const TEST_PASSWORD: &str = "averysafeandsecurepassword";

/// Create an [AppState] backed by an in-memory database and a [FakeMailer].
pub fn new_test_state() -> AppState {
    new_test_state_with_mailer().0
}

fn new_test_state_with_mailer() -> (AppState, FakeMailer) {
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    let mailer = FakeMailer::default();

    let state = AppState::new(
        connection,
        "test jwt secret",
        "test field secret",
        Arc::new(mailer.clone()),
    )
    .expect("Could not create app state");

    (state, mailer)
}

/// Create a test server with all the app's routes.
pub fn new_test_server() -> TestServer {
    new_test_server_with_mailer().0
}

/// Create a test server along with the [FakeMailer] that captures the email
/// it sends.
pub fn new_test_server_with_mailer() -> (TestServer, FakeMailer) {
    let (state, mailer) = new_test_state_with_mailer();
    let server = TestServer::new(build_router(state));

    (server, mailer)
}

/// Register a user with `email` and return a bearer token for them.
pub async fn sign_up_and_sign_in(server: &TestServer, email: &str) -> String {
    server
        .post(endpoints::USERS)
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": TEST_PASSWORD,
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post(endpoints::SIGN_IN)
        .json(&json!({
            "email": email,
            "password": TEST_PASSWORD,
        }))
        .await;

    response.assert_status_ok();

    response.json::<serde_json::Value>()["token"]
        .as_str()
        .expect("sign-in response should contain a token")
        .to_owned()
}

/// Create a test server with a registered user, returning the server and a
/// bearer token for the user.
pub async fn new_test_server_with_user(email: &str) -> (TestServer, String) {
    let server = new_test_server();
    let token = sign_up_and_sign_in(&server, email).await;

    (server, token)
}

/// Create a cash account named `name` with a zero balance.
pub async fn post_account(server: &TestServer, token: &str, name: &str) -> AccountResponse {
    let response = server
        .post(endpoints::ACCOUNTS)
        .authorization_bearer(token)
        .json(&json!({
            "name": name,
            "kind": "cash",
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    response.json::<AccountResponse>()
}

/// Fetch the current balance of the account with `account_id`.
pub async fn get_account_balance(server: &TestServer, token: &str, account_id: AccountId) -> f64 {
    let response = server
        .get(&format_endpoint(endpoints::ACCOUNT, account_id))
        .authorization_bearer(token)
        .await;

    response.assert_status_ok();

    response.json::<AccountResponse>().balance
}
