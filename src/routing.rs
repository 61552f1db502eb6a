//! Application router configuration.

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::{
    AppState, Error,
    account::{
        create_account_endpoint, delete_account_endpoint, get_account_endpoint,
        list_accounts_endpoint, reveal_account_field_endpoint,
    },
    auth::sign_in_endpoint,
    endpoints,
    logging::logging_middleware,
    report::send_report_endpoint,
    sign_up::sign_up_endpoint,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
        update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Sign-up and sign-in are unauthenticated; every other route requires a
/// bearer token, enforced by the [crate::auth::Claims] extractor in each
/// handler.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::USERS, post(sign_up_endpoint))
        .route(endpoints::SIGN_IN, post(sign_in_endpoint))
        .route(
            endpoints::ACCOUNTS,
            post(create_account_endpoint).get(list_accounts_endpoint),
        )
        .route(
            endpoints::ACCOUNT,
            get(get_account_endpoint).delete(delete_account_endpoint),
        )
        .route(endpoints::ACCOUNT_REVEAL, post(reveal_account_field_endpoint))
        .route(
            endpoints::TRANSACTIONS,
            post(create_transaction_endpoint).get(list_transactions_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(update_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(endpoints::REPORTS, post(send_report_endpoint))
        .fallback(get_unknown_route)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

async fn get_unknown_route() -> Error {
    Error::NotFound
}
