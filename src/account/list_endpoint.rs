//! Defines the endpoint for listing the authenticated user's accounts.

use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    AppState, Error,
    account::core::{AccountResponse, list_accounts},
    auth::Claims,
};

/// A route handler for listing all of the authenticated user's accounts.
///
/// The order of the returned accounts is unspecified.
pub async fn list_accounts_endpoint(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<impl IntoResponse, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts = list_accounts(claims.user_id(), &connection)?;
    let responses: Vec<AccountResponse> = accounts.iter().map(AccountResponse::from).collect();

    Ok(Json(responses))
}
