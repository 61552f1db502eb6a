//! Defines the endpoint for listing the authenticated user's transactions.

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::AccountId,
    auth::Claims,
    transaction::core::list_transactions,
};

/// Query parameters for listing transactions.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionFilter {
    /// Restrict the listing to transactions recorded against this account.
    pub account_id: Option<AccountId>,
}

/// A route handler for listing the authenticated user's transactions,
/// optionally filtered to one account.
pub async fn list_transactions_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Query(filter): Query<TransactionFilter>,
) -> Result<impl IntoResponse, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = list_transactions(claims.user_id(), filter.account_id, &connection)?;

    Ok(Json(transactions))
}
