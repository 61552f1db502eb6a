//! Defines the endpoint for editing an existing transaction.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    AppState, Error,
    auth::Claims,
    transaction::{
        core::TransactionId,
        reconcile::{NewTransaction, update_transaction},
    },
};

/// A route handler for editing one of the authenticated user's
/// transactions.
///
/// Behaves like deleting the old transaction and recreating it with the new
/// field values: the old recorded effect is reversed and the new effect
/// applied, atomically.
pub async fn update_transaction_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(transaction_id): Path<TransactionId>,
    Json(data): Json<NewTransaction>,
) -> Result<impl IntoResponse, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = update_transaction(transaction_id, claims.user_id(), &data, &connection)?;

    Ok(Json(transaction))
}
