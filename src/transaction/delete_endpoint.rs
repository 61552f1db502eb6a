//! Defines the endpoint for deleting a transaction.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    AppState, Error,
    auth::Claims,
    transaction::{core::TransactionId, reconcile::delete_transaction},
};

/// A route handler for deleting one of the authenticated user's
/// transactions, reversing its recorded effect on the affected account
/// balance(s).
pub async fn delete_transaction_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(transaction_id): Path<TransactionId>,
) -> Result<impl IntoResponse, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_transaction(transaction_id, claims.user_id(), &connection)?;

    Ok(Json(json!({"message": "transaction deleted"})))
}
