//! Defines the endpoint for creating a new transaction.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    AppState, Error,
    auth::Claims,
    transaction::reconcile::{NewTransaction, create_transaction},
};

/// A route handler for recording a new transaction for the authenticated
/// user.
///
/// The affected account balance(s) are updated in the same store
/// transaction. Responds with 201 and the created transaction on success.
pub async fn create_transaction_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Json(new_transaction): Json<NewTransaction>,
) -> Result<impl IntoResponse, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = create_transaction(claims.user_id(), &new_transaction, &connection)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}
