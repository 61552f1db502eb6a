//! Defines the endpoint for registering a new user.

use std::str::FromStr;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use email_address::EmailAddress;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState, Error, PasswordHash,
    account::create_default_cash_account,
    user::create_user,
};

/// The request body for registering a new user.
#[derive(Debug, Deserialize)]
pub struct NewUser {
    /// The name to sign up with.
    pub name: String,
    /// The email address to sign up with. Must not belong to another user.
    pub email: String,
    /// The plaintext password to sign up with.
    pub password: String,
    /// An optional URL to an avatar image.
    pub avatar: Option<String>,
}

/// A route handler for registering a new user.
///
/// New users get a default "Cash" account with a zero balance, created in the
/// same store transaction as the user row.
///
/// # Errors
///
/// Returns [Error::InvalidEmail], [Error::PasswordTooShort] or
/// [Error::DuplicateEmail] for invalid sign-up data.
pub async fn sign_up_endpoint(
    State(state): State<AppState>,
    Json(new_user): Json<NewUser>,
) -> Result<impl IntoResponse, Error> {
    if EmailAddress::from_str(&new_user.email).is_err() {
        return Err(Error::InvalidEmail(new_user.email));
    }

    let password_hash = PasswordHash::new(&new_user.password, PasswordHash::DEFAULT_COST)?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let sql_transaction = connection.unchecked_transaction()?;
    let user = create_user(
        &new_user.name,
        &new_user.email,
        new_user.avatar.as_deref(),
        password_hash,
        &sql_transaction,
    )?;
    create_default_cash_account(user.id, &sql_transaction)?;
    sql_transaction.commit()?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "avatar": user.avatar,
        })),
    ))
}
