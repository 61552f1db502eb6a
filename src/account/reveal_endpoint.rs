//! Defines the endpoint for revealing one encrypted account field.
//!
//! This is the only code path in the application that turns stored
//! ciphertext back into plaintext for a client.

use std::str::FromStr;

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState, Error, FieldCodec,
    account::core::{Account, AccountId, get_account},
    auth::Claims,
    user::UserId,
};

/// The account fields that may be revealed.
///
/// Requests naming any other field are rejected with
/// [Error::InvalidField].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensitiveField {
    /// The bank account number.
    AccountNumber,
    /// The credit card number.
    CardNumber,
    /// The credit card expiry date.
    ExpiryDate,
    /// The credit card CVV.
    Cvv,
}

impl FromStr for SensitiveField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "account_number" => Ok(SensitiveField::AccountNumber),
            "card_number" => Ok(SensitiveField::CardNumber),
            "expiry_date" => Ok(SensitiveField::ExpiryDate),
            "cvv" => Ok(SensitiveField::Cvv),
            other => Err(Error::InvalidField(other.to_owned())),
        }
    }
}

/// The request body for revealing an account field.
#[derive(Debug, Deserialize)]
pub struct RevealRequest {
    /// The ID of the account holding the field.
    pub account_id: AccountId,
    /// The name of the field to reveal, e.g. "card_number".
    pub field: String,
}

/// A route handler for revealing one sensitive field of one of the
/// authenticated user's accounts.
///
/// An account that does not exist, belongs to a different user, or does not
/// have the requested field on file is reported as 404 in all three cases.
/// The decrypted value is returned to the client and is not logged or
/// persisted anywhere.
pub async fn reveal_account_field_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Json(request): Json<RevealRequest>,
) -> Result<impl IntoResponse, Error> {
    let field = SensitiveField::from_str(&request.field)?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let value = reveal_field(
        claims.user_id(),
        request.account_id,
        field,
        &state.field_codec,
        &connection,
    )?;

    Ok(Json(json!({ "value": value })))
}

/// Decrypt and return the requested field of the account with `account_id`
/// belonging to `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the account is missing, not owned by
/// `user_id`, or does not have the field set; [Error::Decryption] if the
/// stored ciphertext cannot be decrypted.
pub fn reveal_field(
    user_id: UserId,
    account_id: AccountId,
    field: SensitiveField,
    codec: &FieldCodec,
    connection: &rusqlite::Connection,
) -> Result<String, Error> {
    let account = get_account(account_id, user_id, connection)?;

    let ciphertext = select_field(&account, field).ok_or(Error::NotFound)?;

    codec.decrypt(ciphertext)
}

fn select_field(account: &Account, field: SensitiveField) -> Option<&str> {
    match field {
        SensitiveField::AccountNumber => account.account_number.as_deref(),
        SensitiveField::CardNumber => account.card_number.as_deref(),
        SensitiveField::ExpiryDate => account.expiry_date.as_deref(),
        SensitiveField::Cvv => account.cvv.as_deref(),
    }
}
