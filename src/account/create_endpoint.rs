//! Defines the endpoint for creating a new account.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, FieldCodec,
    account::core::{Account, AccountKind, AccountResponse},
    auth::Claims,
    user::UserId,
};

/// The request body for creating an account.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    /// The display name of the account.
    pub name: String,
    /// The kind of account.
    pub kind: AccountKind,
    /// The starting balance. Defaults to zero.
    #[serde(default)]
    pub balance: f64,
    /// The name of the bank, for bank accounts.
    pub bank_name: Option<String>,
    /// The bank account number, in plaintext. Encrypted before storage.
    pub account_number: Option<String>,
    /// The bank branch IFSC code, for bank accounts.
    pub ifsc_code: Option<String>,
    /// The credit card number, in plaintext. Encrypted before storage.
    pub card_number: Option<String>,
    /// The credit card expiry date, in plaintext. Encrypted before storage.
    pub expiry_date: Option<String>,
    /// The credit card CVV, in plaintext. Encrypted before storage.
    pub cvv: Option<String>,
}

/// A route handler for creating a new account for the authenticated user.
///
/// Responds with 201 and the created account on success.
pub async fn create_account_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Json(new_account): Json<NewAccount>,
) -> Result<impl IntoResponse, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let account = create_account(claims.user_id(), &new_account, &state.field_codec, &connection)?;

    Ok((
        StatusCode::CREATED,
        Json(AccountResponse::from(&account)),
    ))
}

/// Create an account for `user_id`, encrypting the sensitive fields with
/// `codec` before they are written.
///
/// # Errors
///
/// Returns [Error::Encryption] if a sensitive field could not be encrypted,
/// or [Error::SqlError] if there is an SQL error.
pub fn create_account(
    user_id: UserId,
    data: &NewAccount,
    codec: &FieldCodec,
    connection: &Connection,
) -> Result<Account, Error> {
    let account_number = encrypt_field(codec, &data.account_number)?;
    let card_number = encrypt_field(codec, &data.card_number)?;
    let expiry_date = encrypt_field(codec, &data.expiry_date)?;
    let cvv = encrypt_field(codec, &data.cvv)?;

    connection.execute(
        "INSERT INTO account
            (user_id, name, kind, balance, bank_name, account_number, ifsc_code,
             card_number, expiry_date, cvv)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        (
            user_id.as_i64(),
            &data.name,
            data.kind.as_str(),
            data.balance,
            &data.bank_name,
            &account_number,
            &data.ifsc_code,
            &card_number,
            &expiry_date,
            &cvv,
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Account {
        id,
        user_id,
        name: data.name.clone(),
        kind: data.kind,
        balance: data.balance,
        bank_name: data.bank_name.clone(),
        account_number,
        ifsc_code: data.ifsc_code.clone(),
        card_number,
        expiry_date,
        cvv,
    })
}

/// Create the default "Cash" account given to every user at sign up.
pub(crate) fn create_default_cash_account(
    user_id: UserId,
    connection: &Connection,
) -> Result<Account, Error> {
    connection.execute(
        "INSERT INTO account (user_id, name, kind, balance) VALUES (?1, ?2, ?3, 0)",
        (user_id.as_i64(), "Cash", AccountKind::Cash.as_str()),
    )?;

    Ok(Account {
        id: connection.last_insert_rowid(),
        user_id,
        name: "Cash".to_owned(),
        kind: AccountKind::Cash,
        balance: 0.0,
        bank_name: None,
        account_number: None,
        ifsc_code: None,
        card_number: None,
        expiry_date: None,
        cvv: None,
    })
}

fn encrypt_field(codec: &FieldCodec, value: &Option<String>) -> Result<Option<String>, Error> {
    value
        .as_deref()
        .map(|plaintext| codec.encrypt(plaintext))
        .transpose()
}
