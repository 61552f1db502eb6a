use std::{fmt::Display, str::FromStr};

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, account::AccountId, database_id::DatabaseId, user::UserId};

/// Alias for the integer type used for transaction IDs.
pub type TransactionId = DatabaseId;

/// The kind of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money entering the account.
    Income,
    /// Money leaving the account.
    Expense,
    /// Money moved from the primary account to another account.
    Transfer,
}

impl TransactionKind {
    /// The kind as the lowercase string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
            TransactionKind::Transfer => "transfer",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            "transfer" => Ok(TransactionKind::Transfer),
            other => Err(format!("unknown transaction kind \"{other}\"")),
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An income, expense or transfer recorded against one (or, for transfers,
/// two) of a user's accounts.
///
/// `effect` and `transfer_effect` record the signed balance deltas that were
/// applied when the transaction was created or last edited. Deleting or
/// editing a transaction always reverses these stored effects rather than
/// recomputing them from the kind and amount, so repeated edits cannot drift
/// the account balance away from the transaction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID for the transaction.
    pub id: TransactionId,
    /// The ID of the user that recorded the transaction.
    pub user_id: UserId,
    /// The primary account the transaction was recorded against.
    pub account_id: AccountId,
    /// The kind of transaction.
    pub kind: TransactionKind,
    /// The amount of money moved. Always positive.
    pub amount: f64,
    /// The receiving account, for transfers.
    pub transfer_account_id: Option<AccountId>,
    /// When the transaction happened.
    pub date: Date,
    /// An optional note describing the transaction.
    pub note: Option<String>,
    /// The signed balance delta applied to the primary account.
    pub effect: f64,
    /// The signed balance delta applied to the transfer target, for
    /// transfers.
    pub transfer_effect: Option<f64>,
    /// When the transaction record was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction record was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Create the transaction table.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id),
            account_id INTEGER NOT NULL REFERENCES account(id),
            kind TEXT NOT NULL,
            amount REAL NOT NULL,
            transfer_account_id INTEGER,
            date TEXT NOT NULL,
            note TEXT,
            effect REAL NOT NULL,
            transfer_effect REAL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

pub(crate) const TRANSACTION_COLUMNS: &str = "id, user_id, account_id, kind, amount, \
     transfer_account_id, date, note, effect, transfer_effect, created_at, updated_at";

pub(crate) fn map_row_to_transaction(row: &rusqlite::Row) -> Result<Transaction, rusqlite::Error> {
    let raw_kind: String = row.get(3)?;
    let kind = TransactionKind::from_str(&raw_kind).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, error.into())
    })?;

    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserId::new(row.get(1)?),
        account_id: row.get(2)?,
        kind,
        amount: row.get(4)?,
        transfer_account_id: row.get(5)?,
        date: row.get(6)?,
        note: row.get(7)?,
        effect: row.get(8)?,
        transfer_effect: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

/// Get the transaction with `id` belonging to `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no such transaction exists or it belongs to
/// a different user.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" \
             WHERE id = :id AND user_id = :user_id"
        ))?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_row_to_transaction,
        )
        .map_err(|error| error.into())
}

/// Get the transactions belonging to `user_id`, optionally restricted to
/// those recorded against `account_id` as their primary account.
///
/// # Errors
///
/// Returns [Error::SqlError] if there is an SQL error.
pub fn list_transactions(
    user_id: UserId,
    account_id: Option<AccountId>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    match account_id {
        Some(account_id) => connection
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" \
                 WHERE user_id = :user_id AND account_id = :account_id"
            ))?
            .query_map(
                &[(":user_id", &user_id.as_i64()), (":account_id", &account_id)],
                map_row_to_transaction,
            )?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect(),
        None => connection
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE user_id = :user_id"
            ))?
            .query_map(&[(":user_id", &user_id.as_i64())], map_row_to_transaction)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect(),
    }
}
