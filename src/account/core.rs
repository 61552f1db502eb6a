use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, named_params};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId, user::UserId};

/// Alias for the integer type used for account IDs.
pub type AccountId = DatabaseId;

/// The kind of monetary account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Physical cash.
    Cash,
    /// A bank account. May carry bank details (account number, IFSC code).
    Bank,
    /// A digital wallet.
    Wallet,
    /// A credit card. May carry card details (number, expiry, CVV).
    Credit,
    /// Anything that does not fit the other kinds.
    Other,
}

impl AccountKind {
    /// The kind as the lowercase string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Cash => "cash",
            AccountKind::Bank => "bank",
            AccountKind::Wallet => "wallet",
            AccountKind::Credit => "credit",
            AccountKind::Other => "other",
        }
    }
}

impl FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(AccountKind::Cash),
            "bank" => Ok(AccountKind::Bank),
            "wallet" => Ok(AccountKind::Wallet),
            "credit" => Ok(AccountKind::Credit),
            "other" => Ok(AccountKind::Other),
            other => Err(format!("unknown account kind \"{other}\"")),
        }
    }
}

impl Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A monetary account owned by one user.
///
/// The sensitive fields (`account_number`, `card_number`, `expiry_date`,
/// `cvv`) hold ciphertext produced by [crate::FieldCodec]; they are only
/// decrypted by the reveal endpoint and are never serialized into API
/// responses (see [AccountResponse]).
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The ID for the account.
    pub id: AccountId,
    /// The ID of the user that owns the account.
    pub user_id: UserId,
    /// The display name of the account.
    pub name: String,
    /// The kind of account.
    pub kind: AccountKind,
    /// The amount of money currently in the account.
    ///
    /// Kept consistent with the transaction history by the balance
    /// reconciliation code in [crate::transaction].
    pub balance: f64,
    /// The name of the bank, for bank accounts.
    pub bank_name: Option<String>,
    /// The bank account number (encrypted).
    pub account_number: Option<String>,
    /// The bank branch IFSC code, for bank accounts.
    pub ifsc_code: Option<String>,
    /// The credit card number (encrypted).
    pub card_number: Option<String>,
    /// The credit card expiry date (encrypted).
    pub expiry_date: Option<String>,
    /// The credit card CVV (encrypted).
    pub cvv: Option<String>,
}

/// The representation of an account sent to clients.
///
/// Encrypted fields are replaced with booleans indicating whether the field
/// is set, so that ciphertext never reaches the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountResponse {
    /// The ID for the account.
    pub id: AccountId,
    /// The display name of the account.
    pub name: String,
    /// The kind of account.
    pub kind: AccountKind,
    /// The amount of money currently in the account.
    pub balance: f64,
    /// The name of the bank, for bank accounts.
    pub bank_name: Option<String>,
    /// The bank branch IFSC code, for bank accounts.
    pub ifsc_code: Option<String>,
    /// Whether the account has a bank account number on file.
    pub has_account_number: bool,
    /// Whether the account has a card number on file.
    pub has_card_number: bool,
    /// Whether the account has a card expiry date on file.
    pub has_expiry_date: bool,
    /// Whether the account has a card CVV on file.
    pub has_cvv: bool,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            kind: account.kind,
            balance: account.balance,
            bank_name: account.bank_name.clone(),
            ifsc_code: account.ifsc_code.clone(),
            has_account_number: account.account_number.is_some(),
            has_card_number: account.card_number.is_some(),
            has_expiry_date: account.expiry_date.is_some(),
            has_cvv: account.cvv.is_some(),
        }
    }
}

/// Create the account table.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id),
            name TEXT NOT NULL,
            kind TEXT NOT NULL,
            balance REAL NOT NULL DEFAULT 0,
            bank_name TEXT,
            account_number TEXT,
            ifsc_code TEXT,
            card_number TEXT,
            expiry_date TEXT,
            cvv TEXT
        )",
        (),
    )?;

    Ok(())
}

pub(crate) const ACCOUNT_COLUMNS: &str = "id, user_id, name, kind, balance, bank_name, \
     account_number, ifsc_code, card_number, expiry_date, cvv";

pub(crate) fn map_row_to_account(row: &rusqlite::Row) -> Result<Account, rusqlite::Error> {
    let raw_kind: String = row.get(3)?;
    let kind = AccountKind::from_str(&raw_kind).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, error.into())
    })?;

    Ok(Account {
        id: row.get(0)?,
        user_id: UserId::new(row.get(1)?),
        name: row.get(2)?,
        kind,
        balance: row.get(4)?,
        bank_name: row.get(5)?,
        account_number: row.get(6)?,
        ifsc_code: row.get(7)?,
        card_number: row.get(8)?,
        expiry_date: row.get(9)?,
        cvv: row.get(10)?,
    })
}

/// Get the account with `id` belonging to `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no such account exists or it belongs to a
/// different user. The two cases are deliberately indistinguishable so that
/// clients cannot probe for other users' accounts.
pub fn get_account(
    id: AccountId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Account, Error> {
    connection
        .prepare(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM account WHERE id = :id AND user_id = :user_id"
        ))?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_row_to_account,
        )
        .map_err(|error| error.into())
}

/// Get all accounts belonging to `user_id`.
///
/// The order of the returned accounts is unspecified.
///
/// # Errors
///
/// Returns [Error::SqlError] if there is an SQL error.
pub fn list_accounts(user_id: UserId, connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM account WHERE user_id = :user_id"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row_to_account)?
        .map(|maybe_account| maybe_account.map_err(Error::SqlError))
        .collect()
}

/// Delete the account with `id` belonging to `user_id`, along with the
/// transactions that reference it as their primary account.
///
/// Transfers recorded against the deleted account also credited a target
/// account; those stored `transfer_effect`s are reversed on the surviving
/// targets so that every remaining balance still equals the sum of the
/// effects of the remaining transactions. Rows on other accounts that named
/// the deleted account as their transfer target are kept as-is.
///
/// # Errors
///
/// Returns [Error::NotFound] if no such account exists or it belongs to a
/// different user. On any error no row or balance is modified.
pub fn delete_account(
    id: AccountId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let transfer_legs = sql_transaction
        .prepare(
            "SELECT transfer_account_id, transfer_effect FROM \"transaction\"
             WHERE account_id = :account_id AND transfer_account_id IS NOT NULL",
        )?
        .query_map(&[(":account_id", &id)], |row| {
            Ok((row.get::<_, AccountId>(0)?, row.get::<_, Option<f64>>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    for (target, transfer_effect) in transfer_legs {
        if let Some(transfer_effect) = transfer_effect {
            sql_transaction.execute(
                "UPDATE account SET balance = balance - :delta WHERE id = :target",
                named_params! { ":delta": transfer_effect, ":target": target },
            )?;
        }
    }

    // The transaction rows reference the account row, so they go first.
    sql_transaction.execute(
        "DELETE FROM \"transaction\" WHERE account_id = :account_id",
        &[(":account_id", &id)],
    )?;

    let rows_affected = sql_transaction.execute(
        "DELETE FROM account WHERE id = :id AND user_id = :user_id",
        &[(":id", &id), (":user_id", &user_id.as_i64())],
    )?;

    // Rolls back the deletes and balance updates above.
    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    sql_transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use super::create_account_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_account_table(&connection));
    }
}
