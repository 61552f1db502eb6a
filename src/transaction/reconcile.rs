//! The balance reconciliation rules.
//!
//! Creating, editing and deleting a transaction must keep the balances of
//! the affected account(s) equal to the sum of the signed effects of all
//! surviving transactions. All balance writes in this module are atomic
//! in-store increments (`balance = balance + ?`) and every multi-account
//! mutation runs inside a single SQL transaction, so either every affected
//! balance is updated or none is.

use rusqlite::{Connection, params};
use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    account::AccountId,
    transaction::core::{
        Transaction, TransactionId, TransactionKind, get_transaction, map_row_to_transaction,
    },
    user::UserId,
};

/// The signed balance deltas a transaction applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Effects {
    /// The delta applied to the primary account.
    pub primary: f64,
    /// The delta applied to the transfer target, for transfers.
    pub transfer: Option<f64>,
}

/// The signed effects of a transaction with the given kind and amount:
/// income adds to the primary account, expense subtracts from it, and a
/// transfer moves the amount from the primary account to the target.
pub fn signed_effects(kind: TransactionKind, amount: f64) -> Effects {
    match kind {
        TransactionKind::Income => Effects {
            primary: amount,
            transfer: None,
        },
        TransactionKind::Expense => Effects {
            primary: -amount,
            transfer: None,
        },
        TransactionKind::Transfer => Effects {
            primary: -amount,
            transfer: Some(amount),
        },
    }
}

/// The request body for creating or editing a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    /// The primary account to record the transaction against.
    pub account_id: AccountId,
    /// The kind of transaction.
    pub kind: TransactionKind,
    /// The amount of money moved. Must be positive.
    pub amount: f64,
    /// The receiving account. Required for transfers, rejected otherwise.
    pub transfer_account_id: Option<AccountId>,
    /// When the transaction happened.
    pub date: Date,
    /// An optional note describing the transaction.
    pub note: Option<String>,
}

fn validate(data: &NewTransaction) -> Result<(), Error> {
    if !data.amount.is_finite() || data.amount <= 0.0 {
        return Err(Error::NonPositiveAmount(data.amount));
    }

    match (data.kind, data.transfer_account_id) {
        (TransactionKind::Transfer, None) => Err(Error::MissingTransferAccount),
        (TransactionKind::Transfer, Some(target)) if target == data.account_id => {
            Err(Error::SameAccountTransfer)
        }
        (TransactionKind::Transfer, Some(_)) => Ok(()),
        (_, Some(_)) => Err(Error::UnexpectedTransferAccount),
        (_, None) => Ok(()),
    }
}

/// Add `delta` to the balance of the account with `account_id` owned by
/// `user_id`, as a single atomic store operation.
///
/// Returns whether an account row was updated. When `required` is set, a
/// missing (or foreign) account is an error, which aborts the surrounding
/// SQL transaction without any balance having leaked.
fn apply_effect(
    connection: &Connection,
    user_id: UserId,
    account_id: AccountId,
    delta: f64,
    required: bool,
) -> Result<bool, Error> {
    let rows_affected = connection.execute(
        "UPDATE account SET balance = balance + ?1 WHERE id = ?2 AND user_id = ?3",
        params![delta, account_id, user_id.as_i64()],
    )?;

    if rows_affected == 0 && required {
        return Err(Error::NotFound);
    }

    Ok(rows_affected != 0)
}

fn reverse_stored_effects(
    connection: &Connection,
    user_id: UserId,
    transaction: &Transaction,
) -> Result<(), Error> {
    apply_effect(
        connection,
        user_id,
        transaction.account_id,
        -transaction.effect,
        true,
    )?;

    // A transfer target that has since been deleted cannot have its balance
    // restored; skip it rather than blocking the mutation.
    if let (Some(target), Some(transfer_effect)) =
        (transaction.transfer_account_id, transaction.transfer_effect)
    {
        apply_effect(connection, user_id, target, -transfer_effect, false)?;
    }

    Ok(())
}

fn apply_new_effects(
    connection: &Connection,
    user_id: UserId,
    data: &NewTransaction,
    effects: Effects,
) -> Result<(), Error> {
    apply_effect(connection, user_id, data.account_id, effects.primary, true)?;

    if let (Some(target), Some(delta)) = (data.transfer_account_id, effects.transfer) {
        apply_effect(connection, user_id, target, delta, true)?;
    }

    Ok(())
}

/// Create a transaction for `user_id` and apply its effects to the affected
/// account balance(s).
///
/// The applied effects are stored on the transaction row so that later
/// deletes and edits can reverse exactly what was applied.
///
/// # Errors
///
/// Returns a validation error ([Error::NonPositiveAmount],
/// [Error::SameAccountTransfer], [Error::MissingTransferAccount],
/// [Error::UnexpectedTransferAccount]) without touching the store, or
/// [Error::NotFound] if the primary or target account is missing or not
/// owned by `user_id`, in which case no balance is modified.
pub fn create_transaction(
    user_id: UserId,
    data: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate(data)?;

    let effects = signed_effects(data.kind, data.amount);
    let now = OffsetDateTime::now_utc();

    let sql_transaction = connection.unchecked_transaction()?;

    apply_new_effects(&sql_transaction, user_id, data, effects)?;

    let transaction = sql_transaction
        .prepare(
            "INSERT INTO \"transaction\"
                (user_id, account_id, kind, amount, transfer_account_id, date, note,
                 effect, transfer_effect, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             RETURNING id, user_id, account_id, kind, amount, transfer_account_id, date, note,
                 effect, transfer_effect, created_at, updated_at",
        )?
        .query_row(
            params![
                user_id.as_i64(),
                data.account_id,
                data.kind.as_str(),
                data.amount,
                data.transfer_account_id,
                data.date,
                data.note,
                effects.primary,
                effects.transfer,
                now,
                now,
            ],
            map_row_to_transaction,
        )?;

    sql_transaction.commit()?;

    Ok(transaction)
}

/// Edit the transaction with `id`, equivalent to deleting it and recreating
/// it with the new field values: the old stored effects are reversed, the
/// new fields are persisted, and the new effects are applied and stored.
///
/// Reversal uses the old account references and application uses the new
/// ones, so changing the account(s) of a transaction cannot double-apply an
/// effect.
///
/// # Errors
///
/// Returns [Error::NotFound] if the transaction, the old primary account, or
/// a new referenced account is missing or not owned by `user_id`; on any
/// error no balance or field is modified.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserId,
    data: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate(data)?;

    let effects = signed_effects(data.kind, data.amount);
    let now = OffsetDateTime::now_utc();

    let sql_transaction = connection.unchecked_transaction()?;

    let old_transaction = get_transaction(id, user_id, &sql_transaction)?;

    reverse_stored_effects(&sql_transaction, user_id, &old_transaction)?;
    apply_new_effects(&sql_transaction, user_id, data, effects)?;

    sql_transaction.execute(
        "UPDATE \"transaction\"
         SET account_id = ?1, kind = ?2, amount = ?3, transfer_account_id = ?4, date = ?5,
             note = ?6, effect = ?7, transfer_effect = ?8, updated_at = ?9
         WHERE id = ?10",
        params![
            data.account_id,
            data.kind.as_str(),
            data.amount,
            data.transfer_account_id,
            data.date,
            data.note,
            effects.primary,
            effects.transfer,
            now,
            id,
        ],
    )?;

    sql_transaction.commit()?;

    Ok(Transaction {
        id,
        user_id,
        account_id: data.account_id,
        kind: data.kind,
        amount: data.amount,
        transfer_account_id: data.transfer_account_id,
        date: data.date,
        note: data.note.clone(),
        effect: effects.primary,
        transfer_effect: effects.transfer,
        created_at: old_transaction.created_at,
        updated_at: now,
    })
}

/// Delete the transaction with `id`, reversing the stored effects it applied
/// when it was created or last edited.
///
/// # Errors
///
/// Returns [Error::NotFound] if the transaction or its primary account is
/// missing or not owned by `user_id`; on any error no balance is modified
/// and the transaction is kept.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let transaction = get_transaction(id, user_id, &sql_transaction)?;

    reverse_stored_effects(&sql_transaction, user_id, &transaction)?;

    sql_transaction.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1",
        params![transaction.id],
    )?;

    sql_transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod signed_effects_tests {
    use crate::transaction::TransactionKind;

    use super::{Effects, signed_effects};

    #[test]
    fn income_adds_to_primary() {
        assert_eq!(
            signed_effects(TransactionKind::Income, 500.0),
            Effects {
                primary: 500.0,
                transfer: None
            }
        );
    }

    #[test]
    fn expense_subtracts_from_primary() {
        assert_eq!(
            signed_effects(TransactionKind::Expense, 50.0),
            Effects {
                primary: -50.0,
                transfer: None
            }
        );
    }

    #[test]
    fn transfer_moves_amount_to_target() {
        assert_eq!(
            signed_effects(TransactionKind::Transfer, 30.0),
            Effects {
                primary: -30.0,
                transfer: Some(30.0)
            }
        );
    }
}
