//! Builds per-account summaries of a user's transactions over a date range.

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    account::{AccountId, core::list_accounts},
    transaction::{
        Transaction, TransactionKind,
        core::{TRANSACTION_COLUMNS, map_row_to_transaction},
    },
    user::UserId,
};

/// The report for one account: the transactions that fell inside the
/// requested date range and the income/expense totals over them.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountReport {
    /// The display name of the account.
    pub account_name: String,
    /// The account's transactions with a date inside the requested range,
    /// inclusive on both ends.
    pub transactions: Vec<Transaction>,
    /// The sum of the income amounts in `transactions`.
    pub income: f64,
    /// The sum of the expense amounts in `transactions`.
    pub expense: f64,
    /// `income - expense`.
    ///
    /// This is the net flow over the range, not the account's current
    /// balance.
    pub balance: f64,
}

/// Build a report for each of `user_id`'s accounts over the date range
/// `start..=end`.
///
/// Transfers appear in the transaction listing but are excluded from the
/// income and expense totals, since money moved between a user's own
/// accounts is neither earned nor spent.
///
/// # Errors
///
/// Returns [Error::InvalidDateRange] if `end` is earlier than `start`, or
/// [Error::NotFound] if the user has no accounts to report on.
pub fn generate_report(
    user_id: UserId,
    start: Date,
    end: Date,
    connection: &Connection,
) -> Result<Vec<AccountReport>, Error> {
    if start > end {
        return Err(Error::InvalidDateRange);
    }

    let accounts = list_accounts(user_id, connection)?;

    if accounts.is_empty() {
        return Err(Error::NotFound);
    }

    accounts
        .into_iter()
        .map(|account| {
            let transactions =
                transactions_in_range(user_id, account.id, start, end, connection)?;

            let income = sum_amounts(&transactions, TransactionKind::Income);
            let expense = sum_amounts(&transactions, TransactionKind::Expense);

            Ok(AccountReport {
                account_name: account.name,
                transactions,
                income,
                expense,
                balance: income - expense,
            })
        })
        .collect()
}

fn transactions_in_range(
    user_id: UserId,
    account_id: AccountId,
    start: Date,
    end: Date,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" \
             WHERE user_id = :user_id AND account_id = :account_id \
                 AND date BETWEEN :start AND :end \
             ORDER BY date",
        ))?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":account_id": account_id,
                ":start": start,
                ":end": end,
            },
            map_row_to_transaction,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
        .collect()
}

fn sum_amounts(transactions: &[Transaction], kind: TransactionKind) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.kind == kind)
        .map(|transaction| transaction.amount)
        .sum()
}

#[cfg(test)]
mod generate_report_tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        Error, FieldCodec, PasswordHash,
        account::{AccountId, core::AccountKind, create_endpoint},
        db::initialize,
        transaction::{
            TransactionKind,
            reconcile::{NewTransaction, create_transaction},
        },
        user::{UserId, create_user},
    };

    use super::generate_report;

    const USER: UserId = UserId::new(1);

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        // Account rows reference a user row.
        let user = create_user(
            "Alex",
            "alex@example.com",
            None,
            PasswordHash::new_unchecked("hunter22"),
            &conn,
        )
        .unwrap();
        assert_eq!(user.id, USER);

        conn
    }

    fn create_test_account(name: &str, connection: &Connection) -> AccountId {
        create_endpoint::create_account(
            USER,
            &create_endpoint::NewAccount {
                name: name.to_owned(),
                kind: AccountKind::Cash,
                balance: 0.0,
                bank_name: None,
                account_number: None,
                ifsc_code: None,
                card_number: None,
                expiry_date: None,
                cvv: None,
            },
            &FieldCodec::new("test secret"),
            connection,
        )
        .unwrap()
        .id
    }

    fn record(
        account_id: AccountId,
        kind: TransactionKind,
        amount: f64,
        date: Date,
        connection: &Connection,
    ) {
        create_transaction(
            USER,
            &NewTransaction {
                account_id,
                kind,
                amount,
                transfer_account_id: None,
                date,
                note: None,
            },
            connection,
        )
        .unwrap();
    }

    #[test]
    fn totals_income_and_expense_over_range() {
        let connection = get_test_connection();
        let account_id = create_test_account("Savings", &connection);
        record(
            account_id,
            TransactionKind::Income,
            200.0,
            date!(2026 - 01 - 10),
            &connection,
        );
        record(
            account_id,
            TransactionKind::Expense,
            50.0,
            date!(2026 - 01 - 20),
            &connection,
        );

        let reports = generate_report(
            USER,
            date!(2026 - 01 - 01),
            date!(2026 - 01 - 31),
            &connection,
        )
        .unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].income, 200.0);
        assert_eq!(reports[0].expense, 50.0);
        assert_eq!(reports[0].balance, 150.0);
        assert_eq!(reports[0].transactions.len(), 2);
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let connection = get_test_connection();
        let account_id = create_test_account("Savings", &connection);
        record(
            account_id,
            TransactionKind::Income,
            10.0,
            date!(2026 - 01 - 01),
            &connection,
        );
        record(
            account_id,
            TransactionKind::Income,
            20.0,
            date!(2026 - 01 - 31),
            &connection,
        );
        record(
            account_id,
            TransactionKind::Income,
            40.0,
            date!(2026 - 02 - 01),
            &connection,
        );

        let reports = generate_report(
            USER,
            date!(2026 - 01 - 01),
            date!(2026 - 01 - 31),
            &connection,
        )
        .unwrap();

        assert_eq!(reports[0].income, 30.0);
        assert_eq!(reports[0].transactions.len(), 2);
    }

    #[test]
    fn transfers_are_listed_but_excluded_from_totals() {
        let connection = get_test_connection();
        let account_a = create_test_account("Savings", &connection);
        let account_b = create_test_account("Spending", &connection);
        record(
            account_a,
            TransactionKind::Income,
            100.0,
            date!(2026 - 01 - 10),
            &connection,
        );
        create_transaction(
            USER,
            &NewTransaction {
                account_id: account_a,
                kind: TransactionKind::Transfer,
                amount: 30.0,
                transfer_account_id: Some(account_b),
                date: date!(2026 - 01 - 15),
                note: None,
            },
            &connection,
        )
        .unwrap();

        let reports = generate_report(
            USER,
            date!(2026 - 01 - 01),
            date!(2026 - 01 - 31),
            &connection,
        )
        .unwrap();

        let savings = reports
            .iter()
            .find(|report| report.account_name == "Savings")
            .unwrap();

        assert_eq!(savings.transactions.len(), 2);
        assert_eq!(savings.income, 100.0);
        assert_eq!(savings.expense, 0.0);
    }

    #[test]
    fn fails_when_end_is_before_start() {
        let connection = get_test_connection();
        create_test_account("Savings", &connection);

        let result = generate_report(
            USER,
            date!(2026 - 01 - 31),
            date!(2026 - 01 - 01),
            &connection,
        );

        assert_eq!(result, Err(Error::InvalidDateRange));
    }

    #[test]
    fn fails_when_user_has_no_accounts() {
        let connection = get_test_connection();

        let result = generate_report(
            USER,
            date!(2026 - 01 - 01),
            date!(2026 - 01 - 31),
            &connection,
        );

        assert_eq!(result, Err(Error::NotFound));
    }
}
