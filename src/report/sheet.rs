//! Encodes an account report as a CSV sheet.

use crate::{Error, report::core::AccountReport};

/// Encode `report` as a CSV sheet: a header row, one row per transaction,
/// a blank separator row, then the income/expense/balance summary rows.
///
/// # Errors
///
/// Returns [Error::SheetEncoding] if the CSV writer fails.
pub fn encode_sheet(report: &AccountReport) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["Date", "Kind", "Amount", "Note"])
        .map_err(sheet_error)?;

    for transaction in &report.transactions {
        writer
            .write_record([
                transaction.date.to_string(),
                transaction.kind.to_string(),
                format!("{:.2}", transaction.amount),
                transaction.note.clone().unwrap_or_default(),
            ])
            .map_err(sheet_error)?;
    }

    writer.write_record(["", "", "", ""]).map_err(sheet_error)?;

    for (label, total) in [
        ("Income", report.income),
        ("Expense", report.expense),
        ("Balance", report.balance),
    ] {
        writer
            .write_record([label.to_owned(), String::new(), format!("{total:.2}"), String::new()])
            .map_err(sheet_error)?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::SheetEncoding(error.to_string()))
}

fn sheet_error(error: csv::Error) -> Error {
    Error::SheetEncoding(error.to_string())
}

#[cfg(test)]
mod encode_sheet_tests {
    use time::macros::{date, datetime};

    use crate::{
        report::core::AccountReport,
        transaction::{Transaction, TransactionKind},
        user::UserId,
    };

    use super::encode_sheet;

    fn test_report() -> AccountReport {
        let created_at = datetime!(2026-01-15 12:00 UTC);

        AccountReport {
            account_name: "Savings".to_owned(),
            transactions: vec![
                Transaction {
                    id: 1,
                    user_id: UserId::new(1),
                    account_id: 1,
                    kind: TransactionKind::Income,
                    amount: 200.0,
                    transfer_account_id: None,
                    date: date!(2026 - 01 - 10),
                    note: Some("salary".to_owned()),
                    effect: 200.0,
                    transfer_effect: None,
                    created_at,
                    updated_at: created_at,
                },
                Transaction {
                    id: 2,
                    user_id: UserId::new(1),
                    account_id: 1,
                    kind: TransactionKind::Expense,
                    amount: 50.0,
                    transfer_account_id: None,
                    date: date!(2026 - 01 - 20),
                    note: None,
                    effect: -50.0,
                    transfer_effect: None,
                    created_at,
                    updated_at: created_at,
                },
            ],
            income: 200.0,
            expense: 50.0,
            balance: 150.0,
        }
    }

    #[test]
    fn sheet_contains_header_rows_and_summary() {
        let sheet = String::from_utf8(encode_sheet(&test_report()).unwrap()).unwrap();
        let lines: Vec<&str> = sheet.lines().collect();

        assert_eq!(lines[0], "Date,Kind,Amount,Note");
        assert_eq!(lines[1], "2026-01-10,income,200.00,salary");
        assert_eq!(lines[2], "2026-01-20,expense,50.00,");
        assert_eq!(lines[3], ",,,");
        assert_eq!(lines[4], "Income,,200.00,");
        assert_eq!(lines[5], "Expense,,50.00,");
        assert_eq!(lines[6], "Balance,,150.00,");
    }

    #[test]
    fn empty_report_still_has_header_and_summary() {
        let report = AccountReport {
            transactions: vec![],
            income: 0.0,
            expense: 0.0,
            balance: 0.0,
            ..test_report()
        };

        let sheet = String::from_utf8(encode_sheet(&report).unwrap()).unwrap();
        let lines: Vec<&str> = sheet.lines().collect();

        assert_eq!(lines[0], "Date,Kind,Amount,Note");
        assert_eq!(lines[1], ",,,");
        assert_eq!(lines[4], "Balance,,0.00,");
    }
}
