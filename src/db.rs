//! Functions for initialising the database.

use rusqlite::Connection;

use crate::{
    account::create_account_table, transaction::create_transaction_table, user::create_user_table,
};

/// Create the application tables if they do not exist.
///
/// # Errors
///
/// Returns an error if any of the table creation SQL fails.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    create_user_table(connection)?;
    create_account_table(connection)?;
    create_transaction_table(connection)?;

    Ok(())
}
