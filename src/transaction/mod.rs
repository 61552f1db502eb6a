//! The transaction feature: the domain model, the balance reconciliation
//! logic that keeps account balances consistent with the transaction
//! history, and the route handlers.

pub mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;
pub mod reconcile;
mod update_endpoint;

pub use core::{Transaction, TransactionKind, create_transaction_table};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use update_endpoint::update_transaction_endpoint;
