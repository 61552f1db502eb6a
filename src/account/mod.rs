//! The account feature, including the domain model, SQL and route handlers
//! for creating, listing, fetching and deleting accounts, and for revealing
//! encrypted account fields.

pub mod core;
pub(crate) mod create_endpoint;
mod delete_endpoint;
mod get_endpoint;
mod list_endpoint;
mod reveal_endpoint;

pub use core::{AccountId, create_account_table};
pub use create_endpoint::create_account_endpoint;
pub(crate) use create_endpoint::create_default_cash_account;
pub use delete_endpoint::delete_account_endpoint;
pub use get_endpoint::get_account_endpoint;
pub use list_endpoint::list_accounts_endpoint;
pub use reveal_endpoint::reveal_account_field_endpoint;
