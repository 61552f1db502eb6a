//! TrackIt is a web app for tracking personal finances across multiple
//! monetary accounts (cash, bank, wallet, credit card).
//!
//! This library provides a JSON REST API for managing accounts and
//! transactions, revealing encrypted card/bank details, and emailing
//! spreadsheet reports.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod account;
mod app_state;
mod auth;
mod config;
mod crypto;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod password;
mod report;
mod routing;
mod sign_up;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use config::Config;
pub use crypto::FieldCodec;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use password::PasswordHash;
pub use report::{Mailer, ReportAttachment, ReportEmail, SmtpMailer};
pub use routing::build_router;
pub use user::{User, UserId, get_user_by_id};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an email/password pair that does not match a
    /// registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The request is missing a bearer token, or the token is invalid or
    /// expired.
    #[error("missing or invalid auth token")]
    Unauthorized,

    /// An unexpected error occurred while creating an auth token.
    #[error("could not create auth token")]
    TokenCreation,

    /// The requested resource was not found.
    ///
    /// This error is also returned when the resource exists but belongs to a
    /// different user, so that clients cannot probe for other users' data.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The email address used to sign up already belongs to a registered user.
    #[error("a user with the email \"{0}\" already exists")]
    DuplicateEmail(String),

    /// The string used to sign up could not be parsed as an email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// The password used to sign up is too short.
    #[error("passwords must be at least {0} characters long")]
    PasswordTooShort(usize),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A transaction was given a zero, negative or non-finite amount.
    #[error("transaction amounts must be positive, got {0}")]
    NonPositiveAmount(f64),

    /// A transfer transaction named the same account as both source and
    /// target.
    #[error("cannot transfer from an account to itself")]
    SameAccountTransfer,

    /// A transfer transaction did not name a target account.
    #[error("transfer transactions must specify a transfer account")]
    MissingTransferAccount,

    /// An income or expense transaction named a transfer target account.
    #[error("only transfer transactions may specify a transfer account")]
    UnexpectedTransferAccount,

    /// A reveal request named a field that is not one of the whitelisted
    /// sensitive account fields.
    #[error("\"{0}\" is not a sensitive account field")]
    InvalidField(String),

    /// A report was requested with an end date earlier than the start date.
    #[error("the report end date must not be earlier than the start date")]
    InvalidDateRange,

    /// A sensitive field could not be encrypted.
    #[error("could not encrypt field")]
    Encryption,

    /// A sensitive field could not be decrypted, e.g. because the stored
    /// ciphertext is malformed or was produced with a different key.
    #[error("could not decrypt field")]
    Decryption,

    /// A report was built but could not be emailed to the recipient.
    #[error("could not deliver report: {0}")]
    Delivery(String),

    /// An error occurred while encoding a report sheet.
    #[error("could not encode report sheet: {0}")]
    SheetEncoding(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("email") =>
            {
                Error::DuplicateEmail(String::new())
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Error::InvalidCredentials | Error::Unauthorized => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            Error::DuplicateEmail(_)
            | Error::InvalidEmail(_)
            | Error::PasswordTooShort(_)
            | Error::NonPositiveAmount(_)
            | Error::SameAccountTransfer
            | Error::MissingTransferAccount
            | Error::UnexpectedTransferAccount
            | Error::InvalidField(_)
            | Error::InvalidDateRange => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::Delivery(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
