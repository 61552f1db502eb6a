//! The server's command line and environment configuration.

use std::net::SocketAddr;

use clap::Parser;

/// The configuration for the server.
///
/// Secrets can be passed as environment variables instead of command line
/// arguments so they do not end up in the shell history.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// File path to the application SQLite database.
    #[arg(long)]
    pub db_path: String,

    /// The socket address to serve the API from.
    #[arg(long, default_value = "127.0.0.1:3000")]
    pub address: SocketAddr,

    /// The secret used to sign auth tokens.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// The secret used to encrypt sensitive account fields.
    #[arg(long, env = "FIELD_SECRET", hide_env_values = true)]
    pub field_secret: String,

    /// The SMTP relay that report emails are sent through.
    #[arg(long, env = "SMTP_RELAY")]
    pub smtp_relay: String,

    /// The username to authenticate against the SMTP relay with.
    #[arg(long, env = "SMTP_USERNAME")]
    pub smtp_username: String,

    /// The password to authenticate against the SMTP relay with.
    #[arg(long, env = "SMTP_PASSWORD", hide_env_values = true)]
    pub smtp_password: String,

    /// The sender address for report emails.
    #[arg(long, env = "SMTP_FROM")]
    pub smtp_from: String,
}
