//! The state shared between route handlers.

use std::sync::{Arc, Mutex};

use jsonwebtoken::{DecodingKey, EncodingKey};
use rusqlite::Connection;

use crate::{Error, crypto::FieldCodec, db, report::Mailer};

/// The state shared between route handlers: the database connection, the
/// JWT keys, the field codec for sensitive account fields and the mailer
/// used to deliver reports.
#[derive(Clone)]
pub struct AppState {
    /// The connection to the application database.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The key used to sign auth tokens.
    pub jwt_encoding_key: EncodingKey,
    /// The key used to verify auth tokens.
    pub jwt_decoding_key: DecodingKey,
    /// Encrypts and decrypts sensitive account fields.
    pub field_codec: FieldCodec,
    /// Delivers report emails.
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Create the application state, initialising the database tables on
    /// `connection` if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database could not be initialised.
    pub fn new(
        connection: Connection,
        jwt_secret: &str,
        field_secret: &str,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, Error> {
        db::initialize(&connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(connection)),
            jwt_encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            jwt_decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            field_codec: FieldCodec::new(field_secret),
            mailer,
        })
    }
}
