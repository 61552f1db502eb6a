//! Code for creating the user table and fetching users from the database.

use std::fmt::Display;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash, database_id::DatabaseId};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better
/// compile time errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserId(DatabaseId);

impl UserId {
    /// Create a new user ID.
    pub const fn new(id: DatabaseId) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
///
/// Every account and transaction belongs to exactly one user.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The name the user signed up with.
    pub name: String,
    /// The user's email address, unique across users.
    pub email: String,
    /// A URL to the user's avatar image, if they set one at sign up.
    pub avatar: Option<String>,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                avatar TEXT,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns [Error::DuplicateEmail] if a user with `email` already exists, or
/// [Error::SqlError] if another SQL related error occurred.
pub fn create_user(
    name: &str,
    email: &str,
    avatar: Option<&str>,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection
        .execute(
            "INSERT INTO user (name, email, avatar, password) VALUES (?1, ?2, ?3, ?4)",
            (name, email, avatar, password_hash.as_ref()),
        )
        .map_err(|error| match Error::from(error) {
            Error::DuplicateEmail(_) => Error::DuplicateEmail(email.to_owned()),
            error => error,
        })?;

    let id = UserId::new(connection.last_insert_rowid());

    Ok(User {
        id,
        name: name.to_owned(),
        email: email.to_owned(),
        avatar: avatar.map(str::to_owned),
        password_hash,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if `user_id` does not belong to a registered
/// user, or [Error::SqlError] if there was an error trying to access the
/// store.
pub fn get_user_by_id(user_id: UserId, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, name, email, avatar, password FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], map_row_to_user)
        .map_err(|error| error.into())
}

/// Get the user from the database with an email equal to `email`.
///
/// # Errors
///
/// Returns [Error::NotFound] if `email` does not belong to a registered user,
/// or [Error::SqlError] if there was an error trying to access the store.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, name, email, avatar, password FROM user WHERE email = :email")?
        .query_row(&[(":email", &email)], map_row_to_user)
        .map_err(|error| error.into())
}

fn map_row_to_user(row: &rusqlite::Row) -> Result<User, rusqlite::Error> {
    let raw_id = row.get(0)?;
    let name = row.get(1)?;
    let email = row.get(2)?;
    let avatar = row.get(3)?;
    let raw_password_hash: String = row.get(4)?;

    Ok(User {
        id: UserId::new(raw_id),
        name,
        email,
        avatar,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}
