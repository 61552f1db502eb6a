//! This file defines the `PasswordHash` type which wraps a salted and hashed
//! password.

use std::fmt::Display;

use bcrypt::{hash, verify};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The minimum number of characters a password must have at sign up.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash a plaintext password with the specified `cost`.
    ///
    /// `cost` increases the rounds of hashing and therefore the time needed to
    /// verify a password. Pass in [PasswordHash::DEFAULT_COST] to use the
    /// recommended cost.
    ///
    /// # Errors
    ///
    /// Returns [Error::PasswordTooShort] if the password has fewer than
    /// [MIN_PASSWORD_LENGTH] characters, or [Error::HashingError] if the
    /// password could not be hashed.
    pub fn new(raw_password: &str, cost: u32) -> Result<Self, Error> {
        if raw_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(Error::PasswordTooShort(MIN_PASSWORD_LENGTH));
        }

        match hash(raw_password, cost) {
            Ok(password_hash) => Ok(Self(password_hash)),
            Err(error) => Err(Error::HashingError(error.to_string())),
        }
    }

    /// Create a new `PasswordHash` from a string that is already a bcrypt
    /// hash, e.g. one read back from the database.
    pub fn new_unchecked(hash_string: &str) -> Self {
        Self(hash_string.to_string())
    }

    /// Check whether `raw_password` matches this password hash.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if the stored hash could not be parsed.
    pub fn verify(&self, raw_password: &str) -> Result<bool, Error> {
        verify(raw_password, &self.0).map_err(|error| Error::HashingError(error.to_string()))
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", str::repeat("*", 8))
    }
}

#[cfg(test)]
mod password_tests {
    use crate::Error;

    use super::{MIN_PASSWORD_LENGTH, PasswordHash};

    // Use the minimum cost in tests to keep them fast.
    const TEST_COST: u32 = 4;

    #[test]
    fn hash_password_validates_length() {
        let result = PasswordHash::new("hunter2", TEST_COST);

        assert_eq!(result, Err(Error::PasswordTooShort(MIN_PASSWORD_LENGTH)));
    }

    #[test]
    fn verify_accepts_correct_password() {
        let password = "averysafeandsecurepassword";
        let hash = PasswordHash::new(password, TEST_COST).unwrap();

        assert!(hash.verify(password).unwrap());
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = PasswordHash::new("averysafeandsecurepassword", TEST_COST).unwrap();

        assert!(!hash.verify("definitelynotthepassword").unwrap());
    }

    #[test]
    fn display_hides_hash() {
        let hash = PasswordHash::new_unchecked("$2b$12$abcdefghijklmnopqrstuv");

        assert_eq!(hash.to_string(), "********");
    }
}
