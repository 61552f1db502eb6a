//! The codec used to encrypt sensitive account fields (card number, expiry
//! date, CVV, bank account number) before they are written to the database.
//!
//! Ciphertext is only ever turned back into plaintext by the reveal endpoint
//! ([crate::account::reveal_account_field_endpoint]); every other code path
//! treats the stored value as opaque.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use chacha20poly1305::{
    ChaCha20Poly1305, Key, Nonce,
    aead::{Aead, AeadCore, KeyInit, OsRng},
};
use sha2::{Digest, Sha256};

use crate::Error;

/// The length of the nonce prepended to each ciphertext.
const NONCE_LENGTH: usize = 12;

/// Encrypts and decrypts sensitive string fields with ChaCha20-Poly1305.
///
/// The cipher key is derived from a secret string, so ciphertext written with
/// one secret cannot be read back with another.
#[derive(Clone)]
pub struct FieldCodec {
    key: Key,
}

impl FieldCodec {
    /// Create a codec with a key derived from `secret`.
    pub fn new(secret: &str) -> Self {
        let hash = Sha256::digest(secret.as_bytes());

        Self {
            key: *Key::from_slice(&hash),
        }
    }

    /// Encrypt `plaintext`, returning base64 text safe to store in the
    /// database.
    ///
    /// A random nonce is generated per call and prepended to the ciphertext,
    /// so encrypting the same plaintext twice produces different strings.
    ///
    /// # Errors
    ///
    /// Returns [Error::Encryption] if the underlying cipher fails.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, Error> {
        let cipher = ChaCha20Poly1305::new(&self.key);
        let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| Error::Encryption)?;

        let mut buffer = nonce.to_vec();
        buffer.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(buffer))
    }

    /// Decrypt a string previously produced by [FieldCodec::encrypt].
    ///
    /// # Errors
    ///
    /// Returns [Error::Decryption] if `value` is not valid base64, is too
    /// short to contain a nonce, fails authentication (e.g. it was encrypted
    /// with a different secret), or does not decode to UTF-8 text.
    pub fn decrypt(&self, value: &str) -> Result<String, Error> {
        let bytes = BASE64.decode(value).map_err(|_| Error::Decryption)?;

        if bytes.len() < NONCE_LENGTH {
            return Err(Error::Decryption);
        }

        let (nonce, ciphertext) = bytes.split_at(NONCE_LENGTH);
        let cipher = ChaCha20Poly1305::new(&self.key);
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| Error::Decryption)?;

        String::from_utf8(plaintext).map_err(|_| Error::Decryption)
    }
}
