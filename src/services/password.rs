//! # Password Hashing
//!
//! Argon2id hashing for stored credentials. Hashes are PHC strings with a
//! random per-password salt; the plaintext never reaches the database.

use argon2::{
    Argon2,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use thiserror::Error;

/// Errors that can occur while hashing or verifying passwords
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(PasswordHashError),
    #[error("Stored hash has invalid format")]
    InvalidHash,
}

/// Hashes a plaintext password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(PasswordError::Hash)?;
    Ok(hash.to_string())
}

/// Verifies a plaintext password against a stored PHC hash string.
///
/// Returns `Ok(false)` on a mismatch; other failures (e.g. a corrupt hash)
/// are surfaced as errors so callers do not silently treat them as bad
/// credentials from the user's side.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| PasswordError::InvalidHash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(e) => Err(PasswordError::Hash(e)),
    }
}
