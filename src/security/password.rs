//! Password hashing and verification using Argon2id.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::error::GatewayError;

/// Hashes a plaintext password into a PHC-format string safe for storage.
///
/// A random 16-byte salt is generated per password.
///
/// # Errors
///
/// Returns [`GatewayError::Internal`] if the hashing operation fails.
pub fn hash_password(password: &str) -> Result<String, GatewayError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| GatewayError::Internal(format!("password hashing failed: {e}")))
}

/// Verifies a plaintext password against a stored PHC-format hash.
///
/// # Errors
///
/// Returns [`GatewayError::Internal`] if the stored hash cannot be parsed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, GatewayError> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| GatewayError::Internal(format!("invalid password hash format: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(GatewayError::Internal(format!(
            "password verification failed: {e}"
        ))),
    }
}
