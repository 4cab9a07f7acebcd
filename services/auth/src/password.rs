//! Password hashing with argon2

use std::sync::LazyLock;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};

use crate::error::{AuthError, AuthResult};

/// Hash a clear-text password into a PHC string
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::PasswordHash(format!("Failed to hash password: {}", e)))?
        .to_string();

    Ok(hash)
}

/// Check a clear-text password against a stored PHC string
pub fn verify_password(password_hash: &str, password: &str) -> AuthResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AuthError::PasswordHash(format!("Failed to parse password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Verify `password` against a throwaway hash and discard the outcome
///
/// Lets a lookup miss cost as much as a wrong password.
pub fn verify_dummy(password: &str) {
    static DUMMY_HASH: LazyLock<Option<String>> =
        LazyLock::new(|| hash_password("photofolio-unused-account").ok());

    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(hash, password);
    }
}
