//! Error types for the authentication service

use common::error::DatabaseError;
use thiserror::Error;

/// Custom error type for authentication operations
#[derive(Error, Debug)]
pub enum AuthError {
    /// Failure in the underlying store
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Password could not be hashed or the stored hash is malformed
    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// Token could not be issued or verified
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Role name outside of the known set
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with AuthError
pub type AuthResult<T> = Result<T, AuthError>;
