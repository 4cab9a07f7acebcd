//! Custom error types for the common library
//!
//! This module defines the error types raised by the SQL client adapter and
//! the database bootstrap helpers.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred while acquiring a connection from the pool
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred while beginning, committing or rolling back a transaction
    #[error("Database transaction error: {0}")]
    Transaction(#[source] SqlxError),

    /// A statement expected to return a row returned none
    #[error("Database query returned no rows")]
    RowNotFound,

    /// A row could not be decoded into the requested shape
    #[error("Database decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Whether the underlying failure is a unique constraint violation
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DatabaseError::Query(SqlxError::Database(db)) => db.is_unique_violation(),
            _ => false,
        }
    }

    /// Whether the underlying failure is a foreign key violation
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            DatabaseError::Query(SqlxError::Database(db)) => db.is_foreign_key_violation(),
            _ => false,
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
