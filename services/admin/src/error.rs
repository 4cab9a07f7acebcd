//! Error types for the admin client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure or undecodable response
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Session storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt session file: {0}")]
    Session(#[from] serde_json::Error),

    #[error("Cannot locate home directory")]
    NoHomeDirectory,
}

pub type ClientResult<T> = Result<T, ClientError>;
