//! Error taxonomy for the rating engine.
//!
//! Validation problems carry enough context (row, column) to fix the source
//! file. Store consistency errors are short and recoverable by a refresh.
//! Transport failures always suggest a retry. Invariant violations are
//! programmer errors and abort the operation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input: CSV header/value problems, empty files, lens mismatch.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("submission {0} already exists")]
    DuplicateSubmission(String),

    #[error("submission {0} not found")]
    NotFound(String),

    /// The remote call failed or answered `success: false`.
    #[error("request failed, please retry ({0})")]
    Transport(String),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
