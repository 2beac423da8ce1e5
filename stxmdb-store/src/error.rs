//! Store error types.

use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Store error types.
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored value does not fit the record schema.
    #[error("corrupt record `{name}`: {reason}")]
    CorruptRecord { name: String, reason: String },
}
