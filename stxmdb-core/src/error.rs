//! Error types for stxmdb-core.

use thiserror::Error;

/// Result type alias for stxmdb operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for stxmdb operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A required field could not be read or normalized from a dataset.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Filter request rejected before a query was built.
    #[error("invalid filter: {0}")]
    Range(#[from] RangeError),

    /// Image payload could not be encoded or decoded.
    #[error("payload error: {0}")]
    Payload(String),

    /// No root directory was supplied to the indexer.
    #[error("no root directory given")]
    MissingInput,
}

/// Per-file extraction failures.
///
/// Any of these drops a single candidate file from the index; none of them
/// aborts a scan.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// A required dataset or group is missing from the file.
    #[error("missing field `{0}`")]
    MissingField(String),

    /// A field exists but has an unusable type or shape.
    #[error("unreadable field `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    /// Time text does not follow the `YYYY-MM-DD?HH:MM` layout.
    #[error("malformed {field} timestamp: {value:?}")]
    MalformedTimestamp { field: &'static str, value: String },

    /// Coordinate sample array has no elements.
    #[error("{axis} axis has no samples")]
    EmptyAxis { axis: &'static str },

    /// Energy sample array has no elements.
    #[error("energy list is empty")]
    EmptyEnergy,

    /// A coordinate or energy sample is NaN or infinite.
    #[error("non-finite {field} sample")]
    NonFiniteSample { field: &'static str },

    /// Image array could not be serialized.
    #[error("image payload: {0}")]
    Payload(String),
}

/// Energy filter bounds are inverted.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("energy minimum {min} is greater than energy maximum {max}")]
pub struct RangeError {
    pub min: i64,
    pub max: i64,
}
