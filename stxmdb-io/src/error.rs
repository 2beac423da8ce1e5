//! I/O error types.

use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HDF5 library error.
    #[cfg(feature = "hdf5")]
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),

    /// Invalid file layout or configuration.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Record store failure that aborts a scan.
    #[error("storage error: {0}")]
    Storage(String),

    /// The background index thread panicked before finishing.
    #[error("index worker panicked")]
    WorkerPanicked,

    /// Core library error.
    #[error("core error: {0}")]
    CoreError(#[from] stxmdb_core::Error),
}
