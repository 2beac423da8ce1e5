//! stxmdb-io: Directory scanning and indexing for STXM datasets.
//!
//! This crate finds candidate files under a root directory, reads each one
//! through a [`DatasetExtractor`] (the HDF5 STXM adapter behind the `hdf5`
//! feature), and rebuilds a [`stxmdb_core::RecordStore`] from the results,
//! either inline or on a worker thread.
//!

pub mod config;
pub mod discovery;
mod error;
#[cfg(feature = "hdf5")]
pub mod hdf5;
pub mod indexer;
pub mod job;

pub use config::{IndexerConfig, StxmLayout};
pub use discovery::find_candidates;
pub use error::{Error, Result};
#[cfg(feature = "hdf5")]
pub use crate::hdf5::{index_directory, Hdf5Extractor};
pub use indexer::{
    progress_percent, DatasetExtractor, IndexSummary, Indexer, ProgressSink, SkipReason,
    SkippedFile,
};
pub use job::{spawn_index_job, IndexEvent, IndexJob};
