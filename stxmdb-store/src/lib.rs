//! stxmdb-store: SQLite persistence for STXM dataset records.
//!
//! [`SqliteStore`] implements [`stxmdb_core::RecordStore`] over a single
//! `dataset` table keyed by file basename. Filter queries from
//! [`stxmdb_core::build_filter_query`] are translated into one parameterized
//! `WHERE` clause.
//!

mod error;
mod filter;
pub mod sqlite;

pub use error::{Error, Result};
pub use sqlite::SqliteStore;
