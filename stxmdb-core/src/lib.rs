//! stxmdb-core: Dataset records and filter queries for STXM data indexing.
//!
//! This crate holds everything that does not touch the filesystem: the
//! record schema, normalization of raw acquisition fields, the serialized
//! image payload, the filter-query builder, and the record store trait.
//!

pub mod axis;
pub mod error;
pub mod payload;
pub mod query;
pub mod record;
pub mod scan_type;
pub mod store;
pub mod timestamp;

pub use axis::{AxisSummary, EnergyBounds};
pub use error::{Error, ExtractionError, RangeError, Result};
pub use payload::ImagePayload;
pub use query::{
    build_filter_query, build_filter_query_at, Condition, Field, FilterRequest, Query,
    DEFAULT_ENERGY_MAX, WILDCARD_LIMIT,
};
pub use record::{DatasetRecord, RawDataset};
pub use scan_type::{is_known_scan_type, KNOWN_SCAN_TYPES};
pub use store::{MemoryStore, RecordStore};
pub use timestamp::{compact_timestamp, parse_compact_timestamp, EARLIEST_TIMESTAMP};
