//! Record store abstraction.

use std::convert::Infallible;

use crate::query::Query;
use crate::record::DatasetRecord;

/// Storage backend for dataset records.
///
/// Records are keyed by `name`; inserting a record whose name already exists
/// replaces the earlier one.
pub trait RecordStore {
    /// Backend error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Deletes every record.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Inserts one record, replacing any record with the same name.
    fn insert(&mut self, record: DatasetRecord) -> Result<(), Self::Error>;

    /// Returns all records matching `query`.
    fn query(&self, query: &Query) -> Result<Vec<DatasetRecord>, Self::Error>;

    /// Looks up one record by name.
    fn get(&self, name: &str) -> Result<Option<DatasetRecord>, Self::Error>;

    /// Number of stored records.
    fn len(&self) -> Result<usize, Self::Error>;

    /// True if no records are stored.
    fn is_empty(&self) -> Result<bool, Self::Error> {
        Ok(self.len()? == 0)
    }
}

/// In-memory store, kept in insertion order.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: Vec<DatasetRecord>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[DatasetRecord] {
        &self.records
    }
}

impl RecordStore for MemoryStore {
    type Error = Infallible;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.records.clear();
        Ok(())
    }

    fn insert(&mut self, record: DatasetRecord) -> Result<(), Self::Error> {
        match self.records.iter_mut().find(|r| r.name == record.name) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
        Ok(())
    }

    fn query(&self, query: &Query) -> Result<Vec<DatasetRecord>, Self::Error> {
        Ok(self
            .records
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect())
    }

    fn get(&self, name: &str) -> Result<Option<DatasetRecord>, Self::Error> {
        Ok(self.records.iter().find(|r| r.name == name).cloned())
    }

    fn len(&self) -> Result<usize, Self::Error> {
        Ok(self.records.len())
    }
}
