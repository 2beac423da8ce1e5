//! SQLite record store.
//!
//! One `dataset` table keyed by file basename; the connection runs in WAL mode.

use std::path::Path;

use log::debug;
use rusqlite::{params, params_from_iter, Connection, Row};
use stxmdb_core::{DatasetRecord, Query, RecordStore};

use crate::filter::where_clause;
use crate::{Error, Result};

const COLUMNS: &str = "name, directory, file_path, image_payload, scan_type, start_time, \
                       end_time, x_range, y_range, x_resolution, y_resolution, energy_min, \
                       energy_max";

/// SQLite-backed [`RecordStore`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a store file.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.configure_pragmas()?;
        store.init_schema()?;
        Ok(store)
    }

    /// Opens a private in-memory store.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.configure_pragmas()?;
        store.init_schema()?;
        Ok(store)
    }

    fn configure_pragmas(&self) -> Result<()> {
        self.conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        debug!("SQLite pragmas configured (WAL mode)");
        Ok(())
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Names of all records matching `query`, without loading image payloads.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn query_names(&self, query: &Query) -> Result<Vec<String>> {
        let (clause, values) = where_clause(query);
        let sql = format!("SELECT name FROM dataset WHERE {clause} ORDER BY name");
        let mut stmt = self.conn.prepare(&sql)?;
        let names = stmt
            .query_map(params_from_iter(values.iter()), |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<DatasetRecord> {
    Ok(DatasetRecord {
        name: row.get(0)?,
        directory: row.get(1)?,
        file_path: row.get(2)?,
        image_payload: row.get(3)?,
        scan_type: row.get(4)?,
        start_time: row.get(5)?,
        end_time: row.get(6)?,
        x_range: row.get(7)?,
        y_range: row.get(8)?,
        x_resolution: row.get(9)?,
        y_resolution: row.get(10)?,
        energy_min: row.get(11)?,
        energy_max: row.get(12)?,
    })
}

impl RecordStore for SqliteStore {
    type Error = Error;

    fn clear(&mut self) -> Result<()> {
        let removed = self.conn.execute("DELETE FROM dataset", [])?;
        debug!("cleared {removed} record(s)");
        Ok(())
    }

    fn insert(&mut self, record: DatasetRecord) -> Result<()> {
        let sql = format!(
            "INSERT OR REPLACE INTO dataset ({COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        stmt.execute(params![
            record.name,
            record.directory,
            record.file_path,
            record.image_payload,
            record.scan_type,
            record.start_time,
            record.end_time,
            record.x_range,
            record.y_range,
            record.x_resolution,
            record.y_resolution,
            record.energy_min,
            record.energy_max,
        ])?;
        Ok(())
    }

    fn query(&self, query: &Query) -> Result<Vec<DatasetRecord>> {
        let (clause, values) = where_clause(query);
        let sql = format!("SELECT {COLUMNS} FROM dataset WHERE {clause} ORDER BY name");
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(params_from_iter(values.iter()), record_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    fn get(&self, name: &str) -> Result<Option<DatasetRecord>> {
        let sql = format!("SELECT {COLUMNS} FROM dataset WHERE name = ?1");
        match self.conn.query_row(&sql, params![name], record_from_row) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM dataset", [], |row| row.get(0))?;
        usize::try_from(count).map_err(|e| Error::CorruptRecord {
            name: "COUNT(*)".to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stxmdb_core::{build_filter_query_at, FilterRequest};
    use tempfile::TempDir;

    fn record(name: &str) -> DatasetRecord {
        DatasetRecord {
            name: name.to_string(),
            directory: "/beamtime".to_string(),
            file_path: format!("/beamtime/{name}"),
            image_payload: vec![1, 2, 3, 4],
            scan_type: "sample image".to_string(),
            start_time: 202_103_041_015,
            end_time: 202_103_041_102,
            x_range: 50,
            y_range: 40,
            x_resolution: 100,
            y_resolution: 80,
            energy_min: 700,
            energy_max: 710,
        }
    }

    #[test]
    fn test_insert_get_roundtrip() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.insert(record("a.hdf5")).unwrap();

        assert_eq!(store.get("a.hdf5").unwrap(), Some(record("a.hdf5")));
        assert_eq!(store.get("missing.hdf5").unwrap(), None);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_insert_same_name_replaces() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.insert(record("a.hdf5")).unwrap();
        let mut newer = record("a.hdf5");
        newer.scan_type = "osa focus".to_string();
        store.insert(newer).unwrap();

        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.get("a.hdf5").unwrap().unwrap().scan_type, "osa focus");
    }

    #[test]
    fn test_clear() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.insert(record("a.hdf5")).unwrap();
        store.insert(record("b.hdf5")).unwrap();
        store.clear().unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_query_names_sorted() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.insert(record("c.hdf5")).unwrap();
        store.insert(record("a.hdf5")).unwrap();

        let query = build_filter_query_at(&FilterRequest::new(), 202_610_181_200).unwrap();
        assert_eq!(store.query_names(&query).unwrap(), vec!["a.hdf5", "c.hdf5"]);
    }

    #[test]
    fn test_file_store_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.sqlite");
        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.insert(record("a.hdf5")).unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get("a.hdf5").unwrap(), Some(record("a.hdf5")));
    }
}
