//! Directory indexing.
//!
//! An index run replaces the whole record set: the store is cleared, every
//! candidate file under the root is extracted and inserted, and progress is
//! reported after each candidate. A file that fails extraction or insertion
//! is logged and skipped; the run always continues to the last candidate.
#![allow(clippy::cast_possible_truncation)]

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use stxmdb_core::{DatasetRecord, RawDataset, RecordStore};

use crate::config::IndexerConfig;
use crate::discovery::find_candidates;
use crate::{Error, Result};

/// Reads the raw fields of one candidate file.
///
/// Implementations must release any file handle before returning, on both
/// success and failure.
pub trait DatasetExtractor {
    /// Extract the raw dataset stored at `path`.
    ///
    /// # Errors
    /// Returns an error if any required field is missing or unreadable.
    fn extract(&self, path: &Path) -> Result<RawDataset>;
}

/// Receives completion percentages in `0..=100`.
pub trait ProgressSink {
    fn report(&mut self, percent: u8);
}

impl<F: FnMut(u8)> ProgressSink for F {
    fn report(&mut self, percent: u8) {
        self(percent);
    }
}

/// Completion percentage after `ordinal` of `total` candidates, rounded down.
#[must_use]
pub fn progress_percent(ordinal: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (ordinal.min(total) * 100 / total) as u8
}

/// Why a candidate did not make it into the index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// A required field could not be read or normalized.
    Extraction(String),
    /// The record was extracted but the store rejected it.
    Storage(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Extraction(msg) => write!(f, "extraction failed: {msg}"),
            SkipReason::Storage(msg) => write!(f, "insert failed: {msg}"),
        }
    }
}

/// A candidate that was left out of the index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Outcome of one index run.
#[derive(Clone, Debug)]
pub struct IndexSummary {
    pub root: PathBuf,
    /// Number of candidate files found.
    pub candidates: usize,
    /// Number of records inserted.
    pub indexed: usize,
    pub skipped: Vec<SkippedFile>,
    pub elapsed: Duration,
}

/// Scans directories and fills a [`RecordStore`].
pub struct Indexer<E> {
    extractor: E,
    suffix: String,
}

impl<E: DatasetExtractor> Indexer<E> {
    /// Create an indexer matching the default `.hdf5` suffix.
    pub fn new(extractor: E) -> Self {
        Self {
            extractor,
            suffix: IndexerConfig::default().suffix,
        }
    }

    /// Match candidate files by a different suffix.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Candidate file name suffix.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Rebuilds the record set from every candidate file under `root`.
    ///
    /// Progress is reported once per candidate and reaches exactly 100; a
    /// root without candidates reports 100 once and leaves the store empty.
    ///
    /// # Errors
    /// Returns [`stxmdb_core::Error::MissingInput`] for an empty root path
    /// (the store is left untouched) and [`Error::Storage`] if the store
    /// cannot be cleared. Per-file failures are not errors; they are listed
    /// in [`IndexSummary::skipped`].
    pub fn index_directory<S, P>(
        &self,
        root: &Path,
        store: &mut S,
        progress: &mut P,
    ) -> Result<IndexSummary>
    where
        S: RecordStore + ?Sized,
        P: ProgressSink + ?Sized,
    {
        if root.as_os_str().is_empty() {
            return Err(stxmdb_core::Error::MissingInput.into());
        }

        let start = Instant::now();
        store.clear().map_err(|e| Error::Storage(e.to_string()))?;

        let candidates = find_candidates(root, &self.suffix);
        let total = candidates.len();
        let directory = root.to_string_lossy().into_owned();
        debug!("found {total} candidate file(s) under {directory}");

        let mut indexed = 0usize;
        let mut skipped = Vec::new();

        if total == 0 {
            progress.report(100);
        }

        for (i, path) in candidates.into_iter().enumerate() {
            match self.extract_record(&path, &directory) {
                Ok(record) => match store.insert(record) {
                    Ok(()) => indexed += 1,
                    Err(e) => {
                        warn!("could not store {}: {e}", path.display());
                        skipped.push(SkippedFile {
                            path,
                            reason: SkipReason::Storage(e.to_string()),
                        });
                    }
                },
                Err(e) => {
                    warn!("skipping {}: {e}", path.display());
                    skipped.push(SkippedFile {
                        path,
                        reason: SkipReason::Extraction(e.to_string()),
                    });
                }
            }

            progress.report(progress_percent(i + 1, total));
        }

        let summary = IndexSummary {
            root: root.to_path_buf(),
            candidates: total,
            indexed,
            skipped,
            elapsed: start.elapsed(),
        };
        info!(
            "indexed {} of {} file(s) under {} in {:.2?}",
            summary.indexed,
            summary.candidates,
            directory,
            summary.elapsed
        );
        Ok(summary)
    }

    fn extract_record(&self, path: &Path, directory: &str) -> Result<DatasetRecord> {
        debug!("extracting {}", path.display());
        let raw = self.extractor.extract(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let record = DatasetRecord::from_raw(name, directory, path.to_string_lossy(), raw)
            .map_err(stxmdb_core::Error::from)?;
        Ok(record)
    }
}
