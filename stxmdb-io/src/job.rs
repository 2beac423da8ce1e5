//! Background index runs.
//!
//! The store is moved into the worker thread for the length of the run and
//! handed back by [`IndexJob::wait`], so a second scan against the same store
//! cannot start while one is in flight.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use stxmdb_core::RecordStore;

use crate::indexer::{DatasetExtractor, IndexSummary, Indexer};
use crate::{Error, Result};

/// Messages sent from the index worker to the caller.
#[derive(Debug)]
pub enum IndexEvent {
    /// Completion percentage, non-decreasing.
    Progress(u8),
    /// Sent once when the run ends; carries the error text on failure.
    Finished(std::result::Result<IndexSummary, String>),
}

/// Handle to an index run on a worker thread.
pub struct IndexJob<S> {
    events: Receiver<IndexEvent>,
    handle: JoinHandle<(S, Result<IndexSummary>)>,
}

impl<S> IndexJob<S> {
    /// Next event without blocking, for callers polling from a UI loop.
    ///
    /// Returns `None` when no event is waiting or the worker has finished
    /// and every event has been drained.
    pub fn try_next(&self) -> Option<IndexEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Blocking iterator over remaining events; ends after `Finished`.
    pub fn events(&self) -> impl Iterator<Item = IndexEvent> + '_ {
        self.events.iter()
    }

    /// Waits for the worker and returns the store with the run outcome.
    ///
    /// # Errors
    /// Returns an error if the worker thread panicked; the store is lost in
    /// that case.
    pub fn wait(self) -> Result<(S, Result<IndexSummary>)> {
        self.handle.join().map_err(|_| Error::WorkerPanicked)
    }
}

/// Starts indexing `root` into `store` on a new thread.
pub fn spawn_index_job<E, S>(indexer: Indexer<E>, root: PathBuf, mut store: S) -> IndexJob<S>
where
    E: DatasetExtractor + Send + 'static,
    S: RecordStore + Send + 'static,
{
    let (tx, rx) = channel();

    let handle = thread::spawn(move || {
        let progress_tx = tx.clone();
        let mut report = move |percent: u8| {
            let _ = progress_tx.send(IndexEvent::Progress(percent));
        };

        let outcome = indexer.index_directory(&root, &mut store, &mut report);

        let message = match &outcome {
            Ok(summary) => Ok(summary.clone()),
            Err(e) => Err(e.to_string()),
        };
        let _ = tx.send(IndexEvent::Finished(message));
        (store, outcome)
    });

    IndexJob {
        events: rx,
        handle,
    }
}
