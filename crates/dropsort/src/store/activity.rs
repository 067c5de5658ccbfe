//! Append-only, size-bounded history of organize and duplicate actions.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::debug;

use crate::error::StorageError;
use crate::store::record::FileRecord;
use crate::store::snapshot;

/// Activity log persisted as one JSON array, oldest record first.
///
/// Appends run load-modify-truncate-save inside a mutex. Reads take a
/// snapshot of the file without locking and may be slightly stale.
#[derive(Debug)]
pub struct ActivityLog {
    path: PathBuf,
    retention: usize,
    write_lock: Mutex<()>,
}

impl ActivityLog {
    pub fn new<P: AsRef<Path>>(path: P, retention: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            retention: retention.max(1),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    /// Appends `record` and drops the oldest entries beyond the retention cap.
    ///
    /// The stored timestamp is clamped so times never decrease in append
    /// order. Returns the record as stored.
    pub fn append(&self, mut record: FileRecord) -> Result<FileRecord, StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::LockPoisoned("activity log"))?;

        let mut records: Vec<FileRecord> = snapshot::load_or_default(&self.path);

        if let Some(last) = records.last() {
            if record.time < last.time {
                debug!(
                    "Clock went backwards for {}, clamping record time",
                    record.original_file
                );
                record.time = last.time;
            }
        }

        records.push(record.clone());

        if records.len() > self.retention {
            let excess = records.len() - self.retention;
            records.drain(..excess);
        }

        snapshot::save(&self.path, &records)?;
        Ok(record)
    }

    /// All retained records, oldest first.
    pub fn all(&self) -> Vec<FileRecord> {
        let mut records: Vec<FileRecord> = snapshot::load_or_default(&self.path);
        // A hand-edited store may exceed the cap until the next append
        if records.len() > self.retention {
            let excess = records.len() - self.retention;
            records.drain(..excess);
        }
        records
    }

    /// The newest `n` records, newest first.
    pub fn load_recent(&self, n: usize) -> Vec<FileRecord> {
        self.all().into_iter().rev().take(n).collect()
    }
}
