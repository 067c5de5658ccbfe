//! Persisted digest -> destination mapping used to detect duplicate content.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use log::debug;

use crate::error::StorageError;
use crate::store::snapshot;

type DigestMap = BTreeMap<String, String>;

/// Outcome of [`DedupIndex::claim`].
#[derive(Debug)]
pub enum DedupDecision<'a> {
    /// First time this content is seen. The claim must be committed with
    /// [`DigestClaim::commit`]; dropping it releases the digest again.
    New(DigestClaim<'a>),
    /// Content already organized. `original` is the recorded destination, or
    /// `None` when another task is organizing the same content right now.
    Duplicate { original: Option<String> },
}

/// Deduplication index, persisted as one JSON object under the organized root.
///
/// All mutations run a full load-modify-save cycle inside one mutex, which
/// also guards the set of digests currently being organized.
#[derive(Debug)]
pub struct DedupIndex {
    path: PathBuf,
    in_flight: Mutex<HashSet<String>>,
}

impl DedupIndex {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the destination recorded for `digest`, if any.
    pub fn lookup(&self, digest: &str) -> Option<String> {
        let map: DigestMap = snapshot::load_or_default(&self.path);
        map.get(digest).cloned()
    }

    /// Records `digest -> destination`. Last write wins.
    pub fn record(&self, digest: &str, destination: &Path) -> Result<(), StorageError> {
        let mut in_flight = self.lock()?;
        self.record_locked(digest, destination)?;
        in_flight.remove(digest);
        Ok(())
    }

    /// Decides new-vs-duplicate for `digest` and, for new content, reserves it
    /// so concurrent files with the same bytes are treated as duplicates.
    pub fn claim(&self, digest: &str) -> Result<DedupDecision<'_>, StorageError> {
        let mut in_flight = self.lock()?;

        let map: DigestMap = snapshot::load_or_default(&self.path);
        if let Some(original) = map.get(digest) {
            return Ok(DedupDecision::Duplicate {
                original: Some(original.clone()),
            });
        }

        if !in_flight.insert(digest.to_string()) {
            debug!("Digest {} is already being organized", digest);
            return Ok(DedupDecision::Duplicate { original: None });
        }

        Ok(DedupDecision::New(DigestClaim {
            index: self,
            digest: digest.to_string(),
            settled: false,
        }))
    }

    /// Number of recorded digests.
    pub fn len(&self) -> usize {
        snapshot::load_or_default::<DigestMap>(&self.path).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Full snapshot of the index.
    pub fn entries(&self) -> BTreeMap<String, String> {
        snapshot::load_or_default(&self.path)
    }

    fn record_locked(&self, digest: &str, destination: &Path) -> Result<(), StorageError> {
        let mut map: DigestMap = snapshot::load_or_default(&self.path);
        map.insert(digest.to_string(), destination.to_string_lossy().to_string());
        snapshot::save(&self.path, &map)
    }

    fn release(&self, digest: &str) {
        // A poisoned lock still holds a usable set
        let mut in_flight = match self.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        in_flight.remove(digest);
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashSet<String>>, StorageError> {
        self.in_flight
            .lock()
            .map_err(|_| StorageError::LockPoisoned("dedup index"))
    }
}

/// Reservation on a digest that is being organized.
#[derive(Debug)]
pub struct DigestClaim<'a> {
    index: &'a DedupIndex,
    digest: String,
    settled: bool,
}

impl DigestClaim<'_> {
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Records the final destination and releases the reservation.
    /// On error the claim is dropped unsettled, which releases the digest.
    pub fn commit(mut self, destination: &Path) -> Result<(), StorageError> {
        self.index.record(&self.digest, destination)?;
        self.settled = true;
        Ok(())
    }
}

impl Drop for DigestClaim<'_> {
    fn drop(&mut self) {
        if !self.settled {
            debug!("Releasing uncommitted digest {}", self.digest);
            self.index.release(&self.digest);
        }
    }
}
