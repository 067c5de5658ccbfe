pub mod activity;
pub mod dedup;
pub mod record;
pub mod snapshot;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;

use crate::config::schema::{ACTIVITY_LOG_FILE, DEDUP_INDEX_FILE, REPORT_FILE};
use crate::error::StorageError;

pub use activity::ActivityLog;
pub use dedup::{DedupDecision, DedupIndex, DigestClaim};
pub use record::{FileRecord, DUPLICATES_CATEGORY};

/// The two persisted stores under one organized root.
#[derive(Debug, Clone)]
pub struct Stores {
    root: PathBuf,
    pub activity: Arc<ActivityLog>,
    pub dedup: Arc<DedupIndex>,
}

impl Stores {
    /// Creates the organized root and empty store documents when absent.
    ///
    /// Failure here is the one fatal startup error.
    pub fn open<P: AsRef<Path>>(root: P, retention: usize) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).map_err(|e| StorageError::CreateDirectory {
            path: root.clone(),
            source: e,
        })?;

        let activity_path = root.join(ACTIVITY_LOG_FILE);
        let dedup_path = root.join(DEDUP_INDEX_FILE);

        snapshot::ensure(&activity_path, &Vec::<FileRecord>::new())?;
        snapshot::ensure(&dedup_path, &BTreeMap::<String, String>::new())?;

        info!("Stores ready under {}", root.display());

        Ok(Self {
            activity: Arc::new(ActivityLog::new(activity_path, retention)),
            dedup: Arc::new(DedupIndex::new(dedup_path)),
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn report_path(&self) -> PathBuf {
        self.root.join(REPORT_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_root_and_empty_stores() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("organized");

        let stores = Stores::open(&root, 3000).unwrap();

        assert!(root.is_dir());
        assert_eq!(
            std::fs::read_to_string(root.join(ACTIVITY_LOG_FILE)).unwrap(),
            "[]"
        );
        assert_eq!(
            std::fs::read_to_string(root.join(DEDUP_INDEX_FILE)).unwrap(),
            "{}"
        );
        assert!(stores.activity.all().is_empty());
        assert!(stores.dedup.is_empty());
        assert_eq!(stores.report_path(), root.join(REPORT_FILE));
    }

    #[test]
    fn test_open_keeps_existing_history() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_path_buf();

        {
            let stores = Stores::open(&root, 10).unwrap();
            stores.dedup.record("abc", Path::new("/x")).unwrap();
        }

        let stores = Stores::open(&root, 10).unwrap();
        assert_eq!(stores.dedup.lookup("abc").as_deref(), Some("/x"));
    }

    #[test]
    fn test_open_fails_when_root_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("file");
        std::fs::write(&root, b"x").unwrap();

        let result = Stores::open(&root, 10);
        assert!(matches!(result, Err(StorageError::CreateDirectory { .. })));
    }
}
