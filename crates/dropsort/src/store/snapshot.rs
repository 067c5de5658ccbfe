//! Whole-file JSON snapshots: every read loads the full document and every
//! write replaces it.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;

/// Loads a JSON document, falling back to `T::default()` when the file is
/// missing or unreadable. A corrupt document is logged and replaced on the
/// next save.
pub fn load_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
        Err(e) => {
            warn!("Could not read store {}: {}", path.display(), e);
            return T::default();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                "Store {} is corrupt, treating it as empty: {}",
                path.display(),
                e
            );
            T::default()
        }
    }
}

/// Writes `value` as pretty JSON. The document is written to a sibling temp
/// file first and renamed over the target, so readers never observe a
/// half-written store.
pub fn save<T>(path: &Path, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
{
    let bytes = serde_json::to_vec_pretty(value).map_err(|e| StorageError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;

    let tmp_path = temp_path_for(path);
    let write_result = std::fs::File::create(&tmp_path).and_then(|mut file| {
        file.write_all(&bytes)?;
        file.sync_all()
    });

    if let Err(e) = write_result {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(StorageError::WriteFile {
            path: tmp_path,
            source: e,
        });
    }

    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        StorageError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

/// Writes `initial` only when no document exists yet at `path`.
pub fn ensure<T>(path: &Path, initial: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
{
    if std::fs::symlink_metadata(path).is_ok() {
        return Ok(());
    }
    save(path, initial)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_default() {
        let temp_dir = TempDir::new().unwrap();
        let loaded: Vec<String> = load_or_default(&temp_dir.path().join("none.json"));
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        std::fs::write(&path, b"{ this is not json").unwrap();

        let loaded: BTreeMap<String, String> = load_or_default(&path);
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_wrong_shape_loads_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shape.json");
        std::fs::write(&path, b"{\"a\": 1}").unwrap();

        let loaded: Vec<String> = load_or_default(&path);
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("map.json");
        let mut map = BTreeMap::new();
        map.insert("k".to_string(), "v".to_string());

        save(&path, &map).unwrap();
        let loaded: BTreeMap<String, String> = load_or_default(&path);
        assert_eq!(loaded, map);
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_save_overwrites_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fix.json");
        std::fs::write(&path, b"garbage").unwrap();

        save(&path, &vec!["x".to_string()]).unwrap();
        let loaded: Vec<String> = load_or_default(&path);
        assert_eq!(loaded, vec!["x".to_string()]);
    }

    #[test]
    fn test_ensure_does_not_clobber() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("keep.json");
        save(&path, &vec!["keep".to_string()]).unwrap();

        ensure(&path, &Vec::<String>::new()).unwrap();
        let loaded: Vec<String> = load_or_default(&path);
        assert_eq!(loaded, vec!["keep".to_string()]);
    }

    #[test]
    fn test_ensure_creates_when_absent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("new.json");
        ensure(&path, &BTreeMap::<String, String>::new()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing/dir/store.json");
        let result = save(&path, &Vec::<String>::new());
        assert!(matches!(result, Err(StorageError::WriteFile { .. })));
    }
}
