use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use log::{debug, warn};

use crate::error::StorageError;
use crate::sanitize::sanitize_component;
use crate::store::DUPLICATES_CATEGORY;

/// Upper bound on numbered variants tried before giving up on a name.
pub const MAX_COLLISION_ATTEMPTS: usize = 1000;

/// What to place and where it belongs.
#[derive(Debug, Clone)]
pub enum PlacementRequest<'a> {
    /// Newly classified content: `<root>/<category>/<date>_<name><ext>`.
    Classified {
        category: &'a str,
        suggested_name: &'a str,
        /// Extension including the leading dot, or empty.
        extension: &'a str,
    },
    /// Known content: `<root>/Duplicates/<original file name>`.
    Duplicate { original_name: &'a str },
}

/// Move a file from `src` onto the reserved path `dst`. Uses `rename` first
/// (atomic on the same filesystem, replaces the empty reservation). Falls
/// back to copy + delete when rename fails, which covers cross-device moves.
fn move_file(src: &Path, dst: &Path) -> Result<(), StorageError> {
    // Fast path: atomic rename
    let rename_err = match std::fs::rename(src, dst) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };

    // A vanished source will not copy either
    if std::fs::symlink_metadata(src).is_err() {
        return Err(StorageError::MoveFile {
            from: src.to_path_buf(),
            to: dst.to_path_buf(),
            source: rename_err,
        });
    }

    debug!(
        "rename {} -> {} failed ({}), falling back to copy",
        src.display(),
        dst.display(),
        rename_err
    );

    // Slow path: copy then remove original
    std::fs::copy(src, dst).map_err(|e| StorageError::MoveFile {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source: e,
    })?;
    if let Err(e) = std::fs::remove_file(src) {
        // Keep the source authoritative: drop the copy so nothing is doubled
        let _ = std::fs::remove_file(dst);
        return Err(StorageError::MoveFile {
            from: src.to_path_buf(),
            to: dst.to_path_buf(),
            source: e,
        });
    }
    Ok(())
}

/// Splits `name` into stem and extension (with dot). Leading dots are part of
/// the stem.
fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(dot_pos) if dot_pos > 0 => (&name[..dot_pos], &name[dot_pos..]),
        _ => (name, ""),
    }
}

/// Resolves collision-free destinations under the organized root and moves
/// files into them.
#[derive(Debug, Clone)]
pub struct PlacementResolver {
    organized_root: PathBuf,
}

impl PlacementResolver {
    pub fn new<P: AsRef<Path>>(organized_root: P) -> Self {
        Self {
            organized_root: organized_root.as_ref().to_path_buf(),
        }
    }

    pub fn organized_root(&self) -> &Path {
        &self.organized_root
    }

    /// Places `source` according to `request` dated today.
    pub fn place(&self, source: &Path, request: &PlacementRequest<'_>) -> Result<PathBuf, StorageError> {
        self.place_on(source, request, Local::now().date_naive())
    }

    /// Places `source` according to `request`, using `date` for the prefix.
    ///
    /// The destination is reserved with an exclusive create before the move,
    /// so two concurrent placements can never pick the same path. If the move
    /// fails the reservation is removed and `source` is left untouched.
    pub fn place_on(
        &self,
        source: &Path,
        request: &PlacementRequest<'_>,
        date: NaiveDate,
    ) -> Result<PathBuf, StorageError> {
        let (folder, stem, extension) = match request {
            PlacementRequest::Classified {
                category,
                suggested_name,
                extension,
            } => {
                let category = sanitize_component(category);
                let name = sanitize_component(suggested_name);
                let stem = format!("{}_{}", date.format("%Y-%m-%d"), name);
                (category, stem, extension.to_string())
            }
            PlacementRequest::Duplicate { original_name } => {
                let (stem, ext) = split_name(original_name);
                (
                    DUPLICATES_CATEGORY.to_string(),
                    stem.to_string(),
                    ext.to_string(),
                )
            }
        };

        let dir_path = self.category_dir(&folder)?;
        let reserved = self.reserve(&dir_path, &stem, &extension)?;

        if let Err(e) = move_file(source, &reserved) {
            if let Err(cleanup) = std::fs::remove_file(&reserved) {
                warn!(
                    "Could not remove reservation {}: {}",
                    reserved.display(),
                    cleanup
                );
            }
            return Err(e);
        }

        Ok(reserved)
    }

    /// Ensures `<root>/<folder>` exists and returns it.
    pub fn category_dir(&self, folder: &str) -> Result<PathBuf, StorageError> {
        let dir_path = self.organized_root.join(folder);
        self.ensure_directory(&dir_path)?;
        Ok(dir_path)
    }

    fn ensure_directory(&self, path: &Path) -> Result<(), StorageError> {
        if !path.is_dir() {
            std::fs::create_dir_all(path).map_err(|e| StorageError::CreateDirectory {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Claims the first free name among `<stem><ext>`, `<stem>_1<ext>`,
    /// `<stem>_2<ext>`, ... using atomic file creation (O_CREAT | O_EXCL).
    fn reserve(&self, dir_path: &Path, stem: &str, extension: &str) -> Result<PathBuf, StorageError> {
        for counter in 0..MAX_COLLISION_ATTEMPTS {
            let try_filename = if counter == 0 {
                format!("{}{}", stem, extension)
            } else {
                format!("{}_{}{}", stem, counter, extension)
            };

            let try_path = dir_path.join(&try_filename);

            match std::fs::OpenOptions::new()
                .write(true)
                .create_new(true) // Fails if file exists - atomic check-and-create
                .open(&try_path)
            {
                Ok(_) => return Ok(try_path),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    continue;
                }
                Err(e) => {
                    return Err(StorageError::WriteFile {
                        path: try_path,
                        source: e,
                    });
                }
            }
        }

        Err(StorageError::FileExists {
            path: dir_path.join(format!("{}{}", stem, extension)),
            attempts: MAX_COLLISION_ATTEMPTS,
        })
    }
}
