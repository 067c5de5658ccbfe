//! Streaming SHA-256 content digests.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;
use sha2::{Digest, Sha256};

/// Read buffer size used while hashing.
pub const CHUNK_SIZE: usize = 8192;

/// Computes the hex-encoded SHA-256 digest of the file at `path`.
///
/// Returns `None` when the file cannot be opened or read (removed mid-read,
/// permission denied). Callers skip the file in that case.
pub fn content_digest(path: &Path) -> Option<String> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            debug!("Cannot open {} for hashing: {}", path.display(), e);
            return None;
        }
    };

    let mut hasher = Sha256::new();
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => hasher.update(&buffer[..n]),
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!("Read failed while hashing {}: {}", path.display(), e);
                return None;
            }
        }
    }

    Some(format!("{:x}", hasher.finalize()))
}
