use std::io::Read;
use std::path::Path;

use crate::error::ProcessError;
use crate::processor::PreviewExtractor;
use crate::sanitize;

/// Extensions read as plain text regardless of their guessed MIME type.
const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "log"];

pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewExtractor for TextExtractor {
    fn extract(&self, path: &Path, limit: usize) -> Result<String, ProcessError> {
        let file = std::fs::File::open(path).map_err(|e| ProcessError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })?;

        // `limit` characters need at most 4 * limit bytes of UTF-8
        let mut bytes = Vec::new();
        file.take((limit as u64).saturating_mul(4))
            .read_to_end(&mut bytes)
            .map_err(|e| ProcessError::ReadDocument {
                path: path.to_path_buf(),
                source: e,
            })?;

        let text = String::from_utf8_lossy(&bytes);
        Ok(sanitize::printable(&text, limit))
    }

    fn supports(&self, path: &Path) -> bool {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension {
            Some(ext) if TEXT_EXTENSIONS.contains(&ext.as_str()) => true,
            Some(_) => mime_guess::from_path(path)
                .first()
                .map(|mime| mime.type_() == mime_guess::mime::TEXT)
                .unwrap_or(false),
            None => false,
        }
    }
}
