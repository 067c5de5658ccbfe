//! Best-effort preview text for newly arrived files.
//!
//! Only plain text is extracted here. PDF and image extraction are external
//! collaborators that plug in through [`PreviewExtractor`].

pub mod text;

use std::path::Path;

use crate::error::ProcessError;

pub trait PreviewExtractor: Send + Sync {
    /// Returns at most `limit` characters of printable text from `path`.
    fn extract(&self, path: &Path, limit: usize) -> Result<String, ProcessError>;
    fn supports(&self, path: &Path) -> bool;
}

pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn PreviewExtractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self {
            extractors: vec![Box::new(text::TextExtractor::new())],
        }
    }

    /// Registry with no extractors; every file yields `UnsupportedFormat`.
    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Adds an extractor. Later registrations take precedence.
    pub fn register(&mut self, extractor: Box<dyn PreviewExtractor>) {
        self.extractors.insert(0, extractor);
    }

    pub fn extract(&self, path: &Path, limit: usize) -> Result<String, ProcessError> {
        for extractor in &self.extractors {
            if extractor.supports(path) {
                return extractor.extract(path, limit);
            }
        }

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Err(ProcessError::UnsupportedFormat(extension.to_string()))
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
