use std::path::Path;

use glob::Pattern;

use crate::error::ConfigError;

/// Matches hidden files, partial downloads and temp artifacts by file name.
#[derive(Debug, Clone)]
pub struct TransientFilter {
    patterns: Vec<Pattern>,
}

impl TransientFilter {
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| ConfigError::InvalidPattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Whether the file name of `path` matches any ignore pattern.
    /// Paths without a UTF-8 file name are treated as transient.
    pub fn is_transient(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return true;
        };
        self.patterns.iter().any(|p| p.matches(name))
    }
}
