use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;

/// Settings the per-file pipeline needs, resolved from [`Config`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub organized_root: PathBuf,
    pub debounce: Duration,
    pub preview_chars: usize,
    pub extract_chars: usize,
    pub extraction_timeout: Duration,
    pub inference_timeout: Duration,
    pub summarize_extensions: Vec<String>,
    pub ignore_patterns: Vec<String>,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            organized_root: config.organized_root_path(),
            debounce: config.debounce(),
            preview_chars: config.preview_chars,
            extract_chars: config.extract_chars,
            extraction_timeout: config.extraction_timeout(),
            inference_timeout: config.inference.timeout(),
            summarize_extensions: config.summarize_extensions.clone(),
            ignore_patterns: config.ignore_patterns.clone(),
        }
    }

    /// Whether files with `extension` (dot optional, any case) get a summary.
    pub fn wants_summary(&self, extension: &str) -> bool {
        let ext = extension.trim_start_matches('.');
        !ext.is_empty()
            && self
                .summarize_extensions
                .iter()
                .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}
