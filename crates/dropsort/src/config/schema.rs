use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// File name of the activity log inside the organized root.
pub const ACTIVITY_LOG_FILE: &str = "fileguru_memory.json";

/// File name of the deduplication index inside the organized root.
pub const DEDUP_INDEX_FILE: &str = "fileguru_hashes.json";

/// File name of the daily report artifact inside the organized root.
pub const REPORT_FILE: &str = "daily_report.txt";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_watch_folders")]
    pub watch_folders: Vec<String>,
    #[serde(default = "default_organized_root")]
    pub organized_root: String,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Number of activity records kept on disk.
    #[serde(default = "default_retention")]
    pub retention: usize,
    /// Length of the preview stored with each record.
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
    /// Length of the text handed to the classifier.
    #[serde(default = "default_extract_chars")]
    pub extract_chars: usize,
    #[serde(default = "default_report_batch")]
    pub report_batch: usize,
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,
    #[serde(default = "default_summarize_extensions")]
    pub summarize_extensions: Vec<String>,
    #[serde(default = "default_extraction_timeout")]
    pub extraction_timeout_secs: u64,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_watch_folders() -> Vec<String> {
    vec![
        "~/Downloads".to_string(),
        "~/Desktop".to_string(),
        "~/Documents".to_string(),
    ]
}

fn default_organized_root() -> String {
    "~/FileGuru_Organized".to_string()
}

fn default_debounce_ms() -> u64 {
    2000
}

fn default_retention() -> usize {
    3000
}

fn default_preview_chars() -> usize {
    500
}

fn default_extract_chars() -> usize {
    1500
}

fn default_report_batch() -> usize {
    40
}

fn default_ignore_patterns() -> Vec<String> {
    vec![
        ".*".to_string(),
        "*.crdownload".to_string(),
        "*.part".to_string(),
        "*.tmp".to_string(),
    ]
}

fn default_summarize_extensions() -> Vec<String> {
    vec!["pdf".to_string()]
}

fn default_extraction_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watch_folders: default_watch_folders(),
            organized_root: default_organized_root(),
            debounce_ms: default_debounce_ms(),
            retention: default_retention(),
            preview_chars: default_preview_chars(),
            extract_chars: default_extract_chars(),
            report_batch: default_report_batch(),
            ignore_patterns: default_ignore_patterns(),
            summarize_extensions: default_summarize_extensions(),
            extraction_timeout_secs: default_extraction_timeout(),
            inference: InferenceConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Watch folders with `~` expanded.
    pub fn watch_paths(&self) -> Vec<PathBuf> {
        self.watch_folders.iter().map(|f| expand_tilde(f)).collect()
    }

    /// Organized root with `~` expanded.
    pub fn organized_root_path(&self) -> PathBuf {
        expand_tilde(&self.organized_root)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }
}

/// Connection settings for the text-generation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "default_inference_url")]
    pub url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Whole-request timeout in seconds.
    #[serde(default = "default_inference_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_inference_url() -> String {
    "http://localhost:11434/api/generate".to_string()
}

fn default_model() -> String {
    "llama3.1".to_string()
}

fn default_inference_timeout() -> u64 {
    120
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            url: default_inference_url(),
            model: default_model(),
            timeout_secs: default_inference_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl InferenceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Expands `~` to the home directory in a path string.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    Path::new(path).to_path_buf()
}
