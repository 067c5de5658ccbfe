use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DropsortError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("Inference error: {0}")]
    Inference(#[from] crate::ai::InferenceError),

    #[error("Report error: {0}")]
    Report(#[from] crate::report::ReportError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Invalid ignore pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Unsupported preview format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read document '{path}': {source}")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize store '{path}': {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to move file from '{from}' to '{to}': {source}")]
    MoveFile {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No free destination name after {attempts} attempts: {path}")]
    FileExists { path: PathBuf, attempts: usize },

    #[error("Store lock poisoned: {0}")]
    LockPoisoned(&'static str),
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Watch error: {0}")]
    WatchError(String),

    #[error("No watch folder could be watched")]
    NoTargets,

    #[error("Event channel closed unexpectedly")]
    ChannelClosed,
}

pub type Result<T> = std::result::Result<T, DropsortError>;
