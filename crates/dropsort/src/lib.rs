pub mod ai;
pub mod config;
pub mod error;
pub mod hasher;
pub mod logging;
pub mod pipeline;
pub mod processor;
pub mod report;
pub mod sanitize;
pub mod search;
pub mod storage;
pub mod store;
pub mod watcher;

pub use ai::{Classification, Classifier, InferenceBackend, InferenceError, OllamaClient, Summarizer};
pub use config::{load_config, Config};
pub use error::{ConfigError, DropsortError, ProcessError, Result, StorageError, WorkerError};
pub use pipeline::{
    ActivityObserver, BroadcastObserver, FileJob, Organizer, Outcome, PipelineConfig, PipelineEvent,
};
pub use report::{DailyReport, ReportGenerator};
pub use search::{search, SearchOutcome};
pub use store::{FileRecord, Stores};
pub use watcher::WatchCoordinator;
