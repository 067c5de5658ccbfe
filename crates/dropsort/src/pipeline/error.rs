use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Could not read content of '{0}'")]
    Hash(PathBuf),

    #[error("Storage failed: {0}")]
    Storage(#[from] crate::error::StorageError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
