//! Errors from the text-generation collaborator.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Failed to create HTTP client: {0}")]
    ClientInit(String),

    #[error("Request to inference service failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Inference service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Inference timed out after {0:?}")]
    Timeout(Duration),

    #[error("Inference service returned an empty response")]
    EmptyResponse,

    #[error("Failed to parse response: {0}")]
    ResponseParse(String),
}
