use std::time::Duration;

use async_trait::async_trait;

use super::error::InferenceError;

/// A text-generation service: one prompt in, one completion out.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError>;
}

/// Runs `backend.generate` bounded by `timeout`.
pub async fn generate_with_timeout(
    backend: &dyn InferenceBackend,
    prompt: &str,
    timeout: Duration,
) -> Result<String, InferenceError> {
    match tokio::time::timeout(timeout, backend.generate(prompt)).await {
        Ok(result) => result,
        Err(_) => Err(InferenceError::Timeout(timeout)),
    }
}
