use std::sync::Arc;
use std::time::Duration;

use log::warn;

use super::backend::{generate_with_timeout, InferenceBackend};
use super::error::InferenceError;
use super::prompt::{daily_report_prompt, summary_prompt};

/// Summary and report requests against the inference collaborator.
#[derive(Clone)]
pub struct Summarizer {
    backend: Arc<dyn InferenceBackend>,
    timeout: Duration,
}

impl Summarizer {
    pub fn new(backend: Arc<dyn InferenceBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Bullet summary of a document preview. Empty when there is no preview
    /// text or the request fails.
    pub async fn summarize_document(&self, filename: &str, preview: &str) -> String {
        if preview.trim().is_empty() {
            return String::new();
        }

        let prompt = summary_prompt(filename, preview);
        match generate_with_timeout(self.backend.as_ref(), &prompt, self.timeout).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Summary for {} failed: {}", filename, e);
                String::new()
            }
        }
    }

    /// Narrative daily report over an already-serialized batch of records.
    pub async fn daily_report(&self, records_json: &str) -> Result<String, InferenceError> {
        let prompt = daily_report_prompt(records_json);
        generate_with_timeout(self.backend.as_ref(), &prompt, self.timeout).await
    }
}

impl std::fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Summarizer")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
