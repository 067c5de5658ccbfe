//! Classification requests and tolerant parsing of the collaborator's reply.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::backend::{generate_with_timeout, InferenceBackend};
use super::prompt::classification_prompt;

pub const FALLBACK_CATEGORY: &str = "Random";
pub const FALLBACK_REASON: &str = "could not classify confidently";
/// Used when a parsed reply has no usable `reason`.
pub const MISSING_REASON: &str = "No reason";

/// Category, name and rationale proposed for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: String,
    pub suggested_name: String,
    pub reason: String,
}

impl Classification {
    /// Default classification for a file whose reply could not be used.
    /// `base_name` is the original filename without its extension.
    pub fn fallback(base_name: &str) -> Self {
        Self {
            category: FALLBACK_CATEGORY.to_string(),
            suggested_name: base_name.to_string(),
            reason: FALLBACK_REASON.to_string(),
        }
    }
}

/// Returns the span from the first `{` to the last `}`, inclusive.
pub fn extract_json_span(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&response[start..=end])
}

fn string_field(object: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parses a classifier reply. Missing fields get per-field defaults; a reply
/// without a parsable object yields `None`.
pub fn parse_classification(response: &str, base_name: &str) -> Option<Classification> {
    let span = extract_json_span(response)?;
    let value: Value = match serde_json::from_str(span) {
        Ok(value) => value,
        Err(e) => {
            debug!("Classifier reply is not valid JSON: {}", e);
            return None;
        }
    };
    let object = value.as_object()?;

    Some(Classification {
        category: string_field(object, "category")
            .unwrap_or_else(|| FALLBACK_CATEGORY.to_string()),
        suggested_name: string_field(object, "suggested_name")
            .unwrap_or_else(|| base_name.to_string()),
        reason: string_field(object, "reason").unwrap_or_else(|| MISSING_REASON.to_string()),
    })
}

/// Client for the classification collaborator. Never fails: any error or
/// unusable reply produces [`Classification::fallback`].
#[derive(Clone)]
pub struct Classifier {
    backend: Arc<dyn InferenceBackend>,
    timeout: Duration,
}

impl Classifier {
    pub fn new(backend: Arc<dyn InferenceBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// `extension` includes the leading dot, or is empty.
    pub async fn classify(&self, filename: &str, extension: &str, preview: &str) -> Classification {
        let base_name = filename.strip_suffix(extension).unwrap_or(filename);
        // Placement lowercases the extension, so the prompt sees it that way too
        let prompt = classification_prompt(filename, &extension.to_lowercase(), preview);

        match generate_with_timeout(self.backend.as_ref(), &prompt, self.timeout).await {
            Ok(response) => parse_classification(&response, base_name).unwrap_or_else(|| {
                warn!("Unusable classification for {}, using fallback", filename);
                Classification::fallback(base_name)
            }),
            Err(e) => {
                warn!("Classification request for {} failed: {}", filename, e);
                Classification::fallback(base_name)
            }
        }
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::error::InferenceError;
    use async_trait::async_trait;

    struct Fixed(Result<&'static str, ()>);

    #[async_trait]
    impl InferenceBackend for Fixed {
        async fn generate(&self, _prompt: &str) -> Result<String, InferenceError> {
            match self.0 {
                Ok(text) => Ok(text.to_string()),
                Err(()) => Err(InferenceError::EmptyResponse),
            }
        }
    }

    #[derive(Default)]
    struct Recording(std::sync::Mutex<Vec<String>>);

    #[async_trait]
    impl InferenceBackend for Recording {
        async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
            self.0.lock().unwrap().push(prompt.to_string());
            Ok("not json".to_string())
        }
    }

    fn classifier(reply: Result<&'static str, ()>) -> Classifier {
        Classifier::new(Arc::new(Fixed(reply)), Duration::from_secs(1))
    }

    #[test]
    fn test_extract_json_span() {
        assert_eq!(
            extract_json_span("Sure! {\"a\": 1} done"),
            Some("{\"a\": 1}")
        );
        assert_eq!(extract_json_span("no braces"), None);
        assert_eq!(extract_json_span("} backwards {"), None);
    }

    #[test]
    fn test_parse_full_reply() {
        let reply = r#"Here you go:
{"category": "Bills", "suggested_name": "Electricity_March", "reason": "utility bill"}"#;
        let parsed = parse_classification(reply, "scan").unwrap();
        assert_eq!(parsed.category, "Bills");
        assert_eq!(parsed.suggested_name, "Electricity_March");
        assert_eq!(parsed.reason, "utility bill");
    }

    #[test]
    fn test_parse_partial_reply_uses_field_defaults() {
        let parsed = parse_classification(r#"{"category": "Work"}"#, "scan").unwrap();
        assert_eq!(parsed.category, "Work");
        assert_eq!(parsed.suggested_name, "scan");
        assert_eq!(parsed.reason, MISSING_REASON);

        let parsed = parse_classification(r#"{"category": 7, "reason": ""}"#, "scan").unwrap();
        assert_eq!(parsed.category, FALLBACK_CATEGORY);
        assert_eq!(parsed.reason, MISSING_REASON);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_classification("I cannot help with that", "scan").is_none());
        assert!(parse_classification("{not json}", "scan").is_none());
        assert!(parse_classification("[1, {2}]", "scan").is_none());
    }

    #[tokio::test]
    async fn test_unparsable_reply_falls_back() {
        let result = classifier(Ok("no idea")).classify("report.docx", ".docx", "").await;
        assert_eq!(result, Classification::fallback("report"));
        assert_eq!(result.reason, FALLBACK_REASON);
    }

    #[tokio::test]
    async fn test_backend_error_falls_back() {
        let result = classifier(Err(())).classify("a.txt", ".txt", "hi").await;
        assert_eq!(result.category, "Random");
        assert_eq!(result.suggested_name, "a");
    }

    #[tokio::test]
    async fn test_uppercase_extension_is_lowered_in_prompt() {
        let backend = Arc::new(Recording::default());
        let classifier = Classifier::new(backend.clone(), Duration::from_secs(1));

        let result = classifier.classify("SCAN.PDF", ".PDF", "").await;

        assert_eq!(result.suggested_name, "SCAN");
        let prompts = backend.0.lock().unwrap();
        assert!(prompts[0].contains("EXTENSION: .pdf"));
        assert!(!prompts[0].contains("EXTENSION: .PDF"));
    }

    #[tokio::test]
    async fn test_no_extension_keeps_full_name() {
        let result = classifier(Ok("")).classify("Makefile", "", "").await;
        assert_eq!(result.suggested_name, "Makefile");
    }
}
