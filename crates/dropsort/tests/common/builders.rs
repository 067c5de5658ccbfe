//! Test doubles and fixture builders.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local};

use dropsort::ai::{InferenceBackend, InferenceError};
use dropsort::FileRecord;

/// Inference double. Classification prompts get the queued replies in order
/// (the last one repeats); summary and report prompts get fixed texts.
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<String>>,
    last: Mutex<String>,
    delay: Duration,
    fail_reports: bool,
    pub classify_calls: AtomicUsize,
    pub summary_calls: AtomicUsize,
    pub report_calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

pub const SUMMARY_TEXT: &str = "SUMMARY:\n- scripted summary";
pub const REPORT_TEXT: &str = "DAILY REPORT:\n- scripted report";

impl ScriptedBackend {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            last: Mutex::new(String::new()),
            delay: Duration::ZERO,
            fail_reports: false,
            classify_calls: AtomicUsize::new(0),
            summary_calls: AtomicUsize::new(0),
            report_calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always answers classification prompts with `reply`.
    pub fn always(reply: &str) -> Self {
        Self::new([reply])
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing_reports(mut self) -> Self {
        self.fail_reports = true;
        self
    }

    pub fn classify_count(&self) -> usize {
        self.classify_calls.load(Ordering::SeqCst)
    }

    pub fn report_count(&self) -> usize {
        self.report_calls.load(Ordering::SeqCst)
    }

    fn next_reply(&self) -> String {
        let mut replies = self.replies.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        if let Some(reply) = replies.pop_front() {
            *last = reply;
        }
        last.clone()
    }
}

#[async_trait]
impl InferenceBackend for ScriptedBackend {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if prompt.contains("DAILY REPORT:") {
            self.report_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_reports {
                return Err(InferenceError::EmptyResponse);
            }
            return Ok(REPORT_TEXT.to_string());
        }
        if prompt.contains("SUMMARY:") {
            self.summary_calls.fetch_add(1, Ordering::SeqCst);
            return Ok(SUMMARY_TEXT.to_string());
        }

        self.classify_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.next_reply())
    }
}

/// JSON reply in the shape the classifier expects.
pub fn classification_reply(category: &str, name: &str, reason: &str) -> String {
    format!(
        r#"Here is the result:
{{"category": "{}", "suggested_name": "{}", "reason": "{}"}}"#,
        category, name, reason
    )
}

/// Builder for activity records used by search and report tests.
pub struct RecordBuilder {
    record: FileRecord,
}

impl RecordBuilder {
    pub fn new(original_file: &str) -> Self {
        Self {
            record: FileRecord {
                original_file: original_file.to_string(),
                new_path: format!("/organized/Random/{}", original_file),
                category: "Random".to_string(),
                reason: "test".to_string(),
                summary: String::new(),
                time: Local::now(),
                preview: String::new(),
            },
        }
    }

    pub fn category(mut self, category: &str) -> Self {
        self.record.category = category.to_string();
        self
    }

    pub fn reason(mut self, reason: &str) -> Self {
        self.record.reason = reason.to_string();
        self
    }

    pub fn preview(mut self, preview: &str) -> Self {
        self.record.preview = preview.to_string();
        self
    }

    pub fn time(mut self, time: DateTime<Local>) -> Self {
        self.record.time = time;
        self
    }

    pub fn build(self) -> FileRecord {
        self.record
    }
}
