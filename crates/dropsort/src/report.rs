//! Daily narrative report over today's activity records.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use log::{info, warn};
use thiserror::Error;

use crate::ai::Summarizer;
use crate::store::{ActivityLog, FileRecord};

pub const NO_ACTIVITY: &str = "No file activity today.";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to serialize records for report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write report '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the report text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSource {
    NoActivity,
    Narrative,
    /// The collaborator failed; the text is a per-category count.
    LocalDigest,
}

#[derive(Debug, Clone)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub text: String,
    pub path: PathBuf,
    /// Records sent to the collaborator, at most the batch size.
    pub record_count: usize,
    pub source: ReportSource,
}

/// Builds the report and writes it to `daily_report.txt`.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    log: Arc<ActivityLog>,
    summarizer: Summarizer,
    batch: usize,
    output: PathBuf,
}

impl ReportGenerator {
    pub fn new<P: AsRef<Path>>(
        log: Arc<ActivityLog>,
        summarizer: Summarizer,
        batch: usize,
        output: P,
    ) -> Self {
        Self {
            log,
            summarizer,
            batch: batch.max(1),
            output: output.as_ref().to_path_buf(),
        }
    }

    pub async fn generate(&self) -> Result<DailyReport, ReportError> {
        self.generate_for(Local::now().date_naive()).await
    }

    /// Report over records from the local calendar day `date`.
    pub async fn generate_for(&self, date: NaiveDate) -> Result<DailyReport, ReportError> {
        let todays: Vec<FileRecord> = self
            .log
            .all()
            .into_iter()
            .filter(|record| record.is_on(date))
            .collect();

        if todays.is_empty() {
            info!("No activity on {}, skipping report request", date);
            return self.finish(date, NO_ACTIVITY.to_string(), 0, ReportSource::NoActivity);
        }

        let start = todays.len().saturating_sub(self.batch);
        let batch = &todays[start..];
        let data = serde_json::to_string_pretty(batch)?;

        let (text, source) = match self.summarizer.daily_report(&data).await {
            Ok(text) => (text, ReportSource::Narrative),
            Err(e) => {
                warn!("Daily report request failed, writing local digest: {}", e);
                (local_digest(&todays), ReportSource::LocalDigest)
            }
        };

        self.finish(date, text, batch.len(), source)
    }

    fn finish(
        &self,
        date: NaiveDate,
        text: String,
        record_count: usize,
        source: ReportSource,
    ) -> Result<DailyReport, ReportError> {
        std::fs::write(&self.output, &text).map_err(|e| ReportError::Write {
            path: self.output.clone(),
            source: e,
        })?;
        info!("Daily report written to {}", self.output.display());

        Ok(DailyReport {
            date,
            text,
            path: self.output.clone(),
            record_count,
            source,
        })
    }
}

/// Per-category counts over all of `records`.
pub fn local_digest(records: &[FileRecord]) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.category.as_str()).or_default() += 1;
    }

    let mut text = format!("DAILY REPORT:\n- {} files handled today\n", records.len());
    for (category, count) in counts {
        text.push_str(&format!("- {}: {}\n", category, count));
    }
    text
}
