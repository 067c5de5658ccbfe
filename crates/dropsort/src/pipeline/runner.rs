use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::ai::{Classification, Classifier, InferenceBackend, Summarizer};
use crate::error::{ConfigError, ProcessError};
use crate::hasher;
use crate::processor::ExtractorRegistry;
use crate::sanitize;
use crate::storage::{PlacementRequest, PlacementResolver};
use crate::store::{DedupDecision, FileRecord, Stores, DUPLICATES_CATEGORY};
use crate::watcher::filter::TransientFilter;

use super::config::PipelineConfig;
use super::context::{FileJob, PipelineContext};
use super::error::PipelineError;
use super::progress::{ActivityObserver, PipelineEvent};

/// Reason recorded for a file whose content matched another file still in
/// progress. That file may yet fail, so no original is named.
pub const CONCURRENT_DUPLICATE_REASON: &str =
    "Same content as another file arriving at the same time";

/// Why a file was dropped before hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Hidden, partial-download or temp name.
    Ignored,
    /// Gone after the debounce wait.
    Vanished,
    /// Exists but is not a regular file.
    NotAFile,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Ignored => write!(f, "ignored name"),
            SkipReason::Vanished => write!(f, "vanished before processing"),
            SkipReason::NotAFile => write!(f, "not a regular file"),
        }
    }
}

/// Terminal state of one file.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Placed and recorded, either organized or routed to Duplicates.
    Logged(FileRecord),
    SkippedTransient(SkipReason),
    Failed { reason: String },
}

/// Runs the per-file state machine: debounce, hash, dedup check, then either
/// duplicate placement or extraction, classification and placement, and
/// finally the activity record.
pub struct Organizer {
    config: Arc<PipelineConfig>,
    stores: Stores,
    placement: PlacementResolver,
    extractors: Arc<ExtractorRegistry>,
    classifier: Classifier,
    summarizer: Summarizer,
    filter: TransientFilter,
    observer: Arc<dyn ActivityObserver>,
}

impl Organizer {
    pub fn new(
        config: PipelineConfig,
        stores: Stores,
        backend: Arc<dyn InferenceBackend>,
        observer: Arc<dyn ActivityObserver>,
    ) -> Result<Self, ConfigError> {
        let filter = TransientFilter::new(&config.ignore_patterns)?;
        let classifier = Classifier::new(Arc::clone(&backend), config.inference_timeout);
        let summarizer = Summarizer::new(backend, config.inference_timeout);
        let placement = PlacementResolver::new(&config.organized_root);

        Ok(Self {
            config: Arc::new(config),
            stores,
            placement,
            extractors: Arc::new(ExtractorRegistry::new()),
            classifier,
            summarizer,
            filter,
            observer,
        })
    }

    /// Replaces the preview extractors.
    pub fn with_extractors(mut self, extractors: ExtractorRegistry) -> Self {
        self.extractors = Arc::new(extractors);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn filter(&self) -> &TransientFilter {
        &self.filter
    }

    pub fn observer(&self) -> &Arc<dyn ActivityObserver> {
        &self.observer
    }

    /// Takes one creation notification to a terminal state. Never panics on
    /// I/O or collaborator failures; those end in `Failed` or a fallback.
    pub async fn process(&self, job: FileJob) -> Outcome {
        let span = info_span!("organize",
            job_id = %job.id,
            filename = %sanitize::redact_path(&job.path),
        );
        self.run(job).instrument(span).await
    }

    async fn run(&self, job: FileJob) -> Outcome {
        let mut ctx = PipelineContext::new(job);

        if self.filter.is_transient(&ctx.job.path) {
            return self.skip(&ctx, SkipReason::Ignored);
        }

        self.observer.notify(PipelineEvent::Detected {
            job_id: ctx.job.id.clone(),
            filename: ctx.filename.clone(),
        });

        tokio::time::sleep(self.config.debounce).await;

        match tokio::fs::metadata(&ctx.job.path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return self.skip(&ctx, SkipReason::NotAFile),
            Err(_) => return self.skip(&ctx, SkipReason::Vanished),
        }

        self.settle(&mut ctx).await
    }

    /// Runs the organizing steps and reports any error as `Failed`.
    async fn settle(&self, ctx: &mut PipelineContext) -> Outcome {
        match self.organize(ctx).await {
            Ok(record) => Outcome::Logged(record),
            Err(e) => {
                let reason = e.to_string();
                warn!("Failed to organize {}: {}", ctx.filename, reason);
                self.observer.notify(PipelineEvent::Failed {
                    job_id: ctx.job.id.clone(),
                    filename: ctx.filename.clone(),
                    error: reason.clone(),
                });
                Outcome::Failed { reason }
            }
        }
    }

    fn skip(&self, ctx: &PipelineContext, reason: SkipReason) -> Outcome {
        debug!("Skipping {}: {}", ctx.filename, reason);
        self.observer.notify(PipelineEvent::Skipped {
            job_id: ctx.job.id.clone(),
            filename: ctx.filename.clone(),
            reason: reason.to_string(),
        });
        Outcome::SkippedTransient(reason)
    }

    async fn organize(&self, ctx: &mut PipelineContext) -> Result<FileRecord, PipelineError> {
        let digest = self.step_hash(ctx).instrument(info_span!("hash")).await?;

        let claim = match self.stores.dedup.claim(&digest)? {
            DedupDecision::Duplicate { original } => {
                return self.step_place_duplicate(ctx, original).await;
            }
            DedupDecision::New(claim) => claim,
        };

        self.step_extract(ctx)
            .instrument(info_span!("extract"))
            .await;

        let classification = self
            .classifier
            .classify(&ctx.filename, &ctx.extension, &ctx.extracted)
            .instrument(info_span!("classify"))
            .await;
        ctx.classification = Some(classification.clone());

        let destination = self
            .step_place(ctx, &classification)
            .instrument(info_span!("place"))
            .await?;

        if self.config.wants_summary(&ctx.extension) {
            ctx.summary = self
                .summarizer
                .summarize_document(&ctx.filename, &ctx.extracted)
                .instrument(info_span!("summarize"))
                .await;
        }

        let record = FileRecord {
            original_file: ctx.filename.clone(),
            new_path: destination.display().to_string(),
            category: sanitize::sanitize_component(&classification.category),
            reason: classification.reason.clone(),
            summary: ctx.summary.clone(),
            time: Local::now(),
            preview: sanitize::truncate_chars(&ctx.extracted, self.config.preview_chars),
        };

        // The file is already placed, so the digest is committed even when
        // the activity append fails.
        let appended = self.stores.activity.append(record);
        if let Err(e) = claim.commit(&destination) {
            warn!("Could not record digest for {}: {}", ctx.filename, e);
        }
        let record = appended?;

        info!(
            "Organized {} into {} ({})",
            ctx.filename, record.category, record.reason
        );
        self.observer.notify(PipelineEvent::Organized {
            job_id: ctx.job.id.clone(),
            record: record.clone(),
        });

        Ok(record)
    }

    async fn step_hash(&self, ctx: &mut PipelineContext) -> Result<String, PipelineError> {
        let path = ctx.job.path.clone();
        let digest = tokio::task::spawn_blocking(move || hasher::content_digest(&path))
            .await?
            .ok_or_else(|| PipelineError::Hash(ctx.job.path.clone()))?;

        debug!("Digest {}", digest);
        ctx.digest = Some(digest.clone());
        Ok(digest)
    }

    async fn step_extract(&self, ctx: &mut PipelineContext) {
        let extractors = Arc::clone(&self.extractors);
        let path = ctx.job.path.clone();
        let limit = self.config.extract_chars;
        let task = tokio::task::spawn_blocking(move || extractors.extract(&path, limit));

        ctx.extracted = match tokio::time::timeout(self.config.extraction_timeout, task).await {
            Ok(Ok(Ok(text))) => text,
            Ok(Ok(Err(ProcessError::UnsupportedFormat(ext)))) => {
                debug!("No preview extractor for '{}'", ext);
                String::new()
            }
            Ok(Ok(Err(e))) => {
                warn!("Preview extraction failed: {}", e);
                String::new()
            }
            Ok(Err(e)) => {
                warn!("Preview extraction task failed: {}", e);
                String::new()
            }
            Err(_) => {
                warn!(
                    "Preview extraction timed out after {:?}",
                    self.config.extraction_timeout
                );
                String::new()
            }
        };
    }

    async fn step_place(
        &self,
        ctx: &mut PipelineContext,
        classification: &Classification,
    ) -> Result<PathBuf, PipelineError> {
        let resolver = self.placement.clone();
        let source = ctx.job.path.clone();
        let category = classification.category.clone();
        let suggested_name = classification.suggested_name.clone();
        let extension = ctx.extension.to_lowercase();

        let destination = tokio::task::spawn_blocking(move || {
            resolver.place(
                &source,
                &PlacementRequest::Classified {
                    category: &category,
                    suggested_name: &suggested_name,
                    extension: &extension,
                },
            )
        })
        .await??;

        ctx.destination = Some(destination.clone());
        Ok(destination)
    }

    async fn step_place_duplicate(
        &self,
        ctx: &mut PipelineContext,
        original: Option<String>,
    ) -> Result<FileRecord, PipelineError> {
        let resolver = self.placement.clone();
        let source = ctx.job.path.clone();
        let name = ctx.filename.clone();

        let destination = tokio::task::spawn_blocking(move || {
            resolver.place(&source, &PlacementRequest::Duplicate { original_name: &name })
        })
        .instrument(info_span!("place_duplicate"))
        .await??;
        ctx.destination = Some(destination.clone());

        let reason = match original {
            Some(original) => format!("Duplicate of {}", original),
            None => CONCURRENT_DUPLICATE_REASON.to_string(),
        };

        let record = self.stores.activity.append(FileRecord {
            original_file: ctx.filename.clone(),
            new_path: destination.display().to_string(),
            category: DUPLICATES_CATEGORY.to_string(),
            reason,
            summary: String::new(),
            time: Local::now(),
            preview: String::new(),
        })?;

        info!("Duplicate {} moved to {}", ctx.filename, record.new_path);
        self.observer.notify(PipelineEvent::Duplicate {
            job_id: ctx.job.id.clone(),
            record: record.clone(),
        });

        Ok(record)
    }
}
