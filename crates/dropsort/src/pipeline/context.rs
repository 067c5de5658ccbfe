use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::ai::Classification;

/// One creation notification handed to the pipeline.
#[derive(Debug, Clone)]
pub struct FileJob {
    pub id: String,
    pub path: PathBuf,
    /// Watch folder the notification came from.
    pub watch_root: PathBuf,
    pub detected_at: DateTime<Local>,
}

impl FileJob {
    pub fn new<P: AsRef<Path>, R: AsRef<Path>>(path: P, watch_root: R) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            path: path.as_ref().to_path_buf(),
            watch_root: watch_root.as_ref().to_path_buf(),
            detected_at: Local::now(),
        }
    }

    /// Base name as observed in the watch folder.
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Extension with leading dot, as observed. Empty when there is none.
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default()
    }
}

/// State accumulated while one file moves through the pipeline.
pub struct PipelineContext {
    pub job: FileJob,
    pub filename: String,
    pub extension: String,

    // Hashing result
    pub digest: Option<String>,

    // Extraction result, up to extract_chars; empty when unavailable
    pub extracted: String,

    pub classification: Option<Classification>,

    // Placement result
    pub destination: Option<PathBuf>,

    pub summary: String,
}

impl PipelineContext {
    pub fn new(job: FileJob) -> Self {
        let filename = job.filename();
        let extension = job.extension();
        Self {
            job,
            filename,
            extension,
            digest: None,
            extracted: String::new(),
            classification: None,
            destination: None,
            summary: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_names() {
        let job = FileJob::new("/dl/Scan.PDF", "/dl");
        assert_eq!(job.filename(), "Scan.PDF");
        assert_eq!(job.extension(), ".PDF");
        assert_eq!(job.watch_root, PathBuf::from("/dl"));
        assert!(!job.id.is_empty());
    }

    #[test]
    fn test_job_without_extension() {
        let job = FileJob::new("/dl/Makefile", "/dl");
        assert_eq!(job.extension(), "");
        let ctx = PipelineContext::new(job);
        assert_eq!(ctx.filename, "Makefile");
        assert!(ctx.digest.is_none());
    }

    #[test]
    fn test_job_ids_are_unique() {
        let a = FileJob::new("/dl/a.txt", "/dl");
        let b = FileJob::new("/dl/a.txt", "/dl");
        assert_ne!(a.id, b.id);
    }
}
