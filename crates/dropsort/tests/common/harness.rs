//! Isolated environment for pipeline tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tempfile::TempDir;

use dropsort::ai::Summarizer;
use dropsort::config::Config;
use dropsort::pipeline::{BroadcastObserver, FileJob, Organizer, PipelineConfig};
use dropsort::{ReportGenerator, Stores};

use super::builders::ScriptedBackend;

pub struct TestHarness {
    temp_dir: TempDir,
    /// Folder files are dropped into.
    pub watch_dir: PathBuf,
    /// Organized root holding category folders and stores.
    pub root: PathBuf,
    pub config: Config,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let watch_dir = temp_dir.path().join("Downloads");
        let root = temp_dir.path().join("Organized");
        std::fs::create_dir_all(&watch_dir).expect("Failed to create watch dir");

        let config = Config {
            watch_folders: vec![watch_dir.display().to_string()],
            organized_root: root.display().to_string(),
            debounce_ms: 0,
            ..Config::default()
        };

        Self {
            temp_dir,
            watch_dir,
            root,
            config,
        }
    }

    pub fn with_retention(mut self, retention: usize) -> Self {
        self.config.retention = retention;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.config.debounce_ms = debounce.as_millis() as u64;
        self
    }

    pub fn stores(&self) -> Stores {
        Stores::open(&self.root, self.config.retention).expect("Failed to open stores")
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::from_config(&self.config);
        config.inference_timeout = Duration::from_secs(5);
        config
    }

    pub fn organizer(&self, backend: Arc<ScriptedBackend>) -> Organizer {
        self.organizer_with_observer(backend, BroadcastObserver::default())
    }

    pub fn organizer_with_observer(
        &self,
        backend: Arc<ScriptedBackend>,
        observer: BroadcastObserver,
    ) -> Organizer {
        Organizer::new(
            self.pipeline_config(),
            self.stores(),
            backend,
            Arc::new(observer),
        )
        .expect("Failed to build organizer")
    }

    pub fn report_generator(&self, backend: Arc<ScriptedBackend>) -> ReportGenerator {
        let stores = self.stores();
        ReportGenerator::new(
            Arc::clone(&stores.activity),
            Summarizer::new(backend, Duration::from_secs(5)),
            self.config.report_batch,
            stores.report_path(),
        )
    }

    /// Writes a file into the watch folder and returns its job.
    pub fn drop_file(&self, name: &str, content: &[u8]) -> FileJob {
        let path = self.watch_dir.join(name);
        std::fs::write(&path, content).expect("Failed to write input file");
        FileJob::new(path, &self.watch_dir)
    }

    pub fn job_for(&self, name: &str) -> FileJob {
        FileJob::new(self.watch_dir.join(name), &self.watch_dir)
    }

    pub fn category_path(&self, category: &str, file_name: &str) -> PathBuf {
        self.root.join(category).join(file_name)
    }

    /// `<YYYY-MM-DD>_` for today.
    pub fn date_prefix(&self) -> String {
        format!("{}_", Local::now().format("%Y-%m-%d"))
    }

    pub fn watch_is_empty(&self) -> bool {
        dir_is_empty(&self.watch_dir)
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }
}

pub fn dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(true)
}
