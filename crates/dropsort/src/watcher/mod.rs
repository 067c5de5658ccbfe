//! Filesystem subscription and per-file task dispatch.

pub mod filter;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, error, info, warn};
use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::error::WorkerError;
use crate::pipeline::{FileJob, Organizer, Outcome, PipelineEvent};
use crate::sanitize::redact_path;

pub use filter::TransientFilter;

/// Paths in `event` that should be treated as newly created files.
///
/// A rename into a watched folder counts as a creation of the new name, which
/// is how browsers finish a download.
pub fn creation_paths(event: &Event) -> Vec<PathBuf> {
    match event.kind {
        EventKind::Create(CreateKind::Folder) => Vec::new(),
        EventKind::Create(_) => event.paths.clone(),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => event.paths.clone(),
        // Paths are [from, to]
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            event.paths.get(1).cloned().into_iter().collect()
        }
        // Backends that cannot tell the two ends apart; a vanished source is
        // skipped later.
        EventKind::Modify(ModifyKind::Name(RenameMode::Any)) => event.paths.clone(),
        _ => Vec::new(),
    }
}

/// Subscribes to the watch folders and runs each creation as its own task.
pub struct WatchCoordinator {
    organizer: Arc<Organizer>,
    folders: Vec<PathBuf>,
    in_flight: Arc<Mutex<HashSet<PathBuf>>>,
}

impl WatchCoordinator {
    pub fn new(organizer: Arc<Organizer>, folders: Vec<PathBuf>) -> Self {
        Self {
            organizer,
            folders,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn folders(&self) -> &[PathBuf] {
        &self.folders
    }

    /// Number of paths currently being processed.
    pub fn in_flight(&self) -> usize {
        lock_set(&self.in_flight).len()
    }

    /// Watches until `shutdown` becomes `true` or its sender is dropped.
    ///
    /// Missing folders are skipped with a warning. Fails with
    /// [`WorkerError::NoTargets`] when no folder can be watched. Tasks already
    /// dispatched keep running after return.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), WorkerError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            // Receiver gone means we are shutting down
            let _ = tx.send(res);
        })
        .map_err(|e| WorkerError::WatchError(e.to_string()))?;

        let observer = Arc::clone(self.organizer.observer());
        let mut watched = 0usize;

        for folder in &self.folders {
            if !folder.is_dir() {
                warn!("Watch folder {} does not exist, skipping", folder.display());
                observer.notify(PipelineEvent::MissingTarget {
                    folder: folder.display().to_string(),
                });
                continue;
            }

            match watcher.watch(folder, RecursiveMode::NonRecursive) {
                Ok(()) => {
                    info!("Watching {}", folder.display());
                    observer.notify(PipelineEvent::Watching {
                        folder: folder.display().to_string(),
                    });
                    watched += 1;
                }
                Err(e) => {
                    warn!("Cannot watch {}: {}", folder.display(), e);
                    observer.notify(PipelineEvent::MissingTarget {
                        folder: folder.display().to_string(),
                    });
                }
            }
        }

        if watched == 0 {
            return Err(WorkerError::NoTargets);
        }

        observer.notify(PipelineEvent::status(format!(
            "Watching {} folder(s)",
            watched
        )));

        if *shutdown.borrow() {
            return Ok(());
        }

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                received = rx.recv() => match received {
                    Some(Ok(event)) => self.handle_event(&event),
                    Some(Err(e)) => warn!("Watch error: {}", e),
                    None => return Err(WorkerError::ChannelClosed),
                },
            }
        }

        drop(watcher);
        info!(
            "Stopped watching, {} file(s) still in progress",
            self.in_flight()
        );
        observer.notify(PipelineEvent::status("Stopped watching"));
        Ok(())
    }

    fn handle_event(&self, event: &Event) {
        for path in creation_paths(event) {
            let root = self.watch_root(&path);
            self.dispatch(path, root);
        }
    }

    fn watch_root(&self, path: &Path) -> PathBuf {
        let parent = path.parent().unwrap_or(path);
        self.folders
            .iter()
            .find(|folder| folder.as_path() == parent)
            .cloned()
            .unwrap_or_else(|| parent.to_path_buf())
    }

    /// Spawns the pipeline for `path`. Returns `None` when the same path is
    /// already being processed.
    pub fn dispatch(&self, path: PathBuf, watch_root: PathBuf) -> Option<JoinHandle<Outcome>> {
        if !lock_set(&self.in_flight).insert(path.clone()) {
            debug!("{} is already in progress", redact_path(&path));
            return None;
        }

        let organizer = Arc::clone(&self.organizer);
        let in_flight = Arc::clone(&self.in_flight);
        let job = FileJob::new(&path, &watch_root);

        Some(tokio::spawn(async move {
            let filename = redact_path(&path);
            // Nested task so a panic surfaces as a JoinError instead of
            // leaving the path marked in flight.
            let task = tokio::spawn(async move { organizer.process(job).await });

            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(e) if e.is_panic() => {
                    error!("Processing {} panicked", filename);
                    Outcome::Failed {
                        reason: "processing task panicked".to_string(),
                    }
                }
                Err(e) => {
                    warn!("Processing {} was cancelled: {}", filename, e);
                    Outcome::Failed {
                        reason: "processing task cancelled".to_string(),
                    }
                }
            };

            lock_set(&in_flight).remove(&path);
            outcome
        }))
    }
}

fn lock_set(set: &Mutex<HashSet<PathBuf>>) -> MutexGuard<'_, HashSet<PathBuf>> {
    // A poisoned lock still holds a usable set
    match set.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
