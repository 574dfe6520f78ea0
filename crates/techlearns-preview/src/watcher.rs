//! File watcher for notebook sources.
//!
//! Watches one source file and reports debounced changes to it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify_debouncer_mini::{DebounceEventResult, new_debouncer, notify::RecursiveMode};
use tokio::sync::mpsc;

use crate::error::{PreviewError, PreviewResult};

/// Debounce window for editor save bursts.
const DEBOUNCE: Duration = Duration::from_millis(200);

/// File change event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    /// File was written.
    Modified(PathBuf),
    /// File was removed.
    Removed(PathBuf),
}

/// File watcher handle.
pub struct FileWatcher {
    /// Debouncer handle (kept alive to maintain watcher).
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
    /// Receiver for file events.
    rx: mpsc::UnboundedReceiver<FileEvent>,
}

impl FileWatcher {
    /// Watch a single file. Its parent directory is watched so that editors
    /// which save by rename are still seen.
    pub fn new(path: impl AsRef<Path>) -> PreviewResult<Self> {
        let target = path.as_ref().to_path_buf();
        let target = target.canonicalize().unwrap_or(target);
        let watch_dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();

        let (tx, rx) = mpsc::unbounded_channel();

        let mut debouncer = new_debouncer(DEBOUNCE, move |result: DebounceEventResult| {
            let events = match result {
                Ok(events) => events,
                Err(e) => {
                    tracing::warn!("watch error: {}", e);
                    return;
                }
            };
            for event in events {
                if event.path != target {
                    continue;
                }
                let file_event = if event.path.exists() {
                    FileEvent::Modified(event.path.clone())
                } else {
                    FileEvent::Removed(event.path.clone())
                };
                let _ = tx.send(file_event);
            }
        })
        .map_err(|e| PreviewError::Watch(e.to_string()))?;

        debouncer
            .watcher()
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .map_err(|e| PreviewError::Watch(e.to_string()))?;

        Ok(Self {
            _debouncer: debouncer,
            rx,
        })
    }

    /// Receive the next file event.
    pub async fn recv(&mut self) -> Option<FileEvent> {
        self.rx.recv().await
    }
}
