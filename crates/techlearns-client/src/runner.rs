//! Cancel-and-replace coordination for overlapping runs.
//!
//! Starting a run aborts the one still pending. A superseded run resolves to
//! [`RunOutcome::Superseded`] and its result is dropped, so output on screen
//! always belongs to the most recently started run.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::task::AbortHandle;

/// How a coordinated run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome<T> {
    Completed(T),
    /// A newer run started before this one finished.
    Superseded,
}

impl<T> RunOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Superseded => None,
        }
    }
}

/// Serializes runs by letting the newest one win.
#[derive(Debug, Default)]
pub struct RunCoordinator {
    generation: AtomicU64,
    current: Mutex<Option<AbortHandle>>,
}

impl RunCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `work` on its own task, aborting whatever run is pending.
    pub async fn run<F, T>(&self, work: F) -> RunOutcome<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let task = tokio::spawn(work);
        let generation = {
            let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = current.replace(task.abort_handle()) {
                previous.abort();
            }
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };

        match task.await {
            Ok(value) if self.generation.load(Ordering::SeqCst) == generation => {
                RunOutcome::Completed(value)
            }
            Ok(_) => RunOutcome::Superseded,
            Err(err) if err.is_cancelled() => {
                tracing::debug!("run {} superseded", generation);
                RunOutcome::Superseded
            }
            Err(err) => std::panic::resume_unwind(err.into_panic()),
        }
    }

    /// Abort the pending run, if any.
    pub fn cancel(&self) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = current.take() {
            handle.abort();
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
