//! Typing animation driver.
//!
//! Reveals a template one character at a time on a tokio interval. The
//! driver owns at most one running task; starting again aborts the previous
//! one. Each reveal goes through a sink that returns `false` once the run has
//! been invalidated by its owner, so a task that loses the abort race still
//! stops before writing.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Delay between revealed characters.
pub const TYPING_INTERVAL: Duration = Duration::from_millis(15);

/// Cancelable, restartable character-by-character reveal.
pub struct TypingAnimation {
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl TypingAnimation {
    pub fn new() -> Self {
        Self::with_interval(TYPING_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            task: None,
        }
    }

    /// Start revealing `template`, replacing any running animation.
    ///
    /// `sink` receives the revealed prefix: first the empty string
    /// (synchronously, before this returns), then one more character per
    /// tick. Returning `false` from the sink ends the run.
    ///
    /// Outside a tokio runtime there is nothing to drive the ticks, so the
    /// whole template is handed to the sink at once.
    pub fn start<F>(&mut self, template: impl Into<String>, mut sink: F)
    where
        F: FnMut(&str) -> bool + Send + 'static,
    {
        self.cancel();

        if !sink("") {
            return;
        }

        let template = template.into();
        let Ok(runtime) = Handle::try_current() else {
            tracing::debug!("no tokio runtime, revealing template without animation");
            sink(&template);
            return;
        };

        let interval = self.interval;
        self.task = Some(runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            for (idx, ch) in template.char_indices() {
                ticker.tick().await;
                if !sink(&template[..idx + ch.len_utf8()]) {
                    tracing::trace!("typing animation invalidated at byte {}", idx);
                    return;
                }
            }
        }));
    }

    /// Stop the running animation, if any.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Wait for the running animation to reveal its last character.
    pub async fn finish(&mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Default for TypingAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TypingAnimation {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl FnMut(&str) -> bool + Send + 'static) {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let sink_frames = frames.clone();
        let sink = move |prefix: &str| {
            sink_frames.lock().unwrap().push(prefix.to_string());
            true
        };
        (frames, sink)
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveals_one_char_per_tick() {
        let (frames, sink) = recorder();
        let mut anim = TypingAnimation::new();
        anim.start("héllo", sink);
        anim.finish().await;

        let frames = frames.lock().unwrap();
        assert_eq!(*frames, vec!["", "h", "hé", "hél", "héll", "héllo"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_happens_before_start_returns() {
        let (frames, sink) = recorder();
        let mut anim = TypingAnimation::new();
        anim.start("abc", sink);
        assert_eq!(frames.lock().unwrap().first().map(String::as_str), Some(""));
        assert!(anim.is_running());
        anim.cancel();
        assert!(!anim.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_aborts_previous_run() {
        let (first, first_sink) = recorder();
        let (second, second_sink) = recorder();
        let mut anim = TypingAnimation::new();

        anim.start("aaaaaaaaaaaaaaaaaaaa", first_sink);
        tokio::time::sleep(TYPING_INTERVAL * 3).await;
        anim.start("bb", second_sink);
        let first_len = first.lock().unwrap().len();

        anim.finish().await;
        tokio::time::sleep(TYPING_INTERVAL * 30).await;

        assert_eq!(first.lock().unwrap().len(), first_len);
        assert_eq!(second.lock().unwrap().last().map(String::as_str), Some("bb"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sink_can_stop_the_run() {
        let calls = Arc::new(Mutex::new(0usize));
        let counter = calls.clone();
        let mut anim = TypingAnimation::new();
        anim.start("abcdef", move |_| {
            let mut n = counter.lock().unwrap();
            *n += 1;
            *n < 3
        });
        anim.finish().await;
        assert_eq!(*calls.lock().unwrap(), 3);
    }

    #[test]
    fn test_without_runtime_reveals_whole_template() {
        let (frames, sink) = recorder();
        let mut anim = TypingAnimation::new();
        anim.start("abc", sink);

        assert!(!anim.is_running());
        assert_eq!(*frames.lock().unwrap(), vec!["", "abc"]);
    }
}
