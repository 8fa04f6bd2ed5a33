use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Debounce window for search box keystrokes
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Collapses bursts of keystrokes into the last one.
///
/// Every call to [`settle`](Self::settle) supersedes the calls before it.
/// Only a value that is still the newest after the quiet period comes back.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the quiet period. `None` if a newer value arrived meanwhile.
    pub async fn settle<T>(&self, value: T) -> Option<T> {
        let mine = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        (self.generation.load(Ordering::SeqCst) == mine).then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn only_last_keystroke_survives() {
        let debouncer = SearchDebouncer::default();

        let mut tasks = Vec::new();
        for text in ["o", "oa", "oak"] {
            let debouncer = debouncer.clone();
            tasks.push(tokio::spawn(async move { debouncer.settle(text.to_string()).await }));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        let mut settled = Vec::new();
        for task in tasks {
            settled.push(task.await.unwrap());
        }
        assert_eq!(settled, vec![None, None, Some("oak".to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn separated_keystrokes_both_settle() {
        let debouncer = SearchDebouncer::new(Duration::from_millis(50));
        assert_eq!(debouncer.settle("a").await, Some("a"));
        assert_eq!(debouncer.settle("b").await, Some("b"));
    }
}
