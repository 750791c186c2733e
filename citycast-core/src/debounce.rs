use std::{
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};
use tracing::trace;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Coalesces bursts of calls (keystrokes) into one.
///
/// Each [`run`](Debouncer::run) waits for the window; only the newest call
/// executes, and its output is dropped as well if a newer call arrives while
/// it is still running.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    latest: AtomicU64,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, latest: AtomicU64::new(0) }
    }

    pub async fn run<F, Fut, T>(&self, f: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        if !self.is_latest(token) {
            trace!(token, "Debounced call superseded before running");
            return None;
        }

        let output = f().await;
        if !self.is_latest(token) {
            trace!(token, "Debounced call superseded while running");
            return None;
        }
        Some(output)
    }

    fn is_latest(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }
}
