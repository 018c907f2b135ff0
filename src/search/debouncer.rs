//! Trailing-edge debouncer backed by tokio timers.
//!
//! Each call to [`Debouncer::schedule`] re-arms the timer: the previously
//! scheduled task is aborted and the new one fires only after a full quiet
//! period of `delay`.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `task` once `delay` has passed without another call.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });

        if let Some(previous) = self.slot().replace(handle) {
            previous.abort();
        }
    }

    /// Disarms the pending task. Returns whether one was still pending.
    pub fn cancel(&self) -> bool {
        self.slot().take().is_some_and(|handle| {
            let was_pending = !handle.is_finished();
            handle.abort();
            was_pending
        })
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.slot().as_ref().is_some_and(|handle| !handle.is_finished())
    }

    fn slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.slot().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn rapid_calls_collapse_to_the_last() {
        let debouncer = Debouncer::new(Duration::from_millis(250));
        let fired = Arc::new(Mutex::new(Vec::new()));

        for value in ["r", "re", "res"] {
            let fired = Arc::clone(&fired);
            debouncer.schedule(async move { fired.lock().unwrap().push(value) });
            tokio::time::sleep(Duration::from_millis(40)).await;
        }
        assert!(debouncer.is_pending());
        assert!(fired.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(*fired.lock().unwrap(), vec!["res"]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_firing() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        let fired = Arc::new(Mutex::new(false));

        let flag = Arc::clone(&fired);
        debouncer.schedule(async move { *flag.lock().unwrap() = true });
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!*fired.lock().unwrap());
    }
}
