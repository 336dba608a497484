//! Trailing-edge debounce for search-as-you-type refetches.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

/// Delays an action until input has been quiet for `delay`.
///
/// Each [`schedule`](Self::schedule) call cancels whatever is pending,
/// including an action that already started, and restarts the timer with
/// the newest query.
#[derive(Debug)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Run `action(query)` once `delay` passes without another call.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F, Fut>(&mut self, query: impl Into<String>, action: F)
    where
        F: FnOnce(String) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let query = query.into();
        let delay = self.delay;
        trace!("Debouncing search '{}' for {:?}", query, delay);

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action(query).await;
        }));
    }

    /// Drop the pending action. Returns whether one was still outstanding.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let outstanding = !handle.is_finished();
                handle.abort();
                outstanding
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
