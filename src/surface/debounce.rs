//! Single-slot cancellable timer.
//!
//! At most one callback is pending at a time. Arming while a callback is
//! pending replaces it, so a burst of arms yields one call `delay` after the
//! last arm. Dropping the timer cancels whatever is pending.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Callback run when the debounce window elapses.
pub type Callback = Arc<dyn Fn() + Send + Sync + 'static>;

/// Default debounce window after the last stroke ends.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct DebounceTimer {
    delay: Duration,
    runtime: Handle,
    pending: Option<JoinHandle<()>>,
}

impl DebounceTimer {
    /// Create a timer on the current tokio runtime.
    ///
    /// Returns `None` when called outside a runtime.
    pub fn new(delay: Duration) -> Option<Self> {
        Handle::try_current().ok().map(|h| Self::with_handle(delay, h))
    }

    /// Create a timer that schedules on `runtime`.
    pub fn with_handle(delay: Duration, runtime: Handle) -> Self {
        Self {
            delay,
            runtime,
            pending: None,
        }
    }

    /// Schedule `callback` to run after the delay, cancelling any callback
    /// that is still pending.
    pub fn arm(&mut self, callback: Callback) {
        if self.cancel() {
            log::debug!("debounce window restarted");
        }
        let delay = self.delay;
        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        }));
    }

    /// Cancel the pending callback. Returns true if one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                waiting
            }
            None => false,
        }
    }

    /// True while a callback is scheduled and has not run yet.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for DebounceTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebounceTimer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}
