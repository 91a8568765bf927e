//! Progress reporting and busy tracking for long-running operations.
//!
//! [`ProgressReporter`] lets callers observe paginated fetches. [`BusyFlag`]
//! marks a role (directory import, submission) as in flight so a shell can
//! disable re-triggering; the flag is released by an RAII guard so every exit
//! path clears it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Receives progress updates from a running operation
pub trait ProgressReporter: Send + Sync {
    /// Reports that `current` of `total` units are done.
    ///
    /// `total` is zero when the amount of work is not known up front.
    fn report(&self, current: usize, total: usize, message: &str);

    /// Returns true if the operation should stop early
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Reporter that discards every update
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpProgressReporter;

impl ProgressReporter for NoOpProgressReporter {
    fn report(&self, _current: usize, _total: usize, _message: &str) {}
}

/// Reporter that forwards updates to a closure
pub struct CallbackProgressReporter<F>
where
    F: Fn(usize, usize, &str) + Send + Sync,
{
    callback: F,
    cancelled: Arc<AtomicBool>,
}

impl<F> CallbackProgressReporter<F>
where
    F: Fn(usize, usize, &str) + Send + Sync,
{
    /// Creates a reporter around `callback`
    pub fn new(callback: F) -> Self {
        Self {
            callback,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Requests cancellation of the observed operation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

impl<F> ProgressReporter for CallbackProgressReporter<F>
where
    F: Fn(usize, usize, &str) + Send + Sync,
{
    fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl<F> std::fmt::Debug for CallbackProgressReporter<F>
where
    F: Fn(usize, usize, &str) + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackProgressReporter")
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Shared "operation in flight" flag.
///
/// Cloning shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    busy: Arc<AtomicBool>,
}

impl BusyFlag {
    /// Creates an idle flag
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while a guard is alive
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Marks the flag busy, or returns `None` if it already is
    #[must_use]
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard {
                busy: Arc::clone(&self.busy),
            })
    }
}

/// Clears its [`BusyFlag`] when dropped
#[derive(Debug)]
pub struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}
