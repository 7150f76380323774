//! Cancellation and deadline plumbing for the serve loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Governs how long [`Server::serve`](crate::Server::serve) keeps
/// running: an optional absolute deadline plus a cancellation flag that
/// can be flipped from any thread through a clone.
///
/// Both only gate the blocking receive; packets already handed to the
/// dispatcher, and bundles already scheduled, run to completion.
#[derive(Clone)]
pub struct ServeContext {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl ServeContext {
    /// A context with no deadline; the loop runs until cancelled or a
    /// fatal transport error.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            ..Self::new()
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Requests the serve loop to stop. Takes effect at the next poll
    /// tick; in-flight dispatches are not retracted.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Time left until the deadline; `None` when no deadline was set.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn deadline_elapsed(&self) -> bool {
        matches!(self.remaining(), Some(remaining) if remaining.is_zero())
    }
}

impl Default for ServeContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_is_visible_across_clones() {
        let ctx = ServeContext::new();
        let clone = ctx.clone();
        assert!(!ctx.is_cancelled());

        clone.cancel();
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn deadline_elapses() {
        let ctx = ServeContext::with_deadline(Instant::now());
        assert!(ctx.deadline_elapsed());
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));

        let ctx = ServeContext::with_timeout(Duration::from_secs(60));
        assert!(!ctx.deadline_elapsed());
    }

    #[test]
    fn no_deadline_means_no_remaining() {
        assert_eq!(ServeContext::new().remaining(), None);
        assert!(!ServeContext::new().deadline_elapsed());
    }
}
