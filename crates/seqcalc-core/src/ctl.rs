//! Cooperative cancellation and per-request deadlines.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::solver::SeqError;

/// Cooperative cancellation token backed by an atomic flag.
///
/// # Example
/// ```
/// use seqcalc_core::ctl::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

/// Per-request computation control: a cancellation token plus an
/// optional absolute deadline.
///
/// Algorithms call [`ComputeCtl::check`] at each loop checkpoint; the
/// first violated condition wins (cancellation before timeout).
#[derive(Clone)]
pub struct ComputeCtl {
    token: CancellationToken,
    deadline: Option<Deadline>,
}

#[derive(Clone, Copy)]
struct Deadline {
    at: Instant,
    budget: Duration,
}

impl ComputeCtl {
    /// Control with no deadline and a fresh token.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Control with a deadline `timeout` from now and a fresh token.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(CancellationToken::new(), Some(timeout))
    }

    /// Control sharing an existing token, with an optional deadline.
    #[must_use]
    pub fn new(token: CancellationToken, timeout: Option<Duration>) -> Self {
        Self {
            token,
            deadline: timeout.map(|budget| Deadline {
                at: Instant::now() + budget,
                budget,
            }),
        }
    }

    /// The underlying cancellation token (e.g. for a Ctrl+C handler).
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Time remaining before the deadline, if one is set.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.at.saturating_duration_since(Instant::now()))
    }

    /// Checkpoint: fail with `Cancelled` or `Timeout` when due.
    pub fn check(&self) -> Result<(), SeqError> {
        if self.token.is_cancelled() {
            return Err(SeqError::Cancelled);
        }
        if let Some(d) = self.deadline {
            if Instant::now() >= d.at {
                return Err(SeqError::Timeout(format!("{:?}", d.budget)));
            }
        }
        Ok(())
    }
}

impl Default for ComputeCtl {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_cancel_propagates_through_clone() {
        let token = CancellationToken::new();
        let copy = token.clone();
        token.cancel();
        assert!(copy.is_cancelled());
    }

    #[test]
    fn unbounded_check_is_ok() {
        let ctl = ComputeCtl::unbounded();
        assert!(ctl.check().is_ok());
        assert!(ctl.remaining().is_none());
    }

    #[test]
    fn cancelled_check_fails() {
        let ctl = ComputeCtl::unbounded();
        ctl.token().cancel();
        assert!(matches!(ctl.check(), Err(SeqError::Cancelled)));
    }

    #[test]
    fn expired_deadline_times_out() {
        let ctl = ComputeCtl::with_timeout(Duration::ZERO);
        std::thread::sleep(Duration::from_millis(1));
        assert!(matches!(ctl.check(), Err(SeqError::Timeout(_))));
    }

    #[test]
    fn live_deadline_passes_and_reports_remaining() {
        let ctl = ComputeCtl::with_timeout(Duration::from_secs(60));
        assert!(ctl.check().is_ok());
        assert!(ctl.remaining().unwrap() > Duration::ZERO);
    }

    #[test]
    fn cancellation_wins_over_timeout() {
        let ctl = ComputeCtl::with_timeout(Duration::ZERO);
        ctl.token().cancel();
        std::thread::sleep(Duration::from_millis(1));
        assert!(matches!(ctl.check(), Err(SeqError::Cancelled)));
    }
}
