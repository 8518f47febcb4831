//! Solver trait and the engine error taxonomy.
//!
//! `StateSolver` is the internal trait implemented by the algorithms
//! (linear unrolling, fast doubling, companion matrix). `Engine` wraps
//! them with dispatch and the small-offset fast path.

use num_bigint::BigInt;

use crate::ctl::ComputeCtl;
use crate::definition::RecurrenceDefinition;

/// Error type for sequence computations.
///
/// Cloneable so a single failure can fan out to every waiter joined on
/// the same in-flight computation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SeqError {
    /// Malformed recurrence definition (caller bug, non-retryable).
    #[error("invalid definition: {0}")]
    InvalidDefinition(String),

    /// Requested index precedes the sequence's base index.
    #[error("index {index} is below the sequence domain (base index {base_index})")]
    IndexOutOfDomain {
        /// The requested index.
        index: i64,
        /// The definition's base index.
        base_index: i64,
    },

    /// Request exceeds a configured limit; retry with a smaller request.
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// Computation exceeded its deadline (transient, retryable).
    #[error("computation timed out after {0}")]
    Timeout(String),

    /// Computation was cancelled.
    #[error("computation cancelled")]
    Cancelled,

    /// Unexpected internal fault (logged, never cached).
    #[error("computation error: {0}")]
    Computation(String),
}

/// Internal trait for algorithms that can jump to an arbitrary offset.
///
/// A solver produces the *state window* at offset `m`: the `order`
/// consecutive terms `t(base+m) ..= t(base+m+order-1)`. The first
/// element is the requested term; the full window seeds linear stepping
/// for range requests.
pub trait StateSolver: Send + Sync {
    /// Compute the state window at the given offset from the base index.
    fn state_at(
        &self,
        definition: &RecurrenceDefinition,
        offset: u64,
        ctl: &ComputeCtl,
    ) -> Result<Vec<BigInt>, SeqError>;

    /// Get the name of this solver.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SeqError::InvalidDefinition("empty coefficients".into());
        assert_eq!(err.to_string(), "invalid definition: empty coefficients");

        let err = SeqError::IndexOutOfDomain {
            index: -3,
            base_index: 0,
        };
        assert_eq!(
            err.to_string(),
            "index -3 is below the sequence domain (base index 0)"
        );

        let err = SeqError::Cancelled;
        assert_eq!(err.to_string(), "computation cancelled");
    }

    #[test]
    fn errors_are_cloneable() {
        let err = SeqError::Timeout("30s".into());
        let copy = err.clone();
        assert_eq!(err.to_string(), copy.to_string());
    }
}
