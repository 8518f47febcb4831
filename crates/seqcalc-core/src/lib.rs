//! # seqcalc-core
//!
//! Core library for the SeqCalc-rs linear-recurrence sequence engine.
//! Implements generalized Fast Doubling (order 2), companion-matrix
//! exponentiation (order k), and linear stepping for contiguous ranges.

pub mod arith;
pub mod companion;
pub mod constants;
pub mod ctl;
pub mod definition;
pub mod engine;
pub mod fastdoubling;
pub mod metrics;
pub mod solver;
pub mod stepper;

// Re-exports
pub use constants::{exit_codes, DEFAULT_CACHE_CAPACITY, DEFAULT_MAX_INDEX, DEFAULT_MAX_RANGE};
pub use ctl::{CancellationToken, ComputeCtl};
pub use definition::RecurrenceDefinition;
pub use engine::Engine;
pub use metrics::{AtomicMetrics, MetricEvent, MetricsSink, NoOpSink};
pub use solver::{SeqError, StateSolver};

use num_bigint::BigInt;

/// Compute the `index`-th term of a recurrence definition.
///
/// This is a convenience function for simple use cases. For cancellation,
/// deadlines, or caching, use [`Engine`] (and the cache/service crates)
/// directly.
///
/// # Example
/// ```
/// use seqcalc_core::RecurrenceDefinition;
///
/// let fib = RecurrenceDefinition::fibonacci();
/// assert_eq!(seqcalc_core::term(&fib, 10).unwrap().to_string(), "55");
/// assert_eq!(seqcalc_core::term(&fib, 0).unwrap().to_string(), "0");
/// ```
pub fn term(definition: &RecurrenceDefinition, index: i64) -> Result<BigInt, SeqError> {
    Engine::new().compute(definition, index, &ComputeCtl::unbounded())
}
