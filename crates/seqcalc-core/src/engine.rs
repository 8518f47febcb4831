//! Computation engine: dispatch and the small-offset fast path.
//!
//! `Engine` is the public front door consumed by the cache and the
//! coordinator. It checks the domain, then picks the cheapest solver:
//! linear unrolling for small offsets, Fast Doubling for order-2
//! definitions, the companion matrix otherwise. Computation is a pure
//! function of (definition, index) — this underwrites cache correctness.

use num_bigint::BigInt;

use crate::companion::CompanionMatrix;
use crate::constants::LINEAR_UNROLL_THRESHOLD;
use crate::ctl::ComputeCtl;
use crate::definition::RecurrenceDefinition;
use crate::fastdoubling::FastDoubling;
use crate::solver::{SeqError, StateSolver};
use crate::stepper::LinearUnroll;

/// Sequence computation engine.
///
/// # Example
/// ```
/// use seqcalc_core::ctl::ComputeCtl;
/// use seqcalc_core::definition::RecurrenceDefinition;
/// use seqcalc_core::engine::Engine;
///
/// let engine = Engine::new();
/// let fib = RecurrenceDefinition::fibonacci();
/// let value = engine.compute(&fib, 100, &ComputeCtl::unbounded()).unwrap();
/// assert_eq!(value.to_string(), "354224848179261915075");
/// ```
pub struct Engine {
    linear_threshold: u64,
    linear: LinearUnroll,
    doubling: FastDoubling,
    companion: CompanionMatrix,
}

impl Engine {
    /// Create an engine with the default linear-unroll threshold.
    #[must_use]
    pub fn new() -> Self {
        Self::with_linear_threshold(LINEAR_UNROLL_THRESHOLD)
    }

    /// Create an engine that unrolls linearly below the given offset.
    #[must_use]
    pub fn with_linear_threshold(linear_threshold: u64) -> Self {
        Self {
            linear_threshold,
            linear: LinearUnroll::new(),
            doubling: FastDoubling::new(),
            companion: CompanionMatrix::new(),
        }
    }

    /// Compute the term at `index`.
    ///
    /// Fails with `IndexOutOfDomain` when `index` precedes the
    /// definition's base index.
    pub fn compute(
        &self,
        definition: &RecurrenceDefinition,
        index: i64,
        ctl: &ComputeCtl,
    ) -> Result<BigInt, SeqError> {
        let mut window = self.state_at(definition, index, ctl)?;
        Ok(window.swap_remove(0))
    }

    /// Compute the state window `t(index) ..= t(index + order - 1)`.
    ///
    /// This is the seed for linear range stepping: a range request jumps
    /// here once, then advances one term per index.
    pub fn state_at(
        &self,
        definition: &RecurrenceDefinition,
        index: i64,
        ctl: &ComputeCtl,
    ) -> Result<Vec<BigInt>, SeqError> {
        if !definition.contains(index) {
            return Err(SeqError::IndexOutOfDomain {
                index,
                base_index: definition.base_index(),
            });
        }
        ctl.check()?;

        let offset = offset_from_base(definition, index);
        let solver: &dyn StateSolver = if offset < self.linear_threshold {
            &self.linear
        } else if definition.order() == 2 {
            &self.doubling
        } else {
            &self.companion
        };

        let window = solver.state_at(definition, offset, ctl)?;
        tracing::trace!(solver = solver.name(), index, "state window computed");
        Ok(window)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Offset of `index` above the base index.
///
/// The subtraction is done in i128: the difference of two i64 values
/// always fits u64 once the domain check has passed.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn offset_from_base(definition: &RecurrenceDefinition, index: i64) -> u64 {
    (i128::from(index) - i128::from(definition.base_index())) as u64
}
