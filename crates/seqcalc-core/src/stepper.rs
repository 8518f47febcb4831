//! Linear stepping over a state window.
//!
//! Once the window at some index is known, each following term costs
//! O(order) big-int multiplications — far cheaper than re-running the
//! log-time solvers per index, and the path contiguous range requests
//! take.

use std::collections::VecDeque;

use num_bigint::BigInt;
use num_traits::Zero;

use crate::arith::mul;
use crate::ctl::ComputeCtl;
use crate::definition::RecurrenceDefinition;
use crate::solver::{SeqError, StateSolver};

/// Lazy iterator over consecutive terms of a recurrence.
///
/// Yields `(index, term)` pairs starting from the front of the supplied
/// state window.
///
/// # Example
/// ```
/// use seqcalc_core::definition::RecurrenceDefinition;
/// use seqcalc_core::stepper::SequenceIter;
///
/// let fib = RecurrenceDefinition::fibonacci();
/// let terms: Vec<_> = SequenceIter::from_start(&fib)
///     .take(7)
///     .map(|(_, v)| v.to_string())
///     .collect();
/// assert_eq!(terms, ["0", "1", "1", "2", "3", "5", "8"]);
/// ```
pub struct SequenceIter {
    window: VecDeque<BigInt>,
    coefficients: Vec<BigInt>,
    index: i64,
}

impl SequenceIter {
    /// Iterate from an arbitrary state window.
    ///
    /// `window` must hold the `order` consecutive terms starting at
    /// `start_index`.
    #[must_use]
    pub fn new(
        definition: &RecurrenceDefinition,
        window: Vec<BigInt>,
        start_index: i64,
    ) -> Self {
        debug_assert_eq!(window.len(), definition.order());
        Self {
            window: window.into(),
            coefficients: definition.coefficients().to_vec(),
            index: start_index,
        }
    }

    /// Iterate from the definition's seed terms.
    #[must_use]
    pub fn from_start(definition: &RecurrenceDefinition) -> Self {
        Self::new(
            definition,
            definition.initial_terms().to_vec(),
            definition.base_index(),
        )
    }

    fn next_term(&self) -> BigInt {
        let k = self.coefficients.len();
        let mut next = BigInt::zero();
        for (i, c) in self.coefficients.iter().enumerate() {
            next += mul(c, &self.window[k - 1 - i]);
        }
        next
    }
}

impl Iterator for SequenceIter {
    type Item = (i64, BigInt);

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.next_term();
        self.window.push_back(next);
        let value = self.window.pop_front().expect("window is never empty");
        let index = self.index;
        self.index += 1;
        Some((index, value))
    }
}

/// Reference solver: unroll the recurrence term by term.
///
/// The engine uses it for small offsets, where the doubling setup cost
/// outweighs O(m) additions; tests use it as the oracle every other
/// solver must agree with.
pub struct LinearUnroll;

impl LinearUnroll {
    /// Create a new linear-unroll solver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for LinearUnroll {
    fn default() -> Self {
        Self::new()
    }
}

impl StateSolver for LinearUnroll {
    fn state_at(
        &self,
        definition: &RecurrenceDefinition,
        offset: u64,
        ctl: &ComputeCtl,
    ) -> Result<Vec<BigInt>, SeqError> {
        let mut iter = SequenceIter::from_start(definition);
        for step in 0..offset {
            if step % 64 == 0 {
                ctl.check()?;
            }
            let next = iter.next_term();
            iter.window.push_back(next);
            iter.window.pop_front();
        }
        Ok(iter.window.into_iter().collect())
    }

    fn name(&self) -> &'static str {
        "LinearUnroll"
    }
}
