//! Generalized Fast Doubling for order-2 recurrences.
//!
//! For `t(n) = p·t(n-1) + q·t(n-2)` the associated first-kind sequence
//! `U(0)=0, U(1)=1, U(n)=p·U(n-1)+q·U(n-2)` satisfies the doubling
//! identities
//!   U(2k)   = U(k)·(2·U(k+1) − p·U(k))
//!   U(2k+1) = U(k+1)² + q·U(k)²
//! and any seeds (a0, a1) recombine as
//!   t(b+m)   = a1·U(m) + a0·(U(m+1) − p·U(m))
//!   t(b+m+1) = a1·U(m+1) + a0·q·U(m)
//! Iterates over the offset's bits from MSB to LSB: O(log m) big-int
//! multiplications.

use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::arith::{mul, sqr};
use crate::ctl::ComputeCtl;
use crate::definition::RecurrenceDefinition;
use crate::solver::{SeqError, StateSolver};

/// Fast Doubling solver for order-2 definitions.
///
/// # Example
/// ```
/// use seqcalc_core::ctl::ComputeCtl;
/// use seqcalc_core::definition::RecurrenceDefinition;
/// use seqcalc_core::fastdoubling::FastDoubling;
/// use seqcalc_core::solver::StateSolver;
///
/// let fib = RecurrenceDefinition::fibonacci();
/// let window = FastDoubling::new()
///     .state_at(&fib, 100, &ComputeCtl::unbounded())
///     .unwrap();
/// assert_eq!(window[0].to_string(), "354224848179261915075");
/// ```
pub struct FastDoubling;

impl FastDoubling {
    /// Create a new Fast Doubling solver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Compute `(U(m), U(m+1))` of the associated sequence.
    fn associated_pair(
        p: &BigInt,
        q: &BigInt,
        m: u64,
        ctl: &ComputeCtl,
    ) -> Result<(BigInt, BigInt), SeqError> {
        let mut uk = BigInt::zero();
        let mut uk1 = BigInt::one();
        let num_bits = 64 - m.leading_zeros();

        for i in (0..num_bits).rev() {
            ctl.check()?;

            // Doubling step: (U(k), U(k+1)) -> (U(2k), U(2k+1))
            let d = (&uk1 << 1u32) - mul(p, &uk);
            let u2k = mul(&uk, &d);
            let u2k1 = sqr(&uk1) + mul(q, &sqr(&uk));

            if (m >> i) & 1 == 1 {
                // Odd bit: advance one more, (U(2k+1), U(2k+2))
                let u2k2 = mul(p, &u2k1) + mul(q, &u2k);
                uk = u2k1;
                uk1 = u2k2;
            } else {
                uk = u2k;
                uk1 = u2k1;
            }
        }

        Ok((uk, uk1))
    }
}

impl Default for FastDoubling {
    fn default() -> Self {
        Self::new()
    }
}

impl StateSolver for FastDoubling {
    fn state_at(
        &self,
        definition: &RecurrenceDefinition,
        offset: u64,
        ctl: &ComputeCtl,
    ) -> Result<Vec<BigInt>, SeqError> {
        debug_assert_eq!(definition.order(), 2, "fast doubling requires order 2");

        let p = &definition.coefficients()[0];
        let q = &definition.coefficients()[1];
        let a0 = &definition.initial_terms()[0];
        let a1 = &definition.initial_terms()[1];

        let (um, um1) = Self::associated_pair(p, q, offset, ctl)?;

        let t0 = mul(a1, &um) + mul(a0, &(&um1 - mul(p, &um)));
        let t1 = mul(a1, &um1) + mul(a0, &mul(q, &um));
        Ok(vec![t0, t1])
    }

    fn name(&self) -> &'static str {
        "FastDoubling"
    }
}
