//! Companion-matrix exponentiation for order-k recurrences.
//!
//! The state vector `(t(n+k-1), …, t(n))` advances by one index under
//! the k×k companion matrix of the coefficients; binary exponentiation
//! (square-and-multiply) jumps to any offset in O(k³ log m) big-int
//! multiplications.

use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::arith::mul;
use crate::ctl::ComputeCtl;
use crate::definition::RecurrenceDefinition;
use crate::solver::{SeqError, StateSolver};

/// Dense square matrix of `BigInt` values, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquareMatrix {
    size: usize,
    data: Vec<BigInt>,
}

impl SquareMatrix {
    /// Create the identity matrix of the given size.
    #[must_use]
    pub fn identity(size: usize) -> Self {
        let mut data = vec![BigInt::zero(); size * size];
        for i in 0..size {
            data[i * size + i] = BigInt::one();
        }
        Self { size, data }
    }

    /// Build the companion matrix of a definition's coefficients.
    ///
    /// Row 0 holds the coefficients; rows below carry the subdiagonal
    /// that shifts the state window.
    #[must_use]
    pub fn companion_of(definition: &RecurrenceDefinition) -> Self {
        let size = definition.order();
        let mut data = vec![BigInt::zero(); size * size];
        for (c, coefficient) in definition.coefficients().iter().enumerate() {
            data[c] = coefficient.clone();
        }
        for r in 1..size {
            data[r * size + (r - 1)] = BigInt::one();
        }
        Self { size, data }
    }

    /// Element at (row, col).
    #[must_use]
    pub fn at(&self, row: usize, col: usize) -> &BigInt {
        &self.data[row * self.size + col]
    }

    /// Standard matrix product.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        debug_assert_eq!(self.size, other.size);
        let size = self.size;
        let mut data = vec![BigInt::zero(); size * size];
        for r in 0..size {
            for c in 0..size {
                let mut acc = BigInt::zero();
                for l in 0..size {
                    let lhs = self.at(r, l);
                    if lhs.is_zero() {
                        continue;
                    }
                    acc += mul(lhs, other.at(l, c));
                }
                data[r * size + c] = acc;
            }
        }
        Self { size, data }
    }

    /// Check if this is the identity matrix.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::identity(self.size)
    }
}

/// Companion-matrix solver for arbitrary-order definitions.
pub struct CompanionMatrix;

impl CompanionMatrix {
    /// Create a new companion-matrix solver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for CompanionMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl StateSolver for CompanionMatrix {
    fn state_at(
        &self,
        definition: &RecurrenceDefinition,
        offset: u64,
        ctl: &ComputeCtl,
    ) -> Result<Vec<BigInt>, SeqError> {
        let k = definition.order();
        let base = SquareMatrix::companion_of(definition);
        let mut power = SquareMatrix::identity(k);

        // Binary exponentiation: square-and-multiply, MSB to LSB.
        let num_bits = 64 - offset.leading_zeros();
        for i in (0..num_bits).rev() {
            ctl.check()?;
            power = power.multiply(&power);
            if (offset >> i) & 1 == 1 {
                power = power.multiply(&base);
            }
        }

        // power · (seeds reversed) gives the state vector in descending
        // index order; read it back out ascending.
        let seeds = definition.initial_terms();
        let mut window = Vec::with_capacity(k);
        for j in 0..k {
            let row = k - 1 - j;
            let mut acc = BigInt::zero();
            for c in 0..k {
                acc += mul(power.at(row, c), &seeds[k - 1 - c]);
            }
            window.push(acc);
        }
        Ok(window)
    }

    fn name(&self) -> &'static str {
        "CompanionMatrix"
    }
}
