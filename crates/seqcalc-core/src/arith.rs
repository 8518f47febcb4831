//! Arbitrary-precision arithmetic seam.
//!
//! All large multiplications in the engine go through `mul`/`sqr` so a
//! faster backend (FFT, GMP) can be swapped in behind one seam. Decimal
//! conversion lives here because it is the only external representation
//! the engine owns.

use num_bigint::BigInt;

use crate::solver::SeqError;

/// Multiply two arbitrary-precision integers.
#[inline]
#[must_use]
pub fn mul(a: &BigInt, b: &BigInt) -> BigInt {
    a * b
}

/// Square an arbitrary-precision integer.
#[inline]
#[must_use]
pub fn sqr(a: &BigInt) -> BigInt {
    a * a
}

/// Render a value as a decimal string (the external representation).
#[must_use]
pub fn to_decimal(value: &BigInt) -> String {
    value.to_str_radix(10)
}

/// Parse a decimal string into a `BigInt`.
pub fn parse_decimal(text: &str) -> Result<BigInt, SeqError> {
    text.trim()
        .parse::<BigInt>()
        .map_err(|_| SeqError::InvalidDefinition(format!("not a decimal integer: {text:?}")))
}
