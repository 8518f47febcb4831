//! Cache keys and entries.

use std::sync::Arc;
use std::time::Instant;

use num_bigint::BigInt;
use seqcalc_core::definition::RecurrenceDefinition;

/// Identity of one cached term: (definition identity, term index).
///
/// Definitions are compared and hashed by value, so two independently
/// constructed but identical definitions share cache entries; the `Arc`
/// only avoids cloning the definition per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// The recurrence this term belongs to.
    pub definition: Arc<RecurrenceDefinition>,
    /// The term index.
    pub index: i64,
}

impl CacheKey {
    /// Create a key for `definition`'s term at `index`.
    #[must_use]
    pub fn new(definition: Arc<RecurrenceDefinition>, index: i64) -> Self {
        Self { definition, index }
    }
}

/// One cached term. Never mutated after creation — values are pure
/// functions of their key.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The computed term.
    pub value: BigInt,
    /// When the computation finished.
    pub computed_at: Instant,
}

impl CacheEntry {
    /// Create an entry stamped now.
    #[must_use]
    pub fn new(value: BigInt) -> Self {
        Self {
            value,
            computed_at: Instant::now(),
        }
    }
}
