//! Service configuration and limits.
//!
//! Consumed from an external config source (file, flags, environment —
//! owned by the caller); zero means "use the default" so partial
//! configs stay valid.

use std::time::Duration;

use serde::Deserialize;

use seqcalc_core::constants::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_COMPUTATION_TIMEOUT, DEFAULT_MAX_INDEX, DEFAULT_MAX_RANGE,
};

/// Resource limits and cache sizing for one coordinator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Bounded-cache capacity in entries.
    pub cache_capacity: usize,
    /// Largest index a request may ask for.
    pub max_index: i64,
    /// Largest contiguous range a single request may span.
    pub max_range: usize,
    /// Per-request computation deadline in milliseconds.
    pub computation_timeout_ms: u64,
}

impl Default for ServiceConfig {
    #[allow(clippy::cast_possible_truncation)]
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            max_index: DEFAULT_MAX_INDEX,
            max_range: DEFAULT_MAX_RANGE,
            computation_timeout_ms: DEFAULT_COMPUTATION_TIMEOUT.as_millis() as u64,
        }
    }
}

impl ServiceConfig {
    /// Normalize the config, applying defaults where values are zero.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        let defaults = Self::default();
        if self.cache_capacity == 0 {
            self.cache_capacity = defaults.cache_capacity;
        }
        if self.max_index == 0 {
            self.max_index = defaults.max_index;
        }
        if self.max_range == 0 {
            self.max_range = defaults.max_range;
        }
        if self.computation_timeout_ms == 0 {
            self.computation_timeout_ms = defaults.computation_timeout_ms;
        }
        self
    }

    /// The computation deadline as a `Duration`.
    #[must_use]
    pub fn computation_timeout(&self) -> Duration {
        Duration::from_millis(self.computation_timeout_ms)
    }
}
