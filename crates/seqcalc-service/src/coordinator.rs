//! Request coordination: limits, batch fan-out, range derivation.
//!
//! The coordinator owns the cache and engine (dependency injection, no
//! process-wide state) and is the only layer that enforces request
//! limits — everything below it trusts its inputs.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use num_bigint::BigInt;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::debug;

use seqcalc_cache::{CacheKey, MemoCache};
use seqcalc_core::arith;
use seqcalc_core::ctl::{CancellationToken, ComputeCtl};
use seqcalc_core::definition::RecurrenceDefinition;
use seqcalc_core::engine::Engine;
use seqcalc_core::metrics::MetricsSink;
use seqcalc_core::solver::SeqError;
use seqcalc_core::stepper::SequenceIter;

use crate::config::ServiceConfig;
use crate::registry::DefinitionRegistry;

/// Coordinates external requests across the cache and engine.
pub struct Coordinator {
    engine: Engine,
    cache: Arc<MemoCache>,
    registry: Arc<DefinitionRegistry>,
    config: ServiceConfig,
    cancel: CancellationToken,
}

impl Coordinator {
    /// Build a coordinator with its own cache.
    ///
    /// The config is normalized first, so zeroed fields fall back to
    /// defaults.
    #[must_use]
    pub fn new(
        config: ServiceConfig,
        registry: Arc<DefinitionRegistry>,
        sink: Arc<dyn MetricsSink>,
    ) -> Self {
        let config = config.normalize();
        let capacity =
            NonZeroUsize::new(config.cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            engine: Engine::new(),
            cache: Arc::new(MemoCache::with_capacity(capacity, sink)),
            registry,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// The coordinator's cache (shared with in-flight requests).
    #[must_use]
    pub fn cache(&self) -> &MemoCache {
        &self.cache
    }

    /// Token cancelling every request on this coordinator.
    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Resolve a batch of discrete indices.
    ///
    /// Independent indices fan out across threads; concurrent requests
    /// for the same index are collapsed by the cache's single-flight
    /// gate.
    pub fn resolve(
        &self,
        definition: &Arc<RecurrenceDefinition>,
        indices: &[i64],
    ) -> Result<BTreeMap<i64, BigInt>, SeqError> {
        for &index in indices {
            self.check_index(definition, index)?;
        }
        let ctl = self.request_ctl();
        debug!(count = indices.len(), "resolving index batch");

        indices
            .par_iter()
            .map(|&index| {
                let key = CacheKey::new(Arc::clone(definition), index);
                self.cache
                    .get_or_compute(key, &ctl, || self.engine.compute(definition, index, &ctl))
                    .map(|value| (index, value))
            })
            .collect()
    }

    /// Resolve the contiguous range `start ..= end`.
    ///
    /// The first `order` terms go through the cache (a warm cache skips
    /// the log-time jump); the rest derive by linear stepping, and every
    /// index touched is cached so later point queries in the span hit.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss
    )]
    pub fn resolve_range(
        &self,
        definition: &Arc<RecurrenceDefinition>,
        start: i64,
        end: i64,
    ) -> Result<Vec<BigInt>, SeqError> {
        if end < start {
            return Err(SeqError::LimitExceeded(format!(
                "inverted range {start}..={end}"
            )));
        }
        let span = i128::from(end) - i128::from(start) + 1;
        if span > self.config.max_range as i128 {
            return Err(SeqError::LimitExceeded(format!(
                "range of {span} terms exceeds maximum {}",
                self.config.max_range
            )));
        }
        self.check_index(definition, start)?;
        self.check_index(definition, end)?;

        let span = span as usize;
        let order = definition.order();
        let ctl = self.request_ctl();
        debug!(start, end, "resolving range");

        // Seed the state window through the cache.
        let seed_len = order.min(span);
        let mut window = Vec::with_capacity(seed_len);
        for j in 0..seed_len {
            let index = start + j as i64;
            let key = CacheKey::new(Arc::clone(definition), index);
            window.push(self.cache.get_or_compute(key, &ctl, || {
                self.engine.compute(definition, index, &ctl)
            })?);
        }
        if span <= order {
            return Ok(window);
        }

        // Derive the rest linearly, populating the cache as we go.
        let mut terms = window.clone();
        terms.reserve(span - order);
        for (index, value) in SequenceIter::new(definition, window, start)
            .skip(order)
            .take(span - order)
        {
            ctl.check()?;
            self.cache
                .insert(CacheKey::new(Arc::clone(definition), index), value.clone());
            terms.push(value);
        }
        Ok(terms)
    }

    /// Resolve a batch by definition id, as decimal strings.
    pub fn resolve_decimal(
        &self,
        definition_id: &str,
        indices: &[i64],
    ) -> Result<BTreeMap<i64, String>, SeqError> {
        let definition = self.registry.get(definition_id)?;
        let resolved = self.resolve(&definition, indices)?;
        Ok(resolved
            .iter()
            .map(|(index, value)| (*index, arith::to_decimal(value)))
            .collect())
    }

    /// Resolve a range by definition id, as decimal strings.
    pub fn resolve_range_decimal(
        &self,
        definition_id: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<String>, SeqError> {
        let definition = self.registry.get(definition_id)?;
        let terms = self.resolve_range(&definition, start, end)?;
        Ok(terms.iter().map(arith::to_decimal).collect())
    }

    /// Purge all cached terms of a definition.
    pub fn invalidate(&self, definition: &RecurrenceDefinition) {
        self.cache.invalidate(definition);
    }

    fn request_ctl(&self) -> ComputeCtl {
        ComputeCtl::new(self.cancel.clone(), Some(self.config.computation_timeout()))
    }

    fn check_index(
        &self,
        definition: &RecurrenceDefinition,
        index: i64,
    ) -> Result<(), SeqError> {
        if index > self.config.max_index {
            return Err(SeqError::LimitExceeded(format!(
                "index {index} exceeds maximum {}",
                self.config.max_index
            )));
        }
        if !definition.contains(index) {
            return Err(SeqError::IndexOutOfDomain {
                index,
                base_index: definition.base_index(),
            });
        }
        Ok(())
    }
}
