//! The memoization cache.
//!
//! Per-key state machine: absent → pending → populated, or back to
//! absent after a failure. `get_or_compute` is the coordination
//! primitive: hits return immediately, concurrent misses for the same
//! key collapse into one computation, and the compute closure always
//! runs outside the cache-wide lock so long computations for one key
//! never block lookups for others.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

use num_bigint::BigInt;
use parking_lot::Mutex;
use tracing::debug;

use seqcalc_core::ctl::ComputeCtl;
use seqcalc_core::definition::RecurrenceDefinition;
use seqcalc_core::metrics::{MetricEvent, MetricsSink};
use seqcalc_core::solver::SeqError;

use crate::flight::Flight;
use crate::key::{CacheEntry, CacheKey};
use crate::store::LruStore;

struct CacheState {
    store: LruStore,
    pending: HashMap<CacheKey, Arc<Flight>>,
}

enum Role {
    Leader(Arc<Flight>),
    Joiner(Arc<Flight>),
}

/// Bounded term cache with single-flight de-duplication.
///
/// An explicitly owned resource — construct one per service and pass it
/// where it is needed; there is no process-wide instance.
pub struct MemoCache {
    state: Mutex<CacheState>,
    sink: Arc<dyn MetricsSink>,
}

impl MemoCache {
    /// Create a cache bounded to `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: NonZeroUsize, sink: Arc<dyn MetricsSink>) -> Self {
        Self {
            state: Mutex::new(CacheState {
                store: LruStore::with_capacity(capacity),
                pending: HashMap::new(),
            }),
            sink,
        }
    }

    /// Look up a key. A hit refreshes recency and is counted; a miss is
    /// counted and returns `None` without any other side effect.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let mut state = self.state.lock();
        let entry = state.store.get(key).cloned();
        drop(state);
        self.sink.record(if entry.is_some() {
            &MetricEvent::CacheHit
        } else {
            &MetricEvent::CacheMiss
        });
        entry
    }

    /// Return the cached value for `key`, computing it at most once.
    ///
    /// On a miss, the first caller becomes the leader and runs `compute`
    /// with no cache lock held; every concurrent caller for the same key
    /// joins the leader's flight and observes its result. Failures
    /// propagate to all waiters and are never cached, so the next
    /// request gets a fresh attempt.
    pub fn get_or_compute<F>(
        &self,
        key: CacheKey,
        ctl: &ComputeCtl,
        compute: F,
    ) -> Result<BigInt, SeqError>
    where
        F: FnOnce() -> Result<BigInt, SeqError>,
    {
        let role = {
            let mut state = self.state.lock();
            if let Some(entry) = state.store.get(&key) {
                let value = entry.value.clone();
                drop(state);
                self.sink.record(&MetricEvent::CacheHit);
                return Ok(value);
            }
            if let Some(flight) = state.pending.get(&key) {
                Role::Joiner(Arc::clone(flight))
            } else {
                let flight = Arc::new(Flight::new());
                state.pending.insert(key.clone(), Arc::clone(&flight));
                Role::Leader(flight)
            }
        };
        self.sink.record(&MetricEvent::CacheMiss);

        match role {
            Role::Joiner(flight) => flight.wait(ctl),
            Role::Leader(flight) => {
                let started = Instant::now();
                let result = compute();
                self.sink.record(&MetricEvent::Computation {
                    duration: started.elapsed(),
                });

                {
                    let mut state = self.state.lock();
                    state.pending.remove(&key);
                    if let Ok(value) = &result {
                        self.store_locked(&mut state, key, value.clone());
                    }
                }

                flight.publish(result.clone());
                result
            }
        }
    }

    /// Populate a key directly (the range-stepping path).
    pub fn insert(&self, key: CacheKey, value: BigInt) {
        let mut state = self.state.lock();
        self.store_locked(&mut state, key, value);
    }

    /// Remove every entry belonging to `definition`.
    ///
    /// In-flight computations are untouched: values are pure functions
    /// of their key, so a late publish stores what it always would have.
    pub fn invalidate(&self, definition: &RecurrenceDefinition) {
        let mut state = self.state.lock();
        let removed = state.store.remove_definition(definition);
        drop(state);
        debug!(removed, "cache invalidated for definition");
    }

    /// Number of populated entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().store.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.state.lock().store.capacity()
    }

    /// Presence check without touching recency.
    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.state.lock().store.contains(key)
    }

    fn store_locked(&self, state: &mut CacheState, key: CacheKey, value: BigInt) {
        if let Some((victim, _)) = state.store.insert(key, CacheEntry::new(value)) {
            self.sink.record(&MetricEvent::Eviction);
            debug!(index = victim.index, "evicted least-recently-used entry");
        }
    }
}
