//! Strict-LRU bounded store.
//!
//! Thin wrapper over `lru::LruCache` that distinguishes a same-key
//! replacement from a capacity eviction, so eviction metrics stay
//! honest.

use std::num::NonZeroUsize;

use lru::LruCache;
use seqcalc_core::definition::RecurrenceDefinition;

use crate::key::{CacheEntry, CacheKey};

pub(crate) struct LruStore {
    inner: LruCache<CacheKey, CacheEntry>,
}

impl LruStore {
    pub(crate) fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            inner: LruCache::new(capacity),
        }
    }

    /// Look up a key, marking it most-recently-used on a hit.
    pub(crate) fn get(&mut self, key: &CacheKey) -> Option<&CacheEntry> {
        self.inner.get(key)
    }

    /// Insert an entry, returning the evicted LRU victim if capacity was
    /// exceeded. A same-key replacement is not an eviction.
    pub(crate) fn insert(
        &mut self,
        key: CacheKey,
        entry: CacheEntry,
    ) -> Option<(CacheKey, CacheEntry)> {
        let inserted = key.clone();
        match self.inner.push(key, entry) {
            Some((victim, old)) if victim != inserted => Some((victim, old)),
            _ => None,
        }
    }

    /// Remove every entry belonging to the given definition.
    pub(crate) fn remove_definition(&mut self, definition: &RecurrenceDefinition) -> usize {
        let doomed: Vec<CacheKey> = self
            .inner
            .iter()
            .filter(|(key, _)| key.definition.as_ref() == definition)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &doomed {
            self.inner.pop(key);
        }
        doomed.len()
    }

    /// Presence check without touching recency.
    pub(crate) fn contains(&self, key: &CacheKey) -> bool {
        self.inner.peek(key).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.inner.cap().get()
    }
}
