//! Metrics hooks emitted by the cache and coordinator.
//!
//! The engine side only *emits* — an external collector consumes. Sinks
//! must never block the caller: the channel sink drops on a full
//! channel, the atomic sink is lock-free.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single observable transition in the engine.
#[derive(Debug, Clone)]
pub enum MetricEvent {
    /// A lookup found its key in the cache.
    CacheHit,
    /// A lookup did not find its key.
    CacheMiss,
    /// A least-recently-used entry was removed to make room.
    Eviction,
    /// One computation finished (successfully or not).
    Computation {
        /// Wall-clock duration of the computation.
        duration: Duration,
    },
}

/// Sink for metric events.
pub trait MetricsSink: Send + Sync {
    /// Record one event.
    fn record(&self, event: &MetricEvent);
}

/// Null object pattern — discards all events.
pub struct NoOpSink;

impl NoOpSink {
    /// Create a new no-op sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSink for NoOpSink {
    fn record(&self, _event: &MetricEvent) {
        // Intentionally empty
    }
}

/// Sink that logs events through `tracing`.
pub struct LoggingSink;

impl LoggingSink {
    /// Create a new logging sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoggingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSink for LoggingSink {
    #[allow(clippy::cast_possible_truncation)]
    fn record(&self, event: &MetricEvent) {
        match event {
            MetricEvent::CacheHit => debug!("cache hit"),
            MetricEvent::CacheMiss => debug!("cache miss"),
            MetricEvent::Eviction => debug!("cache eviction"),
            MetricEvent::Computation { duration } => {
                debug!(duration_us = duration.as_micros() as u64, "computation finished");
            }
        }
    }
}

/// Sink that forwards events through a channel (non-blocking).
pub struct ChannelSink {
    sender: Sender<MetricEvent>,
}

impl ChannelSink {
    /// Create a new channel sink.
    #[must_use]
    pub fn new(sender: Sender<MetricEvent>) -> Self {
        Self { sender }
    }
}

impl MetricsSink for ChannelSink {
    fn record(&self, event: &MetricEvent) {
        // Drop rather than block when the collector lags.
        let _ = self.sender.try_send(event.clone());
    }
}

/// Lock-free counter registry with a pull-style snapshot.
#[derive(Default)]
pub struct AtomicMetrics {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    computations: AtomicU64,
    compute_nanos: AtomicU64,
}

impl AtomicMetrics {
    /// Create a zeroed registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot current counter values.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            computations: self.computations.load(Ordering::Relaxed),
            total_compute_nanos: self.compute_nanos.load(Ordering::Relaxed),
        }
    }
}

impl MetricsSink for AtomicMetrics {
    #[allow(clippy::cast_possible_truncation)]
    fn record(&self, event: &MetricEvent) {
        match event {
            MetricEvent::CacheHit => {
                self.hits.fetch_add(1, Ordering::Relaxed);
            }
            MetricEvent::CacheMiss => {
                self.misses.fetch_add(1, Ordering::Relaxed);
            }
            MetricEvent::Eviction => {
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
            MetricEvent::Computation { duration } => {
                self.computations.fetch_add(1, Ordering::Relaxed);
                self.compute_nanos
                    .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
            }
        }
    }
}

/// Point-in-time view of the counters, serializable for collectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Cache lookups that found their key.
    pub hits: u64,
    /// Cache lookups that did not.
    pub misses: u64,
    /// Entries evicted to stay within capacity.
    pub evictions: u64,
    /// Completed computations.
    pub computations: u64,
    /// Total wall-clock time spent computing, in nanoseconds.
    pub total_compute_nanos: u64,
}

impl MetricsSnapshot {
    /// Hit rate in [0.0, 1.0]; 0.0 when there were no lookups.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_does_nothing() {
        NoOpSink::new().record(&MetricEvent::CacheHit);
    }

    #[test]
    fn atomic_metrics_count_events() {
        let metrics = AtomicMetrics::new();
        metrics.record(&MetricEvent::CacheHit);
        metrics.record(&MetricEvent::CacheHit);
        metrics.record(&MetricEvent::CacheMiss);
        metrics.record(&MetricEvent::Eviction);
        metrics.record(&MetricEvent::Computation {
            duration: Duration::from_micros(250),
        });

        let snap = metrics.snapshot();
        assert_eq!(snap.hits, 2);
        assert_eq!(snap.misses, 1);
        assert_eq!(snap.evictions, 1);
        assert_eq!(snap.computations, 1);
        assert_eq!(snap.total_compute_nanos, 250_000);
    }

    #[test]
    fn hit_rate() {
        let metrics = AtomicMetrics::new();
        assert!((metrics.snapshot().hit_rate() - 0.0).abs() < f64::EPSILON);

        metrics.record(&MetricEvent::CacheHit);
        metrics.record(&MetricEvent::CacheHit);
        metrics.record(&MetricEvent::CacheHit);
        metrics.record(&MetricEvent::CacheMiss);
        assert!((metrics.snapshot().hit_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn channel_sink_forwards() {
        let (tx, rx) = crossbeam_channel::bounded(4);
        let sink = ChannelSink::new(tx);
        sink.record(&MetricEvent::CacheMiss);
        assert!(matches!(rx.try_recv(), Ok(MetricEvent::CacheMiss)));
    }

    #[test]
    fn channel_sink_full_channel_does_not_block() {
        let (tx, _rx) = crossbeam_channel::bounded(1);
        let sink = ChannelSink::new(tx);
        sink.record(&MetricEvent::CacheHit);
        sink.record(&MetricEvent::CacheHit); // silently dropped
    }

    #[test]
    fn snapshot_serializes() {
        let metrics = AtomicMetrics::new();
        metrics.record(&MetricEvent::CacheMiss);
        let json = serde_json::to_string(&metrics.snapshot()).unwrap();
        let back: MetricsSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.misses, 1);
    }

    #[test]
    fn logging_sink_does_not_panic() {
        let sink = LoggingSink::new();
        sink.record(&MetricEvent::Computation {
            duration: Duration::from_millis(3),
        });
        sink.record(&MetricEvent::Eviction);
    }
}
