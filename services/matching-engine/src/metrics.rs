//! Engine throughput and latency statistics
//!
//! Atomic counters written inside the engine's critical section and
//! readable without the lock; unlocked readers see eventually-consistent
//! values. Latency is a windowed running mean, and the per-second peak is
//! derived from second buckets of the engine clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

const LATENCY_WINDOW: usize = 1024;

/// Counters and gauges for one order book.
pub struct EngineMetrics {
    orders_processed: AtomicU64,
    fills_generated: AtomicU64,
    processing_ns: Mutex<LatencyTracker>,

    // Per-second throughput bucket; writers are serialized by the engine
    // lock, so plain load/store pairs are race-free.
    current_second: AtomicU64,
    orders_this_second: AtomicU64,
    peak_orders_per_second: AtomicU64,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self {
            orders_processed: AtomicU64::new(0),
            fills_generated: AtomicU64::new(0),
            processing_ns: Mutex::new(LatencyTracker::new(LATENCY_WINDOW)),
            current_second: AtomicU64::new(0),
            orders_this_second: AtomicU64::new(0),
            peak_orders_per_second: AtomicU64::new(0),
        }
    }

    /// Record one processed order: its critical-section latency and its
    /// contribution to the per-second throughput peak.
    pub fn record_order(&self, elapsed_ns: u64, now_ns: u64) {
        self.orders_processed.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut tracker) = self.processing_ns.lock() {
            tracker.record(elapsed_ns);
        }

        let second = now_ns / 1_000_000_000;
        let in_bucket = if self.current_second.load(Ordering::Relaxed) == second {
            self.orders_this_second.fetch_add(1, Ordering::Relaxed) + 1
        } else {
            self.current_second.store(second, Ordering::Relaxed);
            self.orders_this_second.store(1, Ordering::Relaxed);
            1
        };
        if in_bucket > self.peak_orders_per_second.load(Ordering::Relaxed) {
            self.peak_orders_per_second.store(in_bucket, Ordering::Relaxed);
        }
    }

    /// Record one generated fill.
    pub fn record_fill(&self) {
        self.fills_generated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn orders_processed(&self) -> u64 {
        self.orders_processed.load(Ordering::Relaxed)
    }

    pub fn fills_generated(&self) -> u64 {
        self.fills_generated.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        let avg = self
            .processing_ns
            .lock()
            .ok()
            .and_then(|tracker| tracker.average())
            .unwrap_or(0);

        StatsSnapshot {
            orders_processed: self.orders_processed.load(Ordering::Relaxed),
            fills_generated: self.fills_generated.load(Ordering::Relaxed),
            avg_processing_time_ns: avg,
            peak_orders_per_second: self.peak_orders_per_second.load(Ordering::Relaxed),
        }
    }

    /// Zero every counter and gauge.
    pub fn reset(&self) {
        self.orders_processed.store(0, Ordering::Relaxed);
        self.fills_generated.store(0, Ordering::Relaxed);
        if let Ok(mut tracker) = self.processing_ns.lock() {
            tracker.clear();
        }
        self.current_second.store(0, Ordering::Relaxed);
        self.orders_this_second.store(0, Ordering::Relaxed);
        self.peak_orders_per_second.store(0, Ordering::Relaxed);
    }
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable view of the engine counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub orders_processed: u64,
    pub fills_generated: u64,
    /// Windowed mean of critical-section time per submit.
    pub avg_processing_time_ns: u64,
    /// Highest number of orders processed within one clock second.
    pub peak_orders_per_second: u64,
}

/// Tracks latency samples over a sliding window.
pub struct LatencyTracker {
    samples: Vec<u64>,
    max_samples: usize,
}

impl LatencyTracker {
    pub fn new(max_samples: usize) -> Self {
        Self {
            samples: Vec::with_capacity(max_samples),
            max_samples,
        }
    }

    /// Record a latency sample, evicting the oldest past the window.
    pub fn record(&mut self, value: u64) {
        if self.samples.len() >= self.max_samples {
            self.samples.remove(0);
        }
        self.samples.push(value);
    }

    /// Mean over the window.
    pub fn average(&self) -> Option<u64> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: u64 = self.samples.iter().sum();
        Some(sum / self.samples.len() as u64)
    }

    /// Percentile (0-100) over the window.
    pub fn percentile(&self, p: usize) -> Option<u64> {
        if self.samples.is_empty() {
            return None;
        }

        let mut sorted = self.samples.clone();
        sorted.sort_unstable();

        let idx = (p as f64 / 100.0 * (sorted.len() - 1) as f64) as usize;
        Some(sorted[idx.min(sorted.len() - 1)])
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
