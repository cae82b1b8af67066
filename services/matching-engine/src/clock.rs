//! Monotonic nanosecond clock abstraction
//!
//! The engine stamps resting orders and fills itself; callers never supply
//! authoritative timestamps. [`SystemClock`] is the production source;
//! [`ManualClock`] gives tests and simulations full control over time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// A monotonic source of nanosecond timestamps.
pub trait Clock: Send + Sync {
    /// Current time in nanoseconds. Non-decreasing across calls.
    fn now_ns(&self) -> u64;
}

/// Wall-anchored monotonic clock.
///
/// Captures the wall time once at construction and advances it with
/// `Instant`, so timestamps are meaningful as epoch nanoseconds but can
/// never step backwards.
pub struct SystemClock {
    anchor_wall_ns: u64,
    anchor: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        let anchor_wall_ns = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self {
            anchor_wall_ns,
            anchor: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ns(&self) -> u64 {
        self.anchor_wall_ns + self.anchor.elapsed().as_nanos() as u64
    }
}

/// Hand-driven clock for deterministic tests.
pub struct ManualClock {
    now_ns: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ns: u64) -> Self {
        Self {
            now_ns: AtomicU64::new(start_ns),
        }
    }

    /// Advance time by `delta_ns`.
    pub fn advance(&self, delta_ns: u64) {
        self.now_ns.fetch_add(delta_ns, Ordering::Relaxed);
    }

    /// Jump to an absolute time. Must not move backwards.
    pub fn set(&self, now_ns: u64) {
        self.now_ns.store(now_ns, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_ns(&self) -> u64 {
        self.now_ns.load(Ordering::Relaxed)
    }
}
