//! Self-trade prevention policy
//!
//! Decides what happens when an incoming order meets a resting order of
//! the same owner during the level walk. A fill between two orders of one
//! owner is never produced under any policy.

use serde::{Deserialize, Serialize};

/// Resolution for an own-order encounter at a price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelfTradePolicy {
    /// Stop processing the current level at the first own order; orders
    /// queued behind it at the same price are not reached. Matching
    /// continues at the next crossable level.
    #[default]
    StopAtOwn,
    /// Leave the own order in place and keep matching against the orders
    /// behind it in the queue.
    SkipOwn,
    /// Cancel the resting (older) order without a fill and keep matching
    /// at the same queue position.
    CancelOldest,
    /// Cancel the incoming (newer) order: matching ends and any residual
    /// is discarded rather than rested.
    CancelNewest,
}
