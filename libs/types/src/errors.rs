//! Reject taxonomy for order entry
//!
//! The engine reports failures as values, never as panics. A reject always
//! leaves the book unchanged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an order (or a modify) was refused at the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    /// Quantity must be strictly positive at entry.
    #[error("order quantity must be positive")]
    InvalidQuantity,

    /// Limit orders must carry a real tick, not a market sentinel.
    #[error("limit order price is not a valid tick")]
    InvalidPrice,

    /// The id is still attached to a live resting order.
    #[error("order id is already live in the book")]
    DuplicateOrderId,

    /// Fill-or-kill pre-check found insufficient contra liquidity.
    #[error("fill-or-kill order cannot be fully filled")]
    CannotFullyFill,
}
