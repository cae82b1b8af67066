//! Order record and its classifying enums
//!
//! An [`Order`] is both the submission payload and the resting record; the
//! engine rewrites `quantity` and `timestamp` when it rests a residual.

use crate::errors::RejectReason;
use crate::ids::{OrderId, OwnerId};
use crate::tick::{PriceTick, Quantity};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Get the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Whether the order carries a price limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Limit,
    Market,
}

/// Time-in-force policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good-Till-Cancel: rests until filled or explicitly cancelled
    GTC,
    /// Immediate-Or-Cancel: match what crosses, discard the residual
    IOC,
    /// Fill-Or-Kill: all-or-nothing, pre-checked before any fill
    FOK,
    /// Good-For-Day: rests like GTC until the end-of-day sweep
    GFD,
}

/// A single order, as submitted and as rested.
///
/// `timestamp` is engine-assigned when the order rests; the caller's value
/// is informational only. Time priority within a price level follows the
/// engine-assigned value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub owner: OwnerId,
    pub side: Side,
    pub price: PriceTick,
    pub quantity: Quantity,
    pub kind: OrderType,
    pub tif: TimeInForce,
    /// Resting timestamp in nanoseconds, engine-assigned.
    pub timestamp: u64,
}

impl Order {
    /// Create a limit order.
    pub fn limit(
        id: OrderId,
        owner: OwnerId,
        side: Side,
        price: PriceTick,
        quantity: Quantity,
        tif: TimeInForce,
    ) -> Self {
        Self {
            id,
            owner,
            side,
            price,
            quantity,
            kind: OrderType::Limit,
            tif,
            timestamp: 0,
        }
    }

    /// Create a market order; the price is the side's crossing sentinel.
    pub fn market(
        id: OrderId,
        owner: OwnerId,
        side: Side,
        quantity: Quantity,
        tif: TimeInForce,
    ) -> Self {
        let price = match side {
            Side::Buy => PriceTick::MARKET_BUY,
            Side::Sell => PriceTick::MARKET_SELL,
        };
        Self {
            id,
            owner,
            side,
            price,
            quantity,
            kind: OrderType::Market,
            tif,
            timestamp: 0,
        }
    }

    pub fn is_market(&self) -> bool {
        self.kind == OrderType::Market
    }

    /// The price limit the order is willing to cross.
    ///
    /// Market orders always use the side sentinel regardless of the stored
    /// price field.
    pub fn effective_limit(&self) -> PriceTick {
        if self.is_market() {
            match self.side {
                Side::Buy => PriceTick::MARKET_BUY,
                Side::Sell => PriceTick::MARKET_SELL,
            }
        } else {
            self.price
        }
    }

    /// Gate-check the order before it touches the book.
    pub fn validate(&self) -> Result<(), RejectReason> {
        if self.quantity.is_zero() {
            return Err(RejectReason::InvalidQuantity);
        }
        if self.kind == OrderType::Limit && self.price.is_market_sentinel() {
            return Err(RejectReason::InvalidPrice);
        }
        Ok(())
    }
}
