//! Fixed-point tick domain for prices and quantities
//!
//! External prices are scaled by [`TICK_PRECISION`] into signed integer
//! ticks. Every comparison the matching engine makes is integer; conversion
//! to floating point happens only at the market-data boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Scale factor between external prices and integer ticks.
pub const TICK_PRECISION: i64 = 100;

/// A price expressed in integer ticks (`price = ticks / TICK_PRECISION`).
///
/// Market orders carry the [`PriceTick::MARKET_BUY`] /
/// [`PriceTick::MARKET_SELL`] sentinels so they cross every contra level;
/// the sentinels are never valid resting prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTick(i64);

impl PriceTick {
    /// Sentinel limit for a market buy: crosses any ask.
    pub const MARKET_BUY: PriceTick = PriceTick(i64::MAX);
    /// Sentinel limit for a market sell: crosses any bid.
    pub const MARKET_SELL: PriceTick = PriceTick(i64::MIN);

    /// Create a price from raw ticks.
    pub const fn new(ticks: i64) -> Self {
        Self(ticks)
    }

    /// Convert an external price to ticks, rounding to the nearest tick.
    pub fn from_f64(price: f64) -> Self {
        Self((price * TICK_PRECISION as f64).round() as i64)
    }

    /// Presentation-only conversion back to a floating-point price.
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / TICK_PRECISION as f64
    }

    /// Raw tick count.
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// True for the market-order sentinels, which are not real price levels.
    pub const fn is_market_sentinel(self) -> bool {
        self.0 == i64::MAX || self.0 == i64::MIN
    }
}

impl fmt::Display for PriceTick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_market_sentinel() {
            return write!(f, "MARKET");
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let precision = TICK_PRECISION as u64;
        write!(f, "{sign}{}.{:02}", abs / precision, abs % precision)
    }
}

/// An order quantity in whole units.
///
/// Must be positive at order entry; decreases through fills and may reach
/// zero only transiently inside the engine (a resting order with zero
/// quantity is removed in the same step).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// Create a quantity from whole units.
    pub const fn new(units: u32) -> Self {
        Self(units)
    }

    /// Zero quantity, the fully-consumed state.
    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Widened accessor for volume aggregation.
    pub const fn as_u64(self) -> u64 {
        self.0 as u64
    }

    /// The smaller of two quantities; the fill size of a maker/taker pair.
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Quantity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        assert!(self.0 >= rhs.0, "Quantity subtraction would underflow");
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_round_trip() {
        let price = PriceTick::new(10150);
        assert_eq!(price.to_f64(), 101.5);
        assert_eq!(PriceTick::from_f64(101.5), price);
    }

    #[test]
    fn test_from_f64_rounds_to_nearest_tick() {
        assert_eq!(PriceTick::from_f64(101.504), PriceTick::new(10150));
        assert_eq!(PriceTick::from_f64(101.506), PriceTick::new(10151));
    }

    #[test]
    fn test_tick_ordering_is_integer() {
        assert!(PriceTick::new(10100) < PriceTick::new(10101));
        assert!(PriceTick::MARKET_BUY > PriceTick::new(i64::MAX - 1));
        assert!(PriceTick::MARKET_SELL < PriceTick::new(i64::MIN + 1));
    }

    #[test]
    fn test_market_sentinels() {
        assert!(PriceTick::MARKET_BUY.is_market_sentinel());
        assert!(PriceTick::MARKET_SELL.is_market_sentinel());
        assert!(!PriceTick::new(10000).is_market_sentinel());
    }

    #[test]
    fn test_tick_display() {
        assert_eq!(PriceTick::new(10150).to_string(), "101.50");
        assert_eq!(PriceTick::new(5).to_string(), "0.05");
        assert_eq!(PriceTick::new(-250).to_string(), "-2.50");
        assert_eq!(PriceTick::MARKET_BUY.to_string(), "MARKET");
    }

    #[test]
    fn test_tick_serialization() {
        let price = PriceTick::new(10150);
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "10150");

        let deserialized: PriceTick = serde_json::from_str(&json).unwrap();
        assert_eq!(price, deserialized);
    }

    #[test]
    fn test_quantity_arithmetic() {
        let q1 = Quantity::new(5);
        let q2 = Quantity::new(3);

        assert_eq!(q1 + q2, Quantity::new(8));
        assert_eq!(q1 - q2, Quantity::new(2));
        assert_eq!(q1.min(q2), q2);
    }

    #[test]
    #[should_panic(expected = "Quantity subtraction would underflow")]
    fn test_quantity_underflow_panics() {
        let _ = Quantity::new(1) - Quantity::new(2);
    }

    #[test]
    fn test_quantity_zero() {
        assert!(Quantity::zero().is_zero());
        assert!(!Quantity::new(1).is_zero());
    }
}
