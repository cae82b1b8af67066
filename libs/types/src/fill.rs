//! Fill execution record
//!
//! A [`Fill`] is an atomic exchange between a resting maker and an
//! incoming taker. The price is always the maker's resting price.

use crate::ids::OrderId;
use crate::tick::{PriceTick, Quantity};
use serde::{Deserialize, Serialize};

/// One execution between a maker and a taker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    /// The resting order that provided liquidity.
    pub maker_order_id: OrderId,
    /// The incoming order that consumed liquidity.
    pub taker_order_id: OrderId,
    /// Executed quantity; always positive.
    pub quantity: Quantity,
    /// Execution price — the maker's resting price.
    pub price: PriceTick,
    /// Execution time in nanoseconds.
    pub timestamp: u64,
}

impl Fill {
    pub fn new(
        maker_order_id: OrderId,
        taker_order_id: OrderId,
        quantity: Quantity,
        price: PriceTick,
        timestamp: u64,
    ) -> Self {
        Self {
            maker_order_id,
            taker_order_id,
            quantity,
            price,
            timestamp,
        }
    }

    /// Traded value in tick units (price ticks × quantity).
    pub fn notional_ticks(&self) -> i128 {
        self.price.as_i64() as i128 * self.quantity.as_u64() as i128
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_notional() {
        let fill = Fill::new(
            OrderId::new(1),
            OrderId::new(2),
            Quantity::new(4),
            PriceTick::new(10100),
            1_000,
        );
        assert_eq!(fill.notional_ticks(), 40_400);
    }

    #[test]
    fn test_fill_serialization() {
        let fill = Fill::new(
            OrderId::new(1),
            OrderId::new(2),
            Quantity::new(4),
            PriceTick::new(10100),
            1_000,
        );
        let json = serde_json::to_string(&fill).unwrap();
        let back: Fill = serde_json::from_str(&json).unwrap();
        assert_eq!(fill, back);
    }
}
