//! Market-data reads over the live book
//!
//! Read-only derivations: best prices, depth snapshots, per-side volume,
//! and the cross-weighted mid. Floating point appears here and only here;
//! prices inside the engine stay integer ticks. Each read acquires the
//! engine lock for its whole critical section.

use serde::{Deserialize, Serialize};

use types::order::Side;
use types::tick::PriceTick;

use crate::book::{OrderStore, PriceLevel};
use crate::engine::OrderBook;

/// One row of a depth snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    /// The price of this level.
    pub price: PriceTick,
    /// Total resting quantity across all orders at this level.
    pub total_quantity: u64,
    /// Number of orders resting at this level.
    pub order_count: u32,
}

/// Both sides of the book, best level first, to a bounded depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthSnapshot {
    /// Bid levels in descending price order (best first).
    pub bids: Vec<LevelInfo>,
    /// Ask levels in ascending price order (best first).
    pub asks: Vec<LevelInfo>,
}

impl OrderBook {
    /// Best bid as a floating-point price; −1.0 if the bid side is empty.
    pub fn best_bid(&self) -> f64 {
        let state = self.lock_state();
        state.bids.best_price().map_or(-1.0, PriceTick::to_f64)
    }

    /// Best ask as a floating-point price; −1.0 if the ask side is empty.
    pub fn best_ask(&self) -> f64 {
        let state = self.lock_state();
        state.asks.best_price().map_or(-1.0, PriceTick::to_f64)
    }

    /// Up to `depth` levels on one side, ordered best to worst.
    pub fn top_levels(&self, side: Side, depth: usize) -> Vec<LevelInfo> {
        let state = self.lock_state();
        match side {
            Side::Buy => collect_levels(state.bids.iter_best_first(), &state.store, depth),
            Side::Sell => collect_levels(state.asks.iter_best_first(), &state.store, depth),
        }
    }

    /// Both sides at once, under a single lock acquisition.
    pub fn depth_snapshot(&self, depth: usize) -> DepthSnapshot {
        let state = self.lock_state();
        DepthSnapshot {
            bids: collect_levels(state.bids.iter_best_first(), &state.store, depth),
            asks: collect_levels(state.asks.iter_best_first(), &state.store, depth),
        }
    }

    /// Sum of resting quantity on one side.
    pub fn total_volume(&self, side: Side) -> u64 {
        let state = self.lock_state();
        match side {
            Side::Buy => state
                .bids
                .iter_best_first()
                .map(|(_, level)| level_quantity(level, &state.store))
                .sum(),
            Side::Sell => state
                .asks
                .iter_best_first()
                .map(|(_, level)| level_quantity(level, &state.store))
                .sum(),
        }
    }

    /// Cross-weighted mid: each best price weighted by the opposite
    /// side's top-level volume, biasing the mid toward the larger side.
    ///
    /// Returns −1.0 when the book is one-sided or empty; the plain mid
    /// when both top-level volumes are zero.
    pub fn weighted_mid_price(&self) -> f64 {
        let state = self.lock_state();
        let (Some(bid_tick), Some(ask_tick)) = (state.bids.best_price(), state.asks.best_price())
        else {
            return -1.0;
        };

        let bid = bid_tick.to_f64();
        let ask = ask_tick.to_f64();
        let bid_vol = state
            .bids
            .level(bid_tick)
            .map_or(0, |level| level_quantity(level, &state.store));
        let ask_vol = state
            .asks
            .level(ask_tick)
            .map_or(0, |level| level_quantity(level, &state.store));

        if bid_vol + ask_vol == 0 {
            return (bid + ask) / 2.0;
        }
        (bid * ask_vol as f64 + ask * bid_vol as f64) / (bid_vol + ask_vol) as f64
    }

    /// Arithmetic mid of the best prices; None when one-sided.
    pub fn mid_price(&self) -> Option<f64> {
        let state = self.lock_state();
        match (state.bids.best_price(), state.asks.best_price()) {
            (Some(bid), Some(ask)) => Some((bid.to_f64() + ask.to_f64()) / 2.0),
            _ => None,
        }
    }

    /// Best ask minus best bid; None when one-sided.
    pub fn spread(&self) -> Option<f64> {
        let state = self.lock_state();
        match (state.bids.best_price(), state.asks.best_price()) {
            (Some(bid), Some(ask)) => Some(ask.to_f64() - bid.to_f64()),
            _ => None,
        }
    }
}

fn collect_levels<'a>(
    levels: impl Iterator<Item = (&'a PriceTick, &'a PriceLevel)>,
    store: &OrderStore,
    depth: usize,
) -> Vec<LevelInfo> {
    levels
        .take(depth)
        .map(|(price, level)| LevelInfo {
            price: *price,
            total_quantity: level_quantity(level, store),
            order_count: level.len() as u32,
        })
        .collect()
}

/// Resolve a level's queue through the store and sum the live quantities.
fn level_quantity(level: &PriceLevel, store: &OrderStore) -> u64 {
    level
        .iter()
        .filter_map(|id| store.get(id))
        .map(|order| order.quantity.as_u64())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::BookConfig;
    use std::sync::Arc;
    use types::ids::{OrderId, OwnerId};
    use types::order::{Order, TimeInForce};
    use types::tick::Quantity;

    fn book() -> OrderBook {
        OrderBook::with_clock(
            BookConfig::default(),
            Arc::new(ManualClock::new(1_000_000)),
        )
    }

    fn rest(book: &OrderBook, id: u64, owner: u32, side: Side, price: i64, qty: u32) {
        book.submit_order(Order::limit(
            OrderId::new(id),
            OwnerId::new(owner),
            side,
            PriceTick::new(price),
            Quantity::new(qty),
            TimeInForce::GTC,
        ));
    }

    #[test]
    fn test_empty_book_sentinels() {
        let book = book();
        assert_eq!(book.best_bid(), -1.0);
        assert_eq!(book.best_ask(), -1.0);
        assert_eq!(book.weighted_mid_price(), -1.0);
        assert!(book.mid_price().is_none());
        assert!(book.spread().is_none());
        assert_eq!(book.total_volume(Side::Buy), 0);
    }

    #[test]
    fn test_best_prices_as_floats() {
        let book = book();
        rest(&book, 1, 1, Side::Buy, 9900, 10);
        rest(&book, 2, 2, Side::Sell, 10100, 40);

        assert_eq!(book.best_bid(), 99.0);
        assert_eq!(book.best_ask(), 101.0);
        assert_eq!(book.spread(), Some(2.0));
        assert_eq!(book.mid_price(), Some(100.0));
    }

    #[test]
    fn test_one_sided_book_weighted_mid_sentinel() {
        let book = book();
        rest(&book, 1, 1, Side::Buy, 9900, 10);
        assert_eq!(book.weighted_mid_price(), -1.0);
    }

    #[test]
    fn test_weighted_mid_biases_toward_larger_side() {
        let book = book();
        rest(&book, 1, 1, Side::Buy, 9900, 10);
        rest(&book, 2, 2, Side::Sell, 10100, 40);

        // (99·40 + 101·10) / 50 = 99.40
        let mid = book.weighted_mid_price();
        assert!((mid - 99.40).abs() < 1e-9);
    }

    #[test]
    fn test_top_levels_order_and_aggregation() {
        let book = book();
        rest(&book, 1, 1, Side::Buy, 9900, 10);
        rest(&book, 2, 2, Side::Buy, 9900, 5);
        rest(&book, 3, 3, Side::Buy, 9800, 7);
        rest(&book, 4, 4, Side::Buy, 10000, 1);

        let levels = book.top_levels(Side::Buy, 2);
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].price, PriceTick::new(10000));
        assert_eq!(levels[0].total_quantity, 1);
        assert_eq!(levels[1].price, PriceTick::new(9900));
        assert_eq!(levels[1].total_quantity, 15);
        assert_eq!(levels[1].order_count, 2);
    }

    #[test]
    fn test_ask_levels_ascend() {
        let book = book();
        rest(&book, 1, 1, Side::Sell, 10200, 3);
        rest(&book, 2, 2, Side::Sell, 10100, 4);

        let levels = book.top_levels(Side::Sell, 10);
        assert_eq!(levels[0].price, PriceTick::new(10100));
        assert_eq!(levels[1].price, PriceTick::new(10200));
    }

    #[test]
    fn test_total_volume_per_side() {
        let book = book();
        rest(&book, 1, 1, Side::Buy, 9900, 10);
        rest(&book, 2, 2, Side::Buy, 9800, 5);
        rest(&book, 3, 3, Side::Sell, 10100, 7);

        assert_eq!(book.total_volume(Side::Buy), 15);
        assert_eq!(book.total_volume(Side::Sell), 7);
    }

    #[test]
    fn test_depth_snapshot_both_sides() {
        let book = book();
        rest(&book, 1, 1, Side::Buy, 9900, 10);
        rest(&book, 2, 2, Side::Sell, 10100, 40);

        let snapshot = book.depth_snapshot(5);
        assert_eq!(snapshot.bids.len(), 1);
        assert_eq!(snapshot.asks.len(), 1);
        assert_eq!(snapshot.bids[0].price, PriceTick::new(9900));
    }

    #[test]
    fn test_depth_snapshot_serialization() {
        let book = book();
        rest(&book, 1, 1, Side::Buy, 9900, 10);

        let snapshot = book.depth_snapshot(5);
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: DepthSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, back);
    }
}
