//! Bid (buy-side) price ladder
//!
//! Buy levels keyed by price tick, iterated highest-first. Uses BTreeMap
//! for deterministic ordered iteration; each level is a FIFO of order
//! handles resolved through the store.

use std::collections::BTreeMap;

use types::ids::OrderId;
use types::tick::PriceTick;

use super::price_level::PriceLevel;

/// Buy side of the book. The best bid is the highest price.
#[derive(Debug, Default)]
pub struct BidBook {
    levels: BTreeMap<PriceTick, PriceLevel>,
}

impl BidBook {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Append an order handle at the tail of its price level, creating the
    /// level if needed.
    pub fn insert(&mut self, price: PriceTick, id: OrderId) {
        self.levels.entry(price).or_default().push_back(id);
    }

    /// Remove one handle; drops the level the moment it empties.
    /// Returns true if the handle was found.
    pub fn remove(&mut self, price: PriceTick, id: &OrderId) -> bool {
        if let Some(level) = self.levels.get_mut(&price) {
            if level.remove(id) {
                if level.is_empty() {
                    self.levels.remove(&price);
                }
                return true;
            }
        }
        false
    }

    /// Highest resting bid price.
    pub fn best_price(&self) -> Option<PriceTick> {
        self.levels.keys().next_back().copied()
    }

    pub fn level(&self, price: PriceTick) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    pub fn level_mut(&mut self, price: PriceTick) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    /// Drop a level wholesale (used when matching empties its queue).
    pub fn remove_level(&mut self, price: PriceTick) {
        self.levels.remove(&price);
    }

    /// Next level a sell taker limited at `limit` can cross, walking
    /// downward from `after` (exclusive) or from the top of the book.
    ///
    /// A bid level is crossable iff `level_price >= limit`.
    pub fn next_crossable(&self, after: Option<PriceTick>, limit: PriceTick) -> Option<PriceTick> {
        let entry = match after {
            None => self.levels.range(limit..).next_back(),
            Some(p) => self.levels.range(limit..p).next_back(),
        };
        entry.map(|(price, _)| *price)
    }

    /// Levels from best (highest) to worst.
    pub fn iter_best_first(&self) -> impl Iterator<Item = (&PriceTick, &PriceLevel)> {
        self.levels.iter().rev()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
