//! Resting-order store
//!
//! The single owner of every resting order record, keyed by order id.
//! Ladder queues hold bare [`OrderId`] handles that resolve through this
//! store on each access; a handle dies the moment its record is removed,
//! and the caller must drop it from the queue in the same step.

use std::collections::HashMap;

use types::ids::OrderId;
use types::order::Order;

/// Id-indexed store of resting orders. O(1) average insert/lookup/erase;
/// iteration order is unspecified.
#[derive(Debug)]
pub struct OrderStore {
    orders: HashMap<OrderId, Order>,
}

impl OrderStore {
    /// Create a store pre-sized for `capacity` resting orders.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            orders: HashMap::with_capacity(capacity),
        }
    }

    /// Insert a resting record. Returns the displaced record if the id was
    /// already present (callers reject duplicates before this point).
    pub fn insert(&mut self, order: Order) -> Option<Order> {
        self.orders.insert(order.id, order)
    }

    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    pub fn get_mut(&mut self, id: &OrderId) -> Option<&mut Order> {
        self.orders.get_mut(id)
    }

    /// Remove and return the record, if present.
    pub fn remove(&mut self, id: &OrderId) -> Option<Order> {
        self.orders.remove(id)
    }

    pub fn contains(&self, id: &OrderId) -> bool {
        self.orders.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// All resting records, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }
}
