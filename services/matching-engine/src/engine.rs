//! Matching engine core
//!
//! The [`OrderBook`] facade: accepts incoming orders, walks the contra
//! ladder in price-time priority, emits fills, and rests residuals. One
//! exclusive lock serializes every operation; the registered fill handler
//! runs inside the critical section and must not call back into the book.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, trace};

use types::errors::RejectReason;
use types::fill::Fill;
use types::ids::{OrderId, OwnerId};
use types::order::{Order, Side, TimeInForce};
use types::tick::{PriceTick, Quantity};

use crate::book::price_level::PriceLevel;
use crate::book::{AskBook, BidBook, OrderStore};
use crate::clock::{Clock, SystemClock};
use crate::config::BookConfig;
use crate::matching::crossing;
use crate::matching::policy::SelfTradePolicy;
use crate::metrics::{EngineMetrics, StatsSnapshot};

/// Callback invoked synchronously for every fill, in execution order,
/// before the producing operation returns.
pub type FillHandler = Box<dyn FnMut(&Fill) + Send>;

/// Result of submitting an order.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitResult {
    /// Order accepted; fills in execution order (possibly empty). An
    /// accepted order may have rested, fully filled, or had its residual
    /// discarded per its time-in-force.
    Accepted(Vec<Fill>),
    /// Order refused; the book is unchanged and no counters moved.
    Rejected(RejectReason),
}

impl SubmitResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitResult::Accepted(_))
    }

    pub fn fills(&self) -> &[Fill] {
        match self {
            SubmitResult::Accepted(fills) => fills,
            SubmitResult::Rejected(_) => &[],
        }
    }

    pub fn into_fills(self) -> Vec<Fill> {
        match self {
            SubmitResult::Accepted(fills) => fills,
            SubmitResult::Rejected(_) => Vec::new(),
        }
    }
}

/// Result of modifying a resting order.
#[derive(Debug, Clone, PartialEq)]
pub enum ModifyResult {
    /// No resting order with that id.
    NotFound,
    /// New parameters failed validation; the original order still rests.
    Rejected(RejectReason),
    /// Order re-entered the book with new price/quantity and a new
    /// timestamp (time priority lost); fills from any immediate cross.
    Modified(Vec<Fill>),
}

impl ModifyResult {
    pub fn is_modified(&self) -> bool {
        matches!(self, ModifyResult::Modified(_))
    }

    pub fn fills(&self) -> &[Fill] {
        match self {
            ModifyResult::Modified(fills) => fills,
            _ => &[],
        }
    }
}

/// Everything the engine lock protects.
pub(crate) struct BookState {
    pub(crate) store: OrderStore,
    pub(crate) bids: BidBook,
    pub(crate) asks: AskBook,
    fill_handler: Option<FillHandler>,
}

/// What a single-level walk ended with.
#[derive(PartialEq)]
enum LevelOutcome {
    /// Level exhausted, taker done, or walk stopped; continue with the
    /// next crossable level.
    Continue,
    /// Self-trade policy cancelled the incoming order; matching ends and
    /// the residual is discarded.
    TakerCancelled,
}

/// Single-symbol limit order book with price-time priority matching.
///
/// Shared object: all methods take `&self` and serialize on one internal
/// lock. Counters and best-tick caches are atomics readable without the
/// lock (eventually consistent for unlocked readers).
pub struct OrderBook {
    state: Mutex<BookState>,
    clock: Arc<dyn Clock>,
    policy: SelfTradePolicy,
    metrics: EngineMetrics,
    order_count: AtomicU64,
    /// Best bid in ticks; `i64::MIN` when the side is empty.
    best_bid_tick: AtomicI64,
    /// Best ask in ticks; `i64::MAX` when the side is empty.
    best_ask_tick: AtomicI64,
}

impl OrderBook {
    /// Create a book with default configuration.
    pub fn new() -> Self {
        Self::with_config(BookConfig::default())
    }

    pub fn with_config(config: BookConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Create a book with an injected time source.
    pub fn with_clock(config: BookConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(BookState {
                store: OrderStore::with_capacity(config.max_orders),
                bids: BidBook::new(),
                asks: AskBook::new(),
                fill_handler: None,
            }),
            clock,
            policy: config.self_trade_policy,
            metrics: EngineMetrics::new(),
            order_count: AtomicU64::new(0),
            best_bid_tick: AtomicI64::new(i64::MIN),
            best_ask_tick: AtomicI64::new(i64::MAX),
        }
    }

    /// Submit an order for matching.
    ///
    /// Fills are produced best price first, FIFO within a level, and the
    /// registered fill handler sees each one before this returns. Residual
    /// quantity rests for GTC/GFD limit orders and is discarded for
    /// IOC/FOK and for market orders.
    pub fn submit_order(&self, order: Order) -> SubmitResult {
        let start_ns = self.clock.now_ns();
        let mut state = self.lock_state();
        let result = self.submit_locked(&mut state, order, start_ns);
        if let SubmitResult::Rejected(reason) = &result {
            debug!(order_id = %order.id, %reason, "order rejected");
        }
        result
    }

    /// Cancel a resting order. Returns false if the id is unknown.
    pub fn cancel_order(&self, id: OrderId) -> bool {
        let mut state = self.lock_state();
        let cancelled = self.cancel_locked(&mut state, &id);
        if cancelled {
            self.refresh_best_ticks(&state);
            trace!(order_id = %id, "order cancelled");
        } else {
            debug!(order_id = %id, "cancel of unknown order");
        }
        cancelled
    }

    /// Replace a resting order's price and quantity.
    ///
    /// Semantically cancel-then-resubmit under one lock acquisition: the
    /// order keeps its id, side, type, time-in-force, and owner, takes a
    /// new timestamp (time priority lost), and may match immediately like
    /// any new submit.
    pub fn modify_order(
        &self,
        id: OrderId,
        new_price: PriceTick,
        new_qty: Quantity,
    ) -> ModifyResult {
        let start_ns = self.clock.now_ns();
        let mut state = self.lock_state();

        let Some(original) = state.store.get(&id).copied() else {
            debug!(order_id = %id, "modify of unknown order");
            return ModifyResult::NotFound;
        };

        let mut modified = original;
        modified.price = new_price;
        modified.quantity = new_qty;
        if let Err(reason) = modified.validate() {
            debug!(order_id = %id, %reason, "modify rejected, original left resting");
            return ModifyResult::Rejected(reason);
        }

        self.cancel_locked(&mut state, &id);
        match self.submit_locked(&mut state, modified, start_ns) {
            SubmitResult::Accepted(fills) => ModifyResult::Modified(fills),
            SubmitResult::Rejected(reason) => ModifyResult::Rejected(reason),
        }
    }

    /// Cancel every resting order on one side. Produces no fills; returns
    /// the number of orders removed.
    pub fn cancel_all(&self, side: Side) -> usize {
        let mut state = self.lock_state();
        let ids: Vec<OrderId> = state
            .store
            .iter()
            .filter(|order| order.side == side)
            .map(|order| order.id)
            .collect();
        for id in &ids {
            self.cancel_locked(&mut state, id);
        }
        self.refresh_best_ticks(&state);
        debug!(?side, count = ids.len(), "cancelled side");
        ids.len()
    }

    /// End-of-session sweep: cancel every resting good-for-day order.
    /// Returns the number of orders removed.
    pub fn cancel_day_orders(&self) -> usize {
        let mut state = self.lock_state();
        let ids: Vec<OrderId> = state
            .store
            .iter()
            .filter(|order| order.tif == TimeInForce::GFD)
            .map(|order| order.id)
            .collect();
        for id in &ids {
            self.cancel_locked(&mut state, id);
        }
        self.refresh_best_ticks(&state);
        debug!(count = ids.len(), "swept day orders");
        ids.len()
    }

    /// Register the fill callback, replacing any prior handler.
    ///
    /// The handler runs while the engine lock is held: it must not call
    /// back into this book and should not block.
    pub fn set_fill_handler<F>(&self, handler: F)
    where
        F: FnMut(&Fill) + Send + 'static,
    {
        self.lock_state().fill_handler = Some(Box::new(handler));
    }

    /// Remove the fill callback.
    pub fn clear_fill_handler(&self) {
        self.lock_state().fill_handler = None;
    }

    /// Look up a resting order by id.
    pub fn get_order(&self, id: OrderId) -> Option<Order> {
        self.lock_state().store.get(&id).copied()
    }

    /// Number of resting orders. Lock-free read of the live counter.
    pub fn order_count(&self) -> usize {
        self.order_count.load(Ordering::Relaxed) as usize
    }

    /// Number of resting orders; alias of [`OrderBook::order_count`].
    pub fn len(&self) -> usize {
        self.order_count()
    }

    /// True when nothing rests on either side.
    pub fn is_empty(&self) -> bool {
        self.order_count() == 0
    }

    /// Cached best bid, readable without the lock.
    pub fn best_bid_tick(&self) -> Option<PriceTick> {
        let ticks = self.best_bid_tick.load(Ordering::Relaxed);
        (ticks != i64::MIN).then(|| PriceTick::new(ticks))
    }

    /// Cached best ask, readable without the lock.
    pub fn best_ask_tick(&self) -> Option<PriceTick> {
        let ticks = self.best_ask_tick.load(Ordering::Relaxed);
        (ticks != i64::MAX).then(|| PriceTick::new(ticks))
    }

    /// Snapshot of the engine counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.metrics.snapshot()
    }

    /// Zero all engine counters.
    pub fn reset_stats(&self) {
        self.metrics.reset();
    }

    /// A poisoned lock still guards a consistent book (every operation is
    /// total); recover the guard instead of propagating the panic.
    pub(crate) fn lock_state(&self) -> MutexGuard<'_, BookState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn submit_locked(
        &self,
        state: &mut BookState,
        order: Order,
        start_ns: u64,
    ) -> SubmitResult {
        if let Err(reason) = order.validate() {
            return SubmitResult::Rejected(reason);
        }
        if state.store.contains(&order.id) {
            return SubmitResult::Rejected(RejectReason::DuplicateOrderId);
        }
        if order.tif == TimeInForce::FOK && !self.can_fully_fill(state, &order) {
            return SubmitResult::Rejected(RejectReason::CannotFullyFill);
        }

        let mut fills = Vec::new();
        let mut remaining = order.quantity;
        let taker_cancelled = self.match_loop(state, &order, &mut remaining, &mut fills);

        if !remaining.is_zero() && !taker_cancelled {
            // Market residual never rests, whatever the time-in-force.
            let rests = !order.is_market()
                && matches!(order.tif, TimeInForce::GTC | TimeInForce::GFD);
            if rests {
                self.rest_order(state, &order, remaining);
            }
        }

        self.refresh_best_ticks(state);

        let end_ns = self.clock.now_ns();
        self.metrics.record_order(end_ns.saturating_sub(start_ns), end_ns);
        trace!(order_id = %order.id, fills = fills.len(), "order processed");
        SubmitResult::Accepted(fills)
    }

    /// Walk the contra ladder best level first. Returns true if the
    /// self-trade policy cancelled the incoming order.
    fn match_loop(
        &self,
        state: &mut BookState,
        taker: &Order,
        remaining: &mut Quantity,
        fills: &mut Vec<Fill>,
    ) -> bool {
        let limit = taker.effective_limit();
        let mut cursor: Option<PriceTick> = None;

        while !remaining.is_zero() {
            let price = match taker.side {
                Side::Buy => state.asks.next_crossable(cursor, limit),
                Side::Sell => state.bids.next_crossable(cursor, limit),
            };
            let Some(price) = price else { break };

            let outcome = self.match_level(state, taker, price, remaining, fills);

            let level_empty = match taker.side {
                Side::Buy => state.asks.level(price).map_or(true, |l| l.is_empty()),
                Side::Sell => state.bids.level(price).map_or(true, |l| l.is_empty()),
            };
            if level_empty {
                match taker.side {
                    Side::Buy => state.asks.remove_level(price),
                    Side::Sell => state.bids.remove_level(price),
                }
            }

            if outcome == LevelOutcome::TakerCancelled {
                debug!(order_id = %taker.id, "incoming order cancelled by self-trade policy");
                return true;
            }
            cursor = Some(price);
        }
        false
    }

    /// Consume one price level front-first until the taker is done, the
    /// level empties, or the self-trade policy stops the walk.
    fn match_level(
        &self,
        state: &mut BookState,
        taker: &Order,
        price: PriceTick,
        remaining: &mut Quantity,
        fills: &mut Vec<Fill>,
    ) -> LevelOutcome {
        let mut idx = 0;

        while !remaining.is_zero() {
            let maker_id = {
                let level = match taker.side {
                    Side::Buy => state.asks.level(price),
                    Side::Sell => state.bids.level(price),
                };
                match level.and_then(|l| l.get(idx)) {
                    Some(id) => id,
                    None => break,
                }
            };

            // Queue handles always resolve through the store; drop a
            // handle that does not.
            let Some(maker) = state.store.get(&maker_id).copied() else {
                self.drop_handle(state, taker.side, price, idx);
                continue;
            };

            if maker.owner == taker.owner {
                match self.policy {
                    SelfTradePolicy::StopAtOwn => break,
                    SelfTradePolicy::SkipOwn => {
                        idx += 1;
                        continue;
                    }
                    SelfTradePolicy::CancelOldest => {
                        state.store.remove(&maker_id);
                        self.drop_handle(state, taker.side, price, idx);
                        self.order_count.fetch_sub(1, Ordering::Relaxed);
                        debug!(order_id = %maker_id, "resting order cancelled by self-trade policy");
                        continue;
                    }
                    SelfTradePolicy::CancelNewest => return LevelOutcome::TakerCancelled,
                }
            }

            let fill_qty = (*remaining).min(maker.quantity);
            let fill = Fill::new(maker_id, taker.id, fill_qty, price, self.clock.now_ns());

            *remaining = *remaining - fill_qty;
            let maker_left = maker.quantity - fill_qty;
            if maker_left.is_zero() {
                state.store.remove(&maker_id);
                self.drop_handle(state, taker.side, price, idx);
                self.order_count.fetch_sub(1, Ordering::Relaxed);
            } else if let Some(resting) = state.store.get_mut(&maker_id) {
                resting.quantity = maker_left;
            }

            self.emit_fill(state, fill, fills);
        }

        LevelOutcome::Continue
    }

    /// Read-only feasibility pass for fill-or-kill: can the contra side
    /// cover the full quantity at crossable prices, ignoring the taker's
    /// own resting orders?
    fn can_fully_fill(&self, state: &BookState, taker: &Order) -> bool {
        let mut needed = taker.quantity.as_u64();
        let limit = taker.effective_limit();

        match taker.side {
            Side::Buy => {
                for (price, level) in state.asks.iter_best_first() {
                    if !crossing::taker_crosses(Side::Buy, limit, *price) {
                        break;
                    }
                    needed =
                        needed.saturating_sub(available_liquidity(state, level, taker.owner));
                    if needed == 0 {
                        return true;
                    }
                }
            }
            Side::Sell => {
                for (price, level) in state.bids.iter_best_first() {
                    if !crossing::taker_crosses(Side::Sell, limit, *price) {
                        break;
                    }
                    needed =
                        needed.saturating_sub(available_liquidity(state, level, taker.owner));
                    if needed == 0 {
                        return true;
                    }
                }
            }
        }

        needed == 0
    }

    /// Rest the residual at the tail of its price level with an
    /// engine-assigned timestamp.
    fn rest_order(&self, state: &mut BookState, order: &Order, remaining: Quantity) {
        let mut rested = *order;
        rested.quantity = remaining;
        rested.timestamp = self.clock.now_ns();

        match order.side {
            Side::Buy => state.bids.insert(order.price, order.id),
            Side::Sell => state.asks.insert(order.price, order.id),
        }
        state.store.insert(rested);
        self.order_count.fetch_add(1, Ordering::Relaxed);
        trace!(order_id = %order.id, price = %order.price, qty = %remaining, "order rested");
    }

    fn cancel_locked(&self, state: &mut BookState, id: &OrderId) -> bool {
        let Some(order) = state.store.remove(id) else {
            return false;
        };
        match order.side {
            Side::Buy => state.bids.remove(order.price, id),
            Side::Sell => state.asks.remove(order.price, id),
        };
        self.order_count.fetch_sub(1, Ordering::Relaxed);
        true
    }

    /// Remove the queue handle at `idx` from the contra side of `taker_side`.
    fn drop_handle(&self, state: &mut BookState, taker_side: Side, price: PriceTick, idx: usize) {
        let level = match taker_side {
            Side::Buy => state.asks.level_mut(price),
            Side::Sell => state.bids.level_mut(price),
        };
        if let Some(level) = level {
            level.remove_at(idx);
        }
    }

    fn emit_fill(&self, state: &mut BookState, fill: Fill, fills: &mut Vec<Fill>) {
        self.metrics.record_fill();
        if let Some(handler) = state.fill_handler.as_mut() {
            handler(&fill);
        }
        fills.push(fill);
    }

    /// Recompute both best-tick caches from the ladders. Runs inside the
    /// lock at the end of every mutating operation, so unlocked readers
    /// only ever see a value the book actually had.
    fn refresh_best_ticks(&self, state: &BookState) {
        let bid = state.bids.best_price().map_or(i64::MIN, PriceTick::as_i64);
        let ask = state.asks.best_price().map_or(i64::MAX, PriceTick::as_i64);
        self.best_bid_tick.store(bid, Ordering::Relaxed);
        self.best_ask_tick.store(ask, Ordering::Relaxed);
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

/// Liquidity in one level queue not owned by `taker_owner`.
fn available_liquidity(state: &BookState, level: &PriceLevel, taker_owner: OwnerId) -> u64 {
    level
        .iter()
        .filter_map(|id| state.store.get(id))
        .filter(|order| order.owner != taker_owner)
        .map(|order| order.quantity.as_u64())
        .sum()
}
