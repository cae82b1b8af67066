//! Crossing detection logic
//!
//! Determines when a taker's limit is compatible with a contra level.
//! Market orders carry the side sentinels, so the same comparisons cover
//! them without special cases.

use types::order::Side;
use types::tick::PriceTick;

/// Check if a bid and an ask can trade: bid must be at or above the ask.
pub fn can_match(bid_price: PriceTick, ask_price: PriceTick) -> bool {
    bid_price >= ask_price
}

/// Check if a taker limited at `taker_limit` crosses a contra level.
///
/// Buy takers cross levels priced at or below their limit; sell takers
/// cross levels priced at or above it. Both directions reduce to the
/// bid-versus-ask check in [`can_match`].
pub fn taker_crosses(side: Side, taker_limit: PriceTick, level_price: PriceTick) -> bool {
    match side {
        Side::Buy => can_match(taker_limit, level_price),
        Side::Sell => can_match(level_price, taker_limit),
    }
}
