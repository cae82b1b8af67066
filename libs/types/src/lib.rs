//! Core domain types for the order book engine
//!
//! Shared vocabulary between the matching engine and its collaborators:
//! the fixed-point tick domain, identifier newtypes, order and fill
//! records, and the reject taxonomy.
//!
//! **Key Invariants:**
//! - All matching arithmetic is on integer ticks; floating point is a
//!   presentation concern only
//! - A `Fill` always carries the maker's resting price
//! - Reject reasons are value-encoded; no panic path crosses this crate's
//!   public boundary

pub mod errors;
pub mod fill;
pub mod ids;
pub mod order;
pub mod tick;

pub use errors::RejectReason;
pub use fill::Fill;
pub use ids::{OrderId, OwnerId};
pub use order::{Order, OrderType, Side, TimeInForce};
pub use tick::{PriceTick, Quantity, TICK_PRECISION};
