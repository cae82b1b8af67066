//! Engine configuration

use crate::matching::policy::SelfTradePolicy;

/// Construction parameters for an [`crate::engine::OrderBook`].
#[derive(Debug, Clone)]
pub struct BookConfig {
    /// Capacity hint for the resting-order store. Pre-sizes the index;
    /// not a hard cap.
    pub max_orders: usize,
    /// What to do when an incoming order meets a resting order of the
    /// same owner.
    pub self_trade_policy: SelfTradePolicy,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            max_orders: 1_000_000,
            self_trade_policy: SelfTradePolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BookConfig::default();
        assert_eq!(config.max_orders, 1_000_000);
        assert_eq!(config.self_trade_policy, SelfTradePolicy::StopAtOwn);
    }
}
