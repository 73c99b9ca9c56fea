//! Opaque identifiers for pools and pricing strategies.

use core::fmt;

/// Identifier of a pool, assigned monotonically from 1 by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolId(u64);

impl PoolId {
    /// Creates a pool id from its raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a registered pricing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrategyId(u32);

impl StrategyId {
    /// The built-in constant-product strategy, registered by every factory.
    pub const CONSTANT_PRODUCT: Self = Self(0);

    /// Creates a strategy id from its raw value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "strategy#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_id_round_trip() {
        assert_eq!(PoolId::new(3).get(), 3);
        assert_eq!(PoolId::new(3).to_string(), "3");
        assert!(PoolId::new(1) < PoolId::new(2));
    }

    #[test]
    fn strategy_id_display() {
        assert_eq!(StrategyId::CONSTANT_PRODUCT.get(), 0);
        assert_eq!(StrategyId::new(4).to_string(), "strategy#4");
    }
}
