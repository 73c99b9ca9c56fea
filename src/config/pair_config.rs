//! Blueprint for a new pair.

use crate::domain::{Address, FeeTier, StrategyId, TokenPair};
use crate::error::AmmError;

/// Parameters identifying a pair: sorted tokens, fee tier and pricing
/// strategy.
///
/// The same two tokens may back several pools as long as the fee tier or
/// strategy differs.
///
/// # Validation
///
/// - The tokens must differ (checked by [`TokenPair::new`]).
/// - The fee tier must be below 100%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairConfig {
    pair: TokenPair,
    fee_tier: FeeTier,
    strategy: StrategyId,
}

impl PairConfig {
    /// Creates a new `PairConfig`, sorting the tokens.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalTokens`] if `token_a == token_b`.
    /// - [`AmmError::InvalidConfiguration`] for a fee of 100% or more.
    pub fn new(
        token_a: Address,
        token_b: Address,
        fee_tier: FeeTier,
        strategy: StrategyId,
    ) -> Result<Self, AmmError> {
        let config = Self {
            pair: TokenPair::new(token_a, token_b)?,
            fee_tier,
            strategy,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] for a fee of 100% or more.
    pub const fn validate(&self) -> Result<(), AmmError> {
        self.fee_tier.validate()
    }

    /// Returns the sorted token pair.
    #[must_use]
    pub const fn pair(&self) -> TokenPair {
        self.pair
    }

    /// Returns the fee tier.
    #[must_use]
    pub const fn fee_tier(&self) -> FeeTier {
        self.fee_tier
    }

    /// Returns the pricing strategy.
    #[must_use]
    pub const fn strategy(&self) -> StrategyId {
        self.strategy
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 32])
    }

    #[test]
    fn valid_config_sorts_tokens() {
        let Ok(cfg) = PairConfig::new(
            addr(2),
            addr(1),
            FeeTier::TIER_0_30_PERCENT,
            StrategyId::CONSTANT_PRODUCT,
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(cfg.pair().token0(), addr(1));
        assert_eq!(cfg.fee_tier(), FeeTier::TIER_0_30_PERCENT);
        assert_eq!(cfg.strategy(), StrategyId::CONSTANT_PRODUCT);
    }

    #[test]
    fn identical_tokens_rejected() {
        assert_eq!(
            PairConfig::new(addr(1), addr(1), FeeTier::ZERO, StrategyId::CONSTANT_PRODUCT),
            Err(AmmError::IdenticalTokens)
        );
    }

    #[test]
    fn full_fee_rejected() {
        let result = PairConfig::new(
            addr(1),
            addr(2),
            FeeTier::new(10_000),
            StrategyId::CONSTANT_PRODUCT,
        );
        assert!(matches!(result, Err(AmmError::InvalidConfiguration(_))));
    }
}
