//! Pair creation and the strategy table.

use core::fmt;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::PairConfig;
use crate::domain::{Amount, PoolId, StrategyId};
use crate::error::AmmError;
use crate::registry::PoolRegistry;
use crate::strategy::ConstantProductStrategy;
use crate::traits::PricingStrategy;

/// Creates pairs and resolves their pricing strategies.
///
/// `PairFactory` holds the table of registered [`PricingStrategy`]
/// implementations.  [`create`](Self::create) validates a [`PairConfig`],
/// checks its strategy is known, and registers an empty pool.
///
/// # Thread Safety
///
/// Strategies are shared as `Arc<dyn PricingStrategy>`, which is
/// `Send + Sync`, so the factory can live inside a shared exchange.
///
/// # Example
///
/// ```rust
/// use hydra_exchange::config::PairConfig;
/// use hydra_exchange::domain::{Address, FeeTier, PoolId, StrategyId};
/// use hydra_exchange::factory::PairFactory;
/// use hydra_exchange::registry::PoolRegistry;
///
/// let factory = PairFactory::new();
/// let mut registry = PoolRegistry::new();
/// let config = PairConfig::new(
///     Address::from_bytes([1u8; 32]),
///     Address::from_bytes([2u8; 32]),
///     FeeTier::TIER_0_30_PERCENT,
///     StrategyId::CONSTANT_PRODUCT,
/// ).expect("valid");
///
/// let id = factory.create(&mut registry, &config, 0).expect("pool created");
/// assert_eq!(id, PoolId::new(1));
/// ```
#[derive(Clone)]
pub struct PairFactory {
    strategies: BTreeMap<StrategyId, Arc<dyn PricingStrategy>>,
}

impl PairFactory {
    /// Creates a factory with [`ConstantProductStrategy`] registered under
    /// [`StrategyId::CONSTANT_PRODUCT`].
    #[must_use]
    pub fn new() -> Self {
        let mut strategies: BTreeMap<StrategyId, Arc<dyn PricingStrategy>> = BTreeMap::new();
        strategies.insert(
            StrategyId::CONSTANT_PRODUCT,
            Arc::new(ConstantProductStrategy),
        );
        Self { strategies }
    }

    /// Registers `strategy` under the next free id and returns that id.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the id space is exhausted.
    pub fn register<P>(&mut self, strategy: P) -> Result<StrategyId, AmmError>
    where
        P: PricingStrategy + 'static,
    {
        let next = match self.strategies.keys().next_back() {
            Some(last) => last
                .get()
                .checked_add(1)
                .ok_or(AmmError::Overflow("strategy id"))?,
            None => 0,
        };
        let id = StrategyId::new(next);
        self.strategies.insert(id, Arc::new(strategy));
        Ok(id)
    }

    /// Returns the strategy registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownStrategy`] if nothing is registered.
    pub fn strategy(&self, id: StrategyId) -> Result<&Arc<dyn PricingStrategy>, AmmError> {
        self.strategies.get(&id).ok_or(AmmError::UnknownStrategy)
    }

    /// Iterates over registered strategy ids in ascending order.
    pub fn strategy_ids(&self) -> impl Iterator<Item = StrategyId> + '_ {
        self.strategies.keys().copied()
    }

    /// Creates an empty pool for `config` in `registry`.
    ///
    /// # Flow
    ///
    /// 1. Validate the configuration via [`PairConfig::validate`].
    /// 2. Resolve the strategy.
    /// 3. Register the pool with zero reserves at `timestamp`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if the config is invalid.
    /// - [`AmmError::UnknownStrategy`] if the strategy is not registered.
    /// - [`AmmError::PairExists`] if the pair already has a pool.
    pub fn create(
        &self,
        registry: &mut PoolRegistry,
        config: &PairConfig,
        timestamp: u32,
    ) -> Result<PoolId, AmmError> {
        config.validate()?;
        self.strategy(config.strategy())?;
        registry.create(config, Amount::ZERO, Amount::ZERO, timestamp)
    }
}

impl Default for PairFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PairFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.strategies.iter().map(|(id, s)| (id, s.name())))
            .finish()
    }
}
