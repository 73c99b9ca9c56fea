//! Pool and accumulator storage.
//!
//! [`PoolRegistry`] owns every [`Pool`] and its [`PriceAccumulator`].  It is
//! the only place reserves are written, so the 112-bit bound and the TWAP
//! update live here.

use std::collections::BTreeMap;

use ethnum::U256;

use crate::config::PairConfig;
use crate::domain::{Address, Amount, FeeTier, Pool, PoolId, PriceAccumulator, StrategyId, TokenPair};
use crate::error::AmmError;
use crate::math::{accumulate, fixed_divide, MAX_RESERVE};

#[derive(Debug, Clone, PartialEq, Eq)]
struct PoolRecord {
    pool: Pool,
    accumulator: PriceAccumulator,
}

/// Mapping from pool id to pool state, plus the pair index used to reject
/// duplicates.
///
/// Pools are never removed.  Ids start at 1 and increase by one.
///
/// # Examples
///
/// ```
/// use hydra_exchange::config::PairConfig;
/// use hydra_exchange::domain::{Address, Amount, FeeTier, PoolId, StrategyId};
/// use hydra_exchange::registry::PoolRegistry;
///
/// let config = PairConfig::new(
///     Address::from_bytes([1u8; 32]),
///     Address::from_bytes([2u8; 32]),
///     FeeTier::TIER_0_30_PERCENT,
///     StrategyId::CONSTANT_PRODUCT,
/// ).expect("valid pair");
///
/// let mut registry = PoolRegistry::new();
/// let id = registry.create(&config, Amount::ZERO, Amount::ZERO, 0).expect("created");
/// assert_eq!(id, PoolId::new(1));
/// assert!(registry.create(&config, Amount::ZERO, Amount::ZERO, 0).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolRegistry {
    pools: BTreeMap<PoolId, PoolRecord>,
    index: BTreeMap<(TokenPair, FeeTier, StrategyId), PoolId>,
    last_id: u64,
}

impl PoolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Returns `true` if no pool has been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Returns the pool with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] if no such pool exists.
    pub fn get(&self, id: PoolId) -> Result<&Pool, AmmError> {
        self.record(id).map(|r| &r.pool)
    }

    /// Returns the accumulators of pool `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] if no such pool exists.
    pub fn accumulator(&self, id: PoolId) -> Result<&PriceAccumulator, AmmError> {
        self.record(id).map(|r| &r.accumulator)
    }

    /// Looks up the pool for two tokens (any order), a fee tier and a strategy.
    #[must_use]
    pub fn find(
        &self,
        token_a: Address,
        token_b: Address,
        fee_tier: FeeTier,
        strategy: StrategyId,
    ) -> Option<PoolId> {
        let pair = TokenPair::new(token_a, token_b).ok()?;
        self.index.get(&(pair, fee_tier, strategy)).copied()
    }

    /// Iterates over all pools in id order.
    pub fn pools(&self) -> impl Iterator<Item = &Pool> + '_ {
        self.pools.values().map(|r| &r.pool)
    }

    /// Registers a new pool with the given starting reserves.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PairExists`] if the `(pair, fee, strategy)` key is taken.
    /// - [`AmmError::Overflow`] if a reserve exceeds [`MAX_RESERVE`].
    pub fn create(
        &mut self,
        config: &PairConfig,
        reserve0: Amount,
        reserve1: Amount,
        timestamp: u32,
    ) -> Result<PoolId, AmmError> {
        config.validate()?;
        let key = (config.pair(), config.fee_tier(), config.strategy());
        if let Some(existing) = self.index.get(&key) {
            return Err(AmmError::PairExists(*existing));
        }
        check_width(reserve0, reserve1)?;
        let next = self
            .last_id
            .checked_add(1)
            .ok_or(AmmError::Overflow("pool id"))?;
        let id = PoolId::new(next);
        let mut pool = Pool::new(id, config.pair(), config.fee_tier(), config.strategy());
        pool.set_reserves(reserve0, reserve1, timestamp);
        self.pools.insert(
            id,
            PoolRecord {
                pool,
                accumulator: PriceAccumulator::default(),
            },
        );
        self.index.insert(key, id);
        self.last_id = next;
        Ok(id)
    }

    /// Writes new reserves for pool `id` at `timestamp`.
    ///
    /// Before the write, if time has passed since the last update and both
    /// previous reserves are non-zero, each cumulative price grows by the
    /// previous spot price times the elapsed seconds.  Elapsed time and the
    /// sums wrap.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotFound`] if no such pool exists.
    /// - [`AmmError::Overflow`] if a reserve exceeds [`MAX_RESERVE`].
    pub fn set_reserves(
        &mut self,
        id: PoolId,
        reserve0: Amount,
        reserve1: Amount,
        timestamp: u32,
    ) -> Result<(), AmmError> {
        check_width(reserve0, reserve1)?;
        let record = self.record_mut(id)?;
        let (old0, old1) = record.pool.reserves();
        let elapsed = timestamp.wrapping_sub(record.pool.last_update());
        if elapsed > 0 && !old0.is_zero() && !old1.is_zero() {
            let acc = &mut record.accumulator;
            acc.price0_cumulative_last =
                accumulate(acc.price0_cumulative_last, fixed_divide(old1, old0)?, elapsed);
            acc.price1_cumulative_last =
                accumulate(acc.price1_cumulative_last, fixed_divide(old0, old1)?, elapsed);
        }
        record.pool.set_reserves(reserve0, reserve1, timestamp);
        Ok(())
    }

    /// Records `k_last` for pool `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] if no such pool exists.
    pub fn set_k_last(&mut self, id: PoolId, k_last: U256) -> Result<(), AmmError> {
        self.record_mut(id)?.accumulator.k_last = k_last;
        Ok(())
    }

    /// Cumulative prices as they would read at `timestamp` if reserves were
    /// synced now, without writing anything.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] if no such pool exists.
    pub fn cumulative_prices_at(&self, id: PoolId, timestamp: u32) -> Result<(U256, U256), AmmError> {
        let record = self.record(id)?;
        let acc = record.accumulator;
        let (r0, r1) = record.pool.reserves();
        let elapsed = timestamp.wrapping_sub(record.pool.last_update());
        if elapsed == 0 || r0.is_zero() || r1.is_zero() {
            return Ok((acc.price0_cumulative_last, acc.price1_cumulative_last));
        }
        Ok((
            accumulate(acc.price0_cumulative_last, fixed_divide(r1, r0)?, elapsed),
            accumulate(acc.price1_cumulative_last, fixed_divide(r0, r1)?, elapsed),
        ))
    }

    fn record(&self, id: PoolId) -> Result<&PoolRecord, AmmError> {
        self.pools.get(&id).ok_or(AmmError::PoolNotFound(id))
    }

    fn record_mut(&mut self, id: PoolId) -> Result<&mut PoolRecord, AmmError> {
        self.pools.get_mut(&id).ok_or(AmmError::PoolNotFound(id))
    }
}

fn check_width(reserve0: Amount, reserve1: Amount) -> Result<(), AmmError> {
    if reserve0 > MAX_RESERVE || reserve1 > MAX_RESERVE {
        return Err(AmmError::Overflow("reserve exceeds 112 bits"));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 32])
    }

    fn config(a: u8, b: u8, fee: FeeTier) -> PairConfig {
        let Ok(cfg) = PairConfig::new(addr(a), addr(b), fee, StrategyId::CONSTANT_PRODUCT) else {
            panic!("valid config");
        };
        cfg
    }

    fn registry_with_pool(r0: u128, r1: u128, t: u32) -> (PoolRegistry, PoolId) {
        let mut registry = PoolRegistry::new();
        let Ok(id) = registry.create(
            &config(1, 2, FeeTier::TIER_0_30_PERCENT),
            Amount::new(r0),
            Amount::new(r1),
            t,
        ) else {
            panic!("created");
        };
        (registry, id)
    }

    #[test]
    fn ids_are_sequential_from_one() {
        let mut registry = PoolRegistry::new();
        let Ok(first) = registry.create(&config(1, 2, FeeTier::ZERO), Amount::ZERO, Amount::ZERO, 0)
        else {
            panic!("created");
        };
        let Ok(second) = registry.create(
            &config(1, 2, FeeTier::TIER_0_30_PERCENT),
            Amount::ZERO,
            Amount::ZERO,
            0,
        ) else {
            panic!("created");
        };
        assert_eq!(first, PoolId::new(1));
        assert_eq!(second, PoolId::new(2));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn duplicate_key_reports_existing_id() {
        let (mut registry, id) = registry_with_pool(0, 0, 0);
        assert_eq!(
            registry.create(
                &config(2, 1, FeeTier::TIER_0_30_PERCENT),
                Amount::ZERO,
                Amount::ZERO,
                0
            ),
            Err(AmmError::PairExists(id))
        );
        assert_eq!(
            registry.find(addr(2), addr(1), FeeTier::TIER_0_30_PERCENT, StrategyId::CONSTANT_PRODUCT),
            Some(id)
        );
    }

    #[test]
    fn unknown_pool_not_found() {
        let registry = PoolRegistry::new();
        assert_eq!(
            registry.get(PoolId::new(9)).map(Pool::id),
            Err(AmmError::PoolNotFound(PoolId::new(9)))
        );
    }

    #[test]
    fn create_rejects_wide_reserves() {
        let mut registry = PoolRegistry::new();
        let too_big = Amount::new(MAX_RESERVE.get() + 1);
        assert!(matches!(
            registry.create(&config(1, 2, FeeTier::ZERO), too_big, Amount::ZERO, 0),
            Err(AmmError::Overflow(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn accumulates_previous_price_times_elapsed() {
        let (mut registry, id) = registry_with_pool(1_000, 2_000, 100);
        let Ok(()) = registry.set_reserves(id, Amount::new(5), Amount::new(5), 110) else {
            panic!("set");
        };
        let Ok(acc) = registry.accumulator(id) else {
            panic!("exists");
        };
        // price0 = 2000/1000 = 2, price1 = 1/2, over 10 seconds
        assert_eq!(acc.price0_cumulative_last, (U256::new(2) << 112u32) * U256::new(10));
        assert_eq!(acc.price1_cumulative_last, (U256::ONE << 111u32) * U256::new(10));
    }

    #[test]
    fn same_timestamp_does_not_accumulate() {
        let (mut registry, id) = registry_with_pool(1_000, 2_000, 100);
        let Ok(()) = registry.set_reserves(id, Amount::new(7), Amount::new(9), 100) else {
            panic!("set");
        };
        let Ok(acc) = registry.accumulator(id) else {
            panic!("exists");
        };
        assert_eq!(acc.price0_cumulative_last, U256::ZERO);
        let Ok(pool) = registry.get(id) else {
            panic!("exists");
        };
        assert_eq!(pool.reserves(), (Amount::new(7), Amount::new(9)));
    }

    #[test]
    fn empty_reserves_do_not_accumulate() {
        let (mut registry, id) = registry_with_pool(0, 0, 0);
        let Ok(()) = registry.set_reserves(id, Amount::new(7), Amount::new(9), 50) else {
            panic!("set");
        };
        let Ok(acc) = registry.accumulator(id) else {
            panic!("exists");
        };
        assert_eq!(*acc, PriceAccumulator::default());
    }

    #[test]
    fn elapsed_time_wraps() {
        let (mut registry, id) = registry_with_pool(1_000, 1_000, u32::MAX - 4);
        let Ok(()) = registry.set_reserves(id, Amount::new(1_000), Amount::new(1_000), 5) else {
            panic!("set");
        };
        let Ok(acc) = registry.accumulator(id) else {
            panic!("exists");
        };
        // u32::MAX - 4 -> 5 is 10 seconds
        assert_eq!(acc.price0_cumulative_last, (U256::ONE << 112u32) * U256::new(10));
    }

    #[test]
    fn wide_reserve_update_rejected_without_change() {
        let (mut registry, id) = registry_with_pool(10, 10, 0);
        let too_big = Amount::new(MAX_RESERVE.get() + 1);
        assert!(matches!(
            registry.set_reserves(id, too_big, Amount::new(1), 5),
            Err(AmmError::Overflow(_))
        ));
        let Ok(pool) = registry.get(id) else {
            panic!("exists");
        };
        assert_eq!(pool.reserves(), (Amount::new(10), Amount::new(10)));
    }

    #[test]
    fn counterfactual_cumulative_prices() {
        let (registry, id) = registry_with_pool(1_000, 3_000, 0);
        let Ok((p0, _)) = registry.cumulative_prices_at(id, 4) else {
            panic!("exists");
        };
        assert_eq!(p0, (U256::new(3) << 112u32) * U256::new(4));
        let Ok(acc) = registry.accumulator(id) else {
            panic!("exists");
        };
        assert_eq!(acc.price0_cumulative_last, U256::ZERO);
    }
}
