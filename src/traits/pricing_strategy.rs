//! Pluggable pool pricing.
//!
//! A [`PricingStrategy`] turns a pool snapshot into quotes.  The exchange
//! uses the quote from the pool's strategy to size single-sided swaps, but
//! settlement never trusts it: every swap still has to pass the
//! fee-adjusted invariant check, so a faulty strategy can only make swaps
//! fail, never drain a pool.
//!
//! # Dispatch Model
//!
//! Strategies are registered with the
//! [`PairFactory`](crate::factory::PairFactory) and selected per pool by
//! [`StrategyId`](crate::domain::StrategyId), so they are held as
//! `Arc<dyn PricingStrategy>` rather than a compile-time type.

use core::fmt;

use crate::domain::{Address, Amount, Liquidity, PoolState};
use crate::error::AmmError;

/// Quote capability shared by every pool curve.
///
/// All methods are pure functions of the snapshot and arguments.
///
/// # Implementors
///
/// - [`ConstantProductStrategy`](crate::strategy::ConstantProductStrategy)
pub trait PricingStrategy: fmt::Debug + Send + Sync {
    /// Human-readable name used in logs.
    fn name(&self) -> &'static str;

    /// Shares a deposit of `amount0` and `amount1` would mint.
    ///
    /// Ignores any pending protocol fee, which can only lower the result.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientLiquidityMinted`] if the deposit is
    /// too small to mint anything.
    fn quote_add_liquidity(
        &self,
        state: &PoolState,
        amount0: Amount,
        amount1: Amount,
    ) -> Result<Liquidity, AmmError>;

    /// Token amounts burning `shares` would pay out, measured against the
    /// recorded reserves.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientLiquidityBurned`] if either side
    /// rounds to zero.
    fn quote_remove_liquidity(
        &self,
        state: &PoolState,
        shares: Liquidity,
    ) -> Result<(Amount, Amount), AmmError>;

    /// Output for selling `amount_in` of `token_in`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidToken`] if `token_in` is not in the pair.
    /// - [`AmmError::InsufficientLiquidity`] if the pool is empty.
    fn quote_swap(
        &self,
        state: &PoolState,
        token_in: Address,
        amount_in: Amount,
    ) -> Result<Amount, AmmError>;
}
