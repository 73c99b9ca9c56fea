//! Constant Product pricing (`x · y = k`, Uniswap V2 style).
//!
//! Quotes round down in the pool's favour:
//!
//! ```text
//! amount_in_with_fee = amount_in × (10_000 − fee_bps)
//! amount_out         = ⌊amount_in_with_fee × reserve_out / (reserve_in × 10_000 + amount_in_with_fee)⌋
//! ```

use crate::domain::{Address, Amount, Liquidity, PoolState};
use crate::error::AmmError;
use crate::math::{get_amount_out, initial_shares, proportional_shares, redeemed_amounts};
use crate::traits::PricingStrategy;

/// The reference `x · y = k` curve.
///
/// Registered by every [`PairFactory`](crate::factory::PairFactory) under
/// [`StrategyId::CONSTANT_PRODUCT`](crate::domain::StrategyId::CONSTANT_PRODUCT).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstantProductStrategy;

impl PricingStrategy for ConstantProductStrategy {
    fn name(&self) -> &'static str {
        "constant-product"
    }

    fn quote_add_liquidity(
        &self,
        state: &PoolState,
        amount0: Amount,
        amount1: Amount,
    ) -> Result<Liquidity, AmmError> {
        if state.total_shares.is_zero() {
            initial_shares(amount0, amount1)
        } else {
            proportional_shares((amount0, amount1), state.pool.reserves(), state.total_shares)
        }
    }

    fn quote_remove_liquidity(
        &self,
        state: &PoolState,
        shares: Liquidity,
    ) -> Result<(Amount, Amount), AmmError> {
        redeemed_amounts(shares, state.pool.reserves(), state.total_shares)
    }

    fn quote_swap(
        &self,
        state: &PoolState,
        token_in: Address,
        amount_in: Amount,
    ) -> Result<Amount, AmmError> {
        let (reserve_in, reserve_out) = state.pool.reserves_for(token_in)?;
        get_amount_out(amount_in, reserve_in, reserve_out, state.pool.fee_tier())
    }
}
