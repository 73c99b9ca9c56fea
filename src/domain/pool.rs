//! Pool and price-accumulator records.

use ethnum::U256;

use super::{Address, Amount, FeeTier, Liquidity, PoolId, StrategyId, TokenPair};
use crate::error::AmmError;

/// Reserve bookkeeping for one two-token pool.
///
/// Reserves are the pool's *recorded* balances.  The custody account at
/// [`Pool::address`] may transiently hold more (during a swap, or after a
/// direct transfer) until the next reserve update.
///
/// Reserves never exceed [`MAX_RESERVE`](crate::math::MAX_RESERVE); the
/// registry rejects any update that would.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pool {
    id: PoolId,
    pair: TokenPair,
    fee_tier: FeeTier,
    strategy: StrategyId,
    reserve0: Amount,
    reserve1: Amount,
    last_update: u32,
}

impl Pool {
    pub(crate) const fn new(
        id: PoolId,
        pair: TokenPair,
        fee_tier: FeeTier,
        strategy: StrategyId,
    ) -> Self {
        Self {
            id,
            pair,
            fee_tier,
            strategy,
            reserve0: Amount::ZERO,
            reserve1: Amount::ZERO,
            last_update: 0,
        }
    }

    /// Pool identifier.
    #[must_use]
    pub const fn id(&self) -> PoolId {
        self.id
    }

    /// Custody account holding the pool's tokens.
    #[must_use]
    pub const fn address(&self) -> Address {
        Address::pool(self.id)
    }

    /// Sorted token pair.
    #[must_use]
    pub const fn pair(&self) -> TokenPair {
        self.pair
    }

    /// Lower-sorted token.
    #[must_use]
    pub const fn token0(&self) -> Address {
        self.pair.token0()
    }

    /// Higher-sorted token.
    #[must_use]
    pub const fn token1(&self) -> Address {
        self.pair.token1()
    }

    /// Swap fee tier.
    #[must_use]
    pub const fn fee_tier(&self) -> FeeTier {
        self.fee_tier
    }

    /// Pricing strategy selected at creation.
    #[must_use]
    pub const fn strategy(&self) -> StrategyId {
        self.strategy
    }

    /// Recorded reserve of `token0`.
    pub const fn reserve0(&self) -> Amount {
        self.reserve0
    }

    /// Recorded reserve of `token1`.
    pub const fn reserve1(&self) -> Amount {
        self.reserve1
    }

    /// Both reserves as `(reserve0, reserve1)`.
    #[must_use]
    pub const fn reserves(&self) -> (Amount, Amount) {
        (self.reserve0, self.reserve1)
    }

    /// Reserves ordered as `(reserve_in, reserve_out)` for a swap selling `token_in`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidToken`] if `token_in` is not in the pair.
    pub fn reserves_for(&self, token_in: Address) -> Result<(Amount, Amount), AmmError> {
        if self.pair.is_token0(token_in)? {
            Ok((self.reserve0, self.reserve1))
        } else {
            Ok((self.reserve1, self.reserve0))
        }
    }

    /// Timestamp (seconds, modulo 2^32) of the last reserve update.
    #[must_use]
    pub const fn last_update(&self) -> u32 {
        self.last_update
    }

    /// Current `reserve0 * reserve1`.
    #[must_use]
    pub fn k(&self) -> U256 {
        self.reserve0.widen() * self.reserve1.widen()
    }

    pub(crate) fn set_reserves(&mut self, reserve0: Amount, reserve1: Amount, timestamp: u32) {
        self.reserve0 = reserve0;
        self.reserve1 = reserve1;
        self.last_update = timestamp;
    }
}

/// Time-weighted price accumulators and the protocol-fee checkpoint.
///
/// `price0_cumulative_last` sums `reserve1 / reserve0` (UQ112x112) times
/// elapsed seconds, `price1_cumulative_last` the inverse.  Both wrap modulo
/// 2^256; consumers difference two readings with wrapping subtraction.
///
/// `k_last` is `reserve0 * reserve1` as of the last mint or burn while the
/// protocol fee was enabled.  Zero means fee accounting is inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceAccumulator {
    /// Cumulative price of token0 in token1.
    pub price0_cumulative_last: U256,
    /// Cumulative price of token1 in token0.
    pub price1_cumulative_last: U256,
    /// Product of reserves at the last fee checkpoint.
    pub k_last: U256,
}

/// Read-only view of everything known about one pool.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolState {
    /// Reserves, pair and fee tier.
    pub pool: Pool,
    /// TWAP accumulators and `k_last`.
    pub accumulator: PriceAccumulator,
    /// Outstanding shares, including the locked minimum.
    pub total_shares: Liquidity,
}
