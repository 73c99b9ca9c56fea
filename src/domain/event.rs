//! Observable records emitted by the exchange.

use super::{Address, Amount, FeeTier, PoolId, StrategyId};

/// A state change committed by the exchange.
///
/// Events are buffered inside an operation and only become visible through
/// [`Exchange::take_events`](crate::exchange::Exchange::take_events) once
/// the operation commits; a rolled-back operation emits nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Event {
    /// A pool was registered.
    PoolCreated {
        /// New pool id.
        pool: PoolId,
        /// Lower-sorted token.
        token0: Address,
        /// Higher-sorted token.
        token1: Address,
        /// Swap fee tier.
        fee_tier: FeeTier,
        /// Pricing strategy.
        strategy: StrategyId,
    },
    /// Reserves were written.
    Sync {
        /// Pool whose reserves changed.
        pool: PoolId,
        /// New reserve of token0.
        reserve0: Amount,
        /// New reserve of token1.
        reserve1: Amount,
    },
    /// Liquidity was added.
    Mint {
        /// Pool receiving the deposit.
        pool: PoolId,
        /// Account that initiated the deposit.
        sender: Address,
        /// Deposited token0.
        amount0: Amount,
        /// Deposited token1.
        amount1: Amount,
    },
    /// Liquidity was removed.
    Burn {
        /// Pool paying out.
        pool: PoolId,
        /// Account whose shares were burned.
        sender: Address,
        /// Paid token0.
        amount0: Amount,
        /// Paid token1.
        amount1: Amount,
        /// Receiver of both tokens.
        to: Address,
    },
    /// A swap settled.
    Swap {
        /// Pool traded against.
        pool: PoolId,
        /// Account that initiated the swap.
        sender: Address,
        /// Token0 received by the pool.
        amount0_in: Amount,
        /// Token1 received by the pool.
        amount1_in: Amount,
        /// Token0 paid out.
        amount0_out: Amount,
        /// Token1 paid out.
        amount1_out: Amount,
        /// Receiver of the outputs.
        to: Address,
    },
}

impl Event {
    /// Returns the pool the event belongs to.
    #[must_use]
    pub const fn pool(&self) -> PoolId {
        match self {
            Self::PoolCreated { pool, .. }
            | Self::Sync { pool, .. }
            | Self::Mint { pool, .. }
            | Self::Burn { pool, .. }
            | Self::Swap { pool, .. } => *pool,
        }
    }
}
