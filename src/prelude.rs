//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use hydra_exchange::prelude::*;
//! ```

pub use crate::config::{ExchangeConfig, PairConfig, ProtocolFee};
pub use crate::domain::{
    Address, Amount, Event, FeeTier, Liquidity, Pool, PoolId, PoolState, PriceAccumulator,
    StrategyId, SwapHop, TokenPair,
};
pub use crate::error::{AmmError, Result};
pub use crate::exchange::Exchange;
pub use crate::factory::PairFactory;
pub use crate::ledger::{ShareBook, ShareLedger, TokenLedger, TokenVault};
pub use crate::strategy::ConstantProductStrategy;
pub use crate::traits::{Clock, ManualClock, PricingStrategy, SwapCallback, SwapContext, SystemClock};
