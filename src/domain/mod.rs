//! Fundamental domain value types used throughout the exchange.
//!
//! Addresses, amounts, shares, fee tiers and the pool records kept by the
//! registry.  All quantities are integer newtypes; nothing here uses
//! floating point.

mod address;
mod amount;
mod event;
mod fee_tier;
mod ids;
mod liquidity;
mod pool;
mod rounding;
mod swap_hop;
mod token_pair;

pub use address::Address;
pub use amount::Amount;
pub use event::Event;
pub use fee_tier::{FeeTier, FEE_DENOMINATOR};
pub use ids::{PoolId, StrategyId};
pub use liquidity::Liquidity;
pub use pool::{Pool, PoolState, PriceAccumulator};
pub use rounding::Rounding;
pub use swap_hop::SwapHop;
pub use token_pair::TokenPair;
