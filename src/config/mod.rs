//! Declarative configuration.
//!
//! [`ExchangeConfig`] fixes exchange-wide behaviour (protocol fee, default
//! fee tier); [`PairConfig`] is the blueprint the
//! [`PairFactory`](crate::factory::PairFactory) turns into a pool.

mod exchange_config;
mod pair_config;

pub use exchange_config::{ExchangeConfig, ProtocolFee};
pub use pair_config::PairConfig;
