//! Pair instantiation via the factory pattern.
//!
//! The [`PairFactory`] turns a [`PairConfig`](crate::config::PairConfig)
//! into a registered pool, checking that the requested pricing strategy is
//! known.  A pair is keyed by its sorted tokens, fee tier and strategy, so
//! the same two tokens can back several pools.

mod pair_factory;

pub use pair_factory::PairFactory;
