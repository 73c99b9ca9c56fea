//! Outcome of one hop of a swap.

use super::{Address, Amount, PoolId};

/// What one pool paid and received during a swap.
///
/// A multi-hop route returns one `SwapHop` per pool, in path order, with
/// `hops[i].token_out == hops[i + 1].token_in`.  `amount_in` is what the
/// pool actually credited: the previous hop's output plus any excess the
/// pool already held above its reserves.
///
/// # Examples
///
/// ```
/// use hydra_exchange::domain::{Address, Amount, PoolId, SwapHop};
///
/// let hop = SwapHop {
///     pool: PoolId::new(1),
///     token_in: Address::from_bytes([1u8; 32]),
///     token_out: Address::from_bytes([2u8; 32]),
///     amount_in: Amount::new(1_000),
///     amount_out: Amount::new(996),
/// };
/// assert!(hop.amount_out < hop.amount_in);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapHop {
    /// Pool traded against.
    pub pool: PoolId,
    /// Token sold into the pool.
    pub token_in: Address,
    /// Token bought from the pool.
    pub token_out: Address,
    /// Amount the pool credited as input.
    pub amount_in: Amount,
    /// Amount bought.
    pub amount_out: Amount,
}
