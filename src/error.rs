//! Unified error types for the Hydra exchange core.
//!
//! Every fallible operation returns [`AmmError`].  Variants name the *kind*
//! of failure; callers match on the variant, never on the message.  Any
//! error returned by a mutating [`Exchange`](crate::exchange::Exchange)
//! entry point means the whole operation was rolled back.

use crate::domain::PoolId;

/// Errors produced by the exchange core and its collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AmmError {
    /// Both sides of a pair resolve to the same token.
    #[error("identical tokens")]
    IdenticalTokens,

    /// A pool with the same tokens, fee tier and strategy already exists.
    #[error("pair already exists as pool {0}")]
    PairExists(PoolId),

    /// No pool is registered under the given id.
    #[error("pool {0} not found")]
    PoolNotFound(PoolId),

    /// A deposit would mint zero shares.
    #[error("insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    /// A redemption would pay out zero of one token.
    #[error("insufficient liquidity burned")]
    InsufficientLiquidityBurned,

    /// No output was requested, or the output is below the caller's bound.
    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    /// The pool received no input for a swap.
    #[error("insufficient input amount")]
    InsufficientInputAmount,

    /// A requested output is not strictly below the pool reserve.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// The swap recipient is one of the pool's own token addresses.
    #[error("invalid recipient")]
    InvalidRecipient,

    /// A value exceeds its fixed width (reserves are limited to 112 bits).
    #[error("overflow: {0}")]
    Overflow(&'static str),

    /// The fee-adjusted constant product decreased across a swap.
    #[error("invariant violation: k decreased")]
    InvariantViolation,

    /// A mutating call was made while a call on the same thread, or a swap
    /// callback on any thread, is in flight.
    #[error("reentrant call rejected")]
    Reentrancy,

    /// The minimum liquidity held by [`Address::BURN`](crate::domain::Address::BURN)
    /// can be neither moved nor redeemed.
    #[error("minimum liquidity is locked")]
    LockedLiquidity,

    /// Tokens cannot be moved out of a pool's custody account directly.
    #[error("account is the custody account of pool {0}")]
    PoolCustody(PoolId),

    /// A pool's custody account holds less than its recorded reserves.
    #[error("pool {0} holds less than its reserves")]
    Insolvent(PoolId),

    /// The token ledger cannot cover a transfer.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// The spender's allowance cannot cover a `transfer_from`.
    #[error("insufficient allowance")]
    InsufficientAllowance,

    /// No pricing strategy is registered under the requested id.
    #[error("unknown pricing strategy")]
    UnknownStrategy,

    /// A multi-hop route is empty or its pools do not chain.
    #[error("invalid swap path: {0}")]
    InvalidPath(&'static str),

    /// A token is not part of the pool it was used with.
    #[error("invalid token: {0}")]
    InvalidToken(&'static str),

    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// Division by zero in pool math (for instance quoting against an empty pool).
    #[error("division by zero")]
    DivisionByZero,
}

/// Convenience alias used across the crate.
pub type Result<T, E = AmmError> = core::result::Result<T, E>;
