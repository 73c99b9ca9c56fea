//! Flash-swap hook.
//!
//! A swap pays its outputs first, then hands control to an optional
//! [`SwapCallback`], and only afterwards measures what the pool received.
//! The callback may use the outputs however it likes as long as the pool
//! ends up holding enough to satisfy the invariant.
//!
//! The callback is untrusted.  It runs while the exchange is locked, so any
//! attempt to call back into a mutating operation fails with
//! [`AmmError::Reentrancy`]; read-only queries are fine and see the state
//! committed before the swap started.

use crate::domain::{Address, Amount, PoolId};
use crate::error::AmmError;
use crate::exchange::Exchange;
use crate::ledger::{ShareLedger, TokenLedger};

/// View handed to a [`SwapCallback`] between payout and settlement.
#[derive(Debug)]
pub struct SwapContext<'a, T: TokenLedger, S: ShareLedger> {
    pool: PoolId,
    sender: Address,
    amount0_out: Amount,
    amount1_out: Amount,
    data: &'a [u8],
    tokens: &'a mut T,
    exchange: &'a Exchange<T, S>,
}

impl<'a, T: TokenLedger, S: ShareLedger> SwapContext<'a, T, S> {
    pub(crate) fn new(
        pool: PoolId,
        sender: Address,
        amounts_out: (Amount, Amount),
        data: &'a [u8],
        tokens: &'a mut T,
        exchange: &'a Exchange<T, S>,
    ) -> Self {
        Self {
            pool,
            sender,
            amount0_out: amounts_out.0,
            amount1_out: amounts_out.1,
            data,
            tokens,
            exchange,
        }
    }

    /// Pool being swapped against.
    #[must_use]
    pub const fn pool(&self) -> PoolId {
        self.pool
    }

    /// Custody account the pool must be repaid into.
    #[must_use]
    pub const fn pool_address(&self) -> Address {
        Address::pool(self.pool)
    }

    /// Account that initiated the swap.
    #[must_use]
    pub const fn sender(&self) -> Address {
        self.sender
    }

    /// Token0 already paid to the recipient.
    pub const fn amount0_out(&self) -> Amount {
        self.amount0_out
    }

    /// Token1 already paid to the recipient.
    pub const fn amount1_out(&self) -> Amount {
        self.amount1_out
    }

    /// Opaque bytes passed by the swap caller.
    #[must_use]
    pub const fn data(&self) -> &[u8] {
        self.data
    }

    /// The in-flight token ledger, including the payout.
    pub fn tokens(&mut self) -> &mut T {
        self.tokens
    }

    /// The exchange the swap runs on.
    #[must_use]
    pub const fn exchange(&self) -> &Exchange<T, S> {
        self.exchange
    }
}

/// Receives control after a swap's payout and before its invariant check.
///
/// Closures `FnMut(SwapContext<'_, T, S>) -> Result<(), AmmError>`
/// implement this trait.
pub trait SwapCallback<T: TokenLedger, S: ShareLedger> {
    /// Settles the swap, typically by repaying the pool.
    ///
    /// # Errors
    ///
    /// Any error aborts the swap and rolls it back.
    fn on_swap(&mut self, ctx: SwapContext<'_, T, S>) -> Result<(), AmmError>;
}

impl<T, S, F> SwapCallback<T, S> for F
where
    T: TokenLedger,
    S: ShareLedger,
    F: FnMut(SwapContext<'_, T, S>) -> Result<(), AmmError>,
{
    fn on_swap(&mut self, ctx: SwapContext<'_, T, S>) -> Result<(), AmmError> {
        self(ctx)
    }
}
