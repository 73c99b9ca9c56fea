//! Swap settlement.
//!
//! The two-sided [`Transaction::swap`] keeps the flash-swap ordering:
//!
//! 1. Check the request against the recorded reserves.
//! 2. Pay the requested outputs.
//! 3. Run the caller's callback, if any.
//! 4. Re-measure balances and derive what came in.
//! 5. Enforce the fee-adjusted invariant.
//! 6. Write reserves.
//!
//! Single-sided swaps and routes size each hop with the pool's pricing
//! strategy and settle it through the same path.

use tracing::debug;

use super::Transaction;
use crate::domain::{Address, Amount, Event, PoolId, SwapHop};
use crate::error::AmmError;
use crate::ledger::{pull, ShareLedger, TokenLedger};
use crate::math::check_invariant;
use crate::traits::{SwapCallback, SwapContext};

/// Optional flash-swap hook and the bytes passed to it.
pub(crate) type Callback<'c, T, S> = Option<(&'c mut dyn SwapCallback<T, S>, &'c [u8])>;

impl<T: TokenLedger, S: ShareLedger> Transaction<'_, T, S> {
    /// Pays `amounts_out` to `to` and settles against whatever the pool
    /// holds afterwards.  Returns the derived inputs.
    pub(crate) fn swap(
        &mut self,
        sender: Address,
        id: PoolId,
        amounts_out: (Amount, Amount),
        to: Address,
        callback: Callback<'_, T, S>,
    ) -> Result<(Amount, Amount), AmmError> {
        let (amount0_out, amount1_out) = amounts_out;
        if amount0_out.is_zero() && amount1_out.is_zero() {
            return Err(AmmError::InsufficientOutputAmount);
        }
        let pool = self.pool(id)?;
        let (reserve0, reserve1) = pool.reserves();
        if amount0_out >= reserve0 || amount1_out >= reserve1 {
            return Err(AmmError::InsufficientLiquidity);
        }
        if to == pool.token0() || to == pool.token1() {
            return Err(AmmError::InvalidRecipient);
        }

        let custody = pool.address();
        self.pay(pool.token0(), custody, to, amount0_out)?;
        self.pay(pool.token1(), custody, to, amount1_out)?;
        if let Some((callback, data)) = callback {
            let exchange = self.exchange;
            let ctx = SwapContext::new(
                id,
                sender,
                amounts_out,
                data,
                &mut self.state.tokens,
                exchange,
            );
            let _callback = exchange.guard().callback_scope();
            callback.on_swap(ctx)?;
        }

        let (balance0, balance1) = self.state.balances(&pool);
        // reserve > amount_out was checked above
        let amount0_in = balance0.saturating_sub(&reserve0.saturating_sub(&amount0_out));
        let amount1_in = balance1.saturating_sub(&reserve1.saturating_sub(&amount1_out));
        if amount0_in.is_zero() && amount1_in.is_zero() {
            return Err(AmmError::InsufficientInputAmount);
        }
        check_invariant(
            (balance0, balance1),
            (amount0_in, amount1_in),
            (reserve0, reserve1),
            pool.fee_tier(),
        )?;

        self.update(id, balance0, balance1)?;
        self.emit(Event::Swap {
            pool: id,
            sender,
            amount0_in,
            amount1_in,
            amount0_out,
            amount1_out,
            to,
        });
        debug!(
            pool = %id, %sender, %to,
            %amount0_in, %amount1_in, %amount0_out, %amount1_out,
            "swapped"
        );
        Ok((amount0_in, amount1_in))
    }

    /// Sells exactly `amount_in` of `token_in` along `path`, paying the
    /// final output to `to`.
    ///
    /// The input is pulled from `sender` into the first pool; every
    /// intermediate output is paid straight into the next pool.
    pub(crate) fn swap_exact_in_route(
        &mut self,
        sender: Address,
        path: &[PoolId],
        token_in: Address,
        amount_in: Amount,
        min_amount_out: Amount,
        to: Address,
    ) -> Result<Vec<SwapHop>, AmmError> {
        let Some(first) = path.first() else {
            return Err(AmmError::InvalidPath("path is empty"));
        };
        if amount_in.is_zero() {
            return Err(AmmError::InsufficientInputAmount);
        }
        let legs = self.resolve_path(path, token_in)?;

        let entry = Address::pool(*first);
        pull(
            &mut self.state.tokens,
            token_in,
            entry,
            sender,
            entry,
            amount_in,
        )?;

        let mut hops = Vec::with_capacity(legs.len());
        let mut amount = amount_in;
        for (i, &(id, hop_in, hop_out)) in legs.iter().enumerate() {
            let recipient = legs.get(i + 1).map_or(to, |next| Address::pool(next.0));
            let state = self.pool_state(id)?;
            let amount_out = self
                .exchange
                .factory()
                .strategy(state.pool.strategy())?
                .quote_swap(&state, hop_in, amount)?;
            let amounts_out = if state.pool.pair().is_token0(hop_out)? {
                (amount_out, Amount::ZERO)
            } else {
                (Amount::ZERO, amount_out)
            };
            let (amount0_in, amount1_in) =
                self.swap(sender, id, amounts_out, recipient, None)?;
            // includes anything already sitting in the pool above its reserves
            let credited = if amounts_out.0.is_zero() {
                amount0_in
            } else {
                amount1_in
            };
            hops.push(SwapHop {
                pool: id,
                token_in: hop_in,
                token_out: hop_out,
                amount_in: credited,
                amount_out,
            });
            amount = amount_out;
        }
        if amount < min_amount_out {
            return Err(AmmError::InsufficientOutputAmount);
        }
        Ok(hops)
    }

    /// Pays out anything the pool holds above its reserves.
    pub(crate) fn skim(&mut self, id: PoolId, to: Address) -> Result<(Amount, Amount), AmmError> {
        let pool = self.pool(id)?;
        let (reserve0, reserve1) = pool.reserves();
        let (balance0, balance1) = self.state.balances(&pool);
        let excess0 = balance0.saturating_sub(&reserve0);
        let excess1 = balance1.saturating_sub(&reserve1);
        let custody = pool.address();
        self.pay(pool.token0(), custody, to, excess0)?;
        self.pay(pool.token1(), custody, to, excess1)?;
        debug!(pool = %id, %to, %excess0, %excess1, "skimmed");
        Ok((excess0, excess1))
    }

    /// Sets reserves to the pool's actual balances.
    pub(crate) fn sync(&mut self, id: PoolId) -> Result<(), AmmError> {
        let pool = self.pool(id)?;
        let (balance0, balance1) = self.state.balances(&pool);
        self.update(id, balance0, balance1)?;
        debug!(pool = %id, reserve0 = %balance0, reserve1 = %balance1, "synced");
        Ok(())
    }

    /// Walks `path` from `token_in`, returning `(pool, token_in, token_out)`
    /// for every hop.
    fn resolve_path(
        &self,
        path: &[PoolId],
        token_in: Address,
    ) -> Result<Vec<(PoolId, Address, Address)>, AmmError> {
        let mut legs = Vec::with_capacity(path.len());
        let mut token = token_in;
        for &id in path {
            let pair = self.pool(id)?.pair();
            let token_out = pair
                .other(token)
                .map_err(|_| AmmError::InvalidPath("token does not connect to next pool"))?;
            legs.push((id, token, token_out));
            token = token_out;
        }
        Ok(legs)
    }
}
