//! Pool accounting: liquidity, swaps and the transaction they run in.
//!
//! Every mutating [`Exchange`](crate::exchange::Exchange) operation runs as
//! one [`Transaction`] over a private copy of the exchange state.  The copy
//! replaces the committed state only if the whole operation succeeds, so a
//! failure at any step (including inside a swap callback or a later hop of
//! a route) leaves reserves, balances, shares and accumulators untouched.

mod guard;
mod liquidity;
mod swap;

#[cfg(test)]
#[allow(clippy::panic)]
mod proptest_properties;

pub use guard::{Entered, ReentrancyGuard};

use crate::domain::{Address, Amount, Event, Pool, PoolId, PoolState};
use crate::error::AmmError;
use crate::exchange::Exchange;
use crate::ledger::{ShareLedger, TokenLedger};
use crate::registry::PoolRegistry;

/// Everything a transaction may change.
#[derive(Debug, Clone, Default)]
pub(crate) struct ExchangeState<T, S> {
    pub(crate) registry: PoolRegistry,
    pub(crate) tokens: T,
    pub(crate) shares: S,
}

impl<T: TokenLedger, S: ShareLedger> ExchangeState<T, S> {
    pub(crate) fn pool_state(&self, id: PoolId) -> Result<PoolState, AmmError> {
        Ok(PoolState {
            pool: self.registry.get(id)?.clone(),
            accumulator: *self.registry.accumulator(id)?,
            total_shares: self.shares.total_shares(id),
        })
    }

    /// Actual holdings of the pool's custody account.
    pub(crate) fn balances(&self, pool: &Pool) -> (Amount, Amount) {
        let holder = pool.address();
        (
            self.tokens.balance_of(pool.token0(), holder),
            self.tokens.balance_of(pool.token1(), holder),
        )
    }

    /// Fails if any pool's custody account holds less than its reserves.
    ///
    /// Checked before every commit, so nothing (a ledger passthrough, a
    /// swap callback paying from another pool's account) can leave a pool
    /// unable to cover what it has recorded.
    pub(crate) fn check_solvency(&self) -> Result<(), AmmError> {
        for pool in self.registry.pools() {
            let (balance0, balance1) = self.balances(pool);
            let (reserve0, reserve1) = pool.reserves();
            if balance0 < reserve0 || balance1 < reserve1 {
                return Err(AmmError::Insolvent(pool.id()));
            }
        }
        Ok(())
    }
}

/// An in-flight operation over a working copy of the state.
pub(crate) struct Transaction<'a, T: TokenLedger, S: ShareLedger> {
    exchange: &'a Exchange<T, S>,
    state: &'a mut ExchangeState<T, S>,
    events: Vec<Event>,
    now: u32,
}

impl<'a, T: TokenLedger, S: ShareLedger> Transaction<'a, T, S> {
    pub(crate) fn new(
        exchange: &'a Exchange<T, S>,
        state: &'a mut ExchangeState<T, S>,
        now: u32,
    ) -> Self {
        Self {
            exchange,
            state,
            events: Vec::new(),
            now,
        }
    }

    /// Events buffered so far, handed over on commit.
    pub(crate) fn into_events(self) -> Vec<Event> {
        self.events
    }

    pub(crate) fn state_mut(&mut self) -> &mut ExchangeState<T, S> {
        self.state
    }

    pub(crate) const fn now(&self) -> u32 {
        self.now
    }

    pub(crate) fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub(crate) fn pool(&self, id: PoolId) -> Result<Pool, AmmError> {
        self.state.registry.get(id).cloned()
    }

    pub(crate) fn pool_state(&self, id: PoolId) -> Result<PoolState, AmmError> {
        self.state.pool_state(id)
    }

    /// Writes reserves (accumulating TWAP first) and records a `Sync`.
    pub(crate) fn update(
        &mut self,
        id: PoolId,
        balance0: Amount,
        balance1: Amount,
    ) -> Result<(), AmmError> {
        self.state
            .registry
            .set_reserves(id, balance0, balance1, self.now)?;
        self.emit(Event::Sync {
            pool: id,
            reserve0: balance0,
            reserve1: balance1,
        });
        Ok(())
    }

    /// Moves tokens out of (or between) accounts inside the transaction.
    pub(crate) fn pay(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        crate::ledger::pay(&mut self.state.tokens, token, from, to, amount)
    }
}
