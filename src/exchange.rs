//! The exchange core: pools, ledgers and their atomic entry points.
//!
//! # Transactions
//!
//! Each mutating method:
//!
//! 1. Enters the [`ReentrancyGuard`], failing with
//!    [`AmmError::Reentrancy`] if the calling thread is already inside an
//!    operation or any swap callback is running, and waiting if another
//!    thread holds it.
//! 2. Copies the committed state and runs against the copy.
//! 3. On success, publishes the copy and its buffered events; on failure,
//!    drops both.
//!
//! Read-only queries never take the guard and always see the last
//! committed state.

use core::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ethnum::U256;
use tracing::{debug, warn};

use crate::config::{ExchangeConfig, PairConfig};
use crate::domain::{
    Address, Amount, Event, FeeTier, Liquidity, Pool, PoolId, PoolState, PriceAccumulator,
    StrategyId, SwapHop,
};
use crate::engine::{ExchangeState, ReentrancyGuard, Transaction};
use crate::error::AmmError;
use crate::factory::PairFactory;
use crate::ledger::{ShareBook, ShareLedger, TokenLedger, TokenVault};
use crate::traits::{Clock, SwapCallback, SystemClock};

/// A registry of constant-product pools settling against a token ledger
/// `T` and a share ledger `S`.
///
/// `Exchange` is `Send + Sync`; share it between threads by reference or
/// `Arc`.  Mutations are serialized, reads are not.
///
/// # Examples
///
/// ```
/// use hydra_exchange::config::ExchangeConfig;
/// use hydra_exchange::domain::{Address, Amount, Liquidity};
/// use hydra_exchange::exchange::Exchange;
///
/// let usdc = Address::from_bytes([2u8; 32]);
/// let alice = Address::from_bytes([10u8; 32]);
///
/// let exchange = Exchange::new(ExchangeConfig::default()).expect("valid config");
/// let pool = exchange.create_pair(Address::NATIVE, usdc).expect("created");
///
/// exchange
///     .update_tokens(|vault| {
///         vault.credit(Address::NATIVE, alice, Amount::new(1_000_000))?;
///         vault.credit(usdc, alice, Amount::new(4_000_000))
///     })
///     .expect("funded");
/// exchange
///     .approve(usdc, alice, Address::pool(pool), Amount::MAX)
///     .expect("approved");
///
/// let shares = exchange
///     .add_liquidity(alice, pool, Amount::new(1_000_000), Amount::new(4_000_000), alice)
///     .expect("minted");
/// assert_eq!(shares, Liquidity::new(2_000_000 - 1_000));
/// ```
pub struct Exchange<T: TokenLedger = TokenVault, S: ShareLedger = ShareBook> {
    config: ExchangeConfig,
    factory: PairFactory,
    clock: Box<dyn Clock>,
    guard: ReentrancyGuard,
    state: RwLock<ExchangeState<T, S>>,
    events: Mutex<Vec<Event>>,
}

impl Exchange<TokenVault, ShareBook> {
    /// Creates an exchange with empty in-memory ledgers, the default
    /// strategies and wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `config` is invalid.
    pub fn new(config: ExchangeConfig) -> Result<Self, AmmError> {
        Self::with_components(
            config,
            PairFactory::new(),
            TokenVault::new(),
            ShareBook::new(),
            SystemClock,
        )
    }
}

impl<T: TokenLedger, S: ShareLedger> Exchange<T, S> {
    /// Creates an exchange from explicit parts.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `config` is invalid.
    pub fn with_components<C>(
        config: ExchangeConfig,
        factory: PairFactory,
        tokens: T,
        shares: S,
        clock: C,
    ) -> Result<Self, AmmError>
    where
        C: Clock + 'static,
    {
        config.validate()?;
        Ok(Self {
            config,
            factory,
            clock: Box::new(clock),
            guard: ReentrancyGuard::new(),
            state: RwLock::new(ExchangeState {
                registry: crate::registry::PoolRegistry::new(),
                tokens,
                shares,
            }),
            events: Mutex::new(Vec::new()),
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Returns the pair factory and its strategy table.
    #[must_use]
    pub const fn factory(&self) -> &PairFactory {
        &self.factory
    }

    pub(crate) const fn guard(&self) -> &ReentrancyGuard {
        &self.guard
    }

    // -- pools ----------------------------------------------------------------

    /// Creates a constant-product pair at the default fee tier.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalTokens`] if `token_a == token_b`.
    /// - [`AmmError::PairExists`] if the pair already has a pool.
    pub fn create_pair(&self, token_a: Address, token_b: Address) -> Result<PoolId, AmmError> {
        let config = PairConfig::new(
            token_a,
            token_b,
            self.config.default_fee_tier(),
            StrategyId::CONSTANT_PRODUCT,
        )?;
        self.create_pair_with(&config)
    }

    /// Creates a pair from an explicit blueprint.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PairExists`] if the `(pair, fee, strategy)` key is taken.
    /// - [`AmmError::UnknownStrategy`] if the strategy is not registered.
    /// - [`AmmError::InvalidConfiguration`] if the fee tier is invalid.
    pub fn create_pair_with(&self, config: &PairConfig) -> Result<PoolId, AmmError> {
        self.transact("create_pair", |tx| {
            let now = tx.now();
            let id = self
                .factory
                .create(&mut tx.state_mut().registry, config, now)?;
            let pair = config.pair();
            tx.emit(Event::PoolCreated {
                pool: id,
                token0: pair.token0(),
                token1: pair.token1(),
                fee_tier: config.fee_tier(),
                strategy: config.strategy(),
            });
            debug!(
                pool = %id,
                token0 = %pair.token0(),
                token1 = %pair.token1(),
                fee = %config.fee_tier(),
                strategy = %config.strategy(),
                "created pair"
            );
            Ok(id)
        })
    }

    // -- liquidity ------------------------------------------------------------

    /// Mints shares to `to` for whatever was transferred into the pool
    /// above its reserves.
    ///
    /// The first mint locks [`Liquidity::MINIMUM`] shares at
    /// [`Address::BURN`].
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientLiquidityMinted`] if no shares would be minted.
    /// - [`AmmError::Overflow`] if a resulting reserve exceeds 112 bits.
    pub fn mint(&self, sender: Address, id: PoolId, to: Address) -> Result<Liquidity, AmmError> {
        self.transact("mint", |tx| tx.mint(sender, id, to))
    }

    /// Pulls `amount0`/`amount1` of the pool's tokens from `owner` and mints.
    ///
    /// ERC-20 style tokens need an allowance for the pool's custody address;
    /// the native side is sent directly.
    ///
    /// # Errors
    ///
    /// As [`mint`](Self::mint), plus [`AmmError::InsufficientBalance`] and
    /// [`AmmError::InsufficientAllowance`].
    pub fn add_liquidity(
        &self,
        owner: Address,
        id: PoolId,
        amount0: Amount,
        amount1: Amount,
        to: Address,
    ) -> Result<Liquidity, AmmError> {
        self.transact("add_liquidity", |tx| {
            tx.add_liquidity(owner, id, (amount0, amount1), to)
        })
    }

    /// Burns `shares` held by `owner` and pays the pro-rata amounts to `to`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientLiquidityBurned`] if either side rounds to zero.
    /// - [`AmmError::InsufficientBalance`] if `owner` holds fewer shares.
    /// - [`AmmError::LockedLiquidity`] if `owner` is [`Address::BURN`].
    pub fn burn(
        &self,
        owner: Address,
        id: PoolId,
        shares: Liquidity,
        to: Address,
    ) -> Result<(Amount, Amount), AmmError> {
        self.transact("burn", |tx| tx.burn(owner, id, shares, to))
    }

    // -- swaps ----------------------------------------------------------------

    /// Two-sided swap: pays the requested outputs to `to`, then settles
    /// against what the pool holds.  Inputs must already be in the pool.
    ///
    /// Returns the derived `(amount0_in, amount1_in)`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientOutputAmount`] if both outputs are zero.
    /// - [`AmmError::InsufficientLiquidity`] if an output is not below its reserve.
    /// - [`AmmError::InvalidRecipient`] if `to` is one of the pool's tokens.
    /// - [`AmmError::InsufficientInputAmount`] if nothing came in.
    /// - [`AmmError::InvariantViolation`] if the fee-adjusted `k` shrank.
    pub fn swap(
        &self,
        sender: Address,
        id: PoolId,
        amount0_out: Amount,
        amount1_out: Amount,
        to: Address,
    ) -> Result<(Amount, Amount), AmmError> {
        self.transact("swap", |tx| {
            tx.swap(sender, id, (amount0_out, amount1_out), to, None)
        })
    }

    /// Like [`swap`](Self::swap), but runs `callback` after the payout so
    /// it can repay the pool with borrowed funds.
    ///
    /// # Errors
    ///
    /// As [`swap`](Self::swap), plus anything `callback` returns.
    #[allow(clippy::too_many_arguments)]
    pub fn flash_swap(
        &self,
        sender: Address,
        id: PoolId,
        amount0_out: Amount,
        amount1_out: Amount,
        to: Address,
        callback: &mut dyn SwapCallback<T, S>,
        data: &[u8],
    ) -> Result<(Amount, Amount), AmmError> {
        self.transact("flash_swap", |tx| {
            tx.swap(
                sender,
                id,
                (amount0_out, amount1_out),
                to,
                Some((callback, data)),
            )
        })
    }

    /// Sells exactly `amount_in` of `token_in` in one pool.
    ///
    /// # Errors
    ///
    /// As [`swap_exact_in_route`](Self::swap_exact_in_route).
    pub fn swap_exact_in(
        &self,
        sender: Address,
        id: PoolId,
        token_in: Address,
        amount_in: Amount,
        min_amount_out: Amount,
        to: Address,
    ) -> Result<Amount, AmmError> {
        let hops = self.swap_exact_in_route(sender, &[id], token_in, amount_in, min_amount_out, to)?;
        Ok(hops.last().map_or(Amount::ZERO, |hop| hop.amount_out))
    }

    /// Sells exactly `amount_in` of `token_in` through every pool in
    /// `path`, in order, as one atomic operation.
    ///
    /// The input is pulled from `sender` (allowance to the first pool's
    /// custody address); each hop's output goes straight into the next pool
    /// and the last one to `to`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidPath`] if `path` is empty or does not connect.
    /// - [`AmmError::InsufficientOutputAmount`] if the final output is below
    ///   `min_amount_out`.
    /// - Any error of an individual hop; earlier hops are rolled back too.
    pub fn swap_exact_in_route(
        &self,
        sender: Address,
        path: &[PoolId],
        token_in: Address,
        amount_in: Amount,
        min_amount_out: Amount,
        to: Address,
    ) -> Result<Vec<SwapHop>, AmmError> {
        self.transact("swap_exact_in", |tx| {
            tx.swap_exact_in_route(sender, path, token_in, amount_in, min_amount_out, to)
        })
    }

    /// Pays anything the pool holds above its reserves to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] for an unknown pool.
    pub fn skim(&self, id: PoolId, to: Address) -> Result<(Amount, Amount), AmmError> {
        self.transact("skim", |tx| tx.skim(id, to))
    }

    /// Sets the pool's reserves to its actual balances.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotFound`] for an unknown pool.
    /// - [`AmmError::Overflow`] if a balance exceeds 112 bits.
    pub fn sync(&self, id: PoolId) -> Result<(), AmmError> {
        self.transact("sync", |tx| tx.sync(id))
    }

    // -- ledgers --------------------------------------------------------------

    /// Transfers tokens (or native value) between accounts.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientBalance`] if `from` holds too little.
    /// - [`AmmError::PoolCustody`] if `from` is a registered pool's custody
    ///   account; pools only pay out through their own operations.
    pub fn transfer(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.transact("transfer", |tx| {
            if let Some(id) = from.pool_id() {
                if tx.pool(id).is_ok() {
                    return Err(AmmError::PoolCustody(id));
                }
            }
            tx.pay(token, from, to, amount)
        })
    }

    /// Sets `spender`'s allowance over `owner`'s `token`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Reentrancy`] when called from a swap callback.
    pub fn approve(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.transact("approve", |tx| {
            tx.state_mut().tokens.approve(token, owner, spender, amount);
            Ok(())
        })
    }

    /// Moves liquidity shares between owners.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientBalance`] if `from` holds too few.
    /// - [`AmmError::LockedLiquidity`] if `from` is [`Address::BURN`].
    pub fn transfer_shares(
        &self,
        from: Address,
        to: Address,
        id: PoolId,
        amount: Liquidity,
    ) -> Result<(), AmmError> {
        if from == Address::BURN {
            return Err(AmmError::LockedLiquidity);
        }
        self.transact("transfer_shares", |tx| {
            tx.state_mut().shares.transfer_shares(from, to, id, amount)
        })
    }

    /// Runs `f` against the token ledger as one transaction, e.g. to fund
    /// accounts with [`TokenVault::credit`].
    ///
    /// # Errors
    ///
    /// Propagates the error of `f`, in which case nothing changes.  Fails
    /// with [`AmmError::Insolvent`] if `f` leaves a pool's custody account
    /// below its reserves.
    pub fn update_tokens<R>(
        &self,
        f: impl FnOnce(&mut T) -> Result<R, AmmError>,
    ) -> Result<R, AmmError> {
        self.transact("update_tokens", |tx| f(&mut tx.state_mut().tokens))
    }

    // -- reads ----------------------------------------------------------------

    /// Returns a snapshot of pool `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] for an unknown pool.
    pub fn pool(&self, id: PoolId) -> Result<Pool, AmmError> {
        self.read().registry.get(id).cloned()
    }

    /// Returns the pool, its accumulators and share total.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] for an unknown pool.
    pub fn pool_state(&self, id: PoolId) -> Result<PoolState, AmmError> {
        self.read().pool_state(id)
    }

    /// Returns `(reserve0, reserve1)`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] for an unknown pool.
    pub fn reserves(&self, id: PoolId) -> Result<(Amount, Amount), AmmError> {
        self.read().registry.get(id).map(Pool::reserves)
    }

    /// Returns the stored TWAP accumulators and `k_last`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] for an unknown pool.
    pub fn accumulator(&self, id: PoolId) -> Result<PriceAccumulator, AmmError> {
        self.read().registry.accumulator(id).copied()
    }

    /// Cumulative prices as of now, including time since the last update.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] for an unknown pool.
    pub fn cumulative_prices(&self, id: PoolId) -> Result<(U256, U256), AmmError> {
        let now = self.clock.now();
        self.read().registry.cumulative_prices_at(id, now)
    }

    /// Finds the pool for two tokens, a fee tier and a strategy.
    #[must_use]
    pub fn find_pool(
        &self,
        token_a: Address,
        token_b: Address,
        fee_tier: FeeTier,
        strategy: StrategyId,
    ) -> Option<PoolId> {
        self.read()
            .registry
            .find(token_a, token_b, fee_tier, strategy)
    }

    /// Snapshots of every pool in id order.
    #[must_use]
    pub fn pools(&self) -> Vec<Pool> {
        self.read().registry.pools().cloned().collect()
    }

    /// Balance of `holder` in `token`.
    #[must_use]
    pub fn balance_of(&self, token: Address, holder: Address) -> Amount {
        self.read().tokens.balance_of(token, holder)
    }

    /// Remaining allowance of `spender` over `owner`'s `token`.
    #[must_use]
    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> Amount {
        self.read().tokens.allowance(token, owner, spender)
    }

    /// Shares of pool `id` held by `owner`.
    #[must_use]
    pub fn share_balance(&self, owner: Address, id: PoolId) -> Liquidity {
        self.read().shares.share_balance(owner, id)
    }

    /// Outstanding shares of pool `id`.
    #[must_use]
    pub fn total_shares(&self, id: PoolId) -> Liquidity {
        self.read().shares.total_shares(id)
    }

    // -- quotes ---------------------------------------------------------------

    /// Shares a deposit would mint, per the pool's strategy.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] or the strategy's error.
    pub fn quote_add_liquidity(
        &self,
        id: PoolId,
        amount0: Amount,
        amount1: Amount,
    ) -> Result<Liquidity, AmmError> {
        let state = self.pool_state(id)?;
        self.factory
            .strategy(state.pool.strategy())?
            .quote_add_liquidity(&state, amount0, amount1)
    }

    /// Amounts burning `shares` would pay, per the pool's strategy.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] or the strategy's error.
    pub fn quote_remove_liquidity(
        &self,
        id: PoolId,
        shares: Liquidity,
    ) -> Result<(Amount, Amount), AmmError> {
        let state = self.pool_state(id)?;
        self.factory
            .strategy(state.pool.strategy())?
            .quote_remove_liquidity(&state, shares)
    }

    /// Output for selling `amount_in` of `token_in`, per the pool's strategy.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] or the strategy's error.
    pub fn quote_swap(
        &self,
        id: PoolId,
        token_in: Address,
        amount_in: Amount,
    ) -> Result<Amount, AmmError> {
        let state = self.pool_state(id)?;
        self.factory
            .strategy(state.pool.strategy())?
            .quote_swap(&state, token_in, amount_in)
    }

    // -- events ---------------------------------------------------------------

    /// Drains events committed since the last call, oldest first.
    pub fn take_events(&self) -> Vec<Event> {
        core::mem::take(&mut *self.event_log())
    }

    // -- internals ------------------------------------------------------------

    fn transact<R>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut Transaction<'_, T, S>) -> Result<R, AmmError>,
    ) -> Result<R, AmmError> {
        let _entered = match self.guard.enter() {
            Ok(entered) => entered,
            Err(err) => {
                warn!(op, "rejected re-entrant call");
                return Err(err);
            }
        };
        let mut working = self.read().clone();
        let mut tx = Transaction::new(self, &mut working, self.clock.now());
        let result = f(&mut tx);
        let events = tx.into_events();
        match result.and_then(|value| working.check_solvency().map(|()| value)) {
            Ok(value) => {
                *self.write() = working;
                self.event_log().extend(events);
                Ok(value)
            }
            Err(err) => {
                debug!(op, %err, "rolled back");
                Err(err)
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ExchangeState<T, S>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ExchangeState<T, S>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn event_log(&self) -> MutexGuard<'_, Vec<Event>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: TokenLedger, S: ShareLedger> fmt::Debug for Exchange<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exchange")
            .field("config", &self.config)
            .field("factory", &self.factory)
            .field("clock", &self.clock)
            .field("pools", &self.read().registry.len())
            .finish_non_exhaustive()
    }
}
