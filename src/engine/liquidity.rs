//! Share minting and burning.
//!
//! Both operations work from the pool's *actual* balances:
//!
//! - `mint` treats whatever the custody account holds above the reserves
//!   as the deposit.
//! - `burn` pays `shares / total` of the current balances, so tokens sent
//!   straight to the pool are shared out fairly.
//!
//! Before either, the protocol's cut of fee growth is minted, which changes
//! the share total the rest of the operation uses.

use ethnum::U256;
use tracing::debug;

use super::Transaction;
use crate::config::ProtocolFee;
use crate::domain::{Address, Amount, Event, Liquidity, PoolId};
use crate::error::AmmError;
use crate::ledger::{pull, ShareLedger, TokenLedger};
use crate::math::{
    initial_shares, proportional_shares, protocol_fee_shares, redeemed_amounts, MINIMUM_LIQUIDITY,
};

impl<T: TokenLedger, S: ShareLedger> Transaction<'_, T, S> {
    /// Mints shares for tokens already transferred to the pool.
    pub(crate) fn mint(
        &mut self,
        sender: Address,
        id: PoolId,
        to: Address,
    ) -> Result<Liquidity, AmmError> {
        let pool = self.pool(id)?;
        let (reserve0, reserve1) = pool.reserves();
        let (balance0, balance1) = self.state.balances(&pool);
        let amount0 = balance0.saturating_sub(&reserve0);
        let amount1 = balance1.saturating_sub(&reserve1);

        let fee_on = self.mint_protocol_fee(id, reserve0, reserve1)?;
        let total = self.state.shares.total_shares(id);
        let minted = if total.is_zero() {
            let minted = initial_shares(amount0, amount1)?;
            self.state
                .shares
                .mint_shares(Address::BURN, id, MINIMUM_LIQUIDITY)?;
            minted
        } else {
            proportional_shares((amount0, amount1), (reserve0, reserve1), total)?
        };
        self.state.shares.mint_shares(to, id, minted)?;

        self.update(id, balance0, balance1)?;
        if fee_on {
            self.checkpoint_k(id)?;
        }
        self.emit(Event::Mint {
            pool: id,
            sender,
            amount0,
            amount1,
        });
        debug!(pool = %id, %sender, %to, %amount0, %amount1, shares = %minted, "minted liquidity");
        Ok(minted)
    }

    /// Pulls both amounts from `owner` into the pool, then mints.
    pub(crate) fn add_liquidity(
        &mut self,
        owner: Address,
        id: PoolId,
        amounts: (Amount, Amount),
        to: Address,
    ) -> Result<Liquidity, AmmError> {
        let pool = self.pool(id)?;
        let custody = pool.address();
        pull(
            &mut self.state.tokens,
            pool.token0(),
            custody,
            owner,
            custody,
            amounts.0,
        )?;
        pull(
            &mut self.state.tokens,
            pool.token1(),
            custody,
            owner,
            custody,
            amounts.1,
        )?;
        self.mint(owner, id, to)
    }

    /// Burns `owner`'s shares and pays the pro-rata balances to `to`.
    pub(crate) fn burn(
        &mut self,
        owner: Address,
        id: PoolId,
        shares: Liquidity,
        to: Address,
    ) -> Result<(Amount, Amount), AmmError> {
        if owner == Address::BURN {
            return Err(AmmError::LockedLiquidity);
        }
        let pool = self.pool(id)?;
        let custody = pool.address();
        let (reserve0, reserve1) = pool.reserves();
        let balances = self.state.balances(&pool);

        let fee_on = self.mint_protocol_fee(id, reserve0, reserve1)?;
        let total = self.state.shares.total_shares(id);
        let (amount0, amount1) = redeemed_amounts(shares, balances, total)?;
        self.state.shares.burn_shares(owner, id, shares)?;
        self.pay(pool.token0(), custody, to, amount0)?;
        self.pay(pool.token1(), custody, to, amount1)?;

        let (balance0, balance1) = self.state.balances(&pool);
        self.update(id, balance0, balance1)?;
        if fee_on {
            self.checkpoint_k(id)?;
        }
        self.emit(Event::Burn {
            pool: id,
            sender: owner,
            amount0,
            amount1,
            to,
        });
        debug!(pool = %id, %owner, %to, %amount0, %amount1, shares = %shares, "burned liquidity");
        Ok((amount0, amount1))
    }

    /// Mints the protocol's share of `√k` growth and reports whether fee
    /// accounting is on.
    fn mint_protocol_fee(
        &mut self,
        id: PoolId,
        reserve0: Amount,
        reserve1: Amount,
    ) -> Result<bool, AmmError> {
        let k_last = self.state.registry.accumulator(id)?.k_last;
        match self.exchange.config().protocol_fee() {
            ProtocolFee::Enabled { recipient } => {
                if k_last != U256::ZERO {
                    let total = self.state.shares.total_shares(id);
                    let fee = protocol_fee_shares((reserve0, reserve1), k_last, total)?;
                    if !fee.is_zero() {
                        self.state.shares.mint_shares(recipient, id, fee)?;
                        debug!(pool = %id, %recipient, shares = %fee, "minted protocol fee");
                    }
                }
                Ok(true)
            }
            ProtocolFee::Disabled => {
                if k_last != U256::ZERO {
                    self.state.registry.set_k_last(id, U256::ZERO)?;
                }
                Ok(false)
            }
        }
    }

    fn checkpoint_k(&mut self, id: PoolId) -> Result<(), AmmError> {
        let k = self.state.registry.get(id)?.k();
        self.state.registry.set_k_last(id, k)
    }
}
