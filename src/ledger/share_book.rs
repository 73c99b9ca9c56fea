//! Liquidity share balances.

use std::collections::BTreeMap;

use crate::domain::{Address, Liquidity, PoolId};
use crate::error::AmmError;

/// Per-pool fungible share accounting.
///
/// Implementations must keep the sum of all owners' balances for a pool
/// equal to [`total_shares`](Self::total_shares) for that pool.
pub trait ShareLedger: Clone + Send + Sync {
    /// Creates `amount` new shares of `pool` for `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if a balance or the total would exceed
    /// `u128::MAX`.
    fn mint_shares(&mut self, owner: Address, pool: PoolId, amount: Liquidity)
        -> Result<(), AmmError>;

    /// Destroys `amount` of `owner`'s shares of `pool`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `owner` holds fewer.
    fn burn_shares(&mut self, owner: Address, pool: PoolId, amount: Liquidity)
        -> Result<(), AmmError>;

    /// Moves shares between owners.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `from` holds fewer.
    fn transfer_shares(
        &mut self,
        from: Address,
        to: Address,
        pool: PoolId,
        amount: Liquidity,
    ) -> Result<(), AmmError>;

    /// Outstanding shares of `pool`.
    fn total_shares(&self, pool: PoolId) -> Liquidity;

    /// Shares of `pool` held by `owner`.
    fn share_balance(&self, owner: Address, pool: PoolId) -> Liquidity;
}

/// In-memory [`ShareLedger`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareBook {
    balances: BTreeMap<(PoolId, Address), Liquidity>,
    totals: BTreeMap<PoolId, Liquidity>,
}

impl ShareBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of every owner's balance in `pool`.
    ///
    /// Always equals [`total_shares`](ShareLedger::total_shares).
    #[must_use]
    pub fn sum_of_balances(&self, pool: PoolId) -> u128 {
        self.balances
            .range((pool, Address::NATIVE)..)
            .take_while(|((p, _), _)| *p == pool)
            .fold(0u128, |acc, (_, l)| acc.saturating_add(l.get()))
    }
}

impl ShareLedger for ShareBook {
    fn mint_shares(
        &mut self,
        owner: Address,
        pool: PoolId,
        amount: Liquidity,
    ) -> Result<(), AmmError> {
        let total = self
            .total_shares(pool)
            .checked_add(&amount)
            .ok_or(AmmError::Overflow("total shares"))?;
        // balance <= total, so this cannot overflow once the total fits
        let balance = self
            .share_balance(owner, pool)
            .checked_add(&amount)
            .ok_or(AmmError::Overflow("share balance"))?;
        self.totals.insert(pool, total);
        self.balances.insert((pool, owner), balance);
        Ok(())
    }

    fn burn_shares(
        &mut self,
        owner: Address,
        pool: PoolId,
        amount: Liquidity,
    ) -> Result<(), AmmError> {
        let balance = self
            .share_balance(owner, pool)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientBalance)?;
        let total = self
            .total_shares(pool)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientBalance)?;
        self.balances.insert((pool, owner), balance);
        self.totals.insert(pool, total);
        Ok(())
    }

    fn transfer_shares(
        &mut self,
        from: Address,
        to: Address,
        pool: PoolId,
        amount: Liquidity,
    ) -> Result<(), AmmError> {
        let from_balance = self
            .share_balance(from, pool)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientBalance)?;
        if from == to {
            return Ok(());
        }
        let to_balance = self
            .share_balance(to, pool)
            .checked_add(&amount)
            .ok_or(AmmError::Overflow("share balance"))?;
        self.balances.insert((pool, from), from_balance);
        self.balances.insert((pool, to), to_balance);
        Ok(())
    }

    fn total_shares(&self, pool: PoolId) -> Liquidity {
        self.totals.get(&pool).copied().unwrap_or(Liquidity::ZERO)
    }

    fn share_balance(&self, owner: Address, pool: PoolId) -> Liquidity {
        self.balances
            .get(&(pool, owner))
            .copied()
            .unwrap_or(Liquidity::ZERO)
    }
}
