//! Token balances, allowances and native value.

use std::collections::BTreeMap;

use crate::domain::{Address, Amount};
use crate::error::AmmError;

/// Fungible token accounting the exchange settles against.
///
/// Balances are keyed by `(token, holder)`.  The native asset
/// ([`Address::NATIVE`]) has no allowances and is never moved through
/// [`transfer`](Self::transfer); it only moves with
/// [`send_value`](Self::send_value).  [`balance_of`](Self::balance_of)
/// reports native holdings like any other token.
pub trait TokenLedger: Clone + Send + Sync {
    /// Balance of `holder` in `token`.
    fn balance_of(&self, token: Address, holder: Address) -> Amount;

    /// Remaining amount `spender` may pull from `owner`.
    fn allowance(&self, token: Address, owner: Address, spender: Address) -> Amount;

    /// Moves `amount` of `token` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientBalance`] if `from` holds less than `amount`.
    /// - [`AmmError::InvalidToken`] if `token` is the native asset.
    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError>;

    /// Moves `amount` of `token` from `owner` to `to`, spending `spender`'s
    /// allowance.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientAllowance`] if the allowance is too small.
    /// - [`AmmError::InsufficientBalance`] if `owner` holds less than `amount`.
    /// - [`AmmError::InvalidToken`] if `token` is the native asset.
    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError>;

    /// Sets the allowance of `spender` over `owner`'s `token`.
    fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: Amount);

    /// Sends native value from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `from` holds too little.
    fn send_value(&mut self, from: Address, to: Address, amount: Amount) -> Result<(), AmmError>;
}

/// In-memory [`TokenLedger`].
///
/// An allowance of [`Amount::MAX`] is treated as unlimited and never
/// decremented.
///
/// # Examples
///
/// ```
/// use hydra_exchange::domain::{Address, Amount};
/// use hydra_exchange::ledger::{TokenLedger, TokenVault};
///
/// let usdc = Address::from_bytes([2u8; 32]);
/// let alice = Address::from_bytes([10u8; 32]);
/// let bob = Address::from_bytes([11u8; 32]);
///
/// let mut vault = TokenVault::new();
/// vault.credit(usdc, alice, Amount::new(100)).expect("credited");
/// vault.transfer(usdc, alice, bob, Amount::new(40)).expect("transferred");
/// assert_eq!(vault.balance_of(usdc, bob), Amount::new(40));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenVault {
    balances: BTreeMap<(Address, Address), Amount>,
    allowances: BTreeMap<(Address, Address, Address), Amount>,
}

impl TokenVault {
    /// Creates an empty vault.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints `amount` of `token` (or native value) to `holder`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the balance would exceed `u128::MAX`.
    pub fn credit(&mut self, token: Address, holder: Address, amount: Amount) -> Result<(), AmmError> {
        let balance = self.balances.entry((token, holder)).or_default();
        *balance = balance
            .checked_add(&amount)
            .ok_or(AmmError::Overflow("token balance"))?;
        Ok(())
    }

    /// Sum of all holders' balances of `token`.
    #[must_use]
    pub fn supply(&self, token: Address) -> u128 {
        self.balances
            .iter()
            .filter(|((t, _), _)| *t == token)
            .fold(0u128, |acc, (_, b)| acc.saturating_add(b.get()))
    }

    fn move_balance(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let from_balance = self.balance_of(token, from);
        let remaining = from_balance
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientBalance)?;
        let to_balance = self.balance_of(token, to);
        if from != to {
            let credited = to_balance
                .checked_add(&amount)
                .ok_or(AmmError::Overflow("token balance"))?;
            self.balances.insert((token, to), credited);
            self.balances.insert((token, from), remaining);
        }
        Ok(())
    }
}

impl TokenLedger for TokenVault {
    fn balance_of(&self, token: Address, holder: Address) -> Amount {
        self.balances
            .get(&(token, holder))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> Amount {
        self.allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        if token.is_native() {
            return Err(AmmError::InvalidToken("native asset moves via send_value"));
        }
        self.move_balance(token, from, to, amount)
    }

    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        if token.is_native() {
            return Err(AmmError::InvalidToken("native asset moves via send_value"));
        }
        let allowance = self.allowance(token, owner, spender);
        if allowance != Amount::MAX {
            let remaining = allowance
                .checked_sub(&amount)
                .ok_or(AmmError::InsufficientAllowance)?;
            self.move_balance(token, owner, to, amount)?;
            self.allowances.insert((token, owner, spender), remaining);
            return Ok(());
        }
        self.move_balance(token, owner, to, amount)
    }

    fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: Amount) {
        self.allowances.insert((token, owner, spender), amount);
    }

    fn send_value(&mut self, from: Address, to: Address, amount: Amount) -> Result<(), AmmError> {
        self.move_balance(Address::NATIVE, from, to, amount)
    }
}
