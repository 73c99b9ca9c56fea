//! Balance ledgers the exchange settles against.
//!
//! The exchange core never owns token or share balances itself.  It talks
//! to two collaborators:
//!
//! - [`TokenLedger`]: fungible token balances and allowances, plus direct
//!   value transfers for [`Address::NATIVE`](crate::domain::Address::NATIVE).
//! - [`ShareLedger`]: per-pool liquidity share balances and totals.
//!
//! [`TokenVault`] and [`ShareBook`] are the in-memory implementations used
//! by default.  Both ledgers must be [`Clone`]: every mutating exchange
//! operation runs against a copy that is only committed on success.

mod share_book;
mod token_vault;

pub use share_book::{ShareBook, ShareLedger};
pub use token_vault::{TokenLedger, TokenVault};

use crate::domain::{Address, Amount};
use crate::error::AmmError;

/// Moves `amount` of `token` from `from` to `to`, routing the native asset
/// through [`TokenLedger::send_value`].
///
/// # Errors
///
/// Propagates the ledger's [`AmmError::InsufficientBalance`].
pub fn pay<T: TokenLedger>(
    ledger: &mut T,
    token: Address,
    from: Address,
    to: Address,
    amount: Amount,
) -> Result<(), AmmError> {
    if amount.is_zero() {
        return Ok(());
    }
    if token.is_native() {
        ledger.send_value(from, to, amount)
    } else {
        ledger.transfer(token, from, to, amount)
    }
}

/// Pulls `amount` of `token` from `owner` into `to` on behalf of `spender`.
///
/// The native asset carries no allowance; it is sent directly by its owner.
///
/// # Errors
///
/// Propagates [`AmmError::InsufficientBalance`] and
/// [`AmmError::InsufficientAllowance`].
pub fn pull<T: TokenLedger>(
    ledger: &mut T,
    token: Address,
    spender: Address,
    owner: Address,
    to: Address,
    amount: Amount,
) -> Result<(), AmmError> {
    if amount.is_zero() {
        return Ok(());
    }
    if token.is_native() {
        ledger.send_value(owner, to, amount)
    } else {
        ledger.transfer_from(token, spender, owner, to, amount)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 32])
    }

    #[test]
    fn pay_routes_native_through_send_value() {
        let mut vault = TokenVault::new();
        let Ok(()) = vault.credit(Address::NATIVE, addr(1), Amount::new(50)) else {
            panic!("credit");
        };
        let Ok(()) = pay(&mut vault, Address::NATIVE, addr(1), addr(2), Amount::new(20)) else {
            panic!("pay");
        };
        assert_eq!(vault.balance_of(Address::NATIVE, addr(2)), Amount::new(20));
        assert_eq!(vault.balance_of(Address::NATIVE, addr(1)), Amount::new(30));
    }

    #[test]
    fn pull_requires_allowance_for_tokens() {
        let token = addr(7);
        let mut vault = TokenVault::new();
        let Ok(()) = vault.credit(token, addr(1), Amount::new(100)) else {
            panic!("credit");
        };
        assert_eq!(
            pull(&mut vault, token, addr(9), addr(1), addr(2), Amount::new(10)),
            Err(AmmError::InsufficientAllowance)
        );
        vault.approve(token, addr(1), addr(9), Amount::new(10));
        let Ok(()) = pull(&mut vault, token, addr(9), addr(1), addr(2), Amount::new(10)) else {
            panic!("pull");
        };
        assert_eq!(vault.balance_of(token, addr(2)), Amount::new(10));
        assert_eq!(vault.allowance(token, addr(1), addr(9)), Amount::ZERO);
    }

    #[test]
    fn zero_amounts_are_no_ops() {
        let mut vault = TokenVault::new();
        assert_eq!(pay(&mut vault, addr(7), addr(1), addr(2), Amount::ZERO), Ok(()));
    }
}
