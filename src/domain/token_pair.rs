//! Ordered pair of distinct tokens.

use super::Address;
use crate::error::AmmError;

/// An ordered pair of distinct tokens, canonically sorted by address.
///
/// The canonical ordering guarantees `token0 < token1`, so `(A, B)` and
/// `(B, A)` name the same pair.  Because [`Address::NATIVE`] is all zeros,
/// the native asset always lands in `token0`.
///
/// # Examples
///
/// ```
/// use hydra_exchange::domain::{Address, TokenPair};
///
/// let usdc = Address::from_bytes([2u8; 32]);
/// let pair = TokenPair::new(usdc, Address::NATIVE).expect("distinct tokens");
/// assert_eq!(pair.token0(), Address::NATIVE);
/// assert_eq!(pair.token1(), usdc);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenPair {
    token0: Address,
    token1: Address,
}

impl TokenPair {
    /// Creates a canonically ordered pair from two tokens in any order.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::IdenticalTokens`] if both addresses are equal.
    pub fn new(token_a: Address, token_b: Address) -> Result<Self, AmmError> {
        if token_a == token_b {
            return Err(AmmError::IdenticalTokens);
        }
        let (token0, token1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        Ok(Self { token0, token1 })
    }

    /// Returns the lower-sorted token.
    #[must_use]
    pub const fn token0(&self) -> Address {
        self.token0
    }

    /// Returns the higher-sorted token.
    #[must_use]
    pub const fn token1(&self) -> Address {
        self.token1
    }

    /// Returns `true` if `token` is part of this pair.
    #[must_use]
    pub fn contains(&self, token: Address) -> bool {
        self.token0 == token || self.token1 == token
    }

    /// Returns `true` if `token` is `token0`, `false` if it is `token1`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidToken`] if `token` is not in the pair.
    pub fn is_token0(&self, token: Address) -> Result<bool, AmmError> {
        if token == self.token0 {
            Ok(true)
        } else if token == self.token1 {
            Ok(false)
        } else {
            Err(AmmError::InvalidToken("token is not part of this pair"))
        }
    }

    /// Returns the counterpart of `token` in this pair.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidToken`] if `token` is not in the pair.
    pub fn other(&self, token: Address) -> Result<Address, AmmError> {
        if self.is_token0(token)? {
            Ok(self.token1)
        } else {
            Ok(self.token0)
        }
    }
}
