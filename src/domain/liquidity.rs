//! Liquidity share units.

use core::fmt;

use ethnum::U256;

/// Fungible pool shares.
///
/// Distinct from [`Amount`](super::Amount) because a share is a
/// proportional claim on both reserves of a pool, not a quantity of
/// either token.
///
/// # Examples
///
/// ```
/// use hydra_exchange::domain::Liquidity;
///
/// let a = Liquidity::new(1_000);
/// let b = Liquidity::new(2_000);
/// assert_eq!(a.checked_add(&b), Some(Liquidity::new(3_000)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Liquidity(u128);

impl Liquidity {
    /// No shares.
    pub const ZERO: Self = Self(0);

    /// Shares locked forever on the first deposit into a pool.
    pub const MINIMUM: Self = Self(1_000);

    /// Creates a new `Liquidity` from a raw `u128` value.
    #[must_use]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if there are no shares.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Widens to 256 bits.
    #[must_use]
    pub const fn widen(&self) -> U256 {
        U256::new(self.0)
    }

    /// Narrows a 256-bit value to shares; `None` if it exceeds 128 bits.
    #[must_use]
    pub fn narrow(value: U256) -> Option<Self> {
        let (high, low) = value.into_words();
        if high == 0 {
            Some(Self(low))
        } else {
            None
        }
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl fmt::Display for Liquidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
