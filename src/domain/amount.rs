//! Raw token amount with checked arithmetic.

use core::fmt;

use ethnum::U256;

use super::Rounding;

/// A raw token amount in the smallest unit (wei or equivalent).
///
/// Token amounts are `u128`.  Intermediate products in pool math are
/// widened to 256 bits via [`Amount::widen`] so no precision is lost.
/// Arithmetic methods are checked and return `None` instead of panicking.
///
/// # Examples
///
/// ```
/// use hydra_exchange::domain::Amount;
///
/// let a = Amount::new(100);
/// let b = Amount::new(200);
/// assert_eq!(a.checked_add(&b), Some(Amount::new(300)));
/// assert_eq!(a.saturating_sub(&b), Amount::ZERO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct Amount(u128);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Maximum representable amount.
    pub const MAX: Self = Self(u128::MAX);

    /// Creates a new `Amount` from a raw `u128` value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Widens to 256 bits for overflow-free products.
    #[must_use]
    pub const fn widen(&self) -> U256 {
        U256::new(self.0)
    }

    /// Narrows a 256-bit value back to an amount.  Returns `None` if it
    /// does not fit in 128 bits.
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

    /// Subtraction clamped at zero; `max(0, self - other)`.
    pub const fn saturating_sub(&self, other: &Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Checked division with explicit rounding direction.
    ///
    /// Returns `None` if `divisor` is zero.
    #[must_use]
    pub const fn checked_div(&self, divisor: &Self, rounding: Rounding) -> Option<Self> {
        match crate::math::div_round(self.0, divisor.0, rounding) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_and_get() {
        assert_eq!(Amount::new(42).get(), 42);
        assert_eq!(Amount::default(), Amount::ZERO);
        assert!(Amount::ZERO.is_zero());
        assert!(!Amount::new(1).is_zero());
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Amount::new(1_000_000)), "1000000");
    }

    #[test]
    fn add_overflow() {
        assert_eq!(Amount::MAX.checked_add(&Amount::new(1)), None);
        assert_eq!(
            Amount::new(100).checked_add(&Amount::new(200)),
            Some(Amount::new(300))
        );
    }

    #[test]
    fn sub_underflow() {
        assert_eq!(Amount::new(1).checked_sub(&Amount::new(2)), None);
        assert_eq!(Amount::new(1).saturating_sub(&Amount::new(2)), Amount::ZERO);
        assert_eq!(Amount::new(5).saturating_sub(&Amount::new(2)), Amount::new(3));
    }

    #[test]
    fn widen_and_narrow() {
        let wide = Amount::MAX.widen() * U256::new(2);
        assert_eq!(Amount::narrow(wide), None);
        assert_eq!(Amount::narrow(Amount::MAX.widen()), Some(Amount::MAX));
        assert_eq!(Amount::narrow(U256::ZERO), Some(Amount::ZERO));
    }

    #[test]
    fn div_rounding() {
        let ten = Amount::new(10);
        let three = Amount::new(3);
        assert_eq!(ten.checked_div(&three, Rounding::Down), Some(Amount::new(3)));
        assert_eq!(ten.checked_div(&three, Rounding::Up), Some(Amount::new(4)));
        assert_eq!(ten.checked_div(&Amount::ZERO, Rounding::Down), None);
    }

    #[test]
    fn ordering() {
        assert!(Amount::new(1) < Amount::new(2));
    }
}
