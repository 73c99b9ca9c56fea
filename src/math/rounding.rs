//! Rounding helpers for integer division.
//!
//! [`div_round`] is the `u128` building block behind
//! [`Amount::checked_div`](crate::domain::Amount::checked_div);
//! [`div_round_wide`] does the same for 256-bit intermediates.
//!
//! # Examples
//!
//! ```
//! use hydra_exchange::domain::Rounding;
//! use hydra_exchange::math::div_round;
//!
//! assert_eq!(div_round(10, 3, Rounding::Down), Some(3));
//! assert_eq!(div_round(10, 3, Rounding::Up), Some(4));
//! assert_eq!(div_round(10, 0, Rounding::Down), None);
//! ```

use ethnum::U256;

use crate::domain::Rounding;

/// Integer division of `u128` values with explicit rounding direction.
///
/// Returns [`None`] if `denominator` is zero.
#[must_use]
pub const fn div_round(numerator: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let quotient = numerator / denominator;
    match rounding {
        Rounding::Down => Some(quotient),
        // quotient + 1 cannot overflow: a non-zero remainder implies denominator > 1.
        Rounding::Up if numerator % denominator != 0 => Some(quotient + 1),
        Rounding::Up => Some(quotient),
    }
}

/// Integer division of 256-bit values with explicit rounding direction.
///
/// Returns [`None`] if `denominator` is zero.
#[must_use]
pub fn div_round_wide(numerator: U256, denominator: U256, rounding: Rounding) -> Option<U256> {
    if denominator == U256::ZERO {
        return None;
    }
    let quotient = numerator / denominator;
    match rounding {
        Rounding::Up if numerator % denominator != U256::ZERO => Some(quotient + U256::ONE),
        _ => Some(quotient),
    }
}
