//! UQ112x112 fixed-point encoding for TWAP accumulators.
//!
//! A ratio of two 112-bit reserves is stored as `numerator * 2^112 /
//! denominator`, which fits in 224 bits.  Accumulators multiply that by an
//! elapsed time and add it with wrap-around.

use ethnum::U256;

use crate::domain::Amount;
use crate::error::AmmError;

/// Fractional bits of the encoding.
pub const RESOLUTION: u32 = 112;

/// Largest reserve a pool can record: `2^112 - 1`.
pub const MAX_RESERVE: Amount = Amount::new((1u128 << RESOLUTION) - 1);

/// Encodes `value` as UQ112x112.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if `value` does not fit in 112 bits.
pub fn encode(value: Amount) -> Result<U256, AmmError> {
    if value > MAX_RESERVE {
        return Err(AmmError::Overflow("value exceeds 112 bits"));
    }
    Ok(value.widen() << RESOLUTION)
}

/// Returns `numerator / denominator` as UQ112x112, rounded down.
///
/// # Errors
///
/// - [`AmmError::Overflow`] if `numerator` does not fit in 112 bits.
/// - [`AmmError::DivisionByZero`] if `denominator` is zero.
///
/// # Examples
///
/// ```
/// use ethnum::U256;
/// use hydra_exchange::domain::Amount;
/// use hydra_exchange::math::fixed_divide;
///
/// let two = fixed_divide(Amount::new(2_000), Amount::new(1_000)).expect("in range");
/// assert_eq!(two, U256::new(2) << 112u32);
/// ```
pub fn fixed_divide(numerator: Amount, denominator: Amount) -> Result<U256, AmmError> {
    if denominator.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    Ok(encode(numerator)? / denominator.widen())
}

/// Adds `price * elapsed` to `cumulative`, wrapping modulo 2^256.
#[must_use]
pub fn accumulate(cumulative: U256, price: U256, elapsed: u32) -> U256 {
    cumulative.wrapping_add(price.wrapping_mul(U256::from(elapsed)))
}
