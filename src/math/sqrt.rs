//! Integer square root on 256-bit values.

use ethnum::U256;

/// Newton iterations; each doubles the number of correct bits of the
/// one-bit-accurate seed, so seven reach the 128 bits a 256-bit root needs.
const NEWTON_ITERATIONS: usize = 7;

/// Returns `floor(sqrt(x))`.
///
/// Seeds Newton's method with `2^(log2(x) / 2)`, which is within a factor
/// of two of the root, runs a fixed number of iterations and finishes with
/// one rounding-down correction.  `isqrt(0) == 0`.
///
/// # Examples
///
/// ```
/// use ethnum::U256;
/// use hydra_exchange::math::isqrt;
///
/// assert_eq!(isqrt(U256::new(1_000_000)), U256::new(1_000));
/// assert_eq!(isqrt(U256::new(15)), U256::new(3));
/// ```
#[must_use]
pub fn isqrt(x: U256) -> U256 {
    if x == U256::ZERO {
        return U256::ZERO;
    }
    let log2 = 255 - x.leading_zeros();
    let mut result = U256::ONE << (log2 >> 1);
    for _ in 0..NEWTON_ITERATIONS {
        result = (result + x / result) >> 1u32;
    }
    let alt = x / result;
    if alt < result {
        alt
    } else {
        result
    }
}
