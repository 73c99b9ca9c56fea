//! Liquidity share arithmetic.
//!
//! - First deposit: `isqrt(amount0 * amount1) - MINIMUM_LIQUIDITY`.
//! - Later deposits: `min(amount0 * S / reserve0, amount1 * S / reserve1)`.
//! - Redemption: `shares * balance / S` per side.
//! - Protocol fee: `S * (√k - √k_last) / (5·√k + √k_last)`, one sixth of
//!   the growth in `√k` expressed in shares.
//!
//! Every division rounds down, in the pool's favour.

use ethnum::U256;

use super::isqrt;
use crate::domain::{Amount, Liquidity};
use crate::error::AmmError;

/// Shares locked at [`Address::BURN`](crate::domain::Address::BURN) by the
/// first deposit of every pool.
pub const MINIMUM_LIQUIDITY: Liquidity = Liquidity::MINIMUM;

/// Shares minted to the first depositor, net of [`MINIMUM_LIQUIDITY`].
///
/// # Errors
///
/// Returns [`AmmError::InsufficientLiquidityMinted`] if `isqrt(amount0 *
/// amount1)` does not exceed the minimum.
///
/// # Examples
///
/// ```
/// use hydra_exchange::domain::{Amount, Liquidity};
/// use hydra_exchange::math::initial_shares;
///
/// let shares = initial_shares(Amount::new(4_000), Amount::new(1_000)).expect("minted");
/// assert_eq!(shares, Liquidity::new(1_000));
/// ```
pub fn initial_shares(amount0: Amount, amount1: Amount) -> Result<Liquidity, AmmError> {
    let root = isqrt(amount0.widen() * amount1.widen());
    let minted = root
        .checked_sub(MINIMUM_LIQUIDITY.widen())
        .filter(|m| *m != U256::ZERO)
        .ok_or(AmmError::InsufficientLiquidityMinted)?;
    Liquidity::narrow(minted).ok_or(AmmError::Overflow("initial shares"))
}

/// Shares for a deposit into a pool that already has `total` shares.
///
/// Pro-rata by whichever side is scarcer.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if a reserve is zero.
/// - [`AmmError::InsufficientLiquidityMinted`] if the result is zero.
pub fn proportional_shares(
    amounts: (Amount, Amount),
    reserves: (Amount, Amount),
    total: Liquidity,
) -> Result<Liquidity, AmmError> {
    if reserves.0.is_zero() || reserves.1.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    let by0 = amounts.0.widen() * total.widen() / reserves.0.widen();
    let by1 = amounts.1.widen() * total.widen() / reserves.1.widen();
    let minted = by0.min(by1);
    if minted == U256::ZERO {
        return Err(AmmError::InsufficientLiquidityMinted);
    }
    Liquidity::narrow(minted).ok_or(AmmError::Overflow("minted shares"))
}

/// Token amounts redeemed by burning `shares` out of `total`, measured
/// against the pool's actual `balances`.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `total` is zero.
/// - [`AmmError::InsufficientLiquidityBurned`] if `shares` exceeds `total`
///   or either amount rounds to zero.
pub fn redeemed_amounts(
    shares: Liquidity,
    balances: (Amount, Amount),
    total: Liquidity,
) -> Result<(Amount, Amount), AmmError> {
    if total.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    if shares > total {
        return Err(AmmError::InsufficientLiquidityBurned);
    }
    // shares <= total, so each quotient is at most the balance and fits.
    let amount0 = shares.widen() * balances.0.widen() / total.widen();
    let amount1 = shares.widen() * balances.1.widen() / total.widen();
    let (Some(amount0), Some(amount1)) = (Amount::narrow(amount0), Amount::narrow(amount1)) else {
        return Err(AmmError::Overflow("redeemed amount"));
    };
    if amount0.is_zero() || amount1.is_zero() {
        return Err(AmmError::InsufficientLiquidityBurned);
    }
    Ok((amount0, amount1))
}

/// Shares owed to the protocol for the growth of `√k` since `k_last`.
///
/// Returns zero when `k_last` is zero (fee accounting inactive) or `k`
/// has not grown.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if the fee does not fit in 128 bits.
pub fn protocol_fee_shares(
    reserves: (Amount, Amount),
    k_last: U256,
    total: Liquidity,
) -> Result<Liquidity, AmmError> {
    if k_last == U256::ZERO {
        return Ok(Liquidity::ZERO);
    }
    let root_k = isqrt(reserves.0.widen() * reserves.1.widen());
    let root_k_last = isqrt(k_last);
    if root_k <= root_k_last {
        return Ok(Liquidity::ZERO);
    }
    let numerator = total.widen() * (root_k - root_k_last);
    let denominator = root_k * U256::new(5) + root_k_last;
    Liquidity::narrow(numerator / denominator).ok_or(AmmError::Overflow("protocol fee shares"))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn initial_shares_subtracts_minimum() {
        let e24 = Amount::new(1_000_000_000_000_000_000_000_000);
        let Ok(shares) = initial_shares(e24, e24) else {
            panic!("expected Ok");
        };
        assert_eq!(shares, Liquidity::new(1_000_000_000_000_000_000_000_000 - 1_000));
    }

    #[test]
    fn initial_shares_at_minimum_fails() {
        assert_eq!(
            initial_shares(Amount::new(1_000), Amount::new(1_000)),
            Err(AmmError::InsufficientLiquidityMinted)
        );
    }

    #[test]
    fn initial_shares_below_minimum_fails_without_underflow() {
        assert_eq!(
            initial_shares(Amount::new(10), Amount::new(10)),
            Err(AmmError::InsufficientLiquidityMinted)
        );
        assert_eq!(
            initial_shares(Amount::ZERO, Amount::new(1_000_000)),
            Err(AmmError::InsufficientLiquidityMinted)
        );
    }

    #[test]
    fn proportional_exact_ratio() {
        let reserves = (Amount::new(1_000), Amount::new(4_000));
        let Ok(shares) = proportional_shares(
            (Amount::new(100), Amount::new(400)),
            reserves,
            Liquidity::new(2_000),
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(shares, Liquidity::new(200));
    }

    #[test]
    fn proportional_takes_scarcer_side() {
        // by0 = 100 * 2000 / 1000 = 200, by1 = 300 * 2000 / 4000 = 150
        let Ok(shares) = proportional_shares(
            (Amount::new(100), Amount::new(300)),
            (Amount::new(1_000), Amount::new(4_000)),
            Liquidity::new(2_000),
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(shares, Liquidity::new(150));
    }

    #[test]
    fn proportional_zero_fails() {
        assert_eq!(
            proportional_shares(
                (Amount::new(1), Amount::ZERO),
                (Amount::new(1_000), Amount::new(1_000)),
                Liquidity::new(1_000),
            ),
            Err(AmmError::InsufficientLiquidityMinted)
        );
    }

    #[test]
    fn redeem_pro_rata_against_balances() {
        let Ok((a0, a1)) = redeemed_amounts(
            Liquidity::new(250),
            (Amount::new(1_000), Amount::new(3_000)),
            Liquidity::new(1_000),
        ) else {
            panic!("expected Ok");
        };
        assert_eq!((a0, a1), (Amount::new(250), Amount::new(750)));
    }

    #[test]
    fn redeem_dust_fails() {
        assert_eq!(
            redeemed_amounts(
                Liquidity::new(1),
                (Amount::new(10), Amount::new(100_000)),
                Liquidity::new(1_000),
            ),
            Err(AmmError::InsufficientLiquidityBurned)
        );
    }

    #[test]
    fn protocol_fee_inactive_without_checkpoint() {
        assert_eq!(
            protocol_fee_shares((Amount::new(10), Amount::new(10)), U256::ZERO, Liquidity::new(10)),
            Ok(Liquidity::ZERO)
        );
    }

    #[test]
    fn protocol_fee_one_sixth_of_growth() {
        // √k grows 1000 → 1100 with 1000 shares: 1000 * 100 / (5500 + 1000) = 15
        let Ok(fee) = protocol_fee_shares(
            (Amount::new(1_100), Amount::new(1_100)),
            U256::new(1_000_000),
            Liquidity::new(1_000),
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(fee, Liquidity::new(15));
    }

    #[test]
    fn protocol_fee_zero_when_k_shrinks() {
        assert_eq!(
            protocol_fee_shares(
                (Amount::new(900), Amount::new(900)),
                U256::new(1_000_000),
                Liquidity::new(1_000),
            ),
            Ok(Liquidity::ZERO)
        );
    }
}
