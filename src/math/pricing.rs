//! Constant-product pricing and the fee-adjusted invariant check.
//!
//! The fee is charged on the input side only.  With `c = 10 000 - fee_bps`:
//!
//! ```text
//! amount_out = floor(amount_in * c * reserve_out / (reserve_in * 10 000 + amount_in * c))
//! amount_in  = ceil(reserve_in * amount_out * 10 000 / ((reserve_out - amount_out) * c))
//! ```
//!
//! and after every swap the pool requires
//!
//! ```text
//! (balance0 * 10 000 - amount0_in * fee_bps) * (balance1 * 10 000 - amount1_in * fee_bps)
//!     >= reserve0 * reserve1 * 10 000^2
//! ```
//!
//! For 30 bps this is exactly the classic `1000 / 3` form scaled by ten.

use ethnum::U256;

use super::div_round_wide;
use crate::domain::{Amount, FeeTier, Rounding, FEE_DENOMINATOR};
use crate::error::AmmError;

/// Output for selling `amount_in` into a pool, rounded down.
///
/// # Errors
///
/// - [`AmmError::InsufficientInputAmount`] if `amount_in` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero.
/// - [`AmmError::Overflow`] if an intermediate exceeds 256 bits.
///
/// # Examples
///
/// ```
/// use hydra_exchange::domain::{Amount, FeeTier};
/// use hydra_exchange::math::get_amount_out;
///
/// let out = get_amount_out(
///     Amount::new(1_000),
///     Amount::new(1_000_000),
///     Amount::new(2_000_000),
///     FeeTier::TIER_0_30_PERCENT,
/// ).expect("priced");
/// assert_eq!(out, Amount::new(1_992));
/// ```
pub fn get_amount_out(
    amount_in: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: FeeTier,
) -> Result<Amount, AmmError> {
    if amount_in.is_zero() {
        return Err(AmmError::InsufficientInputAmount);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    let with_fee = amount_in.widen() * U256::from(fee.complement());
    let numerator = with_fee
        .checked_mul(reserve_out.widen())
        .ok_or(AmmError::Overflow("amount out numerator"))?;
    let denominator = reserve_in
        .widen()
        .checked_mul(U256::from(FEE_DENOMINATOR))
        .and_then(|scaled| scaled.checked_add(with_fee))
        .ok_or(AmmError::Overflow("amount out denominator"))?;
    let out = div_round_wide(numerator, denominator, Rounding::Down)
        .ok_or(AmmError::DivisionByZero)?;
    Amount::narrow(out).ok_or(AmmError::Overflow("amount out exceeds 128 bits"))
}

/// Input required to buy exactly `amount_out` from a pool, rounded up.
///
/// # Errors
///
/// - [`AmmError::InsufficientOutputAmount`] if `amount_out` is zero.
/// - [`AmmError::InsufficientLiquidity`] if a reserve is zero or
///   `amount_out` is not below `reserve_out`.
/// - [`AmmError::DivisionByZero`] for a 100% fee tier.
/// - [`AmmError::Overflow`] if the input does not fit in 128 bits.
pub fn get_amount_in(
    amount_out: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: FeeTier,
) -> Result<Amount, AmmError> {
    if amount_out.is_zero() {
        return Err(AmmError::InsufficientOutputAmount);
    }
    if reserve_in.is_zero() || amount_out >= reserve_out {
        return Err(AmmError::InsufficientLiquidity);
    }
    let numerator = reserve_in
        .widen()
        .checked_mul(amount_out.widen())
        .and_then(|n| n.checked_mul(U256::from(FEE_DENOMINATOR)))
        .ok_or(AmmError::Overflow("amount in numerator"))?;
    let remaining = reserve_out.saturating_sub(&amount_out);
    let denominator = remaining.widen() * U256::from(fee.complement());
    let amount_in =
        div_round_wide(numerator, denominator, Rounding::Up).ok_or(AmmError::DivisionByZero)?;
    Amount::narrow(amount_in).ok_or(AmmError::Overflow("amount in exceeds 128 bits"))
}

/// Verifies the fee-adjusted constant product after a swap.
///
/// `balance*` are the pool's measured balances after payout and repayment,
/// `amount*_in` what it received, `reserve*` its reserves before the swap.
///
/// # Errors
///
/// - [`AmmError::InvariantViolation`] if the adjusted product is below `k`.
/// - [`AmmError::Overflow`] if the adjusted balances do not fit in 256 bits.
pub fn check_invariant(
    balances: (Amount, Amount),
    amounts_in: (Amount, Amount),
    reserves: (Amount, Amount),
    fee: FeeTier,
) -> Result<(), AmmError> {
    let adjusted0 = adjusted_balance(balances.0, amounts_in.0, fee)?;
    let adjusted1 = adjusted_balance(balances.1, amounts_in.1, fee)?;
    let lhs = adjusted0
        .checked_mul(adjusted1)
        .ok_or(AmmError::Overflow("adjusted balance product"))?;
    let scale = U256::from(FEE_DENOMINATOR) * U256::from(FEE_DENOMINATOR);
    let rhs = (reserves.0.widen() * reserves.1.widen())
        .checked_mul(scale)
        .ok_or(AmmError::Overflow("scaled k"))?;
    if lhs < rhs {
        return Err(AmmError::InvariantViolation);
    }
    Ok(())
}

fn adjusted_balance(balance: Amount, amount_in: Amount, fee: FeeTier) -> Result<U256, AmmError> {
    let scaled = balance.widen() * U256::from(FEE_DENOMINATOR);
    let fee_part = amount_in.widen() * U256::from(fee.bps());
    scaled
        .checked_sub(fee_part)
        .ok_or(AmmError::Overflow("fee exceeds balance"))
}
