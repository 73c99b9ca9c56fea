//! Integer arithmetic for pool accounting.
//!
//! Everything here is pure and works on [`ethnum::U256`] intermediates so
//! that products of two 128-bit quantities never lose precision.
//!
//! | Module | Contents |
//! |--------|----------|
//! | `sqrt` | [`isqrt`], floor square root |
//! | `uq112x112` | TWAP fixed-point encoding and [`MAX_RESERVE`] |
//! | `pricing` | [`get_amount_out`], [`get_amount_in`], [`check_invariant`] |
//! | `shares` | share minting, redemption and the protocol fee |
//! | `rounding` | [`div_round`] with explicit [`Rounding`](crate::domain::Rounding) |

mod pricing;
mod rounding;
mod shares;
mod sqrt;
mod uq112x112;

pub use pricing::{check_invariant, get_amount_in, get_amount_out};
pub use rounding::{div_round, div_round_wide};
pub use shares::{
    initial_shares, proportional_shares, protocol_fee_shares, redeemed_amounts, MINIMUM_LIQUIDITY,
};
pub use sqrt::isqrt;
pub use uq112x112::{accumulate, encode, fixed_divide, MAX_RESERVE, RESOLUTION};
