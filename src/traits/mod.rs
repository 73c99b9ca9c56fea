//! Extension seams of the exchange core.
//!
//! - [`PricingStrategy`]: per-pool quote curve, selected at pair creation.
//! - [`SwapCallback`]: flash-swap hook run between payout and settlement.
//! - [`Clock`]: timestamp source for TWAP accumulation.

mod clock;
mod pricing_strategy;
mod swap_callback;

pub use clock::{Clock, ManualClock, SystemClock};
pub use pricing_strategy::PricingStrategy;
pub use swap_callback::{SwapCallback, SwapContext};
