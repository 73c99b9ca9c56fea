//! Swap fee tiers in basis points.

use core::fmt;

use crate::error::AmmError;

/// Fee denominator: 10 000 basis points = 100%.
pub const FEE_DENOMINATOR: u32 = 10_000;

/// A swap fee charged on the input side, in basis points (scale 10 000).
///
/// Any value below 10 000 is a usable tier; [`is_standard`](Self::is_standard)
/// tells whether it is one of the well-known presets.  The canonical
/// Uniswap-v2 fee is [`FeeTier::TIER_0_30_PERCENT`].
///
/// # Examples
///
/// ```
/// use hydra_exchange::domain::FeeTier;
///
/// let tier = FeeTier::TIER_0_30_PERCENT;
/// assert_eq!(tier.bps(), 30);
/// assert_eq!(tier.complement(), 9_970);
/// assert!(tier.is_standard());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeeTier(u16);

impl FeeTier {
    /// No fee.
    pub const ZERO: Self = Self(0);

    /// 0.05% fee, stablecoin pairs.
    pub const TIER_0_05_PERCENT: Self = Self(5);

    /// 0.30% fee, standard volatile pairs.
    pub const TIER_0_30_PERCENT: Self = Self(30);

    /// 1.00% fee, exotic pairs.
    pub const TIER_1_00_PERCENT: Self = Self(100);

    /// Creates a fee tier from raw basis points.
    #[must_use]
    pub const fn new(bps: u16) -> Self {
        Self(bps)
    }

    /// Returns the fee in basis points.
    #[must_use]
    pub const fn bps(&self) -> u32 {
        self.0 as u32
    }

    /// Returns `10 000 - bps`, the share of the input that reaches the curve.
    #[must_use]
    pub const fn complement(&self) -> u32 {
        FEE_DENOMINATOR.saturating_sub(self.0 as u32)
    }

    /// Checks that the tier leaves part of the input for the curve.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] for fees of 100% or more.
    pub const fn validate(&self) -> Result<(), AmmError> {
        if self.0 as u32 >= FEE_DENOMINATOR {
            return Err(AmmError::InvalidConfiguration(
                "fee tier must be below 10000 bps",
            ));
        }
        Ok(())
    }

    /// Returns `true` if this tier matches one of the presets (including zero).
    #[must_use]
    pub const fn is_standard(&self) -> bool {
        matches!(self.0, 0 | 5 | 30 | 100)
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
