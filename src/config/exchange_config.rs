//! Exchange-wide configuration.

use crate::domain::{Address, FeeTier};
use crate::error::AmmError;

/// Whether liquidity operations mint a protocol cut of fee growth.
///
/// When enabled, every mint and burn first credits `recipient` with shares
/// worth one sixth of the growth in `√k` since the pool's last checkpoint.
/// Disabling it resets each pool's checkpoint the next time liquidity moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
pub enum ProtocolFee {
    /// No protocol fee; `k_last` is forced to zero.
    #[default]
    Disabled,
    /// Fee shares are minted to `recipient`.
    Enabled {
        /// Account receiving the fee shares.
        recipient: Address,
    },
}

impl ProtocolFee {
    /// Returns the fee recipient, if the fee is on.
    #[must_use]
    pub const fn recipient(&self) -> Option<Address> {
        match self {
            Self::Disabled => None,
            Self::Enabled { recipient } => Some(*recipient),
        }
    }

    /// Returns `true` if fee shares are minted.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled { .. })
    }
}

/// Configuration for an [`Exchange`](crate::exchange::Exchange).
///
/// # Validation
///
/// - `default_fee_tier` must be below 100%.
/// - A protocol-fee recipient may not be [`Address::NATIVE`] or
///   [`Address::BURN`].
///
/// # Examples
///
/// ```
/// use hydra_exchange::config::{ExchangeConfig, ProtocolFee};
/// use hydra_exchange::domain::{Address, FeeTier};
///
/// let treasury = Address::from_bytes([0xaa; 32]);
/// let config = ExchangeConfig::new(
///     ProtocolFee::Enabled { recipient: treasury },
///     FeeTier::TIER_0_30_PERCENT,
/// ).expect("valid config");
/// assert_eq!(config.protocol_fee().recipient(), Some(treasury));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExchangeConfig {
    protocol_fee: ProtocolFee,
    default_fee_tier: FeeTier,
}

impl ExchangeConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if any rule above fails.
    pub fn new(protocol_fee: ProtocolFee, default_fee_tier: FeeTier) -> Result<Self, AmmError> {
        let config = Self {
            protocol_fee,
            default_fee_tier,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// Deserialized configs bypass [`new`](Self::new); hosts should call
    /// this before use.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] on the first failing rule.
    pub fn validate(&self) -> Result<(), AmmError> {
        self.default_fee_tier.validate()?;
        if let ProtocolFee::Enabled { recipient } = self.protocol_fee {
            if recipient == Address::NATIVE || recipient == Address::BURN {
                return Err(AmmError::InvalidConfiguration(
                    "protocol fee recipient must be a real account",
                ));
            }
        }
        Ok(())
    }

    /// Returns the protocol fee mode.
    #[must_use]
    pub const fn protocol_fee(&self) -> ProtocolFee {
        self.protocol_fee
    }

    /// Returns the fee tier used when a pair is created without one.
    #[must_use]
    pub const fn default_fee_tier(&self) -> FeeTier {
        self.default_fee_tier
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            protocol_fee: ProtocolFee::Disabled,
            default_fee_tier: FeeTier::TIER_0_30_PERCENT,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fee_off_thirty_bps() {
        let config = ExchangeConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.protocol_fee().is_enabled());
        assert_eq!(config.default_fee_tier(), FeeTier::TIER_0_30_PERCENT);
    }

    #[test]
    fn burn_recipient_rejected() {
        let result = ExchangeConfig::new(
            ProtocolFee::Enabled {
                recipient: Address::BURN,
            },
            FeeTier::ZERO,
        );
        assert!(matches!(result, Err(AmmError::InvalidConfiguration(_))));
    }

    #[test]
    fn native_recipient_rejected() {
        let result = ExchangeConfig::new(
            ProtocolFee::Enabled {
                recipient: Address::NATIVE,
            },
            FeeTier::ZERO,
        );
        assert!(result.is_err());
    }

    #[test]
    fn full_fee_tier_rejected() {
        let result = ExchangeConfig::new(ProtocolFee::Disabled, FeeTier::new(10_000));
        assert!(result.is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_from_json() {
        let json = r#"{"protocol_fee":{"mode":"disabled"},"default_fee_tier":5}"#;
        let Ok(config) = serde_json::from_str::<ExchangeConfig>(json) else {
            panic!("valid json");
        };
        assert_eq!(config.default_fee_tier(), FeeTier::TIER_0_05_PERCENT);
        assert!(config.validate().is_ok());
    }
}
