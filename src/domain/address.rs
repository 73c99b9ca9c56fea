//! Chain-agnostic account and token address.

use core::fmt;

use super::PoolId;

/// Prefix marking the custody account of a pool.
const POOL_TAG: [u8; 4] = [0xff, b'p', b'o', b'o'];

/// A 32-byte address naming either a token or an account holding tokens.
///
/// Tokens and holders share one address space, which is what lets a swap
/// reject a recipient equal to one of the pool's own tokens.
///
/// Three addresses are reserved:
///
/// - [`Address::NATIVE`]: the all-zero sentinel for the native asset.  It
///   sorts before every other address, so it is always `token0` of a pair.
/// - [`Address::BURN`]: receives the permanently locked minimum liquidity.
/// - [`Address::pool`]: the custody account derived from a pool id.
///
/// # Examples
///
/// ```
/// use hydra_exchange::domain::Address;
///
/// let addr = Address::from_bytes([1u8; 32]);
/// assert_eq!(addr.as_bytes(), [1u8; 32]);
/// assert!(Address::NATIVE < addr);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address([u8; 32]);

impl Address {
    /// The native asset sentinel.
    pub const NATIVE: Self = Self([0u8; 32]);

    /// Sink for shares that must never be redeemed.
    pub const BURN: Self = {
        let mut bytes = [0u8; 32];
        bytes[30] = 0xde;
        bytes[31] = 0xad;
        Self(bytes)
    };

    /// Creates an `Address` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Returns the custody account holding the balances of pool `id`.
    #[must_use]
    pub const fn pool(id: PoolId) -> Self {
        let mut bytes = [0u8; 32];
        bytes[0] = POOL_TAG[0];
        bytes[1] = POOL_TAG[1];
        bytes[2] = POOL_TAG[2];
        bytes[3] = POOL_TAG[3];
        let id_bytes = id.get().to_be_bytes();
        let mut i = 0;
        while i < 8 {
            bytes[24 + i] = id_bytes[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Returns the pool id if this is a pool custody address.
    #[must_use]
    pub fn pool_id(&self) -> Option<PoolId> {
        let (tag, rest) = self.0.split_at(4);
        if tag != POOL_TAG || rest.iter().take(20).any(|b| *b != 0) {
            return None;
        }
        let mut id_bytes = [0u8; 8];
        id_bytes.copy_from_slice(&self.0[24..]);
        Some(PoolId::new(u64::from_be_bytes(id_bytes)))
    }

    /// Returns `true` for the native asset sentinel.
    #[must_use]
    pub const fn is_native(&self) -> bool {
        let mut i = 0;
        while i < 32 {
            if self.0[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_round_trip() {
        let bytes = [42u8; 32];
        assert_eq!(Address::from_bytes(bytes).as_bytes(), bytes);
    }

    #[test]
    fn native_sorts_first() {
        assert!(Address::NATIVE.is_native());
        assert!(Address::NATIVE < Address::BURN);
        assert!(Address::NATIVE < Address::from_bytes([1u8; 32]));
    }

    #[test]
    fn burn_is_not_native() {
        assert!(!Address::BURN.is_native());
    }

    #[test]
    fn pool_addresses_are_distinct() {
        let a = Address::pool(PoolId::new(1));
        let b = Address::pool(PoolId::new(2));
        assert_ne!(a, b);
        assert_eq!(a, Address::pool(PoolId::new(1)));
        assert_eq!(a.as_bytes()[31], 1);
    }

    #[test]
    fn pool_id_decodes_custody_addresses_only() {
        let id = PoolId::new(0x0102_0304_0506_0708);
        assert_eq!(Address::pool(id).pool_id(), Some(id));
        assert_eq!(Address::BURN.pool_id(), None);
        assert_eq!(Address::NATIVE.pool_id(), None);
        let mut bytes = Address::pool(id).as_bytes();
        bytes[10] = 1;
        assert_eq!(Address::from_bytes(bytes).pool_id(), None);
    }

    #[test]
    fn display_is_hex() {
        let s = Address::BURN.to_string();
        assert!(s.starts_with("0x"));
        assert!(s.ends_with("dead"));
        assert_eq!(s.len(), 66);
    }

    #[test]
    fn debug_format() {
        let dbg = format!("{:?}", Address::NATIVE);
        assert!(dbg.contains("Address"));
    }
}
