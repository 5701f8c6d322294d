//! Opaque asset handle.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A chain-agnostic identity for one fungible asset.
///
/// Wraps a fixed-size `[u8; 32]` byte array. The all-zero id is reserved for
/// the base currency every bonding curve prices against; launched assets must
/// use any other value.
///
/// # Examples
///
/// ```
/// use tidepool::domain::AssetId;
///
/// let asset = AssetId::from_bytes([7u8; 32]);
/// assert!(!asset.is_base());
/// assert!(AssetId::BASE.is_base());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId([u8; 32]);

impl AssetId {
    /// The base currency identity (all-zero bytes).
    pub const BASE: Self = Self([0u8; 32]);

    /// Creates an `AssetId` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Returns `true` if this is the base currency.
    #[must_use]
    pub fn is_base(&self) -> bool {
        *self == Self::BASE
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_is_all_zeros() {
        assert_eq!(AssetId::BASE.as_bytes(), [0u8; 32]);
        assert!(AssetId::BASE.is_base());
    }

    #[test]
    fn non_base() {
        assert!(!AssetId::from_bytes([1u8; 32]).is_base());
    }

    #[test]
    fn ordering_is_lexicographic() {
        // BASE sorts before every other asset, so base is always the first
        // side of a canonical pair.
        let other = AssetId::from_bytes([1u8; 32]);
        assert!(AssetId::BASE < other);
    }

    #[test]
    fn display_is_hex() {
        let asset = AssetId::from_bytes([0x01; 32]);
        assert_eq!(format!("{asset}"), "01".repeat(32));
    }
}
