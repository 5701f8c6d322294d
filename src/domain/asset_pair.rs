//! Ordered pair of distinct assets.

use serde::{Deserialize, Serialize};

use super::AssetId;
use crate::error::{ExchangeError, Result};

/// An ordered pair of distinct assets, canonically sorted by id.
///
/// The canonical ordering guarantees that `first() < second()`, preventing
/// duplicate pairs such as `(A, B)` and `(B, A)` from deriving different
/// pool addresses.
///
/// # Examples
///
/// ```
/// use tidepool::domain::{AssetId, AssetPair};
///
/// let a = AssetId::from_bytes([1u8; 32]);
/// let b = AssetId::from_bytes([2u8; 32]);
///
/// // Order is enforced automatically:
/// let pair = AssetPair::new(b, a).expect("distinct assets");
/// assert_eq!(pair.first(), a);
/// assert_eq!(pair.second(), b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetPair {
    asset_a: AssetId,
    asset_b: AssetId,
}

impl AssetPair {
    /// Creates a new canonically-ordered `AssetPair`.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::IdenticalAssets`] if both ids are equal.
    pub fn new(asset_1: AssetId, asset_2: AssetId) -> Result<Self> {
        if asset_1 == asset_2 {
            return Err(ExchangeError::IdenticalAssets);
        }

        let (asset_a, asset_b) = if asset_1 < asset_2 {
            (asset_1, asset_2)
        } else {
            (asset_2, asset_1)
        };

        Ok(Self { asset_a, asset_b })
    }

    /// Returns the first asset (lower id).
    #[must_use]
    pub const fn first(&self) -> AssetId {
        self.asset_a
    }

    /// Returns the second asset (higher id).
    #[must_use]
    pub const fn second(&self) -> AssetId {
        self.asset_b
    }

    /// Returns `true` if the given asset is part of this pair.
    #[must_use]
    pub fn contains(&self, asset: &AssetId) -> bool {
        self.asset_a == *asset || self.asset_b == *asset
    }

    /// Returns the counterpart of `asset` in this pair.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::PoolNotFound`] if `asset` is not in the pair.
    pub fn other(&self, asset: &AssetId) -> Result<AssetId> {
        if *asset == self.asset_a {
            Ok(self.asset_b)
        } else if *asset == self.asset_b {
            Ok(self.asset_a)
        } else {
            Err(ExchangeError::PoolNotFound)
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn asset(byte: u8) -> AssetId {
        AssetId::from_bytes([byte; 32])
    }

    #[test]
    fn valid_pair_preserves_order() {
        let Ok(pair) = AssetPair::new(asset(1), asset(2)) else {
            panic!("expected Ok");
        };
        assert_eq!(pair.first(), asset(1));
        assert_eq!(pair.second(), asset(2));
    }

    #[test]
    fn auto_sorts_reversed_input() {
        let Ok(pair) = AssetPair::new(asset(2), asset(1)) else {
            panic!("expected Ok");
        };
        assert_eq!(pair.first(), asset(1));
        assert_eq!(pair.second(), asset(2));
    }

    #[test]
    fn rejects_identical_assets() {
        assert_eq!(
            AssetPair::new(asset(1), asset(1)),
            Err(ExchangeError::IdenticalAssets)
        );
    }

    #[test]
    fn base_sorts_first() {
        let Ok(pair) = AssetPair::new(asset(9), AssetId::BASE) else {
            panic!("expected Ok");
        };
        assert_eq!(pair.first(), AssetId::BASE);
    }

    #[test]
    fn contains_and_other() {
        let Ok(pair) = AssetPair::new(asset(1), asset(2)) else {
            panic!("expected Ok");
        };
        assert!(pair.contains(&asset(1)));
        assert!(pair.contains(&asset(2)));
        assert!(!pair.contains(&asset(3)));
        assert_eq!(pair.other(&asset(1)), Ok(asset(2)));
        assert_eq!(pair.other(&asset(2)), Ok(asset(1)));
        assert!(pair.other(&asset(3)).is_err());
    }

    #[test]
    fn equality_of_pairs() {
        let (Ok(p1), Ok(p2)) = (
            AssetPair::new(asset(1), asset(2)),
            AssetPair::new(asset(2), asset(1)),
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(p1, p2);
    }
}
