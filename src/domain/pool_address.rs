//! Deterministic constant-product pool identity.

use core::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{AssetPair, BasisPoints};

/// Domain-separation tag for pool address derivation.
const POOL_TAG: &[u8] = b"tidepool/cp-pool/v1";

/// The address of a constant-product pool, derived deterministically from
/// the canonical asset pair and the fee rate.
///
/// Because [`AssetPair`] is canonically sorted, `(A, B, fee)` and
/// `(B, A, fee)` derive the same address, and exactly one pool can exist
/// per `(assets, fee)` triple.
///
/// # Examples
///
/// ```
/// use tidepool::domain::{AssetId, AssetPair, BasisPoints, PoolAddress};
///
/// let a = AssetId::from_bytes([1u8; 32]);
/// let b = AssetId::from_bytes([2u8; 32]);
/// let pair = AssetPair::new(a, b).expect("distinct");
///
/// let addr = PoolAddress::derive(&pair, BasisPoints::new(30));
/// assert_eq!(addr, PoolAddress::derive(&pair, BasisPoints::new(30)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PoolAddress([u8; 32]);

impl PoolAddress {
    /// Derives the pool address for a canonical pair and fee rate.
    ///
    /// `SHA-256(tag || first || second || fee_le)`.
    #[must_use]
    pub fn derive(pair: &AssetPair, fee_bps: BasisPoints) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(POOL_TAG);
        hasher.update(pair.first().as_bytes());
        hasher.update(pair.second().as_bytes());
        hasher.update(fee_bps.get().to_le_bytes());
        Self(hasher.finalize().into())
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl fmt::Display for PoolAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
