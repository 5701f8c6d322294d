//! Opaque account handle.

use core::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A generic, chain-agnostic address identifying a balance-holding account.
///
/// Wraps a fixed-size `[u8; 32]` byte array. All 32-byte sequences are
/// considered valid accounts, so construction is infallible.
///
/// Internal subsystem accounts (per-asset curve vaults, graduation reserves,
/// pool vaults) are derived deterministically from a domain-separation tag
/// plus seed bytes, so they can never collide with each other. Their
/// addresses are publicly computable; the exchange rejects them wherever a
/// caller supplies an account.
///
/// # Examples
///
/// ```
/// use tidepool::domain::AccountId;
///
/// let acct = AccountId::from_bytes([1u8; 32]);
/// assert_eq!(acct.as_bytes(), [1u8; 32]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId([u8; 32]);

impl AccountId {
    /// Creates an `AccountId` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Derives a subsystem account from a domain-separation tag and seed.
    ///
    /// `SHA-256(tag || seed)` — the tag keeps vault namespaces disjoint.
    #[must_use]
    pub fn derived(tag: &str, seed: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(tag.as_bytes());
        hasher.update(seed);
        Self(hasher.finalize().into())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
