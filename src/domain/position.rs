//! LP position accounting.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Amount;

/// Identity of one liquidity position, scoped to a single pool.
///
/// Ids are assigned monotonically by the pool and never reused, even after
/// the position is closed. Ownership of a position is tracked by an external
/// collaborator; the pool only knows the id and its share balance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PositionId(u64);

impl PositionId {
    /// Creates a `PositionId` from a raw `u64`.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying `u64` value.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One pool position: a claim on `shares` out of the pool's LP supply.
///
/// Created on the first liquidity add without an existing id; removed when
/// its shares reach exactly zero after a removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    shares: Amount,
}

impl Position {
    /// Creates a position with an initial share balance.
    #[must_use]
    pub const fn new(shares: Amount) -> Self {
        Self { shares }
    }

    /// Returns the share balance.
    #[must_use]
    pub const fn shares(&self) -> Amount {
        self.shares
    }

    /// Adds minted shares to the position. `None` on overflow.
    #[must_use]
    pub fn checked_add_shares(&self, minted: Amount) -> Option<Self> {
        Some(Self {
            shares: self.shares.checked_add(minted)?,
        })
    }

    /// Burns shares from the position. `None` on underflow.
    #[must_use]
    pub fn checked_sub_shares(&self, burned: Amount) -> Option<Self> {
        Some(Self {
            shares: self.shares.checked_sub(burned)?,
        })
    }
}
