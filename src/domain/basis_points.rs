//! Basis-point fee rates.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Amount;
use crate::error::Result;
use crate::math;

/// Basis-point denominator (10 000 = 100%).
pub const BPS_DENOMINATOR: u16 = 10_000;

/// A fee rate expressed in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// All `u16` values can be constructed; pool creation enforces the open
/// range `0 < bps < 10 000` separately, since a zero rate is valid for the
/// configurable sell fee while a pool fee must be non-zero.
///
/// # Examples
///
/// ```
/// use tidepool::domain::{Amount, BasisPoints};
///
/// let fee = BasisPoints::new(30);
/// let charged = fee.apply(Amount::new(10_000)).expect("in range");
/// assert_eq!(charged, Amount::new(30));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct BasisPoints(u16);

impl BasisPoints {
    /// Zero basis points (0%).
    pub const ZERO: Self = Self(0);

    /// Creates a new `BasisPoints` from a raw `u16` value.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Returns the underlying `u16` value.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }

    /// Returns `true` if the rate is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Computes `floor(amount * bps / 10_000)`.
    ///
    /// Floor rounding means dust-sized inputs pay no fee; the pricing
    /// formulas floor in the pool's favour instead.
    ///
    /// # Errors
    ///
    /// Never fails for in-range inputs; propagates [`crate::math::mul_div`]
    /// errors structurally.
    pub fn apply(&self, amount: Amount) -> Result<Amount> {
        let fee = math::mul_div(
            amount.get(),
            u64::from(self.0),
            u128::from(BPS_DENOMINATOR),
        )?;
        Ok(Amount::new(fee))
    }

    /// Computes the complement `floor(amount * (10_000 - bps) / 10_000)`,
    /// i.e. the net amount after this fee.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::math::mul_div`] errors structurally.
    pub fn apply_complement(&self, amount: Amount) -> Result<Amount> {
        let net = math::mul_div(
            amount.get(),
            u64::from(BPS_DENOMINATOR.saturating_sub(self.0)),
            u128::from(BPS_DENOMINATOR),
        )?;
        Ok(Amount::new(net))
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
