//! Launch and pool parameters.
//!
//! A [`LaunchConfig`] fixes every economic constant of the engine: the
//! virtual reserve that softens the curve near zero liquidity, the
//! graduation threshold, fee rates, the per-asset inventories minted at
//! launch, and the treasury account that collects curve fees. It is
//! validated once when the [`Exchange`](crate::exchange::Exchange) is
//! constructed and immutable afterwards.

use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, Amount, BasisPoints};
use crate::error::{ExchangeError, Result};

/// One whole token in raw units (fixed-point scale of 10^8).
pub const UNIT_SCALE: u64 = 100_000_000;

/// Default virtual base reserve added to the real reserve in curve pricing.
pub const DEFAULT_VIRTUAL_BASE_RESERVE: u64 = 2_824_000_000;

/// Default net-reserve threshold that triggers graduation (21 500 base units).
pub const DEFAULT_GRADUATION_THRESHOLD: u64 = 21_500 * UNIT_SCALE;

/// Default fee charged on the gross spend of a curve buy (0.10%).
pub const DEFAULT_BUY_FEE_BPS: u16 = 10;

/// Default fee of the constant-product pool created at graduation (0.30%).
pub const DEFAULT_GRADUATED_POOL_FEE_BPS: u16 = 30;

/// Default curve inventory minted at launch (1 000 000 tokens).
pub const DEFAULT_CURVE_INVENTORY: u64 = 1_000_000 * UNIT_SCALE;

/// Default pre-minted allocation reserved for graduation seeding
/// (200 000 tokens).
pub const DEFAULT_RESERVED_ALLOCATION: u64 = 200_000 * UNIT_SCALE;

/// Immutable economic parameters of the exchange engine.
///
/// # Validation
///
/// - `virtual_base_reserve`, `graduation_threshold`, `curve_inventory`, and
///   `reserved_allocation` must all be non-zero.
/// - `graduated_pool_fee_bps` must lie in the open range `0 < fee < 10_000`.
/// - `buy_fee_bps` and `sell_fee_bps` must be below `10_000`; zero is
///   allowed (the source system charges no sell fee at all).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Constant added to the real reserve in the buy/sell price formulas.
    pub virtual_base_reserve: Amount,
    /// Net reserve level at which a curve graduates, exactly once.
    pub graduation_threshold: Amount,
    /// Fee on the gross spend of a buy, routed to the treasury.
    pub buy_fee_bps: BasisPoints,
    /// Fee on the payout of a sell, routed to the treasury. Zero by default,
    /// preserving the source system's buy/sell asymmetry.
    pub sell_fee_bps: BasisPoints,
    /// LP fee of the constant-product pool created at graduation.
    pub graduated_pool_fee_bps: BasisPoints,
    /// Asset inventory minted into the curve vault at launch.
    pub curve_inventory: Amount,
    /// Asset inventory pre-minted into the graduation reserve at launch,
    /// used to seed the graduated pool. Distinct from the curve inventory,
    /// which is burned at graduation.
    pub reserved_allocation: Amount,
    /// Account collecting curve trading fees.
    pub treasury: AccountId,
}

impl LaunchConfig {
    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::ZeroAmount`] if any required amount is zero.
    /// - [`ExchangeError::FeeZero`] / [`ExchangeError::FeeTooHigh`] if a fee
    ///   rate is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.virtual_base_reserve.is_zero()
            || self.graduation_threshold.is_zero()
            || self.curve_inventory.is_zero()
            || self.reserved_allocation.is_zero()
        {
            return Err(ExchangeError::ZeroAmount);
        }
        if self.graduated_pool_fee_bps.is_zero() {
            return Err(ExchangeError::FeeZero);
        }
        for fee in [
            self.buy_fee_bps,
            self.sell_fee_bps,
            self.graduated_pool_fee_bps,
        ] {
            if fee.get() >= 10_000 {
                return Err(ExchangeError::FeeTooHigh(fee.get()));
            }
        }
        Ok(())
    }
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            virtual_base_reserve: Amount::new(DEFAULT_VIRTUAL_BASE_RESERVE),
            graduation_threshold: Amount::new(DEFAULT_GRADUATION_THRESHOLD),
            buy_fee_bps: BasisPoints::new(DEFAULT_BUY_FEE_BPS),
            sell_fee_bps: BasisPoints::ZERO,
            graduated_pool_fee_bps: BasisPoints::new(DEFAULT_GRADUATED_POOL_FEE_BPS),
            curve_inventory: Amount::new(DEFAULT_CURVE_INVENTORY),
            reserved_allocation: Amount::new(DEFAULT_RESERVED_ALLOCATION),
            treasury: AccountId::derived("tidepool/treasury", b""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(LaunchConfig::default().validate().is_ok());
    }

    #[test]
    fn default_constants() {
        let cfg = LaunchConfig::default();
        assert_eq!(cfg.virtual_base_reserve, Amount::new(2_824_000_000));
        assert_eq!(cfg.graduation_threshold, Amount::new(2_150_000_000_000));
        assert_eq!(cfg.buy_fee_bps, BasisPoints::new(10));
        assert_eq!(cfg.sell_fee_bps, BasisPoints::ZERO);
        assert_eq!(cfg.graduated_pool_fee_bps, BasisPoints::new(30));
    }

    #[test]
    fn zero_threshold_rejected() {
        let cfg = LaunchConfig {
            graduation_threshold: Amount::ZERO,
            ..LaunchConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ExchangeError::ZeroAmount));
    }

    #[test]
    fn zero_graduated_fee_rejected() {
        let cfg = LaunchConfig {
            graduated_pool_fee_bps: BasisPoints::ZERO,
            ..LaunchConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ExchangeError::FeeZero));
    }

    #[test]
    fn full_range_fee_rejected() {
        let cfg = LaunchConfig {
            buy_fee_bps: BasisPoints::new(10_000),
            ..LaunchConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ExchangeError::FeeTooHigh(10_000)));
    }

    #[test]
    fn zero_sell_fee_allowed() {
        let cfg = LaunchConfig {
            sell_fee_bps: BasisPoints::ZERO,
            ..LaunchConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }
}
