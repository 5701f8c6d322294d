//! One-way transition from a bonding curve to a constant-product pool.
//!
//! When a buy pushes a curve's net reserve to the graduation threshold, the
//! curve permanently retires and its liquidity moves into a freshly created
//! base/asset constant-product pool:
//!
//! 1. derive the pool address from `{base, asset}` and the graduated-pool
//!    fee — the address must be vacant;
//! 2. create the pool and seed it with the full curve reserve plus the
//!    reserved token allocation pre-minted at launch;
//! 3. burn the curve vault's remaining unsold inventory;
//! 4. zero the curve reserve and set the graduated flag.
//!
//! The seed deposit is a first deposit, so the protocol's LP position
//! receives `floor(√(base × tokens))` shares. All fallible steps run here,
//! in the assert phase of the enclosing buy; the buy then commits the trade
//! and the transition together or not at all.

use crate::amm::{AddPlan, PoolState};
use crate::config::LaunchConfig;
use crate::domain::{Amount, AssetId, AssetPair, PoolAddress};
use crate::error::Result;

/// Fully validated graduation, ready to commit.
#[derive(Debug, Clone)]
pub(crate) struct GraduationPlan {
    pool: PoolState,
    add_plan: AddPlan,
    address: PoolAddress,
    base_amount: Amount,
    asset_amount: Amount,
    burn_amount: Amount,
}

impl GraduationPlan {
    /// Prices and validates the transition for a curve whose reserve will be
    /// `base_amount` once the triggering buy commits.
    ///
    /// `remaining_inventory` is the curve vault's token balance after the
    /// triggering buy's output is delivered; it is burned at commit.
    ///
    /// # Errors
    ///
    /// Propagates pool-creation and first-deposit failures
    /// ([`crate::error::ExchangeError::IdenticalAssets`],
    /// [`crate::error::ExchangeError::ZeroAmount`],
    /// [`crate::error::ExchangeError::InsufficientLiquidity`] when the seed
    /// would mint zero shares). Address vacancy is checked by the caller
    /// against its pool registry.
    pub(crate) fn prepare(
        config: &LaunchConfig,
        asset: AssetId,
        base_amount: Amount,
        remaining_inventory: Amount,
    ) -> Result<Self> {
        let pair = AssetPair::new(AssetId::BASE, asset)?;
        let pool = PoolState::new(pair, config.graduated_pool_fee_bps)?;
        let address = pool.address();
        // Base sorts first in every canonical pair, so side A is base.
        let add_plan = pool.plan_add(None, base_amount, config.reserved_allocation)?;
        Ok(Self {
            pool,
            add_plan,
            address,
            base_amount,
            asset_amount: config.reserved_allocation,
            burn_amount: remaining_inventory,
        })
    }

    pub(crate) const fn address(&self) -> PoolAddress {
        self.address
    }

    pub(crate) const fn base_amount(&self) -> Amount {
        self.base_amount
    }

    pub(crate) const fn asset_amount(&self) -> Amount {
        self.asset_amount
    }

    pub(crate) const fn burn_amount(&self) -> Amount {
        self.burn_amount
    }

    pub(crate) const fn lp_shares(&self) -> Amount {
        self.add_plan.minted()
    }

    /// Consumes the plan, producing the seeded pool. Infallible.
    pub(crate) fn into_pool(mut self) -> PoolState {
        self.pool.commit_add(&self.add_plan);
        self.pool
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::UNIT_SCALE;
    use crate::error::ExchangeError;
    use crate::math;

    fn asset() -> AssetId {
        AssetId::from_bytes([9u8; 32])
    }

    #[test]
    fn prepare_seeds_pool_with_reserve_and_allocation() {
        let config = LaunchConfig::default();
        let base = config.graduation_threshold;
        let Ok(plan) = GraduationPlan::prepare(&config, asset(), base, Amount::new(UNIT_SCALE))
        else {
            panic!("expected Ok");
        };
        let expected_shares = math::isqrt(
            u128::from(base.get()) * u128::from(config.reserved_allocation.get()),
        );
        assert_eq!(u128::from(plan.lp_shares().get()), expected_shares);
        assert_eq!(plan.base_amount(), base);
        assert_eq!(plan.asset_amount(), config.reserved_allocation);
        assert_eq!(plan.burn_amount(), Amount::new(UNIT_SCALE));

        let pool = plan.into_pool();
        assert_eq!(pool.reserve_a(), base);
        assert_eq!(pool.reserve_b(), config.reserved_allocation);
        assert_eq!(pool.position_count(), 1);
    }

    #[test]
    fn address_is_deterministic_per_asset() {
        let config = LaunchConfig::default();
        let base = config.graduation_threshold;
        let Ok(pair) = AssetPair::new(AssetId::BASE, asset()) else {
            panic!("distinct assets");
        };
        let Ok(plan) = GraduationPlan::prepare(&config, asset(), base, Amount::ZERO) else {
            panic!("expected Ok");
        };
        assert_eq!(
            plan.address(),
            PoolAddress::derive(&pair, config.graduated_pool_fee_bps)
        );
    }

    #[test]
    fn zero_base_rejected() {
        let config = LaunchConfig::default();
        assert!(matches!(
            GraduationPlan::prepare(&config, asset(), Amount::ZERO, Amount::ZERO),
            Err(ExchangeError::ZeroAmount)
        ));
    }

    #[test]
    fn base_asset_itself_cannot_graduate() {
        let config = LaunchConfig::default();
        assert_eq!(
            GraduationPlan::prepare(
                &config,
                AssetId::BASE,
                config.graduation_threshold,
                Amount::ZERO,
            )
            .map(|p| p.address()),
            Err(ExchangeError::IdenticalAssets)
        );
    }
}
