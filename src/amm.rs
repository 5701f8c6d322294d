//! Constant-product pool implementation (`x · y = k`).
//!
//! The swap invariant is `x × y = k` where `x` and `y` are the reserves of
//! the two assets. Fees are deducted from the input amount **before** the
//! pricing formula is applied, but the gross input is credited to the
//! reserve, so fees accrue to LP share value rather than to an external
//! treasury.
//!
//! # Swap algorithm (A → B)
//!
//! 1. `net = floor(amount_in × (10 000 − fee_bps) / 10 000)`
//! 2. `amount_out = floor(reserve_b × net / (reserve_a + net))`
//! 3. `reserve_a += amount_in` (fee stays in the pool)
//! 4. `reserve_b −= amount_out`
//!
//! # Invariant
//!
//! After every swap, `k_after ≥ k_before` because the fee component
//! increases reserves without a corresponding output.
//!
//! # Liquidity
//!
//! LP shares live in per-position accounts keyed by [`PositionId`]. The sum
//! of all positions' shares equals the pool's LP supply at all times, and
//! the reserves are simultaneously zero iff the supply is zero. A pool whose
//! last position withdraws fully returns to the empty state and can be
//! re-seeded.
//!
//! Every operation validates fully before mutating: the `plan_*` methods
//! compute and check, the `commit_*` methods write and cannot fail.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Amount, AssetPair, BasisPoints, PoolAddress, Position, PositionId};
use crate::error::{ExchangeError, Result};
use crate::math;

/// Which way a swap crosses the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Input the first (lower-id) asset, output the second.
    AToB,
    /// Input the second asset, output the first.
    BToA,
}

/// Outcome of a liquidity add.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityAdded {
    /// Position the shares were credited to (fresh when none was supplied).
    pub position_id: PositionId,
    /// Amount of asset A actually drawn (never more than desired).
    pub used_a: Amount,
    /// Amount of asset B actually drawn.
    pub used_b: Amount,
    /// LP shares minted.
    pub minted: Amount,
    /// LP supply after the add.
    pub supply_after: Amount,
}

/// Outcome of a liquidity removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityRemoved {
    /// Asset A paid out.
    pub out_a: Amount,
    /// Asset B paid out.
    pub out_b: Amount,
    /// LP shares burned.
    pub burned: Amount,
    /// LP supply after the removal.
    pub supply_after: Amount,
    /// Set when the position's shares hit exactly zero and it was removed.
    pub closed: Option<PositionId>,
}

/// Outcome of a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapExecuted {
    /// Gross input, fee included.
    pub amount_in: Amount,
    /// Output paid to the trader.
    pub amount_out: Amount,
    /// Fee portion of the input, retained in the reserves.
    pub fee_paid: Amount,
    /// Reserve of asset A after the swap.
    pub reserve_a_after: Amount,
    /// Reserve of asset B after the swap.
    pub reserve_b_after: Amount,
}

/// Validated plan for a liquidity add. Committing cannot fail.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AddPlan {
    position_id: PositionId,
    position_created: bool,
    shares_after: Amount,
    used_a: Amount,
    used_b: Amount,
    minted: Amount,
    supply_after: Amount,
    reserve_a_after: Amount,
    reserve_b_after: Amount,
}

impl AddPlan {
    pub(crate) const fn used_a(&self) -> Amount {
        self.used_a
    }

    pub(crate) const fn used_b(&self) -> Amount {
        self.used_b
    }

    pub(crate) const fn minted(&self) -> Amount {
        self.minted
    }
}

/// Validated plan for a liquidity removal.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RemovePlan {
    position_id: PositionId,
    shares_after: Amount,
    out_a: Amount,
    out_b: Amount,
    burned: Amount,
    supply_after: Amount,
    reserve_a_after: Amount,
    reserve_b_after: Amount,
}

impl RemovePlan {
    pub(crate) const fn out_a(&self) -> Amount {
        self.out_a
    }

    pub(crate) const fn out_b(&self) -> Amount {
        self.out_b
    }
}

/// Validated plan for a swap.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SwapPlan {
    amount_in: Amount,
    amount_out: Amount,
    fee_paid: Amount,
    reserve_a_after: Amount,
    reserve_b_after: Amount,
}

impl SwapPlan {
    pub(crate) const fn amount_out(&self) -> Amount {
        self.amount_out
    }
}

/// A general two-asset constant-product pool.
///
/// Created once per `(assets, fee)` at a deterministic [`PoolAddress`];
/// never destroyed. Swaps never change the LP supply, the asset pair, or
/// the fee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    address: PoolAddress,
    assets: AssetPair,
    fee_bps: BasisPoints,
    reserve_a: Amount,
    reserve_b: Amount,
    lp_supply: Amount,
    positions: BTreeMap<PositionId, Position>,
    next_position_id: u64,
}

impl PoolState {
    /// Creates an empty pool for a distinct asset pair and an LP fee in the
    /// open range `0 < fee < 10_000`.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::FeeZero`] / [`ExchangeError::FeeTooHigh`] for an
    ///   out-of-range fee.
    pub fn new(assets: AssetPair, fee_bps: BasisPoints) -> Result<Self> {
        if fee_bps.is_zero() {
            return Err(ExchangeError::FeeZero);
        }
        if fee_bps.get() >= 10_000 {
            return Err(ExchangeError::FeeTooHigh(fee_bps.get()));
        }
        Ok(Self {
            address: PoolAddress::derive(&assets, fee_bps),
            assets,
            fee_bps,
            reserve_a: Amount::ZERO,
            reserve_b: Amount::ZERO,
            lp_supply: Amount::ZERO,
            positions: BTreeMap::new(),
            next_position_id: 0,
        })
    }

    /// The pool's deterministic address.
    #[must_use]
    pub const fn address(&self) -> PoolAddress {
        self.address
    }

    /// The canonical asset pair.
    #[must_use]
    pub const fn assets(&self) -> AssetPair {
        self.assets
    }

    /// The LP fee in basis points.
    #[must_use]
    pub const fn fee_bps(&self) -> BasisPoints {
        self.fee_bps
    }

    /// Current reserve of asset A (the lower-id asset).
    #[must_use]
    pub const fn reserve_a(&self) -> Amount {
        self.reserve_a
    }

    /// Current reserve of asset B.
    #[must_use]
    pub const fn reserve_b(&self) -> Amount {
        self.reserve_b
    }

    /// Outstanding LP supply.
    #[must_use]
    pub const fn lp_supply(&self) -> Amount {
        self.lp_supply
    }

    /// Share balance of a position, if it exists.
    #[must_use]
    pub fn position_shares(&self, id: PositionId) -> Option<Amount> {
        self.positions.get(&id).map(|p| p.shares())
    }

    /// Number of open positions.
    #[must_use]
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    // -- liquidity add --------------------------------------------------------

    pub(crate) fn plan_add(
        &self,
        position_id: Option<PositionId>,
        desired_a: Amount,
        desired_b: Amount,
    ) -> Result<AddPlan> {
        if desired_a.is_zero() || desired_b.is_zero() {
            return Err(ExchangeError::ZeroAmount);
        }

        let (minted, used_a, used_b) = if self.lp_supply.is_zero() {
            // First deposit: shares = floor(sqrt(a * b)), both amounts drawn
            // in full. sqrt of a product of two u64 always fits u64.
            let product = u128::from(desired_a.get()) * u128::from(desired_b.get());
            let minted = math::isqrt(product) as u64;
            if minted == 0 {
                return Err(ExchangeError::InsufficientLiquidity);
            }
            (Amount::new(minted), desired_a, desired_b)
        } else {
            if self.reserve_a.is_zero() || self.reserve_b.is_zero() {
                return Err(ExchangeError::InsufficientLiquidity);
            }
            let supply = self.lp_supply.get();
            let mint_a = math::mul_div(
                desired_a.get(),
                supply,
                u128::from(self.reserve_a.get()),
            )?;
            let mint_b = math::mul_div(
                desired_b.get(),
                supply,
                u128::from(self.reserve_b.get()),
            )?;
            let minted = mint_a.min(mint_b);
            if minted == 0 {
                return Err(ExchangeError::InsufficientLiquidity);
            }
            // Draw back to the exact proportional amounts; the undrawn
            // excess of the larger side stays with the caller.
            let used_a = math::mul_div(minted, self.reserve_a.get(), u128::from(supply))?;
            let used_b = math::mul_div(minted, self.reserve_b.get(), u128::from(supply))?;
            (Amount::new(minted), Amount::new(used_a), Amount::new(used_b))
        };

        let supply_after = self
            .lp_supply
            .checked_add(minted)
            .ok_or(ExchangeError::Overflow("lp supply accumulation"))?;
        let reserve_a_after = self
            .reserve_a
            .checked_add(used_a)
            .ok_or(ExchangeError::Overflow("reserve accumulation"))?;
        let reserve_b_after = self
            .reserve_b
            .checked_add(used_b)
            .ok_or(ExchangeError::Overflow("reserve accumulation"))?;

        let (position_id, position_created, shares_after) = match position_id {
            Some(id) => {
                let position = self
                    .positions
                    .get(&id)
                    .ok_or(ExchangeError::PositionNotFound(id))?;
                let updated = position
                    .checked_add_shares(minted)
                    .ok_or(ExchangeError::Overflow("position share accumulation"))?;
                (id, false, updated.shares())
            }
            None => (PositionId::new(self.next_position_id), true, minted),
        };

        Ok(AddPlan {
            position_id,
            position_created,
            shares_after,
            used_a,
            used_b,
            minted,
            supply_after,
            reserve_a_after,
            reserve_b_after,
        })
    }

    pub(crate) fn commit_add(&mut self, plan: &AddPlan) -> LiquidityAdded {
        self.reserve_a = plan.reserve_a_after;
        self.reserve_b = plan.reserve_b_after;
        self.lp_supply = plan.supply_after;
        self.positions
            .insert(plan.position_id, Position::new(plan.shares_after));
        if plan.position_created {
            self.next_position_id += 1;
        }
        LiquidityAdded {
            position_id: plan.position_id,
            used_a: plan.used_a,
            used_b: plan.used_b,
            minted: plan.minted,
            supply_after: plan.supply_after,
        }
    }

    /// Adds liquidity to the pool.
    ///
    /// For the first deposit, shares equal `floor(√(a × b))` and both
    /// desired amounts are drawn in full. For subsequent deposits, shares
    /// are `min(floor(a·S/Rₐ), floor(b·S/R_b))` and the actually drawn
    /// amounts are the exact proportional share of the reserves — always at
    /// most the desired amounts; the pool never draws the excess.
    ///
    /// With no `position_id` a fresh position is created; with one, the
    /// position must already exist and the minted shares are added to it.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::ZeroAmount`] if either desired amount is zero.
    /// - [`ExchangeError::InsufficientLiquidity`] if the deposit is too
    ///   small to mint a share, or the pool has supply but an empty reserve.
    /// - [`ExchangeError::PositionNotFound`] for an unknown position id.
    /// - [`ExchangeError::Overflow`] if supply or reserves would overflow.
    pub fn add_liquidity(
        &mut self,
        position_id: Option<PositionId>,
        desired_a: Amount,
        desired_b: Amount,
    ) -> Result<LiquidityAdded> {
        let plan = self.plan_add(position_id, desired_a, desired_b)?;
        Ok(self.commit_add(&plan))
    }

    // -- liquidity removal ----------------------------------------------------

    pub(crate) fn plan_remove(
        &self,
        position_id: PositionId,
        shares_to_burn: Amount,
    ) -> Result<RemovePlan> {
        let position = self
            .positions
            .get(&position_id)
            .ok_or(ExchangeError::PositionNotFound(position_id))?;
        if shares_to_burn.is_zero() {
            return Err(ExchangeError::ZeroAmount);
        }
        if self.lp_supply.is_zero() {
            return Err(ExchangeError::LpSupplyZero);
        }
        let after = position
            .checked_sub_shares(shares_to_burn)
            .ok_or(ExchangeError::InsufficientLiquidity)?;

        let supply = self.lp_supply.get();
        let out_a = math::mul_div(shares_to_burn.get(), self.reserve_a.get(), u128::from(supply))?;
        let out_b = math::mul_div(shares_to_burn.get(), self.reserve_b.get(), u128::from(supply))?;
        let out_a = Amount::new(out_a);
        let out_b = Amount::new(out_b);

        // shares_to_burn <= supply, so the payouts cannot exceed reserves;
        // checked anyway so a broken invariant surfaces as an error rather
        // than a wrap.
        let reserve_a_after = self
            .reserve_a
            .checked_sub(out_a)
            .ok_or(ExchangeError::InsufficientLiquidity)?;
        let reserve_b_after = self
            .reserve_b
            .checked_sub(out_b)
            .ok_or(ExchangeError::InsufficientLiquidity)?;
        let supply_after = self
            .lp_supply
            .checked_sub(shares_to_burn)
            .ok_or(ExchangeError::InsufficientLiquidity)?;

        Ok(RemovePlan {
            position_id,
            shares_after: after.shares(),
            out_a,
            out_b,
            burned: shares_to_burn,
            supply_after,
            reserve_a_after,
            reserve_b_after,
        })
    }

    pub(crate) fn commit_remove(&mut self, plan: &RemovePlan) -> LiquidityRemoved {
        self.reserve_a = plan.reserve_a_after;
        self.reserve_b = plan.reserve_b_after;
        self.lp_supply = plan.supply_after;
        let closed = if plan.shares_after.is_zero() {
            self.positions.remove(&plan.position_id);
            Some(plan.position_id)
        } else {
            self.positions
                .insert(plan.position_id, Position::new(plan.shares_after));
            None
        };
        LiquidityRemoved {
            out_a: plan.out_a,
            out_b: plan.out_b,
            burned: plan.burned,
            supply_after: plan.supply_after,
            closed,
        }
    }

    /// Removes liquidity from a position.
    ///
    /// Pays out the proportional share of both reserves,
    /// `floor(shares × R / S)` each side. A position whose shares reach
    /// exactly zero is removed and reported as closed.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::PositionNotFound`] for an unknown position id.
    /// - [`ExchangeError::ZeroAmount`] if `shares_to_burn` is zero.
    /// - [`ExchangeError::LpSupplyZero`] if the pool supply is zero.
    /// - [`ExchangeError::InsufficientLiquidity`] if the position holds
    ///   fewer shares than requested.
    pub fn remove_liquidity(
        &mut self,
        position_id: PositionId,
        shares_to_burn: Amount,
    ) -> Result<LiquidityRemoved> {
        let plan = self.plan_remove(position_id, shares_to_burn)?;
        Ok(self.commit_remove(&plan))
    }

    // -- swap -----------------------------------------------------------------

    pub(crate) fn plan_swap(
        &self,
        direction: SwapDirection,
        amount_in: Amount,
        min_amount_out: Amount,
    ) -> Result<SwapPlan> {
        if amount_in.is_zero() {
            return Err(ExchangeError::ZeroAmount);
        }
        if self.reserve_a.is_zero() || self.reserve_b.is_zero() {
            return Err(ExchangeError::InsufficientLiquidity);
        }

        let (reserve_in, reserve_out) = match direction {
            SwapDirection::AToB => (self.reserve_a, self.reserve_b),
            SwapDirection::BToA => (self.reserve_b, self.reserve_a),
        };

        let net = self.fee_bps.apply_complement(amount_in)?;
        let fee_paid = amount_in
            .checked_sub(net)
            .ok_or(ExchangeError::Overflow("fee exceeds input"))?;

        let denominator = u128::from(reserve_in.get()) + u128::from(net.get());
        let amount_out = Amount::new(math::mul_div(reserve_out.get(), net.get(), denominator)?);
        if amount_out.is_zero() {
            return Err(ExchangeError::ZeroAmount);
        }
        if amount_out < min_amount_out {
            return Err(ExchangeError::Slippage {
                min_out: min_amount_out,
                actual: amount_out,
            });
        }

        // The gross input, fee included, stays in the pool.
        let reserve_in_after = reserve_in
            .checked_add(amount_in)
            .ok_or(ExchangeError::Overflow("reserve accumulation"))?;
        let reserve_out_after = reserve_out
            .checked_sub(amount_out)
            .ok_or(ExchangeError::InsufficientLiquidity)?;

        let (reserve_a_after, reserve_b_after) = match direction {
            SwapDirection::AToB => (reserve_in_after, reserve_out_after),
            SwapDirection::BToA => (reserve_out_after, reserve_in_after),
        };

        Ok(SwapPlan {
            amount_in,
            amount_out,
            fee_paid,
            reserve_a_after,
            reserve_b_after,
        })
    }

    pub(crate) fn commit_swap(&mut self, plan: &SwapPlan) -> SwapExecuted {
        self.reserve_a = plan.reserve_a_after;
        self.reserve_b = plan.reserve_b_after;
        SwapExecuted {
            amount_in: plan.amount_in,
            amount_out: plan.amount_out,
            fee_paid: plan.fee_paid,
            reserve_a_after: plan.reserve_a_after,
            reserve_b_after: plan.reserve_b_after,
        }
    }

    /// Executes a fee-bearing swap.
    ///
    /// The fee portion of the input stays in the reserves, so `k` is
    /// non-decreasing across every swap and strictly increasing whenever
    /// the fee rounds to a positive amount. LP supply, asset pair, and fee
    /// never change.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::ZeroAmount`] if `amount_in` is zero or the output
    ///   floors to zero.
    /// - [`ExchangeError::InsufficientLiquidity`] if either reserve is
    ///   empty.
    /// - [`ExchangeError::Slippage`] if the output falls below
    ///   `min_amount_out`.
    pub fn swap(
        &mut self,
        direction: SwapDirection,
        amount_in: Amount,
        min_amount_out: Amount,
    ) -> Result<SwapExecuted> {
        let plan = self.plan_swap(direction, amount_in, min_amount_out)?;
        Ok(self.commit_swap(&plan))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::AssetId;

    fn make_pair() -> AssetPair {
        let Ok(pair) = AssetPair::new(
            AssetId::from_bytes([1u8; 32]),
            AssetId::from_bytes([2u8; 32]),
        ) else {
            panic!("distinct assets");
        };
        pair
    }

    fn make_pool() -> PoolState {
        let Ok(pool) = PoolState::new(make_pair(), BasisPoints::new(30)) else {
            panic!("valid pool");
        };
        pool
    }

    fn seeded_pool(ra: u64, rb: u64) -> (PoolState, PositionId) {
        let mut pool = make_pool();
        let Ok(added) = pool.add_liquidity(None, Amount::new(ra), Amount::new(rb)) else {
            panic!("seed add");
        };
        (pool, added.position_id)
    }

    fn k_of(pool: &PoolState) -> u128 {
        u128::from(pool.reserve_a().get()) * u128::from(pool.reserve_b().get())
    }

    // -- creation -------------------------------------------------------------

    #[test]
    fn new_pool_is_empty() {
        let pool = make_pool();
        assert_eq!(pool.reserve_a(), Amount::ZERO);
        assert_eq!(pool.reserve_b(), Amount::ZERO);
        assert_eq!(pool.lp_supply(), Amount::ZERO);
        assert_eq!(pool.position_count(), 0);
    }

    #[test]
    fn zero_fee_rejected() {
        assert_eq!(
            PoolState::new(make_pair(), BasisPoints::ZERO),
            Err(ExchangeError::FeeZero)
        );
    }

    #[test]
    fn full_range_fee_rejected() {
        assert_eq!(
            PoolState::new(make_pair(), BasisPoints::new(10_000)),
            Err(ExchangeError::FeeTooHigh(10_000))
        );
    }

    #[test]
    fn address_matches_derivation() {
        let pool = make_pool();
        assert_eq!(
            pool.address(),
            PoolAddress::derive(&make_pair(), BasisPoints::new(30))
        );
    }

    // -- add liquidity (scenario: seed (1000,1000) then add (500,1000)) -------

    #[test]
    fn first_deposit_mints_sqrt() {
        let (pool, id) = seeded_pool(1_000, 1_000);
        // floor(sqrt(1000 * 1000)) = 1000
        assert_eq!(pool.lp_supply(), Amount::new(1_000));
        assert_eq!(pool.position_shares(id), Some(Amount::new(1_000)));
        assert_eq!(pool.reserve_a(), Amount::new(1_000));
        assert_eq!(pool.reserve_b(), Amount::new(1_000));
    }

    #[test]
    fn proportional_add_draws_min_side() {
        let (mut pool, id) = seeded_pool(1_000, 1_000);
        let Ok(added) =
            pool.add_liquidity(Some(id), Amount::new(500), Amount::new(1_000))
        else {
            panic!("expected Ok");
        };
        // mint = min(500*1000/1000, 1000*1000/1000) = 500
        assert_eq!(added.minted, Amount::new(500));
        // draws exactly (500, 500); the extra 500 of B stays with the caller
        assert_eq!(added.used_a, Amount::new(500));
        assert_eq!(added.used_b, Amount::new(500));
        assert_eq!(pool.reserve_a(), Amount::new(1_500));
        assert_eq!(pool.reserve_b(), Amount::new(1_500));
        assert_eq!(pool.lp_supply(), Amount::new(1_500));
        assert_eq!(pool.position_shares(id), Some(Amount::new(1_500)));
    }

    #[test]
    fn add_without_id_creates_fresh_position() {
        let (mut pool, first) = seeded_pool(1_000, 1_000);
        let Ok(added) = pool.add_liquidity(None, Amount::new(100), Amount::new(100)) else {
            panic!("expected Ok");
        };
        assert_ne!(added.position_id, first);
        assert_eq!(pool.position_count(), 2);
        assert_eq!(pool.position_shares(added.position_id), Some(Amount::new(100)));
    }

    #[test]
    fn position_ids_are_monotonic_and_not_reused() {
        let (mut pool, first) = seeded_pool(1_000, 1_000);
        let Ok(removed) = pool.remove_liquidity(first, Amount::new(1_000)) else {
            panic!("expected Ok");
        };
        assert_eq!(removed.closed, Some(first));
        // Re-seed: the next position gets a fresh id even though the pool
        // went back to empty.
        let Ok(added) = pool.add_liquidity(None, Amount::new(50), Amount::new(50)) else {
            panic!("expected Ok");
        };
        assert!(added.position_id.get() > first.get());
    }

    #[test]
    fn add_zero_amount_rejected() {
        let mut pool = make_pool();
        assert_eq!(
            pool.add_liquidity(None, Amount::ZERO, Amount::new(10)),
            Err(ExchangeError::ZeroAmount)
        );
        assert_eq!(
            pool.add_liquidity(None, Amount::new(10), Amount::ZERO),
            Err(ExchangeError::ZeroAmount)
        );
    }

    #[test]
    fn add_to_unknown_position_rejected() {
        let (mut pool, _) = seeded_pool(1_000, 1_000);
        let ghost = PositionId::new(99);
        assert_eq!(
            pool.add_liquidity(Some(ghost), Amount::new(10), Amount::new(10)),
            Err(ExchangeError::PositionNotFound(ghost))
        );
    }

    #[test]
    fn dust_add_too_small_to_mint_rejected() {
        let (mut pool, id) = seeded_pool(1_000_000, 1_000_000);
        // 1 * S / R < 1 → floor 0 shares
        assert_eq!(
            pool.add_liquidity(Some(id), Amount::new(1), Amount::new(1)),
            Err(ExchangeError::InsufficientLiquidity)
        );
    }

    // -- remove liquidity -----------------------------------------------------

    #[test]
    fn remove_partial_keeps_position() {
        let (mut pool, id) = seeded_pool(1_000, 4_000);
        // supply = floor(sqrt(4_000_000)) = 2000
        let Ok(removed) = pool.remove_liquidity(id, Amount::new(500)) else {
            panic!("expected Ok");
        };
        // out_a = 500*1000/2000 = 250, out_b = 500*4000/2000 = 1000
        assert_eq!(removed.out_a, Amount::new(250));
        assert_eq!(removed.out_b, Amount::new(1_000));
        assert_eq!(removed.closed, None);
        assert_eq!(pool.position_shares(id), Some(Amount::new(1_500)));
        assert_eq!(pool.lp_supply(), Amount::new(1_500));
    }

    #[test]
    fn remove_all_closes_position_and_empties_pool() {
        let (mut pool, id) = seeded_pool(1_000, 1_000);
        let Ok(removed) = pool.remove_liquidity(id, Amount::new(1_000)) else {
            panic!("expected Ok");
        };
        assert_eq!(removed.closed, Some(id));
        assert_eq!(removed.out_a, Amount::new(1_000));
        assert_eq!(removed.out_b, Amount::new(1_000));
        // Reserves and supply hit zero together.
        assert_eq!(pool.reserve_a(), Amount::ZERO);
        assert_eq!(pool.reserve_b(), Amount::ZERO);
        assert_eq!(pool.lp_supply(), Amount::ZERO);
        assert_eq!(pool.position_count(), 0);
    }

    #[test]
    fn pool_is_reseedable_after_full_withdrawal() {
        let (mut pool, id) = seeded_pool(1_000, 1_000);
        let Ok(_) = pool.remove_liquidity(id, Amount::new(1_000)) else {
            panic!("expected Ok");
        };
        let Ok(added) = pool.add_liquidity(None, Amount::new(400), Amount::new(900)) else {
            panic!("expected Ok");
        };
        // Fresh seed: floor(sqrt(400*900)) = 600
        assert_eq!(added.minted, Amount::new(600));
        assert_eq!(pool.lp_supply(), Amount::new(600));
    }

    #[test]
    fn remove_more_than_position_holds_rejected() {
        let (mut pool, id) = seeded_pool(1_000, 1_000);
        assert_eq!(
            pool.remove_liquidity(id, Amount::new(1_001)),
            Err(ExchangeError::InsufficientLiquidity)
        );
    }

    #[test]
    fn remove_zero_rejected() {
        let (mut pool, id) = seeded_pool(1_000, 1_000);
        assert_eq!(
            pool.remove_liquidity(id, Amount::ZERO),
            Err(ExchangeError::ZeroAmount)
        );
    }

    #[test]
    fn remove_unknown_position_rejected() {
        let (mut pool, _) = seeded_pool(1_000, 1_000);
        let ghost = PositionId::new(42);
        assert_eq!(
            pool.remove_liquidity(ghost, Amount::new(1)),
            Err(ExchangeError::PositionNotFound(ghost))
        );
    }

    #[test]
    fn round_trip_add_remove_returns_exact_amounts() {
        let (mut pool, _) = seeded_pool(1_000_000, 2_000_000);
        let Ok(added) = pool.add_liquidity(None, Amount::new(300_000), Amount::new(600_000))
        else {
            panic!("expected Ok");
        };
        let Ok(removed) = pool.remove_liquidity(added.position_id, added.minted) else {
            panic!("expected Ok");
        };
        assert_eq!(removed.out_a, added.used_a);
        assert_eq!(removed.out_b, added.used_b);
    }

    // -- swap (scenario 4) ----------------------------------------------------

    #[test]
    fn swap_scenario_exact_values() {
        let (mut pool, _) = seeded_pool(1_000_000, 1_000_000);
        let Ok(result) = pool.swap(SwapDirection::AToB, Amount::new(10_000), Amount::ZERO)
        else {
            panic!("expected Ok");
        };
        // net = floor(10000 * 9970 / 10000) = 9970, fee = 30
        assert_eq!(result.fee_paid, Amount::new(30));
        // out = floor(1_000_000 * 9970 / 1_009_970) = 9871
        let expected = 1_000_000u128 * 9_970 / 1_009_970;
        assert_eq!(u128::from(result.amount_out.get()), expected);
        assert_eq!(result.reserve_a_after, Amount::new(1_010_000));
        assert_eq!(
            result.reserve_b_after,
            Amount::new(1_000_000 - result.amount_out.get())
        );
    }

    #[test]
    fn swap_b_to_a_mirrors_direction() {
        let (mut pool, _) = seeded_pool(1_000_000, 2_000_000);
        let Ok(result) = pool.swap(SwapDirection::BToA, Amount::new(10_000), Amount::ZERO)
        else {
            panic!("expected Ok");
        };
        assert!(result.amount_out.get() > 0);
        assert!(pool.reserve_b() > Amount::new(2_000_000));
        assert!(pool.reserve_a() < Amount::new(1_000_000));
    }

    #[test]
    fn swap_does_not_change_supply_or_positions() {
        let (mut pool, id) = seeded_pool(1_000_000, 1_000_000);
        let supply = pool.lp_supply();
        let Ok(_) = pool.swap(SwapDirection::AToB, Amount::new(5_000), Amount::ZERO) else {
            panic!("expected Ok");
        };
        assert_eq!(pool.lp_supply(), supply);
        assert_eq!(pool.position_shares(id), Some(supply));
    }

    #[test]
    fn swap_k_non_decreasing() {
        let (mut pool, _) = seeded_pool(1_000_000, 2_000_000);
        let mut k = k_of(&pool);
        for _ in 0..10 {
            let Ok(_) = pool.swap(SwapDirection::AToB, Amount::new(3_333), Amount::ZERO) else {
                panic!("expected Ok");
            };
            let k_after = k_of(&pool);
            assert!(k_after >= k);
            k = k_after;
        }
    }

    #[test]
    fn swap_output_never_exceeds_exact_rational() {
        let (mut pool, _) = seeded_pool(777_777, 333_333);
        let amount_in = 12_345u64;
        let net = amount_in as u128 * 9_970 / 10_000;
        let exact_num = 333_333u128 * net;
        let exact_den = 777_777u128 + net;
        let Ok(result) = pool.swap(SwapDirection::AToB, Amount::new(amount_in), Amount::ZERO)
        else {
            panic!("expected Ok");
        };
        // floor(exact) <= exact
        assert!(u128::from(result.amount_out.get()) * exact_den <= exact_num);
    }

    #[test]
    fn swap_zero_input_rejected() {
        let (mut pool, _) = seeded_pool(1_000, 1_000);
        assert_eq!(
            pool.swap(SwapDirection::AToB, Amount::ZERO, Amount::ZERO),
            Err(ExchangeError::ZeroAmount)
        );
    }

    #[test]
    fn swap_on_empty_pool_rejected() {
        let mut pool = make_pool();
        assert_eq!(
            pool.swap(SwapDirection::AToB, Amount::new(100), Amount::ZERO),
            Err(ExchangeError::InsufficientLiquidity)
        );
    }

    #[test]
    fn swap_slippage_rejected_without_mutation() {
        let (mut pool, _) = seeded_pool(1_000_000, 1_000_000);
        let before = pool.clone();
        let result = pool.swap(
            SwapDirection::AToB,
            Amount::new(10_000),
            Amount::new(1_000_000),
        );
        assert!(matches!(result, Err(ExchangeError::Slippage { .. })));
        assert_eq!(pool, before);
    }

    #[test]
    fn swap_dust_output_rejected() {
        // Tiny input against a lopsided pool floors to zero output.
        let (mut pool, _) = seeded_pool(1_000_000_000, 10);
        assert_eq!(
            pool.swap(SwapDirection::AToB, Amount::new(100), Amount::ZERO),
            Err(ExchangeError::ZeroAmount)
        );
    }

    // -- invariants -----------------------------------------------------------

    #[test]
    fn shares_sum_equals_supply_across_operations() {
        let (mut pool, first) = seeded_pool(1_000_000, 1_000_000);
        let Ok(second) = pool.add_liquidity(None, Amount::new(200_000), Amount::new(200_000))
        else {
            panic!("expected Ok");
        };
        let Ok(_) = pool.remove_liquidity(first, Amount::new(400_000)) else {
            panic!("expected Ok");
        };
        let (Some(a), Some(b)) = (
            pool.position_shares(first),
            pool.position_shares(second.position_id),
        ) else {
            panic!("positions must exist");
        };
        let Some(sum) = a.checked_add(b) else {
            panic!("no overflow");
        };
        assert_eq!(sum, pool.lp_supply());
    }
}
