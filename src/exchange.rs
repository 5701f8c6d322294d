//! The exchange facade: ledger, curves, pools, and the event log behind a
//! single entry point.
//!
//! Every operation takes `&mut self` and executes in two phases. The
//! **assert phase** runs all fallible work against immutable state: pricing
//! quotes, registry lookups, balance and overflow pre-checks. The **commit
//! phase** then performs only moves the assert phase has already proven
//! valid, so a returned error always means nothing changed. Hosts that want
//! concurrent callers put the `Exchange` behind their own lock; the type
//! itself is deliberately single-writer.
//!
//! Asset inventories live in derived ledger accounts rather than in the
//! pool structs: each curve has a vault (its token inventory and collected
//! base) and a graduation reserve (the pre-minted seed allocation), and
//! each constant-product pool has a vault holding both reserves. The pool
//! structs track the same quantities as authoritative pricing state; the
//! ledger accounts make them ordinary balances that conservation checks can
//! sum over.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::amm::{LiquidityAdded, LiquidityRemoved, PoolState, SwapDirection};
use crate::config::LaunchConfig;
use crate::curve::CurvePool;
use crate::domain::{AccountId, Amount, AssetId, AssetPair, BasisPoints, PoolAddress, PositionId};
use crate::error::{ExchangeError, Result};
use crate::events::{
    AddedEvent, AssetLaunchedEvent, ExchangeEvent, GraduatedPoolCreatedEvent, PoolCreatedEvent,
    PurchaseEvent, RemovedEvent, SaleEvent, SwappedEvent,
};
use crate::graduation::GraduationPlan;
use crate::ledger::{CapabilityBundle, Ledger};
use crate::registry::Registry;

const CURVE_VAULT_TAG: &str = "tidepool/curve-vault";
const GRADUATION_RESERVE_TAG: &str = "tidepool/graduation-reserve";
const POOL_VAULT_TAG: &str = "tidepool/pool-vault";

/// The ledger account holding a curve's token inventory and base reserve.
#[must_use]
pub fn curve_vault(asset: AssetId) -> AccountId {
    AccountId::derived(CURVE_VAULT_TAG, &asset.as_bytes())
}

/// The ledger account holding an asset's pre-minted graduation allocation.
#[must_use]
pub fn graduation_reserve(asset: AssetId) -> AccountId {
    AccountId::derived(GRADUATION_RESERVE_TAG, &asset.as_bytes())
}

/// The ledger account holding a constant-product pool's reserves.
#[must_use]
pub fn pool_vault(address: PoolAddress) -> AccountId {
    AccountId::derived(POOL_VAULT_TAG, &address.as_bytes())
}

/// Tokenized-asset exchange engine: bonding-curve launches, one-way
/// graduation, and general constant-product pools over one balance book.
#[derive(Debug)]
pub struct Exchange {
    config: LaunchConfig,
    ledger: Ledger,
    curves: Registry<AssetId, CurvePool>,
    pools: Registry<PoolAddress, PoolState>,
    capabilities: HashMap<AssetId, CapabilityBundle>,
    reserved: HashSet<AccountId>,
    events: Vec<ExchangeEvent>,
}

impl Exchange {
    /// Creates an exchange with a validated configuration.
    ///
    /// # Errors
    ///
    /// Propagates [`LaunchConfig::validate`] failures.
    pub fn new(config: LaunchConfig) -> Result<Self> {
        config.validate()?;
        let mut reserved = HashSet::new();
        reserved.insert(config.treasury);
        Ok(Self {
            config,
            ledger: Ledger::new(),
            curves: Registry::new(),
            pools: Registry::new(),
            capabilities: HashMap::new(),
            reserved,
            events: Vec::new(),
        })
    }

    /// Rejects the exchange's own subsystem accounts when supplied as a
    /// caller account. The vault, reserve, and treasury addresses are
    /// derivable by anyone; letting one act as a buyer or provider would
    /// desynchronize a pool's pricing state from its ledger backing.
    fn ensure_external(&self, account: AccountId) -> Result<()> {
        if self.reserved.contains(&account) {
            return Err(ExchangeError::ReservedAccount);
        }
        Ok(())
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &LaunchConfig {
        &self.config
    }

    /// Credits base currency to an account. Host on-ramp: base supply
    /// enters the system only here.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::ReservedAccount`] for a subsystem account.
    /// - [`ExchangeError::Overflow`] if the balance would exceed `u64::MAX`.
    pub fn deposit_base(&mut self, account: AccountId, amount: Amount) -> Result<()> {
        self.ensure_external(account)?;
        self.ledger.deposit(account, AssetId::BASE, amount)
    }

    // -- launch ---------------------------------------------------------------

    /// Launches a new asset onto a bonding curve.
    ///
    /// Mints the curve inventory into the asset's vault and the reserved
    /// allocation into its graduation reserve, registers the curve, and
    /// stores the asset's capability bundle. This is the only path that
    /// creates capabilities or asset supply.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::ReservedAccount`] if `creator` is a subsystem
    ///   account.
    /// - [`ExchangeError::IdenticalAssets`] if `asset` is the base currency.
    /// - [`ExchangeError::PoolAlreadyExists`] if the asset was already
    ///   launched.
    pub fn launch(&mut self, creator: AccountId, asset: AssetId) -> Result<()> {
        // assert
        self.ensure_external(creator)?;
        AssetPair::new(AssetId::BASE, asset)?;
        if self.curves.contains(&asset) {
            return Err(ExchangeError::PoolAlreadyExists);
        }
        let vault = curve_vault(asset);
        let reserve_account = graduation_reserve(asset);
        self.ledger
            .ensure_credit(vault, asset, self.config.curve_inventory)?;
        self.ledger
            .ensure_credit(reserve_account, asset, self.config.reserved_allocation)?;

        // commit
        let bundle = CapabilityBundle::new(asset);
        self.ledger
            .mint(bundle.mint(), vault, self.config.curve_inventory)?;
        self.ledger
            .mint(bundle.mint(), reserve_account, self.config.reserved_allocation)?;
        self.curves.try_insert(asset, CurvePool::new(creator))?;
        self.capabilities.insert(asset, bundle);
        self.reserved.insert(vault);
        self.reserved.insert(reserve_account);

        info!(%asset, %creator, "asset launched");
        self.events
            .push(ExchangeEvent::Launched(AssetLaunchedEvent {
                creator,
                asset,
                curve_inventory: self.config.curve_inventory,
                reserved_allocation: self.config.reserved_allocation,
            }));
        Ok(())
    }

    // -- curve trading --------------------------------------------------------

    /// Buys tokens from an asset's bonding curve for `spend` base currency.
    ///
    /// The buy fee goes to the treasury, the net spend into the curve vault,
    /// and the priced tokens to the buyer. If the buy lifts the reserve to
    /// the graduation threshold, the curve graduates in the same call:
    /// trade and transition commit together or not at all.
    ///
    /// Returns the tokens delivered (zero for dust spends).
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::ReservedAccount`] if `buyer` is a subsystem
    ///   account.
    /// - [`ExchangeError::PoolNotFound`] for an unlaunched asset.
    /// - [`ExchangeError::PoolGraduated`] once the curve has graduated.
    /// - [`ExchangeError::ZeroAmount`] for a zero spend.
    /// - [`ExchangeError::InsufficientBalance`] if the buyer cannot cover
    ///   `spend`.
    /// - [`ExchangeError::PoolAlreadyExists`] if graduation would land on an
    ///   occupied pool address.
    pub fn buy(&mut self, buyer: AccountId, asset: AssetId, spend: Amount) -> Result<Amount> {
        // assert
        self.ensure_external(buyer)?;
        let curve = self.curves.get(&asset).ok_or(ExchangeError::PoolNotFound)?;
        let vault = curve_vault(asset);
        let inventory = self.ledger.balance_of(vault, asset);
        let quote = curve.quote_buy(&self.config, inventory, spend)?;

        self.ledger.ensure_debit(buyer, AssetId::BASE, spend)?;
        self.ledger
            .ensure_credit(self.config.treasury, AssetId::BASE, quote.fee)?;
        self.ledger.ensure_credit(vault, AssetId::BASE, quote.net)?;
        self.ledger.ensure_credit(buyer, asset, quote.tokens_out)?;

        let graduation = if quote.graduates {
            let remaining = inventory
                .checked_sub(quote.tokens_out)
                .ok_or(ExchangeError::InsufficientLiquidity)?;
            let plan =
                GraduationPlan::prepare(&self.config, asset, quote.new_reserve, remaining)?;
            if self.pools.contains(&plan.address()) {
                return Err(ExchangeError::PoolAlreadyExists);
            }
            let pool_account = pool_vault(plan.address());
            // The vault must hold the swept reserve minus the net this buy
            // is about to deposit; checked here so the sweep cannot fail
            // after the buyer's ledger moves commit.
            let backing_needed = plan
                .base_amount()
                .checked_sub(quote.net)
                .ok_or(ExchangeError::Overflow("graduation base backing"))?;
            self.ledger.ensure_debit(vault, AssetId::BASE, backing_needed)?;
            self.ledger
                .ensure_debit(graduation_reserve(asset), asset, plan.asset_amount())?;
            self.ledger
                .ensure_credit(pool_account, asset, plan.asset_amount())?;
            self.ledger
                .ensure_credit(pool_account, AssetId::BASE, plan.base_amount())?;
            Some(plan)
        } else {
            None
        };

        // commit
        let transfer_cap = self
            .capabilities
            .get(&asset)
            .ok_or(ExchangeError::PoolNotFound)?
            .transfer();
        self.ledger.withdraw(buyer, AssetId::BASE, spend)?;
        self.ledger
            .deposit(self.config.treasury, AssetId::BASE, quote.fee)?;
        self.ledger.deposit(vault, AssetId::BASE, quote.net)?;
        self.ledger
            .force_transfer(transfer_cap, vault, buyer, quote.tokens_out)?;
        let curve = self
            .curves
            .get_mut(&asset)
            .ok_or(ExchangeError::PoolNotFound)?;
        curve.apply_buy(&quote);

        debug!(%asset, %buyer, net = %quote.net, out = %quote.tokens_out, "curve buy");
        self.events.push(ExchangeEvent::Purchase(PurchaseEvent {
            buyer,
            asset,
            net: quote.net,
            tokens_out: quote.tokens_out,
        }));

        if let Some(plan) = graduation {
            self.commit_graduation(asset, plan)?;
        }
        Ok(quote.tokens_out)
    }

    /// Sells tokens back into an asset's bonding curve.
    ///
    /// Returns the base currency delivered to the seller.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::ReservedAccount`] if `seller` is a subsystem
    ///   account.
    /// - [`ExchangeError::PoolNotFound`] for an unlaunched asset.
    /// - [`ExchangeError::PoolGraduated`] once the curve has graduated.
    /// - [`ExchangeError::ZeroAmount`] for a zero token amount.
    /// - [`ExchangeError::InsufficientBalance`] if the seller holds fewer
    ///   tokens.
    /// - [`ExchangeError::InsufficientReserve`] if the payout exceeds the
    ///   real reserve.
    pub fn sell(
        &mut self,
        seller: AccountId,
        asset: AssetId,
        token_amount: Amount,
    ) -> Result<Amount> {
        // assert
        self.ensure_external(seller)?;
        let curve = self.curves.get(&asset).ok_or(ExchangeError::PoolNotFound)?;
        let vault = curve_vault(asset);
        let inventory = self.ledger.balance_of(vault, asset);
        let quote = curve.quote_sell(&self.config, inventory, token_amount)?;

        self.ledger.ensure_debit(seller, asset, token_amount)?;
        self.ledger.ensure_debit(vault, AssetId::BASE, quote.gross_out)?;
        self.ledger.ensure_credit(vault, asset, token_amount)?;
        self.ledger
            .ensure_credit(seller, AssetId::BASE, quote.net_out)?;
        self.ledger
            .ensure_credit(self.config.treasury, AssetId::BASE, quote.fee)?;

        // commit
        self.ledger.transfer(seller, vault, asset, token_amount)?;
        self.ledger.withdraw(vault, AssetId::BASE, quote.gross_out)?;
        self.ledger.deposit(seller, AssetId::BASE, quote.net_out)?;
        self.ledger
            .deposit(self.config.treasury, AssetId::BASE, quote.fee)?;
        let curve = self
            .curves
            .get_mut(&asset)
            .ok_or(ExchangeError::PoolNotFound)?;
        curve.apply_sell(&quote);

        debug!(%asset, %seller, tokens = %token_amount, out = %quote.net_out, "curve sell");
        self.events.push(ExchangeEvent::Sale(SaleEvent {
            seller,
            asset,
            token_amount,
            base_out: quote.net_out,
        }));
        Ok(quote.net_out)
    }

    /// Commits a prepared graduation. All fallible checks already ran in the
    /// enclosing buy's assert phase.
    fn commit_graduation(&mut self, asset: AssetId, plan: GraduationPlan) -> Result<()> {
        let vault = curve_vault(asset);
        let address = plan.address();
        let pool_account = pool_vault(address);
        let bundle = self
            .capabilities
            .get(&asset)
            .ok_or(ExchangeError::PoolNotFound)?;

        // Unsold inventory is burned, the reserve and the pre-minted
        // allocation become the pool's seed.
        self.ledger.burn(bundle.burn(), vault, plan.burn_amount())?;
        self.ledger.force_transfer(
            bundle.transfer(),
            graduation_reserve(asset),
            pool_account,
            plan.asset_amount(),
        )?;
        self.ledger
            .transfer(vault, pool_account, AssetId::BASE, plan.base_amount())?;

        let curve = self
            .curves
            .get_mut(&asset)
            .ok_or(ExchangeError::PoolNotFound)?;
        curve.graduate();

        let event = GraduatedPoolCreatedEvent {
            asset,
            pool_address: address,
            base_amount: plan.base_amount(),
            asset_amount: plan.asset_amount(),
            lp_shares: plan.lp_shares(),
        };
        self.pools.try_insert(address, plan.into_pool())?;
        self.reserved.insert(pool_account);

        info!(%asset, pool = %address, base = %event.base_amount, "curve graduated");
        self.events.push(ExchangeEvent::Graduated(event));
        Ok(())
    }

    // -- constant-product pools -----------------------------------------------

    /// Creates an empty constant-product pool for a distinct asset pair at
    /// its deterministic address.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::ReservedAccount`] if `creator` is a subsystem
    ///   account.
    /// - [`ExchangeError::IdenticalAssets`] for an identical pair.
    /// - [`ExchangeError::FeeZero`] / [`ExchangeError::FeeTooHigh`] for an
    ///   out-of-range fee.
    /// - [`ExchangeError::PoolAlreadyExists`] if the address is occupied.
    pub fn pool_create(
        &mut self,
        creator: AccountId,
        asset_1: AssetId,
        asset_2: AssetId,
        fee_bps: BasisPoints,
    ) -> Result<PoolAddress> {
        self.ensure_external(creator)?;
        let pair = AssetPair::new(asset_1, asset_2)?;
        let pool = PoolState::new(pair, fee_bps)?;
        let address = pool.address();
        self.pools.try_insert(address, pool)?;
        self.reserved.insert(pool_vault(address));

        info!(pool = %address, %creator, "pool created");
        self.events.push(ExchangeEvent::PoolCreated(PoolCreatedEvent {
            creator,
            pool: address,
            assets: pair,
            fee_bps,
        }));
        Ok(address)
    }

    /// Adds liquidity to a pool from the provider's balances.
    ///
    /// Only the proportionally used amounts leave the provider's accounts;
    /// the excess of the over-supplied side is never drawn.
    ///
    /// # Errors
    ///
    /// [`ExchangeError::ReservedAccount`] for a subsystem provider,
    /// [`ExchangeError::PoolNotFound`] for an unknown address, plus the
    /// pricing failures of [`PoolState::add_liquidity`] and
    /// [`ExchangeError::InsufficientBalance`] if the provider cannot cover
    /// the used amounts.
    pub fn pool_add_liquidity(
        &mut self,
        provider: AccountId,
        pool: PoolAddress,
        position_id: Option<PositionId>,
        desired_a: Amount,
        desired_b: Amount,
    ) -> Result<LiquidityAdded> {
        // assert
        self.ensure_external(provider)?;
        let state = self.pools.get(&pool).ok_or(ExchangeError::PoolNotFound)?;
        let pair = state.assets();
        let plan = state.plan_add(position_id, desired_a, desired_b)?;
        let vault = pool_vault(pool);
        self.ledger
            .ensure_debit(provider, pair.first(), plan.used_a())?;
        self.ledger
            .ensure_debit(provider, pair.second(), plan.used_b())?;
        self.ledger.ensure_credit(vault, pair.first(), plan.used_a())?;
        self.ledger
            .ensure_credit(vault, pair.second(), plan.used_b())?;

        // commit
        self.ledger
            .transfer(provider, vault, pair.first(), plan.used_a())?;
        self.ledger
            .transfer(provider, vault, pair.second(), plan.used_b())?;
        let state = self
            .pools
            .get_mut(&pool)
            .ok_or(ExchangeError::PoolNotFound)?;
        let added = state.commit_add(&plan);

        debug!(pool = %pool, %provider, minted = %added.minted, "liquidity added");
        self.events.push(ExchangeEvent::Added(AddedEvent {
            pool,
            position_id: added.position_id,
            used_a: added.used_a,
            used_b: added.used_b,
            minted: added.minted,
            new_supply: added.supply_after,
        }));
        Ok(added)
    }

    /// Removes liquidity from a pool position to the provider's balances.
    ///
    /// Position ownership is not authenticated here; the host's position
    /// service authorizes callers, the core checks existence only.
    ///
    /// # Errors
    ///
    /// [`ExchangeError::ReservedAccount`] for a subsystem provider,
    /// [`ExchangeError::PoolNotFound`] for an unknown address, plus the
    /// pricing failures of [`PoolState::remove_liquidity`].
    pub fn pool_remove_liquidity(
        &mut self,
        provider: AccountId,
        pool: PoolAddress,
        position_id: PositionId,
        shares_to_burn: Amount,
    ) -> Result<LiquidityRemoved> {
        // assert
        self.ensure_external(provider)?;
        let state = self.pools.get(&pool).ok_or(ExchangeError::PoolNotFound)?;
        let pair = state.assets();
        let plan = state.plan_remove(position_id, shares_to_burn)?;
        let vault = pool_vault(pool);
        self.ledger.ensure_debit(vault, pair.first(), plan.out_a())?;
        self.ledger
            .ensure_debit(vault, pair.second(), plan.out_b())?;
        self.ledger
            .ensure_credit(provider, pair.first(), plan.out_a())?;
        self.ledger
            .ensure_credit(provider, pair.second(), plan.out_b())?;

        // commit
        self.ledger
            .transfer(vault, provider, pair.first(), plan.out_a())?;
        self.ledger
            .transfer(vault, provider, pair.second(), plan.out_b())?;
        let state = self
            .pools
            .get_mut(&pool)
            .ok_or(ExchangeError::PoolNotFound)?;
        let removed = state.commit_remove(&plan);

        debug!(pool = %pool, %provider, burned = %removed.burned, "liquidity removed");
        self.events.push(ExchangeEvent::Removed(RemovedEvent {
            pool,
            position_id,
            out_a: removed.out_a,
            out_b: removed.out_b,
            burned: removed.burned,
            new_supply: removed.supply_after,
        }));
        Ok(removed)
    }

    /// Swaps against a pool from the trader's balances.
    ///
    /// Returns the output amount.
    ///
    /// # Errors
    ///
    /// [`ExchangeError::ReservedAccount`] for a subsystem trader,
    /// [`ExchangeError::PoolNotFound`] for an unknown address, plus the
    /// pricing failures of [`PoolState::swap`] and
    /// [`ExchangeError::InsufficientBalance`] if the trader cannot cover
    /// `amount_in`.
    pub fn pool_swap(
        &mut self,
        trader: AccountId,
        pool: PoolAddress,
        direction: SwapDirection,
        amount_in: Amount,
        min_amount_out: Amount,
    ) -> Result<Amount> {
        // assert
        self.ensure_external(trader)?;
        let state = self.pools.get(&pool).ok_or(ExchangeError::PoolNotFound)?;
        let pair = state.assets();
        let plan = state.plan_swap(direction, amount_in, min_amount_out)?;
        let (asset_in, asset_out) = match direction {
            SwapDirection::AToB => (pair.first(), pair.second()),
            SwapDirection::BToA => (pair.second(), pair.first()),
        };
        let vault = pool_vault(pool);
        self.ledger.ensure_debit(trader, asset_in, amount_in)?;
        self.ledger
            .ensure_debit(vault, asset_out, plan.amount_out())?;
        self.ledger.ensure_credit(vault, asset_in, amount_in)?;
        self.ledger
            .ensure_credit(trader, asset_out, plan.amount_out())?;

        // commit
        self.ledger.transfer(trader, vault, asset_in, amount_in)?;
        self.ledger
            .transfer(vault, trader, asset_out, plan.amount_out())?;
        let state = self
            .pools
            .get_mut(&pool)
            .ok_or(ExchangeError::PoolNotFound)?;
        let swapped = state.commit_swap(&plan);

        debug!(pool = %pool, %trader, amount_in = %swapped.amount_in, amount_out = %swapped.amount_out, "swap");
        self.events.push(ExchangeEvent::Swapped(SwappedEvent {
            pool,
            direction,
            amount_in: swapped.amount_in,
            amount_out: swapped.amount_out,
            fee_paid: swapped.fee_paid,
            reserve_a_after: swapped.reserve_a_after,
            reserve_b_after: swapped.reserve_b_after,
        }));
        Ok(swapped.amount_out)
    }

    // -- views ----------------------------------------------------------------

    /// The net base reserve of an asset's curve.
    ///
    /// # Errors
    ///
    /// [`ExchangeError::PoolNotFound`] for an unlaunched asset.
    pub fn reserve_of(&self, asset: AssetId) -> Result<Amount> {
        self.curves
            .get(&asset)
            .map(CurvePool::reserve)
            .ok_or(ExchangeError::PoolNotFound)
    }

    /// The curve state of an asset.
    ///
    /// # Errors
    ///
    /// [`ExchangeError::PoolNotFound`] for an unlaunched asset.
    pub fn curve_of(&self, asset: AssetId) -> Result<&CurvePool> {
        self.curves.get(&asset).ok_or(ExchangeError::PoolNotFound)
    }

    /// Any account's balance in an asset the exchange knows (zero when the
    /// account holds none). The base currency is always readable; every
    /// other asset must have a registered curve, graduated or not.
    ///
    /// # Errors
    ///
    /// [`ExchangeError::PoolNotFound`] for an asset that was never launched.
    pub fn balance_of(&self, account: AccountId, asset: AssetId) -> Result<Amount> {
        if !asset.is_base() && !self.curves.contains(&asset) {
            return Err(ExchangeError::PoolNotFound);
        }
        Ok(self.ledger.balance_of(account, asset))
    }

    /// The state of a constant-product pool.
    ///
    /// # Errors
    ///
    /// [`ExchangeError::PoolNotFound`] for an unknown address.
    pub fn pool_state_of(&self, pool: PoolAddress) -> Result<&PoolState> {
        self.pools.get(&pool).ok_or(ExchangeError::PoolNotFound)
    }

    /// Events recorded since the last drain, in commit order.
    #[must_use]
    pub fn events(&self) -> &[ExchangeEvent] {
        &self.events
    }

    /// Removes and returns all recorded events.
    pub fn drain_events(&mut self) -> Vec<ExchangeEvent> {
        std::mem::take(&mut self.events)
    }
}
