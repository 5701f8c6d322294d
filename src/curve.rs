//! Bonding-curve launch pool.
//!
//! Newly issued assets trade against the base currency on a virtual-reserve
//! constant-product curve before any external liquidity exists. The curve
//! holds a fixed token inventory and prices trades against an effective base
//! reserve `x = reserve + virtual_base_reserve`: the virtual component makes
//! the first purchase finite-priced and the curve strictly convex from the
//! start, without the pool ever owning that base.
//!
//! # Buy (spend `s` base for tokens)
//!
//! 1. `fee = floor(s × buy_fee_bps / 10 000)`, routed to the treasury
//! 2. `net = s − fee`
//! 3. `tokens_out = floor(y × net / (x + net))` where `y` is the remaining
//!    inventory
//! 4. `reserve += net`
//!
//! # Sell (return `t` tokens for base)
//!
//! `base_out = floor(x × t / (y + t))`, capped by the real reserve; the
//! virtual component is never paid out.
//!
//! Once the net reserve reaches the graduation threshold the pool graduates
//! into a general constant-product pool and permanently stops trading; the
//! `graduated` flag is monotonic.
//!
//! Pricing is split into pure `quote_*` methods and infallible `apply_*`
//! methods so the enclosing operation can validate ledger balances between
//! quoting and committing.

use crate::config::LaunchConfig;
use crate::domain::{AccountId, Amount};
use crate::error::{ExchangeError, Result};
use crate::math;

/// Priced outcome of a curve buy. Produced by [`CurvePool::quote_buy`],
/// committed by [`CurvePool::apply_buy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyQuote {
    /// Fee portion of the gross spend, owed to the treasury.
    pub fee: Amount,
    /// Net spend priced by the curve and added to the reserve.
    pub net: Amount,
    /// Tokens delivered from the curve inventory. May floor to zero for
    /// dust-sized spends; the buyer still pays.
    pub tokens_out: Amount,
    /// Reserve after the buy commits.
    pub new_reserve: Amount,
    /// Whether this buy pushes the reserve to the graduation threshold.
    pub graduates: bool,
}

/// Priced outcome of a curve sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SellQuote {
    /// Base owed by the curve before the sell fee.
    pub gross_out: Amount,
    /// Fee portion of the payout, owed to the treasury. Zero under the
    /// default configuration.
    pub fee: Amount,
    /// Base delivered to the seller.
    pub net_out: Amount,
    /// Reserve after the sell commits.
    pub new_reserve: Amount,
}

/// Per-asset bonding-curve state.
///
/// The token inventory itself lives in the ledger (the curve's vault
/// account); the pool tracks only the accumulated base reserve and the
/// graduation flag. Registered exactly once per asset at launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurvePool {
    creator: AccountId,
    reserve: Amount,
    graduated: bool,
}

impl CurvePool {
    /// Creates a fresh, ungraduated curve with an empty reserve.
    #[must_use]
    pub const fn new(creator: AccountId) -> Self {
        Self {
            creator,
            reserve: Amount::ZERO,
            graduated: false,
        }
    }

    /// Account that launched the asset.
    #[must_use]
    pub const fn creator(&self) -> AccountId {
        self.creator
    }

    /// Accumulated base reserve, net of fees.
    #[must_use]
    pub const fn reserve(&self) -> Amount {
        self.reserve
    }

    /// Whether the curve has graduated. Monotonic: never unset.
    #[must_use]
    pub const fn is_graduated(&self) -> bool {
        self.graduated
    }

    /// Prices a buy of `spend` base against the remaining `inventory`.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::PoolGraduated`] once the curve has graduated.
    /// - [`ExchangeError::ZeroAmount`] if `spend` is zero.
    /// - [`ExchangeError::Overflow`] if the reserve would overflow.
    pub fn quote_buy(
        &self,
        config: &LaunchConfig,
        inventory: Amount,
        spend: Amount,
    ) -> Result<BuyQuote> {
        if self.graduated {
            return Err(ExchangeError::PoolGraduated);
        }
        if spend.is_zero() {
            return Err(ExchangeError::ZeroAmount);
        }
        let fee = config.buy_fee_bps.apply(spend)?;
        let net = spend
            .checked_sub(fee)
            .ok_or(ExchangeError::Overflow("fee exceeds spend"))?;

        // x is the effective reserve; widened so virtual + real + net cannot
        // wrap even near the amount ceiling.
        let x = u128::from(self.reserve.get()) + u128::from(config.virtual_base_reserve.get());
        let tokens_out = Amount::new(math::mul_div(
            inventory.get(),
            net.get(),
            x + u128::from(net.get()),
        )?);

        let new_reserve = self
            .reserve
            .checked_add(net)
            .ok_or(ExchangeError::Overflow("curve reserve accumulation"))?;
        let graduates = new_reserve >= config.graduation_threshold;

        Ok(BuyQuote {
            fee,
            net,
            tokens_out,
            new_reserve,
            graduates,
        })
    }

    /// Prices a sell of `token_amount` tokens back into the curve.
    ///
    /// The payout is `floor(x × t / (y + t))` with the sell fee (zero by
    /// default) taken from the payout. The real reserve caps what can be
    /// paid: the virtual component exists only for pricing.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::PoolGraduated`] once the curve has graduated.
    /// - [`ExchangeError::ZeroAmount`] if `token_amount` is zero.
    /// - [`ExchangeError::InsufficientReserve`] if the priced payout exceeds
    ///   the real reserve.
    pub fn quote_sell(
        &self,
        config: &LaunchConfig,
        inventory: Amount,
        token_amount: Amount,
    ) -> Result<SellQuote> {
        if self.graduated {
            return Err(ExchangeError::PoolGraduated);
        }
        if token_amount.is_zero() {
            return Err(ExchangeError::ZeroAmount);
        }

        let x = self
            .reserve
            .checked_add(config.virtual_base_reserve)
            .ok_or(ExchangeError::Overflow("effective reserve"))?;
        let gross_out = Amount::new(math::mul_div(
            x.get(),
            token_amount.get(),
            u128::from(inventory.get()) + u128::from(token_amount.get()),
        )?);
        if gross_out > self.reserve {
            return Err(ExchangeError::InsufficientReserve {
                have: self.reserve,
                need: gross_out,
            });
        }

        let fee = config.sell_fee_bps.apply(gross_out)?;
        let net_out = gross_out
            .checked_sub(fee)
            .ok_or(ExchangeError::Overflow("fee exceeds payout"))?;
        let new_reserve = self
            .reserve
            .checked_sub(gross_out)
            .ok_or(ExchangeError::InsufficientReserve {
                have: self.reserve,
                need: gross_out,
            })?;

        Ok(SellQuote {
            gross_out,
            fee,
            net_out,
            new_reserve,
        })
    }

    /// Commits a previously validated buy.
    pub fn apply_buy(&mut self, quote: &BuyQuote) {
        self.reserve = quote.new_reserve;
    }

    /// Commits a previously validated sell.
    pub(crate) fn apply_sell(&mut self, quote: &SellQuote) {
        self.reserve = quote.new_reserve;
    }

    /// Marks the curve graduated and empties its reserve. One-way.
    pub(crate) fn graduate(&mut self) {
        self.reserve = Amount::ZERO;
        self.graduated = true;
    }
}
