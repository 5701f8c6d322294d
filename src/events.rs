//! Typed events recorded by the exchange.
//!
//! Every state-changing operation appends exactly one event to the
//! exchange's in-memory log. Hosts drain the log to index trades, feed
//! charts, or notify external position and metadata services; the event
//! stream is the integration surface for everything this crate leaves
//! external.

use serde::{Deserialize, Serialize};

use crate::amm::SwapDirection;
use crate::domain::{AccountId, Amount, AssetId, AssetPair, BasisPoints, PoolAddress, PositionId};

/// A new asset was launched onto a bonding curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLaunchedEvent {
    pub creator: AccountId,
    pub asset: AssetId,
    /// Inventory minted into the curve vault.
    pub curve_inventory: Amount,
    /// Inventory pre-minted for the graduation seed.
    pub reserved_allocation: Amount,
}

/// Tokens were bought from a bonding curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseEvent {
    pub buyer: AccountId,
    pub asset: AssetId,
    /// Net spend added to the curve reserve (gross minus the buy fee).
    pub net: Amount,
    pub tokens_out: Amount,
}

/// Tokens were sold back into a bonding curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleEvent {
    pub seller: AccountId,
    pub asset: AssetId,
    pub token_amount: Amount,
    pub base_out: Amount,
}

/// A curve crossed its threshold and seeded a constant-product pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraduatedPoolCreatedEvent {
    pub asset: AssetId,
    pub pool_address: PoolAddress,
    /// Base currency swept from the curve reserve into the pool.
    pub base_amount: Amount,
    /// Reserved token allocation deposited alongside it.
    pub asset_amount: Amount,
    /// Seed LP shares minted to the protocol position.
    pub lp_shares: Amount,
}

/// A general constant-product pool was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolCreatedEvent {
    pub creator: AccountId,
    pub pool: PoolAddress,
    pub assets: AssetPair,
    pub fee_bps: BasisPoints,
}

/// Liquidity was added to a pool position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedEvent {
    pub pool: PoolAddress,
    pub position_id: PositionId,
    pub used_a: Amount,
    pub used_b: Amount,
    pub minted: Amount,
    pub new_supply: Amount,
}

/// Liquidity was removed from a pool position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedEvent {
    pub pool: PoolAddress,
    pub position_id: PositionId,
    pub out_a: Amount,
    pub out_b: Amount,
    pub burned: Amount,
    pub new_supply: Amount,
}

/// A swap executed against a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwappedEvent {
    pub pool: PoolAddress,
    pub direction: SwapDirection,
    pub amount_in: Amount,
    pub amount_out: Amount,
    pub fee_paid: Amount,
    pub reserve_a_after: Amount,
    pub reserve_b_after: Amount,
}

/// Union of everything the exchange records, in commit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeEvent {
    Launched(AssetLaunchedEvent),
    Purchase(PurchaseEvent),
    Sale(SaleEvent),
    Graduated(GraduatedPoolCreatedEvent),
    PoolCreated(PoolCreatedEvent),
    Added(AddedEvent),
    Removed(RemovedEvent),
    Swapped(SwappedEvent),
}
