//! Fundamental domain value types used throughout the exchange engine.
//!
//! This module contains the core value types that model the exchange domain:
//! accounts, assets, amounts, fee rates, pool addresses, and LP positions.
//! All types use newtypes with validated constructors to enforce invariants.

mod account;
mod amount;
mod asset;
mod asset_pair;
mod basis_points;
mod pool_address;
mod position;

pub use account::AccountId;
pub use amount::Amount;
pub use asset::AssetId;
pub use asset_pair::AssetPair;
pub use basis_points::BasisPoints;
pub use pool_address::PoolAddress;
pub use position::{Position, PositionId};
