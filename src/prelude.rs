//! Convenience re-exports for common types.
//!
//! The prelude provides a single import to bring all commonly used items
//! into scope:
//!
//! ```rust
//! use tidepool::prelude::*;
//! ```
//!
//! This re-exports the domain value types, the exchange facade, the error
//! types, and the configuration so that consumers don't need to import from
//! individual submodules.

// Re-export domain types
pub use crate::domain::{
    AccountId, Amount, AssetId, AssetPair, BasisPoints, PoolAddress, Position, PositionId,
};

// Re-export the facade and pool types
pub use crate::amm::{LiquidityAdded, LiquidityRemoved, PoolState, SwapDirection, SwapExecuted};
pub use crate::curve::{BuyQuote, CurvePool, SellQuote};
pub use crate::exchange::Exchange;

// Re-export configuration
pub use crate::config::LaunchConfig;

// Re-export error types
pub use crate::error::{ExchangeError, Result};

// Re-export events
pub use crate::events::ExchangeEvent;
