//! # Tidepool
//!
//! Tokenized-asset exchange engine: bonding-curve launches, threshold
//! graduation, and constant-product pools over a single balance ledger.
//!
//! Newly issued assets start life on a **bonding curve** — a virtual-reserve
//! pricing rule that quotes finite prices from the very first trade, with no
//! external liquidity. Once cumulative buying pushes the curve's base
//! reserve to a configured threshold, the asset **graduates**, exactly once:
//! its liquidity seeds a general **constant-product pool** (`x · y = k`)
//! where it trades permissionlessly alongside any other listed pair, with
//! proportional LP positions and fee accrual to liquidity providers.
//!
//! All amounts are `u64` fixed-point scaled by 10⁸; all intermediate pricing
//! arithmetic widens to `u128` and rounds down, so every flooring step
//! favours the pool over the trader.
//!
//! # Quick Start
//!
//! ```rust
//! use tidepool::config::{LaunchConfig, UNIT_SCALE};
//! use tidepool::domain::{AccountId, Amount, AssetId};
//! use tidepool::exchange::Exchange;
//!
//! let mut exchange = Exchange::new(LaunchConfig::default()).expect("valid config");
//!
//! let creator = AccountId::from_bytes([1u8; 32]);
//! let buyer = AccountId::from_bytes([2u8; 32]);
//! let asset = AssetId::from_bytes([3u8; 32]);
//!
//! // Launch an asset onto its bonding curve and fund a buyer.
//! exchange.launch(creator, asset).expect("launched");
//! exchange
//!     .deposit_base(buyer, Amount::new(100 * UNIT_SCALE))
//!     .expect("funded");
//!
//! // Buy from the curve: fee to treasury, net spend into the reserve.
//! let tokens = exchange
//!     .buy(buyer, asset, Amount::new(UNIT_SCALE))
//!     .expect("buy succeeded");
//! assert!(tokens.get() > 0);
//! assert_eq!(exchange.balance_of(buyer, asset).expect("asset launched"), tokens);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Consumer    │  launch / buy / sell / pool_* through one facade
//! └──────┬───────┘
//!        │ &mut self per call (assert, then commit)
//!        ▼
//! ┌──────────────┐
//! │   Exchange    │  wires ledger moves to pricing, records events
//! └──────┬───────┘
//!        │
//!   ┌────┴─────────────────┐
//!   ▼                      ▼
//! ┌──────────────┐  ┌──────────────┐
//! │  CurvePool    │  │  PoolState    │  quote_* (pure) / apply_* (infallible)
//! │  curve.rs     │─▶│  amm.rs       │  graduation.rs bridges, one-way
//! └──────┬───────┘  └──────┬───────┘
//!        │                 │
//!        ▼                 ▼
//! ┌──────────────────────────────┐
//! │  Ledger + CapabilityBundle    │  (account, asset) → amount
//! └──────────────────────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`Amount`](domain::Amount), [`AssetId`](domain::AssetId), [`AssetPair`](domain::AssetPair), [`PoolAddress`](domain::PoolAddress), … |
//! | [`ledger`] | Balance book and per-asset mint/burn/transfer capabilities |
//! | [`curve`] | [`CurvePool`](curve::CurvePool): virtual-reserve bonding-curve pricing |
//! | [`amm`] | [`PoolState`](amm::PoolState): constant-product swaps and LP positions |
//! | [`graduation`] | One-way curve-to-pool transition |
//! | [`registry`] | Generic keyed store with atomic create-if-absent |
//! | [`exchange`] | [`Exchange`](exchange::Exchange): the single-writer entry point |
//! | [`events`] | Typed event log: the host's integration surface |
//! | [`config`] | [`LaunchConfig`](config::LaunchConfig): economic constants with defaults |
//! | [`math`] | Widened `mul_div` and integer square root |
//! | [`error`] | [`ExchangeError`](error::ExchangeError) unified error enum |
//! | [`prelude`] | Convenience re-exports |

pub mod amm;
pub mod config;
pub mod curve;
pub mod domain;
pub mod error;
pub mod events;
pub mod exchange;
pub mod graduation;
pub mod ledger;
pub mod math;
pub mod prelude;
pub mod registry;
