//! # mintsale-types
//!
//! Shared types, errors, and configuration for the **mintsale** engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`TokenId`]
//! - **Sale model**: [`SalePhase`], [`NotOpenReason`], [`SupplyCaps`], [`SupplyCounters`], [`PriceSchedule`]
//! - **Configuration**: [`SaleConfig`], [`SaleLimits`], [`SaleRoles`], [`SaleMetadata`], [`FactoryMintPolicy`]
//! - **Events & receipts**: [`SaleEvent`], [`MintReceipt`], [`Withdrawal`]
//! - **Errors**: [`SaleError`] with `SALE_ERR_` prefix codes
//! - **Boundary decoding**: [`decode`] rejects negative / out-of-range raw input
//! - **Constants**: defaults and fixed strings

pub mod config;
pub mod constants;
pub mod decode;
pub mod error;
pub mod event;
pub mod ids;
pub mod phase;
pub mod pricing;
pub mod receipt;
pub mod supply;

// Re-export all primary types at crate root for ergonomic imports:
//   use mintsale_types::{SalePhase, SaleError, AccountId, ...};

pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use phase::*;
pub use pricing::*;
pub use receipt::*;
pub use supply::*;

// Constants and decoders are accessed via their module paths
// (`mintsale_types::constants::FOO`, `mintsale_types::decode::quantity`).
