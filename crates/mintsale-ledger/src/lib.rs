//! # mintsale-ledger
//!
//! **Collaborator seams** for the sale engine: who owns which token, where
//! the sale proceeds sit, and an independent audit that the two agree with
//! the engine's own counters.
//!
//! ## Architecture
//!
//! 1. **OwnershipRegistry**: hands out contiguous 1-based token ids
//! 2. **FundsLedger**: holds the proceeds until the administrator withdraws
//! 3. **SupplyAudit**: tallies mints / credits / withdrawals independently
//!    and flags any divergence
//!
//! The engine owns one of each and is the only thing that mutates them.

pub mod audit;
pub mod funds;
pub mod registry;

pub use audit::SupplyAudit;
pub use funds::{FundsLedger, InMemoryLedger};
pub use registry::{InMemoryRegistry, OwnershipRegistry};
