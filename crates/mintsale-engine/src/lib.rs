//! # mintsale-engine
//!
//! **Sale plane**: the phase state machine and supply accounting for a
//! fixed-supply collection.
//!
//! ## Architecture
//!
//! Every mutating operation on [`SaleEngine`] runs the same pipeline:
//! 1. Check the caller's role ([`Authority`])
//! 2. Check phase, quantity, and payment against caps and prices
//! 3. Assign ids through the [`OwnershipRegistry`](mintsale_ledger::OwnershipRegistry)
//!    (the only fallible collaborator call)
//! 4. Credit the [`FundsLedger`](mintsale_ledger::FundsLedger) and commit counters
//! 5. Apply automatic phase transitions ([`transitions::evaluate`])
//! 6. Append events to the hash-chained [`Journal`]
//!
//! A rejection at any step before 3 leaves the engine untouched.
//! [`SharedSaleEngine`] serializes callers from multiple threads behind
//! one lock.

pub mod authority;
pub mod engine;
pub mod journal;
pub mod metadata;
pub mod shared;
pub mod snapshot;
pub mod transitions;

pub use authority::Authority;
pub use engine::SaleEngine;
pub use journal::{EventRecord, Journal};
pub use shared::SharedSaleEngine;
pub use snapshot::SaleSnapshot;
