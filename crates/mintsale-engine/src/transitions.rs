//! Automatic phase transitions.
//!
//! Evaluated once after every successful mint, never after an explicit
//! phase set. The pre-sale check runs first so one mint can move a sale
//! from `PreSaleOpen` straight through `Open` to `Closed`.
//!
//! Thresholds compare with `>=`. Public minting can only ever land exactly
//! on a threshold, but administrator mints may jump past one.

use mintsale_types::{SalePhase, SupplyCaps, SupplyCounters, TransitionCause};

/// Phase changes implied by the counters, in the order they apply.
#[must_use]
pub fn evaluate(
    phase: SalePhase,
    counters: &SupplyCounters,
    caps: &SupplyCaps,
) -> Vec<(SalePhase, TransitionCause)> {
    let mut changes = Vec::new();
    let mut current = phase;

    if current == SalePhase::PreSaleOpen && counters.total_minted >= caps.pre_sale_supply {
        current = SalePhase::Open;
        changes.push((current, TransitionCause::PreSaleExhausted));
    }
    if current.is_open() && counters.total_minted >= caps.max_supply {
        changes.push((SalePhase::Closed, TransitionCause::SupplyExhausted));
    }
    changes
}

/// Whether an explicit set to `target` contradicts what [`evaluate`] would
/// immediately conclude for the current counters.
#[must_use]
pub fn overrides_threshold(target: SalePhase, counters: &SupplyCounters, caps: &SupplyCaps) -> bool {
    !evaluate(target, counters, caps).is_empty()
}
