//! Supply conservation audit.
//!
//! Invariants checked against an independent tally:
//! ```text
//! registry.minted_count == Σ(minted across all channels) == counters.total_minted
//! ledger.balance        == Σ(credits) − Σ(withdrawals)
//! ```
//!
//! A failure here means the engine and its collaborators disagree about
//! irreversible state. There is no automatic repair.

use std::collections::HashMap;

use mintsale_types::{MintChannel, Result, SaleError, SupplyCounters};
use rust_decimal::Decimal;

use crate::{FundsLedger, OwnershipRegistry};

/// Independent tally of everything the engine committed.
pub struct SupplyAudit {
    /// Tokens minted per channel.
    minted: HashMap<MintChannel, u64>,
    /// Total credited to the funds ledger.
    credited: Decimal,
    /// Total withdrawn from the funds ledger.
    withdrawn: Decimal,
}

impl SupplyAudit {
    #[must_use]
    pub fn new() -> Self {
        Self {
            minted: HashMap::new(),
            credited: Decimal::ZERO,
            withdrawn: Decimal::ZERO,
        }
    }

    /// Record a committed mint.
    pub fn record_mint(&mut self, channel: MintChannel, count: u32) {
        *self.minted.entry(channel).or_insert(0) += u64::from(count);
    }

    /// Record a credit to the funds ledger.
    pub fn record_credit(&mut self, amount: Decimal) {
        self.credited = self.credited.saturating_add(amount);
    }

    /// Record a withdrawal.
    pub fn record_withdrawal(&mut self, amount: Decimal) {
        self.withdrawn = self.withdrawn.saturating_add(amount);
    }

    /// Tokens minted through one channel.
    #[must_use]
    pub fn minted_via(&self, channel: MintChannel) -> u64 {
        self.minted.get(&channel).copied().unwrap_or(0)
    }

    /// Tokens minted through every channel.
    #[must_use]
    pub fn expected_minted(&self) -> u64 {
        self.minted.values().sum()
    }

    /// Expected funds balance: credits − withdrawals.
    #[must_use]
    pub fn expected_balance(&self) -> Decimal {
        self.credited - self.withdrawn
    }

    /// Verify the engine's counters and both collaborators against the tally.
    ///
    /// # Errors
    /// Returns [`SaleError::SupplyInvariantViolation`] naming the first mismatch.
    pub fn verify<R, L>(&self, counters: &SupplyCounters, registry: &R, ledger: &L) -> Result<()>
    where
        R: OwnershipRegistry + ?Sized,
        L: FundsLedger + ?Sized,
    {
        let expected = self.expected_minted();
        if counters.total_minted != expected {
            return Err(SaleError::SupplyInvariantViolation {
                reason: format!(
                    "engine total_minted {} != audited mints {expected}",
                    counters.total_minted
                ),
            });
        }
        if registry.minted_count() != expected {
            return Err(SaleError::SupplyInvariantViolation {
                reason: format!(
                    "registry minted_count {} != audited mints {expected}",
                    registry.minted_count()
                ),
            });
        }
        if counters.reserved_minted != self.minted_via(MintChannel::Reserve) {
            return Err(SaleError::SupplyInvariantViolation {
                reason: format!(
                    "engine reserved_minted {} != audited reserve mints {}",
                    counters.reserved_minted,
                    self.minted_via(MintChannel::Reserve)
                ),
            });
        }

        let expected_balance = self.expected_balance();
        if ledger.balance() != expected_balance {
            return Err(SaleError::SupplyInvariantViolation {
                reason: format!(
                    "ledger balance {} != expected {expected_balance} \
                     (credited={}, withdrawn={})",
                    ledger.balance(),
                    self.credited,
                    self.withdrawn,
                ),
            });
        }
        if ledger.total_credited() - ledger.total_withdrawn() != ledger.balance() {
            return Err(SaleError::SupplyInvariantViolation {
                reason: format!(
                    "ledger internally inconsistent: credited {} - withdrawn {} != balance {}",
                    ledger.total_credited(),
                    ledger.total_withdrawn(),
                    ledger.balance()
                ),
            });
        }
        Ok(())
    }
}

impl Default for SupplyAudit {
    fn default() -> Self {
        Self::new()
    }
}
