//! Funds ledger: holds sale proceeds until the administrator withdraws.
//!
//! There is exactly one balance (the collection's own). Credits come from
//! paid mints; a withdrawal always moves the whole balance.

use std::collections::HashMap;

use mintsale_types::AccountId;
use rust_decimal::Decimal;

/// The engine's view of the external funds custody.
pub trait FundsLedger {
    /// Add a tendered payment to the balance.
    fn credit(&mut self, amount: Decimal);

    /// Move the entire balance to `recipient`; returns the amount moved
    /// (zero when nothing has accrued since the last withdrawal).
    fn withdraw_all(&mut self, recipient: AccountId) -> Decimal;

    /// Current balance held for the collection.
    fn balance(&self) -> Decimal;

    /// Sum of all credits since genesis.
    fn total_credited(&self) -> Decimal;

    /// Sum of all withdrawals since genesis.
    fn total_withdrawn(&self) -> Decimal;

    /// Total ever paid out to `account`.
    fn withdrawn_to(&self, account: AccountId) -> Decimal;
}

/// In-process ledger with per-recipient payout tracking.
pub struct InMemoryLedger {
    balance: Decimal,
    credited: Decimal,
    withdrawn: Decimal,
    /// Amount paid out to each recipient.
    payouts: HashMap<AccountId, Decimal>,
}

impl InMemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            balance: Decimal::ZERO,
            credited: Decimal::ZERO,
            withdrawn: Decimal::ZERO,
            payouts: HashMap::new(),
        }
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl FundsLedger for InMemoryLedger {
    // Saturates instead of panicking; a saturated ledger fails the supply audit.
    fn credit(&mut self, amount: Decimal) {
        self.balance = self.balance.saturating_add(amount);
        self.credited = self.credited.saturating_add(amount);
    }

    fn withdraw_all(&mut self, recipient: AccountId) -> Decimal {
        let amount = std::mem::replace(&mut self.balance, Decimal::ZERO);
        self.withdrawn = self.withdrawn.saturating_add(amount);
        let paid = self.payouts.entry(recipient).or_insert(Decimal::ZERO);
        *paid = paid.saturating_add(amount);
        amount
    }

    fn balance(&self) -> Decimal {
        self.balance
    }

    fn total_credited(&self) -> Decimal {
        self.credited
    }

    fn total_withdrawn(&self) -> Decimal {
        self.withdrawn
    }

    fn withdrawn_to(&self, account: AccountId) -> Decimal {
        self.payouts.get(&account).copied().unwrap_or(Decimal::ZERO)
    }
}
