//! Random mint / credit / withdraw streams keep the audit balanced.

use mintsale_ledger::{FundsLedger, InMemoryLedger, InMemoryRegistry, OwnershipRegistry, SupplyAudit};
use mintsale_types::{AccountId, MintChannel, SupplyCounters, TokenId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

#[test]
fn random_activity_stays_conserved() {
    let mut rng = StdRng::seed_from_u64(42);
    let accounts: Vec<AccountId> = (0..5).map(|_| AccountId::new()).collect();
    let owner = accounts[0];

    let mut registry = InMemoryRegistry::new();
    let mut ledger = InMemoryLedger::new();
    let mut audit = SupplyAudit::new();
    let mut counters = SupplyCounters::default();

    for _ in 0..500 {
        match rng.gen_range(0..3) {
            0 | 1 => {
                let recipient = accounts[rng.gen_range(0..accounts.len())];
                let count = rng.gen_range(1..=20u32);
                let channel = if rng.gen_bool(0.2) {
                    MintChannel::Reserve
                } else {
                    MintChannel::Public
                };
                let first = registry.assign_sequential_ids(recipient, count).unwrap();
                assert_eq!(first, TokenId::after(counters.total_minted));

                counters.total_minted += u64::from(count);
                if channel == MintChannel::Reserve {
                    counters.reserved_minted += u64::from(count);
                } else {
                    let paid = Decimal::new(rng.gen_range(1..500), 3);
                    ledger.credit(paid);
                    audit.record_credit(paid);
                }
                audit.record_mint(channel, count);
            }
            _ => {
                let amount = ledger.withdraw_all(owner);
                audit.record_withdrawal(amount);
            }
        }
        audit.verify(&counters, &registry, &ledger).unwrap();
    }

    let held: u64 = accounts.iter().map(|a| registry.balance_of(*a)).sum();
    assert_eq!(held, registry.minted_count());
    assert_eq!(ledger.withdrawn_to(owner), ledger.total_withdrawn());
}
