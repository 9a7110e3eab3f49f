//! Many buyers racing through one shared engine must never over-mint.

mod common;

use std::thread;

use common::{dummy_engine, eth, Actors};
use mintsale_engine::SharedSaleEngine;
use mintsale_types::{AccountId, SaleError, SalePhase};

#[test]
fn racing_buyers_never_exceed_max_supply() {
    let actors = Actors::new();
    let shared = SharedSaleEngine::new(dummy_engine(&actors));
    shared.set_phase(actors.owner, SalePhase::Open).unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let engine = shared.clone();
            thread::spawn(move || {
                let buyer = AccountId::new();
                let mut minted = 0u64;
                for _ in 0..10 {
                    match engine.mint_public(buyer, 3, eth(18)) {
                        Ok(receipt) => minted += u64::from(receipt.count),
                        Err(SaleError::MaxSupplyExceeded { .. } | SaleError::SaleNotOpen { .. }) => {}
                        Err(other) => panic!("unexpected error: {other}"),
                    }
                }
                minted
            })
        })
        .collect();

    let minted: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    let snapshot = shared.snapshot().unwrap();

    // 100 is not a multiple of 3: the sale stops at 99 and stays open.
    assert_eq!(minted, 99);
    assert_eq!(snapshot.counters.total_minted, 99);
    assert_eq!(snapshot.phase, SalePhase::Open);
    assert_eq!(snapshot.funds_balance, eth(18 * 33));
    assert!(shared.audit().is_ok());
}

#[test]
fn racing_reservations_mint_once() {
    let actors = Actors::new();
    let shared = SharedSaleEngine::new(dummy_engine(&actors));
    let owner = actors.owner;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = shared.clone();
            thread::spawn(move || engine.reserve_tokens(owner).is_ok())
        })
        .collect();
    let successes = handles
        .into_iter()
        .filter_map(|h| h.join().ok())
        .filter(|ok| *ok)
        .count();

    assert_eq!(successes, 1);
    let counters = shared.snapshot().unwrap().counters;
    assert_eq!(counters.reserved_minted, 10);
    assert_eq!(counters.total_minted, 10);
}

#[test]
fn ids_are_unique_across_threads() {
    let actors = Actors::new();
    let shared = SharedSaleEngine::new(dummy_engine(&actors));
    shared.set_phase(actors.owner, SalePhase::Open).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = shared.clone();
            thread::spawn(move || {
                let buyer = AccountId::new();
                let mut ids = Vec::new();
                for _ in 0..5 {
                    if let Ok(receipt) = engine.mint_public(buyer, 5, eth(30)) {
                        ids.extend(receipt.ids());
                    }
                }
                ids
            })
        })
        .collect();

    let mut all: Vec<u64> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
    all.sort_unstable();
    assert_eq!(all, (1..=100).collect::<Vec<_>>());
    assert_eq!(shared.snapshot().unwrap().phase, SalePhase::Closed);
}
