//! Shared fixtures for the engine integration tests.

#![allow(dead_code)]

use mintsale_engine::SaleEngine;
use mintsale_types::{AccountId, SaleConfig};
use rust_decimal::Decimal;

/// Route engine logs to the test harness. Honors `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct Actors {
    pub owner: AccountId,
    pub factory: AccountId,
    pub alice: AccountId,
    pub bob: AccountId,
}

impl Actors {
    pub fn new() -> Self {
        Self {
            owner: AccountId::new(),
            factory: AccountId::new(),
            alice: AccountId::new(),
            bob: AccountId::new(),
        }
    }
}

/// 100 max, 40 pre-sale, 10 reserved, 0.06 / 0.04, 20 per call.
pub fn dummy_engine(actors: &Actors) -> SaleEngine {
    init_tracing();
    SaleEngine::new(SaleConfig::dummy(actors.owner, Some(actors.factory)))
}

/// Amount given in hundredths of a unit.
pub fn eth(hundredths: i64) -> Decimal {
    Decimal::new(hundredths, 2)
}
