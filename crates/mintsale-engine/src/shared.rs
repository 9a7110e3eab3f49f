//! Thread-safe handle over one [`SaleEngine`].
//!
//! Every call takes the lock once, so the capacity check and the counter
//! increment of a mint can never interleave with another caller's.

use std::sync::{Arc, Mutex, MutexGuard};

use mintsale_ledger::{FundsLedger, InMemoryLedger, InMemoryRegistry, OwnershipRegistry};
use mintsale_types::{
    AccountId, MintReceipt, Result, SaleError, SalePhase, TokenId, Withdrawal,
};
use rust_decimal::Decimal;

use crate::engine::SaleEngine;
use crate::snapshot::SaleSnapshot;

/// Cloneable handle; all clones share one engine.
pub struct SharedSaleEngine<R = InMemoryRegistry, L = InMemoryLedger>
where
    R: OwnershipRegistry,
    L: FundsLedger,
{
    inner: Arc<Mutex<SaleEngine<R, L>>>,
}

impl<R: OwnershipRegistry, L: FundsLedger> Clone for SharedSaleEngine<R, L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: OwnershipRegistry, L: FundsLedger> SharedSaleEngine<R, L> {
    #[must_use]
    pub fn new(engine: SaleEngine<R, L>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SaleEngine<R, L>>> {
        self.inner.lock().map_err(|_| {
            tracing::warn!("Sale engine lock poisoned");
            SaleError::Internal("sale engine lock poisoned".to_string())
        })
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with<T>(&self, f: impl FnOnce(&mut SaleEngine<R, L>) -> Result<T>) -> Result<T> {
        let mut engine = self.lock()?;
        f(&mut *engine)
    }

    /// Run a read-only `f` under the lock.
    pub fn read<T>(&self, f: impl FnOnce(&SaleEngine<R, L>) -> T) -> Result<T> {
        let engine = self.lock()?;
        Ok(f(&*engine))
    }

    pub fn set_phase(&self, caller: AccountId, phase: SalePhase) -> Result<()> {
        self.with(|engine| engine.set_phase(caller, phase))
    }

    pub fn mint_public(
        &self,
        caller: AccountId,
        quantity: u32,
        payment: Decimal,
    ) -> Result<MintReceipt> {
        self.with(|engine| engine.mint_public(caller, quantity, payment))
    }

    pub fn mint_from_factory(&self, caller: AccountId, recipient: AccountId) -> Result<MintReceipt> {
        self.with(|engine| engine.mint_from_factory(caller, recipient))
    }

    pub fn reserve_tokens(&self, caller: AccountId) -> Result<MintReceipt> {
        self.with(|engine| engine.reserve_tokens(caller))
    }

    pub fn mint_from_owner(&self, caller: AccountId, quantity: u32) -> Result<MintReceipt> {
        self.with(|engine| engine.mint_from_owner(caller, quantity))
    }

    pub fn withdraw(&self, caller: AccountId) -> Result<Withdrawal> {
        self.with(|engine| engine.withdraw(caller))
    }

    pub fn token_uri(&self, id: TokenId) -> Result<String> {
        self.read(|engine| engine.token_uri(id))
    }

    pub fn snapshot(&self) -> Result<SaleSnapshot> {
        self.read(|engine| engine.snapshot())
    }

    pub fn audit(&self) -> Result<()> {
        self.with(|engine| engine.audit())
    }
}
