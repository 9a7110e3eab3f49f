//! The sale engine.
//!
//! One owned aggregate holds the phase, counters, caps, prices, roles and
//! metadata, together with the two collaborators it drives. Methods take
//! `&mut self`; see [`crate::SharedSaleEngine`] for cross-thread use.

use mintsale_ledger::{
    FundsLedger, InMemoryLedger, InMemoryRegistry, OwnershipRegistry, SupplyAudit,
};
use mintsale_types::{
    decode, AccountId, MetadataField, MintChannel, MintReceipt, NotOpenReason, PriceSchedule,
    Result, Role, SaleConfig, SaleError, SaleEvent, SaleLimits, SaleMetadata, SalePhase,
    SupplyCaps, SupplyCounters, TokenId, TransitionCause, Withdrawal,
};
use rust_decimal::Decimal;

use crate::authority::Authority;
use crate::journal::{EventRecord, Journal};
use crate::snapshot::SaleSnapshot;
use crate::{metadata, transitions};

/// Phased fixed-supply sale.
///
/// Rejections are detected before any state is touched. Once the
/// registry accepts an assignment the operation always completes.
pub struct SaleEngine<R = InMemoryRegistry, L = InMemoryLedger>
where
    R: OwnershipRegistry,
    L: FundsLedger,
{
    phase: SalePhase,
    caps: SupplyCaps,
    prices: PriceSchedule,
    limits: SaleLimits,
    counters: SupplyCounters,
    authority: Authority,
    metadata: SaleMetadata,
    registry: R,
    ledger: L,
    journal: Journal,
    audit: SupplyAudit,
}

impl SaleEngine {
    /// New sale in `Pending` with in-memory collaborators.
    ///
    /// The config is trusted as given; call [`SaleConfig::validate`] first
    /// to enforce the cap and price invariants.
    #[must_use]
    pub fn new(config: SaleConfig) -> Self {
        Self::assemble(config, InMemoryRegistry::new(), InMemoryLedger::new())
    }
}

impl<R: OwnershipRegistry, L: FundsLedger> SaleEngine<R, L> {
    /// New sale over caller-supplied collaborators.
    ///
    /// # Errors
    /// `Configuration` if the registry already holds ids or the ledger
    /// already holds funds.
    pub fn with_collaborators(config: SaleConfig, registry: R, ledger: L) -> Result<Self> {
        if registry.minted_count() != 0 {
            return Err(SaleError::Configuration(format!(
                "registry already holds {} ids",
                registry.minted_count()
            )));
        }
        if !ledger.balance().is_zero() {
            return Err(SaleError::Configuration(format!(
                "ledger already holds {}",
                ledger.balance()
            )));
        }
        Ok(Self::assemble(config, registry, ledger))
    }

    fn assemble(config: SaleConfig, registry: R, ledger: L) -> Self {
        tracing::info!(
            name = %config.metadata.name,
            max_supply = config.caps.max_supply,
            pre_sale_supply = config.caps.pre_sale_supply,
            max_reserved_supply = config.caps.max_reserved_supply,
            "Sale created"
        );
        Self {
            phase: SalePhase::Pending,
            caps: config.caps,
            prices: config.prices,
            limits: config.limits,
            counters: SupplyCounters::default(),
            authority: Authority::new(config.roles),
            metadata: config.metadata,
            registry,
            ledger,
            journal: Journal::new(),
            audit: SupplyAudit::new(),
        }
    }

    // -----------------------------------------------------------------
    // Phase control
    // -----------------------------------------------------------------

    /// Administrator-only. Overwrites the phase; never triggers automatic
    /// transitions.
    pub fn set_phase(&mut self, caller: AccountId, phase: SalePhase) -> Result<()> {
        self.authority
            .require(caller, Role::Administrator)
            .inspect_err(|err| log_rejection("set_phase", caller, err))?;
        self.apply_phase(phase);
        Ok(())
    }

    /// [`Self::set_phase`] from a raw encoding. Authorization is checked
    /// before the code is decoded.
    pub fn set_phase_code(&mut self, caller: AccountId, code: i64) -> Result<()> {
        self.authority
            .require(caller, Role::Administrator)
            .and_then(|()| decode::phase(code))
            .map(|phase| self.apply_phase(phase))
            .inspect_err(|err| log_rejection("set_phase_code", caller, err))
    }

    fn apply_phase(&mut self, phase: SalePhase) {
        let from = self.phase;
        if transitions::overrides_threshold(phase, &self.counters, &self.caps) {
            tracing::warn!(
                from = %from,
                to = %phase,
                total_minted = self.counters.total_minted,
                "Phase set past an automatic transition threshold"
            );
        }
        self.phase = phase;
        self.journal.append(SaleEvent::PhaseChanged {
            from,
            to: phase,
            cause: TransitionCause::Administrator,
        });
        tracing::info!(from = %from, to = %phase, "Phase set by administrator");
    }

    // -----------------------------------------------------------------
    // Minting
    // -----------------------------------------------------------------

    /// Paid mint open to any caller during `PreSaleOpen` and `Open`.
    ///
    /// The full tendered amount is kept; overpayment is not refunded.
    ///
    /// # Errors
    /// `SaleNotOpen`, `InvalidQuantity`, `QuantityLimitExceeded`,
    /// `InvalidAmount`, `InsufficientPayment`, `PreSaleSupplyExceeded`,
    /// `MaxSupplyExceeded`, or a registry error.
    pub fn mint_public(
        &mut self,
        caller: AccountId,
        quantity: u32,
        payment: Decimal,
    ) -> Result<MintReceipt> {
        self.check_public(quantity, payment)
            .and_then(|paid| self.commit_mint(MintChannel::Public, caller, quantity, paid))
            .inspect_err(|err| log_rejection("mint_public", caller, err))
    }

    fn check_public(&self, quantity: u32, payment: Decimal) -> Result<Decimal> {
        let phase = self.phase;
        if let Some(reason) = phase.not_open_reason() {
            return Err(SaleError::SaleNotOpen { reason });
        }
        if quantity == 0 {
            return Err(SaleError::InvalidQuantity {
                reason: "Cannot purchase 0 tokens.".to_string(),
            });
        }
        if quantity > self.limits.max_mintable_tokens {
            return Err(SaleError::QuantityLimitExceeded {
                requested: quantity,
                limit: self.limits.max_mintable_tokens,
            });
        }
        let payment = decode::payment(payment)?;
        let required = self.prices.required_payment(phase, quantity)?;
        if payment < required {
            return Err(SaleError::InsufficientPayment {
                required,
                tendered: payment,
            });
        }
        let quantity = u64::from(quantity);
        if phase == SalePhase::PreSaleOpen {
            self.counters.ensure_within_pre_sale(&self.caps, quantity)?;
        }
        self.counters.ensure_within_max(&self.caps, quantity)?;
        Ok(payment)
    }

    /// Single unpaid mint to `recipient`, factory identity only.
    pub fn mint_from_factory(
        &mut self,
        caller: AccountId,
        recipient: AccountId,
    ) -> Result<MintReceipt> {
        self.check_factory(caller)
            .and_then(|()| self.commit_mint(MintChannel::Factory, recipient, 1, Decimal::ZERO))
            .inspect_err(|err| log_rejection("mint_from_factory", caller, err))
    }

    fn check_factory(&self, caller: AccountId) -> Result<()> {
        self.authority.require(caller, Role::Factory)?;
        if !self.limits.factory_policy.allows(self.phase) {
            let reason = self
                .phase
                .not_open_reason()
                .unwrap_or(NotOpenReason::PublicSaleRequired);
            return Err(SaleError::SaleNotOpen { reason });
        }
        self.counters.ensure_within_max(&self.caps, 1)
    }

    /// Administrator-only. Mints the whole unminted reserve to the
    /// administrator, ignoring phase and payment.
    pub fn reserve_tokens(&mut self, caller: AccountId) -> Result<MintReceipt> {
        self.check_reserve(caller)
            .and_then(|count| self.commit_mint(MintChannel::Reserve, caller, count, Decimal::ZERO))
            .inspect_err(|err| log_rejection("reserve_tokens", caller, err))
    }

    fn check_reserve(&self, caller: AccountId) -> Result<u32> {
        self.authority.require(caller, Role::Administrator)?;
        let remaining = self.counters.reserve_remaining(&self.caps);
        if remaining == 0 {
            return Err(SaleError::ReserveExhausted);
        }
        self.counters.ensure_within_max(&self.caps, remaining)?;
        u32::try_from(remaining).map_err(|_| SaleError::ArithmeticOverflow {
            context: "reserve quantity",
        })
    }

    /// Administrator-only. Unpaid mint of `quantity` to the administrator
    /// in any phase.
    pub fn mint_from_owner(&mut self, caller: AccountId, quantity: u32) -> Result<MintReceipt> {
        self.check_owner_mint(caller, quantity)
            .and_then(|()| self.commit_mint(MintChannel::Owner, caller, quantity, Decimal::ZERO))
            .inspect_err(|err| log_rejection("mint_from_owner", caller, err))
    }

    fn check_owner_mint(&self, caller: AccountId, quantity: u32) -> Result<()> {
        self.authority.require(caller, Role::Administrator)?;
        if quantity == 0 {
            return Err(SaleError::InvalidQuantity {
                reason: "Cannot mint 0 tokens.".to_string(),
            });
        }
        self.counters
            .ensure_within_max(&self.caps, u64::from(quantity))
    }

    /// Assign ids, credit funds, commit counters, then run transitions.
    ///
    /// Callers have already validated `count` against every cap.
    fn commit_mint(
        &mut self,
        channel: MintChannel,
        recipient: AccountId,
        count: u32,
        paid: Decimal,
    ) -> Result<MintReceipt> {
        let expected = TokenId::after(self.counters.total_minted);
        let registry_count = self.registry.minted_count();
        if registry_count != self.counters.total_minted {
            tracing::warn!(
                engine_total = self.counters.total_minted,
                registry_total = registry_count,
                "Ownership registry drifted from engine counters"
            );
            return Err(SaleError::RegistryOutOfSync {
                expected,
                actual: TokenId::after(registry_count),
            });
        }
        let total_minted = self.counters.total_after(u64::from(count))?;
        let reserved_minted = if channel == MintChannel::Reserve {
            self.counters
                .reserved_minted
                .checked_add(u64::from(count))
                .ok_or(SaleError::ArithmeticOverflow {
                    context: "reserved supply",
                })?
        } else {
            self.counters.reserved_minted
        };

        let first_id = self.registry.assign_sequential_ids(recipient, count)?;
        if first_id != expected {
            tracing::warn!(
                expected = %expected,
                actual = %first_id,
                channel = %channel,
                "Ownership registry assigned unexpected ids"
            );
            return Err(SaleError::RegistryOutOfSync {
                expected,
                actual: first_id,
            });
        }

        // Past this point nothing can fail.
        if !paid.is_zero() {
            self.ledger.credit(paid);
            self.audit.record_credit(paid);
        }
        self.counters = SupplyCounters {
            total_minted,
            reserved_minted,
        };
        self.audit.record_mint(channel, count);
        self.journal.append(SaleEvent::TokensMinted {
            channel,
            recipient,
            first_id,
            count,
            paid,
        });
        tracing::info!(
            channel = %channel,
            recipient = %recipient,
            first_id = %first_id,
            count,
            paid = %paid,
            total_minted,
            "Tokens minted"
        );

        for (to, cause) in transitions::evaluate(self.phase, &self.counters, &self.caps) {
            let from = self.phase;
            self.phase = to;
            self.journal.append(SaleEvent::PhaseChanged { from, to, cause });
            tracing::info!(from = %from, to = %to, cause = ?cause, "Automatic phase transition");
        }

        Ok(MintReceipt {
            channel,
            recipient,
            first_id,
            count,
            paid,
            phase_after: self.phase,
        })
    }

    // -----------------------------------------------------------------
    // Funds
    // -----------------------------------------------------------------

    /// Administrator-only. Moves the entire balance to the administrator.
    /// Succeeds with zero when nothing has accrued.
    pub fn withdraw(&mut self, caller: AccountId) -> Result<Withdrawal> {
        self.authority
            .require(caller, Role::Administrator)
            .inspect_err(|err| log_rejection("withdraw", caller, err))?;

        let amount = self.ledger.withdraw_all(caller);
        self.audit.record_withdrawal(amount);
        self.journal.append(SaleEvent::FundsWithdrawn {
            recipient: caller,
            amount,
        });
        tracing::info!(recipient = %caller, amount = %amount, "Funds withdrawn");
        Ok(Withdrawal {
            recipient: caller,
            amount,
        })
    }

    // -----------------------------------------------------------------
    // Metadata
    // -----------------------------------------------------------------

    pub fn set_contract_uri(&mut self, caller: AccountId, uri: impl Into<String>) -> Result<()> {
        self.set_metadata(caller, MetadataField::ContractUri, uri.into())
    }

    pub fn set_base_token_uri(&mut self, caller: AccountId, uri: impl Into<String>) -> Result<()> {
        self.set_metadata(caller, MetadataField::BaseTokenUri, uri.into())
    }

    pub fn set_pending_token_uri(
        &mut self,
        caller: AccountId,
        uri: impl Into<String>,
    ) -> Result<()> {
        self.set_metadata(caller, MetadataField::PendingTokenUri, uri.into())
    }

    fn set_metadata(&mut self, caller: AccountId, field: MetadataField, value: String) -> Result<()> {
        self.authority
            .require(caller, Role::Administrator)
            .inspect_err(|err| log_rejection("set_metadata", caller, err))?;
        metadata::update(&mut self.metadata, field, value.clone());
        tracing::info!(field = %field, value = %value, "Metadata updated");
        self.journal
            .append(SaleEvent::MetadataUpdated { field, value });
        Ok(())
    }

    /// Metadata URI for `id`: the pending URI until reveal or while unminted.
    #[must_use]
    pub fn token_uri(&self, id: TokenId) -> String {
        metadata::token_uri(&self.metadata, self.phase, id, self.registry.is_minted(id))
    }

    // -----------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------

    #[must_use]
    pub fn phase(&self) -> SalePhase {
        self.phase
    }

    /// Tokens minted through every channel.
    #[must_use]
    pub fn total_supply(&self) -> u64 {
        self.counters.total_minted
    }

    /// Tokens minted through the reservation channel.
    #[must_use]
    pub fn reserved_supply(&self) -> u64 {
        self.counters.reserved_minted
    }

    #[must_use]
    pub fn counters(&self) -> SupplyCounters {
        self.counters
    }

    #[must_use]
    pub fn caps(&self) -> SupplyCaps {
        self.caps
    }

    #[must_use]
    pub fn max_supply(&self) -> u64 {
        self.caps.max_supply
    }

    #[must_use]
    pub fn pre_sale_supply(&self) -> u64 {
        self.caps.pre_sale_supply
    }

    #[must_use]
    pub fn max_reserved_supply(&self) -> u64 {
        self.caps.max_reserved_supply
    }

    #[must_use]
    pub fn remaining_supply(&self) -> u64 {
        self.counters.remaining(&self.caps)
    }

    #[must_use]
    pub fn sale_price(&self) -> Decimal {
        self.prices.sale_price
    }

    #[must_use]
    pub fn pre_sale_price(&self) -> Decimal {
        self.prices.pre_sale_price
    }

    /// Unit price for a public mint right now, if minting is open.
    #[must_use]
    pub fn current_price(&self) -> Option<Decimal> {
        self.prices.unit_price(self.phase)
    }

    #[must_use]
    pub fn max_mintable_tokens(&self) -> u32 {
        self.limits.max_mintable_tokens
    }

    #[must_use]
    pub fn owner(&self) -> Option<AccountId> {
        self.authority.owner()
    }

    #[must_use]
    pub fn factory(&self) -> Option<AccountId> {
        self.authority.factory()
    }

    #[must_use]
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    #[must_use]
    pub fn contract_uri(&self) -> &str {
        &self.metadata.contract_uri
    }

    #[must_use]
    pub fn base_token_uri(&self) -> &str {
        &self.metadata.base_token_uri
    }

    #[must_use]
    pub fn pending_token_uri(&self) -> &str {
        &self.metadata.pending_token_uri
    }

    #[must_use]
    pub fn funds_balance(&self) -> Decimal {
        self.ledger.balance()
    }

    #[must_use]
    pub fn owner_of(&self, id: TokenId) -> Option<AccountId> {
        self.registry.owner_of(id)
    }

    #[must_use]
    pub fn balance_of(&self, account: AccountId) -> u64 {
        self.registry.balance_of(account)
    }

    #[must_use]
    pub fn registry(&self) -> &R {
        &self.registry
    }

    #[must_use]
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    #[must_use]
    pub fn snapshot(&self) -> SaleSnapshot {
        SaleSnapshot {
            phase: self.phase,
            counters: self.counters,
            caps: self.caps,
            prices: self.prices,
            limits: self.limits,
            roles: self.authority.roles(),
            metadata: self.metadata.clone(),
            current_price: self.current_price(),
            remaining_supply: self.remaining_supply(),
            funds_balance: self.ledger.balance(),
            journal_head: self.journal.head_hex(),
        }
    }

    // -----------------------------------------------------------------
    // Journal & audit
    // -----------------------------------------------------------------

    #[must_use]
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Retained journal records, oldest first.
    #[must_use]
    pub fn events(&self) -> &[EventRecord] {
        self.journal.records()
    }

    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        self.journal.drain()
    }

    /// Check supply and funds conservation against both collaborators.
    ///
    /// # Errors
    /// `SupplyInvariantViolation` naming the first mismatch.
    pub fn audit(&self) -> Result<()> {
        self.audit
            .verify(&self.counters, &self.registry, &self.ledger)
            .inspect_err(|err| {
                tracing::warn!(code = err.code(), error = %err, "Supply audit failed");
            })
    }
}

fn log_rejection(op: &'static str, caller: AccountId, err: &SaleError) {
    tracing::debug!(op, caller = %caller, code = err.code(), error = %err, "Operation rejected");
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        engine: SaleEngine,
        owner: AccountId,
        factory: AccountId,
        user: AccountId,
    }

    fn fixture() -> Fixture {
        let owner = AccountId::new();
        let factory = AccountId::new();
        Fixture {
            engine: SaleEngine::new(SaleConfig::dummy(owner, Some(factory))),
            owner,
            factory,
            user: AccountId::new(),
        }
    }

    fn cents(n: i64) -> Decimal {
        Decimal::new(n, 2)
    }

    #[test]
    fn starts_pending_and_empty() {
        let f = fixture();
        assert_eq!(f.engine.phase(), SalePhase::Pending);
        assert_eq!(f.engine.total_supply(), 0);
        assert_eq!(f.engine.remaining_supply(), 100);
        assert_eq!(f.engine.current_price(), None);
        assert!(f.engine.events().is_empty());
    }

    #[test]
    fn presale_mint_and_underpayment() {
        let mut f = fixture();
        f.engine.set_phase(f.owner, SalePhase::PreSaleOpen).unwrap();

        let receipt = f.engine.mint_public(f.user, 5, cents(20)).unwrap();
        assert_eq!(receipt.first_id, TokenId(1));
        assert_eq!(receipt.count, 5);
        assert_eq!(f.engine.total_supply(), 5);

        let err = f.engine.mint_public(f.user, 5, cents(4)).unwrap_err();
        assert!(matches!(err, SaleError::InsufficientPayment { .. }));
        assert_eq!(f.engine.total_supply(), 5);
    }

    #[test]
    fn open_quantity_limit() {
        let mut f = fixture();
        f.engine.set_phase(f.owner, SalePhase::Open).unwrap();
        let err = f.engine.mint_public(f.user, 21, cents(126)).unwrap_err();
        assert_eq!(
            err,
            SaleError::QuantityLimitExceeded {
                requested: 21,
                limit: 20
            }
        );
        assert!(f.engine.mint_public(f.user, 20, cents(120)).is_ok());
    }

    #[test]
    fn zero_quantity_rejected() {
        let mut f = fixture();
        f.engine.set_phase(f.owner, SalePhase::Open).unwrap();
        assert!(matches!(
            f.engine.mint_public(f.user, 0, Decimal::ZERO).unwrap_err(),
            SaleError::InvalidQuantity { .. }
        ));
        assert!(matches!(
            f.engine.mint_from_owner(f.owner, 0).unwrap_err(),
            SaleError::InvalidQuantity { .. }
        ));
    }

    #[test]
    fn negative_payment_rejected() {
        let mut f = fixture();
        f.engine.set_phase(f.owner, SalePhase::Open).unwrap();
        assert!(matches!(
            f.engine.mint_public(f.user, 1, cents(-6)).unwrap_err(),
            SaleError::InvalidAmount { .. }
        ));
    }

    #[test]
    fn overpayment_is_kept() {
        let mut f = fixture();
        f.engine.set_phase(f.owner, SalePhase::Open).unwrap();
        let receipt = f.engine.mint_public(f.user, 1, Decimal::ONE).unwrap();
        assert_eq!(receipt.paid, Decimal::ONE);
        assert_eq!(f.engine.funds_balance(), Decimal::ONE);
    }

    #[test]
    fn closed_phases_reject_public_mint() {
        let mut f = fixture();
        for (phase, reason) in [
            (SalePhase::Pending, NotOpenReason::NotOpenYet),
            (SalePhase::Paused, NotOpenReason::Paused),
            (SalePhase::Closed, NotOpenReason::Closed),
        ] {
            f.engine.set_phase(f.owner, phase).unwrap();
            assert_eq!(
                f.engine.mint_public(f.user, 1, cents(6)).unwrap_err(),
                SaleError::SaleNotOpen { reason }
            );
        }
    }

    #[test]
    fn presale_cap_enforced_then_auto_opens() {
        let mut f = fixture();
        f.engine.set_phase(f.owner, SalePhase::PreSaleOpen).unwrap();
        f.engine.mint_public(f.user, 20, cents(80)).unwrap();
        f.engine.mint_public(f.user, 18, cents(72)).unwrap();
        assert!(matches!(
            f.engine.mint_public(f.user, 3, cents(12)).unwrap_err(),
            SaleError::PreSaleSupplyExceeded {
                minted: 38,
                requested: 3,
                cap: 40
            }
        ));
        let receipt = f.engine.mint_public(f.user, 2, cents(8)).unwrap();
        assert_eq!(receipt.phase_after, SalePhase::Open);
        assert_eq!(f.engine.phase(), SalePhase::Open);
        assert_eq!(f.engine.current_price(), Some(cents(6)));
    }

    #[test]
    fn max_supply_closes_sale() {
        let mut f = fixture();
        f.engine.mint_from_owner(f.owner, 90).unwrap();
        f.engine.set_phase(f.owner, SalePhase::Open).unwrap();
        assert!(matches!(
            f.engine.mint_public(f.user, 11, cents(66)).unwrap_err(),
            SaleError::MaxSupplyExceeded { .. }
        ));
        let receipt = f.engine.mint_public(f.user, 10, cents(60)).unwrap();
        assert_eq!(receipt.phase_after, SalePhase::Closed);
        assert_eq!(
            f.engine.mint_public(f.user, 1, cents(6)).unwrap_err(),
            SaleError::SaleNotOpen {
                reason: NotOpenReason::Closed
            }
        );
    }

    #[test]
    fn owner_mint_ignores_phase_but_not_max() {
        let mut f = fixture();
        assert_eq!(f.engine.phase(), SalePhase::Pending);
        let receipt = f.engine.mint_from_owner(f.owner, 100).unwrap();
        assert_eq!(receipt.recipient, f.owner);
        assert_eq!(f.engine.phase(), SalePhase::Pending);
        assert!(matches!(
            f.engine.mint_from_owner(f.owner, 1).unwrap_err(),
            SaleError::MaxSupplyExceeded { .. }
        ));
    }

    #[test]
    fn reserve_once() {
        let mut f = fixture();
        let receipt = f.engine.reserve_tokens(f.owner).unwrap();
        assert_eq!(receipt.count, 10);
        assert_eq!(receipt.recipient, f.owner);
        assert_eq!(f.engine.reserved_supply(), 10);
        assert_eq!(f.engine.total_supply(), 10);
        assert_eq!(
            f.engine.reserve_tokens(f.owner).unwrap_err(),
            SaleError::ReserveExhausted
        );
    }

    #[test]
    fn reserve_blocked_by_max_supply() {
        let mut f = fixture();
        f.engine.mint_from_owner(f.owner, 95).unwrap();
        assert!(matches!(
            f.engine.reserve_tokens(f.owner).unwrap_err(),
            SaleError::MaxSupplyExceeded { requested: 10, .. }
        ));
        assert_eq!(f.engine.reserved_supply(), 0);
    }

    #[test]
    fn factory_needs_open_phase() {
        let mut f = fixture();
        f.engine.set_phase(f.owner, SalePhase::PreSaleOpen).unwrap();
        assert_eq!(
            f.engine.mint_from_factory(f.factory, f.user).unwrap_err(),
            SaleError::SaleNotOpen {
                reason: NotOpenReason::PublicSaleRequired
            }
        );
        f.engine.set_phase(f.owner, SalePhase::Open).unwrap();
        let receipt = f.engine.mint_from_factory(f.factory, f.user).unwrap();
        assert_eq!(receipt.recipient, f.user);
        assert_eq!(receipt.count, 1);
        assert_eq!(receipt.paid, Decimal::ZERO);
        assert_eq!(f.engine.owner_of(TokenId(1)), Some(f.user));
    }

    #[test]
    fn factory_role_is_not_owner_role() {
        let mut f = fixture();
        f.engine.set_phase(f.owner, SalePhase::Open).unwrap();
        assert_eq!(
            f.engine.mint_from_factory(f.owner, f.user).unwrap_err(),
            SaleError::NotAuthorized {
                required: Role::Factory
            }
        );
        assert_eq!(
            f.engine.set_phase(f.factory, SalePhase::Closed).unwrap_err(),
            SaleError::NotAuthorized {
                required: Role::Administrator
            }
        );
    }

    #[test]
    fn no_factory_configured() {
        let owner = AccountId::new();
        let mut engine = SaleEngine::new(SaleConfig::dummy(owner, None));
        engine.set_phase(owner, SalePhase::Open).unwrap();
        assert!(matches!(
            engine.mint_from_factory(AccountId::new(), owner).unwrap_err(),
            SaleError::NotAuthorized { .. }
        ));
    }

    #[test]
    fn set_phase_code_checks_auth_first() {
        let mut f = fixture();
        assert_eq!(
            f.engine.set_phase_code(f.user, 10).unwrap_err(),
            SaleError::NotAuthorized {
                required: Role::Administrator
            }
        );
        assert_eq!(
            f.engine.set_phase_code(f.owner, 10).unwrap_err(),
            SaleError::InvalidPhase { code: 10 }
        );
        assert_eq!(
            f.engine.set_phase_code(f.owner, -1).unwrap_err(),
            SaleError::InvalidPhase { code: -1 }
        );
        f.engine.set_phase_code(f.owner, 3).unwrap();
        assert_eq!(f.engine.phase(), SalePhase::Paused);
    }

    #[test]
    fn set_phase_never_auto_transitions() {
        let mut f = fixture();
        f.engine.mint_from_owner(f.owner, 100).unwrap();
        f.engine.set_phase(f.owner, SalePhase::Open).unwrap();
        assert_eq!(f.engine.phase(), SalePhase::Open);
    }

    #[test]
    fn withdraw_moves_balance_once() {
        let mut f = fixture();
        f.engine.set_phase(f.owner, SalePhase::Open).unwrap();
        f.engine.mint_public(f.user, 10, cents(60)).unwrap();

        assert!(f.engine.withdraw(f.user).is_err());
        let first = f.engine.withdraw(f.owner).unwrap();
        assert_eq!(first.amount, cents(60));
        assert_eq!(f.engine.funds_balance(), Decimal::ZERO);
        let second = f.engine.withdraw(f.owner).unwrap();
        assert_eq!(second.amount, Decimal::ZERO);
        assert_eq!(f.engine.ledger().withdrawn_to(f.owner), cents(60));
    }

    #[test]
    fn token_uri_reveal() {
        let mut f = fixture();
        f.engine.mint_from_owner(f.owner, 3).unwrap();
        assert_eq!(f.engine.token_uri(TokenId(2)), "ipfs://test/pendingToken.json");
        f.engine.set_phase(f.owner, SalePhase::Open).unwrap();
        assert_eq!(f.engine.token_uri(TokenId(2)), "ipfs://test/2.json");
        assert_eq!(f.engine.token_uri(TokenId(4)), "ipfs://test/pendingToken.json");
    }

    #[test]
    fn metadata_setters_are_admin_only() {
        let mut f = fixture();
        assert!(f.engine.set_base_token_uri(f.user, "ipfs://evil").is_err());
        assert!(f.engine.set_contract_uri(f.factory, "ipfs://evil").is_err());
        assert_eq!(f.engine.base_token_uri(), "ipfs://test");

        f.engine.set_base_token_uri(f.owner, "ipfs://revealed").unwrap();
        f.engine.set_pending_token_uri(f.owner, "ipfs://wait").unwrap();
        f.engine.set_contract_uri(f.owner, "ipfs://c").unwrap();
        assert_eq!(f.engine.base_token_uri(), "ipfs://revealed");
        assert_eq!(f.engine.pending_token_uri(), "ipfs://wait");
        assert_eq!(f.engine.contract_uri(), "ipfs://c");
        assert_eq!(f.engine.events().len(), 3);
    }

    #[test]
    fn failed_operations_leave_no_trace() {
        let mut f = fixture();
        f.engine.set_phase(f.owner, SalePhase::Open).unwrap();
        let before = f.engine.snapshot();
        let events_before = f.engine.events().len();

        let _ = f.engine.mint_public(f.user, 21, Decimal::new(100, 0));
        let _ = f.engine.mint_public(f.user, 1, Decimal::ZERO);
        let _ = f.engine.mint_from_factory(f.user, f.user);
        let _ = f.engine.reserve_tokens(f.user);
        let _ = f.engine.withdraw(f.factory);
        let _ = f.engine.set_phase_code(f.owner, 7);

        assert_eq!(f.engine.snapshot(), before);
        assert_eq!(f.engine.events().len(), events_before);
        assert_eq!(f.engine.registry().minted_count(), 0);
    }

    #[test]
    fn renounced_owner_locks_admin_operations() {
        let mut cfg = SaleConfig::dummy(AccountId::new(), None);
        cfg.roles.owner = None;
        let mut engine = SaleEngine::new(cfg);
        let anyone = AccountId::new();
        assert!(engine.set_phase(anyone, SalePhase::Open).is_err());
        assert!(engine.reserve_tokens(anyone).is_err());
        assert!(engine.withdraw(anyone).is_err());
        assert_eq!(engine.owner(), None);
    }

    #[test]
    fn journal_records_transitions_in_order() {
        let mut f = fixture();
        f.engine.set_phase(f.owner, SalePhase::PreSaleOpen).unwrap();
        f.engine.mint_from_owner(f.owner, 40).unwrap();

        let kinds: Vec<_> = f.engine.events().iter().map(|r| r.event.clone()).collect();
        assert!(matches!(
            kinds.as_slice(),
            [
                SaleEvent::PhaseChanged {
                    cause: TransitionCause::Administrator,
                    ..
                },
                SaleEvent::TokensMinted {
                    channel: MintChannel::Owner,
                    count: 40,
                    ..
                },
                SaleEvent::PhaseChanged {
                    from: SalePhase::PreSaleOpen,
                    to: SalePhase::Open,
                    cause: TransitionCause::PreSaleExhausted,
                },
            ]
        ));
        assert!(f.engine.journal().verify_chain());
    }

    #[test]
    fn audit_passes_after_mixed_activity() {
        let mut f = fixture();
        f.engine.reserve_tokens(f.owner).unwrap();
        f.engine.set_phase(f.owner, SalePhase::Open).unwrap();
        f.engine.mint_public(f.user, 4, cents(24)).unwrap();
        f.engine.mint_from_factory(f.factory, f.user).unwrap();
        f.engine.withdraw(f.owner).unwrap();
        f.engine.mint_public(f.user, 1, cents(6)).unwrap();
        assert!(f.engine.audit().is_ok());
        assert_eq!(f.engine.balance_of(f.user), 6);
        assert_eq!(f.engine.balance_of(f.owner), 10);
    }

    #[test]
    fn prepopulated_registry_rejected() {
        let mut registry = InMemoryRegistry::new();
        registry.assign_sequential_ids(AccountId::new(), 1).unwrap();
        let res = SaleEngine::with_collaborators(
            SaleConfig::dummy(AccountId::new(), None),
            registry,
            InMemoryLedger::new(),
        );
        assert!(matches!(res, Err(SaleError::Configuration(_))));
    }

    #[test]
    fn snapshot_json_roundtrip() {
        let mut f = fixture();
        f.engine.set_phase(f.owner, SalePhase::PreSaleOpen).unwrap();
        let snap = f.engine.snapshot();
        assert_eq!(snap.current_price, Some(cents(4)));
        let back = SaleSnapshot::from_json(&snap.to_json().unwrap()).unwrap();
        assert_eq!(back, snap);
    }
}
