//! Configuration types for a sale.
//!
//! A [`SaleConfig`] is supplied once at construction. The engine trusts it
//! as given; [`SaleConfig::validate`] is an opt-in check for the
//! caller-enforced invariants.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{constants, AccountId, PriceSchedule, Result, SaleError, SalePhase, SupplyCaps};

/// Roles recognised by the engine's authorization checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The collection owner: phase changes, metadata, reserve, withdraw.
    Administrator,
    /// The companion distribution contract allowed to mint single units.
    Factory,
}

impl Role {
    /// User-facing denial text for a caller lacking this role.
    #[must_use]
    pub fn denial(self) -> &'static str {
        match self {
            Self::Administrator => "Ownable: caller is not the owner",
            Self::Factory => "Only factory contract can call",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Administrator => write!(f, "ADMINISTRATOR"),
            Self::Factory => write!(f, "FACTORY"),
        }
    }
}

/// Identities holding each role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRoles {
    /// Administrator. `None` means ownership was renounced: every
    /// administrator-only operation is denied.
    pub owner: Option<AccountId>,
    /// Factory identity, if factory minting is enabled.
    pub factory: Option<AccountId>,
}

/// Which phases accept factory mints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FactoryMintPolicy {
    /// Only `Open`.
    #[default]
    OpenOnly,
    /// `PreSaleOpen` or `Open`.
    PreSaleOrOpen,
}

impl FactoryMintPolicy {
    #[must_use]
    pub fn allows(self, phase: SalePhase) -> bool {
        match self {
            Self::OpenOnly => phase == SalePhase::Open,
            Self::PreSaleOrOpen => phase.is_open(),
        }
    }
}

/// Per-call limits and variant switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLimits {
    /// Maximum tokens per public mint call.
    pub max_mintable_tokens: u32,
    /// Phases that accept factory mints.
    #[serde(default)]
    pub factory_policy: FactoryMintPolicy,
}

impl Default for SaleLimits {
    fn default() -> Self {
        Self {
            max_mintable_tokens: constants::DEFAULT_MAX_MINTABLE_TOKENS,
            factory_policy: FactoryMintPolicy::default(),
        }
    }
}

/// Opaque metadata strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleMetadata {
    pub name: String,
    pub symbol: String,
    pub contract_uri: String,
    pub base_token_uri: String,
    pub pending_token_uri: String,
}

/// Everything needed to construct a sale engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleConfig {
    pub caps: SupplyCaps,
    pub prices: PriceSchedule,
    #[serde(default)]
    pub limits: SaleLimits,
    pub roles: SaleRoles,
    pub metadata: SaleMetadata,
}

impl SaleConfig {
    /// Parse a config from JSON. Amounts are decimal strings.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the caller-enforced invariants.
    ///
    /// The engine never calls this; deployments that want the guarantees
    /// call it before constructing an engine.
    ///
    /// # Errors
    /// Returns [`SaleError::Configuration`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        let caps = &self.caps;
        if caps.max_supply == 0 {
            return Err(SaleError::Configuration(
                "max_supply must be positive".to_string(),
            ));
        }
        let carved = caps
            .pre_sale_supply
            .checked_add(caps.max_reserved_supply)
            .ok_or_else(|| SaleError::Configuration("supply caps overflow".to_string()))?;
        if carved > caps.max_supply {
            return Err(SaleError::Configuration(format!(
                "pre_sale_supply ({}) + max_reserved_supply ({}) exceeds max_supply ({})",
                caps.pre_sale_supply, caps.max_reserved_supply, caps.max_supply
            )));
        }
        if self.prices.sale_price.is_sign_negative() || self.prices.pre_sale_price.is_sign_negative()
        {
            return Err(SaleError::Configuration(
                "prices must be non-negative".to_string(),
            ));
        }
        if self.limits.max_mintable_tokens == 0 {
            return Err(SaleError::Configuration(
                "max_mintable_tokens must be positive".to_string(),
            ));
        }
        if self.roles.owner.is_none() {
            return Err(SaleError::Configuration(
                "an owner is required at construction".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the pre-sale price exceeds the sale price (allowed, but unusual).
    #[must_use]
    pub fn has_inverted_prices(&self) -> bool {
        self.prices.pre_sale_price > self.prices.sale_price
    }

    /// The Octodoodles deployment: 5000 supply, no pre-sale, no reserve,
    /// 0.02 flat price, no factory.
    #[must_use]
    pub fn octodoodles(owner: AccountId) -> Self {
        Self {
            caps: SupplyCaps {
                max_supply: 5000,
                pre_sale_supply: 0,
                max_reserved_supply: 0,
            },
            prices: PriceSchedule::new(Decimal::new(2, 2), Decimal::new(2, 2)),
            limits: SaleLimits {
                max_mintable_tokens: 30,
                factory_policy: FactoryMintPolicy::OpenOnly,
            },
            roles: SaleRoles {
                owner: Some(owner),
                factory: None,
            },
            metadata: SaleMetadata {
                name: "Octodoodles".to_string(),
                symbol: "OCD".to_string(),
                contract_uri: "ipfs://QmV265QT1CwVg4dCctsY2Ue9hGRRvgGmyKYh6GXURC1coH".to_string(),
                base_token_uri: "ipfs://QmQ9TS96a5Muszy6d8L4AQqMBEYwYf4N2EPCUaiBRTmzti"
                    .to_string(),
                pending_token_uri: "ipfs://QmXsg116NWjuMDUdHXRDN9fj5Vvf1BN8GY6LrQXy9BB9d6"
                    .to_string(),
            },
        }
    }

    /// The Cryptopi deployment: 100 supply, 20 pre-sale, 10 reserved,
    /// 0.006 / 0.004 prices, factory minting in `Open` only.
    #[must_use]
    pub fn cryptopi(owner: AccountId, factory: AccountId) -> Self {
        Self {
            caps: SupplyCaps {
                max_supply: 100,
                pre_sale_supply: 20,
                max_reserved_supply: 10,
            },
            prices: PriceSchedule::new(Decimal::new(6, 3), Decimal::new(4, 3)),
            limits: SaleLimits::default(),
            roles: SaleRoles {
                owner: Some(owner),
                factory: Some(factory),
            },
            metadata: SaleMetadata {
                name: "Cryptopi".to_string(),
                symbol: "CPI".to_string(),
                contract_uri:
                    "ipfs://bafkreibwo4u7lvm32tvtkrcmdbhu6y2hd5ax6odnt5ex2kkziqei5behvq"
                        .to_string(),
                base_token_uri:
                    "ipfs://bafybeiaorrufpzqgglxdhkl7riib3xwep2k4bj36ybscg3r5lktbspfi4a"
                        .to_string(),
                pending_token_uri:
                    "ipfs://bafkreifrk3mfehkus7hkgcsw252oqqkmgun34qtm74zvjldlz5i5k7b4xa"
                        .to_string(),
            },
        }
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl SaleConfig {
    /// Test collection: 100 max, 40 pre-sale, 10 reserved, 0.06 / 0.04,
    /// 20 per transaction, URIs under `ipfs://test`.
    #[must_use]
    pub fn dummy(owner: AccountId, factory: Option<AccountId>) -> Self {
        Self {
            caps: SupplyCaps {
                max_supply: 100,
                pre_sale_supply: 40,
                max_reserved_supply: 10,
            },
            prices: PriceSchedule::new(Decimal::new(6, 2), Decimal::new(4, 2)),
            limits: SaleLimits::default(),
            roles: SaleRoles {
                owner: Some(owner),
                factory,
            },
            metadata: SaleMetadata {
                name: "Testdoodles".to_string(),
                symbol: "TST".to_string(),
                contract_uri: "ipfs://test/contract.json".to_string(),
                base_token_uri: "ipfs://test".to_string(),
                pending_token_uri: "ipfs://test/pendingToken.json".to_string(),
            },
        }
    }
}
