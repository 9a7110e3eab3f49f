//! Events produced by successful sale operations.
//!
//! Every committed mutation appends one or more [`SaleEvent`]s to the
//! engine's journal. Rejected operations produce nothing.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, SalePhase, TokenId};

/// How a batch of tokens entered circulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MintChannel {
    /// Paid mint by any caller during pre-sale or public sale.
    Public,
    /// Single-unit mint by the factory identity.
    Factory,
    /// Administrator mint of an arbitrary quantity.
    Owner,
    /// Administrator mint of the remaining reserved allocation.
    Reserve,
}

impl fmt::Display for MintChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "PUBLIC"),
            Self::Factory => write!(f, "FACTORY"),
            Self::Owner => write!(f, "OWNER"),
            Self::Reserve => write!(f, "RESERVE"),
        }
    }
}

/// What moved the sale into a new phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionCause {
    /// Explicit administrator set.
    Administrator,
    /// Pre-sale supply reached while in `PreSaleOpen`.
    PreSaleExhausted,
    /// Max supply reached while open.
    SupplyExhausted,
}

/// Which metadata string was changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataField {
    ContractUri,
    BaseTokenUri,
    PendingTokenUri,
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContractUri => write!(f, "contract_uri"),
            Self::BaseTokenUri => write!(f, "base_token_uri"),
            Self::PendingTokenUri => write!(f, "pending_token_uri"),
        }
    }
}

/// A single committed state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleEvent {
    PhaseChanged {
        from: SalePhase,
        to: SalePhase,
        cause: TransitionCause,
    },
    TokensMinted {
        channel: MintChannel,
        recipient: AccountId,
        first_id: TokenId,
        count: u32,
        paid: Decimal,
    },
    FundsWithdrawn {
        recipient: AccountId,
        amount: Decimal,
    },
    MetadataUpdated {
        field: MetadataField,
        value: String,
    },
}

impl SaleEvent {
    /// Short tag for log lines.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PhaseChanged { .. } => "PHASE_CHANGED",
            Self::TokensMinted { .. } => "TOKENS_MINTED",
            Self::FundsWithdrawn { .. } => "FUNDS_WITHDRAWN",
            Self::MetadataUpdated { .. } => "METADATA_UPDATED",
        }
    }
}
