//! Error types for the mintsale engine.
//!
//! All errors use the `SALE_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Authorization errors
//! - 2xx: Phase errors
//! - 3xx: Quantity errors
//! - 4xx: Payment errors
//! - 5xx: Supply errors
//! - 6xx: Collaborator errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{NotOpenReason, Role, TokenId};

/// Central error enum for all sale operations.
///
/// Every variant is raised before any state is touched; a failed operation
/// leaves the engine exactly as it found it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaleError {
    // =================================================================
    // Authorization Errors (1xx)
    // =================================================================
    /// The caller does not hold the role the operation requires.
    #[error("SALE_ERR_100: Not authorized: {}", .required.denial())]
    NotAuthorized { required: Role },

    // =================================================================
    // Phase Errors (2xx)
    // =================================================================
    /// A raw phase encoding was negative or out of range.
    #[error("SALE_ERR_200: Invalid phase code: {code}")]
    InvalidPhase { code: i64 },

    /// The current phase does not allow the operation.
    #[error("SALE_ERR_201: {reason}")]
    SaleNotOpen { reason: NotOpenReason },

    // =================================================================
    // Quantity Errors (3xx)
    // =================================================================
    /// Zero, negative, or otherwise malformed quantity.
    #[error("SALE_ERR_300: Invalid quantity: {reason}")]
    InvalidQuantity { reason: String },

    /// More tokens requested than a single public mint allows.
    #[error("SALE_ERR_301: Cannot purchase more than {limit} tokens (requested {requested})")]
    QuantityLimitExceeded { requested: u32, limit: u32 },

    // =================================================================
    // Payment Errors (4xx)
    // =================================================================
    /// The tendered amount is malformed (negative).
    #[error("SALE_ERR_400: Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// The tendered amount is below quantity × unit price.
    #[error("SALE_ERR_401: Insufficient payment: need {required}, got {tendered}")]
    InsufficientPayment { required: Decimal, tendered: Decimal },

    // =================================================================
    // Supply Errors (5xx)
    // =================================================================
    /// The mint would push the total past the pre-sale supply.
    #[error("SALE_ERR_500: Quantity requested will exceed the pre-sale supply ({minted} + {requested} > {cap})")]
    PreSaleSupplyExceeded { minted: u64, requested: u64, cap: u64 },

    /// The mint would push the total past the max supply.
    #[error("SALE_ERR_501: Quantity requested will exceed the max supply ({minted} + {requested} > {cap})")]
    MaxSupplyExceeded { minted: u64, requested: u64, cap: u64 },

    /// The reserved allocation has already been minted in full.
    #[error("SALE_ERR_502: Max reserve tokens reached")]
    ReserveExhausted,

    /// A supply or funds conservation check failed. Critical.
    #[error("SALE_ERR_503: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    /// Price or counter arithmetic overflowed.
    #[error("SALE_ERR_504: Arithmetic overflow in {context}")]
    ArithmeticOverflow { context: &'static str },

    // =================================================================
    // Collaborator Errors (6xx)
    // =================================================================
    /// The ownership registry handed out an id the engine did not expect.
    #[error("SALE_ERR_600: Ownership registry out of sync: expected first id {expected}, got {actual}")]
    RegistryOutOfSync { expected: TokenId, actual: TokenId },

    /// The ownership registry rejected the assignment.
    #[error("SALE_ERR_601: Ownership registry rejected assignment: {reason}")]
    RegistryRejected { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error (poisoned lock, etc.).
    #[error("SALE_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("SALE_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (caller-enforced invariant broken, bad JSON, etc.).
    #[error("SALE_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

impl SaleError {
    /// The `SALE_ERR_nnn` code of this error, for structured logging.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAuthorized { .. } => "SALE_ERR_100",
            Self::InvalidPhase { .. } => "SALE_ERR_200",
            Self::SaleNotOpen { .. } => "SALE_ERR_201",
            Self::InvalidQuantity { .. } => "SALE_ERR_300",
            Self::QuantityLimitExceeded { .. } => "SALE_ERR_301",
            Self::InvalidAmount { .. } => "SALE_ERR_400",
            Self::InsufficientPayment { .. } => "SALE_ERR_401",
            Self::PreSaleSupplyExceeded { .. } => "SALE_ERR_500",
            Self::MaxSupplyExceeded { .. } => "SALE_ERR_501",
            Self::ReserveExhausted => "SALE_ERR_502",
            Self::SupplyInvariantViolation { .. } => "SALE_ERR_503",
            Self::ArithmeticOverflow { .. } => "SALE_ERR_504",
            Self::RegistryOutOfSync { .. } => "SALE_ERR_600",
            Self::RegistryRejected { .. } => "SALE_ERR_601",
            Self::Internal(_) => "SALE_ERR_900",
            Self::Serialization(_) => "SALE_ERR_901",
            Self::Configuration(_) => "SALE_ERR_902",
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SaleError>;

impl From<serde_json::Error> for SaleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
