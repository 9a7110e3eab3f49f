//! Sale phase state machine types.
//!
//! ```text
//!                 administrator: any → any (explicit set)
//!
//!   ┌─────────┐   ┌─────────────┐  pre-sale   ┌──────┐  max supply  ┌────────┐
//!   │ PENDING │   │ PRESALEOPEN ├────────────▶│ OPEN ├─────────────▶│ CLOSED │
//!   └─────────┘   └──────┬──────┘  exhausted  └──────┘   reached    └────────┘
//!                        │            max supply reached                 ▲
//!                        └───────────────────────────────────────────────┘
//!   ┌────────┐
//!   │ PAUSED │
//!   └────────┘
//! ```
//!
//! Automatic transitions only move forward and only fire after a
//! successful mint. The administrator may set any phase at any time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Result, SaleError};

/// The five phases of a sale. Wire codes are `0..=4` in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SalePhase {
    /// Sale has not started; token URIs resolve to the pending URI.
    Pending,
    /// Discounted minting, limited to the pre-sale supply.
    PreSaleOpen,
    /// Full-price public minting up to the max supply.
    Open,
    /// Temporarily halted by the administrator.
    Paused,
    /// Sold out or ended by the administrator.
    Closed,
}

impl SalePhase {
    /// Every phase, in code order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::PreSaleOpen,
        Self::Open,
        Self::Paused,
        Self::Closed,
    ];

    /// Numeric encoding of the phase.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::PreSaleOpen => 1,
            Self::Open => 2,
            Self::Paused => 3,
            Self::Closed => 4,
        }
    }

    /// Decode a raw phase value.
    ///
    /// Negative and out-of-range values are rejected, never coerced.
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(Self::Pending),
            1 => Ok(Self::PreSaleOpen),
            2 => Ok(Self::Open),
            3 => Ok(Self::Paused),
            4 => Ok(Self::Closed),
            _ => Err(SaleError::InvalidPhase { code }),
        }
    }

    /// Whether public minting is accepted in this phase.
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, Self::PreSaleOpen | Self::Open)
    }

    /// Why public minting is rejected in this phase, or `None` if it is open.
    #[must_use]
    pub fn not_open_reason(self) -> Option<NotOpenReason> {
        match self {
            Self::Pending => Some(NotOpenReason::NotOpenYet),
            Self::Paused => Some(NotOpenReason::Paused),
            Self::Closed => Some(NotOpenReason::Closed),
            Self::PreSaleOpen | Self::Open => None,
        }
    }
}

impl TryFrom<i64> for SalePhase {
    type Error = SaleError;

    fn try_from(code: i64) -> Result<Self> {
        Self::from_code(code)
    }
}

impl From<SalePhase> for u8 {
    fn from(phase: SalePhase) -> Self {
        phase.code()
    }
}

impl fmt::Display for SalePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::PreSaleOpen => write!(f, "PRESALE_OPEN"),
            Self::Open => write!(f, "OPEN"),
            Self::Paused => write!(f, "PAUSED"),
            Self::Closed => write!(f, "CLOSED"),
        }
    }
}

/// Sub-reason attached to a `SaleNotOpen` rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotOpenReason {
    /// Phase is `Pending`.
    NotOpenYet,
    /// Phase is `Paused`.
    Paused,
    /// Phase is `Closed`.
    Closed,
    /// The operation needs a phase the current one is not in
    /// (factory minting during pre-sale, for instance).
    PublicSaleRequired,
}

impl fmt::Display for NotOpenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotOpenYet => write!(f, "Sale not open yet."),
            Self::Paused => write!(f, "Sale is paused."),
            Self::Closed => write!(f, "Sale is closed."),
            Self::PublicSaleRequired => write!(f, "Sale is not open"),
        }
    }
}
