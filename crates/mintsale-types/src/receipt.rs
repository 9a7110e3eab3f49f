//! Results returned by successful mint and withdraw operations.

use std::ops::RangeInclusive;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, MintChannel, SalePhase, TokenId};

/// Proof of a committed mint: which ids went to whom, and the phase after
/// automatic transitions were applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintReceipt {
    pub channel: MintChannel,
    pub recipient: AccountId,
    /// First id of the contiguous range.
    pub first_id: TokenId,
    /// Number of ids in the range (always ≥ 1).
    pub count: u32,
    /// Amount credited to the funds ledger (zero for unpaid channels).
    pub paid: Decimal,
    /// Phase once the post-mint transition check ran.
    pub phase_after: SalePhase,
}

impl MintReceipt {
    /// Last id of the range.
    #[must_use]
    pub fn last_id(&self) -> TokenId {
        TokenId(self.first_id.0 + u64::from(self.count) - 1)
    }

    /// The minted ids, inclusive.
    #[must_use]
    pub fn ids(&self) -> RangeInclusive<u64> {
        self.first_id.0..=self.last_id().0
    }
}

/// A completed withdrawal. `amount` may be zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub recipient: AccountId,
    pub amount: Decimal,
}
