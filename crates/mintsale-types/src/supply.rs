//! Supply caps and counters.
//!
//! Caps are fixed at construction. Counters only ever grow; both are
//! checked with `checked_*` arithmetic so a capacity check can never be
//! defeated by wraparound.

use serde::{Deserialize, Serialize};

use crate::{Result, SaleError};

/// Fixed supply caps for one collection.
///
/// `pre_sale_supply + max_reserved_supply <= max_supply` is expected but
/// not enforced here; see [`crate::SaleConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyCaps {
    /// Hard ceiling on the number of tokens that can ever exist.
    pub max_supply: u64,
    /// Ceiling on the running total while the pre-sale is open.
    pub pre_sale_supply: u64,
    /// Allocation mintable by the administrator via reservation.
    pub max_reserved_supply: u64,
}

/// Running supply counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyCounters {
    /// Every token minted through any channel.
    pub total_minted: u64,
    /// Tokens minted through the reservation channel.
    pub reserved_minted: u64,
}

impl SupplyCounters {
    /// `total_minted + quantity`, or `ArithmeticOverflow`.
    pub fn total_after(&self, quantity: u64) -> Result<u64> {
        self.total_minted
            .checked_add(quantity)
            .ok_or(SaleError::ArithmeticOverflow {
                context: "total supply",
            })
    }

    /// Fail with `MaxSupplyExceeded` if `quantity` more tokens would pass the cap.
    pub fn ensure_within_max(&self, caps: &SupplyCaps, quantity: u64) -> Result<()> {
        if self.total_after(quantity)? > caps.max_supply {
            return Err(SaleError::MaxSupplyExceeded {
                minted: self.total_minted,
                requested: quantity,
                cap: caps.max_supply,
            });
        }
        Ok(())
    }

    /// Fail with `PreSaleSupplyExceeded` if `quantity` more tokens would
    /// pass the pre-sale cap.
    pub fn ensure_within_pre_sale(&self, caps: &SupplyCaps, quantity: u64) -> Result<()> {
        if self.total_after(quantity)? > caps.pre_sale_supply {
            return Err(SaleError::PreSaleSupplyExceeded {
                minted: self.total_minted,
                requested: quantity,
                cap: caps.pre_sale_supply,
            });
        }
        Ok(())
    }

    /// Tokens still mintable before hitting the max supply.
    #[must_use]
    pub fn remaining(&self, caps: &SupplyCaps) -> u64 {
        caps.max_supply.saturating_sub(self.total_minted)
    }

    /// Reserved tokens not yet minted.
    #[must_use]
    pub fn reserve_remaining(&self, caps: &SupplyCaps) -> u64 {
        caps.max_reserved_supply.saturating_sub(self.reserved_minted)
    }
}
