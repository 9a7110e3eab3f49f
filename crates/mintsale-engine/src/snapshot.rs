//! Point-in-time view of a sale.

use mintsale_types::{
    PriceSchedule, Result, SaleLimits, SaleMetadata, SalePhase, SaleRoles, SupplyCaps,
    SupplyCounters,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Everything a read-side consumer needs, captured under one borrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleSnapshot {
    pub phase: SalePhase,
    pub counters: SupplyCounters,
    pub caps: SupplyCaps,
    pub prices: PriceSchedule,
    pub limits: SaleLimits,
    pub roles: SaleRoles,
    pub metadata: SaleMetadata,
    /// `None` unless public minting is open.
    pub current_price: Option<Decimal>,
    pub remaining_supply: u64,
    pub funds_balance: Decimal,
    /// Hex digest of the newest journal record.
    pub journal_head: String,
}

impl SaleSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
