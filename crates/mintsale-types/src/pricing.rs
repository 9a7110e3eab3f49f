//! Unit prices per phase.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Result, SaleError, SalePhase};

/// Sale and pre-sale unit prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSchedule {
    /// Unit price while the phase is `Open`.
    pub sale_price: Decimal,
    /// Unit price while the phase is `PreSaleOpen`.
    pub pre_sale_price: Decimal,
}

impl PriceSchedule {
    #[must_use]
    pub fn new(sale_price: Decimal, pre_sale_price: Decimal) -> Self {
        Self {
            sale_price,
            pre_sale_price,
        }
    }

    /// Unit price in effect for `phase`, or `None` when public minting is closed.
    #[must_use]
    pub fn unit_price(&self, phase: SalePhase) -> Option<Decimal> {
        match phase {
            SalePhase::PreSaleOpen => Some(self.pre_sale_price),
            SalePhase::Open => Some(self.sale_price),
            SalePhase::Pending | SalePhase::Paused | SalePhase::Closed => None,
        }
    }

    /// `quantity × unit price` for an open phase.
    pub fn required_payment(&self, phase: SalePhase, quantity: u32) -> Result<Decimal> {
        let unit = self
            .unit_price(phase)
            .ok_or_else(|| SaleError::SaleNotOpen {
                reason: phase
                    .not_open_reason()
                    .unwrap_or(crate::NotOpenReason::PublicSaleRequired),
            })?;
        unit.checked_mul(Decimal::from(quantity))
            .ok_or(SaleError::ArithmeticOverflow {
                context: "required payment",
            })
    }
}
