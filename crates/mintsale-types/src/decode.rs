//! Boundary decoding for raw caller input.
//!
//! Raw values arrive as signed integers / decimals. Anything negative or
//! out of range is rejected here instead of being coerced into a valid
//! value further in.

use rust_decimal::Decimal;

use crate::{Result, SaleError, SalePhase};

/// Decode a raw mint quantity. Zero passes decoding; the engine rejects it.
pub fn quantity(raw: i64) -> Result<u32> {
    if raw < 0 {
        return Err(SaleError::InvalidQuantity {
            reason: format!("value out-of-bounds: {raw}"),
        });
    }
    u32::try_from(raw).map_err(|_| SaleError::InvalidQuantity {
        reason: format!("value out-of-bounds: {raw}"),
    })
}

/// Decode a tendered payment.
pub fn payment(raw: Decimal) -> Result<Decimal> {
    if raw.is_sign_negative() && !raw.is_zero() {
        return Err(SaleError::InvalidAmount {
            reason: format!("negative payment: {raw}"),
        });
    }
    Ok(raw)
}

/// Decode a raw phase code. Same as [`SalePhase::from_code`].
pub fn phase(raw: i64) -> Result<SalePhase> {
    SalePhase::from_code(raw)
}
