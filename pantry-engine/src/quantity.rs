//! Quantity arithmetic using rust_decimal for precision
//!
//! Weighed items carry fractional stock (kilograms, pounds), so stock
//! mutation is done in `Decimal` and converted back to `f64` for storage.
//! Rounding is to 3 decimal places, enough for gram-level scales.

use rust_decimal::prelude::*;

/// Decimal places kept for stock quantities
const DECIMAL_PLACES: u32 = 3;

/// Maximum allowed quantity per request line
pub const MAX_LINE_QUANTITY: f64 = 10_000.0;

/// Convert an f64 quantity to Decimal, rounding to storage precision.
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value)
        .unwrap_or(Decimal::ZERO)
        .round_dp(DECIMAL_PLACES)
}

/// Convert a Decimal back to f64 for storage/serialization.
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Subtract a checkout quantity from current stock.
///
/// Both operands are rounded to storage precision first so repeated weighed
/// decrements cannot accumulate binary-float drift. The caller has already
/// validated `quantity <= stock`, so the result is clamped only as a final
/// safeguard against rounding at the boundary.
pub fn subtract_stock(stock: f64, quantity: f64) -> f64 {
    let result = to_decimal(stock) - to_decimal(quantity);
    to_f64(result.max(Decimal::ZERO))
}

/// Validate a requested line quantity: finite, positive, bounded.
pub fn validate_line_quantity(quantity: f64) -> Result<(), String> {
    if !quantity.is_finite() {
        return Err(format!("quantity must be a finite number, got {quantity}"));
    }
    if quantity <= 0.0 {
        return Err(format!("quantity must be positive, got {quantity}"));
    }
    if quantity > MAX_LINE_QUANTITY {
        return Err(format!(
            "quantity exceeds maximum allowed ({MAX_LINE_QUANTITY}), got {quantity}"
        ));
    }
    Ok(())
}
