//! Fixed-point money helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Balances and amounts are `rust_decimal::Decimal` values kept at cents precision.

use rust_decimal::Decimal;
use serde::Serializer;

/// Number of fractional digits every balance is expressed in.
pub const MONEY_SCALE: u32 = 2;

/// Rescales an amount to exactly [`MONEY_SCALE`] decimal places.
///
/// `1500` becomes `1500.00`, `0.1` becomes `0.10`.
#[must_use]
pub fn to_money_scale(amount: Decimal) -> Decimal {
    let mut scaled = amount;
    scaled.rescale(MONEY_SCALE);
    scaled
}

/// Number of digits after the decimal point, ignoring trailing zeros.
#[must_use]
pub fn fractional_digits(amount: Decimal) -> u32 {
    amount.normalize().scale()
}

/// Number of digits before the decimal point, ignoring leading zeros.
#[must_use]
pub fn integer_digits(amount: Decimal) -> u32 {
    let integral = amount.trunc().abs();
    if integral.is_zero() {
        return 0;
    }
    let mantissa = integral.normalize().mantissa().unsigned_abs();
    // normalize() strips the scale of an integral value, so the mantissa is the integer part
    u32::try_from(mantissa.to_string().len()).unwrap_or(u32::MAX)
}

/// Serializes a balance as a string with exactly two decimal places.
///
/// Use with `#[serde(serialize_with = "serialize_money")]`.
pub fn serialize_money<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&to_money_scale(*amount).to_string())
}
