//! Fixed-point currency helpers.
//!
//! Every monetary output of the engine is quantized to two decimal places
//! using round-half-up, applied exactly once at the point a derived value is
//! produced. Intermediate products (hourly rates, percentage applications)
//! stay at full `Decimal` precision so rounding error never compounds before
//! the final quantization.

use rust_decimal::{Decimal, RoundingStrategy};

/// The number of decimal places in a canonical currency amount.
pub const CURRENCY_SCALE: u32 = 2;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Quantizes a value to two decimal places, rounding half-up.
///
/// Idempotent: quantizing an already-quantized value is a no-op.
///
/// # Example
///
/// ```
/// use payroll_engine::money::quantize;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let v = Decimal::from_str("1.005").unwrap();
/// assert_eq!(quantize(v), Decimal::from_str("1.01").unwrap());
/// ```
pub fn quantize(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    // Pad whole amounts so every value serializes with two decimal places.
    rounded.rescale(CURRENCY_SCALE);
    rounded
}

/// Applies a percentage expressed in percent points (e.g. `13.71` for
/// 13.71%) to a base amount. The result is not quantized.
pub fn pct(base: Decimal, percent: Decimal) -> Decimal {
    base * percent / HUNDRED
}

/// Applies a rate expressed as a fraction in `[0, 1]` (e.g. `0.12` for 12%)
/// to a base amount. The result is not quantized.
pub fn fraction(base: Decimal, rate: Decimal) -> Decimal {
    base * rate
}
