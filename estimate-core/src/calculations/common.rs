//! Common utility functions for pricing calculations.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a value to whole dollars, with midpoints rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use estimate_core::calculations::common::round_to_dollar;
///
/// assert_eq!(round_to_dollar(dec!(280499.5)), dec!(280500));
/// assert_eq!(round_to_dollar(dec!(280499.49)), dec!(280499));
/// ```
pub fn round_to_dollar(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Applies a percentage share to `value` and rounds to whole dollars.
pub fn share_of(
    value: Decimal,
    share: Decimal,
) -> Decimal {
    round_to_dollar(value * share)
}

/// Integer ceiling of `numerator / denominator` for unsigned values.
///
/// `denominator` must be non-zero.
pub fn div_ceil(
    numerator: u32,
    denominator: u32,
) -> u32 {
    numerator.div_ceil(denominator)
}
