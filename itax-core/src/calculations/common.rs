//! Rounding and clamping helpers shared by the regime calculations.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a rupee amount to paise (two decimal places), halves away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use itax_core::calculations::common::round_to_paise;
///
/// assert_eq!(round_to_paise(dec!(69680.004)), dec!(69680.00));
/// assert_eq!(round_to_paise(dec!(0.005)), dec!(0.01));
/// ```
pub fn round_to_paise(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps negative amounts to zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use itax_core::calculations::common::non_negative;
///
/// assert_eq!(non_negative(dec!(-1.50)), dec!(0));
/// assert_eq!(non_negative(dec!(250000)), dec!(250000));
/// ```
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}
