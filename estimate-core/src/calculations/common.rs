//! Common arithmetic helpers for estimate calculations.
//!
//! Amounts are whole currency units. Every derived amount is rounded exactly
//! once, when it is assigned, so sums never carry fractional residue.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a value to a whole amount, with midpoints rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use estimate_core::calculations::common::round_amount;
///
/// assert_eq!(round_amount(dec!(1000.4)), dec!(1000));
/// assert_eq!(round_amount(dec!(1000.5)), dec!(1001));
/// assert_eq!(round_amount(dec!(-1000.5)), dec!(-1001)); // Away from zero
/// ```
pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// `percent` percent of `base`, or `None` if the product overflows.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use estimate_core::calculations::common::percent_of;
///
/// assert_eq!(percent_of(dec!(2000), dec!(3.7)), Some(dec!(74)));
/// ```
pub fn percent_of(
    base: Decimal,
    percent: Decimal,
) -> Option<Decimal> {
    let rate = percent.checked_div(Decimal::ONE_HUNDRED)?;
    base.checked_mul(rate)
}

/// Sums amounts, or `None` if the running total overflows.
pub fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
}
