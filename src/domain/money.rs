//! Fixed-precision price arithmetic.
//!
//! Every price and derived quantity is a [`Decimal`] carried at four
//! decimal places so threshold comparisons never see float artifacts.

use rust_decimal::{Decimal, RoundingStrategy};

/// Price represented as a Decimal fraction of the $1 payout.
pub type Price = Decimal;

/// Number of decimal places prices are carried at.
pub const PRICE_SCALE: u32 = 4;

/// Round a value to the price scale.
pub fn quantize(value: Decimal) -> Price {
    value.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a fractional amount to cents rounded to two places, for display only.
pub fn to_cents(value: Decimal) -> Decimal {
    (value * Decimal::ONE_HUNDRED).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn quantize_rounds_to_four_places() {
        assert_eq!(quantize(dec!(0.123449)), dec!(0.1234));
        assert_eq!(quantize(dec!(0.12345)), dec!(0.1235));
        assert_eq!(quantize(dec!(0.4)), dec!(0.4));
    }

    #[test]
    fn to_cents_rounds_to_two_places() {
        assert_eq!(to_cents(dec!(0.015)), dec!(1.50));
        assert_eq!(to_cents(dec!(0.01234)), dec!(1.23));
        assert_eq!(to_cents(dec!(0.00005)), dec!(0.01));
    }
}
