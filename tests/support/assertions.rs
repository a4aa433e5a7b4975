use rust_decimal::Decimal;

use crossarb::domain::{ArbType, Opportunity};

pub fn assert_decimal_near(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "expected {} ± {}, got {}",
        expected,
        tolerance,
        actual
    );
}

pub fn of_type(opportunities: &[Opportunity], arb_type: ArbType) -> Vec<&Opportunity> {
    opportunities
        .iter()
        .filter(|o| o.arb_type() == arb_type)
        .collect()
}
