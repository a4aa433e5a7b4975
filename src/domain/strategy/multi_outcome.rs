//! Multi-outcome strategy.
//!
//! Exactly one outcome of a mutually exclusive, exhaustive market pays
//! $1.00, so buying every outcome for less than that locks in the
//! difference. Only markets with three or more outcomes are considered;
//! two-outcome markets belong to the binary strategies.

use chrono::{DateTime, Utc};

use super::{finish, DetectionConfig, DetectionContext, Strategy};
use crate::domain::market::Market;
use crate::domain::opportunity::{ArbType, Combination, Leg, Opportunity};

/// Buy-every-outcome detector.
#[derive(Debug, Default)]
pub struct MultiOutcomeStrategy;

impl Strategy for MultiOutcomeStrategy {
    fn arb_type(&self) -> ArbType {
        ArbType::MultiOutcome
    }

    fn detect(&self, ctx: &DetectionContext) -> Vec<Opportunity> {
        ctx.markets
            .iter()
            .filter(|market| market.is_multi_outcome())
            .take(ctx.config.multi_outcome_cap)
            .filter_map(|market| detect_multi_outcome(market, ctx.config, ctx.detected_at))
            .collect()
    }
}

/// Core detection logic for multi-outcome arbitrage.
///
/// Fires iff the sum of all outcome asks is strictly below
/// `1 - fee_margin - min_profit_threshold`. Legs cover every outcome in
/// market order.
pub fn detect_multi_outcome(
    market: &Market,
    config: &DetectionConfig,
    detected_at: DateTime<Utc>,
) -> Option<Opportunity> {
    if !market.is_multi_outcome() || market.outcomes().len() > config.max_outcomes {
        return None;
    }
    if market.total_ask() >= config.cost_ceiling() {
        return None;
    }

    let legs = market.outcomes().iter().map(|outcome| {
        Leg::new(
            market.venue(),
            market.id().clone(),
            market.title(),
            outcome.label(),
            outcome.ask(),
        )
    });

    let builder = Opportunity::builder()
        .arb_type(ArbType::MultiOutcome)
        .combination(Combination::BuyAllOutcomes)
        .title(market.title())
        .legs(legs)
        .fee_margin(config.fee_margin)
        .detected_at(detected_at);
    finish(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::Outcome;
    use crate::domain::{MarketId, Venue};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn market(prices: &[Decimal]) -> Market {
        let outcomes = prices
            .iter()
            .enumerate()
            .map(|(i, p)| Outcome::new(format!("Candidate {i}"), *p))
            .collect();
        Market::try_new(
            Venue::Polymarket,
            MarketId::from("0xelection"),
            "Who wins the election?",
            outcomes,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn detects_underpriced_outcome_set() {
        let opp = detect_multi_outcome(
            &market(&[dec!(0.30), dec!(0.30), dec!(0.25)]),
            &DetectionConfig::default(),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(opp.legs().len(), 3);
        assert_eq!(opp.total_cost(), dec!(0.85));
        assert_eq!(opp.profit(), dec!(0.145));
        assert_eq!(opp.combination(), Combination::BuyAllOutcomes);
    }

    #[test]
    fn boundary_is_strict() {
        let config = DetectionConfig::default();
        let at_ceiling = market(&[dec!(0.385), dec!(0.30), dec!(0.30)]);
        assert!(detect_multi_outcome(&at_ceiling, &config, Utc::now()).is_none());
    }

    #[test]
    fn binary_markets_are_skipped() {
        let two = market(&[dec!(0.10), dec!(0.10)]);
        assert!(detect_multi_outcome(&two, &DetectionConfig::default(), Utc::now()).is_none());
    }

    #[test]
    fn oversized_markets_are_skipped() {
        let config = DetectionConfig {
            max_outcomes: 3,
            ..DetectionConfig::default()
        };
        let four = market(&[dec!(0.1), dec!(0.1), dec!(0.1), dec!(0.1)]);
        assert!(detect_multi_outcome(&four, &config, Utc::now()).is_none());
    }
}
