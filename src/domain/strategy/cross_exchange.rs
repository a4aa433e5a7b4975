//! Cross-exchange binary strategy.
//!
//! For each matched pair of binary markets, buying YES on one venue and NO
//! on the other pays exactly $1.00 if both markets describe the same event.
//! Both directions are evaluated independently and may both fire.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{finish, DetectionConfig, DetectionContext, Strategy};
use crate::domain::market::Market;
use crate::domain::matcher::MatchedPair;
use crate::domain::opportunity::{ArbType, Combination, Leg, Opportunity};

/// Cross-venue YES/NO detector.
#[derive(Debug, Default)]
pub struct CrossExchangeStrategy;

impl Strategy for CrossExchangeStrategy {
    fn arb_type(&self) -> ArbType {
        ArbType::CrossExchange
    }

    fn detect(&self, ctx: &DetectionContext) -> Vec<Opportunity> {
        ctx.pairs
            .iter()
            .flat_map(|pair| detect_cross_exchange(pair, ctx.config, ctx.detected_at))
            .collect()
    }
}

/// Evaluate both directions of a matched pair.
///
/// Returns YES@A + NO@B first, then YES@B + NO@A. Pairs where either side
/// is not a YES/NO binary produce nothing.
pub fn detect_cross_exchange(
    pair: &MatchedPair<'_>,
    config: &DetectionConfig,
    detected_at: DateTime<Utc>,
) -> Vec<Opportunity> {
    if !pair.market_a.is_binary() || !pair.market_b.is_binary() {
        return Vec::new();
    }

    let title = format!("{} <-> {}", pair.market_a.title(), pair.market_b.title());
    [
        (pair.market_a, pair.market_b),
        (pair.market_b, pair.market_a),
    ]
    .into_iter()
    .filter_map(|(yes_side, no_side)| evaluate(yes_side, no_side, &title, config, detected_at))
    .collect()
}

fn evaluate(
    yes_side: &Market,
    no_side: &Market,
    title: &str,
    config: &DetectionConfig,
    detected_at: DateTime<Utc>,
) -> Option<Opportunity> {
    let yes = yes_side.yes_ask()?;
    let no = no_side.no_ask()?;

    if !config.clears(Decimal::ONE - (yes + no) - config.fee_margin) {
        return None;
    }

    let yes_leg = Leg::new(yes_side.venue(), yes_side.id().clone(), yes_side.title(), "YES", yes);
    let no_leg = Leg::new(no_side.venue(), no_side.id().clone(), no_side.title(), "NO", no);
    // Venue A's leg always comes first.
    let legs = if yes_side.venue() < no_side.venue() {
        [yes_leg, no_leg]
    } else {
        [no_leg, yes_leg]
    };

    let builder = Opportunity::builder()
        .arb_type(ArbType::CrossExchange)
        .combination(Combination::CrossYesNo {
            yes: yes_side.venue(),
            no: no_side.venue(),
        })
        .title(title)
        .legs(legs)
        .fee_margin(config.fee_margin)
        .detected_at(detected_at);
    finish(builder)
}
