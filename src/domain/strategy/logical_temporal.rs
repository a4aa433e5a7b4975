//! Logical/temporal strategy.
//!
//! Converts constraint violations into opportunities: buy YES on the
//! later-deadline market and NO on the earlier-deadline market. Whenever
//! the event resolves, at least one leg pays $1.00:
//!
//! - before the early deadline: YES late pays
//! - between the deadlines: both legs pay
//! - not by the late deadline: NO early pays

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{finish, DetectionConfig, DetectionContext, Strategy};
use crate::domain::constraint::{find_violations, ConstraintConfig, Violation};
use crate::domain::opportunity::{ArbType, Combination, Leg, Opportunity};

/// Temporal superset constraint detector.
#[derive(Debug, Default)]
pub struct LogicalTemporalStrategy;

impl Strategy for LogicalTemporalStrategy {
    fn arb_type(&self) -> ArbType {
        ArbType::LogicalTemporal
    }

    fn detect(&self, ctx: &DetectionContext) -> Vec<Opportunity> {
        let config = ConstraintConfig {
            topic_threshold: ctx.config.topic_threshold,
            max_markets: ctx.config.logical_cap,
        };
        find_violations(ctx.extractor, config, ctx.markets)
            .iter()
            .filter_map(|violation| detect_logical_temporal(violation, ctx.config, ctx.detected_at))
            .collect()
    }
}

/// Score a violation with the shared cost/profit rule.
///
/// Cost is `yes(late) + no(early)`, profit `1 - cost - fee_margin`, and the
/// opportunity is emitted when profit reaches the minimum threshold.
pub fn detect_logical_temporal(
    violation: &Violation<'_>,
    config: &DetectionConfig,
    detected_at: DateTime<Utc>,
) -> Option<Opportunity> {
    let early = violation.constraint.early.market;
    let late = violation.constraint.late.market;
    let late_yes = late.yes_ask()?;
    let early_no = early.no_ask()?;

    if !config.clears(Decimal::ONE - (late_yes + early_no) - config.fee_margin) {
        return None;
    }

    let builder = Opportunity::builder()
        .arb_type(ArbType::LogicalTemporal)
        .combination(Combination::LaterYesEarlierNo)
        .title(format!("{} -> {}", early.title(), late.title()))
        .leg(Leg::new(late.venue(), late.id().clone(), late.title(), "YES", late_yes))
        .leg(Leg::new(early.venue(), early.id().clone(), early.title(), "NO", early_no))
        .fee_margin(config.fee_margin)
        .detected_at(detected_at);
    finish(builder)
}
