//! Intra-venue spread strategy.
//!
//! Detects when a single binary market's YES + NO asks sum to less than
//! $1.00 by more than the fee margin and minimum profit. Runs on every
//! binary market, matched or not.

use chrono::{DateTime, Utc};

use super::{finish, DetectionConfig, DetectionContext, Strategy};
use crate::domain::market::Market;
use crate::domain::opportunity::{ArbType, Combination, Leg, Opportunity};

/// Intra-venue YES + NO detector.
#[derive(Debug, Default)]
pub struct IntraVenueStrategy;

impl Strategy for IntraVenueStrategy {
    fn arb_type(&self) -> ArbType {
        ArbType::IntraVenue
    }

    fn detect(&self, ctx: &DetectionContext) -> Vec<Opportunity> {
        ctx.markets
            .iter()
            .filter_map(|market| detect_intra_venue(market, ctx.config, ctx.detected_at))
            .collect()
    }
}

/// Core detection logic for intra-venue arbitrage.
///
/// Fires iff `yes_ask + no_ask < 1 - fee_margin - min_profit_threshold`.
///
/// # Returns
/// `Some(Opportunity)` if arbitrage exists, `None` otherwise (including
/// for markets that are not YES/NO binaries).
pub fn detect_intra_venue(
    market: &Market,
    config: &DetectionConfig,
    detected_at: DateTime<Utc>,
) -> Option<Opportunity> {
    if !market.is_binary() {
        return None;
    }
    let yes = market.yes()?;
    let no = market.no()?;

    if yes.ask() + no.ask() >= config.cost_ceiling() {
        return None;
    }

    let leg = |label: &str, price| {
        Leg::new(market.venue(), market.id().clone(), market.title(), label, price)
    };

    let builder = Opportunity::builder()
        .arb_type(ArbType::IntraVenue)
        .combination(Combination::IntraYesNo {
            venue: market.venue(),
        })
        .title(market.title())
        .leg(leg(yes.label(), yes.ask()))
        .leg(leg(no.label(), no.ask()))
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

    fn market(yes: Decimal, no: Decimal) -> Market {
        Market::try_new(
            Venue::Kalshi,
            MarketId::from("KX-1"),
            "Will it rain?",
            vec![Outcome::new("YES", yes), Outcome::new("NO", no)],
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn detects_underpriced_pair() {
        let config = DetectionConfig::default();
        let opp = detect_intra_venue(&market(dec!(0.40), dec!(0.50)), &config, Utc::now()).unwrap();

        assert_eq!(opp.arb_type(), ArbType::IntraVenue);
        assert_eq!(opp.total_cost(), dec!(0.90));
        assert_eq!(opp.profit(), dec!(0.095));
        assert!(opp.legs().iter().all(|leg| leg.venue == Venue::Kalshi));
        assert_eq!(opp.combination().to_string(), "kalshi_yes_no");
    }

    #[test]
    fn boundary_is_strict() {
        let config = DetectionConfig::default();
        // 0.985 == 1 - 0.005 - 0.01
        assert!(detect_intra_venue(&market(dec!(0.485), dec!(0.50)), &config, Utc::now()).is_none());
        assert!(detect_intra_venue(&market(dec!(0.4849), dec!(0.50)), &config, Utc::now()).is_some());
    }

    #[test]
    fn fairly_priced_market_is_ignored() {
        let config = DetectionConfig::default();
        assert!(detect_intra_venue(&market(dec!(0.52), dec!(0.50)), &config, Utc::now()).is_none());
    }
}
