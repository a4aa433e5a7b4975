//! Opportunity type with builder pattern.
//!
//! This module provides the `Opportunity` struct representing a detected
//! arbitrage opportunity, along with `OpportunityBuilder` for safe
//! construction. The builder derives `total_cost` and `profit` so every
//! strategy scores opportunities the same way.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use super::ids::{MarketId, Venue};
use super::money::{quantize, to_cents, Price};

/// Family of mispricing an opportunity exploits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArbType {
    CrossExchange,
    IntraVenue,
    MultiOutcome,
    LogicalTemporal,
}

impl ArbType {
    /// Every arbitrage type, in evaluation order.
    pub const ALL: [ArbType; 4] = [
        ArbType::IntraVenue,
        ArbType::CrossExchange,
        ArbType::MultiOutcome,
        ArbType::LogicalTemporal,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CrossExchange => "cross_exchange",
            Self::IntraVenue => "intra_venue",
            Self::MultiOutcome => "multi_outcome",
            Self::LogicalTemporal => "logical_temporal",
        }
    }
}

impl fmt::Display for ArbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which combination of legs is bought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combination {
    /// YES on one venue, NO on the other.
    CrossYesNo { yes: Venue, no: Venue },
    /// YES and NO of the same market.
    IntraYesNo { venue: Venue },
    /// Every outcome of a multi-outcome market.
    BuyAllOutcomes,
    /// YES of the later-deadline market, NO of the earlier one.
    LaterYesEarlierNo,
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CrossYesNo { yes, no } => write!(f, "{yes}_yes_{no}_no"),
            Self::IntraYesNo { venue } => write!(f, "{venue}_yes_no"),
            Self::BuyAllOutcomes => f.write_str("buy_all_outcomes"),
            Self::LaterYesEarlierNo => f.write_str("buy_later_yes_earlier_no"),
        }
    }
}

impl Serialize for Combination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One purchase within an opportunity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    pub venue: Venue,
    pub market_id: MarketId,
    pub market_title: String,
    pub outcome: String,
    pub price: Price,
}

impl Leg {
    pub fn new(
        venue: Venue,
        market_id: MarketId,
        market_title: impl Into<String>,
        outcome: impl Into<String>,
        price: Price,
    ) -> Self {
        Self {
            venue,
            market_id,
            market_title: market_title.into(),
            outcome: outcome.into(),
            price,
        }
    }
}

/// Error returned when building an Opportunity fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpportunityBuildError {
    #[error("arb_type is required")]
    MissingArbType,
    #[error("combination is required")]
    MissingCombination,
    #[error("title is required")]
    MissingTitle,
    #[error("at least one leg is required")]
    NoLegs,
    #[error("detected_at is required")]
    MissingDetectedAt,
}

/// Stable identity of an opportunity across scans.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpportunityKey(String);

impl OpportunityKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OpportunityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A detected arbitrage opportunity.
///
/// Use `Opportunity::builder()` to construct instances.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Opportunity {
    arb_type: ArbType,
    combination: Combination,
    title: String,
    legs: Vec<Leg>,
    total_cost: Price,
    profit: Price,
    detected_at: DateTime<Utc>,
}

impl Opportunity {
    /// Create a new builder for constructing an Opportunity.
    pub fn builder() -> OpportunityBuilder {
        OpportunityBuilder::new()
    }

    pub const fn arb_type(&self) -> ArbType {
        self.arb_type
    }

    pub const fn combination(&self) -> Combination {
        self.combination
    }

    /// Human-readable description of the market(s) involved.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Sum of leg prices.
    pub const fn total_cost(&self) -> Price {
        self.total_cost
    }

    /// `1 - total_cost - fee_margin`, the value thresholds compare against.
    pub const fn profit(&self) -> Price {
        self.profit
    }

    /// Profit in cents rounded to two places, for display.
    pub fn profit_cents(&self) -> Decimal {
        to_cents(self.profit)
    }

    pub const fn detected_at(&self) -> DateTime<Utc> {
        self.detected_at
    }

    /// Identity of this opportunity independent of prices and time.
    pub fn key(&self) -> OpportunityKey {
        let legs = self
            .legs
            .iter()
            .map(|leg| format!("{}:{}:{}", leg.venue, leg.market_id, leg.outcome))
            .collect::<Vec<_>>()
            .join(",");
        OpportunityKey(format!("{}|{}|{}", self.arb_type, self.combination, legs))
    }
}

/// Builder for constructing `Opportunity` instances.
///
/// # Example
///
/// ```ignore
/// let opportunity = Opportunity::builder()
///     .arb_type(ArbType::IntraVenue)
///     .combination(Combination::IntraYesNo { venue })
///     .title("Will X happen?")
///     .leg(yes_leg)
///     .leg(no_leg)
///     .fee_margin(dec!(0.005))
///     .detected_at(now)
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct OpportunityBuilder {
    arb_type: Option<ArbType>,
    combination: Option<Combination>,
    title: Option<String>,
    legs: Vec<Leg>,
    fee_margin: Decimal,
    detected_at: Option<DateTime<Utc>>,
}

impl OpportunityBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arb_type(mut self, arb_type: ArbType) -> Self {
        self.arb_type = Some(arb_type);
        self
    }

    pub fn combination(mut self, combination: Combination) -> Self {
        self.combination = Some(combination);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append a leg. Legs keep insertion order.
    pub fn leg(mut self, leg: Leg) -> Self {
        self.legs.push(leg);
        self
    }

    pub fn legs(mut self, legs: impl IntoIterator<Item = Leg>) -> Self {
        self.legs.extend(legs);
        self
    }

    /// Fixed safety margin subtracted from raw profit. Defaults to zero.
    pub fn fee_margin(mut self, fee_margin: Decimal) -> Self {
        self.fee_margin = fee_margin;
        self
    }

    pub fn detected_at(mut self, detected_at: DateTime<Utc>) -> Self {
        self.detected_at = Some(detected_at);
        self
    }

    /// Build the Opportunity, calculating derived fields.
    ///
    /// # Errors
    ///
    /// Returns `OpportunityBuildError` if any required field is missing.
    pub fn build(self) -> Result<Opportunity, OpportunityBuildError> {
        let arb_type = self.arb_type.ok_or(OpportunityBuildError::MissingArbType)?;
        let combination = self
            .combination
            .ok_or(OpportunityBuildError::MissingCombination)?;
        let title = self.title.ok_or(OpportunityBuildError::MissingTitle)?;
        let detected_at = self
            .detected_at
            .ok_or(OpportunityBuildError::MissingDetectedAt)?;
        if self.legs.is_empty() {
            return Err(OpportunityBuildError::NoLegs);
        }

        let total_cost = quantize(self.legs.iter().map(|leg| leg.price).sum());
        let profit = quantize(Decimal::ONE - total_cost - self.fee_margin);

        Ok(Opportunity {
            arb_type,
            combination,
            title,
            legs: self.legs,
            total_cost,
            profit,
            detected_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn leg(venue: Venue, id: &str, outcome: &str, price: Price) -> Leg {
        Leg::new(venue, MarketId::from(id), "X by March", outcome, price)
    }

    fn cross() -> Opportunity {
        Opportunity::builder()
            .arb_type(ArbType::CrossExchange)
            .combination(Combination::CrossYesNo {
                yes: Venue::Kalshi,
                no: Venue::Polymarket,
            })
            .title("Will X happen by March 2026 <-> X by March")
            .leg(leg(Venue::Polymarket, "0xabc", "NO", dec!(0.58)))
            .leg(leg(Venue::Kalshi, "KX-MAR", "YES", dec!(0.40)))
            .fee_margin(dec!(0.005))
            .detected_at(Utc::now())
            .build()
            .unwrap()
    }

    #[test]
    fn builder_derives_cost_and_profit() {
        let opp = cross();
        assert_eq!(opp.total_cost(), dec!(0.98));
        assert_eq!(opp.profit(), dec!(0.015));
        assert_eq!(opp.profit_cents(), dec!(1.50));
        assert_eq!(opp.legs().len(), 2);
    }

    #[test]
    fn builder_requires_legs() {
        let result = Opportunity::builder()
            .arb_type(ArbType::IntraVenue)
            .combination(Combination::IntraYesNo {
                venue: Venue::Kalshi,
            })
            .title("t")
            .detected_at(Utc::now())
            .build();
        assert_eq!(result, Err(OpportunityBuildError::NoLegs));
    }

    #[test]
    fn builder_requires_arb_type() {
        let result = Opportunity::builder().title("t").build();
        assert_eq!(result, Err(OpportunityBuildError::MissingArbType));
    }

    #[test]
    fn combination_labels() {
        let cross = Combination::CrossYesNo {
            yes: Venue::Polymarket,
            no: Venue::Kalshi,
        };
        assert_eq!(cross.to_string(), "polymarket_yes_kalshi_no");
        assert_eq!(
            Combination::IntraYesNo {
                venue: Venue::Kalshi
            }
            .to_string(),
            "kalshi_yes_no"
        );
        assert_eq!(Combination::BuyAllOutcomes.to_string(), "buy_all_outcomes");
    }

    #[test]
    fn key_ignores_prices_and_time() {
        let a = cross();
        let b = cross();
        assert_eq!(a.key(), b.key());
        assert_eq!(
            a.key().as_str(),
            "cross_exchange|kalshi_yes_polymarket_no|polymarket:0xabc:NO,kalshi:KX-MAR:YES"
        );
    }

    #[test]
    fn serializes_to_json() {
        let json = serde_json::to_value(cross()).unwrap();
        assert_eq!(json["arb_type"], "cross_exchange");
        assert_eq!(json["combination"], "kalshi_yes_polymarket_no");
        assert_eq!(json["legs"][1]["venue"], "kalshi");
    }
}
