//! Canonical market snapshot shared by every venue.
//!
//! A [`Market`] is immutable once constructed. Refreshing prices from an
//! order book produces a new value via [`Market::with_quote`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::error::DomainError;
use super::ids::{MarketId, TokenId, Venue};
use super::money::{quantize, Price};

/// Canonical label of the YES side of a binary market.
pub const YES: &str = "YES";
/// Canonical label of the NO side of a binary market.
pub const NO: &str = "NO";

/// A single purchasable outcome and its current ask.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    label: String,
    ask: Price,
    token_id: Option<TokenId>,
}

impl Outcome {
    /// Create an outcome. `Yes`/`No` labels in any case are canonicalized.
    pub fn new(label: impl Into<String>, ask: Price) -> Self {
        Self {
            label: canonical_label(label.into()),
            ask,
            token_id: None,
        }
    }

    /// Attach the venue token used to look up this outcome's order book.
    #[must_use]
    pub fn with_token(mut self, token_id: TokenId) -> Self {
        self.token_id = Some(token_id);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub const fn ask(&self) -> Price {
        self.ask
    }

    pub const fn token_id(&self) -> Option<&TokenId> {
        self.token_id.as_ref()
    }

    pub fn is_yes(&self) -> bool {
        self.label == YES
    }

    pub fn is_no(&self) -> bool {
        self.label == NO
    }
}

fn canonical_label(label: String) -> String {
    let trimmed = label.trim();
    if trimmed.eq_ignore_ascii_case(YES) {
        YES.to_string()
    } else if trimmed.eq_ignore_ascii_case(NO) {
        NO.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Fresh prices from an order book lookup.
///
/// Binary markets use `yes_ask`/`no_ask`; multi-outcome markets use
/// `outcome_asks` in outcome order. Absent values leave the listing
/// price in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quote {
    pub yes_ask: Option<Price>,
    pub no_ask: Option<Price>,
    pub outcome_asks: Vec<Price>,
}

impl Quote {
    pub fn binary(yes_ask: Option<Price>, no_ask: Option<Price>) -> Self {
        Self {
            yes_ask,
            no_ask,
            outcome_asks: Vec::new(),
        }
    }

    pub fn outcomes(asks: Vec<Price>) -> Self {
        Self {
            yes_ask: None,
            no_ask: None,
            outcome_asks: asks,
        }
    }

    /// Whether the quote carries no price at all.
    pub fn is_empty(&self) -> bool {
        self.yes_ask.is_none() && self.no_ask.is_none() && self.outcome_asks.is_empty()
    }
}

/// Canonical snapshot of one tradable question on one venue.
#[derive(Debug, Clone, PartialEq)]
pub struct Market {
    venue: Venue,
    id: MarketId,
    title: String,
    outcomes: Vec<Outcome>,
    fetched_at: DateTime<Utc>,
}

impl Market {
    /// Create a validated market.
    ///
    /// The title is trimmed with internal whitespace collapsed and every ask
    /// is quantized to the price scale.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] when the title is blank, the outcome list is
    /// empty, or any ask lies outside `[0, 1]`.
    pub fn try_new(
        venue: Venue,
        id: MarketId,
        title: impl AsRef<str>,
        outcomes: Vec<Outcome>,
        fetched_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let title = title.as_ref().split_whitespace().collect::<Vec<_>>().join(" ");
        if title.is_empty() {
            return Err(DomainError::MissingField { field: "title" });
        }
        if outcomes.is_empty() {
            return Err(DomainError::EmptyOutcomes);
        }

        let outcomes = outcomes
            .into_iter()
            .map(|outcome| {
                if outcome.ask < Decimal::ZERO || outcome.ask > Decimal::ONE {
                    return Err(DomainError::PriceOutOfRange {
                        label: outcome.label,
                        price: outcome.ask,
                    });
                }
                Ok(Outcome {
                    ask: quantize(outcome.ask),
                    ..outcome
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            venue,
            id,
            title,
            outcomes,
            fetched_at,
        })
    }

    pub const fn venue(&self) -> Venue {
        self.venue
    }

    pub fn id(&self) -> &MarketId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub const fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// A binary market has exactly a YES and a NO outcome.
    pub fn is_binary(&self) -> bool {
        self.outcomes.len() == 2 && self.yes().is_some() && self.no().is_some()
    }

    /// Three or more mutually exclusive outcomes.
    pub fn is_multi_outcome(&self) -> bool {
        self.outcomes.len() >= 3
    }

    pub fn yes(&self) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| o.is_yes())
    }

    pub fn no(&self) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| o.is_no())
    }

    pub fn yes_ask(&self) -> Option<Price> {
        self.yes().map(Outcome::ask)
    }

    pub fn no_ask(&self) -> Option<Price> {
        self.no().map(Outcome::ask)
    }

    /// Sum of every outcome's ask.
    pub fn total_ask(&self) -> Price {
        self.outcomes.iter().map(Outcome::ask).sum()
    }

    /// Return a copy of this market with prices taken from `quote`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] when a quoted price is out of range or the
    /// quote's outcome list does not match this market's.
    pub fn with_quote(&self, quote: &Quote) -> Result<Market, DomainError> {
        let mut outcomes = self.outcomes.clone();

        if !quote.outcome_asks.is_empty() {
            if quote.outcome_asks.len() != outcomes.len() {
                return Err(DomainError::QuoteMismatch {
                    expected: outcomes.len(),
                    got: quote.outcome_asks.len(),
                });
            }
            for (outcome, ask) in outcomes.iter_mut().zip(&quote.outcome_asks) {
                outcome.ask = *ask;
            }
        }

        for outcome in &mut outcomes {
            let fresh = if outcome.is_yes() {
                quote.yes_ask
            } else if outcome.is_no() {
                quote.no_ask
            } else {
                None
            };
            if let Some(ask) = fresh {
                outcome.ask = ask;
            }
        }

        Market::try_new(self.venue, self.id.clone(), &self.title, outcomes, self.fetched_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn binary(yes: Price, no: Price) -> Market {
        Market::try_new(
            Venue::Polymarket,
            MarketId::from("m1"),
            "  Will it   rain? ",
            vec![Outcome::new("Yes", yes), Outcome::new("No", no)],
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn try_new_normalizes_title_and_labels() {
        let market = binary(dec!(0.40), dec!(0.55));
        assert_eq!(market.title(), "Will it rain?");
        assert!(market.is_binary());
        assert!(!market.is_multi_outcome());
        assert_eq!(market.yes_ask(), Some(dec!(0.40)));
        assert_eq!(market.no_ask(), Some(dec!(0.55)));
    }

    #[test]
    fn try_new_quantizes_prices() {
        let market = binary(dec!(0.123456), dec!(0.5));
        assert_eq!(market.yes_ask(), Some(dec!(0.1235)));
    }

    #[test]
    fn try_new_rejects_out_of_range_price() {
        let result = Market::try_new(
            Venue::Kalshi,
            MarketId::from("k1"),
            "Title",
            vec![Outcome::new("YES", dec!(1.2))],
            Utc::now(),
        );
        assert!(matches!(result, Err(DomainError::PriceOutOfRange { .. })));
    }

    #[test]
    fn try_new_rejects_blank_title() {
        let result = Market::try_new(
            Venue::Kalshi,
            MarketId::from("k1"),
            "   ",
            vec![Outcome::new("YES", dec!(0.2))],
            Utc::now(),
        );
        assert_eq!(result, Err(DomainError::MissingField { field: "title" }));
    }

    #[test]
    fn two_non_binary_labels_are_not_binary() {
        let market = Market::try_new(
            Venue::Polymarket,
            MarketId::from("m2"),
            "Who wins?",
            vec![Outcome::new("Alice", dec!(0.5)), Outcome::new("Bob", dec!(0.4))],
            Utc::now(),
        )
        .unwrap();
        assert!(!market.is_binary());
        assert!(!market.is_multi_outcome());
    }

    #[test]
    fn with_quote_returns_new_market() {
        let market = binary(dec!(0.40), dec!(0.55));
        let refreshed = market
            .with_quote(&Quote::binary(Some(dec!(0.38)), None))
            .unwrap();

        assert_eq!(refreshed.yes_ask(), Some(dec!(0.38)));
        assert_eq!(refreshed.no_ask(), Some(dec!(0.55)));
        assert_eq!(market.yes_ask(), Some(dec!(0.40)));
    }

    #[test]
    fn with_quote_rejects_mismatched_outcome_count() {
        let market = binary(dec!(0.40), dec!(0.55));
        let result = market.with_quote(&Quote::outcomes(vec![dec!(0.1)]));
        assert_eq!(
            result,
            Err(DomainError::QuoteMismatch {
                expected: 2,
                got: 1
            })
        );
    }
}
