//! Kalshi market records.
//!
//! Kalshi quotes integer cents (`yes_ask: 42`) and, on newer payloads,
//! dollar strings (`yes_ask_dollars: "0.4200"`). Dollar fields win when
//! both are present. A zero ask means the side has no resting offers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use super::{complete_binary, field, parse_price, text};
use crate::domain::error::DomainError;
use crate::domain::ids::{MarketId, Venue};
use crate::domain::market::{Market, Outcome, NO, YES};
use crate::domain::money::Price;

pub(super) const ID_KEYS: &[&str] = &["ticker", "market_ticker"];
const TITLE_KEYS: &[&str] = &["title", "subtitle"];

pub(super) fn normalize(raw: &Value, fetched_at: DateTime<Utc>) -> Result<Market, DomainError> {
    let id = text(raw, ID_KEYS).ok_or(DomainError::MissingField { field: "ticker" })?;
    let title = text(raw, TITLE_KEYS).ok_or(DomainError::MissingField { field: "title" })?;

    let yes = quoted(raw, "yes_ask")?
        .filter(|ask| !ask.is_zero())
        .ok_or(DomainError::MissingField { field: "yes_ask" })?;

    let mut outcomes = vec![Outcome::new(YES, yes)];
    let no = match quoted(raw, "no_ask")?.filter(|ask| !ask.is_zero()) {
        Some(ask) => Some(ask),
        None => quoted(raw, "yes_bid")?
            .filter(|bid| !bid.is_zero())
            .map(|bid| Decimal::ONE - bid),
    };
    if let Some(no) = no {
        outcomes.push(Outcome::new(NO, no));
    }

    Market::try_new(
        Venue::Kalshi,
        MarketId::new(id),
        title,
        complete_binary(outcomes),
        fetched_at,
    )
}

/// Read `<name>_dollars` as a fraction, else `<name>` as cents.
fn quoted(raw: &Value, name: &'static str) -> Result<Option<Price>, DomainError> {
    let dollars = format!("{name}_dollars");
    if let Some(value) = field(raw, &[dollars.as_str()]) {
        return parse_price(value, name).map(Some);
    }
    match field(raw, &[name]) {
        Some(value) => Ok(Some(parse_price(value, name)? / Decimal::ONE_HUNDRED)),
        None => Ok(None),
    }
}

/// Best ask for each side of a Kalshi order book.
///
/// Kalshi books only list bids; buying YES means lifting the best NO bid,
/// so `yes_ask = 1 - best_no_bid` and vice versa. Levels are
/// `[price_cents, quantity]`.
pub fn asks_from_bids(yes_bids: &[Value], no_bids: &[Value]) -> (Option<Price>, Option<Price>) {
    let best = |levels: &[Value]| {
        levels
            .iter()
            .filter_map(|level| level.get(0))
            .filter_map(|price| parse_price(price, "bid").ok())
            .max()
    };
    let yes_ask = best(no_bids).map(|bid| (Decimal::ONE_HUNDRED - bid) / Decimal::ONE_HUNDRED);
    let no_ask = best(yes_bids).map(|bid| (Decimal::ONE_HUNDRED - bid) / Decimal::ONE_HUNDRED);
    (yes_ask, no_ask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn converts_cents_to_fractions() {
        let raw = json!({"ticker": "KX-MAR", "title": "X by March", "yes_ask": 40, "no_ask": 62});
        let market = normalize(&raw, Utc::now()).unwrap();

        assert_eq!(market.venue(), Venue::Kalshi);
        assert_eq!(market.yes_ask(), Some(dec!(0.40)));
        assert_eq!(market.no_ask(), Some(dec!(0.62)));
    }

    #[test]
    fn prefers_dollar_fields() {
        let raw = json!({
            "ticker": "KX-1",
            "title": "Rain?",
            "yes_ask": 99,
            "yes_ask_dollars": "0.4100",
            "no_ask_dollars": "0.6000"
        });
        let market = normalize(&raw, Utc::now()).unwrap();
        assert_eq!(market.yes_ask(), Some(dec!(0.41)));
        assert_eq!(market.no_ask(), Some(dec!(0.60)));
    }

    #[test]
    fn derives_no_from_yes_bid() {
        let raw = json!({"ticker": "KX-1", "title": "Rain?", "yes_ask": 40, "yes_bid": 37});
        let market = normalize(&raw, Utc::now()).unwrap();
        assert_eq!(market.no_ask(), Some(dec!(0.63)));
    }

    #[test]
    fn absent_no_side_uses_complement() {
        let raw = json!({"ticker": "KX-1", "title": "Rain?", "yes_ask": 40});
        let market = normalize(&raw, Utc::now()).unwrap();
        assert!(market.is_binary());
        assert_eq!(market.no_ask(), Some(dec!(0.60)));
    }

    #[test]
    fn non_numeric_yes_ask_is_malformed() {
        let raw = json!({"ticker": "KX-1", "title": "Rain?", "yes_ask": "N/A"});
        assert!(matches!(
            normalize(&raw, Utc::now()),
            Err(DomainError::NonNumericPrice { .. })
        ));
    }

    #[test]
    fn out_of_range_cents_is_malformed() {
        let raw = json!({"ticker": "KX-1", "title": "Rain?", "yes_ask": 140});
        assert!(matches!(
            normalize(&raw, Utc::now()),
            Err(DomainError::PriceOutOfRange { .. })
        ));
    }

    #[test]
    fn asks_from_bids_uses_opposing_best_bid() {
        let yes_bids = vec![json!([35, 10]), json!([38, 5])];
        let no_bids = vec![json!([55, 3]), json!([58, 1])];
        let (yes, no) = asks_from_bids(&yes_bids, &no_bids);
        assert_eq!(yes, Some(dec!(0.42)));
        assert_eq!(no, Some(dec!(0.62)));
    }
}
