//! Venue record normalization.
//!
//! Venue APIs return loosely shaped JSON. This module is the only place
//! that shape-shifting happens: each venue has an adapter function that
//! turns one raw record into a validated [`Market`] or a
//! [`MalformedMarket`] the caller logs and skips.

mod kalshi;
mod polymarket;

pub use kalshi::asks_from_bids as kalshi_asks_from_bids;
pub use polymarket::best_ask as polymarket_best_ask;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use super::error::{DomainError, MalformedMarket};
use super::ids::Venue;
use super::market::{Market, Outcome, NO, YES};
use super::money::Price;

/// A market record exactly as the venue API returned it.
pub type RawMarket = Value;

/// Convert one venue record into a canonical [`Market`].
///
/// # Errors
///
/// Returns [`MalformedMarket`] when identifiers are missing, price fields
/// are non-numeric or outside `[0, 1]`, or no outcome can be built.
pub fn normalize(
    raw: &RawMarket,
    venue: Venue,
    fetched_at: DateTime<Utc>,
) -> Result<Market, MalformedMarket> {
    let result = match venue {
        Venue::Polymarket => polymarket::normalize(raw, fetched_at),
        Venue::Kalshi => kalshi::normalize(raw, fetched_at),
    };
    result.map_err(|reason| MalformedMarket::new(venue, record_id(raw, venue), reason))
}

fn record_id(raw: &RawMarket, venue: Venue) -> Option<String> {
    match venue {
        Venue::Polymarket => text(raw, polymarket::ID_KEYS),
        Venue::Kalshi => text(raw, kalshi::ID_KEYS),
    }
}

/// First non-null value among `keys`.
fn field<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find(|value| !value.is_null())
}

/// First non-empty string (or number rendered as a string) among `keys`.
fn text(raw: &Value, keys: &[&str]) -> Option<String> {
    match field(raw, keys)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a price that may be a JSON number or a numeric string.
fn parse_price(value: &Value, field: &str) -> Result<Price, DomainError> {
    let non_numeric = || DomainError::NonNumericPrice {
        field: field.to_string(),
        raw: value.to_string(),
    };
    let raw = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return Err(non_numeric()),
    };
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| non_numeric())
}

/// A list field that is either a JSON array or a JSON-encoded array string.
fn list(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items.clone()),
        Value::String(s) => serde_json::from_str::<Vec<Value>>(s).ok(),
        _ => None,
    }
}

/// Label for an outcome the venue left unnamed.
fn default_label(index: usize, count: usize) -> String {
    match (count <= 2, index) {
        (true, 0) => YES.to_string(),
        (true, 1) => NO.to_string(),
        _ => format!("Outcome {}", index + 1),
    }
}

/// A lone YES outcome is completed with its complementary NO.
fn complete_binary(mut outcomes: Vec<Outcome>) -> Vec<Outcome> {
    if let [only] = outcomes.as_slice() {
        if only.is_yes() {
            let no = Outcome::new(NO, Decimal::ONE - only.ask());
            outcomes.push(no);
        }
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn parse_price_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_price(&json!(0.45), "p").unwrap(), dec!(0.45));
        assert_eq!(parse_price(&json!("0.58"), "p").unwrap(), dec!(0.58));
        assert_eq!(parse_price(&json!(" 1 "), "p").unwrap(), dec!(1));
    }

    #[test]
    fn parse_price_rejects_placeholders() {
        for raw in [json!("N/A"), json!("NaN"), json!(""), json!(null), json!([1])] {
            assert!(matches!(
                parse_price(&raw, "yes_ask"),
                Err(DomainError::NonNumericPrice { .. })
            ));
        }
    }

    #[test]
    fn list_decodes_encoded_strings() {
        let decoded = list(&json!("[\"Yes\", \"No\"]")).unwrap();
        assert_eq!(decoded, vec![json!("Yes"), json!("No")]);
        assert!(list(&json!("not a list")).is_none());
    }

    #[test]
    fn complete_binary_adds_complement() {
        let outcomes = complete_binary(vec![Outcome::new("YES", dec!(0.3))]);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[1].label(), NO);
        assert_eq!(outcomes[1].ask(), dec!(0.7));
    }

    #[test]
    fn malformed_record_keeps_identifier() {
        let raw = json!({"ticker": "KX-1", "title": "Rain?", "yes_ask": "N/A"});
        let err = normalize(&raw, Venue::Kalshi, Utc::now()).unwrap_err();
        assert_eq!(err.venue, Venue::Kalshi);
        assert_eq!(err.market_id, "KX-1");
    }
}
