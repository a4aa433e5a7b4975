//! Polymarket (Gamma API) market records.
//!
//! Outcomes arrive either as a `tokens` array of `{token_id, outcome, price}`
//! objects or as parallel `outcomes` / `outcomePrices` / `clobTokenIds`
//! lists, which the API frequently encodes as JSON strings.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{complete_binary, default_label, field, list, parse_price, text};
use crate::domain::error::DomainError;
use crate::domain::ids::{MarketId, TokenId, Venue};
use crate::domain::market::{Market, Outcome};
use crate::domain::money::Price;

pub(super) const ID_KEYS: &[&str] = &["conditionId", "condition_id", "id"];
const TITLE_KEYS: &[&str] = &["question", "title"];

pub(super) fn normalize(raw: &Value, fetched_at: DateTime<Utc>) -> Result<Market, DomainError> {
    let id = text(raw, ID_KEYS).ok_or(DomainError::MissingField {
        field: "condition_id",
    })?;
    let title = text(raw, TITLE_KEYS).ok_or(DomainError::MissingField { field: "question" })?;

    let outcomes = match raw.get("tokens").and_then(Value::as_array) {
        Some(tokens) if !tokens.is_empty() => from_tokens(tokens)?,
        _ => from_lists(raw)?,
    };

    Market::try_new(
        Venue::Polymarket,
        MarketId::new(id),
        title,
        complete_binary(outcomes),
        fetched_at,
    )
}

/// Lowest ask in a CLOB `/book` response's `asks` levels
/// (`[{"price": "0.52", "size": "100"}, ...]`). Unreadable levels are skipped.
pub fn best_ask(asks: &[Value]) -> Option<Price> {
    asks.iter()
        .filter_map(|level| level.get("price"))
        .filter_map(|price| parse_price(price, "ask").ok())
        .filter(|price| !price.is_zero())
        .min()
}

fn from_tokens(tokens: &[Value]) -> Result<Vec<Outcome>, DomainError> {
    tokens
        .iter()
        .enumerate()
        .map(|(i, token)| -> Result<Outcome, DomainError> {
            let label = text(token, &["outcome"]).unwrap_or_else(|| default_label(i, tokens.len()));
            let price = field(token, &["price"]).ok_or(DomainError::MissingField { field: "price" })?;
            let outcome = Outcome::new(label.clone(), parse_price(price, &label)?);
            Ok(match text(token, &["token_id", "tokenId"]) {
                Some(token_id) => outcome.with_token(TokenId::new(token_id)),
                None => outcome,
            })
        })
        .collect()
}

fn from_lists(raw: &Value) -> Result<Vec<Outcome>, DomainError> {
    let prices = field(raw, &["outcomePrices", "outcome_prices"])
        .ok_or(DomainError::MissingField {
            field: "outcomePrices",
        })?;
    let prices = list(prices).ok_or_else(|| DomainError::NonNumericPrice {
        field: "outcomePrices".to_string(),
        raw: prices.to_string(),
    })?;
    let labels = field(raw, &["outcomes"]).and_then(list).unwrap_or_default();
    let tokens = field(raw, &["clobTokenIds", "clob_token_ids"])
        .and_then(list)
        .unwrap_or_default();

    prices
        .iter()
        .enumerate()
        .map(|(i, price)| -> Result<Outcome, DomainError> {
            let label = labels
                .get(i)
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| default_label(i, prices.len()));
            let outcome = Outcome::new(label.clone(), parse_price(price, &label)?);
            Ok(match tokens.get(i).and_then(Value::as_str) {
                Some(token_id) => outcome.with_token(TokenId::new(token_id)),
                None => outcome,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn normalizes_token_array() {
        let raw = json!({
            "condition_id": "0xabc",
            "question": "Will X happen by March 2026?",
            "tokens": [
                {"token_id": "111", "outcome": "Yes", "price": 0.45},
                {"token_id": "222", "outcome": "No", "price": "0.58"}
            ]
        });
        let market = normalize(&raw, Utc::now()).unwrap();

        assert_eq!(market.id().as_str(), "0xabc");
        assert!(market.is_binary());
        assert_eq!(market.yes_ask(), Some(dec!(0.45)));
        assert_eq!(market.no_ask(), Some(dec!(0.58)));
        assert_eq!(market.yes().unwrap().token_id().unwrap().as_str(), "111");
    }

    #[test]
    fn normalizes_encoded_lists() {
        let raw = json!({
            "conditionId": "0xdef",
            "question": "Who wins the cup?",
            "outcomes": "[\"Alpha\", \"Beta\", \"Gamma\"]",
            "outcomePrices": "[\"0.30\", \"0.30\", \"0.25\"]",
            "clobTokenIds": "[\"1\", \"2\", \"3\"]"
        });
        let market = normalize(&raw, Utc::now()).unwrap();

        assert!(market.is_multi_outcome());
        assert_eq!(market.total_ask(), dec!(0.85));
        assert_eq!(market.outcomes()[2].label(), "Gamma");
        assert_eq!(market.outcomes()[2].token_id().unwrap().as_str(), "3");
    }

    #[test]
    fn unlabeled_pair_becomes_binary() {
        let raw = json!({
            "id": "42",
            "question": "Rain tomorrow?",
            "outcomePrices": ["0.2", "0.7"]
        });
        let market = normalize(&raw, Utc::now()).unwrap();
        assert!(market.is_binary());
    }

    #[test]
    fn missing_prices_is_malformed() {
        let raw = json!({"id": "42", "question": "Rain tomorrow?"});
        assert_eq!(
            normalize(&raw, Utc::now()),
            Err(DomainError::MissingField {
                field: "outcomePrices"
            })
        );
    }

    #[test]
    fn best_ask_takes_lowest_level() {
        let asks = vec![
            json!({"price": "0.55", "size": "10"}),
            json!({"price": "0.52", "size": "4"}),
            json!({"price": "bad", "size": "1"}),
        ];
        assert_eq!(best_ask(&asks), Some(dec!(0.52)));
        assert_eq!(best_ask(&[]), None);
    }
}
