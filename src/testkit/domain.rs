//! Builders for domain primitives used across tests.
//!
//! Concise factories for [`Market`] values and raw venue records so tests
//! focus on assertions rather than construction boilerplate.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use crate::domain::strategy::DetectionConfig;
use crate::domain::{Market, MarketId, Outcome, Price, RawMarket, Venue};

/// Fixed scan timestamp: 2026-01-15T12:00:00Z.
pub fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Binary YES/NO market.
pub fn binary(venue: Venue, id: &str, title: &str, yes: Price, no: Price) -> Market {
    Market::try_new(
        venue,
        MarketId::from(id),
        title,
        vec![Outcome::new("YES", yes), Outcome::new("NO", no)],
        at(),
    )
    .unwrap_or_else(|e| panic!("invalid test market {id}: {e}"))
}

/// Market with one outcome per `(label, ask)`.
pub fn multi(venue: Venue, id: &str, title: &str, outcomes: &[(&str, Price)]) -> Market {
    let outcomes = outcomes
        .iter()
        .map(|(label, ask)| Outcome::new(*label, *ask))
        .collect();
    Market::try_new(venue, MarketId::from(id), title, outcomes, at())
        .unwrap_or_else(|e| panic!("invalid test market {id}: {e}"))
}

/// Gamma listing record with a `tokens` array. Token ids are `{id}-yes`
/// and `{id}-no`.
pub fn polymarket_record(id: &str, question: &str, yes: &str, no: &str) -> RawMarket {
    json!({
        "conditionId": id,
        "question": question,
        "tokens": [
            {"token_id": format!("{id}-yes"), "outcome": "Yes", "price": yes},
            {"token_id": format!("{id}-no"), "outcome": "No", "price": no}
        ]
    })
}

/// Kalshi listing record with cent prices.
pub fn kalshi_record(ticker: &str, title: &str, yes_ask: Value, no_ask: Value) -> RawMarket {
    json!({
        "ticker": ticker,
        "title": title,
        "status": "open",
        "yes_ask": yes_ask,
        "no_ask": no_ask
    })
}

/// Detection thresholds with the stock defaults.
pub fn detection() -> DetectionConfig {
    DetectionConfig::default()
}
