//! Polymarket market source.
//!
//! Two API surfaces:
//! - **Gamma API** (`gamma-api.polymarket.com`) for market listings
//! - **CLOB API** (`clob.polymarket.com`) for per-token order books

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, info};

use super::http::{build_client, get_json, records};
use super::retry::with_backoff;
use crate::app::config::{PolymarketConfig, RetryConfig};
use crate::domain::normalize::polymarket_best_ask;
use crate::domain::{Market, Price, Quote, RawMarket, TokenId, Venue};
use crate::error::FetchError;
use crate::port::MarketSource;

const VENUE: Venue = Venue::Polymarket;

/// Reads Polymarket listings and order books over HTTP.
pub struct PolymarketSource {
    http: HttpClient,
    gamma_url: String,
    clob_url: String,
    retry: RetryConfig,
}

impl PolymarketSource {
    pub fn new(config: &PolymarketConfig, retry: RetryConfig, request_timeout: Duration) -> Self {
        Self {
            http: build_client(request_timeout),
            gamma_url: config.gamma_url.trim_end_matches('/').to_string(),
            clob_url: config.clob_url.trim_end_matches('/').to_string(),
            retry,
        }
    }

    fn markets_url(&self, limit: usize) -> String {
        format!(
            "{}/markets?active=true&closed=false&limit={}",
            self.gamma_url, limit
        )
    }

    fn book_url(&self, token: &TokenId) -> String {
        format!("{}/book?token_id={}", self.clob_url, token)
    }

    /// Best ask for one outcome token, or `None` when the book is empty.
    async fn best_ask(&self, token: &TokenId) -> Result<Option<Price>, FetchError> {
        let url = self.book_url(token);
        let body = with_backoff(&self.retry, "polymarket_book", || {
            get_json(&self.http, VENUE, &url)
        })
        .await?;

        let asks = body
            .get("asks")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        Ok(polymarket_best_ask(asks).filter(|ask| *ask <= Decimal::ONE))
    }
}

#[async_trait]
impl MarketSource for PolymarketSource {
    fn venue(&self) -> Venue {
        VENUE
    }

    async fn fetch_markets(&self, limit: usize) -> Result<Vec<RawMarket>, FetchError> {
        let url = self.markets_url(limit);
        info!(url = %url, "Fetching Polymarket markets");

        let body = with_backoff(&self.retry, "polymarket_markets", || {
            get_json(&self.http, VENUE, &url)
        })
        .await?;
        let markets = records(VENUE, body, &["data", "markets"])?;

        debug!(count = markets.len(), "Fetched Polymarket markets");
        Ok(markets)
    }

    async fn fetch_orderbook(&self, market: &Market) -> Result<Quote, FetchError> {
        if market.is_binary() {
            let yes = match market.yes().and_then(|o| o.token_id()) {
                Some(token) => self.best_ask(token).await?,
                None => None,
            };
            let no = match market.no().and_then(|o| o.token_id()) {
                Some(token) => self.best_ask(token).await?,
                None => None,
            };
            return Ok(Quote::binary(yes, no));
        }

        let mut asks = Vec::with_capacity(market.outcomes().len());
        for outcome in market.outcomes() {
            let fresh = match outcome.token_id() {
                Some(token) => self.best_ask(token).await?,
                None => None,
            };
            asks.push(fresh.unwrap_or(outcome.ask()));
        }
        Ok(Quote::outcomes(asks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> PolymarketSource {
        let config = PolymarketConfig {
            gamma_url: "https://gamma.example/".into(),
            clob_url: "https://clob.example".into(),
            ..PolymarketConfig::default()
        };
        PolymarketSource::new(&config, RetryConfig::default(), Duration::from_secs(1))
    }

    #[test]
    fn builds_listing_and_book_urls() {
        let source = source();
        assert_eq!(
            source.markets_url(50),
            "https://gamma.example/markets?active=true&closed=false&limit=50"
        );
        assert_eq!(
            source.book_url(&TokenId::from("123")),
            "https://clob.example/book?token_id=123"
        );
        assert_eq!(source.venue(), Venue::Polymarket);
    }
}
