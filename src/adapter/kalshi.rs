//! Kalshi market source (trade API v2).
//!
//! Listings are paged with an opaque `cursor`; order books list bids only
//! and are converted to asks by the normalizer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::Value;
use tracing::{debug, info};

use super::http::{build_client, get_json, records};
use super::retry::with_backoff;
use crate::app::config::{KalshiConfig, RetryConfig};
use crate::domain::normalize::kalshi_asks_from_bids;
use crate::domain::{Market, Quote, RawMarket, Venue};
use crate::error::FetchError;
use crate::port::MarketSource;

const VENUE: Venue = Venue::Kalshi;

/// Largest page the listing endpoint serves.
const MAX_PAGE: usize = 1000;

/// Reads Kalshi listings and order books over HTTP.
pub struct KalshiSource {
    http: HttpClient,
    api_url: String,
    retry: RetryConfig,
}

impl KalshiSource {
    pub fn new(config: &KalshiConfig, retry: RetryConfig, request_timeout: Duration) -> Self {
        Self {
            http: build_client(request_timeout),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            retry,
        }
    }

    fn markets_url(&self, page: usize, cursor: Option<&str>) -> String {
        let mut url = format!("{}/markets?status=open&limit={}", self.api_url, page);
        if let Some(cursor) = cursor {
            url.push_str("&cursor=");
            url.push_str(cursor);
        }
        url
    }

    fn orderbook_url(&self, ticker: &str) -> String {
        format!("{}/markets/{}/orderbook", self.api_url, ticker)
    }
}

#[async_trait]
impl MarketSource for KalshiSource {
    fn venue(&self) -> Venue {
        VENUE
    }

    async fn fetch_markets(&self, limit: usize) -> Result<Vec<RawMarket>, FetchError> {
        info!(url = %self.api_url, limit, "Fetching Kalshi markets");

        let mut markets = Vec::new();
        let mut cursor: Option<String> = None;

        while markets.len() < limit {
            let page = (limit - markets.len()).min(MAX_PAGE);
            let url = self.markets_url(page, cursor.as_deref());
            let body = with_backoff(&self.retry, "kalshi_markets", || {
                get_json(&self.http, VENUE, &url)
            })
            .await?;

            cursor = next_cursor(&body);
            let batch = records(VENUE, body, &["markets"])?;
            let fetched = batch.len();
            markets.extend(batch);

            if fetched == 0 || cursor.is_none() {
                break;
            }
        }
        markets.truncate(limit);

        debug!(count = markets.len(), "Fetched Kalshi markets");
        Ok(markets)
    }

    async fn fetch_orderbook(&self, market: &Market) -> Result<Quote, FetchError> {
        let url = self.orderbook_url(market.id().as_str());
        let body = with_backoff(&self.retry, "kalshi_orderbook", || {
            get_json(&self.http, VENUE, &url)
        })
        .await?;

        let book = body.get("orderbook").unwrap_or(&body);
        let side = |name: &str| {
            book.get(name)
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default()
        };
        let (yes_ask, no_ask) = kalshi_asks_from_bids(side("yes"), side("no"));
        Ok(Quote::binary(yes_ask, no_ask))
    }
}

fn next_cursor(body: &Value) -> Option<String> {
    body.get("cursor")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source() -> KalshiSource {
        let config = KalshiConfig {
            api_url: "https://kalshi.example/trade-api/v2/".into(),
            ..KalshiConfig::default()
        };
        KalshiSource::new(&config, RetryConfig::default(), Duration::from_secs(1))
    }

    #[test]
    fn builds_paged_urls() {
        let source = source();
        assert_eq!(
            source.markets_url(100, None),
            "https://kalshi.example/trade-api/v2/markets?status=open&limit=100"
        );
        assert_eq!(
            source.markets_url(100, Some("abc")),
            "https://kalshi.example/trade-api/v2/markets?status=open&limit=100&cursor=abc"
        );
        assert_eq!(
            source.orderbook_url("KXFED-26MAR"),
            "https://kalshi.example/trade-api/v2/markets/KXFED-26MAR/orderbook"
        );
    }

    #[test]
    fn blank_cursor_ends_paging() {
        assert_eq!(next_cursor(&json!({"cursor": "next"})), Some("next".into()));
        assert_eq!(next_cursor(&json!({"cursor": ""})), None);
        assert_eq!(next_cursor(&json!({"markets": []})), None);
    }
}
