//! Scripted [`MarketSource`] for driving scans without a network.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{Market, Quote, RawMarket, Venue};
use crate::error::FetchError;
use crate::port::MarketSource;

/// Replays queued listing responses in order. The last response repeats
/// once the queue is down to one; an empty queue yields no markets.
///
/// Order book lookups answer from a per-market-id table and return an
/// empty [`Quote`] for unknown ids.
pub struct ScriptedSource {
    venue: Venue,
    listings: Mutex<VecDeque<Result<Vec<RawMarket>, FetchError>>>,
    books: HashMap<String, Result<Quote, FetchError>>,
    delay: Option<Duration>,
    fetch_calls: AtomicUsize,
    orderbook_calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(venue: Venue) -> Self {
        Self {
            venue,
            listings: Mutex::new(VecDeque::new()),
            books: HashMap::new(),
            delay: None,
            fetch_calls: AtomicUsize::new(0),
            orderbook_calls: AtomicUsize::new(0),
        }
    }

    /// Queue a successful listing.
    #[must_use]
    pub fn with_markets(self, records: Vec<RawMarket>) -> Self {
        self.listings.lock().push_back(Ok(records));
        self
    }

    /// Queue a failed listing.
    #[must_use]
    pub fn with_failure(self, error: FetchError) -> Self {
        self.listings.lock().push_back(Err(error));
        self
    }

    #[must_use]
    pub fn with_quote(mut self, market_id: &str, quote: Quote) -> Self {
        self.books.insert(market_id.to_string(), Ok(quote));
        self
    }

    #[must_use]
    pub fn with_orderbook_failure(mut self, market_id: &str, error: FetchError) -> Self {
        self.books.insert(market_id.to_string(), Err(error));
        self
    }

    /// Sleep before answering every listing request.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn orderbook_calls(&self) -> usize {
        self.orderbook_calls.load(Ordering::SeqCst)
    }

    fn next_listing(&self) -> Result<Vec<RawMarket>, FetchError> {
        let mut listings = self.listings.lock();
        if listings.len() > 1 {
            return listings.pop_front().unwrap_or_else(|| Ok(Vec::new()));
        }
        listings.front().cloned().unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[async_trait]
impl MarketSource for ScriptedSource {
    fn venue(&self) -> Venue {
        self.venue
    }

    async fn fetch_markets(&self, limit: usize) -> Result<Vec<RawMarket>, FetchError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let mut records = self.next_listing()?;
        records.truncate(limit);
        Ok(records)
    }

    async fn fetch_orderbook(&self, market: &Market) -> Result<Quote, FetchError> {
        self.orderbook_calls.fetch_add(1, Ordering::SeqCst);
        self.books
            .get(market.id().as_str())
            .cloned()
            .unwrap_or_else(|| Ok(Quote::default()))
    }
}
