//! Venue data port.

use async_trait::async_trait;

use crate::domain::{Market, Quote, RawMarket, Venue};
use crate::error::FetchError;

/// Read-only access to one venue's markets.
///
/// Implementations classify failures as [`FetchError`] variants so the
/// scanner can tell a transient outage from rejected credentials.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Venue this source reads from.
    fn venue(&self) -> Venue;

    /// Fetch up to `limit` open market records, unmodified.
    async fn fetch_markets(&self, limit: usize) -> Result<Vec<RawMarket>, FetchError>;

    /// Fetch current best asks for `market`.
    async fn fetch_orderbook(&self, market: &Market) -> Result<Quote, FetchError>;
}
