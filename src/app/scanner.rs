//! One scan cycle: fetch, normalize, match, refresh quotes, detect.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::config::Config;
use crate::adapter::{KalshiSource, PolymarketSource};
use crate::domain::matcher::{match_titles, MatchIndex};
use crate::domain::strategy::{DetectionConfig, DetectionContext, StrategyRegistry};
use crate::domain::{
    normalize, Market, MatchedPair, Opportunity, PatternExtractor, Quote, RawMarket, ScanStats,
    Venue, VenueStatus,
};
use crate::error::{Error, FetchError, Result};
use crate::port::MarketSource;

/// Unavailability reason recorded for a venue with no configured source.
pub const DISABLED: &str = "disabled";

/// Output of one scan.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Every normalized market, venue A first, with refreshed prices.
    pub markets: Vec<Market>,
    /// Opportunities in evaluation order.
    pub opportunities: Vec<Opportunity>,
    pub stats: ScanStats,
}

struct VenueFeed {
    source: Arc<dyn MarketSource>,
    limit: usize,
}

/// Runs scan cycles against the configured venue sources.
pub struct Scanner {
    feeds: Vec<VenueFeed>,
    detection: DetectionConfig,
    registry: StrategyRegistry,
    orderbook_cap: usize,
    orderbook_concurrency: usize,
}

impl Scanner {
    /// Scanner with no sources; add them with [`Scanner::with_source`].
    pub fn new(detection: DetectionConfig, registry: StrategyRegistry) -> Self {
        Self {
            feeds: Vec::new(),
            detection,
            registry,
            orderbook_cap: 0,
            orderbook_concurrency: 1,
        }
    }

    /// Scanner over the real venue APIs enabled in `config`.
    #[allow(clippy::result_large_err)]
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.scan.request_timeout_secs);
        let mut scanner = Self::new(config.detection.clone(), config.strategy_registry()?)
            .with_orderbooks(config.scan.orderbook_cap, config.scan.orderbook_concurrency);

        if config.polymarket.enabled {
            let source = PolymarketSource::new(&config.polymarket, config.retry.clone(), timeout);
            scanner = scanner.with_source(Arc::new(source), config.polymarket.market_limit);
        }
        if config.kalshi.enabled {
            let source = KalshiSource::new(&config.kalshi, config.retry.clone(), timeout);
            scanner = scanner.with_source(Arc::new(source), config.kalshi.market_limit);
        }
        Ok(scanner)
    }

    /// Add a venue source. A second source for the same venue replaces the first.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn MarketSource>, limit: usize) -> Self {
        let venue = source.venue();
        self.feeds.retain(|feed| feed.source.venue() != venue);
        self.feeds.push(VenueFeed { source, limit });
        self.feeds.sort_by_key(|feed| feed.source.venue());
        self
    }

    /// Refresh order books for up to `cap` markets, `concurrency` at a time.
    #[must_use]
    pub fn with_orderbooks(mut self, cap: usize, concurrency: usize) -> Self {
        self.orderbook_cap = cap;
        self.orderbook_concurrency = concurrency.max(1);
        self
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    fn source(&self, venue: Venue) -> Option<&Arc<dyn MarketSource>> {
        self.feeds
            .iter()
            .find(|feed| feed.source.venue() == venue)
            .map(|feed| &feed.source)
    }

    /// [`Scanner::scan`] bounded by `timeout`. A scan that overruns is
    /// abandoned and nothing from it is returned.
    #[allow(clippy::result_large_err)]
    pub async fn scan_with_timeout(
        &self,
        scan: u64,
        now: DateTime<Utc>,
        timeout: Duration,
    ) -> Result<ScanReport> {
        tokio::time::timeout(timeout, self.scan(scan, now))
            .await
            .map_err(|_| Error::ScanTimeout(timeout.as_secs()))
    }

    /// Run one scan. `now` stamps every market and opportunity and anchors
    /// year-less deadlines, so a fixed snapshot and `now` give fixed output.
    pub async fn scan(&self, scan: u64, now: DateTime<Utc>) -> ScanReport {
        let mut stats = ScanStats::new(scan, now);
        debug!(scan, venues = self.feeds.len(), "Scan started");

        let mut listed = self.fetch_all(now, &mut stats).await;
        let matches = {
            let titles_a: Vec<&str> = listed[0].iter().map(Market::title).collect();
            let titles_b: Vec<&str> = listed[1].iter().map(Market::title).collect();
            match_titles(&titles_a, &titles_b, self.detection.match_threshold)
        };

        self.refresh_quotes(&mut listed, &matches, &mut stats).await;

        let [markets_a, markets_b] = listed;
        let split = markets_a.len();
        let mut markets = markets_a;
        markets.extend(markets_b);

        let opportunities = {
            let (slice_a, slice_b) = markets.split_at(split);
            let pairs: Vec<MatchedPair<'_>> = matches
                .iter()
                .map(|m| MatchedPair {
                    market_a: &slice_a[m.a],
                    market_b: &slice_b[m.b],
                    similarity: m.similarity,
                })
                .collect();
            stats.pairs_matched = pairs.len();

            let extractor = PatternExtractor::new(now.date_naive());
            let ctx =
                DetectionContext::new(&markets, &pairs, &self.detection, &extractor, now);
            self.registry.detect_all(&ctx)
        };

        stats.record_opportunities(&opportunities);
        stats.finished_at = Some(Utc::now());

        info!(
            scan,
            markets = stats.total_markets(),
            malformed = stats.malformed,
            pairs = stats.pairs_matched,
            opportunities = opportunities.len(),
            "Scan finished"
        );

        ScanReport {
            markets,
            opportunities,
            stats,
        }
    }

    /// Fetch and normalize every venue concurrently. Index 0 holds venue A.
    async fn fetch_all(&self, now: DateTime<Utc>, stats: &mut ScanStats) -> [Vec<Market>; 2] {
        let fetches = self.feeds.iter().map(|feed| async move {
            let venue = feed.source.venue();
            (venue, feed.source.fetch_markets(feed.limit).await)
        });
        let results = futures_util::future::join_all(fetches).await;

        let mut listed: [Vec<Market>; 2] = [Vec::new(), Vec::new()];
        for venue in Venue::ALL {
            if self.source(venue).is_none() {
                stats.mark_unavailable(venue, DISABLED);
            }
        }

        for (venue, result) in results {
            match result {
                Ok(records) => {
                    stats.fetched.insert(venue, records.len());
                    stats.venues.insert(venue, VenueStatus::Available);
                    let markets = normalize_all(&records, venue, now, stats);
                    stats.markets.insert(venue, markets.len());
                    listed[slot(venue)] = markets;
                }
                Err(err) => {
                    if err.is_auth() {
                        warn!(%venue, error = %err, "Authentication failed, skipping venue this cycle");
                    } else {
                        warn!(%venue, error = %err, "Fetch failed, skipping venue this cycle");
                    }
                    stats.fetched.insert(venue, 0);
                    stats.markets.insert(venue, 0);
                    stats.mark_unavailable(venue, err.to_string());
                }
            }
        }

        listed
    }

    /// Replace listing prices with order book asks for matched and
    /// multi-outcome markets. Failures keep the listing price.
    async fn refresh_quotes(
        &self,
        listed: &mut [Vec<Market>; 2],
        matches: &[MatchIndex],
        stats: &mut ScanStats,
    ) {
        if self.orderbook_cap == 0 {
            return;
        }

        let mut seen = BTreeSet::new();
        let candidates: Vec<(Venue, usize)> = matches
            .iter()
            .flat_map(|m| [(Venue::Polymarket, m.a), (Venue::Kalshi, m.b)])
            .chain(Venue::ALL.into_iter().flat_map(|venue| {
                listed[slot(venue)]
                    .iter()
                    .enumerate()
                    .filter(|(_, market)| market.is_multi_outcome())
                    .map(move |(index, _)| (venue, index))
            }))
            .filter(|candidate| seen.insert(*candidate))
            .take(self.orderbook_cap)
            .collect();

        let results: Vec<((Venue, usize), std::result::Result<Quote, FetchError>)> = {
            let listed = &*listed;
            stream::iter(candidates)
                .map(move |(venue, index)| {
                    let market = &listed[slot(venue)][index];
                    let source = self.source(venue);
                    async move {
                        let quote = match source {
                            Some(source) => source.fetch_orderbook(market).await,
                            None => Ok(Quote::default()),
                        };
                        ((venue, index), quote)
                    }
                })
                .buffered(self.orderbook_concurrency)
                .collect()
                .await
        };

        for ((venue, index), result) in results {
            let market = &mut listed[slot(venue)][index];
            match result {
                Ok(quote) if quote.is_empty() => {}
                Ok(quote) => match market.with_quote(&quote) {
                    Ok(fresh) => {
                        *market = fresh;
                        stats.quotes_refreshed += 1;
                    }
                    Err(err) => {
                        warn!(%venue, market_id = %market.id(), error = %err, "Discarding unusable quote");
                        stats.quote_failures += 1;
                    }
                },
                Err(err) => {
                    warn!(%venue, market_id = %market.id(), error = %err, "Order book lookup failed, keeping listing price");
                    stats.quote_failures += 1;
                }
            }
        }
    }
}

fn normalize_all(
    records: &[RawMarket],
    venue: Venue,
    now: DateTime<Utc>,
    stats: &mut ScanStats,
) -> Vec<Market> {
    records
        .iter()
        .filter_map(|raw| match normalize(raw, venue, now) {
            Ok(market) => Some(market),
            Err(err) => {
                warn!(
                    venue = %err.venue,
                    market_id = %err.market_id,
                    reason = %err.reason,
                    "Skipping malformed market"
                );
                stats.malformed += 1;
                None
            }
        })
        .collect()
}

const fn slot(venue: Venue) -> usize {
    match venue {
        Venue::Polymarket => 0,
        Venue::Kalshi => 1,
    }
}
