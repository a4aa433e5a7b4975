//! Per-scan statistics surfaced to status and log consumers.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::ids::Venue;
use super::opportunity::{ArbType, Opportunity};

/// Whether a venue contributed data this scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VenueStatus {
    Available,
    /// Authentication failed or the venue was disabled; it contributed no
    /// markets this cycle and is retried next cycle.
    Unavailable { reason: String },
}

/// Counters for one scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanStats {
    /// Sequence number of the scan, starting at 1.
    pub scan: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Raw records fetched per venue.
    pub fetched: BTreeMap<Venue, usize>,
    /// Markets that survived normalization per venue.
    pub markets: BTreeMap<Venue, usize>,
    /// Records dropped as malformed (one warning each).
    pub malformed: usize,
    pub quotes_refreshed: usize,
    pub quote_failures: usize,
    pub pairs_matched: usize,
    pub opportunities: BTreeMap<ArbType, usize>,
    pub venues: BTreeMap<Venue, VenueStatus>,
}

impl ScanStats {
    pub fn new(scan: u64, started_at: DateTime<Utc>) -> Self {
        Self {
            scan,
            started_at: Some(started_at),
            ..Self::default()
        }
    }

    pub fn total_markets(&self) -> usize {
        self.markets.values().sum()
    }

    pub fn total_opportunities(&self) -> usize {
        self.opportunities.values().sum()
    }

    /// Count opportunities per arbitrage type. Every type gets an entry.
    pub fn record_opportunities(&mut self, opportunities: &[Opportunity]) {
        for arb_type in ArbType::ALL {
            self.opportunities.entry(arb_type).or_insert(0);
        }
        for opportunity in opportunities {
            *self.opportunities.entry(opportunity.arb_type()).or_insert(0) += 1;
        }
    }

    pub fn mark_unavailable(&mut self, venue: Venue, reason: impl Into<String>) {
        self.venues.insert(
            venue,
            VenueStatus::Unavailable {
                reason: reason.into(),
            },
        );
    }

    pub fn is_available(&self, venue: Venue) -> bool {
        !matches!(self.venues.get(&venue), Some(VenueStatus::Unavailable { .. }))
    }

    pub fn unavailable_venues(&self) -> Vec<Venue> {
        Venue::ALL
            .into_iter()
            .filter(|venue| !self.is_available(*venue))
            .collect()
    }
}

/// Trailing windows reported as period rollups, as `(label, seconds)`.
pub const ROLLUP_WINDOWS: [(&str, i64); 2] = [("1h", 3_600), ("24h", 86_400)];

/// What one finished scan contributes to period rollups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSample {
    pub finished_at: DateTime<Utc>,
    pub opportunities: usize,
    pub profit_cents: Decimal,
}

impl ScanSample {
    pub fn new(stats: &ScanStats, opportunities: &[Opportunity]) -> Self {
        Self {
            finished_at: stats
                .finished_at
                .or(stats.started_at)
                .unwrap_or_else(Utc::now),
            opportunities: opportunities.len(),
            profit_cents: opportunities.iter().map(Opportunity::profit_cents).sum(),
        }
    }
}

/// Totals over a trailing window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodStats {
    pub label: &'static str,
    pub scans: usize,
    pub opportunities: usize,
    pub profit_cents: Decimal,
}

/// Samples of recent scans, pruned past the longest rollup window.
#[derive(Debug, Clone, Default)]
pub struct ScanHistory {
    samples: VecDeque<ScanSample>,
}

impl ScanHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: ScanSample) {
        let horizon = ROLLUP_WINDOWS.iter().map(|(_, secs)| *secs).max().unwrap_or(0);
        let cutoff = sample.finished_at - Duration::seconds(horizon);
        self.samples.push_back(sample);
        while self.samples.front().is_some_and(|s| s.finished_at <= cutoff) {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Totals for scans that finished strictly after `now - window`.
    pub fn rollup(
        &self,
        label: &'static str,
        window: Duration,
        now: DateTime<Utc>,
    ) -> PeriodStats {
        let cutoff = now - window;
        let mut period = PeriodStats {
            label,
            scans: 0,
            opportunities: 0,
            profit_cents: Decimal::ZERO,
        };
        for sample in self.samples.iter().filter(|s| s.finished_at > cutoff) {
            period.scans += 1;
            period.opportunities += sample.opportunities;
            period.profit_cents += sample.profit_cents;
        }
        period
    }

    /// One rollup per entry of [`ROLLUP_WINDOWS`].
    pub fn rollups(&self, now: DateTime<Utc>) -> Vec<PeriodStats> {
        ROLLUP_WINDOWS
            .iter()
            .map(|&(label, secs)| self.rollup(label, Duration::seconds(secs), now))
            .collect()
    }
}
