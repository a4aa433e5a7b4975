//! Cross-scan application state.
//!
//! Owned by the orchestrator. The detection core never sees it.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::domain::{Opportunity, OpportunityKey, PeriodStats, ScanHistory, ScanSample, ScanStats};

/// Scans a key may go unseen before it is forgotten and reported as new
/// again.
pub const SEEN_RETENTION_SCANS: u64 = 360;

/// Bounded, most-recent-first opportunity feed.
#[derive(Debug, Clone)]
pub struct OpportunityFeed {
    items: VecDeque<Opportunity>,
    capacity: usize,
}

impl OpportunityFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
        }
    }

    /// Push a scan's opportunities. The last one pushed becomes the newest.
    pub fn extend(&mut self, opportunities: impl IntoIterator<Item = Opportunity>) {
        for opportunity in opportunities {
            self.items.push_front(opportunity);
        }
        self.items.truncate(self.capacity);
    }

    /// Up to `n` newest entries, newest first.
    pub fn recent(&self, n: usize) -> Vec<Opportunity> {
        self.items.iter().take(n).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Shared application state.
pub struct AppState {
    feed: RwLock<OpportunityFeed>,
    /// Key to the last scan it was detected in.
    seen: RwLock<HashMap<OpportunityKey, u64>>,
    history: RwLock<ScanHistory>,
    last_stats: RwLock<Option<ScanStats>>,
    scans: AtomicU64,
}

impl AppState {
    #[must_use]
    pub fn new(feed_capacity: usize) -> Self {
        Self {
            feed: RwLock::new(OpportunityFeed::new(feed_capacity)),
            seen: RwLock::new(HashMap::new()),
            history: RwLock::new(ScanHistory::new()),
            last_stats: RwLock::new(None),
            scans: AtomicU64::new(0),
        }
    }

    /// Claim the next scan sequence number, starting at 1.
    pub fn next_scan(&self) -> u64 {
        self.scans.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn scans_started(&self) -> u64 {
        self.scans.load(Ordering::SeqCst)
    }

    /// Record a key as detected in `scan`; true the first time it is seen
    /// within the retention window.
    pub fn mark_seen(&self, key: OpportunityKey, scan: u64) -> bool {
        self.seen.write().insert(key, scan).is_none()
    }

    pub fn seen_count(&self) -> usize {
        self.seen.read().len()
    }

    /// Store a completed scan's results and forget keys idle for longer than
    /// [`SEEN_RETENTION_SCANS`].
    pub fn record_scan(&self, stats: ScanStats, opportunities: &[Opportunity]) {
        let scan = stats.scan;
        self.seen
            .write()
            .retain(|_, last| scan.saturating_sub(*last) <= SEEN_RETENTION_SCANS);
        self.history
            .write()
            .push(ScanSample::new(&stats, opportunities));
        self.feed.write().extend(opportunities.iter().cloned());
        *self.last_stats.write() = Some(stats);
    }

    /// Opportunity totals over the trailing rollup windows ending at `now`.
    pub fn periods(&self, now: DateTime<Utc>) -> Vec<PeriodStats> {
        self.history.read().rollups(now)
    }

    pub fn recent(&self, n: usize) -> Vec<Opportunity> {
        self.feed.read().recent(n)
    }

    pub fn feed_len(&self) -> usize {
        self.feed.read().len()
    }

    pub fn last_stats(&self) -> Option<ScanStats> {
        self.last_stats.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::opportunity::{ArbType, Combination, Leg};
    use crate::domain::{MarketId, Venue};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn opportunity(id: &str) -> Opportunity {
        Opportunity::builder()
            .arb_type(ArbType::IntraVenue)
            .combination(Combination::IntraYesNo {
                venue: Venue::Kalshi,
            })
            .title(id)
            .leg(Leg::new(Venue::Kalshi, MarketId::from(id), id, "YES", dec!(0.40)))
            .leg(Leg::new(Venue::Kalshi, MarketId::from(id), id, "NO", dec!(0.50)))
            .fee_margin(dec!(0.005))
            .detected_at(Utc::now())
            .build()
            .unwrap()
    }

    #[test]
    fn feed_is_newest_first_and_bounded() {
        let mut feed = OpportunityFeed::new(2);
        feed.extend([opportunity("a"), opportunity("b")]);
        feed.extend([opportunity("c")]);

        let recent = feed.recent(10);
        assert_eq!(feed.len(), 2);
        assert_eq!(recent[0].title(), "c");
        assert_eq!(recent[1].title(), "b");
    }

    #[test]
    fn scan_numbers_start_at_one() {
        let state = AppState::new(10);
        assert_eq!(state.next_scan(), 1);
        assert_eq!(state.next_scan(), 2);
        assert_eq!(state.scans_started(), 2);
    }

    #[test]
    fn mark_seen_reports_first_sighting() {
        let state = AppState::new(10);
        let key = opportunity("a").key();
        assert!(state.mark_seen(key.clone(), 1));
        assert!(!state.mark_seen(key, 2));
        assert_eq!(state.seen_count(), 1);
    }

    #[test]
    fn idle_seen_keys_are_pruned() {
        let state = AppState::new(10);
        let stale = opportunity("stale").key();
        let live = opportunity("live").key();
        state.mark_seen(stale.clone(), 1);
        state.mark_seen(live.clone(), 1);

        let scan = 2 + SEEN_RETENTION_SCANS;
        state.mark_seen(live.clone(), scan);
        state.record_scan(ScanStats::new(scan, Utc::now()), &[]);

        assert_eq!(state.seen_count(), 1);
        assert!(!state.mark_seen(live, scan + 1));
        assert!(state.mark_seen(stale, scan + 1));
    }

    #[test]
    fn recorded_scans_feed_period_rollups() {
        let state = AppState::new(10);
        let now = Utc::now();
        let mut stats = ScanStats::new(1, now);
        stats.finished_at = Some(now);

        state.record_scan(stats, &[opportunity("a"), opportunity("b")]);

        let periods = state.periods(now);
        assert_eq!(periods[0].scans, 1);
        assert_eq!(periods[0].opportunities, 2);
        assert_eq!(periods[0].profit_cents, dec!(19.00));
    }
}
