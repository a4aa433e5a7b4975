//! Notifier port for event notifications.
//!
//! This module defines the trait for sending notifications about scan
//! events such as detected opportunities and venue outages.

use rust_decimal::Decimal;

use crate::domain::{ArbType, Opportunity, ScanStats, Venue};

/// Events that can trigger notifications.
#[derive(Debug, Clone)]
pub enum Event {
    /// Arbitrage opportunity detected.
    OpportunityDetected {
        opportunity: Opportunity,
        /// False when the same opportunity was already seen in an earlier scan.
        first_seen: bool,
    },
    /// A scan cycle finished.
    ScanCompleted(ScanSummary),
    /// A venue contributed no data this cycle.
    VenueUnavailable { venue: Venue, reason: String },
}

/// Condensed scan statistics for notifications.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    pub scan: u64,
    pub markets: usize,
    pub malformed: usize,
    pub pairs_matched: usize,
    pub opportunities: usize,
    pub best_profit: Option<Decimal>,
    pub by_type: Vec<(ArbType, usize)>,
}

impl ScanSummary {
    pub fn new(stats: &ScanStats, opportunities: &[Opportunity]) -> Self {
        Self {
            scan: stats.scan,
            markets: stats.total_markets(),
            malformed: stats.malformed,
            pairs_matched: stats.pairs_matched,
            opportunities: opportunities.len(),
            best_profit: opportunities.iter().map(Opportunity::profit).max(),
            by_type: stats.opportunities.iter().map(|(t, n)| (*t, *n)).collect(),
        }
    }
}

/// Trait for notification handlers.
///
/// Implementations must be thread-safe (`Send + Sync`) and return
/// quickly from `notify`.
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
#[derive(Default)]
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Notify all registered notifiers.
    pub fn notify_all(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

/// A no-op notifier for when notifications are disabled.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting(Arc<AtomicUsize>);

    impl Notifier for Counting {
        fn notify(&self, _event: Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn registry_broadcasts_to_every_notifier() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut registry = NotifierRegistry::new();
        registry.register(Box::new(NullNotifier));
        registry.register(Box::new(Counting(count.clone())));
        registry.register(Box::new(Counting(count.clone())));

        registry.notify_all(Event::VenueUnavailable {
            venue: Venue::Kalshi,
            reason: "401 Unauthorized".into(),
        });

        assert_eq!(registry.len(), 3);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn summary_of_empty_scan_has_no_best_profit() {
        let mut stats = ScanStats::new(7, chrono::Utc::now());
        stats.record_opportunities(&[]);
        let summary = ScanSummary::new(&stats, &[]);

        assert_eq!(summary.scan, 7);
        assert_eq!(summary.opportunities, 0);
        assert!(summary.best_profit.is_none());
        assert_eq!(summary.by_type.len(), 4);
    }
}
