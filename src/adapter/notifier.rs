//! Notification adapters.
//!
//! Implements the `port::Notifier` trait on top of `tracing`.

use tracing::{debug, info, warn};

use crate::port::{Event, Notifier};

/// Writes every event to the log as a structured record.
///
/// New opportunities log at info, repeats of an already-seen opportunity at
/// debug.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        match event {
            Event::OpportunityDetected {
                opportunity,
                first_seen,
            } => {
                let legs = opportunity
                    .legs()
                    .iter()
                    .map(|leg| format!("{} {}@{}", leg.outcome, leg.venue, leg.price))
                    .collect::<Vec<_>>()
                    .join(" + ");
                if first_seen {
                    info!(
                        arb_type = %opportunity.arb_type(),
                        strategy = %opportunity.combination(),
                        title = opportunity.title(),
                        legs = %legs,
                        total_cost = %opportunity.total_cost(),
                        profit_cents = %opportunity.profit_cents(),
                        "Opportunity detected"
                    );
                } else {
                    debug!(
                        arb_type = %opportunity.arb_type(),
                        title = opportunity.title(),
                        profit_cents = %opportunity.profit_cents(),
                        "Opportunity still open"
                    );
                }
            }
            Event::ScanCompleted(summary) => {
                let by_type = summary
                    .by_type
                    .iter()
                    .map(|(arb_type, n)| format!("{arb_type}={n}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                info!(
                    scan = summary.scan,
                    markets = summary.markets,
                    malformed = summary.malformed,
                    pairs = summary.pairs_matched,
                    opportunities = summary.opportunities,
                    best_profit = ?summary.best_profit,
                    by_type = %by_type,
                    "Scan complete"
                );
            }
            Event::VenueUnavailable { venue, reason } => {
                warn!(%venue, reason = %reason, "Venue unavailable this cycle");
            }
        }
    }
}
