//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams between the detection core and the outside world.
//! Adapters implement them for real venues, files, and logs; the testkit
//! implements them with scripted data.
//!
//! # Available Ports
//!
//! - [`MarketSource`] - Venue market listings and order books
//! - [`Notifier`] - Event notifications (logging, test recorders)
//! - [`OpportunityStore`] - Append-only persistence of detected opportunities
//! - [`ScanStatsStore`] - Per-scan statistics history

mod notifier;
mod source;
mod store;

pub use notifier::{Event, Notifier, NotifierRegistry, NullNotifier, ScanSummary};
pub use source::MarketSource;
pub use store::{OpportunityStore, ScanStatsStore};
