//! Adapters for the ports: venue HTTP sources, the CSV and scan statistics
//! logs, and log-based notifications.

pub mod csv;
pub mod http;
pub mod kalshi;
pub mod notifier;
pub mod polymarket;
pub mod retry;
pub mod stats_log;

pub use csv::CsvOpportunityLog;
pub use kalshi::KalshiSource;
pub use notifier::LogNotifier;
pub use polymarket::PolymarketSource;
pub use retry::with_backoff;
pub use stats_log::JsonlStatsLog;
