//! Application layer: configuration, the scan cycle, and the polling loop.

pub mod config;
mod orchestrator;
mod scanner;
mod state;
mod status;

pub use config::Config;
pub use orchestrator::Orchestrator;
pub use scanner::{ScanReport, Scanner, DISABLED};
pub use state::{AppState, OpportunityFeed, SEEN_RETENTION_SCANS};
pub use status::{StatusFile, StatusWriter};
