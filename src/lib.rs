//! crossarb - cross-venue prediction market arbitrage scanner.
//!
//! Polls Polymarket and Kalshi for open binary and multi-outcome markets,
//! normalizes them into one canonical model, pairs equivalent questions
//! across venues, and emits arbitrage signals. Nothing is traded.
//!
//! # Architecture
//!
//! - **`domain`** - Pure detection core: canonical markets, normalization,
//!   title matching, deadline extraction, the temporal constraint engine,
//!   and the four detection strategies
//!   - `IntraVenueStrategy` - YES + NO on one market < $1
//!   - `CrossExchangeStrategy` - YES on one venue + NO on the other < $1
//!   - `MultiOutcomeStrategy` - sum of all outcomes < $1
//!   - `LogicalTemporalStrategy` - earlier deadline priced above a later one
//! - **`port`** - Traits at the edges: market sources, stores, notifiers
//! - **`adapter`** - HTTP venue sources, CSV log, log notifier
//! - **`app`** - Configuration, the scan cycle, and the polling loop
//!
//! # Modules
//!
//! - [`domain`] - Venue-agnostic types and detection
//! - [`port`] - Port traits
//! - [`adapter`] - Port implementations
//! - [`app`] - Orchestration and configuration
//! - [`cli`] - Command-line interface
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `testkit` - Scripted sources and market builders for integration tests
//!
//! # Example
//!
//! ```no_run
//! use crossarb::app::{Config, Scanner};
//!
//! # async fn demo() -> crossarb::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let scanner = Scanner::from_config(&config)?;
//! let report = scanner.scan(1, chrono::Utc::now()).await;
//! println!("{} opportunities", report.opportunities.len());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
