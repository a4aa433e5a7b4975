//! Scan loop, retry, and output settings.

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Seconds between scan starts.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// A scan still running after this long is abandoned.
    #[serde(default = "default_scan_timeout_secs")]
    pub scan_timeout_secs: u64,
    /// Per-request HTTP timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Maximum markets whose order books are refreshed per scan.
    #[serde(default = "default_orderbook_cap")]
    pub orderbook_cap: usize,
    /// Order book requests in flight at once.
    #[serde(default = "default_orderbook_concurrency")]
    pub orderbook_concurrency: usize,
}

const fn default_poll_interval_secs() -> u64 {
    10
}

const fn default_scan_timeout_secs() -> u64 {
    60
}

const fn default_request_timeout_secs() -> u64 {
    10
}

const fn default_orderbook_cap() -> usize {
    30
}

const fn default_orderbook_concurrency() -> usize {
    8
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            scan_timeout_secs: default_scan_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            orderbook_cap: default_orderbook_cap(),
            orderbook_concurrency: default_orderbook_concurrency(),
        }
    }
}

/// Exponential backoff for transient fetch failures.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_initial_delay_ms() -> u64 {
    500
}

const fn default_max_delay_ms() -> u64 {
    5_000
}

const fn default_backoff_multiplier() -> f64 {
    2.0
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Append-only opportunity log.
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
    /// JSON status file for external monitoring. Disabled when unset.
    #[serde(default)]
    pub status_file: Option<PathBuf>,
    /// Per-scan statistics history, one JSON object per line. Disabled when unset.
    #[serde(default)]
    pub stats_path: Option<PathBuf>,
    /// Opportunities kept in the in-memory feed.
    #[serde(default = "default_feed_capacity")]
    pub feed_capacity: usize,
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("arb_opportunities.csv")
}

const fn default_feed_capacity() -> usize {
    200
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            status_file: None,
            stats_path: None,
            feed_capacity: default_feed_capacity(),
        }
    }
}
