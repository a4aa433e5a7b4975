//! Per-venue connection settings.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct PolymarketConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Gamma API base URL (market listings).
    #[serde(default = "default_gamma_url")]
    pub gamma_url: String,
    /// CLOB API base URL (order books).
    #[serde(default = "default_clob_url")]
    pub clob_url: String,
    /// Maximum listings fetched per scan.
    #[serde(default = "default_polymarket_limit")]
    pub market_limit: usize,
}

fn default_gamma_url() -> String {
    "https://gamma-api.polymarket.com".to_string()
}

fn default_clob_url() -> String {
    "https://clob.polymarket.com".to_string()
}

const fn default_polymarket_limit() -> usize {
    200
}

const fn default_true() -> bool {
    true
}

impl Default for PolymarketConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            gamma_url: default_gamma_url(),
            clob_url: default_clob_url(),
            market_limit: default_polymarket_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct KalshiConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Trade API v2 base URL.
    #[serde(default = "default_kalshi_url")]
    pub api_url: String,
    /// Maximum listings fetched per scan.
    #[serde(default = "default_kalshi_limit")]
    pub market_limit: usize,
}

fn default_kalshi_url() -> String {
    "https://api.elections.kalshi.com/trade-api/v2".to_string()
}

const fn default_kalshi_limit() -> usize {
    250
}

impl Default for KalshiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: default_kalshi_url(),
            market_limit: default_kalshi_limit(),
        }
    }
}
