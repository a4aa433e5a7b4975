//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file, then a small set of
//! environment variables override it:
//!
//! - `POLL_INTERVAL_SECONDS` - `scan.poll_interval_secs`
//! - `MIN_PROFIT_CENTS` - `detection.min_profit_threshold` (in cents)
//! - `LOG_FILE` - `output.csv_path`
//!
//! The detection core never reads any of this directly; it receives the
//! immutable [`DetectionConfig`] value.

use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::strategy::{DetectionConfig, StrategyRegistry, STRATEGY_NAMES};
use crate::error::{ConfigError, Result};

mod logging;
mod scan;
mod venue;

pub use logging::LoggingConfig;
pub use scan::{OutputConfig, RetryConfig, ScanConfig};
pub use venue::{KalshiConfig, PolymarketConfig};

/// Configuration for the detection strategy set.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategiesConfig {
    /// Enabled strategy names. Evaluation order is fixed regardless of
    /// the order listed here.
    #[serde(default = "default_enabled_strategies")]
    pub enabled: Vec<String>,
}

fn default_enabled_strategies() -> Vec<String> {
    STRATEGY_NAMES.iter().map(|s| s.to_string()).collect()
}

impl Default for StrategiesConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_strategies(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub strategies: StrategiesConfig,
    #[serde(default)]
    pub polymarket: PolymarketConfig,
    #[serde(default)]
    pub kalshi: KalshiConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load from a TOML file and apply environment overrides.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config = Self::parse(&content)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            return Self::load(path);
        }
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML without overrides or validation.
    #[allow(clippy::result_large_err)]
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content).map_err(ConfigError::Parse)?)
    }

    /// Apply `POLL_INTERVAL_SECONDS`, `MIN_PROFIT_CENTS`, and `LOG_FILE`
    /// from `lookup`.
    #[allow(clippy::result_large_err)]
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("POLL_INTERVAL_SECONDS") {
            self.scan.poll_interval_secs =
                raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    field: "POLL_INTERVAL_SECONDS",
                    reason: format!("expected whole seconds, got {raw:?}"),
                })?;
        }
        if let Some(raw) = lookup("MIN_PROFIT_CENTS") {
            let cents = Decimal::from_str(raw.trim()).map_err(|_| ConfigError::InvalidValue {
                field: "MIN_PROFIT_CENTS",
                reason: format!("expected a number of cents, got {raw:?}"),
            })?;
            self.detection.min_profit_threshold = cents / Decimal::ONE_HUNDRED;
        }
        if let Some(raw) = lookup("LOG_FILE") {
            if !raw.trim().is_empty() {
                self.output.csv_path = raw.trim().into();
            }
        }
        Ok(())
    }

    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        let invalid = |field: &'static str, reason: &str| -> Result<()> {
            Err(ConfigError::InvalidValue {
                field,
                reason: reason.to_string(),
            }
            .into())
        };

        if self.scan.poll_interval_secs == 0 {
            return invalid("poll_interval_secs", "must be greater than 0");
        }
        if self.scan.scan_timeout_secs == 0 {
            return invalid("scan_timeout_secs", "must be greater than 0");
        }
        if self.scan.orderbook_concurrency == 0 {
            return invalid("orderbook_concurrency", "must be greater than 0");
        }

        let d = &self.detection;
        if d.min_profit_threshold < Decimal::ZERO || d.min_profit_threshold >= Decimal::ONE {
            return invalid("min_profit_threshold", "must be in [0, 1)");
        }
        if d.fee_margin < Decimal::ZERO || d.fee_margin >= Decimal::ONE {
            return invalid("fee_margin", "must be in [0, 1)");
        }
        if d.match_threshold <= Decimal::ZERO || d.match_threshold > Decimal::ONE {
            return invalid("match_threshold", "must be in (0, 1]");
        }
        if d.topic_threshold <= Decimal::ZERO || d.topic_threshold > Decimal::ONE {
            return invalid("topic_threshold", "must be in (0, 1]");
        }

        if self.retry.max_attempts == 0 {
            return invalid("max_attempts", "must be at least 1");
        }
        if self.retry.backoff_multiplier < 1.0 {
            return invalid("backoff_multiplier", "must be at least 1.0");
        }
        if self.output.feed_capacity == 0 {
            return invalid("feed_capacity", "must be greater than 0");
        }

        if let Err(e) = StrategyRegistry::with_enabled(&self.strategies.enabled) {
            return invalid("strategies.enabled", &e.to_string());
        }
        if self.polymarket.gamma_url.is_empty() {
            return Err(ConfigError::MissingField { field: "gamma_url" }.into());
        }
        if self.kalshi.api_url.is_empty() {
            return Err(ConfigError::MissingField { field: "api_url" }.into());
        }
        Ok(())
    }

    /// Registry with the configured strategies.
    #[allow(clippy::result_large_err)]
    pub fn strategy_registry(&self) -> Result<StrategyRegistry> {
        StrategyRegistry::with_enabled(&self.strategies.enabled).map_err(|e| {
            ConfigError::InvalidValue {
                field: "strategies.enabled",
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
