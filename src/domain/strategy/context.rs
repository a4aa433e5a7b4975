//! Inputs shared by every detection strategy.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::domain::market::Market;
use crate::domain::matcher::MatchedPair;
use crate::domain::money::Price;
use crate::domain::temporal::DeadlineExtractor;

/// Thresholds and caps for one detection run.
///
/// Passed by reference into every strategy; nothing in the detection core
/// reads configuration from anywhere else.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetectionConfig {
    /// Minimum profit (fraction of $1, after fees) to surface an opportunity.
    #[serde(default = "default_min_profit_threshold")]
    pub min_profit_threshold: Decimal,

    /// Fixed safety margin subtracted from raw profit.
    #[serde(default = "default_fee_margin")]
    pub fee_margin: Decimal,

    /// Title similarity required to pair markets across venues.
    #[serde(default = "default_match_threshold")]
    pub match_threshold: Decimal,

    /// Topic similarity required to group markets for logical constraints.
    #[serde(default = "default_topic_threshold")]
    pub topic_threshold: Decimal,

    /// Maximum multi-outcome markets evaluated per scan.
    #[serde(default = "default_multi_outcome_cap")]
    pub multi_outcome_cap: usize,

    /// Multi-outcome markets with more outcomes than this are skipped.
    #[serde(default = "default_max_outcomes")]
    pub max_outcomes: usize,

    /// Maximum dated markets fed to the constraint pass per scan.
    #[serde(default = "default_logical_cap")]
    pub logical_cap: usize,
}

fn default_min_profit_threshold() -> Decimal {
    dec!(0.01)
}

fn default_fee_margin() -> Decimal {
    dec!(0.005)
}

fn default_match_threshold() -> Decimal {
    crate::domain::matcher::DEFAULT_MATCH_THRESHOLD
}

fn default_topic_threshold() -> Decimal {
    dec!(0.60)
}

const fn default_multi_outcome_cap() -> usize {
    100
}

const fn default_max_outcomes() -> usize {
    50
}

const fn default_logical_cap() -> usize {
    250
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_profit_threshold: default_min_profit_threshold(),
            fee_margin: default_fee_margin(),
            match_threshold: default_match_threshold(),
            topic_threshold: default_topic_threshold(),
            multi_outcome_cap: default_multi_outcome_cap(),
            max_outcomes: default_max_outcomes(),
            logical_cap: default_logical_cap(),
        }
    }
}

impl DetectionConfig {
    /// Total cost a basket must stay strictly under: `1 - fee - min_profit`.
    pub fn cost_ceiling(&self) -> Price {
        Decimal::ONE - self.fee_margin - self.min_profit_threshold
    }

    /// Whether a profit (after fees) clears the minimum threshold.
    pub fn clears(&self, profit: Price) -> bool {
        profit >= self.min_profit_threshold
    }
}

/// Full context for one detection run.
///
/// This is passed to strategies' `detect()` method.
pub struct DetectionContext<'a> {
    /// Every normalized market of the scan, venue A first.
    pub markets: &'a [Market],
    /// Cross-venue matches over `markets`.
    pub pairs: &'a [MatchedPair<'a>],
    pub config: &'a DetectionConfig,
    /// Deadline grammar for the logical pass.
    pub extractor: &'a dyn DeadlineExtractor,
    /// Timestamp stamped on every opportunity of this run.
    pub detected_at: DateTime<Utc>,
}

impl<'a> DetectionContext<'a> {
    pub fn new(
        markets: &'a [Market],
        pairs: &'a [MatchedPair<'a>],
        config: &'a DetectionConfig,
        extractor: &'a dyn DeadlineExtractor,
        detected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            markets,
            pairs,
            config,
            extractor,
            detected_at,
        }
    }
}
