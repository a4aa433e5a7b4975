//! Strategy abstraction for arbitrage detection.
//!
//! Four independent detectors, each a pure function over one scan's
//! markets wrapped in a [`Strategy`]:
//!
//! - **IntraVenue**: YES + NO on one market < $1
//! - **CrossExchange**: YES on one venue + NO on the other < $1
//! - **MultiOutcome**: sum of all outcomes < $1
//! - **LogicalTemporal**: earlier deadline priced above a later one
//!
//! The [`StrategyRegistry`] runs enabled strategies in that fixed order
//! regardless of the order they were registered in, so output is
//! deterministic for logs and feeds.
//!
//! # Example
//!
//! ```ignore
//! use crossarb::domain::strategy::StrategyRegistry;
//!
//! let registry = StrategyRegistry::with_enabled(&["intra_venue".into()])?;
//! let opportunities = registry.detect_all(&ctx);
//! ```

mod context;
pub mod cross_exchange;
pub mod intra_venue;
pub mod logical_temporal;
pub mod multi_outcome;

pub use context::{DetectionConfig, DetectionContext};
pub use cross_exchange::{detect_cross_exchange, CrossExchangeStrategy};
pub use intra_venue::{detect_intra_venue, IntraVenueStrategy};
pub use logical_temporal::{detect_logical_temporal, LogicalTemporalStrategy};
pub use multi_outcome::{detect_multi_outcome, MultiOutcomeStrategy};

use tracing::debug;

use crate::domain::opportunity::{ArbType, Opportunity, OpportunityBuilder};

/// A detection strategy that finds arbitrage opportunities.
pub trait Strategy: Send + Sync {
    /// Which arbitrage family this strategy detects.
    fn arb_type(&self) -> ArbType;

    /// Unique identifier for this strategy.
    ///
    /// Used in configuration and logging.
    fn name(&self) -> &'static str {
        self.arb_type().as_str()
    }

    /// Detect opportunities given the scan's markets and matches.
    ///
    /// Returns all found opportunities (may be empty).
    fn detect(&self, ctx: &DetectionContext) -> Vec<Opportunity>;
}

/// Build a detector's opportunity, discarding an incomplete one with a trace.
fn finish(builder: OpportunityBuilder) -> Option<Opportunity> {
    builder
        .build()
        .inspect_err(|err| debug!(error = %err, "Discarded incomplete opportunity"))
        .ok()
}

/// Names accepted in the `enabled` strategy list.
pub const STRATEGY_NAMES: [&str; 4] = [
    "intra_venue",
    "cross_exchange",
    "multi_outcome",
    "logical_temporal",
];

/// Error for a strategy name no detector answers to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown strategy '{0}' (expected one of: intra_venue, cross_exchange, multi_outcome, logical_temporal)")]
pub struct UnknownStrategy(pub String);

/// Registry of enabled strategies.
#[derive(Default)]
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn Strategy>>,
}

impl StrategyRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every strategy enabled.
    pub fn all() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(IntraVenueStrategy));
        registry.register(Box::new(CrossExchangeStrategy));
        registry.register(Box::new(MultiOutcomeStrategy));
        registry.register(Box::new(LogicalTemporalStrategy));
        registry
    }

    /// Registry with the named strategies enabled.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownStrategy`] for a name that matches no strategy.
    pub fn with_enabled<S: AsRef<str>>(names: &[S]) -> Result<Self, UnknownStrategy> {
        let mut registry = Self::new();
        for name in names {
            let strategy: Box<dyn Strategy> = match name.as_ref().trim() {
                "intra_venue" => Box::new(IntraVenueStrategy),
                "cross_exchange" => Box::new(CrossExchangeStrategy),
                "multi_outcome" => Box::new(MultiOutcomeStrategy),
                "logical_temporal" => Box::new(LogicalTemporalStrategy),
                other => return Err(UnknownStrategy(other.to_string())),
            };
            if !registry.contains(strategy.arb_type()) {
                registry.register(strategy);
            }
        }
        Ok(registry)
    }

    /// Register a strategy at its fixed position in evaluation order.
    pub fn register(&mut self, strategy: Box<dyn Strategy>) {
        let rank = priority(strategy.arb_type());
        let at = self
            .strategies
            .iter()
            .position(|s| priority(s.arb_type()) > rank)
            .unwrap_or(self.strategies.len());
        self.strategies.insert(at, strategy);
    }

    /// Get all registered strategies, in evaluation order.
    pub fn strategies(&self) -> &[Box<dyn Strategy>] {
        &self.strategies
    }

    /// Names of registered strategies, in evaluation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn contains(&self, arb_type: ArbType) -> bool {
        self.strategies.iter().any(|s| s.arb_type() == arb_type)
    }

    /// Number of registered strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Run every strategy and collect opportunities in evaluation order.
    pub fn detect_all(&self, ctx: &DetectionContext) -> Vec<Opportunity> {
        let mut all = Vec::new();
        for strategy in &self.strategies {
            let found = strategy.detect(ctx);
            debug!(strategy = strategy.name(), count = found.len(), "Strategy finished");
            all.extend(found);
        }
        all
    }
}

fn priority(arb_type: ArbType) -> usize {
    ArbType::ALL
        .iter()
        .position(|t| *t == arb_type)
        .unwrap_or(ArbType::ALL.len())
}
