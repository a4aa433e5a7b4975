//! Persistence ports for detected opportunities and scan statistics.

use crate::domain::{Opportunity, ScanStats};
use crate::error::Result;

/// Append-only sink for opportunities.
pub trait OpportunityStore: Send + Sync {
    /// Persist a batch in order. An empty batch is a no-op.
    fn append(&self, opportunities: &[Opportunity]) -> Result<()>;
}

/// Append-only history of per-scan statistics.
pub trait ScanStatsStore: Send + Sync {
    fn record(&self, stats: &ScanStats) -> Result<()>;
}
