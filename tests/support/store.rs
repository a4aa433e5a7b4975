use std::sync::Arc;

use parking_lot::Mutex;

use crossarb::domain::{Opportunity, ScanStats};
use crossarb::error::Result;
use crossarb::port::{OpportunityStore, ScanStatsStore};

/// In-memory store. Clones share the same rows.
#[derive(Clone, Default)]
pub struct MemoryStore {
    rows: Arc<Mutex<Vec<Opportunity>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<Opportunity> {
        self.rows.lock().clone()
    }
}

impl OpportunityStore for MemoryStore {
    fn append(&self, opportunities: &[Opportunity]) -> Result<()> {
        self.rows.lock().extend_from_slice(opportunities);
        Ok(())
    }
}

/// In-memory scan statistics history. Clones share the same rows.
#[derive(Clone, Default)]
pub struct MemoryStatsStore {
    rows: Arc<Mutex<Vec<ScanStats>>>,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scans(&self) -> Vec<u64> {
        self.rows.lock().iter().map(|stats| stats.scan).collect()
    }
}

impl ScanStatsStore for MemoryStatsStore {
    fn record(&self, stats: &ScanStats) -> Result<()> {
        self.rows.lock().push(stats.clone());
        Ok(())
    }
}
