//! Scan statistics history as JSON Lines.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::debug;

use crate::domain::ScanStats;
use crate::error::Result;
use crate::port::ScanStatsStore;

/// Appends one JSON object per scan.
pub struct JsonlStatsLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonlStatsLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScanStatsStore for JsonlStatsLog {
    fn record(&self, stats: &ScanStats) -> Result<()> {
        let mut line = serde_json::to_string(stats)?;
        line.push('\n');

        let _guard = self.lock.lock();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;

        debug!(path = %self.path.display(), scan = stats.scan, "Recorded scan statistics");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Venue;
    use chrono::Utc;

    #[test]
    fn appends_one_line_per_scan() {
        let dir = tempfile::tempdir().unwrap();
        let log = JsonlStatsLog::new(dir.path().join("history").join("scans.jsonl"));

        let mut first = ScanStats::new(1, Utc::now());
        first.markets.insert(Venue::Kalshi, 7);
        log.record(&first).unwrap();
        log.record(&ScanStats::new(2, Utc::now())).unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["scan"], 1);
        assert_eq!(lines[0]["markets"]["kalshi"], 7);
        assert_eq!(lines[1]["scan"], 2);
    }
}
