//! Status file for external monitoring.
//!
//! Writes a JSON status file that external tools (or a dashboard) can poll
//! for the latest scan statistics, trailing period rollups, and the most
//! recent opportunities.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Opportunity, PeriodStats, ScanStats};
use crate::error::Result;

/// Current status file format version.
const STATUS_VERSION: &str = "1";

/// Top-level status file structure.
#[derive(Debug, Clone, Serialize)]
pub struct StatusFile<'a> {
    /// Schema version for forward compatibility.
    pub version: &'static str,
    pub started_at: DateTime<Utc>,
    pub pid: u32,
    /// Enabled strategy names.
    pub strategies: &'a [&'static str],
    pub last_scan: Option<&'a ScanStats>,
    /// Opportunity totals over trailing windows.
    pub periods: &'a [PeriodStats],
    /// Most recent opportunities, newest first.
    pub recent: &'a [Opportunity],
    pub updated_at: DateTime<Utc>,
}

/// Writer for the status file.
pub struct StatusWriter {
    path: PathBuf,
    started_at: DateTime<Utc>,
    strategies: Vec<&'static str>,
}

impl StatusWriter {
    #[must_use]
    pub fn new(path: PathBuf, strategies: Vec<&'static str>) -> Self {
        Self {
            path,
            started_at: Utc::now(),
            strategies,
        }
    }

    /// Write the status atomically: temp file, then rename.
    #[allow(clippy::result_large_err)]
    pub fn write(
        &self,
        last_scan: Option<&ScanStats>,
        periods: &[PeriodStats],
        recent: &[Opportunity],
    ) -> Result<()> {
        let status = StatusFile {
            version: STATUS_VERSION,
            started_at: self.started_at,
            pid: std::process::id(),
            strategies: &self.strategies,
            last_scan,
            periods,
            recent,
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&status)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;

        let cleanup_and_err = |e| {
            let _ = fs::remove_file(&temp_path);
            e
        };

        file.write_all(json.as_bytes()).map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;
        fs::rename(&temp_path, &self.path).map_err(cleanup_and_err)?;

        Ok(())
    }
}
