//! Polling loop.
//!
//! Drives scans sequentially on a fixed interval and hands each completed
//! scan to the notifiers, the opportunity store, the statistics history, the
//! in-memory feed, and the status file. A scan that overruns its timeout is
//! dropped whole.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::config::Config;
use super::scanner::{ScanReport, Scanner, DISABLED};
use super::state::AppState;
use super::status::StatusWriter;
use crate::adapter::{CsvOpportunityLog, JsonlStatsLog, LogNotifier};
use crate::domain::VenueStatus;
use crate::error::Result;
use crate::port::{Event, NotifierRegistry, OpportunityStore, ScanStatsStore, ScanSummary};

/// Opportunities written to the status file.
const STATUS_RECENT: usize = 20;

/// Main application orchestrator.
pub struct Orchestrator {
    scanner: Scanner,
    state: Arc<AppState>,
    notifiers: NotifierRegistry,
    store: Box<dyn OpportunityStore>,
    stats_store: Option<Box<dyn ScanStatsStore>>,
    status: Option<StatusWriter>,
    poll_interval: Duration,
    scan_timeout: Duration,
}

impl Orchestrator {
    pub fn new(
        scanner: Scanner,
        store: Box<dyn OpportunityStore>,
        notifiers: NotifierRegistry,
        state: Arc<AppState>,
    ) -> Self {
        Self {
            scanner,
            state,
            notifiers,
            store,
            stats_store: None,
            status: None,
            poll_interval: Duration::from_secs(10),
            scan_timeout: Duration::from_secs(60),
        }
    }

    /// Wire the real venue sources, output files, and log notifier from
    /// `config`.
    #[allow(clippy::result_large_err)]
    pub fn from_config(config: &Config) -> Result<Self> {
        let scanner = Scanner::from_config(config)?;

        let mut notifiers = NotifierRegistry::new();
        notifiers.register(Box::new(LogNotifier));

        let store = Box::new(CsvOpportunityLog::new(config.output.csv_path.clone()));
        let state = Arc::new(AppState::new(config.output.feed_capacity));

        let mut orchestrator = Self::new(scanner, store, notifiers, state).with_timing(
            Duration::from_secs(config.scan.poll_interval_secs),
            Duration::from_secs(config.scan.scan_timeout_secs),
        );
        if let Some(path) = &config.output.stats_path {
            let log = JsonlStatsLog::new(path.clone());
            orchestrator = orchestrator.with_stats_store(Box::new(log));
        }
        if let Some(path) = &config.output.status_file {
            let strategies = orchestrator.scanner.registry().names();
            orchestrator = orchestrator.with_status(StatusWriter::new(path.clone(), strategies));
        }
        Ok(orchestrator)
    }

    #[must_use]
    pub fn with_timing(mut self, poll_interval: Duration, scan_timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.scan_timeout = scan_timeout;
        self
    }

    #[must_use]
    pub fn with_stats_store(mut self, store: Box<dyn ScanStatsStore>) -> Self {
        self.stats_store = Some(store);
        self
    }

    #[must_use]
    pub fn with_status(mut self, writer: StatusWriter) -> Self {
        self.status = Some(writer);
        self
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Scan forever on the poll interval. Returns only if the caller drops
    /// the future (e.g. on Ctrl-C).
    pub async fn run(&self) -> Result<()> {
        info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            strategies = ?self.scanner.registry().names(),
            "Starting scan loop"
        );

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(err) = self.run_once().await {
                warn!(error = %err, "Scan abandoned");
            }
        }
    }

    /// Run and publish a single scan.
    #[allow(clippy::result_large_err)]
    pub async fn run_once(&self) -> Result<ScanReport> {
        let scan = self.state.next_scan();
        let report = self
            .scanner
            .scan_with_timeout(scan, Utc::now(), self.scan_timeout)
            .await?;
        self.publish(&report);
        Ok(report)
    }

    fn publish(&self, report: &ScanReport) {
        for (venue, status) in &report.stats.venues {
            if let VenueStatus::Unavailable { reason } = status {
                if reason != DISABLED {
                    self.notifiers.notify_all(Event::VenueUnavailable {
                        venue: *venue,
                        reason: reason.clone(),
                    });
                }
            }
        }

        for opportunity in &report.opportunities {
            let first_seen = self.state.mark_seen(opportunity.key(), report.stats.scan);
            self.notifiers.notify_all(Event::OpportunityDetected {
                opportunity: opportunity.clone(),
                first_seen,
            });
        }

        if let Err(err) = self.store.append(&report.opportunities) {
            warn!(error = %err, "Failed to persist opportunities");
        }
        if let Some(stats_store) = &self.stats_store {
            if let Err(err) = stats_store.record(&report.stats) {
                warn!(error = %err, "Failed to record scan statistics");
            }
        }

        self.state
            .record_scan(report.stats.clone(), &report.opportunities);
        self.notifiers
            .notify_all(Event::ScanCompleted(ScanSummary::new(
                &report.stats,
                &report.opportunities,
            )));

        if let Some(writer) = &self.status {
            let last = self.state.last_stats();
            let periods = self.state.periods(Utc::now());
            let recent = self.state.recent(STATUS_RECENT);
            if let Err(err) = writer.write(last.as_ref(), &periods, &recent) {
                warn!(error = %err, "Failed to write status file");
            }
        }
    }
}
