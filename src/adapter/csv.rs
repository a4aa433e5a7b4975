//! Append-only CSV opportunity log.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::SecondsFormat;
use parking_lot::Mutex;
use tracing::debug;

use crate::domain::Opportunity;
use crate::error::Result;
use crate::port::OpportunityStore;

pub const HEADER: [&str; 12] = [
    "timestamp",
    "market_pair",
    "venue_a_market",
    "venue_b_market",
    "strategy",
    "price_a",
    "price_b",
    "total_cost",
    "profit_cents",
    "venue_a_id",
    "venue_b_id",
    "arb_type",
];

/// Appends one row per opportunity. The header is written when the file is
/// empty, so restarts keep appending to the same log.
pub struct CsvOpportunityLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvOpportunityLog {
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

impl OpportunityStore for CsvOpportunityLog {
    fn append(&self, opportunities: &[Opportunity]) -> Result<()> {
        if opportunities.is_empty() {
            return Ok(());
        }
        let _guard = self.lock.lock();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut out = String::new();
        if file.metadata()?.len() == 0 {
            push_row(&mut out, HEADER.iter().map(|h| h.to_string()));
        }
        for opportunity in opportunities {
            push_row(&mut out, row(opportunity));
        }
        file.write_all(out.as_bytes())?;
        file.flush()?;

        debug!(path = %self.path.display(), rows = opportunities.len(), "Appended opportunities");
        Ok(())
    }
}

/// Field values for one opportunity, in [`HEADER`] order.
///
/// Two-leg opportunities fill the `a`/`b` columns from the first and second
/// leg. Wider ones report the combined cost under `price_a` and leave the
/// `b` columns blank.
pub fn row(opportunity: &Opportunity) -> Vec<String> {
    let legs = opportunity.legs();
    let (market_a, market_b, price_a, price_b, id_a, id_b) = match legs {
        [a, b] => (
            a.market_title.clone(),
            b.market_title.clone(),
            a.price.to_string(),
            b.price.to_string(),
            a.market_id.to_string(),
            b.market_id.to_string(),
        ),
        [first, ..] => (
            first.market_title.clone(),
            String::new(),
            opportunity.total_cost().to_string(),
            String::new(),
            first.market_id.to_string(),
            String::new(),
        ),
        [] => Default::default(),
    };

    vec![
        opportunity
            .detected_at()
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        opportunity.title().to_string(),
        market_a,
        market_b,
        opportunity.combination().to_string(),
        price_a,
        price_b,
        opportunity.total_cost().to_string(),
        opportunity.profit_cents().to_string(),
        id_a,
        id_b,
        opportunity.arb_type().to_string(),
    ]
}

fn push_row(out: &mut String, fields: impl IntoIterator<Item = String>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        out.push_str(&escape(&field));
    }
    out.push('\n');
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
