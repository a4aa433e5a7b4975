//! Handler for the `scan` command: one cycle, printed as a table.

use std::time::Duration;

use chrono::Utc;
use tabled::{Table, Tabled};

use crate::app::{ScanReport, Scanner};
use crate::cli::RunArgs;
use crate::domain::{Opportunity, VenueStatus};
use crate::error::Result;

#[derive(Tabled)]
struct OpportunityRow {
    #[tabled(rename = "Type")]
    arb_type: String,
    #[tabled(rename = "Strategy")]
    strategy: String,
    #[tabled(rename = "Markets")]
    title: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Profit (¢)")]
    profit_cents: String,
}

impl From<&Opportunity> for OpportunityRow {
    fn from(opportunity: &Opportunity) -> Self {
        Self {
            arb_type: opportunity.arb_type().to_string(),
            strategy: opportunity.combination().to_string(),
            title: truncate(opportunity.title(), 80),
            cost: opportunity.total_cost().to_string(),
            profit_cents: opportunity.profit_cents().to_string(),
        }
    }
}

/// Execute the scan command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let config = args.load_config()?;
    config.init_logging();

    let scanner = Scanner::from_config(&config)?;
    let report = scanner
        .scan_with_timeout(
            1,
            Utc::now(),
            Duration::from_secs(config.scan.scan_timeout_secs),
        )
        .await?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &ScanReport) {
    let stats = &report.stats;
    println!();
    for (venue, status) in &stats.venues {
        match status {
            VenueStatus::Available => println!(
                "  {venue}: {} markets ({} fetched)",
                stats.markets.get(venue).copied().unwrap_or(0),
                stats.fetched.get(venue).copied().unwrap_or(0),
            ),
            VenueStatus::Unavailable { reason } => println!("  {venue}: unavailable ({reason})"),
        }
    }
    println!(
        "  {} malformed, {} pairs matched, {} quotes refreshed",
        stats.malformed, stats.pairs_matched, stats.quotes_refreshed
    );
    println!();

    if report.opportunities.is_empty() {
        println!("  No opportunities found");
        println!();
        return;
    }

    let rows: Vec<OpportunityRow> = report.opportunities.iter().map(Into::into).collect();
    let table = Table::new(rows).to_string();
    for line in table.lines() {
        println!("  {}", line);
    }
    println!();
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
