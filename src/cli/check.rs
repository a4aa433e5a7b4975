//! Handler for the `check` command.

use std::path::Path;

use crate::app::Config;
use crate::error::Result;

/// Validate configuration file without starting the scanner.
pub fn execute<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    println!("Checking configuration: {}", path.display());
    println!();

    let config = Config::load(path)?;
    let registry = config.strategy_registry()?;

    println!("✓ Configuration file is valid");
    println!();
    println!("Summary:");
    println!("  Strategies: {:?}", registry.names());
    println!(
        "  Polymarket: {} ({})",
        enabled(config.polymarket.enabled),
        config.polymarket.gamma_url
    );
    println!(
        "  Kalshi: {} ({})",
        enabled(config.kalshi.enabled),
        config.kalshi.api_url
    );
    println!(
        "  Min profit: {} per $1, fee margin {}",
        config.detection.min_profit_threshold, config.detection.fee_margin
    );
    println!("  Poll interval: {}s", config.scan.poll_interval_secs);
    println!("  CSV log: {}", config.output.csv_path.display());
    if let Some(status) = &config.output.status_file {
        println!("  Status file: {}", status.display());
    }
    if let Some(stats) = &config.output.stats_path {
        println!("  Scan history: {}", stats.display());
    }
    println!();
    println!("Configuration is ready to use.");

    Ok(())
}

fn enabled(flag: bool) -> &'static str {
    if flag {
        "enabled"
    } else {
        "disabled"
    }
}
