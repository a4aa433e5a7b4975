//! Integration tests for configuration loading.

use std::io::Write;

use crossarb::app::Config;
use crossarb::error::{ConfigError, Error};
use rust_decimal_macros::dec;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_full_config_parses() {
    let file = write_config(
        r#"
[logging]
level = "debug"
format = "json"

[scan]
poll_interval_secs = 15
orderbook_cap = 12

[detection]
min_profit_threshold = "0.02"
fee_margin = "0.01"
match_threshold = "0.5"

[strategies]
enabled = ["cross_exchange", "logical_temporal"]

[polymarket]
enabled = false

[kalshi]
api_url = "https://demo-api.kalshi.co/trade-api/v2"
market_limit = 50

[retry]
max_attempts = 5

[output]
csv_path = "logs/opps.csv"
status_file = "logs/status.json"
stats_path = "logs/scans.jsonl"
"#,
    );

    let config = Config::parse(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
    config.validate().unwrap();

    assert_eq!(config.logging.format, "json");
    assert_eq!(config.scan.poll_interval_secs, 15);
    assert_eq!(config.scan.orderbook_cap, 12);
    assert_eq!(config.scan.scan_timeout_secs, 60);
    assert_eq!(config.detection.min_profit_threshold, dec!(0.02));
    assert_eq!(config.detection.fee_margin, dec!(0.01));
    assert_eq!(config.detection.match_threshold, dec!(0.5));
    assert_eq!(config.detection.topic_threshold, dec!(0.60));
    assert!(!config.polymarket.enabled);
    assert_eq!(config.kalshi.market_limit, 50);
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(
        config.output.status_file.as_deref(),
        Some(std::path::Path::new("logs/status.json"))
    );
    assert_eq!(
        config.output.stats_path.as_deref(),
        Some(std::path::Path::new("logs/scans.jsonl"))
    );
    assert_eq!(
        config.strategy_registry().unwrap().names(),
        vec!["cross_exchange", "logical_temporal"]
    );
}

#[test]
fn test_missing_file_is_a_read_error() {
    let err = Config::load("/nonexistent/crossarb.toml").unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
}

#[test]
fn test_invalid_toml_is_a_parse_error() {
    let err = Config::parse("[scan\npoll = ").unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
}

#[test]
fn test_zero_poll_interval_is_rejected() {
    let config = Config::parse("[scan]\npoll_interval_secs = 0").unwrap();
    let err = config.validate().unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue {
            field: "poll_interval_secs",
            ..
        })
    ));
}

#[test]
fn test_threshold_out_of_range_is_rejected() {
    let config = Config::parse("[detection]\nmatch_threshold = \"1.5\"").unwrap();
    assert!(config.validate().is_err());

    let config = Config::parse("[detection]\nfee_margin = \"-0.1\"").unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_env_style_overrides() {
    let mut config = Config::default();
    config
        .apply_overrides(|key| match key {
            "MIN_PROFIT_CENTS" => Some("0.5".to_string()),
            "POLL_INTERVAL_SECONDS" => Some("45".to_string()),
            _ => None,
        })
        .unwrap();

    assert_eq!(config.detection.min_profit_threshold, dec!(0.005));
    assert_eq!(config.scan.poll_interval_secs, 45);
    assert_eq!(
        config.output.csv_path,
        std::path::PathBuf::from("arb_opportunities.csv")
    );
}
