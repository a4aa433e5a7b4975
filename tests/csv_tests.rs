//! Integration tests for the CSV opportunity log.

use crossarb::adapter::csv::{row, HEADER};
use crossarb::adapter::CsvOpportunityLog;
use crossarb::domain::opportunity::{ArbType, Combination, Leg};
use crossarb::domain::{MarketId, Opportunity, Venue};
use crossarb::port::OpportunityStore;
use crossarb::testkit::domain::at;
use rust_decimal_macros::dec;

fn cross() -> Opportunity {
    Opportunity::builder()
        .arb_type(ArbType::CrossExchange)
        .combination(Combination::CrossYesNo {
            yes: Venue::Kalshi,
            no: Venue::Polymarket,
        })
        .title("Will X happen by March 2026 <-> X by March")
        .leg(Leg::new(
            Venue::Polymarket,
            MarketId::from("0xA"),
            "Will X happen by March 2026",
            "NO",
            dec!(0.58),
        ))
        .leg(Leg::new(
            Venue::Kalshi,
            MarketId::from("KX-MAR"),
            "X by March",
            "YES",
            dec!(0.40),
        ))
        .fee_margin(dec!(0.005))
        .detected_at(at())
        .build()
        .unwrap()
}

fn multi() -> Opportunity {
    let legs = ["Alice, Jr.", "Bob", "Carol"].map(|label| {
        Leg::new(
            Venue::Polymarket,
            MarketId::from("0xM"),
            "Who wins",
            label,
            dec!(0.30),
        )
    });
    Opportunity::builder()
        .arb_type(ArbType::MultiOutcome)
        .combination(Combination::BuyAllOutcomes)
        .title("Who wins")
        .legs(legs)
        .fee_margin(dec!(0.005))
        .detected_at(at())
        .build()
        .unwrap()
}

#[test]
fn test_header_written_once_across_appends() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("arb_opportunities.csv");
    let log = CsvOpportunityLog::new(&path);

    log.append(&[cross()]).unwrap();
    log.append(&[cross(), multi()]).unwrap();
    log.append(&[]).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], HEADER.join(","));
    assert_eq!(content.matches("timestamp,").count(), 1);
}

#[test]
fn test_reopened_log_keeps_appending_without_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arb.csv");

    CsvOpportunityLog::new(&path).append(&[cross()]).unwrap();
    CsvOpportunityLog::new(&path).append(&[cross()]).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 3);
}

#[test]
fn test_two_leg_row_fills_both_sides() {
    let fields = row(&cross());

    assert_eq!(fields.len(), HEADER.len());
    assert_eq!(fields[0], "2026-01-15T12:00:00Z");
    assert_eq!(fields[2], "Will X happen by March 2026");
    assert_eq!(fields[3], "X by March");
    assert_eq!(fields[4], "kalshi_yes_polymarket_no");
    assert_eq!(fields[5], "0.58");
    assert_eq!(fields[6], "0.40");
    assert_eq!(fields[7], "0.98");
    assert_eq!(fields[8], "1.50");
    assert_eq!(fields[9], "0xA");
    assert_eq!(fields[10], "KX-MAR");
    assert_eq!(fields[11], "cross_exchange");
}

#[test]
fn test_wide_row_reports_total_under_price_a() {
    let fields = row(&multi());

    assert_eq!(fields[4], "buy_all_outcomes");
    assert_eq!(fields[5], fields[7]);
    assert!(fields[6].is_empty());
    assert!(fields[10].is_empty());
}
