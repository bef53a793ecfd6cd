//! Credit history length.

mod common;

use common::{assert_approx, trade_line};
use fico_core::{maturity::MaturityAggregator, records::BureauRecord};

#[test]
fn account_age_uses_absolute_days() {
    let agg = MaturityAggregator::default();
    assert!((agg.account_age_months(-304.4) - 10.0).abs() < 1e-9);
    assert!((agg.account_age_months(304.4) - 10.0).abs() < 1e-9);
    assert_eq!(agg.account_age_months(0.0), 0.0);
}

#[test]
fn oldest_newest_and_average_ages() {
    let lines = vec![
        trade_line(1, "Active", 1.0, 0.0, -304.4),  // 10 months
        trade_line(1, "Closed", 1.0, 0.0, -913.2),  // 30 months
        trade_line(1, "Closed", 1.0, 0.0, -608.8),  // 20 months
    ];
    let summary = MaturityAggregator::default().summarize(&lines);
    let c = &summary[&1];
    assert_approx(c.oldest_account_months, 10.0, "oldest");
    assert_approx(c.newest_account_months, 30.0, "newest");
    assert_approx(c.average_account_months, 20.0, "average");
}

#[test]
fn oldest_column_holds_the_minimum_age() {
    let lines = vec![
        trade_line(7, "Active", 1.0, 0.0, -913.2),
        trade_line(7, "Active", 1.0, 0.0, -304.4),
    ];
    let summary = MaturityAggregator::default().summarize(&lines);
    let c = &summary[&7];
    assert_approx(c.oldest_account_months, 10.0, "oldest");
    assert_approx(c.newest_account_months, 30.0, "newest");
    assert!(c.oldest_account_months <= c.newest_account_months);
}

#[test]
fn missing_opening_offsets_are_skipped() {
    let lines = vec![
        BureauRecord { days_credit: None, ..trade_line(2, "Active", 1.0, 0.0, 0.0) },
        trade_line(2, "Active", 1.0, 0.0, -60.88),
        BureauRecord { days_credit: None, ..trade_line(3, "Active", 1.0, 0.0, 0.0) },
    ];
    let summary = MaturityAggregator::default().summarize(&lines);
    assert_approx(summary[&2].average_account_months, 2.0, "average");
    assert_eq!(summary[&3].average_account_months, None);
    assert_eq!(summary[&3].oldest_account_months, None);
}

#[test]
fn customers_without_trade_lines_are_absent() {
    let summary = MaturityAggregator::default().summarize(&[trade_line(1, "Active", 1.0, 0.0, -1.0)]);
    assert!(summary.get(&2).is_none());
}
