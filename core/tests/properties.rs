//! Table-wide invariants over generated inputs.

use fico_core::{
    config::FillPolicy,
    feature::FeatureColumn,
    pipeline::FeaturePipeline,
    synthetic::SyntheticInputs,
};
use std::collections::BTreeSet;

fn run(seed: u64, customers: usize) -> (SyntheticInputs, fico_core::pipeline::FeatureRun) {
    let inputs = SyntheticInputs::new(seed, customers);
    let pipeline = FeaturePipeline::build_test(format!("prop-{seed}")).unwrap();
    let run = pipeline.run(&inputs.generate()).unwrap();
    (inputs, run)
}

/// Every application customer appears exactly once, and nothing else does.
#[test]
fn every_application_customer_appears_once() {
    let (inputs, run) = run(42, 400);
    let expected: BTreeSet<i64> = inputs.customer_ids().collect();
    let actual: Vec<i64> = run.table.rows.iter().map(|r| r.customer_id).collect();

    assert_eq!(actual.len(), expected.len());
    assert_eq!(actual.iter().copied().collect::<BTreeSet<_>>(), expected);
}

#[test]
fn ratios_are_bounded() {
    for seed in [1u64, 7, 99] {
        let (_, run) = run(seed, 300);
        for row in &run.table.rows {
            for util in [row.total_utilization, row.credit_card_utilization].into_iter().flatten() {
                assert!((0.0..=1.5).contains(&util), "utilization {util} out of range");
            }
            let on_time = row.on_time_ratio.unwrap();
            assert!((0.0..=1.0).contains(&on_time), "on-time ratio {on_time} out of range");
        }
    }
}

#[test]
fn thin_file_flag_matches_zero_credit() {
    let (_, run) = run(2024, 500);
    assert!(run.table.thin_file_count() > 0, "generator should produce thin-file customers");
    for row in &run.table.rows {
        let zero_credit = row.amt_credit_sum == Some(0.0);
        assert_eq!(row.thin_file_flag == 1, zero_credit, "customer {}", row.customer_id);
    }
}

#[test]
fn fill_policy_columns_have_no_nulls() {
    let (_, run) = run(31337, 500);
    for column in FillPolicy::default().columns() {
        assert_eq!(run.table.null_count(column), 0, "{} has nulls", column.name());
    }
}

/// Columns outside the fill policy keep their nulls for unmatched customers.
#[test]
fn unfilled_columns_keep_nulls() {
    let (_, run) = run(31337, 500);
    assert!(run.table.null_count(FeatureColumn::NumPayments) > 0);
    assert!(run.table.null_count(FeatureColumn::ActiveAccounts) > 0);
    assert!(run.table.null_count(FeatureColumn::OldestAccountMonths) > 0);
    assert_eq!(
        run.table.null_count(FeatureColumn::ActiveAccounts),
        run.table.null_count(FeatureColumn::NewestAccountMonths),
        "both come from the bureau table"
    );
}
