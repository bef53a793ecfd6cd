//! Loading inputs from a CSV directory.

mod common;

use common::init_logging;
use fico_core::{
    config::{PipelineConfig, SourceFiles},
    error::FeatureError,
    feature::FeatureTable,
    output::write_feature_table,
    pipeline::FeaturePipeline,
    records::CreditCardSource,
    source::{CsvDirectory, InputSnapshot, SourceTable},
};
use std::fs;
use std::path::Path;

const APPLICATION: &str = "\
SK_ID_CURR,TARGET,NAME_CONTRACT_TYPE
100001,0,Cash loans
100002,1,Revolving loans
";

const INSTALLMENTS: &str = "\
SK_ID_PREV,SK_ID_CURR,NUM_INSTALMENT_NUMBER,DAYS_INSTALMENT,DAYS_ENTRY_PAYMENT,AMT_PAYMENT
1038818,100001,1,-40.0,-40.0,9251.775
1038818,100001,2,-20.0,-10.0,9251.775
1038818,100001,3,-5.0,,9251.775
";

const BUREAU: &str = "\
SK_ID_CURR,SK_ID_BUREAU,CREDIT_ACTIVE,DAYS_CREDIT,AMT_CREDIT_SUM,AMT_CREDIT_SUM_DEBT
100001,5714462,Active,-497,1000.0,500.0
100001,5714463,Closed,-208,,
";

const CREDIT_CARD: &str = "\
SK_ID_PREV,SK_ID_CURR,MONTHS_BALANCE,AMT_BALANCE,AMT_CREDIT_LIMIT_ACTUAL
2562384,100001,-1,200.0,1000
2562384,100001,-2,600.0,1000
";

fn write_inputs(dir: &Path, with_card: bool) {
    fs::write(dir.join("application_train.csv"), APPLICATION).unwrap();
    fs::write(dir.join("installments_payments.csv"), INSTALLMENTS).unwrap();
    fs::write(dir.join("bureau.csv"), BUREAU).unwrap();
    if with_card {
        fs::write(dir.join("credit_card_balance.csv"), CREDIT_CARD).unwrap();
    }
}

#[test]
fn loads_all_tables_by_header_name() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), true);

    let source = CsvDirectory::new(dir.path(), SourceFiles::default());
    let snapshot = InputSnapshot::load(&source).unwrap();

    assert_eq!(snapshot.applications.len(), 2);
    assert_eq!(snapshot.installments.len(), 3);
    assert_eq!(snapshot.installments[2].days_entry_payment, None, "empty field reads as null");
    assert_eq!(snapshot.bureau[1].amt_credit_sum, None);
    assert_eq!(snapshot.bureau[0].credit_active.as_deref(), Some("Active"));
    assert_eq!(snapshot.row_count(SourceTable::CreditCardBalance), Some(2));
}

#[test]
fn missing_optional_table_resolves_to_absent() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), false);

    let source = CsvDirectory::new(dir.path(), SourceFiles::default());
    let snapshot = InputSnapshot::load(&source).unwrap();
    assert_eq!(snapshot.credit_card, CreditCardSource::Absent);
    assert_eq!(snapshot.row_count(SourceTable::CreditCardBalance), None);
}

#[test]
fn missing_required_table_aborts_run() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), true);
    fs::remove_file(dir.path().join("bureau.csv")).unwrap();

    let pipeline = FeaturePipeline::build_test("missing-bureau".into()).unwrap();
    let source = CsvDirectory::new(dir.path(), SourceFiles::default());
    let err = pipeline.run_from_source(&source).unwrap_err();

    match err {
        FeatureError::MissingRequiredSource { table, path } => {
            assert_eq!(table, "bureau");
            assert!(path.ends_with("bureau.csv"), "path was {path}");
        }
        other => panic!("expected MissingRequiredSource, got {other:?}"),
    }
    let record = pipeline.store().get_run("missing-bureau").unwrap().unwrap();
    assert_eq!(record.status, "failed");
}

#[test]
fn malformed_rows_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), true);
    fs::write(dir.path().join("application_train.csv"), "SK_ID_CURR,TARGET\nabc,0\n").unwrap();

    let source = CsvDirectory::new(dir.path(), SourceFiles::default());
    assert!(matches!(InputSnapshot::load(&source), Err(FeatureError::Csv(_))));
}

#[test]
fn custom_file_names_are_honoured() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), true);
    fs::rename(dir.path().join("bureau.csv"), dir.path().join("bureau_2024.csv")).unwrap();

    let files = SourceFiles { bureau: "bureau_2024.csv".into(), ..SourceFiles::default() };
    let snapshot = InputSnapshot::load(&CsvDirectory::new(dir.path(), files)).unwrap();
    assert_eq!(snapshot.bureau.len(), 2);
}

/// End to end: CSV in, CSV out.
#[test]
fn end_to_end_artifact() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), true);
    let out = dir.path().join("output").join("fico_style_features.csv");

    let pipeline = FeaturePipeline::build_test("e2e".into()).unwrap();
    let run = pipeline
        .run_from_source(&CsvDirectory::new(dir.path(), SourceFiles::default()))
        .unwrap();
    pipeline.write(&run, &out).unwrap();

    let text = fs::read_to_string(&out).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next().unwrap(), FeatureTable::header().join(","));
    let first: Vec<&str> = lines.next().unwrap().split(',').collect();
    assert_eq!(first[0], "100001");
    // Counts are written as integers, not as `3.0`.
    assert_eq!(first[5], "3", "num_payments");
    assert_eq!(first[8], "1", "CREDIT_ACTIVE_FLAG");
    assert_eq!(first[9], "0.5", "total_utilization");
    assert_eq!(first[10], "0.4", "credit_card_utilization");
    assert_eq!(first[14], "0", "thin_file_flag");

    let second: Vec<&str> = lines.next().unwrap().split(',').collect();
    assert_eq!(second[0], "100002");
    assert_eq!(second[5], "", "num_payments stays null");
    assert_eq!(second[14], "1", "thin_file_flag");
    assert!(lines.next().is_none());

    assert!(!dir.path().join("output").join("fico_style_features.csv.partial").exists());
    let record = pipeline.store().get_run("e2e").unwrap().unwrap();
    assert_eq!(record.status, "completed");
    assert_eq!(record.row_count, Some(2));
}

#[test]
fn failed_write_leaves_no_artifact() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the file should be makes the final rename fail.
    let out = dir.path().join("taken");
    fs::create_dir(&out).unwrap();
    fs::write(out.join("keep"), "x").unwrap();

    let table = FeatureTable::default();
    assert!(write_feature_table(&table, &out).is_err());
    assert!(out.is_dir());
    assert!(!dir.path().join("taken.partial").exists());
}

#[test]
fn sample_config_matches_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../data/config/pipeline_config.json");
    let config = PipelineConfig::load(path).unwrap();
    assert_eq!(config, PipelineConfig::default());
}
