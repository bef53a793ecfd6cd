//! fico-runner: headless runner for the FICO-style feature pipeline.
//!
//! Usage:
//!   fico-runner --data-dir ./data --out ./output/fico_style_features.csv
//!   fico-runner --synthetic 5000 --seed 42 --out ./output/synthetic.csv
//!   fico-runner --config ./data/config/pipeline_config.json --db runs.db

use anyhow::Result;
use fico_core::{
    config::PipelineConfig,
    pipeline::{new_run_id, FeaturePipeline, FeatureRun},
    source::CsvDirectory,
    store::RunStore,
    synthetic::SyntheticInputs,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let synthetic = parse_arg(&args, "--synthetic", 0usize);
    let data_dir = str_arg(&args, "--data-dir").unwrap_or("./data");
    let out = str_arg(&args, "--out").unwrap_or("./output/fico_style_features.csv");
    let db = str_arg(&args, "--db").unwrap_or(":memory:");

    let config = match str_arg(&args, "--config") {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };

    println!("fico-runner: FICO-style feature pipeline");
    if synthetic > 0 {
        println!("  inputs:    synthetic ({synthetic} customers, seed {seed})");
    } else {
        println!("  data_dir:  {data_dir}");
    }
    println!("  out:       {out}");
    println!("  db:        {db}");
    println!();

    let store = RunStore::open(db)?;
    store.migrate()?;

    let run_id = new_run_id();
    let source = CsvDirectory::new(data_dir, config.source_files.clone());
    let pipeline = FeaturePipeline::new(run_id, config, store)?;

    let run = if synthetic > 0 {
        pipeline.run(&SyntheticInputs::new(seed, synthetic).generate())?
    } else {
        pipeline.run_from_source(&source)?
    };
    pipeline.write(&run, out)?;

    print_summary(&run, out);
    Ok(())
}

fn print_summary(run: &FeatureRun, out: &str) {
    let table = &run.table;
    println!("=== RUN SUMMARY ===");
    println!("  run_id:       {}", run.run_id);
    println!("  rows:         {}", table.len());
    println!("  thin-file:    {}", table.thin_file_count());
    println!(
        "  credit card:  {}",
        if run.credit_card_present { "present" } else { "absent" }
    );
    for notice in &run.notices {
        println!("  notice:       {notice}");
    }
    println!("  saved to:     {out}");

    println!();
    for row in table.rows.iter().take(5) {
        match serde_json::to_string(row) {
            Ok(json) => println!("  {json}"),
            Err(e) => log::warn!("Cannot render row {}: {e}", row.customer_id),
        }
    }
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
