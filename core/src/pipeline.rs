//! The feature pipeline: one batch pass from raw tables to feature table.
//!
//! EXECUTION ORDER (fixed):
//!   1. Resolve inputs (required tables fail fast, credit card may be absent)
//!   2. Repayment aggregator
//!   3. Indebtedness aggregator
//!   4. Maturity aggregator
//!   5. Assembler
//!   6. Artifact write (caller-triggered)
//!
//! RULES:
//!   - Aggregators share no state and never read each other's output.
//!   - Inputs are never mutated.
//!   - Every stage is recorded in the run ledger.

use crate::{
    aggregator::Aggregator,
    assembler::FeatureAssembler,
    config::PipelineConfig,
    error::FeatureResult,
    event::{Notice, PipelineEvent},
    feature::FeatureTable,
    indebtedness::IndebtednessAggregator,
    maturity::MaturityAggregator,
    output,
    repayment::RepaymentAggregator,
    source::{InputSnapshot, SourceTable, TableSource},
    store::RunStore,
    types::{CustomerIndex, RunId},
};
use std::path::Path;

/// Fresh identifier for a run with no caller-supplied id.
pub fn new_run_id() -> RunId {
    format!("run-{}", uuid::Uuid::new_v4())
}

/// The result of one pipeline pass.
#[derive(Debug, Clone)]
pub struct FeatureRun {
    pub run_id:              RunId,
    pub table:               FeatureTable,
    pub notices:             Vec<Notice>,
    pub credit_card_present: bool,
}

pub struct FeaturePipeline {
    pub run_id: RunId,
    config:     PipelineConfig,
    store:      RunStore,
}

impl FeaturePipeline {
    /// Validate the config and open the run in the ledger. The store must
    /// already be migrated.
    pub fn new(run_id: RunId, config: PipelineConfig, store: RunStore) -> FeatureResult<Self> {
        config.validate()?;
        store.insert_run(&run_id, env!("CARGO_PKG_VERSION"))?;
        store.append_event(&run_id, "pipeline", &PipelineEvent::RunStarted { run_id: run_id.clone() })?;
        Ok(Self { run_id, config, store })
    }

    /// Default config over a fresh in-memory ledger.
    pub fn build_test(run_id: RunId) -> FeatureResult<Self> {
        Self::build_test_with(run_id, PipelineConfig::default())
    }

    pub fn build_test_with(run_id: RunId, config: PipelineConfig) -> FeatureResult<Self> {
        let store = RunStore::in_memory()?;
        store.migrate()?;
        Self::new(run_id, config, store)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &RunStore {
        &self.store
    }

    /// Load every table from `source`, then run. A missing required table
    /// marks the run failed and is returned before any aggregation.
    pub fn run_from_source<S: TableSource>(&self, source: &S) -> FeatureResult<FeatureRun> {
        match InputSnapshot::load(source) {
            Ok(snapshot) => self.run(&snapshot),
            Err(e) => {
                self.record_failure(&e.to_string())?;
                Err(e)
            }
        }
    }

    pub fn run(&self, snapshot: &InputSnapshot) -> FeatureResult<FeatureRun> {
        let mut notices = Vec::new();

        for table in SourceTable::ALL {
            match snapshot.row_count(table) {
                Some(rows) => self.record(
                    "source",
                    PipelineEvent::SourceLoaded { table: table.name().into(), rows },
                )?,
                None => {
                    let notice = Notice::OptionalSourceMissing { table: table.name().into() };
                    log::info!("{notice}");
                    self.record(
                        "source",
                        PipelineEvent::OptionalSourceMissing { table: table.name().into() },
                    )?;
                    notices.push(notice);
                }
            }
        }
        self.store
            .set_credit_card_source(&self.run_id, snapshot.credit_card.label())?;

        let repayment = self.run_stage(&RepaymentAggregator::new(), snapshot)?;
        let indebtedness = self.run_stage(&IndebtednessAggregator::from_config(&self.config), snapshot)?;
        let maturity = self.run_stage(&MaturityAggregator::from_config(&self.config), snapshot)?;

        let assembler = FeatureAssembler::new(self.config.fill_policy.clone());
        let table = assembler.assemble(&snapshot.applications, &repayment, &indebtedness, &maturity);
        log::info!(
            "Assembled {} feature rows ({} thin-file)",
            table.len(),
            table.thin_file_count()
        );
        self.record(
            "assembler",
            PipelineEvent::FeaturesAssembled {
                rows:            table.len(),
                thin_file_count: table.thin_file_count(),
            },
        )?;

        Ok(FeatureRun {
            run_id: self.run_id.clone(),
            table,
            notices,
            credit_card_present: snapshot.credit_card.is_present(),
        })
    }

    /// Persist the artifact and close the run. On a write failure the run is
    /// marked failed and no artifact is left at `path`.
    pub fn write(&self, run: &FeatureRun, path: impl AsRef<Path>) -> FeatureResult<()> {
        let path = path.as_ref();
        if let Err(e) = output::write_feature_table(&run.table, path) {
            self.record_failure(&e.to_string())?;
            return Err(e);
        }
        self.record(
            "output",
            PipelineEvent::ArtifactWritten {
                path: path.display().to_string(),
                rows: run.table.len(),
            },
        )?;
        self.store.complete_run(&self.run_id, run.table.len())
    }

    fn run_stage<A: Aggregator>(
        &self,
        aggregator: &A,
        snapshot: &InputSnapshot,
    ) -> FeatureResult<CustomerIndex<A::Summary>> {
        let index = aggregator.aggregate(snapshot);
        log::debug!("{} aggregated {} customers", aggregator.name(), index.len());
        self.record(
            aggregator.name(),
            PipelineEvent::AggregationCompleted {
                stage:     aggregator.name().into(),
                customers: index.len(),
            },
        )?;
        Ok(index)
    }

    fn record(&self, stage: &str, event: PipelineEvent) -> FeatureResult<()> {
        self.store.append_event(&self.run_id, stage, &event)
    }

    fn record_failure(&self, reason: &str) -> FeatureResult<()> {
        log::error!("Run {} failed: {reason}", self.run_id);
        self.record("pipeline", PipelineEvent::RunFailed { reason: reason.into() })?;
        self.store.fail_run(&self.run_id)
    }
}
