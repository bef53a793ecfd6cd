//! Pipeline events: what the run ledger records.
//!
//! Variants are appended only; the snake_case tag is stored in the
//! `event_type` column.

use crate::types::RunId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    RunStarted {
        run_id: RunId,
    },
    SourceLoaded {
        table: String,
        rows:  usize,
    },
    OptionalSourceMissing {
        table: String,
    },
    AggregationCompleted {
        stage:     String,
        customers: usize,
    },
    FeaturesAssembled {
        rows:            usize,
        thin_file_count: usize,
    },
    ArtifactWritten {
        path: String,
        rows: usize,
    },
    RunFailed {
        reason: String,
    },
}

impl PipelineEvent {
    /// Stable name for the `event_type` column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RunStarted { .. }            => "run_started",
            Self::SourceLoaded { .. }          => "source_loaded",
            Self::OptionalSourceMissing { .. } => "optional_source_missing",
            Self::AggregationCompleted { .. }  => "aggregation_completed",
            Self::FeaturesAssembled { .. }     => "features_assembled",
            Self::ArtifactWritten { .. }       => "artifact_written",
            Self::RunFailed { .. }             => "run_failed",
        }
    }
}

/// A ledger row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub run_id:     RunId,
    pub stage:      String,
    pub event_type: String,
    pub payload:    String,
}

/// Caller-facing notice for a recovered, non-fatal condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    OptionalSourceMissing { table: String },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OptionalSourceMissing { table } => write!(
                f,
                "{table} not available; skipping credit card utilization features"
            ),
        }
    }
}
