//! SQLite run ledger.
//!
//! RULE: only store.rs talks to the database.
//! The ledger records what a run did; it never feeds the feature table.

use crate::{
    error::FeatureResult,
    event::{EventLogEntry, PipelineEvent},
};
use rusqlite::{params, Connection, OptionalExtension};

pub struct RunStore {
    conn: Connection,
}

/// One `pipeline_run` row.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub run_id:             String,
    pub version:            String,
    pub started_at:         String,
    pub finished_at:        Option<String>,
    pub status:             String,
    pub credit_card_source: Option<String>,
    pub row_count:          Option<i64>,
}

impl RunStore {
    pub fn open(path: &str) -> FeatureResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> FeatureResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    pub fn migrate(&self) -> FeatureResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_run_ledger.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, version: &str) -> FeatureResult<()> {
        self.conn.execute(
            "INSERT INTO pipeline_run (run_id, version, started_at, status)
             VALUES (?1, ?2, ?3, 'running')",
            params![run_id, version, now()],
        )?;
        Ok(())
    }

    pub fn set_credit_card_source(&self, run_id: &str, availability: &str) -> FeatureResult<()> {
        self.conn.execute(
            "UPDATE pipeline_run SET credit_card_source = ?1 WHERE run_id = ?2",
            params![availability, run_id],
        )?;
        Ok(())
    }

    pub fn complete_run(&self, run_id: &str, row_count: usize) -> FeatureResult<()> {
        self.conn.execute(
            "UPDATE pipeline_run
             SET status = 'completed', finished_at = ?1, row_count = ?2
             WHERE run_id = ?3",
            params![now(), row_count as i64, run_id],
        )?;
        Ok(())
    }

    pub fn fail_run(&self, run_id: &str) -> FeatureResult<()> {
        self.conn.execute(
            "UPDATE pipeline_run SET status = 'failed', finished_at = ?1 WHERE run_id = ?2",
            params![now(), run_id],
        )?;
        Ok(())
    }

    pub fn get_run(&self, run_id: &str) -> FeatureResult<Option<RunRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT run_id, version, started_at, finished_at, status,
                        credit_card_source, row_count
                 FROM pipeline_run WHERE run_id = ?1",
                params![run_id],
                |row| {
                    Ok(RunRecord {
                        run_id:             row.get(0)?,
                        version:            row.get(1)?,
                        started_at:         row.get(2)?,
                        finished_at:        row.get(3)?,
                        status:             row.get(4)?,
                        credit_card_source: row.get(5)?,
                        row_count:          row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, run_id: &str, stage: &str, event: &PipelineEvent) -> FeatureResult<()> {
        let payload = serde_json::to_string(event)?;
        self.conn.execute(
            "INSERT INTO pipeline_event (run_id, stage, event_type, payload, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![run_id, stage, event.type_name(), payload, now()],
        )?;
        Ok(())
    }

    pub fn events_for_run(&self, run_id: &str) -> FeatureResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, stage, event_type, payload
             FROM pipeline_event WHERE run_id = ?1 ORDER BY id",
        )?;
        let entries = stmt
            .query_map(params![run_id], |row| {
                Ok(EventLogEntry {
                    id:         Some(row.get(0)?),
                    run_id:     row.get(1)?,
                    stage:      row.get(2)?,
                    event_type: row.get(3)?,
                    payload:    row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Decode the payloads of a run's events, in order.
    pub fn decoded_events(&self, run_id: &str) -> FeatureResult<Vec<PipelineEvent>> {
        self.events_for_run(run_id)?
            .iter()
            .map(|e| serde_json::from_str(&e.payload).map_err(Into::into))
            .collect()
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}
