//! Input tables and the storage seam.
//!
//! RULE: all four tables are resolved once, before any aggregation.
//! A missing required table aborts the run; a missing credit-card table
//! becomes `CreditCardSource::Absent` and the run continues.

use crate::{
    config::SourceFiles,
    error::{FeatureError, FeatureResult},
    records::{
        ApplicationRecord, BureauRecord, CreditCardBalanceRecord, CreditCardSource,
        InstallmentRecord,
    },
};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceTable {
    Application,
    Installments,
    Bureau,
    CreditCardBalance,
}

impl SourceTable {
    pub const ALL: [SourceTable; 4] = [
        Self::Application,
        Self::Installments,
        Self::Bureau,
        Self::CreditCardBalance,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Application       => "application",
            Self::Installments      => "installments_payments",
            Self::Bureau            => "bureau",
            Self::CreditCardBalance => "credit_card_balance",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, Self::CreditCardBalance)
    }
}

/// Anything that can hand over a table by name.
pub trait TableSource {
    /// `Ok(None)` when the table cannot be supplied at all. Malformed
    /// content is an error.
    fn read_table<T: DeserializeOwned>(&self, table: SourceTable) -> FeatureResult<Option<Vec<T>>>;

    /// Human-readable location of a table, for error messages.
    fn describe(&self, table: SourceTable) -> String {
        table.name().to_string()
    }
}

/// A directory holding one CSV file per table.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    root:  PathBuf,
    files: SourceFiles,
}

impl CsvDirectory {
    pub fn new(root: impl Into<PathBuf>, files: SourceFiles) -> Self {
        Self { root: root.into(), files }
    }

    pub fn path_for(&self, table: SourceTable) -> PathBuf {
        let file = match table {
            SourceTable::Application       => &self.files.application,
            SourceTable::Installments      => &self.files.installments,
            SourceTable::Bureau            => &self.files.bureau,
            SourceTable::CreditCardBalance => &self.files.credit_card_balance,
        };
        self.root.join(file)
    }
}

impl TableSource for CsvDirectory {
    fn read_table<T: DeserializeOwned>(&self, table: SourceTable) -> FeatureResult<Option<Vec<T>>> {
        let path = self.path_for(table);
        if !path.is_file() {
            return Ok(None);
        }
        read_csv(&path).map(Some)
    }

    fn describe(&self, table: SourceTable) -> String {
        self.path_for(table).display().to_string()
    }
}

/// Deserialize every row of a headered CSV file by column name.
/// Extra columns are ignored; empty fields read as `None`.
pub fn read_csv<T: DeserializeOwned>(path: &Path) -> FeatureResult<Vec<T>> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()?;
    log::debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// The full, immutable input set for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSnapshot {
    pub applications: Vec<ApplicationRecord>,
    pub installments: Vec<InstallmentRecord>,
    pub bureau:       Vec<BureauRecord>,
    pub credit_card:  CreditCardSource,
}

impl InputSnapshot {
    pub fn new(
        applications: Vec<ApplicationRecord>,
        installments: Vec<InstallmentRecord>,
        bureau: Vec<BureauRecord>,
        credit_card: CreditCardSource,
    ) -> Self {
        Self { applications, installments, bureau, credit_card }
    }

    /// Resolve every table from `source`. Required tables are read first so
    /// a missing one fails before any other work.
    pub fn load<S: TableSource>(source: &S) -> FeatureResult<Self> {
        let applications = load_required(source, SourceTable::Application)?;
        let installments = load_required(source, SourceTable::Installments)?;
        let bureau = load_required(source, SourceTable::Bureau)?;
        let credit_card: CreditCardSource = source
            .read_table::<CreditCardBalanceRecord>(SourceTable::CreditCardBalance)?
            .into();

        Ok(Self { applications, installments, bureau, credit_card })
    }

    /// Same inputs with the optional credit-card table removed.
    pub fn without_credit_card(&self) -> Self {
        Self { credit_card: CreditCardSource::Absent, ..self.clone() }
    }

    pub fn row_count(&self, table: SourceTable) -> Option<usize> {
        match table {
            SourceTable::Application  => Some(self.applications.len()),
            SourceTable::Installments => Some(self.installments.len()),
            SourceTable::Bureau       => Some(self.bureau.len()),
            SourceTable::CreditCardBalance => match &self.credit_card {
                CreditCardSource::Present(rows) => Some(rows.len()),
                CreditCardSource::Absent        => None,
            },
        }
    }
}

fn load_required<S: TableSource, T: DeserializeOwned>(
    source: &S,
    table: SourceTable,
) -> FeatureResult<Vec<T>> {
    source
        .read_table(table)?
        .ok_or_else(|| FeatureError::MissingRequiredSource {
            table: table.name().to_string(),
            path:  source.describe(table),
        })
}
