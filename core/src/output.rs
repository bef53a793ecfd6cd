//! Feature table artifact: a flat CSV file.
//!
//! The table is written to a sibling `.partial` file first and renamed into
//! place, so a failed write never leaves a half-written artifact behind.

use crate::{error::FeatureResult, feature::FeatureTable};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Serialize the table as CSV into any writer. Nulls become empty fields.
pub fn write_csv<W: Write>(table: &FeatureTable, writer: W) -> FeatureResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(FeatureTable::header())?;
    for row in &table.rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// The artifact as bytes, exactly as `write_feature_table` would store it.
pub fn to_csv_bytes(table: &FeatureTable) -> FeatureResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer)?;
    Ok(buffer)
}

/// Persist the table at `path`, creating the parent directory if needed.
pub fn write_feature_table(table: &FeatureTable, path: impl AsRef<Path>) -> FeatureResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let staging = staging_path(path);
    let result: FeatureResult<()> = File::create(&staging)
        .map_err(Into::into)
        .and_then(|file| write_csv(table, file));
    if let Err(e) = result {
        let _ = fs::remove_file(&staging);
        return Err(e);
    }

    if let Err(e) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(e.into());
    }
    log::info!("Feature table ({} rows) saved to {}", table.len(), path.display());
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}
