//! Typed row extraction for the four pipeline sources.

use std::path::{Path, PathBuf};

use tracing::debug;

use mnch_model::{
    BirthsSource, IndicatorSource, RawBirths, RawObservation, RawStatus, StatusSource,
};

use crate::discovery::{SourceKind, resolve_source};
use crate::error::{IngestError, Result};
use crate::polars_utils::{
    column_trimmed_values, is_missing, parse_f64, parse_year, resolve_column,
};
use crate::reader::{SourceFrame, read_source_frame};

/// Rows read from one source.
#[derive(Debug, Clone)]
pub struct SourceRows<T> {
    pub kind: SourceKind,
    pub path: PathBuf,
    pub rows: Vec<T>,
    /// Rows skipped for a blank key or a missing value.
    pub skipped: usize,
}

struct Columns<'a> {
    kind: SourceKind,
    path: &'a Path,
    frame: &'a SourceFrame,
}

impl Columns<'_> {
    fn row_number(&self, idx: usize) -> usize {
        self.frame.row_number(idx)
    }

    fn values(&self, configured: &str) -> Result<Vec<String>> {
        let missing = || IngestError::MissingColumn {
            column: configured.to_string(),
            path: self.path.to_path_buf(),
            available: self
                .frame
                .df
                .get_column_names()
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        };
        let name = resolve_column(&self.frame.df, configured).ok_or_else(missing)?;
        column_trimmed_values(&self.frame.df, &name).ok_or_else(missing)
    }

    fn invalid(&self, column: &str, value: &str, row: usize) -> IngestError {
        IngestError::InvalidValue {
            source_name: self.kind.to_string(),
            column: column.to_string(),
            value: value.to_string(),
            row,
        }
    }

    fn year(&self, column: &str, value: &str, row: usize) -> Result<i32> {
        parse_year(value).ok_or_else(|| self.invalid(column, value, row))
    }

    fn number(&self, column: &str, value: &str, row: usize) -> Result<f64> {
        parse_f64(value)
            .filter(|v| v.is_finite())
            .ok_or_else(|| self.invalid(column, value, row))
    }
}

/// Reads an indicator series (ANC4 or SBA).
pub fn read_indicator_rows(
    input_dir: &Path,
    kind: SourceKind,
    source: &IndicatorSource,
) -> Result<SourceRows<RawObservation>> {
    let path = resolve_source(input_dir, kind, &source.table)?;
    let frame = read_source_frame(&path, &source.table)?;
    let columns = Columns {
        kind,
        path: &path,
        frame: &frame,
    };
    let keys = columns.values(&source.table.key_column)?;
    let years = columns.values(&source.year_column)?;
    let values = columns.values(&source.value_column)?;

    let mut rows = Vec::with_capacity(keys.len());
    let mut skipped = 0usize;
    for (idx, ((key, year), value)) in keys.iter().zip(&years).zip(&values).enumerate() {
        let row = columns.row_number(idx);
        if key.is_empty() || is_missing(value) {
            skipped += 1;
            continue;
        }
        rows.push(RawObservation {
            raw_key: key.clone(),
            year: columns.year(&source.year_column, year, row)?,
            value: columns.number(&source.value_column, value, row)?,
            row,
        });
    }
    debug!(source = %kind, rows = rows.len(), skipped, "indicator rows read");
    Ok(SourceRows {
        kind,
        path,
        rows,
        skipped,
    })
}

/// Reads the status classification table.
pub fn read_status_rows(input_dir: &Path, source: &StatusSource) -> Result<SourceRows<RawStatus>> {
    let kind = SourceKind::Status;
    let path = resolve_source(input_dir, kind, &source.table)?;
    let frame = read_source_frame(&path, &source.table)?;
    let columns = Columns {
        kind,
        path: &path,
        frame: &frame,
    };
    let keys = columns.values(&source.table.key_column)?;
    let labels = columns.values(&source.status_column)?;

    let mut rows = Vec::with_capacity(keys.len());
    let mut skipped = 0usize;
    for (idx, (key, label)) in keys.iter().zip(&labels).enumerate() {
        if key.is_empty() {
            skipped += 1;
            continue;
        }
        rows.push(RawStatus {
            raw_key: key.clone(),
            label: label.clone(),
            row: columns.row_number(idx),
        });
    }
    debug!(source = %kind, rows = rows.len(), skipped, "status rows read");
    Ok(SourceRows {
        kind,
        path,
        rows,
        skipped,
    })
}

/// Reads the demographic projection table (all years).
pub fn read_birth_rows(input_dir: &Path, source: &BirthsSource) -> Result<SourceRows<RawBirths>> {
    let kind = SourceKind::Births;
    let path = resolve_source(input_dir, kind, &source.table)?;
    let frame = read_source_frame(&path, &source.table)?;
    let columns = Columns {
        kind,
        path: &path,
        frame: &frame,
    };
    let keys = columns.values(&source.table.key_column)?;
    let years = columns.values(&source.year_column)?;
    let births = columns.values(&source.births_column)?;

    let mut rows = Vec::with_capacity(keys.len());
    let mut skipped = 0usize;
    for (idx, ((key, year), value)) in keys.iter().zip(&years).zip(&births).enumerate() {
        let row = columns.row_number(idx);
        if key.is_empty() || is_missing(value) {
            skipped += 1;
            continue;
        }
        rows.push(RawBirths {
            raw_key: key.clone(),
            year: columns.year(&source.year_column, year, row)?,
            births_thousands: columns.number(&source.births_column, value, row)?,
            row,
        });
    }
    debug!(source = %kind, rows = rows.len(), skipped, "births rows read");
    Ok(SourceRows {
        kind,
        path,
        rows,
        skipped,
    })
}
