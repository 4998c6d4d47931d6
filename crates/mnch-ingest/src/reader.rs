//! Tabular source reading into Polars DataFrames.
//!
//! CSV files go through the Polars CSV reader; spreadsheets (`xlsx`, `xlsm`,
//! `xls`, `ods`) go through calamine. Every column is materialized as text
//! so typed parsing happens in one place with row-level error messages.
//!
//! Row numbers are the ones a user sees when opening the source: the sheet
//! row for spreadsheets, the line number for CSV files.

use std::collections::BTreeSet;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use polars::prelude::*;

use mnch_model::TableSource;

use crate::error::{IngestError, Result};

const SPREADSHEET_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SPREADSHEET_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// A loaded source table.
#[derive(Debug, Clone)]
pub struct SourceFrame {
    pub df: DataFrame,
    /// 1-based source row number of each frame row.
    pub row_numbers: Vec<usize>,
}

impl SourceFrame {
    /// Source row number of frame row `idx`.
    pub fn row_number(&self, idx: usize) -> usize {
        self.row_numbers.get(idx).copied().unwrap_or(idx + 1)
    }
}

/// Reads a source table, dispatching on the file extension.
pub fn read_source_frame(path: &Path, source: &TableSource) -> Result<SourceFrame> {
    let frame = if is_spreadsheet(path) {
        read_spreadsheet(path, source)?
    } else {
        let df = read_csv(path, source.skip_rows)?;
        // Skipped lines, then the header line, then one line per record.
        let row_numbers = (0..df.height())
            .map(|idx| source.skip_rows + idx + 2)
            .collect();
        SourceFrame { df, row_numbers }
    };
    tracing::debug!(
        path = %path.display(),
        rows = frame.df.height(),
        columns = frame.df.width(),
        "source table loaded"
    );
    Ok(frame)
}

/// Reads a CSV file with every column typed as String.
pub fn read_csv(path: &Path, skip_rows: usize) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_skip_rows(skip_rows)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Reads one worksheet into a DataFrame.
///
/// `source.skip_rows` counts sheet rows from the top of the sheet, even when
/// the used range starts further down. Blank rows below the header are
/// dropped; the remaining rows keep their sheet row numbers.
pub fn read_spreadsheet(path: &Path, source: &TableSource) -> Result<SourceFrame> {
    let workbook_error = |message: String| IngestError::Workbook {
        path: path.to_path_buf(),
        message,
    };
    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;

    let sheet_names = workbook.sheet_names();
    let sheet = match &source.sheet {
        Some(name) => sheet_names
            .iter()
            .find(|candidate| candidate.trim().eq_ignore_ascii_case(name.trim()))
            .cloned()
            .ok_or_else(|| IngestError::SheetNotFound {
                sheet: name.clone(),
                path: path.to_path_buf(),
            })?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| workbook_error("workbook contains no sheets".to_string()))?,
    };

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| workbook_error(format!("sheet '{sheet}': {e}")))?;

    let start_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let skip = source.skip_rows.saturating_sub(start_row);

    let mut rows = range
        .rows()
        .enumerate()
        .skip(skip)
        .map(|(offset, row)| {
            let cells = row.iter().map(cell_to_string).collect::<Vec<_>>();
            (start_row + offset + 1, cells)
        });
    let Some((_, header)) = rows.next() else {
        return Err(IngestError::EmptyTable {
            path: path.to_path_buf(),
        });
    };
    let (row_numbers, body): (Vec<usize>, Vec<Vec<String>>) = rows
        .filter(|(_, cells)| cells.iter().any(|cell| !cell.is_empty()))
        .unzip();

    Ok(SourceFrame {
        df: frame_from_rows(&header, &body)?,
        row_numbers,
    })
}

/// Converts a spreadsheet cell to its text form.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(n) => n.to_string(),
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                n.to_string()
            }
        }
        other => other.to_string(),
    }
}

/// Builds a String-typed frame from a header and data rows.
///
/// Blank header cells become `column_<n>`; repeated names get a numeric
/// suffix so Polars accepts the frame.
pub fn frame_from_rows(header: &[String], rows: &[Vec<String>]) -> Result<DataFrame> {
    let mut seen = BTreeSet::new();
    let mut names = Vec::with_capacity(header.len());
    for (idx, raw) in header.iter().enumerate() {
        let base = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        let base = if base.is_empty() {
            format!("column_{}", idx + 1)
        } else {
            base
        };
        let mut name = base.clone();
        let mut suffix = 2;
        while !seen.insert(name.to_uppercase()) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        names.push(name);
    }

    let columns: Vec<Column> = names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let values: Vec<String> = rows
                .iter()
                .map(|row| row.get(idx).cloned().unwrap_or_default())
                .collect();
            Series::new(name.as_str().into(), values).into_column()
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn csv_columns_are_read_as_text() {
        let file = create_temp_csv("ISO3Code,Year\nAFG,2020\nALB,2021\n");
        let df = read_csv(file.path(), 0).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("Year").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn csv_skip_rows_moves_the_header() {
        let file = create_temp_csv("Title line\nnote\nA,B\n1,2\n");
        let df = read_csv(file.path(), 2).unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn frame_from_rows_dedupes_and_fills_names() {
        let header = vec!["Year".to_string(), "".to_string(), "year".to_string()];
        let rows = vec![vec!["2020".to_string(), "x".to_string()]];
        let df = frame_from_rows(&header, &rows).unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["Year", "column_2", "year_2"]);
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn spreadsheet_extension_detection() {
        assert!(is_spreadsheet(Path::new("status.XLSX")));
        assert!(is_spreadsheet(Path::new("wpp.ods")));
        assert!(!is_spreadsheet(Path::new("ANC4.CSV")));
    }

    #[test]
    fn missing_workbook_is_reported() {
        let source = TableSource {
            file: "nope.xlsx".to_string(),
            sheet: None,
            skip_rows: 0,
            key_column: "ISO3Code".to_string(),
            key_extraction: mnch_model::KeyExtraction::Iso3,
            key_delimiter: ':',
            on_unknown_country: mnch_model::UnknownCountryPolicy::Fail,
        };
        let err = read_spreadsheet(Path::new("/no/such/nope.xlsx"), &source).unwrap_err();
        assert!(matches!(err, IngestError::Workbook { .. }));
    }
}
