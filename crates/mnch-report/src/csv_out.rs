//! CSV rendering of the coverage tables and the reconciled country list.

use mnch_model::ReconciledRecord;

use crate::error::{ReportError, Result};
use crate::table::CoverageTable;

pub const SIMPLE_AVERAGE_FILE: &str = "simple_average_coverage.csv";
pub const WEIGHTED_AVERAGE_FILE: &str = "population_weighted_coverage.csv";
pub const RECONCILED_FILE: &str = "reconciled_countries.csv";

fn render<F>(file: &str, header: &[&str], fill: F) -> Result<String>
where
    F: FnOnce(&mut csv::Writer<Vec<u8>>) -> csv::Result<()>,
{
    let csv_error = |message: String| ReportError::Csv {
        file: file.to_string(),
        message,
    };
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(header)
        .and_then(|()| fill(&mut writer))
        .map_err(|e| csv_error(e.to_string()))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| csv_error(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| csv_error(e.to_string()))
}

/// `group,ANC4_mean,SBA_mean`
pub fn render_simple_average(table: &CoverageTable) -> Result<String> {
    render(
        SIMPLE_AVERAGE_FILE,
        &["group", "ANC4_mean", "SBA_mean"],
        |writer| {
            for row in &table.rows {
                writer.write_record([
                    row.group.label().to_string(),
                    row.anc4_mean.to_string(),
                    row.sba_mean.to_string(),
                ])?;
            }
            Ok(())
        },
    )
}

/// `group,ANC4_weighted_mean,SBA_weighted_mean`
pub fn render_weighted_average(table: &CoverageTable) -> Result<String> {
    render(
        WEIGHTED_AVERAGE_FILE,
        &["group", "ANC4_weighted_mean", "SBA_weighted_mean"],
        |writer| {
            for row in &table.rows {
                writer.write_record([
                    row.group.label().to_string(),
                    row.anc4_weighted_mean.to_string(),
                    row.sba_weighted_mean.to_string(),
                ])?;
            }
            Ok(())
        },
    )
}

/// One row per reconciled country, ascending by ISO3 code.
pub fn render_reconciled(records: &[ReconciledRecord]) -> Result<String> {
    render(
        RECONCILED_FILE,
        &[
            "iso3",
            "group",
            "status_label",
            "ANC4",
            "ANC4_year",
            "SBA",
            "SBA_year",
            "births_thousands",
        ],
        |writer| {
            for record in records {
                writer.write_record([
                    record.country_key.to_string(),
                    record.canonical_group.label().to_string(),
                    record.raw_status_label.clone(),
                    record.anc4_value.to_string(),
                    record.anc4_year.to_string(),
                    record.sba_value.to_string(),
                    record.sba_year.to_string(),
                    record.births_thousands.to_string(),
                ])?;
            }
            Ok(())
        },
    )
}
