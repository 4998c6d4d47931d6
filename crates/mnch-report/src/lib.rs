//! Output generation for the coverage pipeline.
//!
//! - **Coverage tables**: simple and birth-weighted group means as CSV
//! - **Reconciled countries**: the joined per-country table as CSV
//! - **Run summary**: window, policies, drops and aggregates as JSON
//! - **Narrative**: Markdown comparison of on-track and off-track groups
//!
//! Everything is rendered in memory by [`render_outputs`] and persisted by
//! [`write_outputs`].

mod csv_out;
mod error;
mod manifest;
mod narrative;
mod table;
mod writer;

use std::path::Path;

use chrono::{DateTime, Utc};

use mnch_model::{GroupAggregate, LatestIndicator, PipelineConfig};
use mnch_transform::{KeyReport, Reconciliation};

pub use csv_out::{
    RECONCILED_FILE, SIMPLE_AVERAGE_FILE, WEIGHTED_AVERAGE_FILE, render_reconciled,
    render_simple_average, render_weighted_average,
};
pub use error::{ReportError, Result};
pub use manifest::{RUN_SUMMARY_FILE, RunSummary, SelectionSummary, StageSummary};
pub use narrative::{NARRATIVE_FILE, render_narrative};
pub use table::{CoverageRow, CoverageTable};
pub use writer::{OutputSet, RenderedFile, write_outputs};

/// Everything a run hands to the report stage.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub generated_at: DateTime<Utc>,
    pub input_dir: &'a Path,
    pub config: &'a PipelineConfig,
    pub key_reports: &'a [KeyReport],
    /// Latest in-window observation per country and indicator, before the join.
    pub latest: &'a [LatestIndicator],
    pub reconciliation: &'a Reconciliation,
    pub aggregates: &'a [GroupAggregate],
}

/// Renders the full output set without touching the filesystem.
pub fn render_outputs(input: &ReportInput<'_>) -> Result<OutputSet> {
    let table = CoverageTable::from_aggregates(input.aggregates);
    let files = vec![
        RenderedFile {
            name: SIMPLE_AVERAGE_FILE,
            contents: render_simple_average(&table)?,
        },
        RenderedFile {
            name: WEIGHTED_AVERAGE_FILE,
            contents: render_weighted_average(&table)?,
        },
        RenderedFile {
            name: RECONCILED_FILE,
            contents: render_reconciled(&input.reconciliation.records)?,
        },
        RenderedFile {
            name: RUN_SUMMARY_FILE,
            contents: RunSummary::from_input(input).render()?,
        },
        RenderedFile {
            name: NARRATIVE_FILE,
            contents: render_narrative(input, &table),
        },
    ];
    Ok(OutputSet { files })
}
