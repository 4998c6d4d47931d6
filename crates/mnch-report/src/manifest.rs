//! `run_summary.json`: what the run read, dropped and produced.

use std::collections::BTreeMap;

use chrono::SecondsFormat;
use serde::Serialize;

use mnch_model::{GroupAggregate, Indicator, LatestIndicator, PolicyConfig, WindowConfig};
use mnch_transform::KeyReport;

use crate::ReportInput;
use crate::error::Result;

pub const RUN_SUMMARY_FILE: &str = "run_summary.json";

/// Dropped countries of one join stage.
#[derive(Debug, Clone, Serialize)]
pub struct StageSummary {
    pub stage: String,
    pub dropped: usize,
    pub left_only: Vec<String>,
    pub right_only: Vec<String>,
}

/// Latest-observation years of one indicator, before the join.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionSummary {
    pub indicator: Indicator,
    /// Countries with at least one in-window observation.
    pub countries: usize,
    /// Countries per year of their latest observation.
    pub latest_years: BTreeMap<i32, usize>,
}

impl SelectionSummary {
    fn per_indicator(latest: &[LatestIndicator]) -> Vec<Self> {
        Indicator::ALL
            .iter()
            .map(|&indicator| {
                let mut latest_years = BTreeMap::new();
                let mut countries = 0;
                for row in latest.iter().filter(|row| row.indicator == indicator) {
                    countries += 1;
                    *latest_years.entry(row.year).or_insert(0) += 1;
                }
                Self {
                    indicator,
                    countries,
                    latest_years,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: String,
    pub input_dir: String,
    pub window: WindowConfig,
    pub policy: PolicyConfig,
    pub key_normalization: Vec<KeyReport>,
    pub selection: Vec<SelectionSummary>,
    pub join_stages: Vec<StageSummary>,
    pub reconciled_countries: usize,
    pub aggregates: Vec<GroupAggregate>,
}

impl RunSummary {
    pub fn from_input(input: &ReportInput<'_>) -> Self {
        Self {
            generated_at: input
                .generated_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            input_dir: input.input_dir.display().to_string(),
            window: input.config.window,
            policy: input.config.policy,
            key_normalization: input.key_reports.to_vec(),
            selection: SelectionSummary::per_indicator(input.latest),
            join_stages: input
                .reconciliation
                .diagnostics
                .stages
                .iter()
                .map(|stage| StageSummary {
                    stage: stage.stage.clone(),
                    dropped: stage.dropped_count(),
                    left_only: stage.left_only.iter().map(ToString::to_string).collect(),
                    right_only: stage.right_only.iter().map(ToString::to_string).collect(),
                })
                .collect(),
            reconciled_countries: input.reconciliation.records.len(),
            aggregates: input.aggregates.to_vec(),
        }
    }

    pub fn render(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}
