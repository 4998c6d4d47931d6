//! Markdown narrative comparing on-track and off-track coverage.

use chrono::SecondsFormat;

use mnch_model::{Indicator, StatusGroup};

use crate::ReportInput;
use crate::table::{CoverageRow, CoverageTable};

pub const NARRATIVE_FILE: &str = "coverage_report.md";

fn pct(value: f64) -> String {
    format!("{value:.1}%")
}

fn indicator_name(indicator: Indicator) -> &'static str {
    match indicator {
        Indicator::Anc4 => "antenatal care (4+ visits)",
        Indicator::Sba => "skilled birth attendance",
    }
}

fn group_table(table: &CoverageTable, births_year: i32) -> Vec<String> {
    let mut lines = vec![
        format!(
            "| Group | Countries | Births {births_year} (thousands) | ANC4 mean | ANC4 weighted | SBA mean | SBA weighted |"
        ),
        "|---|---:|---:|---:|---:|---:|---:|".to_string(),
    ];
    for row in &table.rows {
        lines.push(format!(
            "| {} | {} | {:.0} | {} | {} | {} | {} |",
            row.group,
            row.country_count,
            row.total_births_thousands,
            pct(row.anc4_mean),
            pct(row.anc4_weighted_mean),
            pct(row.sba_mean),
            pct(row.sba_weighted_mean),
        ));
    }
    lines
}

fn group_gap(indicator: Indicator, on: &CoverageRow, off: &CoverageRow) -> String {
    let gap = on.weighted(indicator) - off.weighted(indicator);
    let direction = if gap >= 0.0 { "above" } else { "below" };
    format!(
        "- **{indicator}**: on-track countries reach {} {} coverage (birth-weighted) against {} \
         for off-track countries, {:.1} percentage points {direction}. Unweighted: {} vs {}.",
        pct(on.weighted(indicator)),
        indicator_name(indicator),
        pct(off.weighted(indicator)),
        gap.abs(),
        pct(on.simple(indicator)),
        pct(off.simple(indicator)),
    )
}

fn weighting_effect(indicator: Indicator, row: &CoverageRow) -> Option<String> {
    let shift = row.weighted(indicator) - row.simple(indicator);
    if shift.abs() < 0.05 {
        return None;
    }
    let (direction, meaning) = if shift > 0.0 {
        ("raises", "higher")
    } else {
        ("lowers", "lower")
    };
    Some(format!(
        "- Weighting by births {direction} the {} {indicator} mean by {:.1} points: \
         countries with more births have {meaning} coverage.",
        row.group,
        shift.abs(),
    ))
}

/// Renders the narrative report.
pub fn render_narrative(input: &ReportInput<'_>, table: &CoverageTable) -> String {
    let window = input.config.window;
    let diagnostics = &input.reconciliation.diagnostics;
    let mut lines = vec![
        "# Maternal and newborn service coverage by U5MR status".to_string(),
        String::new(),
        format!(
            "Generated {} from `{}`.",
            input.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            input.input_dir.display()
        ),
        String::new(),
        "## Data".to_string(),
        String::new(),
        format!(
            "- Latest ANC4 and SBA observation per country within {}-{}; births projected for {}.",
            window.year_min, window.year_max, window.births_year
        ),
        format!(
            "- {} countries present in all four sources.",
            input.reconciliation.records.len()
        ),
    ];
    for stage in &diagnostics.stages {
        if stage.dropped_count() > 0 {
            lines.push(format!(
                "- Joining {} dropped {} countries ({} without a match in {}, {} only in {}).",
                stage.stage,
                stage.dropped_count(),
                stage.left_only.len(),
                stage.stage,
                stage.right_only.len(),
                stage.stage,
            ));
        }
    }
    for report in input.key_reports.iter().filter(|r| r.dropped > 0) {
        lines.push(format!(
            "- {} rows of {} had identifiers that are not countries (regional or other aggregates) and were skipped.",
            report.dropped, report.source
        ));
    }

    lines.push(String::new());
    lines.push("## Coverage by group".to_string());
    lines.push(String::new());
    if table.is_empty() {
        lines.push("No country matched across all sources; no averages were computed.".to_string());
    } else {
        lines.extend(group_table(table, window.births_year));
    }

    lines.push(String::new());
    lines.push("## Findings".to_string());
    lines.push(String::new());
    match (
        table.row(StatusGroup::OnTrack),
        table.row(StatusGroup::OffTrack),
    ) {
        (Some(on), Some(off)) => {
            for indicator in Indicator::ALL {
                lines.push(group_gap(indicator, on, off));
            }
        }
        _ => lines.push(
            "- Only one status group is represented, so no group comparison is possible."
                .to_string(),
        ),
    }
    for row in &table.rows {
        for indicator in Indicator::ALL {
            if let Some(line) = weighting_effect(indicator, row) {
                lines.push(line);
            }
        }
    }

    lines.push(String::new());
    lines.push("## Caveats".to_string());
    lines.push(String::new());
    lines.push(
        "- Observation years differ between countries; each country contributes its latest \
         in-window survey."
            .to_string(),
    );
    lines.push(
        "- Countries missing from any source are excluded, not imputed, so group means cover \
         only the reconciled countries."
            .to_string(),
    );
    if table.row(StatusGroup::Unknown).is_some() {
        lines.push(
            "- Countries whose status label is not in the classification table are reported \
             in the Unknown group."
                .to_string(),
        );
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}
