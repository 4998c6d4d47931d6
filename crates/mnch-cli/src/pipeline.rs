//! Pipeline stage functions.
//!
//! Each stage runs inside its own `info_span!` and reports a `duration_ms`
//! when it completes. Stages are plain functions so they can be driven by
//! the CLI commands and exercised directly in tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{info, info_span};

use mnch_ingest::{
    SourceKind, SourceRows, read_birth_rows, read_indicator_rows, read_status_rows,
};
use mnch_model::{
    BirthProjection, CountryKey, CountryStatus, GroupAggregate, Indicator, IndicatorObservation,
    LatestIndicator, PipelineConfig, RawBirths, RawObservation, RawStatus,
};
use mnch_report::{OutputSet, ReportInput, render_outputs, write_outputs};
use mnch_transform::{
    KeyReport, Reconciliation, StatusClassifier, YearWindow, aggregate, prepare_births,
    latest_indicators, prepare_indicator, prepare_statuses, reconcile, select_latest,
};

/// Row counts of one loaded source.
#[derive(Debug, Clone)]
pub struct SourceCount {
    pub kind: SourceKind,
    pub path: PathBuf,
    pub rows: usize,
    pub skipped: usize,
}

impl SourceCount {
    fn of<T>(rows: &SourceRows<T>) -> Self {
        Self {
            kind: rows.kind,
            path: rows.path.clone(),
            rows: rows.rows.len(),
            skipped: rows.skipped,
        }
    }
}

/// Raw rows of the four sources.
#[derive(Debug, Clone)]
pub struct IngestResult {
    pub anc4: Vec<RawObservation>,
    pub sba: Vec<RawObservation>,
    pub status: Vec<RawStatus>,
    pub births: Vec<RawBirths>,
    pub counts: Vec<SourceCount>,
}

/// Reads every configured source from `input_dir`.
pub fn ingest(input_dir: &Path, config: &PipelineConfig) -> Result<IngestResult> {
    let span = info_span!("ingest", input_dir = %input_dir.display());
    let _guard = span.enter();
    let start = Instant::now();
    let sources = &config.sources;

    let anc4 = read_indicator_rows(input_dir, SourceKind::Anc4, &sources.anc4)
        .context("ingest ANC4")?;
    let sba =
        read_indicator_rows(input_dir, SourceKind::Sba, &sources.sba).context("ingest SBA")?;
    let status = read_status_rows(input_dir, &sources.status).context("ingest status")?;
    let births = read_birth_rows(input_dir, &sources.births).context("ingest births")?;

    let counts = vec![
        SourceCount::of(&anc4),
        SourceCount::of(&sba),
        SourceCount::of(&status),
        SourceCount::of(&births),
    ];
    info!(
        anc4_rows = anc4.rows.len(),
        sba_rows = sba.rows.len(),
        status_rows = status.rows.len(),
        births_rows = births.rows.len(),
        skipped = counts.iter().map(|c| c.skipped).sum::<usize>(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(IngestResult {
        anc4: anc4.rows,
        sba: sba.rows,
        status: status.rows,
        births: births.rows,
        counts,
    })
}

/// Keyed indicator series and births.
#[derive(Debug, Clone)]
pub struct NormalizedSources {
    pub anc4: Vec<IndicatorObservation>,
    pub sba: Vec<IndicatorObservation>,
    pub births: BTreeMap<CountryKey, BirthProjection>,
    pub reports: Vec<KeyReport>,
}

/// Normalizes country keys of the indicator and births sources.
pub fn normalize(raw: &IngestResult, config: &PipelineConfig) -> Result<NormalizedSources> {
    let span = info_span!("normalize");
    let _guard = span.enter();
    let start = Instant::now();
    let sources = &config.sources;

    let (anc4, anc4_report) =
        prepare_indicator("ANC4", &raw.anc4, &sources.anc4.table, &config.aliases)
            .context("normalize ANC4 keys")?;
    let (sba, sba_report) =
        prepare_indicator("SBA", &raw.sba, &sources.sba.table, &config.aliases)
            .context("normalize SBA keys")?;
    let (births, births_report) = prepare_births(
        &raw.births,
        &sources.births.table,
        &config.aliases,
        config.window.births_year,
    )
    .context("normalize births keys")?;

    info!(
        anc4 = anc4.len(),
        sba = sba.len(),
        births = births.len(),
        births_year = config.window.births_year,
        duration_ms = start.elapsed().as_millis(),
        "normalize complete"
    );
    Ok(NormalizedSources {
        anc4,
        sba,
        births,
        reports: vec![anc4_report, sba_report, births_report],
    })
}

/// Latest in-window observation per country for both indicators.
#[derive(Debug, Clone)]
pub struct LatestSelection {
    pub anc4: BTreeMap<CountryKey, IndicatorObservation>,
    pub sba: BTreeMap<CountryKey, IndicatorObservation>,
    /// Both selections tagged with their indicator: ANC4 rows, then SBA.
    pub indicators: Vec<LatestIndicator>,
}

pub fn select(normalized: &NormalizedSources, config: &PipelineConfig) -> Result<LatestSelection> {
    let span = info_span!(
        "select",
        year_min = config.window.year_min,
        year_max = config.window.year_max
    );
    let _guard = span.enter();
    let start = Instant::now();
    let window = YearWindow::from_config(&config.window).context("select year window")?;
    let anc4 = select_latest(&normalized.anc4, window);
    let sba = select_latest(&normalized.sba, window);
    let mut indicators = latest_indicators(Indicator::Anc4, &anc4);
    indicators.extend(latest_indicators(Indicator::Sba, &sba));
    info!(
        year_min = window.min(),
        year_max = window.max(),
        anc4_countries = anc4.len(),
        sba_countries = sba.len(),
        duration_ms = start.elapsed().as_millis(),
        "select complete"
    );
    Ok(LatestSelection {
        anc4,
        sba,
        indicators,
    })
}

/// Keys and classifies the status table.
pub fn classify(
    raw: &IngestResult,
    config: &PipelineConfig,
) -> Result<(BTreeMap<CountryKey, CountryStatus>, KeyReport)> {
    let span = info_span!("classify");
    let _guard = span.enter();
    let start = Instant::now();
    let classifier = StatusClassifier::new(config.policy.unmapped_status);
    let (statuses, report) = prepare_statuses(
        &raw.status,
        &config.sources.status.table,
        &config.aliases,
        &classifier,
    )
    .context("classify status")?;
    info!(
        countries = statuses.len(),
        duration_ms = start.elapsed().as_millis(),
        "classify complete"
    );
    Ok((statuses, report))
}

/// Everything computed by a run, before output.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub counts: Vec<SourceCount>,
    /// Key normalization reports in source order: ANC4, SBA, status, births.
    pub key_reports: Vec<KeyReport>,
    /// Latest in-window observations, before the join.
    pub latest: Vec<LatestIndicator>,
    pub reconciliation: Reconciliation,
    pub aggregates: Vec<GroupAggregate>,
}

/// Runs every stage from ingest through aggregation.
pub fn run_pipeline(input_dir: &Path, config: &PipelineConfig) -> Result<PipelineRun> {
    let raw = ingest(input_dir, config)?;
    let normalized = normalize(&raw, config)?;
    let latest = select(&normalized, config)?;
    let (statuses, status_report) = classify(&raw, config)?;

    let reconciliation = info_span!("reconcile", policy = ?config.policy.join).in_scope(
        || -> Result<Reconciliation> {
            let start = Instant::now();
            let reconciliation = reconcile(
                &latest.anc4,
                &latest.sba,
                &statuses,
                &normalized.births,
                config.policy.join,
            )
            .context("reconcile sources")?;
            info!(
                countries = reconciliation.records.len(),
                dropped = reconciliation.diagnostics.dropped_count(),
                duration_ms = start.elapsed().as_millis(),
                "reconcile complete"
            );
            Ok(reconciliation)
        },
    )?;

    let aggregates = info_span!("aggregate").in_scope(|| -> Result<Vec<GroupAggregate>> {
        let start = Instant::now();
        let aggregates = aggregate(&reconciliation.records).context("aggregate groups")?;
        info!(
            aggregates = aggregates.len(),
            duration_ms = start.elapsed().as_millis(),
            "aggregate complete"
        );
        Ok(aggregates)
    })?;

    let mut key_reports = normalized.reports;
    let births_report = key_reports.pop();
    key_reports.push(status_report);
    key_reports.extend(births_report);

    Ok(PipelineRun {
        counts: raw.counts,
        key_reports,
        latest: latest.indicators,
        reconciliation,
        aggregates,
    })
}

/// Result of the output stage.
#[derive(Debug, Clone)]
pub struct OutputResult {
    pub outputs: OutputSet,
    /// Written paths; empty on a dry run.
    pub written: Vec<PathBuf>,
}

/// Settings of the output stage.
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig<'a> {
    pub input_dir: &'a Path,
    pub output_dir: &'a Path,
    pub config: &'a PipelineConfig,
    pub generated_at: DateTime<Utc>,
    pub dry_run: bool,
}

/// Renders all outputs and writes them unless this is a dry run.
pub fn output(settings: OutputConfig<'_>, run: &PipelineRun) -> Result<OutputResult> {
    let span = info_span!("output", output_dir = %settings.output_dir.display());
    let _guard = span.enter();
    let start = Instant::now();
    let input = ReportInput {
        generated_at: settings.generated_at,
        input_dir: settings.input_dir,
        config: settings.config,
        key_reports: &run.key_reports,
        latest: &run.latest,
        reconciliation: &run.reconciliation,
        aggregates: &run.aggregates,
    };
    let outputs = render_outputs(&input).context("render outputs")?;
    let written = if settings.dry_run {
        info!(files = outputs.files.len(), "dry run, nothing written");
        Vec::new()
    } else {
        write_outputs(settings.output_dir, &outputs).context("write outputs")?
    };
    info!(
        files = written.len(),
        duration_ms = start.elapsed().as_millis(),
        "output complete"
    );
    Ok(OutputResult { outputs, written })
}
