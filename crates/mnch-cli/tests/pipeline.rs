//! Integration tests for the pipeline module.

use std::fs;
use std::path::Path;

use chrono::{TimeZone, Utc};
use tempfile::{TempDir, tempdir};

use mnch_cli::pipeline::{OutputConfig, output, run_pipeline};
use mnch_model::{Indicator, JoinPolicy, PipelineConfig, StatusGroup};
use mnch_report::{RUN_SUMMARY_FILE, SIMPLE_AVERAGE_FILE};

const ANC4: &str = "\
REF_AREA:Geographic area,INDICATOR:Indicator,TIME_PERIOD:Time period,OBS_VALUE:Observation Value
AFG: Afghanistan,MNCH_ANC4,2018,20
AFG: Afghanistan,MNCH_ANC4,2020,30
BRA: Brazil,MNCH_ANC4,2021,90
CHL: Chile,MNCH_ANC4,2019,95
UNICEF_ESA: Eastern and Southern Africa,MNCH_ANC4,2021,60
NGA: Nigeria,MNCH_ANC4,2023,70
";

const SBA: &str = "\
REF_AREA:Geographic area,INDICATOR:Indicator,TIME_PERIOD:Time period,OBS_VALUE:Observation Value
AFG: Afghanistan,MNCH_SAB,2021,60
BRA: Brazil,MNCH_SAB,2020,99
CHL: Chile,MNCH_SAB,2022,100
NGA: Nigeria,MNCH_SAB,2021,45
";

const STATUS: &str = "\
ISO3Code,OfficialName,Status.U5MR
AFG,Afghanistan,Acceleration Needed
BRA,Brazil,Achieved
CHL,Chile,On Track
NGA,Nigeria,Acceleration Needed
";

const BIRTHS: &str = "\
ISO3 Alpha-code,Year,Births (thousands)
AFG,2021,1500
AFG,2022,1600
BRA,2022,2600
CHL,2022,200
NGA,2022,7900
,2022,134000
";

fn fixture(status: &str) -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("ANC4.CSV"), ANC4).unwrap();
    fs::write(dir.path().join("SBA.CSV"), SBA).unwrap();
    fs::write(dir.path().join("status.csv"), status).unwrap();
    fs::write(dir.path().join("births.csv"), BIRTHS).unwrap();
    dir
}

fn config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.sources.status.table.file = "status.csv".to_string();
    config.sources.births.table.file = "births.csv".to_string();
    config
}

fn settings<'a>(
    input_dir: &'a Path,
    output_dir: &'a Path,
    config: &'a PipelineConfig,
    dry_run: bool,
) -> OutputConfig<'a> {
    OutputConfig {
        input_dir,
        output_dir,
        config,
        generated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        dry_run,
    }
}

#[test]
fn run_reconciles_and_weights_by_births() {
    let dir = fixture(STATUS);
    let config = config();

    let run = run_pipeline(dir.path(), &config).unwrap();

    let keys: Vec<&str> = run
        .reconciliation
        .records
        .iter()
        .map(|r| r.country_key.as_str())
        .collect();
    assert_eq!(keys, vec!["AFG", "BRA", "CHL"]);
    let afg = &run.reconciliation.records[0];
    assert_eq!((afg.anc4_value, afg.anc4_year), (30.0, 2020));
    assert_eq!(afg.births_thousands, 1600.0);

    let diagnostics = &run.reconciliation.diagnostics;
    assert_eq!(diagnostics.stage("SBA").unwrap().right_only.len(), 1);
    assert_eq!(diagnostics.stage("status").unwrap().dropped_count(), 1);
    assert_eq!(diagnostics.stage("births").unwrap().dropped_count(), 1);

    let anc4_on_track = run
        .aggregates
        .iter()
        .find(|a| a.group == StatusGroup::OnTrack && a.indicator.as_str() == "ANC4")
        .unwrap();
    assert_eq!(anc4_on_track.country_count, 2);
    assert!((anc4_on_track.simple_mean - 92.5).abs() < 1e-9);
    assert!((anc4_on_track.weighted_mean - 253_000.0 / 2_800.0).abs() < 1e-9);

    let sources: Vec<(&str, usize)> = run
        .key_reports
        .iter()
        .map(|r| (r.source.as_str(), r.dropped))
        .collect();
    assert_eq!(
        sources,
        vec![("ANC4", 1), ("SBA", 0), ("status", 0), ("births", 0)]
    );
    assert_eq!(run.counts[3].skipped, 1);

    let latest_anc4: Vec<(&str, i32)> = run
        .latest
        .iter()
        .filter(|row| row.indicator == Indicator::Anc4)
        .map(|row| (row.country_key.as_str(), row.year))
        .collect();
    assert_eq!(latest_anc4, vec![("AFG", 2020), ("BRA", 2021), ("CHL", 2019)]);
    assert_eq!(
        run.latest
            .iter()
            .filter(|row| row.indicator == Indicator::Sba)
            .count(),
        4
    );
}

#[test]
fn output_writes_every_file() {
    let dir = fixture(STATUS);
    let config = config();
    let out = dir.path().join("outputs");
    let run = run_pipeline(dir.path(), &config).unwrap();

    let result = output(settings(dir.path(), &out, &config, false), &run).unwrap();

    assert_eq!(result.written.len(), 5);
    assert_eq!(
        fs::read_to_string(out.join(SIMPLE_AVERAGE_FILE)).unwrap(),
        "group,ANC4_mean,SBA_mean\nOff-track,30,60\nOn-track,92.5,99.5\n"
    );
    let summary = fs::read_to_string(out.join(RUN_SUMMARY_FILE)).unwrap();
    assert!(summary.contains("\"generated_at\": \"2024-01-01T00:00:00Z\""));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = fixture(STATUS);
    let config = config();
    let out = dir.path().join("outputs");
    let run = run_pipeline(dir.path(), &config).unwrap();

    let result = output(settings(dir.path(), &out, &config, true), &run).unwrap();

    assert!(result.written.is_empty());
    assert_eq!(result.outputs.files.len(), 5);
    assert!(!out.exists());
}

#[test]
fn unrecognized_status_fails_the_classify_stage() {
    let dir = fixture(&STATUS.replace("On Track", "Not assessed"));

    let err = run_pipeline(dir.path(), &config()).unwrap_err();

    let message = format!("{err:#}");
    assert!(message.starts_with("classify status"), "{message}");
    assert!(message.contains("unrecognized status label 'Not assessed'"), "{message}");
}

#[test]
fn missing_source_names_the_source() {
    let dir = fixture(STATUS);
    fs::remove_file(dir.path().join("births.csv")).unwrap();

    let err = run_pipeline(dir.path(), &config()).unwrap_err();

    let message = format!("{err:#}");
    assert!(message.starts_with("ingest births"), "{message}");
}

#[test]
fn require_complete_join_reports_the_stage() {
    let dir = fixture(STATUS);
    let config = config().with_join_policy(JoinPolicy::RequireComplete);

    let err = run_pipeline(dir.path(), &config).unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("NGA has no match at join stage SBA"), "{message}");
}
