use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use comfy_table::{Cell, Color, Table};
use tracing::info_span;

use mnch_cli::pipeline::{OutputConfig, output, run_pipeline};
use mnch_ingest::{check_sources, load_pipeline_config, render_pipeline_config};
use mnch_model::PipelineConfig;

use crate::cli::{RunArgs, SourcesArgs};
use crate::summary::{apply_table_style, header_cell};
use crate::types::RunResult;

/// Loads the configuration file, or the defaults when none is given.
fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => load_pipeline_config(path)
            .with_context(|| format!("load configuration {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

/// Applies command-line overrides on top of the loaded configuration.
fn apply_overrides(mut config: PipelineConfig, args: &RunArgs) -> PipelineConfig {
    if let Some(year) = args.year_min {
        config.window.year_min = year;
    }
    if let Some(year) = args.year_max {
        config.window.year_max = year;
    }
    if let Some(year) = args.births_year {
        config.window.births_year = year;
    }
    if let Some(join) = args.join {
        config = config.with_join_policy(join.into());
    }
    if let Some(policy) = args.unmapped_status {
        config = config.with_unmapped_status(policy.into());
    }
    config
}

pub fn run_coverage(args: &RunArgs) -> Result<RunResult> {
    let input_dir = &args.input_dir;
    let run_span = info_span!("run", input_dir = %input_dir.display());
    let _run_guard = run_span.enter();
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| input_dir.join("outputs"));
    let config = apply_overrides(load_config(args.config.as_deref())?, args);

    let run = run_pipeline(input_dir, &config)?;
    let output = output(
        OutputConfig {
            input_dir,
            output_dir: &output_dir,
            config: &config,
            generated_at: Utc::now(),
            dry_run: args.dry_run,
        },
        &run,
    )?;

    Ok(RunResult {
        input_dir: input_dir.clone(),
        output_dir,
        config,
        dry_run: args.dry_run,
        run,
        output,
    })
}

pub fn run_sources(args: &SourcesArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let checks = check_sources(&args.input_dir, &config)
        .with_context(|| format!("scan {}", args.input_dir.display()))?;

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Configured file"),
        header_cell("Found"),
    ]);
    apply_table_style(&mut table);
    let mut missing = 0usize;
    for check in &checks {
        let found = match &check.path {
            Some(path) => Cell::new(path.display()).fg(Color::Green),
            None => {
                missing += 1;
                Cell::new("missing").fg(Color::Red)
            }
        };
        table.add_row(vec![Cell::new(check.kind), Cell::new(&check.file), found]);
    }
    println!("{table}");
    if missing > 0 {
        return Err(anyhow!("{missing} of {} sources not found", checks.len()));
    }
    Ok(())
}

pub fn run_config() -> Result<()> {
    let text = render_pipeline_config(&PipelineConfig::default())
        .map_err(|message| anyhow!("render configuration: {message}"))?;
    print!("{text}");
    Ok(())
}
