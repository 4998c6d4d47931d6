//! CLI argument definitions for the coverage pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use mnch_model::{JoinPolicy, UnmappedStatusPolicy};

#[derive(Parser)]
#[command(
    name = "mnch-coverage",
    version,
    about = "ANC4 and SBA coverage by U5MR status group",
    long_about = "Compare antenatal care (ANC4) and skilled birth attendance (SBA) coverage \
                  between countries on track and off track for the under-five mortality \
                  target.\n\n\
                  Produces simple and birth-weighted group averages, the reconciled country \
                  table, a JSON run summary and a Markdown report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the pipeline on an input folder and write the outputs.
    Run(RunArgs),

    /// Show where each configured source was found.
    Sources(SourcesArgs),

    /// Print the default configuration as TOML.
    Config,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Folder holding the ANC4, SBA, status and births files.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Output directory for generated files (default: <INPUT_DIR>/outputs).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// TOML configuration file; flags below override its values.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// First year of the observation window.
    #[arg(long = "year-min", value_name = "YEAR")]
    pub year_min: Option<i32>,

    /// Last year of the observation window.
    #[arg(long = "year-max", value_name = "YEAR")]
    pub year_max: Option<i32>,

    /// Projection year of the births used as weights.
    #[arg(long = "births-year", value_name = "YEAR")]
    pub births_year: Option<i32>,

    /// Handling of countries missing from a source.
    #[arg(long = "join", value_enum)]
    pub join: Option<JoinArg>,

    /// Handling of status labels outside the classification table.
    #[arg(long = "unmapped-status", value_enum)]
    pub unmapped_status: Option<UnmappedStatusArg>,

    /// Compute and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct SourcesArgs {
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum JoinArg {
    /// Drop and count unmatched countries.
    Inner,
    /// Fail on the first unmatched country.
    RequireComplete,
}

impl From<JoinArg> for JoinPolicy {
    fn from(arg: JoinArg) -> Self {
        match arg {
            JoinArg::Inner => JoinPolicy::Inner,
            JoinArg::RequireComplete => JoinPolicy::RequireComplete,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum UnmappedStatusArg {
    /// Abort the run.
    Fail,
    /// Report the country in an Unknown group.
    Unknown,
}

impl From<UnmappedStatusArg> for UnmappedStatusPolicy {
    fn from(arg: UnmappedStatusArg) -> Self {
        match arg {
            UnmappedStatusArg::Fail => UnmappedStatusPolicy::Fail,
            UnmappedStatusArg::Unknown => UnmappedStatusPolicy::Unknown,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
