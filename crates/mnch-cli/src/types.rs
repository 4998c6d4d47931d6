use std::path::PathBuf;

use mnch_cli::pipeline::{OutputResult, PipelineRun};
use mnch_model::PipelineConfig;

#[derive(Debug)]
pub struct RunResult {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub config: PipelineConfig,
    pub dry_run: bool,
    pub run: PipelineRun,
    pub output: OutputResult,
}
