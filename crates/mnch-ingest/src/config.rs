//! Pipeline configuration files.

use std::path::Path;

use mnch_model::PipelineConfig;

use crate::error::{IngestError, Result};

/// Loads a TOML configuration file. Missing sections keep their defaults.
pub fn load_pipeline_config(path: &Path) -> Result<PipelineConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_pipeline_config(&text).map_err(|message| IngestError::Config {
        path: path.to_path_buf(),
        message,
    })
}

/// Parses configuration text.
pub fn parse_pipeline_config(text: &str) -> std::result::Result<PipelineConfig, String> {
    toml::from_str(text).map_err(|e| e.to_string())
}

/// Renders a configuration as TOML.
pub fn render_pipeline_config(config: &PipelineConfig) -> std::result::Result<String, String> {
    toml::to_string_pretty(config).map_err(|e| e.to_string())
}
