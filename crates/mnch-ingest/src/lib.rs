//! Coverage source ingestion.
//!
//! This crate locates the configured source files in an input directory and
//! loads them into Polars DataFrames, then extracts raw typed rows.
//!
//! # Features
//!
//! - **Discovery**: case-insensitive resolution of configured file names
//! - **Reading**: CSV through Polars, spreadsheets through calamine
//! - **Rows**: indicator, status and births rows with row-level parse errors
//! - **Configuration**: TOML pipeline configuration files
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use mnch_ingest::{SourceKind, read_indicator_rows};
//! use mnch_model::PipelineConfig;
//!
//! let config = PipelineConfig::default();
//! let anc4 = read_indicator_rows(Path::new("01_rawdata"), SourceKind::Anc4, &config.sources.anc4)?;
//! ```

mod config;
mod discovery;
mod error;
mod polars_utils;
mod reader;
mod sources;

// === Error Types ===
pub use error::{IngestError, Result};

// === Configuration ===
pub use config::{load_pipeline_config, parse_pipeline_config, render_pipeline_config};

// === Discovery ===
pub use discovery::{SourceCheck, SourceKind, check_sources, list_files, resolve_source};

// === Reading ===
pub use polars_utils::{any_to_string, is_missing, parse_f64, parse_year};
pub use reader::{SourceFrame, frame_from_rows, read_csv, read_source_frame, read_spreadsheet};
pub use sources::{SourceRows, read_birth_rows, read_indicator_rows, read_status_rows};
