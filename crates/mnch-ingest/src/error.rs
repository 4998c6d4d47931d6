//! Error types for source ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while locating and reading source tables.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input directory not found or not a directory.
    #[error("input directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// A configured source file is not present in the input directory.
    #[error("missing {source_name} source file: {path}")]
    MissingSourceFile { source_name: String, path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed to open or read a spreadsheet.
    #[error("failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    /// Requested worksheet does not exist.
    #[error("worksheet '{sheet}' not found in {path}")]
    SheetNotFound { sheet: String, path: PathBuf },

    /// Source has no header row after the skipped rows.
    #[error("source table is empty: {path}")]
    EmptyTable { path: PathBuf },

    // === Schema Errors ===
    /// Configured column not found in the source header.
    #[error("required column '{column}' not found in {path} (available: {available})")]
    MissingColumn {
        column: String,
        path: PathBuf,
        available: String,
    },

    /// Cell that cannot be parsed as the expected type.
    #[error("invalid {column} value '{value}' in {source_name} row {row}")]
    InvalidValue {
        source_name: String,
        column: String,
        value: String,
        row: usize,
    },

    // === Configuration Errors ===
    /// Configuration file could not be parsed.
    #[error("invalid configuration {path}: {message}")]
    Config { path: PathBuf, message: String },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
