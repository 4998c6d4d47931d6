//! Source file discovery.

use std::fmt;
use std::path::{Path, PathBuf};

use mnch_model::{PipelineConfig, TableSource};

use crate::error::{IngestError, Result};

/// The four tables the pipeline consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceKind {
    Anc4,
    Sba,
    Status,
    Births,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Anc4,
        SourceKind::Sba,
        SourceKind::Status,
        SourceKind::Births,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Anc4 => "ANC4",
            SourceKind::Sba => "SBA",
            SourceKind::Status => "status",
            SourceKind::Births => "births",
        }
    }

    /// Table settings of this source in the configuration.
    pub fn table<'a>(&self, config: &'a PipelineConfig) -> &'a TableSource {
        match self {
            SourceKind::Anc4 => &config.sources.anc4.table,
            SourceKind::Sba => &config.sources.sba.table,
            SourceKind::Status => &config.sources.status.table,
            SourceKind::Births => &config.sources.births.table,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of looking up one configured source.
#[derive(Debug, Clone)]
pub struct SourceCheck {
    pub kind: SourceKind,
    /// Configured file name.
    pub file: String,
    /// Resolved path when the file exists.
    pub path: Option<PathBuf>,
}

/// Lists all regular files in a directory, sorted by file name.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Finds `file_name` among `files`, exact match first, then case-insensitive.
fn match_file(files: &[PathBuf], file_name: &str) -> Option<PathBuf> {
    let name_of = |path: &PathBuf| {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
    };
    files
        .iter()
        .find(|path| name_of(path).as_deref() == Some(file_name))
        .or_else(|| {
            files.iter().find(|path| {
                name_of(path).is_some_and(|name| name.eq_ignore_ascii_case(file_name))
            })
        })
        .cloned()
}

/// Checks every configured source against the input directory.
pub fn check_sources(input_dir: &Path, config: &PipelineConfig) -> Result<Vec<SourceCheck>> {
    let files = list_files(input_dir)?;
    Ok(SourceKind::ALL
        .iter()
        .map(|kind| {
            let file = kind.table(config).file.clone();
            let path = match_file(&files, &file);
            SourceCheck {
                kind: *kind,
                file,
                path,
            }
        })
        .collect())
}

/// Resolves one source file, failing when it is absent.
pub fn resolve_source(input_dir: &Path, kind: SourceKind, table: &TableSource) -> Result<PathBuf> {
    let files = list_files(input_dir)?;
    match_file(&files, &table.file).ok_or_else(|| IngestError::MissingSourceFile {
        source_name: kind.to_string(),
        path: input_dir.join(&table.file),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn resolves_case_insensitively() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("anc4.csv"), "x").unwrap();
        let config = PipelineConfig::default();

        let path = resolve_source(dir.path(), SourceKind::Anc4, &config.sources.anc4.table)
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "anc4.csv");

        let err = resolve_source(dir.path(), SourceKind::Sba, &config.sources.sba.table)
            .unwrap_err();
        assert!(matches!(err, IngestError::MissingSourceFile { .. }));
    }

    #[test]
    fn check_sources_reports_each_kind() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("SBA.CSV"), "x").unwrap();
        let checks = check_sources(dir.path(), &PipelineConfig::default()).unwrap();
        assert_eq!(checks.len(), 4);
        assert!(checks[0].path.is_none());
        assert!(checks[1].path.is_some());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let err = list_files(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, IngestError::DirectoryNotFound { .. }));
    }
}
