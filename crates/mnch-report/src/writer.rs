//! All-or-nothing output writing.
//!
//! Every file is first written and synced inside a staging directory under
//! the output directory. Only when all of them are on disk are they renamed
//! into place. Files they replace are parked in the staging directory until
//! the last rename succeeds; a failed rename removes what was already moved
//! and puts the parked files back, so a failed run never leaves a partial
//! output set.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ReportError, Result};

const STAGING_PREFIX: &str = ".staging-";
const PREVIOUS_DIR: &str = ".previous";

/// One output file rendered in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub name: &'static str,
    pub contents: String,
}

/// The complete set of files produced by a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSet {
    pub files: Vec<RenderedFile>,
}

impl OutputSet {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|file| file.name == name)
            .map(|file| file.contents.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.files.iter().map(|file| file.name)
    }
}

fn io_error(operation: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> ReportError {
    let path = path.to_path_buf();
    move |source| ReportError::Io {
        operation,
        path,
        source,
    }
}

fn write_synced(path: &Path, contents: &str) -> Result<()> {
    let mut file = File::create(path).map_err(io_error("create", path))?;
    file.write_all(contents.as_bytes())
        .map_err(io_error("write", path))?;
    file.sync_all().map_err(io_error("sync", path))
}

fn discard_staging(staging: &Path) {
    if let Err(error) = fs::remove_dir_all(staging) {
        warn!(path = %staging.display(), %error, "failed to remove staging directory");
    }
}

fn stage_files(staging: &Path, outputs: &OutputSet) -> Result<()> {
    fs::create_dir_all(staging).map_err(io_error("create directory", staging))?;
    for file in &outputs.files {
        let path = staging.join(file.name);
        write_synced(&path, &file.contents)?;
        debug!(path = %path.display(), bytes = file.contents.len(), "staged output");
    }
    Ok(())
}

/// Removes staging directories left behind by runs that did not finish.
fn clear_stale_staging(output_dir: &Path) -> Result<()> {
    let entries = fs::read_dir(output_dir).map_err(io_error("read directory", output_dir))?;
    for entry in entries {
        let entry = entry.map_err(io_error("read directory", output_dir))?;
        if entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(STAGING_PREFIX))
        {
            debug!(path = %entry.path().display(), "removing stale staging directory");
            discard_staging(&entry.path());
        }
    }
    Ok(())
}

/// Files moved into place so far, and the files they replaced.
#[derive(Default)]
struct Publication {
    published: Vec<PathBuf>,
    parked: Vec<(PathBuf, PathBuf)>,
}

impl Publication {
    /// Undoes every move, newest first.
    fn roll_back(self) {
        for target in self.published.iter().rev() {
            if let Err(error) = fs::remove_file(target) {
                warn!(path = %target.display(), %error, "failed to remove published output");
            }
        }
        for (parked, target) in self.parked.iter().rev() {
            if let Err(error) = fs::rename(parked, target) {
                warn!(path = %target.display(), %error, "failed to restore previous output");
            }
        }
    }
}

fn publish_one(
    staging: &Path,
    output_dir: &Path,
    name: &str,
    publication: &mut Publication,
) -> Result<()> {
    let staged = staging.join(name);
    let target = output_dir.join(name);
    if fs::symlink_metadata(&target).is_ok_and(|meta| meta.is_file()) {
        let parked = staging.join(PREVIOUS_DIR).join(name);
        fs::rename(&target, &parked).map_err(|source| ReportError::Publish {
            staged: parked.clone(),
            target: target.clone(),
            source,
        })?;
        publication.parked.push((parked, target.clone()));
    }
    fs::rename(&staged, &target).map_err(|source| ReportError::Publish {
        staged,
        target: target.clone(),
        source,
    })?;
    publication.published.push(target);
    Ok(())
}

fn publish_files(staging: &Path, output_dir: &Path, outputs: &OutputSet) -> Result<Vec<PathBuf>> {
    let previous = staging.join(PREVIOUS_DIR);
    fs::create_dir_all(&previous).map_err(io_error("create directory", &previous))?;
    let mut publication = Publication::default();
    for file in &outputs.files {
        if let Err(error) = publish_one(staging, output_dir, file.name, &mut publication) {
            warn!(
                published = publication.published.len(),
                "publishing failed, rolling back"
            );
            publication.roll_back();
            return Err(error);
        }
    }
    Ok(publication.published)
}

/// Writes `outputs` into `output_dir`, creating it when needed.
///
/// Returns the final paths in output order.
pub fn write_outputs(output_dir: &Path, outputs: &OutputSet) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir).map_err(io_error("create directory", output_dir))?;
    clear_stale_staging(output_dir)?;
    let staging = output_dir.join(format!("{STAGING_PREFIX}{}", std::process::id()));

    let result = stage_files(&staging, outputs)
        .and_then(|()| publish_files(&staging, output_dir, outputs));
    discard_staging(&staging);
    let written = result?;

    info!(
        output_dir = %output_dir.display(),
        files = written.len(),
        "outputs written"
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn outputs() -> OutputSet {
        OutputSet {
            files: vec![
                RenderedFile {
                    name: "a.csv",
                    contents: "group\n".to_string(),
                },
                RenderedFile {
                    name: "b.json",
                    contents: "{}\n".to_string(),
                },
            ],
        }
    }

    #[test]
    fn writes_every_file_and_cleans_staging() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("outputs");

        let written = write_outputs(&out, &outputs()).unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(fs::read_to_string(out.join("a.csv")).unwrap(), "group\n");
        let entries: Vec<_> = fs::read_dir(&out).unwrap().collect();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn failed_staging_leaves_no_outputs() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("outputs");
        let mut set = outputs();
        set.files.push(RenderedFile {
            name: "missing/dir.csv",
            contents: String::new(),
        });

        let err = write_outputs(&out, &set).unwrap_err();

        assert!(matches!(err, ReportError::Io { operation: "create", .. }));
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn failed_publish_restores_previous_outputs() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("outputs");
        fs::create_dir_all(out.join("b.json")).unwrap();
        fs::write(out.join("a.csv"), "previous\n").unwrap();

        let err = write_outputs(&out, &outputs()).unwrap_err();

        assert!(matches!(err, ReportError::Publish { .. }));
        assert_eq!(fs::read_to_string(out.join("a.csv")).unwrap(), "previous\n");
        assert!(out.join("b.json").is_dir());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 2);
    }

    #[test]
    fn failed_publish_without_previous_outputs_leaves_nothing() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("outputs");
        fs::create_dir_all(out.join("b.json")).unwrap();

        write_outputs(&out, &outputs()).unwrap_err();

        assert!(!out.join("a.csv").exists());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
    }

    #[test]
    fn replaces_existing_outputs() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("outputs");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("a.csv"), "previous\n").unwrap();

        write_outputs(&out, &outputs()).unwrap();

        assert_eq!(fs::read_to_string(out.join("a.csv")).unwrap(), "group\n");
        assert_eq!(fs::read_dir(&out).unwrap().count(), 2);
    }

    #[test]
    fn stale_staging_directories_are_removed() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("outputs");
        fs::create_dir_all(out.join(".staging-1").join(PREVIOUS_DIR)).unwrap();
        fs::write(out.join(".staging-1").join("a.csv"), "stale\n").unwrap();

        write_outputs(&out, &outputs()).unwrap();

        let mut names: Vec<String> = fs::read_dir(&out)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.csv", "b.json"]);
    }

    #[test]
    fn output_set_lookup() {
        let set = outputs();
        assert_eq!(set.get("b.json"), Some("{}\n"));
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["a.csv", "b.json"]);
    }
}
