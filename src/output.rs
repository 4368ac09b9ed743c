//! Output directory layout
//!
//! Every run writes into `<root>/<YYYY-MM-DD>/`, created on demand. Files
//! for a project are prefixed with a slug of the project name.

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Date-stamped directory receiving one run's artifacts
#[derive(Debug, Clone)]
pub struct OutputDir {
    path: PathBuf,
}

impl OutputDir {
    /// Create (if needed) the directory for `date` under `root`
    pub fn create(root: &Path, date: NaiveDate) -> Result<Self, OutputError> {
        let path = root.join(date.format("%Y-%m-%d").to_string());
        fs::create_dir_all(&path).map_err(|source| OutputError::CreateDir {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `content` to `file_name` inside the directory
    ///
    /// # Returns
    /// Full path of the written file
    pub fn write(&self, file_name: &str, content: &str) -> Result<PathBuf, OutputError> {
        let target = self.path.join(file_name);
        fs::write(&target, content).map_err(|source| OutputError::Write {
            path: target.clone(),
            source,
        })?;
        debug!(path = %target.display(), bytes = content.len(), "wrote artifact");
        Ok(target)
    }

    /// Copy `source` into the subdirectory `subdir`
    ///
    /// # Returns
    /// Link to the copy relative to the output directory, always with `/`
    /// separators so it can be embedded in the report as is.
    pub fn copy_into(&self, subdir: &str, source: &Path) -> Result<String, OutputError> {
        let file_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = self.path.join(subdir);
        fs::create_dir_all(&dir).map_err(|source| OutputError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        let target = dir.join(&file_name);
        fs::copy(source, &target).map_err(|error| OutputError::Copy {
            from: source.to_path_buf(),
            to: target.clone(),
            source: error,
        })?;
        debug!(from = %source.display(), to = %target.display(), "copied file");
        Ok(format!("{subdir}/{file_name}"))
    }
}

/// File-name-safe slug of a project name
///
/// Lowercases, keeps alphanumerics and collapses every other run of
/// characters into a single hyphen.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
