//! Per-operation scratch space.
//!
//! Each download pipeline stages the extractor's output in its own
//! [`ScratchDir`]; the directory and everything in it is removed when the
//! value is dropped, on success and on error alike.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;

/// Failure to pin down the single file an extractor produced.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("no file matched {pattern}")]
    NoMatch { pattern: String },

    #[error("{count} files matched {pattern}, expected exactly one")]
    Ambiguous { pattern: String, count: usize },

    #[error("failed to list {}: {source}", dir.display())]
    Io {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Auto-deleted temporary directory.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("yth-").tempdir()?;
        tracing::debug!(dir = ?dir.path().display(), "created scratch directory");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(name)
    }

    /// yt-dlp output template `<dir>/<basename>.%(ext)s`.
    ///
    /// Literal `%` in the directory path is escaped for the template language.
    pub fn template(&self, basename: &str) -> String {
        let dir = self.dir.path().to_string_lossy().replace('%', "%%");
        let basename = basename.replace('%', "%%");
        format!("{dir}{}{basename}.%(ext)s", std::path::MAIN_SEPARATOR)
    }

    /// The single file named `<basename>.<anything>`.
    pub fn locate(&self, basename: &str) -> Result<PathBuf, LocateError> {
        let pattern = format!("{basename}.*");
        let prefix = format!("{basename}.");

        let entries = std::fs::read_dir(self.path()).map_err(|source| LocateError::Io {
            dir: self.path().to_path_buf(),
            source,
        })?;

        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| LocateError::Io {
                dir: self.path().to_path_buf(),
                source,
            })?;
            let path = entry.path();
            let matches = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&prefix) && name.len() > prefix.len());

            if matches && path.is_file() {
                found.push(path);
            }
        }

        match found.len() {
            0 => Err(LocateError::NoMatch { pattern }),
            1 => Ok(found.remove(0)),
            count => Err(LocateError::Ambiguous { pattern, count }),
        }
    }
}
