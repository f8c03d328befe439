//! Error types for filesystem probes.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for probe operations.
pub type FsResult<T> = Result<T, FsError>;

/// Errors that can occur while probing the filesystem.
///
/// Absence is never an error here. A probe reports a missing path as
/// `None` in the success channel; only genuine failures (permissions,
/// I/O faults) become an `FsError`.
#[derive(Debug, Error)]
pub enum FsError {
    /// Stating a file failed for a reason other than absence.
    #[error("could not stat file \"{}\": {source}", path.display())]
    Stat {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Opening or reading a directory failed for a reason other than absence.
    #[error("could not open directory \"{}\": {source}", path.display())]
    ReadDir {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl FsError {
    /// Builds a [`FsError::Stat`] for the given path.
    #[must_use]
    pub fn stat(path: &Path, source: io::Error) -> Self {
        Self::Stat {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Builds a [`FsError::ReadDir`] for the given path.
    #[must_use]
    pub fn read_dir(path: &Path, source: io::Error) -> Self {
        Self::ReadDir {
            path: path.to_path_buf(),
            source,
        }
    }
}
