//! Filesystem probe trait definition.

use crate::error::FsResult;
use std::ffi::OsString;
use std::path::Path;

/// Size and kind of a single filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    /// Length in bytes as reported by the filesystem.
    ///
    /// For directories this is the inode size of the directory itself,
    /// which size scans deliberately include.
    pub len: u64,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}

/// A read-only view of the filesystem used by size scans.
///
/// Probes report absence in the success channel: a path that does not
/// exist yields `Ok(None)`, never an error. Scans rely on this to treat
/// files deleted mid-scan as contributing zero bytes.
///
/// # Invariants
///
/// - `stat` returns `Ok(None)` exactly when the path does not exist
/// - `list_dir` returns `Ok(None)` exactly when the directory does not exist
/// - `list_dir` never yields the `.` and `..` entries
/// - Probes must be `Send + Sync` so concurrent scans can share one
///
/// # Implementors
///
/// - [`super::LocalFs`] - The real filesystem
/// - [`super::MemFs`] - In-memory tree for testing
pub trait FsProbe: Send + Sync {
    /// Stats a single path.
    ///
    /// # Errors
    ///
    /// Returns an error if the stat fails for any reason other than the
    /// path not existing.
    fn stat(&self, path: &Path) -> FsResult<Option<FileStat>>;

    /// Lists the entry names of a directory, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be opened or read for any
    /// reason other than it not existing.
    fn list_dir(&self, path: &Path) -> FsResult<Option<Vec<OsString>>>;
}
