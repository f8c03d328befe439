//! Probe over the real filesystem.

use crate::error::{FsError, FsResult};
use crate::probe::{FileStat, FsProbe};
use std::ffi::OsString;
use std::io;
use std::path::Path;

/// A probe over the local filesystem.
///
/// `stat` follows symbolic links, so a size taken through a tablespace
/// link directory reflects the link target, not the link itself.
///
/// # Example
///
/// ```no_run
/// use relsize_fs::{FsProbe, LocalFs};
/// use std::path::Path;
///
/// let fs = LocalFs::new();
/// if let Some(stat) = fs.stat(Path::new("base/5/1259")).unwrap() {
///     println!("{} bytes", stat.len);
/// }
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl LocalFs {
    /// Creates a new local probe.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FsProbe for LocalFs {
    fn stat(&self, path: &Path) -> FsResult<Option<FileStat>> {
        match std::fs::metadata(path) {
            Ok(meta) => Ok(Some(FileStat {
                len: meta.len(),
                is_dir: meta.is_dir(),
            })),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(FsError::stat(path, err)),
        }
    }

    fn list_dir(&self, path: &Path) -> FsResult<Option<Vec<OsString>>> {
        let entries = match std::fs::read_dir(path) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(FsError::read_dir(path, err)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| FsError::read_dir(path, err))?;
            names.push(entry.file_name());
        }
        Ok(Some(names))
    }
}
