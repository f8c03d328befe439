//! In-memory filesystem probe for testing.

use crate::error::{FsError, FsResult};
use crate::probe::{FileStat, FsProbe};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    File { len: u64 },
    Dir,
}

/// An in-memory filesystem probe.
///
/// Suitable for unit tests that need exact control over what a scan
/// observes, including files vanishing mid-scan and injected stat
/// failures.
///
/// # Thread Safety
///
/// The probe is thread-safe; tests can mutate the tree from one thread
/// while a scan walks it from another.
///
/// # Example
///
/// ```rust
/// use relsize_fs::{FsProbe, MemFs};
/// use std::path::Path;
///
/// let fs = MemFs::new();
/// fs.add_file("base/5/1259", 8192);
/// let stat = fs.stat(Path::new("base/5/1259")).unwrap().unwrap();
/// assert_eq!(stat.len, 8192);
/// assert!(fs.stat(Path::new("base/5/9999")).unwrap().is_none());
/// ```
#[derive(Debug, Default)]
pub struct MemFs {
    nodes: RwLock<BTreeMap<PathBuf, Node>>,
    faults: RwLock<BTreeMap<PathBuf, io::ErrorKind>>,
}

impl MemFs {
    /// Creates a new empty probe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file of the given length, creating parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>, len: u64) {
        let path = path.as_ref();
        let mut nodes = self.nodes.write();
        Self::add_parents(&mut nodes, path);
        nodes.insert(path.to_path_buf(), Node::File { len });
    }

    /// Adds an empty directory, creating parent directories.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut nodes = self.nodes.write();
        Self::add_parents(&mut nodes, path);
        nodes.insert(path.to_path_buf(), Node::Dir);
    }

    /// Removes a path and everything beneath it.
    ///
    /// Used to simulate files vanishing between a directory listing and
    /// the stat of an entry.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.nodes
            .write()
            .retain(|p, _| p != path && !p.starts_with(path));
    }

    /// Makes future operations on `path` fail with the given error kind.
    ///
    /// A `NotFound` kind behaves like absence, matching the probe
    /// contract; any other kind surfaces as an [`FsError`].
    pub fn inject_error(&self, path: impl AsRef<Path>, kind: io::ErrorKind) {
        self.faults
            .write()
            .insert(path.as_ref().to_path_buf(), kind);
    }

    /// Number of entries in the tree, directories included.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.nodes.read().len()
    }

    fn add_parents(nodes: &mut BTreeMap<PathBuf, Node>, path: &Path) {
        let mut current = path.parent();
        while let Some(dir) = current {
            if dir.as_os_str().is_empty() {
                break;
            }
            nodes.entry(dir.to_path_buf()).or_insert(Node::Dir);
            current = dir.parent();
        }
    }

    fn fault_for(&self, path: &Path) -> Option<io::ErrorKind> {
        self.faults.read().get(path).copied()
    }
}

impl FsProbe for MemFs {
    fn stat(&self, path: &Path) -> FsResult<Option<FileStat>> {
        if let Some(kind) = self.fault_for(path) {
            if kind == io::ErrorKind::NotFound {
                return Ok(None);
            }
            return Err(FsError::stat(path, io::Error::new(kind, "injected fault")));
        }

        match self.nodes.read().get(path) {
            Some(Node::File { len }) => Ok(Some(FileStat {
                len: *len,
                is_dir: false,
            })),
            // Directories report their own inode size; the fixed value
            // keeps directory-sum tests deterministic.
            Some(Node::Dir) => Ok(Some(FileStat {
                len: DIR_LEN,
                is_dir: true,
            })),
            None => Ok(None),
        }
    }

    fn list_dir(&self, path: &Path) -> FsResult<Option<Vec<OsString>>> {
        if let Some(kind) = self.fault_for(path) {
            if kind == io::ErrorKind::NotFound {
                return Ok(None);
            }
            return Err(FsError::read_dir(
                path,
                io::Error::new(kind, "injected fault"),
            ));
        }

        let nodes = self.nodes.read();
        match nodes.get(path) {
            Some(Node::Dir) => {}
            Some(Node::File { .. }) => {
                return Err(FsError::read_dir(
                    path,
                    io::Error::other("not a directory"),
                ));
            }
            None => return Ok(None),
        }

        let names = nodes
            .keys()
            .filter(|p| p.parent() == Some(path))
            .filter_map(|p| p.file_name().map(OsString::from))
            .collect();
        Ok(Some(names))
    }
}

/// Inode size reported for every in-memory directory.
pub const DIR_LEN: u64 = 4096;
