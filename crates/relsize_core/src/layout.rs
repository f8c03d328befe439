//! On-disk layout of a cluster directory.
//!
//! ```text
//! <root>/base/<db>/<file_number>[_fork][.segment]     default tablespace
//! <root>/global/<file_number>[_fork][.segment]        cluster-shared objects
//! <root>/tablespaces/<ts>/v1/<db>/<file_number>...    other tablespaces
//! ```
//!
//! Segment 0 is the bare file name; later segments append `.1`, `.2`,
//! and so on. The version directory under each tablespace root keeps
//! incompatible cluster versions from sharing files.

use crate::types::{DatabaseId, Fork, ObjectLocator, TablespaceId, DEFAULT_TABLESPACE, GLOBAL_TABLESPACE};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

const BASE_DIR: &str = "base";
const GLOBAL_DIR: &str = "global";
const TABLESPACE_LINK_DIR: &str = "tablespaces";
const TABLESPACE_VERSION_DIR: &str = "v1";

/// Resolves cluster-relative locations to concrete paths under a root
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    /// Creates a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The cluster root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding per-database directories of the default
    /// tablespace.
    #[must_use]
    pub fn base_dir(&self) -> PathBuf {
        self.root.join(BASE_DIR)
    }

    /// Directory holding cluster-shared object files.
    #[must_use]
    pub fn global_dir(&self) -> PathBuf {
        self.root.join(GLOBAL_DIR)
    }

    /// Directory holding one entry per additional tablespace.
    #[must_use]
    pub fn tablespace_link_dir(&self) -> PathBuf {
        self.root.join(TABLESPACE_LINK_DIR)
    }

    /// A database's directory in the default tablespace.
    #[must_use]
    pub fn database_dir(&self, database: DatabaseId) -> PathBuf {
        self.base_dir().join(database.as_u32().to_string())
    }

    /// The version-qualified root a tablespace stores under.
    #[must_use]
    pub fn tablespace_root(&self, tablespace: TablespaceId) -> PathBuf {
        if tablespace == DEFAULT_TABLESPACE {
            self.base_dir()
        } else if tablespace == GLOBAL_TABLESPACE {
            self.global_dir()
        } else {
            self.tablespace_link_dir()
                .join(tablespace.as_u32().to_string())
                .join(TABLESPACE_VERSION_DIR)
        }
    }

    /// A database's directory inside a tablespace entry named
    /// `link_name`, as found by listing the tablespace link directory.
    #[must_use]
    pub fn tablespace_database_dir(&self, link_name: &OsStr, database: DatabaseId) -> PathBuf {
        self.tablespace_link_dir()
            .join(link_name)
            .join(TABLESPACE_VERSION_DIR)
            .join(database.as_u32().to_string())
    }

    /// Segment 0 path of one fork of a storage object.
    #[must_use]
    pub fn relation_path(&self, locator: &ObjectLocator, fork: Fork) -> PathBuf {
        let file = format!("{}{}", locator.file_number.as_u32(), fork.suffix());
        match locator.database {
            None => self.global_dir().join(file),
            Some(database) => self
                .tablespace_root(locator.tablespace)
                .join(database.as_u32().to_string())
                .join(file),
        }
    }

    /// Path of segment `segment` in the chain starting at `base`.
    /// Segment 0 is `base` itself.
    #[must_use]
    pub fn segment_path(base: &Path, segment: u32) -> PathBuf {
        if segment == 0 {
            return base.to_path_buf();
        }
        let mut name = base.as_os_str().to_os_string();
        name.push(format!(".{segment}"));
        PathBuf::from(name)
    }
}
