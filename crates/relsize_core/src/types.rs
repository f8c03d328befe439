//! Identifier and locator types shared across the crate.
//!
//! Storage objects (tables, indexes, overflow chains) are addressed two
//! ways: by a stable [`ObjectId`] handed out by the catalog, and by the
//! [`ObjectLocator`] that pins their files to a spot on disk. The two
//! are decoupled so an object can be rewritten into a fresh file number
//! without changing its identity.

use std::fmt;

/// Identifier of a tablespace, the physical root a locator hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TablespaceId(pub u32);

impl TablespaceId {
    /// Creates a tablespace id from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TablespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ts:{}", self.0)
    }
}

/// The tablespace databases store into unless told otherwise.
pub const DEFAULT_TABLESPACE: TablespaceId = TablespaceId::new(1);

/// The tablespace holding cluster-shared objects. Locators in it carry
/// no database.
pub const GLOBAL_TABLESPACE: TablespaceId = TablespaceId::new(2);

/// Identifier of a database within the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatabaseId(pub u32);

impl DatabaseId {
    /// Creates a database id from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for DatabaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "db:{}", self.0)
    }
}

/// Stable identity of a storage object, independent of where its files
/// currently live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// Creates an object id from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj:{}", self.0)
    }
}

/// On-disk file name stem of a storage object. Changes when the object
/// is rewritten, unlike its [`ObjectId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileNumber(pub u32);

impl FileNumber {
    /// Creates a file number from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for FileNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file:{}", self.0)
    }
}

/// Physical address of a storage object's files.
///
/// # Invariants
///
/// - `database` is `None` exactly for cluster-shared objects, which
///   live in [`GLOBAL_TABLESPACE`].
/// - Every ordinary object carries the database it belongs to, even
///   when it lives in a non-default tablespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectLocator {
    /// Tablespace the files live under.
    pub tablespace: TablespaceId,
    /// Owning database, `None` for cluster-shared objects.
    pub database: Option<DatabaseId>,
    /// File name stem of the segment files.
    pub file_number: FileNumber,
}

impl ObjectLocator {
    /// Locator for an ordinary per-database object.
    #[must_use]
    pub const fn new(tablespace: TablespaceId, database: DatabaseId, file_number: FileNumber) -> Self {
        Self {
            tablespace,
            database: Some(database),
            file_number,
        }
    }

    /// Locator for a cluster-shared object in the global tablespace.
    #[must_use]
    pub const fn shared(file_number: FileNumber) -> Self {
        Self {
            tablespace: GLOBAL_TABLESPACE,
            database: None,
            file_number,
        }
    }
}

/// The separately sized file sets making up one storage object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fork {
    /// The row data itself.
    Main,
    /// Free space tracking.
    FreeSpace,
    /// Visibility tracking.
    Visibility,
    /// Template initialized at object creation.
    Init,
}

impl Fork {
    /// Every fork, in suffix order. Whole-object sizing sums across
    /// this list.
    pub const ALL: [Fork; 4] = [Fork::Main, Fork::FreeSpace, Fork::Visibility, Fork::Init];

    /// File name suffix appended to the file number. Empty for the main
    /// fork.
    #[must_use]
    pub const fn suffix(&self) -> &'static str {
        match self {
            Fork::Main => "",
            Fork::FreeSpace => "_fsm",
            Fork::Visibility => "_vm",
            Fork::Init => "_init",
        }
    }

    /// Short name used on command lines and in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Fork::Main => "main",
            Fork::FreeSpace => "fsm",
            Fork::Visibility => "vm",
            Fork::Init => "init",
        }
    }

    /// Parses a short fork name as produced by [`Fork::name`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Fork> {
        match name {
            "main" => Some(Fork::Main),
            "fsm" => Some(Fork::FreeSpace),
            "vm" => Some(Fork::Visibility),
            "init" => Some(Fork::Init),
            _ => None,
        }
    }
}

impl fmt::Display for Fork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
