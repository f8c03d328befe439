//! Cluster fixtures for size tests.
//!
//! Provides a throwaway on-disk cluster with a matching catalog
//! snapshot, plus canned scenarios for common shapes.

use relsize_core::{
    CatalogSnapshot, DatabaseId, FileNumber, Fork, Layout, ObjectId, ObjectLocator, RelationEntry,
    RelationKind, SizeInspector, StaticCatalog, TablespaceId, DEFAULT_TABLESPACE,
};
use relsize_fs::LocalFs;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A throwaway on-disk cluster with automatic cleanup.
///
/// Files are written through `std::fs`; the catalog side lives in a
/// [`CatalogSnapshot`] so tests can exercise the same loading path the
/// command-line tool uses.
pub struct ClusterFixture {
    /// Snapshot describing every object registered so far.
    pub snapshot: CatalogSnapshot,
    layout: Layout,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: TempDir,
}

impl ClusterFixture {
    /// Creates an empty cluster with `base` and `global` directories in
    /// place, as any real cluster has.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let layout = Layout::new(temp_dir.path());
        fs::create_dir_all(layout.base_dir()).expect("Failed to create base directory");
        fs::create_dir_all(layout.global_dir()).expect("Failed to create global directory");
        Self {
            snapshot: CatalogSnapshot::default(),
            layout,
            _temp_dir: temp_dir,
        }
    }

    /// The layout rooted at this fixture's temp directory.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The cluster root path.
    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    /// Writes one fork of a locator as a chain of segment files with
    /// the given lengths.
    pub fn write_fork(&self, locator: &ObjectLocator, fork: Fork, segment_sizes: &[u64]) {
        let base = self.layout.relation_path(locator, fork);
        if let Some(parent) = base.parent() {
            fs::create_dir_all(parent).expect("Failed to create object directory");
        }
        for (segment, &len) in segment_sizes.iter().enumerate() {
            let path = Layout::segment_path(&base, segment as u32);
            let file = fs::File::create(&path).expect("Failed to create segment file");
            file.set_len(len).expect("Failed to size segment file");
        }
    }

    /// Registers a table in the default tablespace of `database` and
    /// writes its main fork. Returns the table's id.
    pub fn add_table(&mut self, id: u32, database: u32, file_number: u32, segment_sizes: &[u64]) -> ObjectId {
        let locator = self.default_locator(database, file_number);
        self.write_fork(&locator, Fork::Main, segment_sizes);
        self.snapshot.relations.push(RelationEntry {
            id,
            tablespace: DEFAULT_TABLESPACE.as_u32(),
            database: Some(database),
            file_number,
            kind: RelationKind::Table,
            overflow: None,
            indexes: Vec::new(),
        });
        ObjectId::new(id)
    }

    /// Registers an index on `table` and writes its main fork.
    pub fn add_index(&mut self, table: u32, id: u32, database: u32, file_number: u32, len: u64) -> ObjectId {
        let locator = self.default_locator(database, file_number);
        self.write_fork(&locator, Fork::Main, &[len]);
        self.snapshot.relations.push(RelationEntry {
            id,
            tablespace: DEFAULT_TABLESPACE.as_u32(),
            database: Some(database),
            file_number,
            kind: RelationKind::Index,
            overflow: None,
            indexes: Vec::new(),
        });
        self.entry_mut(table).indexes.push(id);
        ObjectId::new(id)
    }

    /// Registers an overflow chain on `table` and writes its main fork.
    pub fn add_overflow(&mut self, table: u32, id: u32, database: u32, file_number: u32, len: u64) -> ObjectId {
        let locator = self.default_locator(database, file_number);
        self.write_fork(&locator, Fork::Main, &[len]);
        self.snapshot.relations.push(RelationEntry {
            id,
            tablespace: DEFAULT_TABLESPACE.as_u32(),
            database: Some(database),
            file_number,
            kind: RelationKind::Overflow,
            overflow: None,
            indexes: Vec::new(),
        });
        self.entry_mut(table).overflow = Some(id);
        ObjectId::new(id)
    }

    /// Builds a catalog from the current snapshot.
    pub fn catalog(&self) -> StaticCatalog {
        StaticCatalog::from_snapshot(&self.snapshot)
    }

    /// Builds an inspector over the fixture's files and catalog.
    pub fn inspector(&self) -> SizeInspector<StaticCatalog, LocalFs> {
        SizeInspector::new(self.catalog(), LocalFs::new(), self.layout.clone())
    }

    /// Writes the catalog snapshot as pretty JSON, the format the
    /// command-line tool loads.
    pub fn write_snapshot(&self, path: &Path) {
        let json = serde_json::to_string_pretty(&self.snapshot).expect("Failed to serialize snapshot");
        fs::write(path, json).expect("Failed to write snapshot file");
    }

    fn default_locator(&self, database: u32, file_number: u32) -> ObjectLocator {
        ObjectLocator::new(DEFAULT_TABLESPACE, DatabaseId::new(database), FileNumber::new(file_number))
    }

    fn entry_mut(&mut self, id: u32) -> &mut RelationEntry {
        self.snapshot
            .relations
            .iter_mut()
            .find(|entry| entry.id == id)
            .expect("Object not registered in fixture")
    }
}

impl Default for ClusterFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a test against a fresh empty cluster.
///
/// # Example
///
/// ```rust,ignore
/// use relsize_testkit::with_cluster;
///
/// #[test]
/// fn my_test() {
///     with_cluster(|cluster| {
///         cluster.add_table(101, 5, 1000, &[8192]);
///         // ... assertions over cluster.inspector()
///     });
/// }
/// ```
pub fn with_cluster<F, R>(f: F) -> R
where
    F: FnOnce(&mut ClusterFixture) -> R,
{
    let mut fixture = ClusterFixture::new();
    f(&mut fixture)
}

/// Canned cluster shapes.
pub mod scenarios {
    use super::*;

    /// Database 5 holding one table (file 1000, segments 8192+4096)
    /// with two indexes (2048 and 1024 bytes) and an overflow chain
    /// (512 bytes) carrying its own index (256 bytes).
    pub fn table_with_attachments() -> ClusterFixture {
        let mut cluster = ClusterFixture::new();
        cluster.add_table(101, 5, 1000, &[8192, 4096]);
        cluster.add_index(101, 110, 5, 3000, 2048);
        cluster.add_index(101, 111, 5, 3100, 1024);
        cluster.add_overflow(101, 102, 5, 2000, 512);
        cluster.add_index(102, 103, 5, 2100, 256);
        cluster
    }

    /// Databases 5 and 6, each with one table in the default
    /// tablespace; database 5 also stores a table in linked
    /// tablespace 7.
    pub fn multi_tablespace_cluster() -> ClusterFixture {
        let mut cluster = ClusterFixture::new();
        cluster.add_table(101, 5, 1000, &[4000]);
        cluster.add_table(201, 6, 1000, &[123]);

        let locator = ObjectLocator::new(TablespaceId::new(7), DatabaseId::new(5), FileNumber::new(4000));
        cluster.write_fork(&locator, Fork::Main, &[800]);
        cluster.snapshot.relations.push(RelationEntry {
            id: 301,
            tablespace: 7,
            database: Some(5),
            file_number: 4000,
            kind: RelationKind::Table,
            overflow: None,
            indexes: Vec::new(),
        });
        cluster
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relsize_core::Catalog;

    #[test]
    fn fixture_creates_cluster_directories() {
        let cluster = ClusterFixture::new();
        assert!(cluster.layout().base_dir().is_dir());
        assert!(cluster.layout().global_dir().is_dir());
    }

    #[test]
    fn write_fork_places_segment_files() {
        let mut cluster = ClusterFixture::new();
        cluster.add_table(101, 5, 1000, &[100, 200]);
        let base = cluster.root().join("base/5/1000");
        assert_eq!(fs::metadata(&base).unwrap().len(), 100);
        assert_eq!(fs::metadata(cluster.root().join("base/5/1000.1")).unwrap().len(), 200);
    }

    #[test]
    fn scenario_catalog_is_consistent() {
        let cluster = scenarios::table_with_attachments();
        let catalog = cluster.catalog();
        let meta = catalog
            .resolve_relation(ObjectId::new(101))
            .unwrap()
            .expect("table registered");
        assert_eq!(meta.overflow, Some(ObjectId::new(102)));
        assert_eq!(catalog.relation_indexes(ObjectId::new(101)).unwrap().len(), 2);
    }
}
