//! Size composition over catalog metadata.

use crate::cancel::CancelToken;
use crate::catalog::Catalog;
use crate::chain::segment_chain_size;
use crate::dirsize::{directory_size, tablespace_dir_size};
use crate::error::SizeResult;
use crate::layout::Layout;
use crate::types::{DatabaseId, FileNumber, Fork, ObjectId, ObjectLocator, TablespaceId};
use relsize_fs::FsProbe;
use std::path::PathBuf;
use tracing::debug;

/// Computes object, database, and tablespace sizes by combining a
/// [`Catalog`] with a filesystem probe.
///
/// Every operation is a lock-free, best-effort snapshot: concurrent
/// writes, truncations, and drops shift the reported number but never
/// fail the query. Objects that disappear between catalog lookups
/// contribute zero.
#[derive(Debug)]
pub struct SizeInspector<C, F> {
    catalog: C,
    probe: F,
    layout: Layout,
}

impl<C, F> SizeInspector<C, F>
where
    C: Catalog,
    F: FsProbe,
{
    /// Creates an inspector over a catalog, a probe, and the cluster
    /// layout the probe's paths live in.
    pub fn new(catalog: C, probe: F, layout: Layout) -> Self {
        Self {
            catalog,
            probe,
            layout,
        }
    }

    /// The cluster layout this inspector scans.
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// On-disk size of one fork of a storage object, or `None` when the
    /// catalog no longer knows the object.
    pub fn relation_size(
        &self,
        object: ObjectId,
        fork: Fork,
        cancel: &CancelToken,
    ) -> SizeResult<Option<u64>> {
        let Some(meta) = self.catalog.resolve_relation(object)? else {
            return Ok(None);
        };
        let size = self.fork_size(&meta.locator, fork, cancel)?;
        Ok(Some(size))
    }

    /// Size of an object across all forks, including its overflow chain
    /// and the chain's indexes. `None` when the object is unknown.
    pub fn table_size(&self, object: ObjectId, cancel: &CancelToken) -> SizeResult<Option<u64>> {
        let Some(meta) = self.catalog.resolve_relation(object)? else {
            return Ok(None);
        };

        let mut total = self.all_forks_size(&meta.locator, cancel)?;
        if let Some(overflow) = meta.overflow {
            total += self.overflow_size(overflow, cancel)?;
        }
        Ok(Some(total))
    }

    /// Combined size of every index attached to an object, across all
    /// forks. `None` when the object is unknown.
    pub fn indexes_size(&self, object: ObjectId, cancel: &CancelToken) -> SizeResult<Option<u64>> {
        if self.catalog.resolve_relation(object)?.is_none() {
            return Ok(None);
        }

        let mut total = 0;
        for index in self.catalog.relation_indexes(object)? {
            total += self.known_object_size(index, cancel)?;
        }
        Ok(Some(total))
    }

    /// Everything an object occupies: [`table_size`](Self::table_size)
    /// plus [`indexes_size`](Self::indexes_size).
    pub fn total_size(&self, object: ObjectId, cancel: &CancelToken) -> SizeResult<Option<u64>> {
        let Some(table) = self.table_size(object, cancel)? else {
            return Ok(None);
        };
        let indexes = self.indexes_size(object, cancel)?.unwrap_or(0);
        Ok(Some(table + indexes))
    }

    /// Total size of one database across the default tablespace and
    /// every linked tablespace. Cluster-shared objects are not counted.
    ///
    /// A database with no directories anywhere sizes to zero; only the
    /// access check and real filesystem failures error.
    pub fn database_size(&self, database: DatabaseId, cancel: &CancelToken) -> SizeResult<u64> {
        self.catalog.check_database_access(database)?;

        let mut total = directory_size(&self.probe, &self.layout.database_dir(database), cancel)?
            .unwrap_or(0);

        if let Some(links) = self.probe.list_dir(&self.layout.tablespace_link_dir())? {
            for link in links {
                cancel.check()?;
                let dir = self.layout.tablespace_database_dir(&link, database);
                total += directory_size(&self.probe, &dir, cancel)?.unwrap_or(0);
            }
        }

        debug!("sized {}: {} bytes", database, total);
        Ok(total)
    }

    /// Total size of one tablespace, or `None` when its directory has
    /// never been created.
    pub fn tablespace_size(
        &self,
        tablespace: TablespaceId,
        cancel: &CancelToken,
    ) -> SizeResult<Option<u64>> {
        self.catalog.check_tablespace_access(tablespace)?;

        let root = self.layout.tablespace_root(tablespace);
        let size = tablespace_dir_size(&self.probe, &root, cancel)?;
        if let Some(total) = size {
            debug!("sized {}: {} bytes", tablespace, total);
        }
        Ok(size)
    }

    /// Segment 0 path of one fork, rooted at the cluster layout. `None`
    /// when the object is unknown.
    pub fn relation_path(&self, object: ObjectId, fork: Fork) -> SizeResult<Option<PathBuf>> {
        let meta = self.catalog.resolve_relation(object)?;
        Ok(meta.map(|meta| self.layout.relation_path(&meta.locator, fork)))
    }

    /// File number currently backing an object, `None` when unknown.
    pub fn relation_file_number(&self, object: ObjectId) -> SizeResult<Option<FileNumber>> {
        let meta = self.catalog.resolve_relation(object)?;
        Ok(meta.map(|meta| meta.locator.file_number))
    }

    /// Maps a tablespace and file number back to the object stored
    /// there, `None` when nothing is.
    pub fn relation_by_file_number(
        &self,
        tablespace: TablespaceId,
        file_number: FileNumber,
    ) -> SizeResult<Option<ObjectId>> {
        Ok(self.catalog.relation_by_file_number(tablespace, file_number)?)
    }

    fn fork_size(&self, locator: &ObjectLocator, fork: Fork, cancel: &CancelToken) -> SizeResult<u64> {
        let base = self.layout.relation_path(locator, fork);
        segment_chain_size(&self.probe, &base, cancel)
    }

    fn all_forks_size(&self, locator: &ObjectLocator, cancel: &CancelToken) -> SizeResult<u64> {
        let mut total = 0;
        for fork in Fork::ALL {
            total += self.fork_size(locator, fork, cancel)?;
        }
        Ok(total)
    }

    /// All forks of an object that may have vanished; zero when it has.
    fn known_object_size(&self, object: ObjectId, cancel: &CancelToken) -> SizeResult<u64> {
        match self.catalog.resolve_relation(object)? {
            Some(meta) => self.all_forks_size(&meta.locator, cancel),
            None => Ok(0),
        }
    }

    /// Overflow chain plus every index the chain carries.
    fn overflow_size(&self, overflow: ObjectId, cancel: &CancelToken) -> SizeResult<u64> {
        let Some(meta) = self.catalog.resolve_relation(overflow)? else {
            return Ok(0);
        };

        let mut total = self.all_forks_size(&meta.locator, cancel)?;
        for index in self.catalog.relation_indexes(overflow)? {
            total += self.known_object_size(index, cancel)?;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{RelationKind, RelationMeta, StaticCatalog};
    use crate::error::{CatalogError, SizeError};
    use crate::types::{DEFAULT_TABLESPACE, GLOBAL_TABLESPACE};
    use relsize_fs::{MemFs, DIR_LEN};
    use std::io::ErrorKind;

    const DB: DatabaseId = DatabaseId::new(5);
    const TABLE: ObjectId = ObjectId::new(101);
    const OVERFLOW: ObjectId = ObjectId::new(102);
    const OVERFLOW_INDEX: ObjectId = ObjectId::new(103);
    const INDEX_A: ObjectId = ObjectId::new(110);
    const INDEX_B: ObjectId = ObjectId::new(111);

    fn meta(kind: RelationKind, file_number: u32, overflow: Option<ObjectId>) -> RelationMeta {
        RelationMeta {
            locator: ObjectLocator::new(DEFAULT_TABLESPACE, DB, FileNumber::new(file_number)),
            kind,
            overflow,
        }
    }

    /// A table at file 1000 with two segments and fsm/vm forks, an
    /// overflow chain at 2000 with its own index at 2100, and two
    /// indexes at 3000/3100.
    fn fixture() -> SizeInspector<StaticCatalog, MemFs> {
        let fs = MemFs::new();
        fs.add_file("/cluster/base/5/1000", 4000);
        fs.add_file("/cluster/base/5/1000.1", 400);
        fs.add_file("/cluster/base/5/1000_fsm", 40);
        fs.add_file("/cluster/base/5/1000_vm", 4);
        fs.add_file("/cluster/base/5/2000", 700);
        fs.add_file("/cluster/base/5/2100", 70);
        fs.add_file("/cluster/base/5/3000", 500);
        fs.add_file("/cluster/base/5/3100", 50);

        let mut catalog = StaticCatalog::new();
        catalog.insert(TABLE, meta(RelationKind::Table, 1000, Some(OVERFLOW)));
        catalog.insert(OVERFLOW, meta(RelationKind::Overflow, 2000, None));
        catalog.insert(OVERFLOW_INDEX, meta(RelationKind::Index, 2100, None));
        catalog.insert(INDEX_A, meta(RelationKind::Index, 3000, None));
        catalog.insert(INDEX_B, meta(RelationKind::Index, 3100, None));
        catalog.add_index(TABLE, INDEX_A);
        catalog.add_index(TABLE, INDEX_B);
        catalog.add_index(OVERFLOW, OVERFLOW_INDEX);

        SizeInspector::new(catalog, fs, Layout::new("/cluster"))
    }

    #[test]
    fn relation_size_sums_one_fork_chain() {
        let inspector = fixture();
        let cancel = CancelToken::new();
        assert_eq!(inspector.relation_size(TABLE, Fork::Main, &cancel).unwrap(), Some(4400));
        assert_eq!(inspector.relation_size(TABLE, Fork::FreeSpace, &cancel).unwrap(), Some(40));
        assert_eq!(inspector.relation_size(TABLE, Fork::Init, &cancel).unwrap(), Some(0));
    }

    #[test]
    fn relation_size_of_unknown_object_is_none() {
        let inspector = fixture();
        let cancel = CancelToken::new();
        assert_eq!(inspector.relation_size(ObjectId::new(999), Fork::Main, &cancel).unwrap(), None);
    }

    #[test]
    fn table_size_includes_overflow_and_its_index() {
        let inspector = fixture();
        let cancel = CancelToken::new();
        // forks 4444 + overflow 700 + overflow's index 70
        assert_eq!(inspector.table_size(TABLE, &cancel).unwrap(), Some(5214));
    }

    #[test]
    fn indexes_size_sums_all_indexes() {
        let inspector = fixture();
        let cancel = CancelToken::new();
        assert_eq!(inspector.indexes_size(TABLE, &cancel).unwrap(), Some(550));
        assert_eq!(inspector.indexes_size(INDEX_A, &cancel).unwrap(), Some(0));
    }

    #[test]
    fn total_size_is_table_plus_indexes() {
        let inspector = fixture();
        let cancel = CancelToken::new();
        assert_eq!(inspector.total_size(TABLE, &cancel).unwrap(), Some(5214 + 550));
    }

    #[test]
    fn vanished_overflow_contributes_zero() {
        let fs = MemFs::new();
        fs.add_file("/cluster/base/5/1000", 4000);
        let mut catalog = StaticCatalog::new();
        // The overflow id dangles, as after a concurrent drop.
        catalog.insert(TABLE, meta(RelationKind::Table, 1000, Some(OVERFLOW)));
        let inspector = SizeInspector::new(catalog, fs, Layout::new("/cluster"));
        assert_eq!(inspector.table_size(TABLE, &CancelToken::new()).unwrap(), Some(4000));
    }

    #[test]
    fn vanished_index_contributes_zero() {
        let fs = MemFs::new();
        fs.add_file("/cluster/base/5/1000", 4000);
        let mut catalog = StaticCatalog::new();
        catalog.insert(TABLE, meta(RelationKind::Table, 1000, None));
        catalog.add_index(TABLE, INDEX_A);
        let inspector = SizeInspector::new(catalog, fs, Layout::new("/cluster"));
        assert_eq!(inspector.indexes_size(TABLE, &CancelToken::new()).unwrap(), Some(0));
    }

    #[test]
    fn database_size_spans_tablespaces() {
        let fs = MemFs::new();
        fs.add_file("/cluster/base/5/1000", 4000);
        fs.add_file("/cluster/base/5/3000", 500);
        fs.add_file("/cluster/tablespaces/7/v1/5/4000", 800);
        // Another database's files stay out of the sum.
        fs.add_file("/cluster/base/6/9000", 123);
        fs.add_file("/cluster/tablespaces/7/v1/6/9100", 456);

        let inspector = SizeInspector::new(StaticCatalog::new(), fs, Layout::new("/cluster"));
        let total = inspector.database_size(DB, &CancelToken::new()).unwrap();
        assert_eq!(total, 4000 + 500 + 800);
    }

    #[test]
    fn absent_database_sizes_to_zero() {
        let fs = MemFs::new();
        fs.add_dir("/cluster/base");
        let inspector = SizeInspector::new(StaticCatalog::new(), fs, Layout::new("/cluster"));
        assert_eq!(inspector.database_size(DatabaseId::new(42), &CancelToken::new()).unwrap(), 0);
    }

    #[test]
    fn database_access_is_checked_first() {
        let fs = MemFs::new();
        // A probe fault that would fail the scan if it ever ran.
        fs.inject_error("/cluster/base/9", ErrorKind::PermissionDenied);
        let mut catalog = StaticCatalog::new();
        catalog.deny_database(DatabaseId::new(9));
        let inspector = SizeInspector::new(catalog, fs, Layout::new("/cluster"));
        let err = inspector.database_size(DatabaseId::new(9), &CancelToken::new()).unwrap_err();
        assert!(matches!(
            err,
            SizeError::Catalog(CatalogError::DatabaseAccessDenied { .. })
        ));
    }

    #[test]
    fn tablespace_size_covers_default_global_and_linked() {
        let fs = MemFs::new();
        fs.add_file("/cluster/base/5/1000", 4000);
        fs.add_file("/cluster/base/6/9000", 123);
        fs.add_file("/cluster/global/90", 77);
        fs.add_file("/cluster/tablespaces/7/v1/5/4000", 800);

        let inspector = SizeInspector::new(StaticCatalog::new(), fs, Layout::new("/cluster"));
        let cancel = CancelToken::new();

        // base: two db dir inodes plus their contents
        assert_eq!(
            inspector.tablespace_size(DEFAULT_TABLESPACE, &cancel).unwrap(),
            Some(4000 + 123 + 2 * DIR_LEN)
        );
        // global: flat files only
        assert_eq!(inspector.tablespace_size(GLOBAL_TABLESPACE, &cancel).unwrap(), Some(77));
        // linked: one db dir inode plus contents
        assert_eq!(
            inspector.tablespace_size(TablespaceId::new(7), &cancel).unwrap(),
            Some(800 + DIR_LEN)
        );
    }

    #[test]
    fn unknown_tablespace_is_none() {
        let fs = MemFs::new();
        let inspector = SizeInspector::new(StaticCatalog::new(), fs, Layout::new("/cluster"));
        assert_eq!(
            inspector.tablespace_size(TablespaceId::new(8), &CancelToken::new()).unwrap(),
            None
        );
    }

    #[test]
    fn denied_tablespace_errors() {
        let fs = MemFs::new();
        let mut catalog = StaticCatalog::new();
        catalog.deny_tablespace(TablespaceId::new(7));
        let inspector = SizeInspector::new(catalog, fs, Layout::new("/cluster"));
        let err = inspector
            .tablespace_size(TablespaceId::new(7), &CancelToken::new())
            .unwrap_err();
        assert!(matches!(
            err,
            SizeError::Catalog(CatalogError::TablespaceAccessDenied { .. })
        ));
    }

    #[test]
    fn path_and_file_number_inquiries() {
        let inspector = fixture();
        assert_eq!(
            inspector.relation_path(TABLE, Fork::Main).unwrap(),
            Some(PathBuf::from("/cluster/base/5/1000"))
        );
        assert_eq!(
            inspector.relation_path(TABLE, Fork::Visibility).unwrap(),
            Some(PathBuf::from("/cluster/base/5/1000_vm"))
        );
        assert_eq!(inspector.relation_path(ObjectId::new(999), Fork::Main).unwrap(), None);
        assert_eq!(inspector.relation_file_number(TABLE).unwrap(), Some(FileNumber::new(1000)));
        assert_eq!(
            inspector.relation_by_file_number(DEFAULT_TABLESPACE, FileNumber::new(1000)).unwrap(),
            Some(TABLE)
        );
        assert_eq!(
            inspector.relation_by_file_number(DEFAULT_TABLESPACE, FileNumber::new(7777)).unwrap(),
            None
        );
    }

    #[test]
    fn cancellation_aborts_composition() {
        let inspector = fixture();
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = inspector.total_size(TABLE, &cancel).unwrap_err();
        assert!(matches!(err, SizeError::Cancelled));
    }
}
