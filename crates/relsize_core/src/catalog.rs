//! Catalog metadata the size composer consumes.
//!
//! The composer never walks the filesystem to discover objects; it asks
//! a [`Catalog`] what exists, where it lives, and what hangs off it.
//! Production systems back this with their live metadata store, while
//! tools and tests use [`StaticCatalog`], an immutable in-memory table
//! that can be loaded from a JSON snapshot.

use crate::error::{CatalogError, CatalogResult};
use crate::types::{DatabaseId, FileNumber, ObjectId, ObjectLocator, TablespaceId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// What kind of storage object an [`ObjectId`] names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    /// A heap of rows.
    #[default]
    Table,
    /// An index over a table or overflow chain.
    Index,
    /// An overflow chain holding out-of-line values of a table.
    Overflow,
}

/// Everything the size composer needs to know about one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationMeta {
    /// Where the object's files live.
    pub locator: ObjectLocator,
    /// What the object is.
    pub kind: RelationKind,
    /// The overflow chain attached to a table, if any. The chain's
    /// indexes are reached through [`Catalog::relation_indexes`] on the
    /// chain's own id.
    pub overflow: Option<ObjectId>,
}

/// Read-only catalog surface for size composition.
///
/// # Invariants
///
/// - Lookups for unknown ids answer `Ok(None)` or an empty list, never
///   an error. Errors mean the backend itself failed.
/// - Access checks pass unless the caller is positively denied.
///
/// # Implementors
///
/// Implementations must be safe to share across threads; a scan may
/// interleave lookups from several workers.
pub trait Catalog: Send + Sync {
    /// Resolves an object id to its metadata, `None` if it no longer
    /// exists.
    fn resolve_relation(&self, object: ObjectId) -> CatalogResult<Option<RelationMeta>>;

    /// Ids of every index attached to `object`. Empty for objects
    /// without indexes and for unknown ids.
    fn relation_indexes(&self, object: ObjectId) -> CatalogResult<Vec<ObjectId>>;

    /// Finds the object currently stored under a file number within a
    /// tablespace.
    fn relation_by_file_number(
        &self,
        tablespace: TablespaceId,
        file_number: FileNumber,
    ) -> CatalogResult<Option<ObjectId>>;

    /// Fails with [`CatalogError::DatabaseAccessDenied`] if the caller
    /// may not size `database`.
    fn check_database_access(&self, database: DatabaseId) -> CatalogResult<()>;

    /// Fails with [`CatalogError::TablespaceAccessDenied`] if the
    /// caller may not size `tablespace`.
    fn check_tablespace_access(&self, tablespace: TablespaceId) -> CatalogResult<()>;
}

/// One relation in a [`CatalogSnapshot`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationEntry {
    /// Raw object id.
    pub id: u32,
    /// Raw tablespace id the files live under.
    pub tablespace: u32,
    /// Raw owning database id; omit for cluster-shared objects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<u32>,
    /// Raw file number backing the object.
    pub file_number: u32,
    /// Object kind, defaulting to a table.
    #[serde(default)]
    pub kind: RelationKind,
    /// Raw id of the attached overflow chain, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overflow: Option<u32>,
    /// Raw ids of the indexes attached to this object.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<u32>,
}

/// Serializable form of a [`StaticCatalog`].
///
/// Access control is deny-list based: anything not listed is
/// accessible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Every known relation.
    #[serde(default)]
    pub relations: Vec<RelationEntry>,
    /// Raw ids of databases the caller may not size.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub denied_databases: Vec<u32>,
    /// Raw ids of tablespaces the caller may not size.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub denied_tablespaces: Vec<u32>,
}

/// Immutable in-memory [`Catalog`].
///
/// Later inserts of the same object id replace earlier ones, so a
/// snapshot with duplicate entries keeps the last.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    relations: BTreeMap<ObjectId, RelationMeta>,
    indexes: BTreeMap<ObjectId, Vec<ObjectId>>,
    by_file_number: BTreeMap<(TablespaceId, FileNumber), ObjectId>,
    denied_databases: BTreeSet<DatabaseId>,
    denied_tablespaces: BTreeSet<TablespaceId>,
}

impl StaticCatalog {
    /// Creates an empty catalog: no objects, everything accessible.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &CatalogSnapshot) -> Self {
        let mut catalog = Self::new();
        for entry in &snapshot.relations {
            let locator = ObjectLocator {
                tablespace: TablespaceId::new(entry.tablespace),
                database: entry.database.map(DatabaseId::new),
                file_number: FileNumber::new(entry.file_number),
            };
            let object = ObjectId::new(entry.id);
            catalog.insert(
                object,
                RelationMeta {
                    locator,
                    kind: entry.kind,
                    overflow: entry.overflow.map(ObjectId::new),
                },
            );
            for &index in &entry.indexes {
                catalog.add_index(object, ObjectId::new(index));
            }
        }
        for &database in &snapshot.denied_databases {
            catalog.deny_database(DatabaseId::new(database));
        }
        for &tablespace in &snapshot.denied_tablespaces {
            catalog.deny_tablespace(TablespaceId::new(tablespace));
        }
        catalog
    }

    /// Registers an object, replacing any previous entry for its id.
    pub fn insert(&mut self, object: ObjectId, meta: RelationMeta) {
        self.by_file_number
            .insert((meta.locator.tablespace, meta.locator.file_number), object);
        self.relations.insert(object, meta);
    }

    /// Attaches an index id to an object.
    pub fn add_index(&mut self, object: ObjectId, index: ObjectId) {
        self.indexes.entry(object).or_default().push(index);
    }

    /// Marks a database as denied to the caller.
    pub fn deny_database(&mut self, database: DatabaseId) {
        self.denied_databases.insert(database);
    }

    /// Marks a tablespace as denied to the caller.
    pub fn deny_tablespace(&mut self, tablespace: TablespaceId) {
        self.denied_tablespaces.insert(tablespace);
    }

    /// Number of registered objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    /// True if no objects are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

impl Catalog for StaticCatalog {
    fn resolve_relation(&self, object: ObjectId) -> CatalogResult<Option<RelationMeta>> {
        Ok(self.relations.get(&object).copied())
    }

    fn relation_indexes(&self, object: ObjectId) -> CatalogResult<Vec<ObjectId>> {
        Ok(self.indexes.get(&object).cloned().unwrap_or_default())
    }

    fn relation_by_file_number(
        &self,
        tablespace: TablespaceId,
        file_number: FileNumber,
    ) -> CatalogResult<Option<ObjectId>> {
        Ok(self.by_file_number.get(&(tablespace, file_number)).copied())
    }

    fn check_database_access(&self, database: DatabaseId) -> CatalogResult<()> {
        if self.denied_databases.contains(&database) {
            return Err(CatalogError::DatabaseAccessDenied { database });
        }
        Ok(())
    }

    fn check_tablespace_access(&self, tablespace: TablespaceId) -> CatalogResult<()> {
        if self.denied_tablespaces.contains(&tablespace) {
            return Err(CatalogError::TablespaceAccessDenied { tablespace });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_TABLESPACE;

    fn table_meta(file_number: u32) -> RelationMeta {
        RelationMeta {
            locator: ObjectLocator::new(DEFAULT_TABLESPACE, DatabaseId::new(5), FileNumber::new(file_number)),
            kind: RelationKind::Table,
            overflow: None,
        }
    }

    #[test]
    fn unknown_ids_resolve_to_none() {
        let catalog = StaticCatalog::new();
        assert_eq!(catalog.resolve_relation(ObjectId::new(1)).unwrap(), None);
        assert!(catalog.relation_indexes(ObjectId::new(1)).unwrap().is_empty());
    }

    #[test]
    fn insert_and_resolve() {
        let mut catalog = StaticCatalog::new();
        catalog.insert(ObjectId::new(101), table_meta(1259));
        let meta = catalog.resolve_relation(ObjectId::new(101)).unwrap().unwrap();
        assert_eq!(meta.locator.file_number, FileNumber::new(1259));
        assert_eq!(meta.kind, RelationKind::Table);
    }

    #[test]
    fn file_number_reverse_lookup() {
        let mut catalog = StaticCatalog::new();
        catalog.insert(ObjectId::new(101), table_meta(1259));
        assert_eq!(
            catalog
                .relation_by_file_number(DEFAULT_TABLESPACE, FileNumber::new(1259))
                .unwrap(),
            Some(ObjectId::new(101))
        );
        assert_eq!(
            catalog
                .relation_by_file_number(DEFAULT_TABLESPACE, FileNumber::new(9999))
                .unwrap(),
            None
        );
    }

    #[test]
    fn access_is_permissive_until_denied() {
        let mut catalog = StaticCatalog::new();
        assert!(catalog.check_database_access(DatabaseId::new(5)).is_ok());
        catalog.deny_database(DatabaseId::new(5));
        assert_eq!(
            catalog.check_database_access(DatabaseId::new(5)),
            Err(CatalogError::DatabaseAccessDenied {
                database: DatabaseId::new(5)
            })
        );
        assert!(catalog.check_database_access(DatabaseId::new(6)).is_ok());
    }

    #[test]
    fn snapshot_round_trip() {
        let snapshot = CatalogSnapshot {
            relations: vec![RelationEntry {
                id: 101,
                tablespace: 1,
                database: Some(5),
                file_number: 1259,
                kind: RelationKind::Table,
                overflow: Some(102),
                indexes: vec![110, 111],
            }],
            denied_databases: vec![9],
            denied_tablespaces: vec![],
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: CatalogSnapshot = serde_json::from_str(&json).unwrap();
        let catalog = StaticCatalog::from_snapshot(&parsed);

        let meta = catalog.resolve_relation(ObjectId::new(101)).unwrap().unwrap();
        assert_eq!(meta.overflow, Some(ObjectId::new(102)));
        assert_eq!(
            catalog.relation_indexes(ObjectId::new(101)).unwrap(),
            vec![ObjectId::new(110), ObjectId::new(111)]
        );
        assert!(catalog.check_database_access(DatabaseId::new(9)).is_err());
    }

    #[test]
    fn snapshot_defaults_are_lenient() {
        let parsed: CatalogSnapshot =
            serde_json::from_str(r#"{"relations": [{"id": 1, "tablespace": 1, "file_number": 10}]}"#).unwrap();
        let catalog = StaticCatalog::from_snapshot(&parsed);
        let meta = catalog.resolve_relation(ObjectId::new(1)).unwrap().unwrap();
        assert_eq!(meta.kind, RelationKind::Table);
        assert_eq!(meta.locator.database, None);
        assert_eq!(meta.overflow, None);
    }

    #[test]
    fn duplicate_entries_keep_the_last() {
        let mut catalog = StaticCatalog::new();
        catalog.insert(ObjectId::new(101), table_meta(1259));
        catalog.insert(ObjectId::new(101), table_meta(2000));
        let meta = catalog.resolve_relation(ObjectId::new(101)).unwrap().unwrap();
        assert_eq!(meta.locator.file_number, FileNumber::new(2000));
        assert_eq!(catalog.len(), 1);
    }
}
