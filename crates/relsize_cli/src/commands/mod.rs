//! CLI command implementations.

pub mod inquire;
pub mod size;
pub mod units;

use relsize_core::{CatalogSnapshot, Layout, SizeInspector, StaticCatalog};
use relsize_fs::LocalFs;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Opens a size inspector over a cluster root.
///
/// With no snapshot file the catalog starts empty, which still serves
/// database and tablespace sizing; object lookups answer not-found.
pub fn open_inspector(
    root: &Path,
    catalog: Option<&Path>,
) -> Result<SizeInspector<StaticCatalog, LocalFs>, Box<dyn std::error::Error>> {
    let catalog = match catalog {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            let snapshot: CatalogSnapshot = serde_json::from_str(&json)?;
            let catalog = StaticCatalog::from_snapshot(&snapshot);
            debug!("loaded catalog snapshot with {} relations", catalog.len());
            catalog
        }
        None => StaticCatalog::new(),
    };
    Ok(SizeInspector::new(
        catalog,
        LocalFs::new(),
        Layout::new(root),
    ))
}
