//! # relsize core
//!
//! Storage-size accounting for segmented relation storage.
//!
//! A cluster stores each object (table, index, overflow chain) as a
//! chain of segment files per fork, laid out under per-tablespace,
//! per-database directories. This crate answers "how big is it?" at
//! every granularity: one fork, one object with everything hanging off
//! it, a whole database, a whole tablespace. It also converts byte
//! counts to and from human-readable strings.
//!
//! ## Design Principles
//!
//! - **Snapshots, not locks**: sizes are computed from plain stat
//!   calls while the cluster keeps running. Files that grow, shrink,
//!   or vanish mid-scan shift the number, never fail it.
//! - **Absence is an answer**: a dropped object, a never-created
//!   tablespace, or a database with no files reports `None` or zero,
//!   not an error.
//! - **One unit table, two backends**: `i64` and [`Decimal`]
//!   formatting share one generic walk, so their output can never
//!   drift apart.
//!
//! ## Example
//!
//! ```
//! use relsize_core::{parse_size, pretty_size};
//!
//! assert_eq!(pretty_size(10240), "10 kB");
//! assert_eq!(parse_size("10 kB").unwrap(), 10240);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cancel;
mod catalog;
mod chain;
mod decimal;
mod dirsize;
mod error;
mod inspect;
mod layout;
mod types;
mod units;

pub use cancel::CancelToken;
pub use catalog::{Catalog, CatalogSnapshot, RelationEntry, RelationKind, RelationMeta, StaticCatalog};
pub use chain::segment_chain_size;
pub use decimal::{Decimal, ParseDecimalError};
pub use dirsize::{directory_size, tablespace_dir_size};
pub use error::{
    CatalogError, CatalogResult, ParseSizeError, ParseSizeResult, SizeError, SizeResult,
};
pub use inspect::SizeInspector;
pub use layout::Layout;
pub use types::{
    DatabaseId, FileNumber, Fork, ObjectId, ObjectLocator, TablespaceId, DEFAULT_TABLESPACE,
    GLOBAL_TABLESPACE,
};
pub use units::{
    parse_size, pretty_size, pretty_size_decimal, NumericBackend, SizeUnit, UnitAlias, SIZE_UNITS,
    UNIT_ALIASES,
};

/// Version of the crate, from the package manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
