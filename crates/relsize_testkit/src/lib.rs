//! # relsize Testkit
//!
//! Test utilities for relsize.
//!
//! This crate provides:
//! - Throwaway on-disk cluster fixtures with matching catalog snapshots
//! - Canned cluster scenarios
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use relsize_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_cluster() {
//!     with_cluster(|cluster| {
//!         let table = cluster.add_table(101, 5, 1000, &[8192]);
//!         // ... assertions over cluster.inspector()
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
