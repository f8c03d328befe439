//! # relsize fs
//!
//! Filesystem probe trait and implementations for relsize.
//!
//! Size scans take no locks and must tolerate files vanishing while a
//! scan is in flight. The [`FsProbe`] trait encodes that contract:
//! absence is a value (`None`), not an error, and every other failure is
//! an [`FsError`] carrying the failing path.
//!
//! ## Available Probes
//!
//! - [`LocalFs`] - The real filesystem
//! - [`MemFs`] - In-memory tree for tests, with fault injection
//!
//! ## Example
//!
//! ```rust
//! use relsize_fs::{FsProbe, MemFs};
//! use std::path::Path;
//!
//! let fs = MemFs::new();
//! fs.add_file(Path::new("base/5/1259"), 8192);
//!
//! let stat = fs.stat(Path::new("base/5/1259")).unwrap().unwrap();
//! assert_eq!(stat.len, 8192);
//! assert!(fs.stat(Path::new("base/5/9999")).unwrap().is_none());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod local;
mod memory;
mod probe;

pub use error::{FsError, FsResult};
pub use local::LocalFs;
pub use memory::{MemFs, DIR_LEN};
pub use probe::{FileStat, FsProbe};
