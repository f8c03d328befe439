//! Error types for size scans, catalog lookups, and size-string
//! parsing.

use crate::types::{DatabaseId, ObjectId, TablespaceId};
use relsize_fs::FsError;
use thiserror::Error;

/// Errors that can fail a size scan.
///
/// Absence is never an error: missing segments, directories, and
/// catalog entries are expressed through `Option` on the operations
/// that can encounter them.
#[derive(Debug, Error)]
pub enum SizeError {
    /// A filesystem probe failed for a reason other than absence.
    #[error(transparent)]
    Fs(#[from] FsError),

    /// The catalog refused or failed a lookup.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The scan's cancel token tripped.
    #[error("size scan cancelled")]
    Cancelled,
}

/// Result alias for size scans.
pub type SizeResult<T> = Result<T, SizeError>;

/// Errors raised by [`Catalog`](crate::Catalog) implementations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The caller may not size the database.
    #[error("permission denied for {database}")]
    DatabaseAccessDenied {
        /// The database the check was made against.
        database: DatabaseId,
    },

    /// The caller may not size the tablespace.
    #[error("permission denied for {tablespace}")]
    TablespaceAccessDenied {
        /// The tablespace the check was made against.
        tablespace: TablespaceId,
    },

    /// The catalog backend failed to answer a lookup.
    #[error("catalog lookup failed for {object}: {reason}")]
    Lookup {
        /// The object being resolved.
        object: ObjectId,
        /// Backend-specific failure description.
        reason: String,
    },
}

impl CatalogError {
    /// Creates a lookup failure for `object`.
    #[must_use]
    pub fn lookup(object: ObjectId, reason: impl Into<String>) -> Self {
        Self::Lookup {
            object,
            reason: reason.into(),
        }
    }
}

/// Result alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised when parsing a human-readable size string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseSizeError {
    /// The numeric part is missing or malformed.
    #[error("invalid size: \"{input}\"")]
    InvalidNumber {
        /// The full rejected input.
        input: String,
    },

    /// The unit part matched nothing in the unit table.
    // Keep the unit list in sync with SIZE_UNITS and UNIT_ALIASES.
    #[error(
        "invalid size unit: \"{unit}\" (valid units are \"bytes\", \"B\", \"kB\", \"MB\", \"GB\", \"TB\", and \"PB\")"
    )]
    InvalidUnit {
        /// The rejected unit text.
        unit: String,
    },

    /// The value does not fit a signed 64-bit byte count.
    #[error("size is out of range: \"{input}\"")]
    OutOfRange {
        /// The full rejected input.
        input: String,
    },
}

impl ParseSizeError {
    /// Creates an invalid-number error citing `input`.
    #[must_use]
    pub fn invalid_number(input: impl Into<String>) -> Self {
        Self::InvalidNumber {
            input: input.into(),
        }
    }

    /// Creates an invalid-unit error citing the unit text.
    #[must_use]
    pub fn invalid_unit(unit: impl Into<String>) -> Self {
        Self::InvalidUnit { unit: unit.into() }
    }

    /// Creates an out-of-range error citing `input`.
    #[must_use]
    pub fn out_of_range(input: impl Into<String>) -> Self {
        Self::OutOfRange {
            input: input.into(),
        }
    }
}

/// Result alias for size-string parsing.
pub type ParseSizeResult<T> = Result<T, ParseSizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_denied_cites_the_id() {
        let err = CatalogError::DatabaseAccessDenied {
            database: DatabaseId::new(9),
        };
        assert_eq!(err.to_string(), "permission denied for db:9");
    }

    #[test]
    fn invalid_unit_lists_valid_units() {
        let err = ParseSizeError::invalid_unit("XB");
        let message = err.to_string();
        assert!(message.starts_with("invalid size unit: \"XB\""));
        assert!(message.contains("\"bytes\""));
        assert!(message.contains("\"PB\""));
    }

    #[test]
    fn fs_errors_convert() {
        let fs = FsError::stat(
            std::path::Path::new("/x"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let err = SizeError::from(fs);
        assert!(matches!(err, SizeError::Fs(_)));
        assert!(err.to_string().contains("could not stat file"));
    }
}
