//! Size commands: relation, table, indexes, total, database, tablespace.

use relsize_core::{
    pretty_size, pretty_size_decimal, CancelToken, DatabaseId, Decimal, Fork, ObjectId,
    TablespaceId,
};
use serde::Serialize;
use std::path::Path;

/// What a size command measures.
#[derive(Debug, Clone, Copy)]
pub enum SizeTarget {
    /// One fork of a relation.
    Relation {
        /// Object id of the relation.
        object: u32,
        /// Which fork to measure.
        fork: Fork,
    },
    /// All forks of a table plus its overflow chain.
    Table {
        /// Object id of the table.
        object: u32,
    },
    /// Every index attached to a relation.
    Indexes {
        /// Object id of the indexed relation.
        object: u32,
    },
    /// Table plus indexes.
    Total {
        /// Object id of the table.
        object: u32,
    },
    /// One database across all tablespaces.
    Database {
        /// Database id.
        database: u32,
    },
    /// One tablespace across all databases.
    Tablespace {
        /// Tablespace id.
        tablespace: u32,
    },
}

/// Result of a size command.
#[derive(Debug, Serialize)]
pub struct SizeReport {
    /// What was measured.
    pub target: String,
    /// Raw byte count; absent when the target does not exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    /// Human-readable rendering of `bytes`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<String>,
}

pub fn run(
    root: &Path,
    catalog: Option<&Path>,
    target: SizeTarget,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let inspector = super::open_inspector(root, catalog)?;
    let cancel = CancelToken::new();

    let (label, bytes) = match target {
        SizeTarget::Relation { object, fork } => {
            let object = ObjectId::new(object);
            (
                format!("{object} fork {fork}"),
                inspector.relation_size(object, fork, &cancel)?,
            )
        }
        SizeTarget::Table { object } => {
            let object = ObjectId::new(object);
            (object.to_string(), inspector.table_size(object, &cancel)?)
        }
        SizeTarget::Indexes { object } => {
            let object = ObjectId::new(object);
            (
                format!("indexes of {object}"),
                inspector.indexes_size(object, &cancel)?,
            )
        }
        SizeTarget::Total { object } => {
            let object = ObjectId::new(object);
            (
                format!("{object} with indexes"),
                inspector.total_size(object, &cancel)?,
            )
        }
        SizeTarget::Database { database } => {
            let database = DatabaseId::new(database);
            (
                database.to_string(),
                Some(inspector.database_size(database, &cancel)?),
            )
        }
        SizeTarget::Tablespace { tablespace } => {
            let tablespace = TablespaceId::new(tablespace);
            (
                tablespace.to_string(),
                inspector.tablespace_size(tablespace, &cancel)?,
            )
        }
    };

    let report = SizeReport {
        target: label,
        bytes,
        pretty: bytes.map(pretty_bytes),
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_text_output(&report),
    }

    Ok(())
}

/// Renders a scanned byte count. Sums can exceed `i64`, so the wide
/// ones go through the decimal backend.
fn pretty_bytes(bytes: u64) -> String {
    match i64::try_from(bytes) {
        Ok(value) => pretty_size(value),
        Err(_) => bytes
            .to_string()
            .parse::<Decimal>()
            .map(|value| pretty_size_decimal(&value))
            .unwrap_or_else(|_| format!("{bytes} bytes")),
    }
}

fn print_text_output(report: &SizeReport) {
    match (report.bytes, &report.pretty) {
        (Some(bytes), Some(pretty)) => println!("{}: {} ({} bytes)", report.target, pretty, bytes),
        _ => println!("{}: not found", report.target),
    }
}
