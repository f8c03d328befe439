//! Inquiry commands: where objects live on disk.

use relsize_core::{FileNumber, Fork, ObjectId, TablespaceId};
use serde::Serialize;
use std::path::Path;

/// A question about object placement.
#[derive(Debug, Clone, Copy)]
pub enum Inquiry {
    /// Filesystem path of one fork of a relation.
    Path {
        /// Object id of the relation.
        object: u32,
        /// Which fork to locate.
        fork: Fork,
    },
    /// File number backing a relation.
    FileNumber {
        /// Object id of the relation.
        object: u32,
    },
    /// Relation behind a file number.
    Locate {
        /// Tablespace id to search.
        tablespace: u32,
        /// File number to look up.
        file_number: u32,
    },
}

/// Result of an inquiry command.
#[derive(Debug, Serialize)]
pub struct InquiryReport {
    /// What was asked about.
    pub target: String,
    /// Whether the catalog knew the answer.
    pub found: bool,
    /// Resolved filesystem path, for path inquiries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Resolved file number, for file-number inquiries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_number: Option<u32>,
    /// Resolved object id, for locate inquiries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<u32>,
}

pub fn run(
    root: &Path,
    catalog: Option<&Path>,
    inquiry: Inquiry,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let inspector = super::open_inspector(root, catalog)?;

    let report = match inquiry {
        Inquiry::Path { object, fork } => {
            let object = ObjectId::new(object);
            let path = inspector.relation_path(object, fork)?;
            InquiryReport {
                target: format!("{object} fork {fork}"),
                found: path.is_some(),
                path: path.map(|p| p.display().to_string()),
                file_number: None,
                object: None,
            }
        }
        Inquiry::FileNumber { object } => {
            let object = ObjectId::new(object);
            let file_number = inspector.relation_file_number(object)?;
            InquiryReport {
                target: object.to_string(),
                found: file_number.is_some(),
                path: None,
                file_number: file_number.map(|file| file.as_u32()),
                object: None,
            }
        }
        Inquiry::Locate {
            tablespace,
            file_number,
        } => {
            let tablespace = TablespaceId::new(tablespace);
            let file_number = FileNumber::new(file_number);
            let object = inspector.relation_by_file_number(tablespace, file_number)?;
            InquiryReport {
                target: format!("{file_number} in {tablespace}"),
                found: object.is_some(),
                path: None,
                file_number: None,
                object: object.map(|id| id.as_u32()),
            }
        }
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_text_output(&report),
    }

    Ok(())
}

fn print_text_output(report: &InquiryReport) {
    if !report.found {
        println!("{}: not found", report.target);
        return;
    }
    if let Some(path) = &report.path {
        println!("{}: {}", report.target, path);
    }
    if let Some(file_number) = report.file_number {
        println!("{}: file {}", report.target, file_number);
    }
    if let Some(object) = report.object {
        println!("{}: object {}", report.target, object);
    }
}
