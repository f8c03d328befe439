//! relsize command-line interface.
//!
//! Answers size questions about a cluster directory from the shell:
//! per-relation and per-fork sizes, composed table totals, database and
//! tablespace footprints, plus the unit conversions used to read and
//! write the answers.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::inquire::Inquiry;
use commands::size::SizeTarget;

#[derive(Parser)]
#[command(name = "relsize")]
#[command(about = "Size accounting tools for relsize clusters", long_about = None)]
struct Cli {
    /// Cluster root directory
    #[arg(global = true, short, long)]
    root: Option<PathBuf>,

    /// Catalog snapshot file (JSON); omit for an empty catalog
    #[arg(global = true, short, long)]
    catalog: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Size of one fork of a relation
    Relation {
        /// Object id of the relation
        object: u32,

        /// Fork to measure: main, fsm, vm, or init
        #[arg(short, long, default_value = "main")]
        fork: String,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Size of a table: all forks plus its overflow chain
    Table {
        /// Object id of the table
        object: u32,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Combined size of every index attached to a relation
    Indexes {
        /// Object id of the indexed relation
        object: u32,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Total size of a table including its indexes
    Total {
        /// Object id of the table
        object: u32,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Size of a database across all tablespaces
    Database {
        /// Database id
        database: u32,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Size of a tablespace across all databases
    Tablespace {
        /// Tablespace id
        tablespace: u32,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Filesystem path of one fork of a relation
    Path {
        /// Object id of the relation
        object: u32,

        /// Fork to locate: main, fsm, vm, or init
        #[arg(short, long, default_value = "main")]
        fork: String,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// File number backing a relation
    FileNumber {
        /// Object id of the relation
        object: u32,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Relation behind a file number in a tablespace
    Locate {
        /// Tablespace id to search
        tablespace: u32,

        /// File number to look up
        file_number: u32,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Render a byte count as a human-readable size
    Pretty {
        /// Byte count, integer or decimal
        size: String,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Parse a human-readable size into bytes
    Bytes {
        /// Size text, e.g. "512 MB"
        text: String,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging: -v wins, then RELSIZE_LOG, then info.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("RELSIZE_LOG").unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Relation {
            object,
            fork,
            format,
        } => {
            let root = cli.root.ok_or("Cluster root required for relation")?;
            let fork = parse_fork(&fork)?;
            let target = SizeTarget::Relation { object, fork };
            commands::size::run(&root, cli.catalog.as_deref(), target, &format)?;
        }
        Commands::Table { object, format } => {
            let root = cli.root.ok_or("Cluster root required for table")?;
            let target = SizeTarget::Table { object };
            commands::size::run(&root, cli.catalog.as_deref(), target, &format)?;
        }
        Commands::Indexes { object, format } => {
            let root = cli.root.ok_or("Cluster root required for indexes")?;
            let target = SizeTarget::Indexes { object };
            commands::size::run(&root, cli.catalog.as_deref(), target, &format)?;
        }
        Commands::Total { object, format } => {
            let root = cli.root.ok_or("Cluster root required for total")?;
            let target = SizeTarget::Total { object };
            commands::size::run(&root, cli.catalog.as_deref(), target, &format)?;
        }
        Commands::Database { database, format } => {
            let root = cli.root.ok_or("Cluster root required for database")?;
            let target = SizeTarget::Database { database };
            commands::size::run(&root, cli.catalog.as_deref(), target, &format)?;
        }
        Commands::Tablespace { tablespace, format } => {
            let root = cli.root.ok_or("Cluster root required for tablespace")?;
            let target = SizeTarget::Tablespace { tablespace };
            commands::size::run(&root, cli.catalog.as_deref(), target, &format)?;
        }
        Commands::Path {
            object,
            fork,
            format,
        } => {
            let root = cli.root.ok_or("Cluster root required for path")?;
            let fork = parse_fork(&fork)?;
            let inquiry = Inquiry::Path { object, fork };
            commands::inquire::run(&root, cli.catalog.as_deref(), inquiry, &format)?;
        }
        Commands::FileNumber { object, format } => {
            let root = cli.root.ok_or("Cluster root required for file-number")?;
            let inquiry = Inquiry::FileNumber { object };
            commands::inquire::run(&root, cli.catalog.as_deref(), inquiry, &format)?;
        }
        Commands::Locate {
            tablespace,
            file_number,
            format,
        } => {
            let root = cli.root.ok_or("Cluster root required for locate")?;
            let inquiry = Inquiry::Locate {
                tablespace,
                file_number,
            };
            commands::inquire::run(&root, cli.catalog.as_deref(), inquiry, &format)?;
        }
        Commands::Pretty { size, format } => {
            commands::units::run_pretty(&size, &format)?;
        }
        Commands::Bytes { text, format } => {
            commands::units::run_bytes(&text, &format)?;
        }
        Commands::Version => {
            println!("relsize CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("relsize Core v{}", relsize_core::VERSION);
        }
    }

    Ok(())
}

fn parse_fork(name: &str) -> Result<relsize_core::Fork, Box<dyn std::error::Error>> {
    relsize_core::Fork::from_name(name)
        .ok_or_else(|| format!("Unknown fork: {name} (expected main, fsm, vm, or init)").into())
}
