//! Unit conversion commands: pretty and bytes.

use relsize_core::{parse_size, pretty_size, pretty_size_decimal, Decimal};
use serde::Serialize;

/// Result of a pretty-print conversion.
#[derive(Debug, Serialize)]
pub struct PrettyReport {
    /// Byte count as given.
    pub input: String,
    /// Scaled, human-readable rendering.
    pub pretty: String,
}

/// Result of a size-text parse.
#[derive(Debug, Serialize)]
pub struct BytesReport {
    /// Size text as given.
    pub input: String,
    /// Parsed byte count.
    pub bytes: i64,
}

/// Renders a byte count in the largest unit that keeps the value
/// readable. Integer input takes the fast path; anything wider or
/// fractional goes through the decimal backend.
pub fn run_pretty(size: &str, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let pretty = match size.trim().parse::<i64>() {
        Ok(value) => pretty_size(value),
        Err(_) => {
            let value: Decimal = size.trim().parse()?;
            pretty_size_decimal(&value)
        }
    };

    let report = PrettyReport {
        input: size.to_string(),
        pretty,
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => println!("{}", report.pretty),
    }

    Ok(())
}

/// Parses a human-readable size like "512 MB" into bytes.
pub fn run_bytes(text: &str, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = parse_size(text)?;

    let report = BytesReport {
        input: text.to_string(),
        bytes,
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => println!("{}", report.bytes),
    }

    Ok(())
}
