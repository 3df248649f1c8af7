// file: src/parsers/mod.rs
// version: 1.0.0
// guid: 2e8f4a61-7b0c-4d3e-9a52-c1f6b8d0e7a3

//! Fact parsers
//!
//! One parser per external data source. Every parser takes the
//! [`ShellResult`] of the command that produced its input, so a failed
//! command is propagated untouched and never parsed as if it were data.
//! List-shaped parsers skip malformed rows with a warning and keep the
//! rest.

pub mod cpu;
pub mod cpuinfo;
pub mod disk;
pub mod frequency;
pub mod memory;
pub mod network;
pub mod process;
pub mod system;
pub mod wifi;

pub use cpu::CacheSizes;
pub use disk::DiskUsageRecord;
pub use frequency::{convert_frequency, CoreFrequencies, FrequencyKind, FrequencyUnit};
pub use memory::{MemoryUnit, RamUsage};
pub use network::{LinkState, NetworkInterfaceInfo};
pub use process::ProcessRecord;
pub use wifi::WifiNetworkRecord;

use crate::shell::{ShellError, ShellResult};
use thiserror::Error;

/// Tool output did not have the expected shape
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to parse '{tool}' output: {reason}")]
pub struct ParseFailure {
    pub tool: &'static str,
    pub reason: String,
}

impl ParseFailure {
    pub fn new(tool: &'static str, reason: impl Into<String>) -> Self {
        Self {
            tool,
            reason: reason.into(),
        }
    }
}

/// Why a fact could not be produced
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactError {
    #[error(transparent)]
    Shell(#[from] ShellError),

    #[error(transparent)]
    Parse(#[from] ParseFailure),
}

/// Result type alias for parsers
pub type FactResult<T> = std::result::Result<T, FactError>;

/// Split a line on whitespace runs into at most `max_fields` fields.
///
/// The last field keeps its inner whitespace, so a mount point such as
/// `/media/pi/My Disk` survives as one field.
pub fn split_fields(line: &str, max_fields: usize) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut rest = line.trim();

    while !rest.is_empty() && max_fields > 0 {
        if fields.len() + 1 == max_fields {
            fields.push(rest);
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(end) => {
                fields.push(&rest[..end]);
                rest = rest[end..].trim_start();
            }
            None => {
                fields.push(rest);
                break;
            }
        }
    }

    fields
}

/// Return the command output as a single non-empty value
pub fn parse_text(raw: ShellResult, tool: &'static str) -> FactResult<String> {
    let text = raw?;
    if text.is_empty() {
        return Err(ParseFailure::new(tool, "empty output").into());
    }
    Ok(text)
}

/// Parse a single number printed by a tool
pub fn parse_number<T: std::str::FromStr>(raw: ShellResult, tool: &'static str) -> FactResult<T> {
    let text = raw?;
    text.trim()
        .parse::<T>()
        .map_err(|_| ParseFailure::new(tool, format!("not a number: {:?}", text)).into())
}

/// Data rows of a table printed with a header line
fn data_rows(text: &str) -> impl Iterator<Item = &str> {
    text.lines().skip(1).filter(|line| !line.trim().is_empty())
}
