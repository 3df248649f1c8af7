// file: src/parsers/memory.rs
// version: 1.0.0
// guid: 4c6e8b20-5d1f-4a97-b3e8-0f2a7d9c6e15

//! RAM usage from `free`

use super::{FactResult, ParseFailure};
use crate::error::{PiInfoError, Result};
use crate::shell::ShellResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Volume unit accepted by `free`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryUnit {
    #[serde(rename = "b")]
    Bytes,
    #[serde(rename = "k")]
    Kibi,
    #[serde(rename = "m")]
    Mebi,
    #[serde(rename = "g")]
    Gibi,
}

impl MemoryUnit {
    /// The `free` switch letter for this unit
    pub fn flag(&self) -> char {
        match self {
            MemoryUnit::Bytes => 'b',
            MemoryUnit::Kibi => 'k',
            MemoryUnit::Mebi => 'm',
            MemoryUnit::Gibi => 'g',
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MemoryUnit::Bytes => "B",
            MemoryUnit::Kibi => "KiB",
            MemoryUnit::Mebi => "MiB",
            MemoryUnit::Gibi => "GiB",
        }
    }

    /// Command printing memory usage in this unit
    pub fn command(&self) -> String {
        format!("free -{}", self.flag())
    }
}

impl FromStr for MemoryUnit {
    type Err = PiInfoError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "b" => Ok(MemoryUnit::Bytes),
            "k" => Ok(MemoryUnit::Kibi),
            "m" => Ok(MemoryUnit::Mebi),
            "g" => Ok(MemoryUnit::Gibi),
            _ => Err(PiInfoError::invalid_memory_unit(s)),
        }
    }
}

impl fmt::Display for MemoryUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Live RAM figures from the `Mem:` row of `free`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RamUsage {
    pub unit: MemoryUnit,
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub shared: u64,
    pub cache: u64,
    pub available: u64,
}

/// Parse `free -<unit>` output.
///
/// ```text
///                total        used        free      shared  buff/cache   available
/// Mem:            3794         512        2563          30         718        3152
/// Swap:             99           0          99
/// ```
pub fn parse_free(raw: ShellResult, unit: MemoryUnit) -> FactResult<RamUsage> {
    let text = raw?;
    let row = text
        .lines()
        .nth(1)
        .ok_or_else(|| ParseFailure::new("free", "missing memory row"))?;

    let fields: Vec<&str> = row.split_whitespace().collect();
    if fields.len() < 7 {
        return Err(ParseFailure::new(
            "free",
            format!("expected 7 columns, found {}: {:?}", fields.len(), row),
        )
        .into());
    }

    let column = |index: usize| -> std::result::Result<u64, ParseFailure> {
        fields[index]
            .parse::<u64>()
            .map_err(|_| ParseFailure::new("free", format!("column {} is not a number: {:?}", index, fields[index])))
    };

    Ok(RamUsage {
        unit,
        total: column(1)?,
        used: column(2)?,
        free: column(3)?,
        shared: column(4)?,
        cache: column(5)?,
        available: column(6)?,
    })
}
