// file: src/board/mod.rs
// version: 1.0.1
// guid: 9c3e7a15-4b2d-4f80-a1c6-8e5d0b7f2a94

//! Board identity
//!
//! The identity is decoded once at startup from the `Revision` line of
//! `/proc/cpuinfo` and then handed by reference to whoever needs it.

pub mod model;
pub mod revision;

pub use model::ModelType;
pub use revision::{decode_revision_code, parse_revision_code};

use crate::error::{PiInfoError, Result};
use crate::parsers::cpuinfo;
use crate::shell::CommandRunner;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// Command whose output carries the revision code
pub const CPUINFO_COMMAND: &str = "cat /proc/cpuinfo";

/// Which of the two revision code layouts produced an identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionScheme {
    /// Exact lookup in the historical table
    Legacy,
    /// Bit-field decode (bit 23 set)
    BitField,
}

/// Decoded board identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardIdentity {
    pub revision_code: String,
    pub scheme: RevisionScheme,
    pub revision: String,
    pub model: ModelType,
    pub manufacturer: String,
    pub cpu_model: String,
    pub memory_size_mb: u32,
    pub overvoltage_allowed: bool,
    pub otp_programming_allowed: bool,
    pub otp_reading_allowed: bool,
    /// Only known when read from a running board
    pub serial_number: Option<String>,
}

impl BoardIdentity {
    /// Read the revision code from the running board and decode it.
    ///
    /// Any failure here is fatal: a wrong identity would poison every
    /// value derived from it.
    pub async fn detect<R: CommandRunner + ?Sized>(runner: &R) -> Result<Self> {
        debug!("Fetching board revision code...");
        let output = runner
            .run(CPUINFO_COMMAND)
            .await
            .map_err(|e| PiInfoError::revision_unavailable(e.to_string()))?;

        let revision_code = cpuinfo::field(&output, "Revision").ok_or_else(|| {
            PiInfoError::revision_unavailable("no Revision line in /proc/cpuinfo")
        })?;
        debug!("Board revision code: {}", revision_code);

        let mut identity = decode_revision_code(revision_code)?;
        identity.serial_number = cpuinfo::field(&output, "Serial").map(str::to_string);
        info!("Board info fully initialized: {}", identity);
        Ok(identity)
    }
}

impl fmt::Display for BoardIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Model: {}, Revision: {}, Manufacturer: {}, CPU model: {}, Memory size: {}Mb",
            self.model, self.revision, self.manufacturer, self.cpu_model, self.memory_size_mb
        )?;
        if let Some(serial) = &self.serial_number {
            write!(f, ", Serial number: {}", serial)?;
        }
        Ok(())
    }
}
