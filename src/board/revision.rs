// file: src/board/revision.rs
// version: 1.0.1
// guid: 5b9d2e8f-1a3c-4e7b-8f60-2d4a9c7e1b05

//! Revision code decoding
//!
//! Two mutually exclusive layouts exist. Bit 23 set means a new-style code
//! whose fields are packed as:
//!
//! ```text
//! NOQuuuWuFMMMCCCCPPPPTTTTTTTTRRRR
//!
//! N  bit 31      overvoltage flag
//! O  bit 30      OTP programming flag
//! Q  bit 29      OTP reading flag
//! W  bit 25      warranty
//! F  bit 23      new-style flag
//! M  bits 20-22  memory size
//! C  bits 16-19  manufacturer
//! P  bits 12-15  processor
//! T  bits 4-11   model type
//! R  bits 0-3    revision
//! ```
//!
//! Bit 23 clear means an old-style code that is only meaningful as an exact
//! key into the historical table.

use super::{BoardIdentity, ModelType, RevisionScheme};
use crate::error::{PiInfoError, Result};
use tracing::{debug, warn};

/// Bit selecting the new-style layout
pub const NEW_STYLE_FLAG: u32 = 0x0080_0000;

const REVISION_MASK: u32 = 0x0000_000F;
const MODEL_MASK: u32 = 0x0000_0FF0;
const MODEL_SHIFT: u32 = 4;
const CPU_MASK: u32 = 0x0000_F000;
const CPU_SHIFT: u32 = 12;
const MANUFACTURER_MASK: u32 = 0x000F_0000;
const MANUFACTURER_SHIFT: u32 = 16;
const MEMORY_MASK: u32 = 0x0070_0000;
const MEMORY_SHIFT: u32 = 20;
const OVERVOLTAGE_BIT: u32 = 31;
const OTP_PROGRAM_BIT: u32 = 30;
const OTP_READ_BIT: u32 = 29;

const MEMORY_SIZES_MB: [u32; 7] = [256, 512, 1024, 2048, 4096, 8192, 16384];
const CPU_MODELS: [&str; 5] = ["BCM2835", "BCM2836", "BCM2837", "BCM2711", "BCM2712"];
const MANUFACTURERS: [&str; 6] = [
    "Sony UK",
    "Egoman",
    "Embest",
    "Sony Japan",
    "Embest",
    "Stadium",
];

/// Value used for table fields the decoder has no entry for
pub const UNKNOWN: &str = "UNKNOWN";

/// One row of the historical (old-style) table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyRevision {
    pub code: u32,
    pub model: ModelType,
    pub revision: &'static str,
    pub memory_size_mb: u32,
    pub cpu_model: &'static str,
    pub manufacturer: &'static str,
}

const fn legacy(
    code: u32,
    model: ModelType,
    revision: &'static str,
    memory_size_mb: u32,
    cpu_model: &'static str,
    manufacturer: &'static str,
) -> LegacyRevision {
    LegacyRevision {
        code,
        model,
        revision,
        memory_size_mb,
        cpu_model,
        manufacturer,
    }
}

/// Old-style revision codes, keyed by their exact value
pub static LEGACY_REVISIONS: [LegacyRevision; 18] = [
    legacy(0x0000, ModelType::Unknown, "0.0", 0, UNKNOWN, UNKNOWN),
    legacy(0x0002, ModelType::RpiB, "1.0", 256, "BCM2835", "EGOMAN"),
    legacy(0x0003, ModelType::RpiB, "1.0", 256, "BCM2835", "EGOMAN"),
    legacy(0x0004, ModelType::RpiB, "2.0", 256, "BCM2835", "SONY_UK"),
    legacy(0x0005, ModelType::RpiB, "2.0", 256, "BCM2835", "QISDA"),
    legacy(0x0006, ModelType::RpiB, "2.0", 256, "BCM2835", "EGOMAN"),
    legacy(0x0007, ModelType::RpiA, "2.0", 256, "BCM2835", "EGOMAN"),
    legacy(0x0008, ModelType::RpiA, "2.0", 256, "BCM2835", "SONY_UK"),
    legacy(0x0009, ModelType::RpiA, "2.0", 256, "BCM2835", "QISDA"),
    legacy(0x000D, ModelType::RpiB, "2.0", 512, "BCM2835", "EGOMAN"),
    legacy(0x000E, ModelType::RpiB, "2.0", 512, "BCM2835", "SONY_UK"),
    legacy(0x000F, ModelType::RpiB, "2.0", 512, "BCM2835", "EGOMAN"),
    legacy(0x0010, ModelType::RpiBPlus, "1.2", 512, "BCM2835", "SONY_UK"),
    legacy(0x0011, ModelType::RpiCm1, "1.0", 512, "BCM2835", "SONY_UK"),
    legacy(0x0012, ModelType::RpiAPlus, "1.1", 256, "BCM2835", "SONY_UK"),
    legacy(0x0013, ModelType::RpiBPlus, "1.2", 512, "BCM2835", "EMBEST"),
    legacy(0x0014, ModelType::RpiCm1, "1.0", 512, "BCM2835", "EMBEST"),
    legacy(0x0015, ModelType::RpiAPlus, "1.1", 512, "BCM2835", "EMBEST"),
];

/// Parse a revision code string (`a02082`, `0x00a03111`, ` 9000c1\n`)
pub fn parse_revision_code(revision_code: &str) -> Result<u32> {
    let trimmed = revision_code.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(PiInfoError::invalid_revision_code(revision_code));
    }

    u32::from_str_radix(digits, 16).map_err(|_| PiInfoError::invalid_revision_code(revision_code))
}

/// Decode a revision code string into a board identity
pub fn decode_revision_code(revision_code: &str) -> Result<BoardIdentity> {
    let code = parse_revision_code(revision_code)?;
    let raw = revision_code.trim().to_string();

    if code & NEW_STYLE_FLAG != 0 {
        debug!("Decoding new-style revision code 0x{:08X}", code);
        Ok(decode_new_style(code, raw))
    } else {
        debug!("Decoding old-style revision code 0x{:04X}", code);
        decode_legacy(code, raw)
    }
}

/// Look up an old-style code in the historical table
pub fn lookup_legacy(code: u32) -> Option<&'static LegacyRevision> {
    LEGACY_REVISIONS.iter().find(|entry| entry.code == code)
}

fn decode_legacy(code: u32, revision_code: String) -> Result<BoardIdentity> {
    let entry = lookup_legacy(code).ok_or(PiInfoError::UnknownLegacyRevision(code))?;

    Ok(BoardIdentity {
        revision_code,
        scheme: RevisionScheme::Legacy,
        revision: entry.revision.to_string(),
        model: entry.model,
        manufacturer: entry.manufacturer.to_string(),
        cpu_model: entry.cpu_model.to_string(),
        memory_size_mb: entry.memory_size_mb,
        overvoltage_allowed: false,
        otp_programming_allowed: false,
        otp_reading_allowed: false,
        serial_number: None,
    })
}

fn decode_new_style(code: u32, revision_code: String) -> BoardIdentity {
    let model_code = (code & MODEL_MASK) >> MODEL_SHIFT;
    let model = ModelType::from_code(model_code);
    if model == ModelType::Unknown {
        warn!("Unrecognised model type 0x{:02X} in revision code {}", model_code, revision_code);
    }

    let memory_index = ((code & MEMORY_MASK) >> MEMORY_SHIFT) as usize;
    let memory_size_mb = MEMORY_SIZES_MB.get(memory_index).copied().unwrap_or_else(|| {
        warn!("Unrecognised memory size index {} in revision code {}", memory_index, revision_code);
        0
    });

    let cpu_index = ((code & CPU_MASK) >> CPU_SHIFT) as usize;
    let cpu_model = table_entry(&CPU_MODELS, cpu_index, "processor", &revision_code);

    let manufacturer_index = ((code & MANUFACTURER_MASK) >> MANUFACTURER_SHIFT) as usize;
    let manufacturer = table_entry(&MANUFACTURERS, manufacturer_index, "manufacturer", &revision_code);

    BoardIdentity {
        scheme: RevisionScheme::BitField,
        revision: format!("1.{}", code & REVISION_MASK),
        model,
        manufacturer,
        cpu_model,
        memory_size_mb,
        overvoltage_allowed: bit(code, OVERVOLTAGE_BIT),
        otp_programming_allowed: bit(code, OTP_PROGRAM_BIT),
        otp_reading_allowed: bit(code, OTP_READ_BIT),
        serial_number: None,
        revision_code,
    }
}

fn table_entry(table: &[&str], index: usize, field: &str, revision_code: &str) -> String {
    match table.get(index) {
        Some(value) => value.to_string(),
        None => {
            warn!("Unrecognised {} index {} in revision code {}", field, index, revision_code);
            UNKNOWN.to_string()
        }
    }
}

fn bit(code: u32, position: u32) -> bool {
    (code >> position) & 1 == 1
}
