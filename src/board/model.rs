// file: src/board/model.rs
// version: 1.0.0
// guid: 0e6b3c1d-94a7-4f28-b5d0-7c1e8a2f9d43

//! Board model catalogue as published for new-style revision codes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Board model variant.
///
/// Values are the vendor's model type field (bits 4..12 of a new-style
/// revision code). Gaps in the numbering are internal or unused types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelType {
    Unknown,
    RpiA,
    RpiB,
    RpiAPlus,
    RpiBPlus,
    Rpi2B,
    RpiAlpha,
    RpiCm1,
    Rpi3B,
    RpiZero,
    RpiCm3,
    RpiZeroW,
    Rpi3BPlus,
    Rpi3APlus,
    RpiCm3Plus,
    Rpi4B,
    RpiZero2W,
    Rpi400,
    RpiCm4,
    RpiCm4S,
    Rpi5,
    RpiCm5,
    RpiCm5Lite,
}

impl ModelType {
    /// Map a model type field to a variant; unlisted values are `Unknown`
    pub fn from_code(code: u32) -> Self {
        match code {
            0x00 => ModelType::RpiA,
            0x01 => ModelType::RpiB,
            0x02 => ModelType::RpiAPlus,
            0x03 => ModelType::RpiBPlus,
            0x04 => ModelType::Rpi2B,
            0x05 => ModelType::RpiAlpha,
            0x06 => ModelType::RpiCm1,
            0x08 => ModelType::Rpi3B,
            0x09 => ModelType::RpiZero,
            0x0A => ModelType::RpiCm3,
            0x0C => ModelType::RpiZeroW,
            0x0D => ModelType::Rpi3BPlus,
            0x0E => ModelType::Rpi3APlus,
            0x10 => ModelType::RpiCm3Plus,
            0x11 => ModelType::Rpi4B,
            0x12 => ModelType::RpiZero2W,
            0x13 => ModelType::Rpi400,
            0x14 => ModelType::RpiCm4,
            0x15 => ModelType::RpiCm4S,
            0x17 => ModelType::Rpi5,
            0x18 => ModelType::RpiCm5,
            0x19 => ModelType::RpiCm5Lite,
            _ => ModelType::Unknown,
        }
    }

    /// The model type field value, `None` for `Unknown`
    pub fn code(&self) -> Option<u32> {
        let code = match self {
            ModelType::Unknown => return None,
            ModelType::RpiA => 0x00,
            ModelType::RpiB => 0x01,
            ModelType::RpiAPlus => 0x02,
            ModelType::RpiBPlus => 0x03,
            ModelType::Rpi2B => 0x04,
            ModelType::RpiAlpha => 0x05,
            ModelType::RpiCm1 => 0x06,
            ModelType::Rpi3B => 0x08,
            ModelType::RpiZero => 0x09,
            ModelType::RpiCm3 => 0x0A,
            ModelType::RpiZeroW => 0x0C,
            ModelType::Rpi3BPlus => 0x0D,
            ModelType::Rpi3APlus => 0x0E,
            ModelType::RpiCm3Plus => 0x10,
            ModelType::Rpi4B => 0x11,
            ModelType::RpiZero2W => 0x12,
            ModelType::Rpi400 => 0x13,
            ModelType::RpiCm4 => 0x14,
            ModelType::RpiCm4S => 0x15,
            ModelType::Rpi5 => 0x17,
            ModelType::RpiCm5 => 0x18,
            ModelType::RpiCm5Lite => 0x19,
        };
        Some(code)
    }

    /// Human readable model name
    pub fn name(&self) -> &'static str {
        match self {
            ModelType::Unknown => "Unknown",
            ModelType::RpiA => "Raspberry Pi Model A",
            ModelType::RpiB => "Raspberry Pi Model B",
            ModelType::RpiAPlus => "Raspberry Pi Model A+",
            ModelType::RpiBPlus => "Raspberry Pi Model B+",
            ModelType::Rpi2B => "Raspberry Pi 2 Model B",
            ModelType::RpiAlpha => "Raspberry Pi Alpha",
            ModelType::RpiCm1 => "Raspberry Pi Compute Module 1",
            ModelType::Rpi3B => "Raspberry Pi 3 Model B",
            ModelType::RpiZero => "Raspberry Pi Zero",
            ModelType::RpiCm3 => "Raspberry Pi Compute Module 3",
            ModelType::RpiZeroW => "Raspberry Pi Zero W",
            ModelType::Rpi3BPlus => "Raspberry Pi 3 Model B+",
            ModelType::Rpi3APlus => "Raspberry Pi 3 Model A+",
            ModelType::RpiCm3Plus => "Raspberry Pi Compute Module 3+",
            ModelType::Rpi4B => "Raspberry Pi 4 Model B",
            ModelType::RpiZero2W => "Raspberry Pi Zero 2 W",
            ModelType::Rpi400 => "Raspberry Pi 400",
            ModelType::RpiCm4 => "Raspberry Pi Compute Module 4",
            ModelType::RpiCm4S => "Raspberry Pi Compute Module 4S",
            ModelType::Rpi5 => "Raspberry Pi 5",
            ModelType::RpiCm5 => "Raspberry Pi Compute Module 5",
            ModelType::RpiCm5Lite => "Raspberry Pi Compute Module 5 Lite",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
