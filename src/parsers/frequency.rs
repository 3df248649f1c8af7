// file: src/parsers/frequency.rs
// version: 1.0.0
// guid: b7e1d3a8-9f24-4c05-a6b2-3e8d0f1c7a59

//! CPU core frequencies from cpufreq scaling files

use super::{FactResult, ParseFailure};
use crate::error::{PiInfoError, Result};
use crate::shell::ShellResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit a frequency is reported in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrequencyUnit {
    Hz,
    KHz,
    MHz,
    GHz,
}

impl FrequencyUnit {
    /// Scale a value in hertz to this unit
    pub fn convert(&self, hertz: f64) -> f64 {
        match self {
            FrequencyUnit::Hz => hertz,
            FrequencyUnit::KHz => hertz / 1e3,
            FrequencyUnit::MHz => hertz / 1e6,
            FrequencyUnit::GHz => hertz / 1e9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyUnit::Hz => "Hz",
            FrequencyUnit::KHz => "KHz",
            FrequencyUnit::MHz => "MHz",
            FrequencyUnit::GHz => "GHz",
        }
    }
}

impl FromStr for FrequencyUnit {
    type Err = PiInfoError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Hz" => Ok(FrequencyUnit::Hz),
            "KHz" => Ok(FrequencyUnit::KHz),
            "MHz" => Ok(FrequencyUnit::MHz),
            "GHz" => Ok(FrequencyUnit::GHz),
            _ => Err(PiInfoError::invalid_frequency_unit(s)),
        }
    }
}

impl fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert `hertz` to the unit named by `unit`.
///
/// An unknown unit name is a caller bug and is returned as
/// [`PiInfoError::InvalidFrequencyUnit`].
pub fn convert_frequency(hertz: f64, unit: &str) -> Result<f64> {
    Ok(unit.parse::<FrequencyUnit>()?.convert(hertz))
}

/// Which cpufreq scaling value to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyKind {
    Min,
    Max,
    Cur,
}

impl FrequencyKind {
    pub const ALL: [FrequencyKind; 3] = [FrequencyKind::Min, FrequencyKind::Max, FrequencyKind::Cur];

    fn file_stem(&self) -> &'static str {
        match self {
            FrequencyKind::Min => "min",
            FrequencyKind::Max => "max",
            FrequencyKind::Cur => "cur",
        }
    }

    /// Command printing this value in kHz for core 0
    pub fn command(&self) -> String {
        format!(
            "cat /sys/devices/system/cpu/cpu0/cpufreq/scaling_{}_freq",
            self.file_stem()
        )
    }
}

/// Min, max and current core frequency; `None` when unavailable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoreFrequencies {
    pub unit: FrequencyUnit,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub cur: Option<f64>,
}

impl CoreFrequencies {
    pub fn unavailable(unit: FrequencyUnit) -> Self {
        Self {
            unit,
            min: None,
            max: None,
            cur: None,
        }
    }

    pub fn set(&mut self, kind: FrequencyKind, value: Option<f64>) {
        match kind {
            FrequencyKind::Min => self.min = value,
            FrequencyKind::Max => self.max = value,
            FrequencyKind::Cur => self.cur = value,
        }
    }
}

/// Parse a `scaling_*_freq` value (kHz) and convert it to `unit`
pub fn parse_scaling_frequency(raw: ShellResult, unit: FrequencyUnit) -> FactResult<f64> {
    let text = raw?;
    let kilohertz = text.trim().parse::<f64>().map_err(|_| {
        ParseFailure::new("cpufreq", format!("frequency is not a number: {:?}", text))
    })?;
    Ok(unit.convert(kilohertz * 1e3))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_frequency_documented_values() {
        assert_eq!(convert_frequency(1_000_000_000.0, "GHz").unwrap(), 1.0);
        assert_eq!(convert_frequency(1_500_000.0, "MHz").unwrap(), 1.5);
        assert_eq!(convert_frequency(600_000.0, "KHz").unwrap(), 600.0);
        assert_eq!(convert_frequency(42.0, "Hz").unwrap(), 42.0);
    }

    #[test]
    fn test_unsupported_unit_is_rejected() {
        for unit in ["THz", "mhz", "", "kHz"] {
            let err = convert_frequency(1.0, unit).unwrap_err();
            assert!(matches!(err, PiInfoError::InvalidFrequencyUnit(_)), "unit {:?}", unit);
        }
    }

    #[test]
    fn test_scaling_frequency_is_kilohertz() {
        let mhz = parse_scaling_frequency(Ok("1500000".to_string()), FrequencyUnit::MHz).unwrap();
        assert_eq!(mhz, 1500.0);

        let ghz = parse_scaling_frequency(Ok("600000".to_string()), FrequencyUnit::GHz).unwrap();
        assert_eq!(ghz, 0.6);
    }

    #[test]
    fn test_scaling_frequency_garbage_is_parse_failure() {
        assert!(parse_scaling_frequency(Ok("<unknown>".to_string()), FrequencyUnit::MHz).is_err());
    }

    #[test]
    fn test_commands_point_at_cpu0() {
        assert_eq!(
            FrequencyKind::Cur.command(),
            "cat /sys/devices/system/cpu/cpu0/cpufreq/scaling_cur_freq"
        );
    }
}
