// file: src/parsers/cpu.rs
// version: 1.0.0
// guid: e3a9c5f1-6b07-4d82-9e4c-1a5f8b2d7c60

//! CPU facts from `lscpu`, `vcgencmd`, `top` and `nproc`

use super::{parse_number, FactResult, ParseFailure};
use crate::shell::ShellResult;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

pub const LSCPU_COMMAND: &str = "lscpu";
pub const TEMPERATURE_COMMAND: &str = "vcgencmd measure_temp";
pub const VOLTAGE_COMMAND: &str = "vcgencmd measure_volts";
pub const CORE_COUNT_COMMAND: &str = "nproc";
/// Second `top` iteration gives a real sample; user + system percent
pub const USAGE_COMMAND: &str = "top -b -n2 | grep 'Cpu(s)' | tail -n 1 | awk '{print $2 + $4}'";

/// Cache sizes as printed by `lscpu`, e.g. `"128 KiB"` or `"32K"`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheSizes {
    pub l1d: Option<String>,
    pub l1i: Option<String>,
    pub l2: Option<String>,
    pub l3: Option<String>,
}

fn cache_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(L1d|L1i|L2|L3) cache:\s*([^(]*?)\s*(?:\(.*\))?\s*$").expect("valid regex")
    })
}

/// Parse the `Lx cache:` lines of `lscpu`.
///
/// Caches the CPU does not have (a Pi 4 has no L3) stay `None`.
pub fn parse_cache_sizes(raw: ShellResult) -> FactResult<CacheSizes> {
    let text = raw?;
    let mut sizes = CacheSizes::default();

    for line in text.lines() {
        let Some(caps) = cache_line_regex().captures(line) else {
            continue;
        };
        let value = caps[2].to_string();
        if value.is_empty() {
            continue;
        }
        let slot = match &caps[1] {
            "L1d" => &mut sizes.l1d,
            "L1i" => &mut sizes.l1i,
            "L2" => &mut sizes.l2,
            _ => &mut sizes.l3,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    Ok(sizes)
}

/// Value of a `Key: value` line of `lscpu`
pub fn parse_lscpu_field(raw: ShellResult, key: &str) -> FactResult<String> {
    let text = raw?;
    text.lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            (name.trim() == key).then(|| value.trim().to_string())
        })
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ParseFailure::new("lscpu", format!("no '{}' line", key)).into())
}

fn temperature_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"temp=(-?\d+(?:\.\d+)?)'C").expect("valid regex"))
}

fn voltage_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"volt=(\d+(?:\.\d+)?)V").expect("valid regex"))
}

/// Parse `vcgencmd measure_temp` (`temp=48.3'C`) into degrees Celsius
pub fn parse_temperature(raw: ShellResult) -> FactResult<f64> {
    let text = raw?;
    capture_number(temperature_regex(), &text, "vcgencmd measure_temp")
}

/// Parse `vcgencmd measure_volts` (`volt=0.8563V`) into volts
pub fn parse_voltage(raw: ShellResult) -> FactResult<f64> {
    let text = raw?;
    capture_number(voltage_regex(), &text, "vcgencmd measure_volts")
}

fn capture_number(re: &Regex, text: &str, tool: &'static str) -> FactResult<f64> {
    re.captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .ok_or_else(|| ParseFailure::new(tool, format!("unexpected output: {:?}", text)).into())
}

/// Parse the summed user+system CPU percentage
pub fn parse_usage(raw: ShellResult) -> FactResult<f64> {
    parse_number(raw, "top")
}

/// Parse `nproc`
pub fn parse_core_count(raw: ShellResult) -> FactResult<u32> {
    parse_number(raw, "nproc")
}
