// file: src/parsers/cpuinfo.rs
// version: 1.0.0
// guid: 7d1a3f95-c2e4-4b68-8f07-a9b3e5c1d264

//! `key : value` lookups in `/proc/cpuinfo`

use super::{FactResult, ParseFailure};
use crate::shell::ShellResult;

/// Value of the first `key : value` line whose key matches exactly
pub fn field<'a>(cpuinfo: &'a str, key: &str) -> Option<&'a str> {
    cpuinfo.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if name.trim() == key {
            let value = value.trim();
            (!value.is_empty()).then_some(value)
        } else {
            None
        }
    })
}

/// Extract `key` from `cat /proc/cpuinfo` output
pub fn parse_field(raw: ShellResult, key: &str) -> FactResult<String> {
    let text = raw?;
    field(&text, key)
        .map(str::to_string)
        .ok_or_else(|| ParseFailure::new("/proc/cpuinfo", format!("no '{}' line", key)).into())
}
