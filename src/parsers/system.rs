// file: src/parsers/system.rs
// version: 1.0.0
// guid: 5b9d1e73-f8a2-4c06-b7d4-3a0e6c2f8d91

//! Host identity and uptime facts

use super::{parse_text, FactResult, ParseFailure};
use crate::shell::ShellResult;
use chrono::NaiveDateTime;

pub const HOSTNAME_COMMAND: &str = "hostname";
pub const OS_RELEASE_COMMAND: &str = "cat /etc/*-release";
pub const MODEL_COMMAND: &str = "cat /sys/firmware/devicetree/base/model";
pub const UPTIME_SINCE_COMMAND: &str = "uptime -s";
pub const UPTIME_PRETTY_COMMAND: &str = "uptime -p";

const UPTIME_SINCE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse_hostname(raw: ShellResult) -> FactResult<String> {
    parse_text(raw, "hostname")
}

/// `PRETTY_NAME` from the concatenated `/etc/*-release` files, quotes stripped
pub fn parse_os_name(raw: ShellResult) -> FactResult<String> {
    let text = raw?;
    text.lines()
        .find_map(|line| line.trim().strip_prefix("PRETTY_NAME="))
        .map(|value| value.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ParseFailure::new("/etc/*-release", "no PRETTY_NAME entry").into())
}

/// Device-tree model string; the firmware terminates it with NUL bytes
pub fn parse_model_name(raw: ShellResult) -> FactResult<String> {
    let text = raw?;
    let name = text.trim_end_matches('\0').trim();
    if name.is_empty() {
        return Err(ParseFailure::new("devicetree model", "empty model string").into());
    }
    Ok(name.to_string())
}

/// Boot time from `uptime -s`
pub fn parse_uptime_since(raw: ShellResult) -> FactResult<NaiveDateTime> {
    let text = raw?;
    NaiveDateTime::parse_from_str(text.trim(), UPTIME_SINCE_FORMAT)
        .map_err(|e| ParseFailure::new("uptime -s", format!("{:?}: {}", text, e)).into())
}

/// Human uptime from `uptime -p`, e.g. `up 3 days, 2 hours`
pub fn parse_uptime_pretty(raw: ShellResult) -> FactResult<String> {
    parse_text(raw, "uptime -p")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::FactError;
    use crate::shell::ShellError;
    use chrono::NaiveDate;

    const RELEASE: &str = "PRETTY_NAME=\"Debian GNU/Linux 12 (bookworm)\"\n\
NAME=\"Debian GNU/Linux\"\n\
VERSION_ID=\"12\"\n\
ID=debian";

    #[test]
    fn test_os_name_strips_quotes() {
        let name = parse_os_name(Ok(RELEASE.to_string())).unwrap();

        assert_eq!(name, "Debian GNU/Linux 12 (bookworm)");
    }

    #[test]
    fn test_os_name_missing_is_parse_failure() {
        let result = parse_os_name(Ok("NAME=\"Debian GNU/Linux\"".to_string()));

        assert!(matches!(result, Err(FactError::Parse(_))));
    }

    #[test]
    fn test_model_name_trailing_nul() {
        let name = parse_model_name(Ok("Raspberry Pi 4 Model B Rev 1.4\0".to_string())).unwrap();

        assert_eq!(name, "Raspberry Pi 4 Model B Rev 1.4");
        assert!(parse_model_name(Ok("\0".to_string())).is_err());
    }

    #[test]
    fn test_uptime_since() {
        let since = parse_uptime_since(Ok("2025-10-14 08:31:07".to_string())).unwrap();

        assert_eq!(
            since,
            NaiveDate::from_ymd_opt(2025, 10, 14)
                .unwrap()
                .and_hms_opt(8, 31, 7)
                .unwrap()
        );
        assert!(parse_uptime_since(Ok("yesterday".to_string())).is_err());
    }

    #[test]
    fn test_uptime_pretty_and_hostname() {
        assert_eq!(
            parse_uptime_pretty(Ok("up 3 days, 2 hours".to_string())).unwrap(),
            "up 3 days, 2 hours"
        );
        assert_eq!(parse_hostname(Ok("raspberrypi".to_string())).unwrap(), "raspberrypi");
    }

    #[test]
    fn test_failed_command_is_propagated() {
        let err = ShellError::command_failed(HOSTNAME_COMMAND, Some(1), "boom");

        assert_eq!(parse_hostname(Err(err.clone())).unwrap_err(), FactError::Shell(err));
    }
}
