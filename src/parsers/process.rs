// file: src/parsers/process.rs
// version: 1.0.0
// guid: a1c4e7f0-3d96-4b28-b5a1-8e0d6f2c9b73

//! Running processes from `ps`

use super::{data_rows, FactResult};
use crate::shell::ShellResult;
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::warn;

/// Processes sorted by descending CPU usage
pub const PS_COMMAND: &str = "ps -eo user,pid,pcpu,pmem,comm,lstart --sort=-pcpu";

const LSTART_FORMAT: &str = "%a %b %d %H:%M:%S %Y";
const LSTART_TOKENS: usize = 5;
/// user, pid, pcpu, pmem, at least one command token, lstart
const MIN_TOKENS: usize = 4 + 1 + LSTART_TOKENS;

/// One row of the process table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessRecord {
    pub user: String,
    pub pid: u32,
    pub cpu_percent: f64,
    pub mem_percent: f64,
    pub command: String,
    pub started_on: NaiveDateTime,
}

/// Parse `ps` output in the order `ps` printed it
pub fn parse_ps(raw: ShellResult) -> FactResult<Vec<ProcessRecord>> {
    let text = raw?;
    let mut processes = Vec::new();

    for line in data_rows(&text) {
        match parse_process_line(line) {
            Ok(process) => processes.push(process),
            Err(reason) => warn!("Skipping malformed process line: {} ({})", line, reason),
        }
    }

    if processes.is_empty() {
        warn!("No processes information available");
    }
    Ok(processes)
}

fn parse_process_line(line: &str) -> std::result::Result<ProcessRecord, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < MIN_TOKENS {
        return Err(format!("expected at least {} fields, found {}", MIN_TOKENS, parts.len()));
    }

    let lstart_at = parts.len() - LSTART_TOKENS;
    let started = parts[lstart_at..].join(" ");

    Ok(ProcessRecord {
        user: parts[0].to_string(),
        pid: parts[1]
            .parse()
            .map_err(|_| format!("invalid pid {:?}", parts[1]))?,
        cpu_percent: parts[2]
            .parse()
            .map_err(|_| format!("invalid cpu percent {:?}", parts[2]))?,
        mem_percent: parts[3]
            .parse()
            .map_err(|_| format!("invalid mem percent {:?}", parts[3]))?,
        command: parts[4..lstart_at].join(" "),
        started_on: NaiveDateTime::parse_from_str(&started, LSTART_FORMAT)
            .map_err(|e| format!("invalid start time {:?}: {}", started, e))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const PS_OUTPUT: &str = "USER         PID %CPU %MEM COMMAND                  STARTED\n\
pi          1234 12.5  3.1 chromium-browse Tue Oct 14 09:12:01 2025\n\
root           1  0.4  0.2 systemd         Mon Oct 13 21:00:00 2025\n\
pi          4321  0.0  0.0 Web Content     Tue Oct 14 10:00:59 2025";

    #[test]
    fn test_parse_ps_rows() {
        let processes = parse_ps(Ok(PS_OUTPUT.to_string())).unwrap();

        assert_eq!(processes.len(), 3);
        assert_eq!(processes[0].user, "pi");
        assert_eq!(processes[0].pid, 1234);
        assert_eq!(processes[0].cpu_percent, 12.5);
        assert_eq!(processes[0].mem_percent, 3.1);
        assert_eq!(processes[0].command, "chromium-browse");
        assert_eq!(
            processes[0].started_on,
            NaiveDate::from_ymd_opt(2025, 10, 14)
                .unwrap()
                .and_hms_opt(9, 12, 1)
                .unwrap()
        );
    }

    #[test]
    fn test_order_is_preserved() {
        let processes = parse_ps(Ok(PS_OUTPUT.to_string())).unwrap();

        let pids: Vec<u32> = processes.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![1234, 1, 4321]);
    }

    #[test]
    fn test_command_with_spaces() {
        let processes = parse_ps(Ok(PS_OUTPUT.to_string())).unwrap();

        assert_eq!(processes[2].command, "Web Content");
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let output = "USER PID %CPU %MEM COMMAND STARTED\n\
pi 1234 12.5 3.1 python3 Tue Oct 14 09:12:01 2025\n\
pi abc 1.0 1.0 bash Tue Oct 14 09:12:01 2025\n\
pi 99 1.0 1.0 bash Tue Oct 14\n\
pi 77 1.0 1.0 bash Tue Oct 99 09:12:01 2025\n\
root 2 0.0 0.0 kthreadd Sun Oct 12 08:00:00 2025";

        let processes = parse_ps(Ok(output.to_string())).unwrap();

        let pids: Vec<u32> = processes.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![1234, 2]);
    }

    #[test]
    fn test_header_only_is_empty() {
        let processes = parse_ps(Ok("USER PID %CPU %MEM COMMAND STARTED".to_string())).unwrap();

        assert!(processes.is_empty());
    }
}
