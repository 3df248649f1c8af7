// file: src/parsers/disk.rs
// version: 1.0.0
// guid: 6f0b2d84-a3c7-4e19-8d5b-c7e2f9a1b036

//! Disk usage from `df`

use super::{data_rows, split_fields, FactResult};
use crate::shell::ShellResult;
use serde::Serialize;
use tracing::warn;

/// Header from `df --output`, then the data rows sorted by mount point
pub const DF_COMMAND: &str = "df -h --output=source,size,used,avail,pcent,target | head -n 1; \
df -h --output=source,size,used,avail,pcent,target | tail -n +2 | sort -k6";

const DF_FIELDS: usize = 6;

/// One mounted filesystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiskUsageRecord {
    pub filesystem: String,
    pub size: String,
    pub used: String,
    pub available: String,
    /// 0-100; `None` when `df` prints `-` (pseudo filesystems)
    pub use_percent: Option<u8>,
    pub mounted_on: String,
}

/// Parse `df` output, keeping row order and skipping malformed rows
pub fn parse_df(raw: ShellResult) -> FactResult<Vec<DiskUsageRecord>> {
    let text = raw?;
    let mut disks = Vec::new();

    for line in data_rows(&text) {
        let fields = split_fields(line, DF_FIELDS);
        if fields.len() != DF_FIELDS {
            warn!("Skipping malformed df line ({} fields): {}", fields.len(), line);
            continue;
        }

        disks.push(DiskUsageRecord {
            filesystem: fields[0].to_string(),
            size: fields[1].to_string(),
            used: fields[2].to_string(),
            available: fields[3].to_string(),
            use_percent: parse_percent(fields[4]),
            mounted_on: fields[5].to_string(),
        });
    }

    if disks.is_empty() {
        warn!("No disk usage information available");
    }
    Ok(disks)
}

fn parse_percent(field: &str) -> Option<u8> {
    if field == "-" {
        return None;
    }
    match field.trim_end_matches('%').parse::<u8>() {
        Ok(percent) if percent <= 100 => Some(percent),
        _ => {
            warn!("Unexpected df use percentage: {}", field);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::FactError;
    use crate::shell::ShellError;

    const DF_OUTPUT: &str = "Filesystem      Size  Used Avail Use% Mounted on\n\
/dev/root        29G  4.1G   24G  15% /\n\
/dev/mmcblk0p1  255M   51M  205M  20% /boot/firmware\n\
tmpfs           1.9G     0  1.9G   0% /dev/shm\n\
/dev/sda1       932G  100G  832G  11% /media/pi/Backup Drive";

    #[test]
    fn test_parse_df_rows_in_order() {
        let disks = parse_df(Ok(DF_OUTPUT.to_string())).unwrap();

        assert_eq!(disks.len(), 4);
        let mounts: Vec<&str> = disks.iter().map(|d| d.mounted_on.as_str()).collect();
        assert_eq!(mounts, vec!["/", "/boot/firmware", "/dev/shm", "/media/pi/Backup Drive"]);

        assert_eq!(
            disks[0],
            DiskUsageRecord {
                filesystem: "/dev/root".to_string(),
                size: "29G".to_string(),
                used: "4.1G".to_string(),
                available: "24G".to_string(),
                use_percent: Some(15),
                mounted_on: "/".to_string(),
            }
        );
    }

    #[test]
    fn test_zero_percent_is_kept_as_zero() {
        let disks = parse_df(Ok(DF_OUTPUT.to_string())).unwrap();

        assert_eq!(disks[2].use_percent, Some(0));
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let output = "Filesystem      Size  Used Avail Use% Mounted on\n\
/dev/root        29G  4.1G   24G  15% /\n\
broken-row  12G  3G\n\
/dev/sda1       932G  100G  832G  11% /mnt/data";

        let disks = parse_df(Ok(output.to_string())).unwrap();

        assert_eq!(disks.len(), 2);
        assert_eq!(disks[0].mounted_on, "/");
        assert_eq!(disks[1].mounted_on, "/mnt/data");
    }

    #[test]
    fn test_dash_percentage_is_absent() {
        let output = "Filesystem Size Used Avail Use% Mounted on\nportal 0 0 0 - /run/user/1000/doc";

        let disks = parse_df(Ok(output.to_string())).unwrap();

        assert_eq!(disks[0].use_percent, None);
    }

    #[test]
    fn test_header_only_is_empty() {
        let disks = parse_df(Ok("Filesystem Size Used Avail Use% Mounted on".to_string())).unwrap();

        assert!(disks.is_empty());
    }

    #[test]
    fn test_failed_command_is_propagated() {
        let err = ShellError::command_failed(DF_COMMAND, Some(1), "df: unrecognized option");

        assert_eq!(parse_df(Err(err.clone())).unwrap_err(), FactError::Shell(err));
    }
}
