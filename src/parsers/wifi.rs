// file: src/parsers/wifi.rs
// version: 1.0.0
// guid: d8f2a6c3-1e5b-4970-a4d8-2b9c7e0f5a16

//! Wi-Fi scan results from `nmcli`
//!
//! `nmcli dev wifi` prints space-aligned columns, but the SSID column can
//! itself contain spaces. The rate unit token `Mbit/s` is the only fixed
//! anchor in a row: everything between the BSSID and the three columns
//! before the anchor (mode, channel, rate value) is the SSID.

use super::{data_rows, network::is_mac_address, FactResult};
use crate::shell::ShellResult;
use serde::Serialize;
use tracing::warn;

pub const NMCLI_WIFI_COMMAND: &str = "nmcli dev wifi";

const RATE_ANCHOR: &str = "Mbit/s";
const IN_USE_MARKER: &str = "*";

/// One network seen by the scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WifiNetworkRecord {
    pub in_use: bool,
    pub ssid: String,
    pub bssid: String,
    pub mode: String,
    pub channel: Option<u16>,
    pub rate: String,
    pub signal: Option<u8>,
    pub bars: String,
    pub security: String,
}

/// Parse `nmcli dev wifi` output, skipping rows without a rate anchor
pub fn parse_nmcli_wifi(raw: ShellResult) -> FactResult<Vec<WifiNetworkRecord>> {
    let text = raw?;
    let mut networks = Vec::new();

    for line in data_rows(&text) {
        match parse_wifi_line(line) {
            Ok(network) => networks.push(network),
            Err(reason) => warn!("Skipping malformed nmcli line: {} ({})", line, reason),
        }
    }

    if networks.is_empty() {
        warn!("No Wi-Fi networks information available");
    }
    Ok(networks)
}

fn parse_wifi_line(line: &str) -> std::result::Result<WifiNetworkRecord, String> {
    let mut values: Vec<&str> = line.split_whitespace().collect();

    let in_use = values.first() == Some(&IN_USE_MARKER);
    if in_use {
        values.remove(0);
    }

    // The last anchor wins: security never contains it, an SSID might.
    let k = values
        .iter()
        .rposition(|v| *v == RATE_ANCHOR)
        .ok_or_else(|| format!("no '{}' token", RATE_ANCHOR))?;
    if k < 4 {
        return Err("too few columns before rate".to_string());
    }
    if values.len() < k + 3 {
        return Err("missing signal or bars column".to_string());
    }

    let bssid = values[0];
    if !is_mac_address(bssid) {
        return Err(format!("invalid BSSID {:?}", bssid));
    }

    Ok(WifiNetworkRecord {
        in_use,
        ssid: values[1..k - 3].join(" "),
        bssid: bssid.to_string(),
        mode: values[k - 3].to_string(),
        channel: values[k - 2].parse().ok(),
        rate: values[k - 1..=k].join(" "),
        signal: values[k + 1].parse().ok(),
        bars: values[k + 2].to_string(),
        security: values[k + 3..].join(" "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "IN-USE  BSSID              SSID                 MODE   CHAN  RATE        SIGNAL  BARS  SECURITY";

    fn scan(rows: &[&str]) -> Vec<WifiNetworkRecord> {
        let mut text = HEADER.to_string();
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        parse_nmcli_wifi(Ok(text)).unwrap()
    }

    #[test]
    fn test_single_word_ssid() {
        let networks = scan(&["        AA:BB:CC:DD:EE:01  Cafe                 Infra  11    54 Mbit/s   40      ▂▄__  WPA1 WPA2"]);

        assert_eq!(networks.len(), 1);
        let net = &networks[0];
        assert!(!net.in_use);
        assert_eq!(net.ssid, "Cafe");
        assert_eq!(net.bssid, "AA:BB:CC:DD:EE:01");
        assert_eq!(net.mode, "Infra");
        assert_eq!(net.channel, Some(11));
        assert_eq!(net.rate, "54 Mbit/s");
        assert_eq!(net.signal, Some(40));
        assert_eq!(net.bars, "▂▄__");
        assert_eq!(net.security, "WPA1 WPA2");
    }

    #[test]
    fn test_multi_word_ssid_of_any_length() {
        let networks = scan(&[
            "*       AA:BB:CC:DD:EE:02  My Home Net          Infra  6     130 Mbit/s  70      ▂▄▆_  WPA2",
            "        AA:BB:CC:DD:EE:03  The  Really Long Guest Network Name  Infra  36    270 Mbit/s  55      ▂▄▆_  WPA2 802.1X",
        ]);

        assert_eq!(networks.len(), 2);
        assert!(networks[0].in_use);
        assert_eq!(networks[0].ssid, "My Home Net");
        assert_eq!(networks[0].channel, Some(6));
        assert_eq!(networks[1].ssid, "The Really Long Guest Network Name");
        assert_eq!(networks[1].rate, "270 Mbit/s");
        assert_eq!(networks[1].security, "WPA2 802.1X");
    }

    #[test]
    fn test_ssid_containing_anchor_token() {
        let networks = scan(&["        AA:BB:CC:DD:EE:04  Free 100 Mbit/s      Infra  1     65 Mbit/s   90      ▂▄▆█  --"]);

        assert_eq!(networks[0].ssid, "Free 100 Mbit/s");
        assert_eq!(networks[0].rate, "65 Mbit/s");
        assert_eq!(networks[0].security, "--");
    }

    #[test]
    fn test_hidden_network_and_open_security() {
        let networks = scan(&["        AA:BB:CC:DD:EE:05  --                   Infra  1     65 Mbit/s   20      ▂___"]);

        assert_eq!(networks[0].ssid, "--");
        assert_eq!(networks[0].security, "");
    }

    #[test]
    fn test_rows_without_anchor_or_bssid_are_skipped() {
        let networks = scan(&[
            "        AA:BB:CC:DD:EE:06  Cafe  Infra  11  54  40  ▂▄__  WPA2",
            "        not-a-mac  Cafe  Infra  11  54 Mbit/s  40  ▂▄__  WPA2",
            "        AA:BB:CC:DD:EE:07  Office  Infra  1  54 Mbit/s",
            "        AA:BB:CC:DD:EE:08  Library  Infra  1  54 Mbit/s  33  ▂▄__  WPA2",
        ]);

        assert_eq!(networks.len(), 1);
        assert_eq!(networks[0].ssid, "Library");
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(scan(&[]).is_empty());
    }
}
