// file: src/parsers/network.rs
// version: 1.0.0
// guid: 0a7c9e2f-b4d1-4863-95f0-e6a3c8b1d247

//! Network interface, Bluetooth and public address facts

use super::{FactResult, ParseFailure};
use crate::shell::ShellResult;
use regex::Regex;
use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::OnceLock;

/// Directory listing the kernel's network interfaces
pub const NET_CLASS_PATH: &str = "/sys/class/net";
pub const BLUETOOTH_COMMAND: &str = "hcitool dev";

/// Command listing interface names
pub fn list_interfaces_command() -> String {
    format!("ls {}", NET_CLASS_PATH)
}

pub fn mac_address_command(interface: &str) -> String {
    format!("cat {}/{}/address", NET_CLASS_PATH, interface)
}

pub fn operstate_command(interface: &str) -> String {
    format!("cat {}/{}/operstate", NET_CLASS_PATH, interface)
}

pub fn ipv4_command(interface: &str) -> String {
    format!("ip -o -4 addr show dev {}", interface)
}

pub fn gateway_command(interface: &str) -> String {
    format!("ip route show default dev {}", interface)
}

/// Operational state of a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LinkState {
    Up,
    Down,
    Unknown,
}

/// Snapshot of one interface; any part the tools cannot report is `None`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkInterfaceInfo {
    pub name: String,
    pub mac: Option<String>,
    pub ip: Option<Ipv4Addr>,
    pub mask: Option<Ipv4Addr>,
    pub broadcast: Option<Ipv4Addr>,
    pub gateway: Option<IpAddr>,
    pub state: LinkState,
}

impl NetworkInterfaceInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mac: None,
            ip: None,
            mask: None,
            broadcast: None,
            gateway: None,
            state: LinkState::Unknown,
        }
    }
}

/// IPv4 configuration of an interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Config {
    pub ip: Ipv4Addr,
    pub prefix: u8,
    pub mask: Ipv4Addr,
    pub broadcast: Option<Ipv4Addr>,
}

fn mac_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:[0-9A-Fa-f]{2}:){5}[0-9A-Fa-f]{2}$").expect("valid regex"))
}

fn inet_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"inet (\d{1,3}(?:\.\d{1,3}){3})/(\d{1,2})(?: brd (\d{1,3}(?:\.\d{1,3}){3}))?")
            .expect("valid regex")
    })
}

fn default_route_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^default via (\S+)").expect("valid regex"))
}

/// Whether `value` looks like `aa:bb:cc:dd:ee:ff`
pub fn is_mac_address(value: &str) -> bool {
    mac_regex().is_match(value)
}

/// Dotted netmask for a prefix length
pub fn prefix_to_mask(prefix: u8) -> Option<Ipv4Addr> {
    match prefix {
        0 => Some(Ipv4Addr::new(0, 0, 0, 0)),
        1..=32 => Some(Ipv4Addr::from(u32::MAX << (32 - u32::from(prefix)))),
        _ => None,
    }
}

/// Interface names from a `/sys/class/net` listing
pub fn parse_interface_list(raw: ShellResult) -> FactResult<Vec<String>> {
    let text = raw?;
    Ok(text.split_whitespace().map(str::to_string).collect())
}

/// Upper-cased MAC address from `/sys/class/net/<if>/address`
pub fn parse_mac_address(raw: ShellResult) -> FactResult<String> {
    let text = raw?;
    let mac = text.trim();
    if !is_mac_address(mac) {
        return Err(ParseFailure::new("address", format!("not a MAC address: {:?}", mac)).into());
    }
    Ok(mac.to_uppercase())
}

/// Link state from `/sys/class/net/<if>/operstate`
pub fn parse_operstate(raw: ShellResult) -> FactResult<LinkState> {
    let text = raw?;
    Ok(match text.trim() {
        "up" => LinkState::Up,
        "down" | "lowerlayerdown" | "notpresent" => LinkState::Down,
        _ => LinkState::Unknown,
    })
}

/// Parse `ip -o -4 addr show dev <if>`.
///
/// ```text
/// 2: eth0    inet 192.168.1.42/24 brd 192.168.1.255 scope global dynamic eth0\       valid_lft 85000sec ...
/// ```
///
/// No output means the interface has no IPv4 address (`Ok(None)`).
pub fn parse_ipv4_config(raw: ShellResult) -> FactResult<Option<Ipv4Config>> {
    let text = raw?;
    if text.trim().is_empty() {
        return Ok(None);
    }

    let failure = || ParseFailure::new("ip addr", format!("unexpected output: {:?}", text));
    let caps = inet_regex().captures(&text).ok_or_else(failure)?;

    let ip = caps[1].parse::<Ipv4Addr>().map_err(|_| failure())?;
    let prefix = caps[2].parse::<u8>().map_err(|_| failure())?;
    let mask = prefix_to_mask(prefix).ok_or_else(failure)?;
    let broadcast = match caps.get(3) {
        Some(m) => Some(m.as_str().parse::<Ipv4Addr>().map_err(|_| failure())?),
        None => None,
    };

    Ok(Some(Ipv4Config {
        ip,
        prefix,
        mask,
        broadcast,
    }))
}

/// Default gateway from `ip route show default dev <if>`; `None` when there is no default route
pub fn parse_default_gateway(raw: ShellResult) -> FactResult<Option<IpAddr>> {
    let text = raw?;
    let Some(caps) = default_route_regex().captures(&text) else {
        return Ok(None);
    };
    caps[1]
        .parse::<IpAddr>()
        .map(Some)
        .map_err(|_| ParseFailure::new("ip route", format!("invalid gateway {:?}", &caps[1])).into())
}

/// Controller address from `hcitool dev`.
///
/// ```text
/// Devices:
///     hci0    B8:27:EB:12:34:56
/// ```
pub fn parse_hcitool_dev(raw: ShellResult) -> FactResult<String> {
    let text = raw?;
    let address = text
        .lines()
        .nth(1)
        .and_then(|line| line.split_whitespace().nth(1))
        .filter(|address| is_mac_address(address))
        .ok_or_else(|| ParseFailure::new("hcitool dev", "no Bluetooth controller listed"))?;
    Ok(address.to_uppercase())
}

/// Public address printed by an echo service
pub fn parse_public_ip(raw: ShellResult) -> FactResult<IpAddr> {
    let text = raw?;
    text.trim()
        .parse::<IpAddr>()
        .map_err(|_| ParseFailure::new("public ip", format!("not an IP address: {:?}", text)).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::FactError;

    #[test]
    fn test_prefix_to_mask() {
        assert_eq!(prefix_to_mask(24), Some(Ipv4Addr::new(255, 255, 255, 0)));
        assert_eq!(prefix_to_mask(20), Some(Ipv4Addr::new(255, 255, 240, 0)));
        assert_eq!(prefix_to_mask(32), Some(Ipv4Addr::new(255, 255, 255, 255)));
        assert_eq!(prefix_to_mask(0), Some(Ipv4Addr::new(0, 0, 0, 0)));
        assert_eq!(prefix_to_mask(33), None);
    }

    #[test]
    fn test_ipv4_config() {
        let output = "2: eth0    inet 192.168.1.42/24 brd 192.168.1.255 scope global dynamic noprefixroute eth0\\       valid_lft 85924sec preferred_lft 74124sec";

        let config = parse_ipv4_config(Ok(output.to_string())).unwrap().unwrap();

        assert_eq!(config.ip, Ipv4Addr::new(192, 168, 1, 42));
        assert_eq!(config.prefix, 24);
        assert_eq!(config.mask, Ipv4Addr::new(255, 255, 255, 0));
        assert_eq!(config.broadcast, Some(Ipv4Addr::new(192, 168, 1, 255)));
    }

    #[test]
    fn test_ipv4_config_without_broadcast() {
        let output = "1: lo    inet 127.0.0.1/8 scope host lo\\       valid_lft forever preferred_lft forever";

        let config = parse_ipv4_config(Ok(output.to_string())).unwrap().unwrap();

        assert_eq!(config.mask, Ipv4Addr::new(255, 0, 0, 0));
        assert_eq!(config.broadcast, None);
    }

    #[test]
    fn test_ipv4_config_absent() {
        assert_eq!(parse_ipv4_config(Ok(String::new())).unwrap(), None);
        assert!(matches!(
            parse_ipv4_config(Ok("3: wlan0 state DOWN".to_string())),
            Err(FactError::Parse(_))
        ));
    }

    #[test]
    fn test_default_gateway() {
        let output = "default via 192.168.1.1 proto dhcp src 192.168.1.42 metric 100";

        let gateway = parse_default_gateway(Ok(output.to_string())).unwrap();

        assert_eq!(gateway, Some("192.168.1.1".parse().unwrap()));
        assert_eq!(parse_default_gateway(Ok(String::new())).unwrap(), None);
    }

    #[test]
    fn test_mac_address_is_upper_cased() {
        let mac = parse_mac_address(Ok("dc:a6:32:01:02:03".to_string())).unwrap();

        assert_eq!(mac, "DC:A6:32:01:02:03");
        assert!(parse_mac_address(Ok("00:00".to_string())).is_err());
    }

    #[test]
    fn test_operstate() {
        assert_eq!(parse_operstate(Ok("up".to_string())).unwrap(), LinkState::Up);
        assert_eq!(parse_operstate(Ok("down".to_string())).unwrap(), LinkState::Down);
        assert_eq!(parse_operstate(Ok("dormant".to_string())).unwrap(), LinkState::Unknown);
    }

    #[test]
    fn test_hcitool_dev() {
        let output = "Devices:\n\thci0\tb8:27:eb:12:34:56";

        assert_eq!(parse_hcitool_dev(Ok(output.to_string())).unwrap(), "B8:27:EB:12:34:56");
        assert!(parse_hcitool_dev(Ok("Devices:".to_string())).is_err());
    }

    #[test]
    fn test_public_ip() {
        assert_eq!(
            parse_public_ip(Ok("203.0.113.7\n".to_string())).unwrap(),
            "203.0.113.7".parse::<IpAddr>().unwrap()
        );
        assert!(parse_public_ip(Ok("<html>rate limited</html>".to_string())).is_err());
    }

    #[test]
    fn test_interface_list() {
        let names = parse_interface_list(Ok("eth0\nlo\nwlan0".to_string())).unwrap();

        assert_eq!(names, vec!["eth0", "lo", "wlan0"]);
    }
}
