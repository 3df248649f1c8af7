// file: src/provider.rs
// version: 1.0.1
// guid: c2e6a9f4-1b73-4d58-8e0a-7f3b5d9c1e62

//! Board info provider
//!
//! One async method per fact. Each runs exactly one command per value,
//! hands the [`ShellResult`] to its parser and recovers failures into
//! `None` or an empty list. Shell failures were already logged by the
//! runner; parse failures are logged here.

use crate::board::BoardIdentity;
use crate::config::{NetworkConfig, UnitsConfig};
use crate::parsers::{
    cpu, cpuinfo, disk, memory, network, process, system, wifi, CacheSizes, CoreFrequencies,
    DiskUsageRecord, FactError, FactResult, FrequencyKind, FrequencyUnit, MemoryUnit,
    NetworkInterfaceInfo, ProcessRecord, RamUsage, WifiNetworkRecord,
};
use crate::shell::{CommandRunner, ShellResult, ShellRunner};
use chrono::{DateTime, Local, NaiveDateTime};
use serde::Serialize;
use std::net::IpAddr;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, error, warn};

/// Reads live facts from the board through a [`CommandRunner`]
pub struct BoardInfoProvider<R: CommandRunner = ShellRunner> {
    runner: R,
    network: NetworkConfig,
    units: UnitsConfig,
}

/// Every fact for one dashboard refresh
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot<'a> {
    pub collected_at: DateTime<Local>,
    pub board: &'a BoardIdentity,
    pub hostname: Option<String>,
    pub os_name: Option<String>,
    pub model_name: Option<String>,
    pub serial_number: Option<String>,
    pub cpu_architecture: Option<String>,
    pub cpu_cores: Option<u32>,
    pub cpu_cache_sizes: CacheSizes,
    pub cpu_temperature: Option<f64>,
    pub cpu_voltage: Option<f64>,
    pub cpu_frequencies: CoreFrequencies,
    pub cpu_usage: Option<f64>,
    pub ram: Option<RamUsage>,
    pub disks: Vec<DiskUsageRecord>,
    pub processes: Vec<ProcessRecord>,
    pub interfaces: Vec<NetworkInterfaceInfo>,
    pub wifi_networks: Vec<WifiNetworkRecord>,
    pub bluetooth_address: Option<String>,
    pub public_ip: Option<IpAddr>,
    pub online: bool,
    pub uptime_since: Option<NaiveDateTime>,
    pub uptime_pretty: Option<String>,
}

/// Turn a fact result into its unavailable default, logging parse failures
fn recover<T>(fact: &str, result: FactResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        // Already logged by the runner
        Err(FactError::Shell(_)) => None,
        Err(FactError::Parse(e)) => {
            error!(fact = fact, "Could not read {}: {}", fact, e);
            None
        }
    }
}

impl<R: CommandRunner> BoardInfoProvider<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            network: NetworkConfig::default(),
            units: UnitsConfig::default(),
        }
    }

    pub fn with_network_config(mut self, network: NetworkConfig) -> Self {
        self.network = network;
        self
    }

    pub fn with_units(mut self, units: UnitsConfig) -> Self {
        self.units = units;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn units(&self) -> &UnitsConfig {
        &self.units
    }

    async fn fetch<T, F>(&self, fact: &str, command: &str, parse: F) -> Option<T>
    where
        F: FnOnce(ShellResult) -> FactResult<T>,
    {
        debug!("Fetching {}...", fact);
        let raw = self.runner.run(command).await;
        recover(fact, parse(raw))
    }

    pub async fn hostname(&self) -> Option<String> {
        self.fetch("hostname", system::HOSTNAME_COMMAND, system::parse_hostname)
            .await
    }

    pub async fn os_name(&self) -> Option<String> {
        self.fetch("OS name", system::OS_RELEASE_COMMAND, system::parse_os_name)
            .await
    }

    /// Model string from the device tree, e.g. `Raspberry Pi 4 Model B Rev 1.4`
    pub async fn model_name(&self) -> Option<String> {
        self.fetch("model name", system::MODEL_COMMAND, system::parse_model_name)
            .await
    }

    pub async fn serial_number(&self) -> Option<String> {
        self.fetch("serial number", crate::board::CPUINFO_COMMAND, |raw| {
            cpuinfo::parse_field(raw, "Serial")
        })
        .await
    }

    pub async fn cpu_architecture(&self) -> Option<String> {
        self.fetch("CPU architecture", cpu::LSCPU_COMMAND, |raw| {
            cpu::parse_lscpu_field(raw, "Architecture")
        })
        .await
    }

    pub async fn cpu_cores(&self) -> Option<u32> {
        self.fetch("CPU core count", cpu::CORE_COUNT_COMMAND, cpu::parse_core_count)
            .await
    }

    pub async fn cpu_cache_sizes(&self) -> CacheSizes {
        self.fetch("CPU cache sizes", cpu::LSCPU_COMMAND, cpu::parse_cache_sizes)
            .await
            .unwrap_or_default()
    }

    /// Degrees Celsius
    pub async fn cpu_temperature(&self) -> Option<f64> {
        self.fetch("CPU temperature", cpu::TEMPERATURE_COMMAND, cpu::parse_temperature)
            .await
    }

    /// Core voltage in volts
    pub async fn cpu_voltage(&self) -> Option<f64> {
        self.fetch("CPU voltage", cpu::VOLTAGE_COMMAND, cpu::parse_voltage)
            .await
    }

    /// Min, max and current frequency of core 0, one command each
    pub async fn cpu_frequencies(&self, unit: FrequencyUnit) -> CoreFrequencies {
        let mut frequencies = CoreFrequencies::unavailable(unit);
        for kind in FrequencyKind::ALL {
            let value = self
                .fetch("CPU frequency", &kind.command(), |raw| {
                    crate::parsers::frequency::parse_scaling_frequency(raw, unit)
                })
                .await;
            frequencies.set(kind, value);
        }
        frequencies
    }

    /// Overall CPU usage in percent
    pub async fn cpu_usage(&self) -> Option<f64> {
        self.fetch("CPU usage", cpu::USAGE_COMMAND, cpu::parse_usage)
            .await
    }

    pub async fn ram_usage(&self, unit: MemoryUnit) -> Option<RamUsage> {
        self.fetch("RAM usage", &unit.command(), |raw| memory::parse_free(raw, unit))
            .await
    }

    pub async fn disks(&self) -> Vec<DiskUsageRecord> {
        self.fetch("disk usage", disk::DF_COMMAND, disk::parse_df)
            .await
            .unwrap_or_default()
    }

    /// Processes by descending CPU usage
    pub async fn processes(&self) -> Vec<ProcessRecord> {
        self.fetch("processes", process::PS_COMMAND, process::parse_ps)
            .await
            .unwrap_or_default()
    }

    /// Names under `/sys/class/net`
    pub async fn interfaces(&self) -> Vec<String> {
        self.fetch(
            "network interfaces",
            &network::list_interfaces_command(),
            network::parse_interface_list,
        )
        .await
        .unwrap_or_default()
    }

    /// Interface names are only ever interpolated into commands after
    /// they have been found in the kernel's own listing.
    async fn known_interface(&self, interface: &str) -> bool {
        let known = self.interfaces().await.iter().any(|name| name == interface);
        if !known {
            warn!("Unknown network interface: {}", interface);
        }
        known
    }

    pub async fn mac_address(&self, interface: &str) -> Option<String> {
        if !self.known_interface(interface).await {
            return None;
        }
        self.fetch(
            "MAC address",
            &network::mac_address_command(interface),
            network::parse_mac_address,
        )
        .await
    }

    /// Addresses, gateway and link state of one interface
    pub async fn interface_info(&self, interface: &str) -> Option<NetworkInterfaceInfo> {
        if !self.known_interface(interface).await {
            return None;
        }

        let mut info = NetworkInterfaceInfo::new(interface);

        info.mac = self
            .fetch(
                "MAC address",
                &network::mac_address_command(interface),
                network::parse_mac_address,
            )
            .await;

        if let Some(state) = self
            .fetch(
                "link state",
                &network::operstate_command(interface),
                network::parse_operstate,
            )
            .await
        {
            info.state = state;
        }

        if let Some(Some(ipv4)) = self
            .fetch(
                "IPv4 address",
                &network::ipv4_command(interface),
                network::parse_ipv4_config,
            )
            .await
        {
            info.ip = Some(ipv4.ip);
            info.mask = Some(ipv4.mask);
            info.broadcast = ipv4.broadcast;
        }

        info.gateway = self
            .fetch(
                "default gateway",
                &network::gateway_command(interface),
                network::parse_default_gateway,
            )
            .await
            .flatten();

        Some(info)
    }

    /// Info for `names`, else for the configured interfaces, else for every interface
    pub async fn interfaces_info(&self, names: &[String]) -> Vec<NetworkInterfaceInfo> {
        let names = if !names.is_empty() {
            names.to_vec()
        } else if !self.network.interfaces.is_empty() {
            self.network.interfaces.clone()
        } else {
            self.interfaces().await
        };

        let mut infos = Vec::with_capacity(names.len());
        for name in &names {
            if let Some(info) = self.interface_info(name).await {
                infos.push(info);
            }
        }
        infos
    }

    pub async fn wifi_networks(&self) -> Vec<WifiNetworkRecord> {
        self.fetch("Wi-Fi networks", wifi::NMCLI_WIFI_COMMAND, wifi::parse_nmcli_wifi)
            .await
            .unwrap_or_default()
    }

    pub async fn bluetooth_address(&self) -> Option<String> {
        self.fetch(
            "Bluetooth address",
            network::BLUETOOTH_COMMAND,
            network::parse_hcitool_dev,
        )
        .await
    }

    pub async fn public_ip(&self) -> Option<IpAddr> {
        self.fetch(
            "public IP",
            &self.network.public_ip_command,
            network::parse_public_ip,
        )
        .await
    }

    /// Whether any configured target accepts a TCP connection
    pub async fn is_online(&self) -> bool {
        let wait = self.network.connectivity_timeout();

        for target in &self.network.connectivity_targets {
            debug!("Testing connectivity to {}", target);
            match timeout(wait, TcpStream::connect(target.as_str())).await {
                Ok(Ok(_)) => {
                    debug!("Successfully connected to {}", target);
                    return true;
                }
                Ok(Err(e)) => debug!("Failed to connect to {}: {}", target, e),
                Err(_) => debug!(
                    "Connection to {} timed out after {} seconds",
                    target, self.network.connectivity_timeout_seconds
                ),
            }
        }

        warn!("No connectivity target reachable; board is offline");
        false
    }

    pub async fn uptime_since(&self) -> Option<NaiveDateTime> {
        self.fetch("uptime", system::UPTIME_SINCE_COMMAND, system::parse_uptime_since)
            .await
    }

    pub async fn uptime_pretty(&self) -> Option<String> {
        self.fetch(
            "uptime",
            system::UPTIME_PRETTY_COMMAND,
            system::parse_uptime_pretty,
        )
        .await
    }

    /// Collect every fact, one command after another; the public IP is
    /// only looked up once a connectivity target answered
    pub async fn snapshot<'a>(&self, board: &'a BoardIdentity) -> DashboardSnapshot<'a> {
        let online = self.is_online().await;
        let public_ip = if online { self.public_ip().await } else { None };

        DashboardSnapshot {
            collected_at: Local::now(),
            board,
            hostname: self.hostname().await,
            os_name: self.os_name().await,
            model_name: self.model_name().await,
            serial_number: self.serial_number().await,
            cpu_architecture: self.cpu_architecture().await,
            cpu_cores: self.cpu_cores().await,
            cpu_cache_sizes: self.cpu_cache_sizes().await,
            cpu_temperature: self.cpu_temperature().await,
            cpu_voltage: self.cpu_voltage().await,
            cpu_frequencies: self.cpu_frequencies(self.units.frequency).await,
            cpu_usage: self.cpu_usage().await,
            ram: self.ram_usage(self.units.memory).await,
            disks: self.disks().await,
            processes: self.processes().await,
            interfaces: self.interfaces_info(&[]).await,
            wifi_networks: self.wifi_networks().await,
            bluetooth_address: self.bluetooth_address().await,
            public_ip,
            online,
            uptime_since: self.uptime_since().await,
            uptime_pretty: self.uptime_pretty().await,
        }
    }
}
