// file: src/cli/commands.rs
// version: 1.4.0
// guid: 54ad2bad-d861-472a-bc38-11a405f8b8ba

//! Command implementations for the CLI

use crate::{
    board::{decode_revision_code, BoardIdentity},
    parsers::{FrequencyUnit, MemoryUnit},
    provider::BoardInfoProvider,
    shell::{CommandRunner, ShellRunner},
    PiInfoError, Result,
};
use serde::Serialize;
use std::fmt::Display;
use std::net::IpAddr;
use tracing::{error, info, warn};

/// Tools every fact command relies on
const REQUIRED_TOOLS: &[&str] = &["cat", "ls", "free", "df", "ps", "ip", "uptime", "hostname", "nproc"];

/// Tools for facts that are simply unavailable without them
const OPTIONAL_TOOLS: &[&str] = &["lscpu", "vcgencmd", "top", "nmcli", "hcitool", "curl"];

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn show<T: Display>(value: &Option<T>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "unavailable".to_string(),
    }
}

fn print_identity(identity: &BoardIdentity) {
    println!("Model:              {}", identity.model);
    println!("Revision code:      {}", identity.revision_code);
    println!("Revision:           {}", identity.revision);
    println!("Manufacturer:       {}", identity.manufacturer);
    println!("CPU model:          {}", identity.cpu_model);
    println!("Memory size:        {} MB", identity.memory_size_mb);
    println!("Overvoltage:        {}", identity.overvoltage_allowed);
    println!("OTP programming:    {}", identity.otp_programming_allowed);
    println!("OTP reading:        {}", identity.otp_reading_allowed);
}

/// Decode a revision code given on the command line
pub async fn decode_command(code: &str, json: bool) -> Result<()> {
    let identity = decode_revision_code(code)?;
    info!("Decoded revision code {}", code.trim());

    if json {
        print_json(&identity)
    } else {
        print_identity(&identity);
        Ok(())
    }
}

/// Detect and print the identity of the running board
pub async fn board_command<R: CommandRunner>(provider: &BoardInfoProvider<R>, json: bool) -> Result<()> {
    let identity = BoardIdentity::detect(provider.runner()).await?;

    if json {
        print_json(&identity)
    } else {
        print_identity(&identity);
        Ok(())
    }
}

#[derive(Serialize)]
struct CpuReport {
    architecture: Option<String>,
    cores: Option<u32>,
    caches: crate::parsers::CacheSizes,
    temperature_celsius: Option<f64>,
    voltage: Option<f64>,
    frequencies: crate::parsers::CoreFrequencies,
    usage_percent: Option<f64>,
}

pub async fn cpu_command<R: CommandRunner>(
    provider: &BoardInfoProvider<R>,
    unit: Option<&str>,
    json: bool,
) -> Result<()> {
    let unit = match unit {
        Some(unit) => unit.parse::<FrequencyUnit>()?,
        None => provider.units().frequency,
    };

    let report = CpuReport {
        architecture: provider.cpu_architecture().await,
        cores: provider.cpu_cores().await,
        caches: provider.cpu_cache_sizes().await,
        temperature_celsius: provider.cpu_temperature().await,
        voltage: provider.cpu_voltage().await,
        frequencies: provider.cpu_frequencies(unit).await,
        usage_percent: provider.cpu_usage().await,
    };

    if json {
        return print_json(&report);
    }

    println!("Architecture:       {}", show(&report.architecture));
    println!("Cores:              {}", show(&report.cores));
    println!("L1d cache:          {}", show(&report.caches.l1d));
    println!("L1i cache:          {}", show(&report.caches.l1i));
    println!("L2 cache:           {}", show(&report.caches.l2));
    println!("L3 cache:           {}", show(&report.caches.l3));
    println!("Temperature:        {} °C", show(&report.temperature_celsius));
    println!("Voltage:            {} V", show(&report.voltage));
    println!("Frequency min:      {} {}", show(&report.frequencies.min), unit);
    println!("Frequency max:      {} {}", show(&report.frequencies.max), unit);
    println!("Frequency current:  {} {}", show(&report.frequencies.cur), unit);
    println!("Usage:              {} %", show(&report.usage_percent));
    Ok(())
}

pub async fn ram_command<R: CommandRunner>(
    provider: &BoardInfoProvider<R>,
    unit: Option<&str>,
    json: bool,
) -> Result<()> {
    let unit = match unit {
        Some(unit) => unit.parse::<MemoryUnit>()?,
        None => provider.units().memory,
    };

    let ram = provider.ram_usage(unit).await;

    if json {
        return print_json(&ram);
    }

    match ram {
        Some(ram) => {
            println!(
                "{:<10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
                "", "total", "used", "free", "shared", "cache", "available"
            );
            println!(
                "{:<10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
                format!("Mem ({})", ram.unit),
                ram.total,
                ram.used,
                ram.free,
                ram.shared,
                ram.cache,
                ram.available
            );
        }
        None => println!("RAM usage unavailable"),
    }
    Ok(())
}

pub async fn disks_command<R: CommandRunner>(provider: &BoardInfoProvider<R>, json: bool) -> Result<()> {
    let disks = provider.disks().await;

    if json {
        return print_json(&disks);
    }

    if disks.is_empty() {
        info!("No disk usage information available");
        return Ok(());
    }

    println!(
        "{:<24} {:>8} {:>8} {:>8} {:>5}  {}",
        "Filesystem", "Size", "Used", "Avail", "Use%", "Mounted on"
    );
    println!("{:-<80}", "");
    for disk in &disks {
        let percent = disk
            .use_percent
            .map(|p| format!("{}%", p))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<24} {:>8} {:>8} {:>8} {:>5}  {}",
            disk.filesystem, disk.size, disk.used, disk.available, percent, disk.mounted_on
        );
    }
    Ok(())
}

pub async fn processes_command<R: CommandRunner>(
    provider: &BoardInfoProvider<R>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut processes = provider.processes().await;
    if let Some(limit) = limit {
        processes.truncate(limit);
    }

    if json {
        return print_json(&processes);
    }

    println!(
        "{:<12} {:>8} {:>6} {:>6}  {:<20} {}",
        "USER", "PID", "%CPU", "%MEM", "STARTED", "COMMAND"
    );
    for process in &processes {
        println!(
            "{:<12} {:>8} {:>6.1} {:>6.1}  {:<20} {}",
            process.user,
            process.pid,
            process.cpu_percent,
            process.mem_percent,
            process.started_on.format("%Y-%m-%d %H:%M:%S").to_string(),
            process.command
        );
    }
    Ok(())
}

pub async fn network_command<R: CommandRunner>(
    provider: &BoardInfoProvider<R>,
    interfaces: &[String],
    json: bool,
) -> Result<()> {
    let infos = provider.interfaces_info(interfaces).await;

    if json {
        return print_json(&infos);
    }

    if infos.is_empty() {
        warn!("No network interface information available");
        return Ok(());
    }

    for info in &infos {
        println!("{} ({:?})", info.name, info.state);
        println!("  MAC:        {}", show(&info.mac));
        println!("  IPv4:       {}", show(&info.ip));
        println!("  Netmask:    {}", show(&info.mask));
        println!("  Broadcast:  {}", show(&info.broadcast));
        println!("  Gateway:    {}", show(&info.gateway));
    }
    Ok(())
}

pub async fn wifi_command<R: CommandRunner>(provider: &BoardInfoProvider<R>, json: bool) -> Result<()> {
    let networks = provider.wifi_networks().await;

    if json {
        return print_json(&networks);
    }

    println!(
        "{:<2} {:<32} {:<18} {:>4} {:>12} {:>6}  {}",
        "", "SSID", "BSSID", "CHAN", "RATE", "SIGNAL", "SECURITY"
    );
    for net in &networks {
        println!(
            "{:<2} {:<32} {:<18} {:>4} {:>12} {:>6}  {}",
            if net.in_use { "*" } else { "" },
            net.ssid,
            net.bssid,
            show(&net.channel),
            net.rate,
            show(&net.signal),
            net.security
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct ConnectivityReport {
    online: bool,
    public_ip: Option<IpAddr>,
}

pub async fn connectivity_command<R: CommandRunner>(
    provider: &BoardInfoProvider<R>,
    json: bool,
) -> Result<()> {
    let online = provider.is_online().await;
    let public_ip = if online { provider.public_ip().await } else { None };
    let report = ConnectivityReport { online, public_ip };

    if json {
        return print_json(&report);
    }

    println!("Online:     {}", if report.online { "yes" } else { "no" });
    println!("Public IP:  {}", show(&report.public_ip));
    Ok(())
}

#[derive(Serialize)]
struct SystemReport {
    hostname: Option<String>,
    os_name: Option<String>,
    model_name: Option<String>,
    serial_number: Option<String>,
    bluetooth_address: Option<String>,
    uptime_since: Option<chrono::NaiveDateTime>,
    uptime_pretty: Option<String>,
}

pub async fn system_command<R: CommandRunner>(provider: &BoardInfoProvider<R>, json: bool) -> Result<()> {
    let report = SystemReport {
        hostname: provider.hostname().await,
        os_name: provider.os_name().await,
        model_name: provider.model_name().await,
        serial_number: provider.serial_number().await,
        bluetooth_address: provider.bluetooth_address().await,
        uptime_since: provider.uptime_since().await,
        uptime_pretty: provider.uptime_pretty().await,
    };

    if json {
        return print_json(&report);
    }

    println!("Hostname:           {}", show(&report.hostname));
    println!("OS:                 {}", show(&report.os_name));
    println!("Model:              {}", show(&report.model_name));
    println!("Serial number:      {}", show(&report.serial_number));
    println!("Bluetooth address:  {}", show(&report.bluetooth_address));
    println!("Up since:           {}", show(&report.uptime_since));
    println!("Uptime:             {}", show(&report.uptime_pretty));
    Ok(())
}

/// Detect the board, then collect and print every fact
pub async fn snapshot_command<R: CommandRunner>(provider: &BoardInfoProvider<R>, json: bool) -> Result<()> {
    let identity = BoardIdentity::detect(provider.runner()).await?;
    let snapshot = provider.snapshot(&identity).await;

    if json {
        return print_json(&snapshot);
    }

    println!("=== {} ===", identity);
    println!("Collected at:       {}", snapshot.collected_at.format("%Y-%m-%d %H:%M:%S"));
    println!("Hostname:           {}", show(&snapshot.hostname));
    println!("OS:                 {}", show(&snapshot.os_name));
    println!("Serial number:      {}", show(&snapshot.serial_number));
    println!("CPU temperature:    {} °C", show(&snapshot.cpu_temperature));
    println!("CPU usage:          {} %", show(&snapshot.cpu_usage));
    if let Some(ram) = &snapshot.ram {
        println!("RAM used:           {} / {} {}", ram.used, ram.total, ram.unit);
    }
    println!("Disks:              {}", snapshot.disks.len());
    println!("Processes:          {}", snapshot.processes.len());
    for info in &snapshot.interfaces {
        println!("Interface {:<8} {}", info.name, show(&info.ip));
    }
    println!("Wi-Fi networks:     {}", snapshot.wifi_networks.len());
    println!("Online:             {}", if snapshot.online { "yes" } else { "no" });
    println!("Public IP:          {}", show(&snapshot.public_ip));
    println!("Uptime:             {}", show(&snapshot.uptime_pretty));
    Ok(())
}

#[derive(Serialize)]
struct ToolStatus {
    tool: &'static str,
    required: bool,
    available: bool,
}

/// Check which external tools are on `PATH`
pub async fn check_tools_command(json: bool) -> Result<()> {
    info!("Checking external tools used to read board facts");

    let statuses: Vec<ToolStatus> = REQUIRED_TOOLS
        .iter()
        .map(|tool| (*tool, true))
        .chain(OPTIONAL_TOOLS.iter().map(|tool| (*tool, false)))
        .map(|(tool, required)| ToolStatus {
            tool,
            required,
            available: ShellRunner::tool_available(tool),
        })
        .collect();

    if json {
        print_json(&statuses)?;
    } else {
        for status in &statuses {
            let mark = if status.available { "✓" } else { "✗" };
            let kind = if status.required { "required" } else { "optional" };
            println!("{} {:<10} ({})", mark, status.tool, kind);
        }
    }

    let missing: Vec<&str> = statuses
        .iter()
        .filter(|s| s.required && !s.available)
        .map(|s| s.tool)
        .collect();

    if missing.is_empty() {
        info!("All required tools are available");
        Ok(())
    } else {
        error!("✗ Missing required tools: {}", missing.join(", "));
        Err(PiInfoError::config(format!(
            "Missing {} required tools",
            missing.len()
        )))
    }
}
