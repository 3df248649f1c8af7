// file: src/cli/args.rs
// version: 1.1.0
// guid: f625f24d-d49d-4f8f-9337-89ccace58a80

//! Command line argument definitions

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pi-board-info")]
#[command(about = "Raspberry Pi board identity and live telemetry")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[arg(short, long, global = true, env = "PI_BOARD_INFO_CONFIG", help = "Configuration file")]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Print results as JSON")]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode the revision code of this board
    Board,

    /// Decode a revision code without touching the board
    Decode {
        #[arg(help = "Hexadecimal revision code, e.g. a02082 or 0xc03114")]
        code: String,
    },

    /// CPU architecture, caches, temperature, voltage, frequencies and usage
    Cpu {
        #[arg(short, long, help = "Frequency unit: Hz, KHz, MHz or GHz")]
        unit: Option<String>,
    },

    /// Live RAM usage
    Ram {
        #[arg(short, long, help = "Volume unit: b, k, m or g")]
        unit: Option<String>,
    },

    /// Mounted filesystems
    Disks,

    /// Running processes by CPU usage
    Processes {
        #[arg(short = 'n', long, help = "Show at most this many processes")]
        limit: Option<usize>,
    },

    /// Network interfaces
    Network {
        #[arg(help = "Interfaces to show; defaults to the configured or all interfaces")]
        interfaces: Vec<String>,
    },

    /// Visible Wi-Fi networks
    Wifi,

    /// Internet reachability and public address
    Connectivity,

    /// Host name, OS, model, serial, Bluetooth and uptime
    System,

    /// Every fact at once
    Snapshot,

    /// Report which external tools are installed
    CheckTools,
}
