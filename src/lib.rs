// file: src/lib.rs
// version: 2.0.0
// guid: 7fccaf35-d098-4ef7-9883-25b603ee2439

//! # pi-board-info
//!
//! Board identity and live telemetry for Raspberry Pi boards.
//!
//! The board identity is decoded once from the `/proc/cpuinfo` revision
//! code. Every other fact comes from one shell command whose output is
//! parsed into a typed record; a fact that cannot be read is `None` or an
//! empty list, never a made-up zero.

pub mod board;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod parsers;
pub mod provider;
pub mod shell;

pub use board::{decode_revision_code, BoardIdentity, ModelType};
pub use error::{PiInfoError, Result};
pub use provider::{BoardInfoProvider, DashboardSnapshot};
pub use shell::{CommandRunner, ShellRunner};

/// Version information for the utility
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
