// file: src/main.rs
// version: 1.1.1
// guid: 1652e538-91f2-42bd-b457-c50f785a2159

//! pi-board-info - Main entry point

use anyhow::{Context, Result};
use clap::Parser;
use pi_board_info::{
    cli::{
        args::{Cli, Commands},
        commands::*,
    },
    config::{Config, LogFormat},
    logging::logger,
    BoardInfoProvider, ShellRunner,
};
use tokio::signal;
use tracing::{debug, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())
        .await
        .context("Failed to load configuration")?;

    match config.logging.format {
        LogFormat::Compact => logger::init_logger(cli.verbose, cli.quiet, &config.logging.level),
        LogFormat::Json => logger::init_json_logger(cli.verbose, cli.quiet, &config.logging.level),
    }
    .context("Failed to initialize logging")?;

    debug!("pi-board-info {}", pi_board_info::VERSION);

    let runner = ShellRunner::new()
        .with_shell(config.general.shell.clone())
        .with_timeout(config.general.timeout());
    let provider = BoardInfoProvider::new(runner)
        .with_network_config(config.network.clone())
        .with_units(config.units.clone());

    let json = cli.json;
    let command_future = async {
        match cli.command {
            Commands::Board => board_command(&provider, json).await,
            Commands::Decode { code } => decode_command(&code, json).await,
            Commands::Cpu { unit } => cpu_command(&provider, unit.as_deref(), json).await,
            Commands::Ram { unit } => ram_command(&provider, unit.as_deref(), json).await,
            Commands::Disks => disks_command(&provider, json).await,
            Commands::Processes { limit } => processes_command(&provider, limit, json).await,
            Commands::Network { interfaces } => {
                network_command(&provider, &interfaces, json).await
            }
            Commands::Wifi => wifi_command(&provider, json).await,
            Commands::Connectivity => connectivity_command(&provider, json).await,
            Commands::System => system_command(&provider, json).await,
            Commands::Snapshot => snapshot_command(&provider, json).await,
            Commands::CheckTools => check_tools_command(json).await,
        }
    };

    let interrupted = tokio::select! {
        result = command_future => {
            result?;
            false
        }
        _ = signal::ctrl_c() => {
            warn!("Interrupted by user");
            true
        }
    };

    // The command future is dropped by now, which kills any running child
    if interrupted {
        std::process::exit(130);
    }
    Ok(())
}
