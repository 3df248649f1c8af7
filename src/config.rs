// file: src/config.rs
// version: 1.0.0
// guid: 1d279385-6b87-435e-9c52-4a84f3887fa3

use crate::error::{PiInfoError, Result};
use crate::parsers::{FrequencyUnit, MemoryUnit};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info};

const APP_NAME: &str = "pi-board-info";
const PROJECT_CONFIG_FILE: &str = "pi-board-info.toml";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub network: NetworkConfig,
    pub units: UnitsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Shell used to run every fact command
    pub shell: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Interfaces shown by default; empty means every interface
    pub interfaces: Vec<String>,
    /// `host:port` targets tried for internet reachability
    pub connectivity_targets: Vec<String>,
    pub connectivity_timeout_seconds: u64,
    pub public_ip_command: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitsConfig {
    pub frequency: FrequencyUnit,
    pub memory: MemoryUnit,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            shell: "bash".to_string(),
            timeout_seconds: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            interfaces: Vec::new(),
            connectivity_targets: vec![
                "8.8.8.8:53".to_string(),
                "1.1.1.1:53".to_string(),
                "208.67.222.222:53".to_string(),
            ],
            connectivity_timeout_seconds: 5,
            public_ip_command: "curl -s --max-time 5 https://api.ipify.org".to_string(),
        }
    }
}

impl Default for UnitsConfig {
    fn default() -> Self {
        Self {
            frequency: FrequencyUnit::MHz,
            memory: MemoryUnit::Mebi,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            logging: LoggingConfig::default(),
            network: NetworkConfig::default(),
            units: UnitsConfig::default(),
        }
    }
}

impl GeneralConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl NetworkConfig {
    pub fn connectivity_timeout(&self) -> Duration {
        Duration::from_secs(self.connectivity_timeout_seconds)
    }
}

impl Config {
    /// Load configuration from multiple sources.
    ///
    /// Later sources override earlier ones key by key: defaults, the user
    /// config file, `./pi-board-info.toml`, the explicit `path`, then
    /// environment variables.
    pub async fn load(explicit: Option<&str>) -> Result<Self> {
        let mut merged = toml::Value::try_from(Self::default())
            .map_err(|e| PiInfoError::config(format!("Failed to encode defaults: {}", e)))?;

        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                info!("Loading user configuration from: {}", user_config.display());
                merge_values(&mut merged, Self::read_value(&user_config).await?);
            }
        }

        let project_config = Path::new(PROJECT_CONFIG_FILE);
        if project_config.exists() {
            info!(
                "Loading project configuration from: {}",
                project_config.display()
            );
            merge_values(&mut merged, Self::read_value(project_config).await?);
        }

        if let Some(path) = explicit {
            let path = Self::expand_path(path)?;
            info!("Loading configuration from: {}", path.display());
            merge_values(&mut merged, Self::read_value(&path).await?);
        }

        let config: Self = merged.try_into()?;
        let config = Self::apply_env_overrides(config)?;
        config.validate()?;

        debug!("Final configuration: {:#?}", config);
        Ok(config)
    }

    /// Load a single TOML file over the defaults, without other sources
    pub async fn load_from_file(path: &Path) -> Result<Self> {
        let mut merged = toml::Value::try_from(Self::default())
            .map_err(|e| PiInfoError::config(format!("Failed to encode defaults: {}", e)))?;
        merge_values(&mut merged, Self::read_value(path).await?);

        let config: Self = merged.try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the user configuration file path
    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"))
    }

    fn expand_path(path: &str) -> Result<PathBuf> {
        let expanded = shellexpand::full(path)
            .map_err(|e| PiInfoError::config(format!("Failed to expand path {}: {}", path, e)))?;
        Ok(PathBuf::from(expanded.as_ref()))
    }

    async fn read_value(path: &Path) -> Result<toml::Value> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            PiInfoError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            PiInfoError::config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: Self) -> Result<Self> {
        if let Ok(level) = std::env::var("PI_BOARD_INFO_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(timeout) = std::env::var("PI_BOARD_INFO_TIMEOUT") {
            config.general.timeout_seconds = timeout.parse::<u64>().map_err(|_| {
                PiInfoError::config(format!("PI_BOARD_INFO_TIMEOUT is not a number: {}", timeout))
            })?;
        }

        if let Ok(shell) = std::env::var("PI_BOARD_INFO_SHELL") {
            config.general.shell = shell;
        }

        Ok(config)
    }

    /// Reject settings no command could run with
    pub fn validate(&self) -> Result<()> {
        if self.general.shell.trim().is_empty() {
            return Err(PiInfoError::config("general.shell must not be empty"));
        }
        if self.general.timeout_seconds == 0 {
            return Err(PiInfoError::config("general.timeout_seconds must be greater than 0"));
        }
        if self.network.connectivity_timeout_seconds == 0 {
            return Err(PiInfoError::config(
                "network.connectivity_timeout_seconds must be greater than 0",
            ));
        }
        if let Some(target) = self
            .network
            .connectivity_targets
            .iter()
            .find(|target| target.rsplit_once(':').map_or(true, |(_, port)| port.parse::<u16>().is_err()))
        {
            return Err(PiInfoError::config(format!(
                "connectivity target must be host:port, got {:?}",
                target
            )));
        }
        if self.network.public_ip_command.trim().is_empty() {
            return Err(PiInfoError::config("network.public_ip_command must not be empty"));
        }
        Ok(())
    }
}

/// Overlay `overlay` onto `base`, descending into tables
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
