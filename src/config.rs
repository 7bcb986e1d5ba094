use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub preflight: PreflightConfig,
    pub install: InstallConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreflightConfig {
    /// Executables that must resolve on PATH before any step runs
    pub required: Vec<String>,
    /// Hint printed when something is missing
    pub remediation: String,
}

impl Default for PreflightConfig {
    fn default() -> Self {
        Self {
            required: vec!["curl".to_string(), "npm".to_string(), "sudo".to_string()],
            remediation: "sudo apt update && sudo apt install -y curl nodejs npm".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Destination for downloaded binaries
    pub bin_dir: PathBuf,
    /// Privilege escalation prefix; empty disables it
    pub elevate_with: String,
    /// Pause after preflight during which Ctrl-C aborts cleanly
    pub start_delay_ms: u64,
    /// Re-invoke installed binaries with a version flag
    pub verify: bool,
    /// Where binary downloads are staged before the move
    pub temp_dir: PathBuf,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            bin_dir: PathBuf::from("/usr/local/bin"),
            elevate_with: "sudo".to_string(),
            start_delay_ms: 1000,
            verify: true,
            temp_dir: PathBuf::from("."),
        }
    }
}

impl InstallConfig {
    /// Escalation prefix, or None when disabled
    pub fn elevation(&self) -> Option<&str> {
        let prefix = self.elevate_with.trim();
        if prefix.is_empty() { None } else { Some(prefix) }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            preflight: PreflightConfig::default(),
            install: InstallConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}
