#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for upkeep
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/upkeep/config.toml)
//! - Environment variables
//! - CLI flags (applied by the CLI on top of the loaded config)

pub mod fixed_paths;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use upkeep_errors::{ConfigError, Error};
use upkeep_types::{ColorChoice, DesiredState, OutputFormat, TargetFile};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub upgrades: UpgradesConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub paths: PathConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    #[serde(default = "default_color_choice")]
    pub color: ColorChoice,
}

/// Upgrade behavior configuration (what the unattended upgrader may do)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradesConfig {
    #[serde(default = "default_upgrade_types")]
    pub types: Vec<String>,
    #[serde(default = "default_mail_recipient")]
    pub mail: String,
    #[serde(default = "default_remove_unused_dependencies")]
    pub remove_unused_dependencies: bool,
    #[serde(default = "default_auto_reboot")]
    pub auto_reboot: bool,
    #[serde(default)]
    pub package_blacklist: Option<String>,
}

/// APT periodic schedule configuration, in days (0 disables a task)
///
/// Values are signed on purpose: out-of-range input must survive parsing so
/// that desired-state construction can reject it with a proper error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_update_package_lists")]
    pub update_package_lists: i64,
    #[serde(default = "default_unattended_upgrade")]
    pub unattended_upgrade: i64,
    #[serde(default = "default_download_upgradeable")]
    pub download_upgradeable: i64,
    #[serde(default = "default_autoclean_interval")]
    pub autoclean_interval: i64,
}

/// Path configuration (overrides for the managed APT files)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    pub origins_file: Option<PathBuf>,
    pub periodic_file: Option<PathBuf>,
    /// Chown converged files to root:root; disable for hermetic runs
    /// against redirected paths.
    #[serde(default = "default_enforce_ownership")]
    pub enforce_ownership: bool,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            origins_file: None,
            periodic_file: None,
            enforce_ownership: true,
        }
    }
}

// Default implementations

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: OutputFormat::Tty,
            color: ColorChoice::Auto,
        }
    }
}

impl Default for UpgradesConfig {
    fn default() -> Self {
        Self {
            types: default_upgrade_types(),
            mail: default_mail_recipient(),
            remove_unused_dependencies: false,
            auto_reboot: false,
            package_blacklist: None,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            update_package_lists: 0,
            unattended_upgrade: 1,
            download_upgradeable: 0,
            autoclean_interval: 0,
        }
    }
}

// Default value functions for serde

fn default_output_format() -> OutputFormat {
    OutputFormat::Tty
}

fn default_color_choice() -> ColorChoice {
    ColorChoice::Auto
}

fn default_upgrade_types() -> Vec<String> {
    vec!["security".to_string()]
}

fn default_mail_recipient() -> String {
    "root".to_string()
}

fn default_remove_unused_dependencies() -> bool {
    false
}

fn default_auto_reboot() -> bool {
    false
}

fn default_update_package_lists() -> i64 {
    0
}

fn default_unattended_upgrade() -> i64 {
    1
}

fn default_download_upgradeable() -> i64 {
    0
}

fn default_autoclean_interval() -> i64 {
    0
}

fn default_enforce_ownership() -> bool {
    true
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("upkeep").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;
        tracing::debug!("loaded configuration from {}", path.display());

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: &Option<PathBuf>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // UPKEEP_OUTPUT
        if let Ok(output) = std::env::var("UPKEEP_OUTPUT") {
            self.general.default_output = match output.as_str() {
                "plain" => OutputFormat::Plain,
                "tty" => OutputFormat::Tty,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "UPKEEP_OUTPUT".to_string(),
                        value: output,
                    }
                    .into())
                }
            };
        }

        // UPKEEP_COLOR
        if let Ok(color) = std::env::var("UPKEEP_COLOR") {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "UPKEEP_COLOR".to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        // UPKEEP_MAIL
        if let Ok(mail) = std::env::var("UPKEEP_MAIL") {
            if mail.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "UPKEEP_MAIL".to_string(),
                    value: mail,
                }
                .into());
            }
            self.upgrades.mail = mail;
        }

        // UPKEEP_AUTO_REBOOT
        if let Ok(reboot) = std::env::var("UPKEEP_AUTO_REBOOT") {
            self.upgrades.auto_reboot = match reboot.as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "UPKEEP_AUTO_REBOOT".to_string(),
                        value: reboot,
                    }
                    .into())
                }
            };
        }

        Ok(())
    }

    /// On-disk path of a managed target file, honoring `[paths]` overrides.
    #[must_use]
    pub fn target_path(&self, file: TargetFile) -> PathBuf {
        match file {
            TargetFile::AllowedOrigins => self
                .paths
                .origins_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(fixed_paths::ORIGINS_FILE)),
            TargetFile::PeriodicSchedule => self
                .paths
                .periodic_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(fixed_paths::PERIODIC_FILE)),
        }
    }

    /// Build the desired state this configuration describes.
    ///
    /// All range validation happens here, before any effect primitive can be
    /// reached: a negative schedule entry never survives this call.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for out-of-range schedule values.
    pub fn desired_state(&self) -> Result<DesiredState, Error> {
        DesiredState::builder()
            .with_upgrade_types(self.upgrades.types.clone())
            .with_mail_recipient(self.upgrades.mail.clone())
            .with_remove_unused_dependencies(self.upgrades.remove_unused_dependencies)
            .with_auto_reboot(self.upgrades.auto_reboot)
            .with_update_package_lists_days(self.schedule.update_package_lists)
            .with_unattended_upgrade_days(self.schedule.unattended_upgrade)
            .with_download_upgradeable_days(self.schedule.download_upgradeable)
            .with_autoclean_interval_days(self.schedule.autoclean_interval)
            .with_package_blacklist(self.upgrades.package_blacklist.clone())
            .build()
            .map_err(Into::into)
    }
}
