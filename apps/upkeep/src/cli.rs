//! Command line interface definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use upkeep_types::ColorChoice;

/// upkeep - Declarative unattended-upgrades convergence for Debian hosts
#[derive(Parser)]
#[command(name = "upkeep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Declarative unattended-upgrades convergence for Debian hosts")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to /var/log/upkeep/
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Enable unattended upgrades and converge the managed config files
    #[command(alias = "on")]
    Enable {
        /// Upgrade types to allow (repeatable, e.g. security, updates)
        #[arg(long = "type", value_name = "TYPE")]
        types: Vec<String>,

        /// Mail recipient for upgrade reports
        #[arg(long, value_name = "ADDR")]
        mail: Option<String>,

        /// Reboot automatically when an upgrade requires it
        #[arg(long)]
        auto_reboot: bool,

        /// Remove dependencies that are no longer needed after upgrades
        #[arg(long)]
        remove_unused_deps: bool,

        /// Days between package list updates (0 disables)
        #[arg(long, value_name = "DAYS")]
        update_package_lists: Option<i64>,

        /// Days between unattended upgrade runs (0 disables)
        #[arg(long, value_name = "DAYS")]
        unattended_upgrade: Option<i64>,

        /// Days between downloads of upgradeable packages (0 disables)
        #[arg(long, value_name = "DAYS")]
        download_upgradeable: Option<i64>,

        /// Days between apt autoclean runs (0 disables)
        #[arg(long, value_name = "DAYS")]
        autoclean_interval: Option<i64>,

        /// Packages never to upgrade automatically (comma or space separated)
        #[arg(long, value_name = "PKGS")]
        blacklist: Option<String>,
    },

    /// Comment out everything in the managed config files
    #[command(alias = "off")]
    Disable,

    /// Show convergence status of the managed files
    #[command(alias = "st")]
    Status,
}
