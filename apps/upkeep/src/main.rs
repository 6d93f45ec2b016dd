//! upkeep - Declarative unattended-upgrades convergence for Debian hosts
//!
//! This is the main CLI application that orchestrates all convergence
//! operations through the ops crate.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::{Cli, Commands, GlobalArgs};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use std::process;
use std::sync::Arc;
use tokio::select;
use tracing::{error, info};
use upkeep_config::{fixed_paths, Config};
use upkeep_events::EventReceiver;
use upkeep_ops::{OperationResult, OpsContextBuilder, OpsCtx};
use upkeep_platform::{FsFileEffect, HostCommandEffect, SystemFacts};
use upkeep_types::{ColorChoice, OutputFormat};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    // Initialize tracing with JSON awareness
    init_tracing(json_mode, cli.global.debug);

    // Run the application and handle errors
    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if !json_mode {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting upkeep v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(&cli.global.config).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli.global, &cli.command);

    // Create event channel
    let (event_sender, event_receiver) = upkeep_events::channel();

    // Build operations context against the real host
    let ctx = OpsContextBuilder::new()
        .with_facts(Arc::new(SystemFacts::new()))
        .with_file_effect(Arc::new(FsFileEffect::new()))
        .with_command_effect(Arc::new(HostCommandEffect::new()))
        .with_event_sender(event_sender)
        .with_config(config.clone())
        .build()?;

    // Create output renderer and event handler
    let color_choice = cli.global.color.unwrap_or(config.general.color);
    let renderer = OutputRenderer::new(cli.global.json, color_choice);
    let colors_enabled = match color_choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stdout().features().colors_supported(),
    };
    let mut event_handler = EventHandler::new(colors_enabled, cli.global.debug, cli.global.json);

    // Execute command with event handling
    let result =
        execute_command_with_events(cli.command, ctx, event_receiver, &mut event_handler).await?;

    // Render final result
    renderer.render_result(&result)?;

    info!("Command completed successfully");
    Ok(())
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    ctx: OpsCtx,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<OperationResult, CliError> {
    let mut command_future = Box::pin(execute_command(command, ctx));

    // Handle events concurrently with command execution
    loop {
        select! {
            // Command completed
            result = &mut command_future => {
                // Drain any remaining events
                while let Ok(message) = event_receiver.try_recv() {
                    event_handler.handle_message(message);
                }
                return result;
            }

            // Event received
            message = event_receiver.recv() => {
                match message {
                    Some(message) => event_handler.handle_message(message),
                    None => { /* Channel closed: keep waiting for command to finish */ }
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(command: Commands, ctx: OpsCtx) -> Result<OperationResult, CliError> {
    match command {
        // Flags were already folded into the context's config
        Commands::Enable { .. } => {
            let report = upkeep_ops::enable(&ctx).await?;
            Ok(OperationResult::Converge(report))
        }

        Commands::Disable => {
            let report = upkeep_ops::disable(&ctx).await?;
            Ok(OperationResult::Disable(report))
        }

        Commands::Status => {
            let report = upkeep_ops::status(&ctx).await?;
            Ok(OperationResult::Status(report))
        }
    }
}

/// Apply CLI flag overrides on top of the loaded configuration
fn apply_cli_config(config: &mut Config, global: &GlobalArgs, command: &Commands) {
    if let Some(color) = global.color {
        config.general.color = color;
    }
    if global.json {
        config.general.default_output = OutputFormat::Json;
    }

    if let Commands::Enable {
        types,
        mail,
        auto_reboot,
        remove_unused_deps,
        update_package_lists,
        unattended_upgrade,
        download_upgradeable,
        autoclean_interval,
        blacklist,
    } = command
    {
        if !types.is_empty() {
            config.upgrades.types.clone_from(types);
        }
        if let Some(mail) = mail {
            config.upgrades.mail.clone_from(mail);
        }
        if *auto_reboot {
            config.upgrades.auto_reboot = true;
        }
        if *remove_unused_deps {
            config.upgrades.remove_unused_dependencies = true;
        }
        if let Some(days) = update_package_lists {
            config.schedule.update_package_lists = *days;
        }
        if let Some(days) = unattended_upgrade {
            config.schedule.unattended_upgrade = *days;
        }
        if let Some(days) = download_upgradeable {
            config.schedule.download_upgradeable = *days;
        }
        if let Some(days) = autoclean_interval {
            config.schedule.autoclean_interval = *days;
        }
        if let Some(blacklist) = blacklist {
            config.upgrades.package_blacklist = Some(blacklist.clone());
        }
    }
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    // Check if debug logging is enabled
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if json_mode {
        // JSON mode: suppress all console output to avoid contaminating JSON
        if debug_enabled {
            // In debug mode with JSON, still log to file
            if let Some(log_file) = create_log_file() {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(log_file)
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| {
                                tracing_subscriber::EnvFilter::new("info,upkeep=debug")
                            }),
                    )
                    .init();
                return;
            }
        }
        // Fallback: disable all logging in JSON mode
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else if debug_enabled {
        // Debug mode: structured JSON logs to file
        match create_log_file() {
            Some(log_file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(log_file)
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| {
                                tracing_subscriber::EnvFilter::new("info,upkeep=debug")
                            }),
                    )
                    .init();
            }
            None => {
                // Fallback to stderr
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                    )
                    .init();
            }
        }
    } else {
        // Normal mode: minimal logging to stderr
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .init();
    }
}

/// Create a timestamped log file under the logs directory, if possible
fn create_log_file() -> Option<Arc<std::fs::File>> {
    let log_dir = std::path::Path::new(fixed_paths::LOGS_DIR);
    if let Err(e) = std::fs::create_dir_all(log_dir) {
        eprintln!("Warning: Failed to create log directory: {e}");
        return None;
    }

    let log_file = log_dir.join(format!(
        "upkeep-{}.log",
        chrono::Utc::now().format("%Y%m%d-%H%M%S")
    ));

    match std::fs::File::create(&log_file) {
        Ok(file) => {
            eprintln!("Debug logging enabled: {}", log_file.display());
            Some(Arc::new(file))
        }
        Err(e) => {
            eprintln!("Warning: Failed to create log file: {e}");
            None
        }
    }
}
