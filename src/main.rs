//! Karlauncher - Minecraft 1.8.8 launcher with always-on-top status overlays
//!
//! Main entry point for both process roles.
//!
//! # Overview
//!
//! - `karlauncher [launcher]` opens the launcher window. It owns a tokio
//!   runtime for installs, Java probing and launch-script work, and starts
//!   every enabled overlay as a child process.
//! - `karlauncher hud <module>` runs one overlay: a status receiver on a
//!   background thread and a Slint window on the main thread.
//!
//! # Execution Flow
//!
//! 1. Parse the command line and open the data directory
//! 2. Load `karlauncher.yaml` (defaults when absent)
//! 3. Initialize logging -> `<data dir>/logs/<prefix>.<date>`
//! 4. Run the launcher or the overlay (blocks until its window closes)
//! 5. Launcher only: stop every overlay and shut the runtime down

use anyhow::{Context, Result};
use clap::Parser;
use karlauncher::cli::Cli;
use karlauncher::logging;
use karlauncher::models::AppConfig;
use karlauncher::services::{ModuleManager, ProcessSpawner};
use karlauncher::ui::{LauncherController, run_overlay};
use karlauncher::{APP_NAME, ConfigManager, HudKind, StateManager, VERSION};
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = match &cli.data_dir {
        Some(dir) => ConfigManager::new(dir)?,
        None => ConfigManager::for_platform()?,
    };

    // Logging is not up yet, so a broken config file is reported on stderr
    let app_config = config_manager.load_app_config().unwrap_or_else(|e| {
        eprintln!("Ignoring unreadable {}: {:#}", config_manager.app_config_path(), e);
        AppConfig::default()
    });

    let hud = cli.hud();
    let _guard = logging::setup_logging(
        &config_manager.log_dir(),
        &logging::log_prefix(hud),
        cli.debug || app_config.logging.debug,
        true,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    tracing::info!("Data directory: {}", config_manager.data_dir());

    match hud {
        Some(kind) => run_hud(kind, &app_config),
        None => run_launcher(&cli, config_manager, app_config),
    }
}

fn run_hud(kind: HudKind, app_config: &AppConfig) -> Result<()> {
    let result = run_overlay(kind, app_config);
    if let Err(e) = &result {
        tracing::error!("{} overlay failed: {:#}", kind.display_name(), e);
    }
    result
}

fn run_launcher(cli: &Cli, config_manager: ConfigManager, app_config: AppConfig) -> Result<()> {
    if let Err(e) = config_manager.ensure_app_config() {
        tracing::warn!("Could not write default config: {:#}", e);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("karlauncher-worker")
        .build()
        .context("Failed to build tokio runtime")?;

    let spawner = ProcessSpawner::current(cli.data_dir.clone())
        .context("Failed to locate the launcher executable")?;
    let modules = ModuleManager::new(config_manager.clone(), Box::new(spawner));
    let state_manager = Arc::new(StateManager::new());

    let controller = LauncherController::new(
        Arc::clone(&state_manager),
        config_manager,
        app_config,
        modules,
        runtime.handle().clone(),
    )?;

    tracing::info!("Launcher initialized, opening window");
    let result = controller.run();

    tracing::info!("Launcher closed, shutting down");
    runtime.shutdown_timeout(Duration::from_secs(5));
    tracing::info!("Application shutdown complete");

    result.inspect_err(|e| tracing::error!("Launcher error: {:#}", e))
}
