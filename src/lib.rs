// Karlauncher - Minecraft 1.8.8 launcher with always-on-top status overlays
//
// This is the library crate containing the launcher logic, the HUD status
// receivers and the Slint UI controllers. The binary crate (main.rs) picks
// the launcher or one overlay based on the command line.

pub mod cli;
pub mod config;
pub mod error;
pub mod hud;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use error::LauncherError;
pub use models::{AppConfig, HudKind, LaunchSettings, ModuleStates};
pub use state::{StateChange, StateManager};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
