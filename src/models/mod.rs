//! Data models for the launcher and the overlays.
//!
//! - [`HudKind`]: the overlay module registry (ids, routes, ports, display names)
//! - [`LaunchSettings`] / [`ModuleStates`]: what the launcher persists as JSON
//! - [`AppConfig`]: optional `karlauncher.yaml` tuning (ports, refresh rates, screen size)
//! - [`AppState`]: launcher window state held by [`StateManager`](crate::state::StateManager)
//! - [`status`]: JSON payloads the in-game mod posts to the overlays

pub mod app_state;
pub mod config;
pub mod hud_kind;
pub mod settings;
pub mod status;

pub use app_state::AppState;
pub use config::{AppConfig, ClientConfig, HudConfig, LoggingConfig, OverlayConfig, PerHud};
pub use hud_kind::HudKind;
pub use settings::{LaunchSettings, ModuleStates, default_java_path, default_minecraft_dir};
pub use status::{
    ArmorSlot, ArmorStatus, FpsStatus, KeyEvent, KeyInput, PotionEffect, PotionStatus,
    TargetStatus,
};
