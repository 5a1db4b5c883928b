// UI module - Slint windows and the code that drives them
//
// This module contains:
// - EventLoopBridge: Coordinates between tokio async runtime and Slint event loop
// - LauncherController: Launcher window, module switches and the active modules overlay
// - overlay: One always-on-top HUD window fed by its status receiver

pub mod bridge;
pub mod controller;
pub mod overlay;

// Generated from ui/app.slint by build.rs
slint::include_modules!();

pub use bridge::{EventLoopBridge, EventLoopBridgeHandle};
pub use controller::LauncherController;
pub use overlay::run_overlay;
