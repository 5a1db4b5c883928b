use crate::models::{HudKind, LaunchSettings, ModuleStates};
use std::collections::BTreeSet;

/// Single source of truth for the launcher window.
///
/// # Thread Safety
///
/// `AppState` is wrapped in `Arc<RwLock<AppState>>` by [`crate::state::StateManager`].
/// Never access it directly - use [`read()`](crate::state::StateManager::read)
/// and [`update()`](crate::state::StateManager::update) so change events are emitted.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    // Form contents
    pub mc_dir: String,
    pub java_path: String,

    /// Version string reported by the configured Java, once probed
    pub java_version: Option<String>,

    // Modules
    pub module_states: ModuleStates,
    pub running_modules: BTreeSet<HudKind>,

    // Runtime state
    pub is_busy: bool,
    pub status_message: String,
}

impl AppState {
    pub fn settings(&self) -> LaunchSettings {
        LaunchSettings::new(self.mc_dir.clone(), self.java_path.clone())
    }

    pub fn is_running(&self, kind: HudKind) -> bool {
        self.running_modules.contains(&kind)
    }

    pub fn active_modules(&self) -> Vec<String> {
        self.module_states.active_display_names()
    }
}
