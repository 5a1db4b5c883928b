// State management module
//
// This module provides the StateManager which wraps the launcher's AppState with
// thread-safe access using Arc<RwLock<T>> and emits change events for GUI updates.

use crate::models::{AppState, HudKind, LaunchSettings, ModuleStates};
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

/// Change events emitted when launcher state is modified
///
/// These events are emitted to notify interested parties (primarily the GUI)
/// about state changes without requiring them to poll the state.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// Minecraft directory or Java path changed
    SettingsChanged { mc_dir: String, java_path: String },

    /// A module's enabled flag flipped
    ModuleToggled { kind: HudKind, enabled: bool },

    /// The list shown by the active modules overlay changed
    ActiveModulesChanged { names: Vec<String> },

    /// The set of live overlay processes changed
    RunningModulesChanged { running: Vec<HudKind> },

    /// Status line text changed
    StatusChanged { message: String },

    /// A background job (install, launch, Java probe) started or finished
    BusyChanged { busy: bool },

    /// The configured Java reported a version (or stopped reporting one)
    JavaVersionDetected { version: Option<String> },
}

/// Thread-safe state manager with event emission
///
/// This is the central state management component that:
/// - Provides thread-safe access to [`AppState`] via `Arc<RwLock<T>>`
/// - Detects state changes and emits [`StateChange`] events
/// - Supports subscribing to state changes via tokio broadcast channels
///
/// # Usage
///
/// Always use `StateManager` instead of accessing [`AppState`] directly:
/// - [`read()`](Self::read) for reading state without cloning
/// - [`update()`](Self::update) for mutations with automatic event emission
/// - [`subscribe()`](Self::subscribe) for listening to state changes
///
/// # Related Types
///
/// - [`crate::models::AppState`]: The underlying state structure
/// - [`crate::config::ConfigManager`]: Loads settings and module flags into state
/// - [`crate::ui::controller::LauncherController`]: Primary consumer of state events
pub struct StateManager {
    /// The launcher state protected by RwLock for thread-safe access
    state: Arc<RwLock<AppState>>,

    /// Broadcast channel for emitting state change events
    state_tx: broadcast::Sender<StateChange>,
}

impl StateManager {
    /// Create a new StateManager with default state
    ///
    /// # Returns
    /// A new StateManager with a broadcast channel buffer of 100 events
    pub fn new() -> Self {
        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(AppState::default())),
            state_tx,
        }
    }

    /// Get a cloned snapshot of the current state
    pub fn snapshot(&self) -> AppState {
        self.read_lock().clone()
    }

    /// Execute a function with read access to the state
    ///
    /// # Example
    /// ```ignore
    /// let busy = state_manager.read(|state| state.is_busy);
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AppState) -> R,
    {
        let state = self.read_lock();
        f(&state)
    }

    /// Update the state and emit change events
    ///
    /// This is the primary way to modify state. It:
    /// 1. Captures the old state
    /// 2. Applies the update function
    /// 3. Detects what changed
    /// 4. Emits appropriate events
    ///
    /// # Returns
    /// A vector of StateChange events that were emitted
    pub fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut AppState),
    {
        let mut state = self.write_lock();
        let old_state = state.clone();

        update_fn(&mut state);

        let changes = detect_changes(&old_state, &state);
        drop(state);

        for change in &changes {
            // Ignore send errors - it's OK if no one is listening
            let _ = self.state_tx.send(change.clone());
        }

        changes
    }

    /// Subscribe to state change events
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    // Convenience methods for common state updates

    /// Populate the form and switches from what was persisted
    pub fn load(&self, settings: &LaunchSettings, module_states: &ModuleStates) -> Vec<StateChange> {
        self.update(|state| {
            state.mc_dir = settings.mc_dir.clone();
            state.java_path = settings.java_path.clone();
            state.module_states = module_states.clone();
        })
    }

    pub fn set_settings(&self, settings: &LaunchSettings) -> Vec<StateChange> {
        self.update(|state| {
            state.mc_dir = settings.mc_dir.clone();
            state.java_path = settings.java_path.clone();
        })
    }

    pub fn set_mc_dir(&self, mc_dir: String) -> Vec<StateChange> {
        self.update(|state| state.mc_dir = mc_dir)
    }

    /// Setting a new Java path forgets the previously probed version
    pub fn set_java_path(&self, java_path: String) -> Vec<StateChange> {
        self.update(|state| {
            if state.java_path != java_path {
                state.java_version = None;
            }
            state.java_path = java_path;
        })
    }

    pub fn set_java_version(&self, version: Option<String>) -> Vec<StateChange> {
        self.update(|state| state.java_version = version)
    }

    pub fn set_module_states(&self, module_states: ModuleStates) -> Vec<StateChange> {
        self.update(|state| state.module_states = module_states)
    }

    pub fn set_running_modules(&self, running: impl IntoIterator<Item = HudKind>) -> Vec<StateChange> {
        let running: BTreeSet<HudKind> = running.into_iter().collect();
        self.update(|state| state.running_modules = running)
    }

    pub fn set_status(&self, message: impl Into<String>) -> Vec<StateChange> {
        let message = message.into();
        tracing::debug!("Status: {}", message);
        self.update(|state| state.status_message = message)
    }

    pub fn set_busy(&self, busy: bool) -> Vec<StateChange> {
        self.update(|state| state.is_busy = busy)
    }

    // A panic while holding the lock leaves plain data behind; keep using it
    fn read_lock(&self) -> RwLockReadGuard<'_, AppState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, AppState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Detect what changed between two states and generate events
fn detect_changes(old: &AppState, new: &AppState) -> Vec<StateChange> {
    let mut changes = Vec::new();

    if old.mc_dir != new.mc_dir || old.java_path != new.java_path {
        changes.push(StateChange::SettingsChanged {
            mc_dir: new.mc_dir.clone(),
            java_path: new.java_path.clone(),
        });
    }

    for (kind, enabled) in new.module_states.iter() {
        if old.module_states.is_enabled(kind) != enabled {
            changes.push(StateChange::ModuleToggled { kind, enabled });
        }
    }

    let old_names = old.active_modules();
    let new_names = new.active_modules();
    if old_names != new_names {
        changes.push(StateChange::ActiveModulesChanged { names: new_names });
    }

    if old.running_modules != new.running_modules {
        changes.push(StateChange::RunningModulesChanged {
            running: new.running_modules.iter().copied().collect(),
        });
    }

    if old.status_message != new.status_message {
        changes.push(StateChange::StatusChanged {
            message: new.status_message.clone(),
        });
    }

    if old.is_busy != new.is_busy {
        changes.push(StateChange::BusyChanged { busy: new.is_busy });
    }

    if old.java_version != new.java_version {
        changes.push(StateChange::JavaVersionDetected {
            version: new.java_version.clone(),
        });
    }

    changes
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

// Make StateManager cloneable for sharing across threads
impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            state_tx: self.state_tx.clone(),
        }
    }
}
