// Launcher Controller - Bridges the Slint launcher window with launcher state
//
// This module contains the LauncherController which coordinates between:
// - Slint UI (MainWindow and the ActiveModulesWindow overlay)
// - StateManager (form contents, module flags, status line)
// - ModuleManager (overlay child processes)
// - EventLoopBridge (async/GUI coordination)
//
// It handles:
// - Setting up UI callbacks -> blocking jobs on tokio
// - Subscribing to state changes -> UI updates
// - File browser and message dialogs

use crate::config::ConfigManager;
use crate::error::LauncherError;
use crate::hud::layout::{self, Anchor};
use crate::models::{AppConfig, AppState, HudKind, ModuleStates};
use crate::services::{self, INSTALL_SUCCESS_MESSAGE, ModuleManager};
use crate::state::{StateChange, StateManager};
use crate::ui::bridge::{EventLoopBridge, EventLoopBridgeHandle};
use crate::ui::{ActiveModulesWindow, MainWindow, ModuleRow};
use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use parking_lot::Mutex;
use rfd::{MessageButtons, MessageDialog, MessageLevel};
use slint::{ComponentHandle, LogicalPosition, ModelRc, SharedString, VecModel};
use std::sync::Arc;

/// Size of the active modules overlay in logical pixels
const ACTIVE_MODULES_SIZE: (u32, u32) = (200, 300);

const WINDOWS_JAVA_FILTERS: &[(&str, &[&str])] = &[("Java executable", &["exe"])];

/// Controller for the launcher window.
///
/// Owns the launcher window and the active modules overlay, starts the
/// modules that were left enabled, and stops every module when the launcher
/// closes.
///
/// # Example
/// ```ignore
/// let config = ConfigManager::for_platform()?;
/// let app_config = config.load_app_config()?;
/// let spawner = ProcessSpawner::current(None)?;
/// let modules = ModuleManager::new(config.clone(), Box::new(spawner));
///
/// let controller = LauncherController::new(
///     Arc::new(StateManager::new()),
///     config,
///     app_config,
///     modules,
///     runtime.handle().clone(),
/// )?;
/// controller.run()?; // Blocks until the launcher is closed
/// ```
pub struct LauncherController {
    ui: MainWindow,
    active_window: ActiveModulesWindow,
    _bridge: EventLoopBridge<MainWindow>,
    state_manager: Arc<StateManager>,
    modules: Arc<Mutex<ModuleManager>>,
}

impl LauncherController {
    pub fn new(
        state_manager: Arc<StateManager>,
        config_manager: ConfigManager,
        app_config: AppConfig,
        modules: ModuleManager,
        tokio_handle: tokio::runtime::Handle,
    ) -> Result<Self> {
        let ui = MainWindow::new().context("Failed to create launcher window")?;
        let active_window =
            ActiveModulesWindow::new().context("Failed to create active modules window")?;

        let (x, y) = layout::position(Anchor::TopRight, ACTIVE_MODULES_SIZE, &app_config.overlay);
        active_window
            .window()
            .set_position(LogicalPosition::new(x as f32, y as f32));

        let bridge = EventLoopBridge::new(&ui, tokio_handle);
        let modules = Arc::new(Mutex::new(modules));

        Self::load_initial_state(&state_manager, &config_manager, &modules);
        Self::sync_ui_with_state(&ui, &active_window, &state_manager.snapshot());

        let context = CallbackContext {
            bridge: bridge.clone_handle(),
            state: Arc::clone(&state_manager),
            modules: Arc::clone(&modules),
            config: config_manager,
            client_name: app_config.client.name.clone(),
        };
        Self::setup_callbacks(&ui, &active_window, &context);
        Self::setup_state_subscription(&bridge, &active_window, &state_manager);
        let java_path = state_manager.read(|s| s.java_path.clone());
        context.probe_java(java_path);

        tracing::info!("Launcher controller initialized");

        Ok(Self {
            ui,
            active_window,
            _bridge: bridge,
            state_manager,
            modules,
        })
    }

    /// Show both windows and run the event loop until the launcher closes.
    pub fn run(self) -> Result<()> {
        tracing::info!("Starting launcher event loop");
        self.ui.show().context("Failed to show launcher window")?;
        self.active_window
            .show()
            .context("Failed to show active modules window")?;

        let result = slint::run_event_loop().context("Launcher event loop failed");

        // Closing through the window already did this; a failed event loop did not
        let stopped = self.modules.lock().stop_all_modules();
        if stopped > 0 {
            tracing::info!("Stopped {} module(s) on exit", stopped);
        }
        self.state_manager.set_running_modules(Vec::new());

        result
    }

    /// Read persisted settings, start enabled modules and fill in Java.
    fn load_initial_state(
        state_manager: &StateManager,
        config_manager: &ConfigManager,
        modules: &Mutex<ModuleManager>,
    ) {
        let mut settings = config_manager.load_settings();
        if settings.java_path.trim().is_empty() {
            match services::detect_java() {
                Some(java) => {
                    tracing::info!("Detected Java at {}", java);
                    settings.java_path = java.to_string();
                }
                None => tracing::warn!("No Java installation found"),
            }
        }

        let (module_states, running) = {
            let mut modules = modules.lock();
            let states = modules.start_enabled();
            (states, modules.running_modules())
        };

        state_manager.load(&settings, &module_states);
        state_manager.set_running_modules(running);
        state_manager.set_status("Ready");
    }

    fn sync_ui_with_state(ui: &MainWindow, active_window: &ActiveModulesWindow, state: &AppState) {
        ui.set_mc_dir(state.mc_dir.clone().into());
        ui.set_java_path(state.java_path.clone().into());
        ui.set_status_message(state.status_message.clone().into());
        ui.set_busy(state.is_busy);
        apply_module_rows(ui, state);
        active_window.set_names(names_model(state.active_modules()));

        tracing::debug!("UI synchronized with initial state");
    }

    fn setup_callbacks(ui: &MainWindow, active_window: &ActiveModulesWindow, ctx: &CallbackContext) {
        let context = ctx.clone();
        let ui_weak = ui.as_weak();
        ui.on_browse_java(move || {
            tracing::debug!("Browse Java clicked");
            let filters = if cfg!(target_os = "windows") {
                WINDOWS_JAVA_FILTERS
            } else {
                &[]
            };
            if let Some(path) = show_file_picker("Select Java Executable", filters) {
                tracing::info!("Java path selected: {}", path);
                if let Some(ui) = ui_weak.upgrade() {
                    ui.set_java_path(path.as_str().into());
                    context.capture_form(&ui);
                }
                context.probe_java(path.to_string());
            }
        });

        let ui_weak = ui.as_weak();
        ui.on_browse_mc_dir(move || {
            tracing::debug!("Browse .minecraft clicked");
            if let Some(path) = show_folder_picker("Select .minecraft Directory") {
                tracing::info!("Minecraft directory selected: {}", path);
                if let Some(ui) = ui_weak.upgrade() {
                    ui.set_mc_dir(path.as_str().into());
                }
            }
        });

        let context = ctx.clone();
        let ui_weak = ui.as_weak();
        ui.on_install_client(move || {
            let Some(ui) = ui_weak.upgrade() else { return };
            context.capture_form(&ui);
            context.install_client();
        });

        let context = ctx.clone();
        let ui_weak = ui.as_weak();
        ui.on_launch_game(move || {
            let Some(ui) = ui_weak.upgrade() else { return };
            context.capture_form(&ui);
            context.launch_game();
        });

        let context = ctx.clone();
        ui.on_module_toggled(move |id, enabled| {
            let Some(kind) = HudKind::from_key(id.as_str()) else {
                tracing::error!("{}", LauncherError::UnknownModule(id.to_string()));
                return;
            };
            tracing::info!("Module {} switched {}", kind, if enabled { "on" } else { "off" });
            let result = context.modules.lock().toggle(kind, enabled);
            context.after_toggle(result);
        });

        let context = ctx.clone();
        ui.on_all_modules_toggled(move |enabled| {
            tracing::info!("All modules switched {}", if enabled { "on" } else { "off" });
            let result = context.modules.lock().toggle_all(enabled);
            context.after_toggle(result);
        });

        let modules = Arc::clone(&ctx.modules);
        let active_weak = active_window.as_weak();
        ui.window().on_close_requested(move || {
            tracing::info!("Launcher closing, stopping modules");
            let stopped = modules.lock().stop_all_modules();
            tracing::info!("Stopped {} module(s)", stopped);

            if let Some(active) = active_weak.upgrade() {
                let _ = active.hide();
            }
            let _ = slint::quit_event_loop();
            slint::CloseRequestResponse::HideWindow
        });
    }

    /// Subscribe to state changes and push them into the windows
    fn setup_state_subscription(
        bridge: &EventLoopBridge<MainWindow>,
        active_window: &ActiveModulesWindow,
        state_manager: &Arc<StateManager>,
    ) {
        let bridge_handle = bridge.clone_handle();
        let active_weak = active_window.as_weak();
        let state_manager = Arc::clone(state_manager);
        let mut rx = state_manager.subscribe();

        std::thread::spawn(move || {
            tracing::debug!("State subscription thread started");

            loop {
                match rx.blocking_recv() {
                    Ok(change) => {
                        tracing::trace!("State change received: {:?}", change);

                        match change {
                            StateChange::SettingsChanged { mc_dir, java_path } => {
                                bridge_handle.update_ui(move |ui| {
                                    // Leave the fields alone while they already match
                                    if ui.get_mc_dir() != mc_dir.as_str() {
                                        ui.set_mc_dir(mc_dir.into());
                                    }
                                    if ui.get_java_path() != java_path.as_str() {
                                        ui.set_java_path(java_path.into());
                                    }
                                });
                            }

                            StateChange::ModuleToggled { kind, enabled } => {
                                tracing::debug!("Module {} enabled={}", kind, enabled);
                                let snapshot = state_manager.snapshot();
                                bridge_handle.update_ui(move |ui| apply_module_rows(ui, &snapshot));
                            }

                            StateChange::ActiveModulesChanged { names } => {
                                tracing::debug!("Active modules: {:?}", names);
                                let result = active_weak.upgrade_in_event_loop(move |active| {
                                    active.set_names(names_model(names));
                                });
                                if let Err(e) = result {
                                    tracing::warn!("Failed to update active modules window: {:?}", e);
                                }
                            }

                            StateChange::RunningModulesChanged { running } => {
                                tracing::debug!("Running modules: {:?}", running);
                            }

                            StateChange::StatusChanged { message } => {
                                bridge_handle.update_ui(move |ui| {
                                    ui.set_status_message(message.into());
                                });
                            }

                            StateChange::BusyChanged { busy } => {
                                bridge_handle.update_ui(move |ui| ui.set_busy(busy));
                            }

                            StateChange::JavaVersionDetected { version } => {
                                tracing::debug!("Java version: {:?}", version);
                            }
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        tracing::info!(
                            "State broadcast channel closed - shutting down subscription thread"
                        );
                        break;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("State subscription lagged - {} events were skipped", skipped);
                        // Module rows are rebuilt from a snapshot, so the next event catches up
                    }
                }
            }

            tracing::debug!("State subscription thread terminated gracefully");
        });
    }
}

/// What the launcher callbacks share
#[derive(Clone)]
struct CallbackContext {
    bridge: EventLoopBridgeHandle<MainWindow>,
    state: Arc<StateManager>,
    modules: Arc<Mutex<ModuleManager>>,
    config: ConfigManager,
    client_name: String,
}

impl CallbackContext {
    /// Copy the text fields into state; the form is only read on demand
    fn capture_form(&self, ui: &MainWindow) {
        self.state.update(|s| {
            s.mc_dir = ui.get_mc_dir().to_string();
            s.java_path = ui.get_java_path().to_string();
        });
    }

    /// Claim the busy flag, or report that a job is already running
    fn begin_job(&self, status: &str) -> bool {
        let mut claimed = false;
        self.state.update(|s| {
            if !s.is_busy {
                s.is_busy = true;
                s.status_message = status.to_string();
                claimed = true;
            }
        });
        if !claimed {
            tracing::debug!("Ignoring request while another job is running");
        }
        claimed
    }

    fn install_client(&self) {
        if !self.begin_job("Installing client...") {
            return;
        }

        let context = self.clone();
        self.bridge.spawn_blocking(move || {
            let mc_dir = context.state.read(|s| s.mc_dir.clone());
            let result = services::client_source_dir(&context.client_name)
                .map_err(LauncherError::InstallFailed)
                .and_then(|source| services::install_client(&source, &mc_dir, &context.client_name));

            match result {
                Ok(copied) => {
                    tracing::info!("Client installed ({} files)", copied);
                    context.finish_job(INSTALL_SUCCESS_MESSAGE);
                    context.bridge.update_ui(|_| {
                        show_message(MessageLevel::Info, "Success", INSTALL_SUCCESS_MESSAGE);
                    });
                }
                Err(e) => context.fail_job(e),
            }
        });
    }

    fn launch_game(&self) {
        if !self.begin_job("Launching Minecraft...") {
            return;
        }

        let context = self.clone();
        self.bridge.spawn_blocking(move || {
            let settings = context.state.read(|s| s.settings());
            let result = services::prepare_launch(&context.config, &settings, &context.client_name)
                .and_then(|script| services::launch_game(&script));

            match result {
                Ok(()) => {
                    context.state.set_settings(&settings.trimmed());
                    context.finish_job("Minecraft launched");
                }
                Err(e) => context.fail_job(e),
            }
        });
    }

    /// Probe `java_path` in the background and report its version.
    ///
    /// Runs at startup and again whenever a new Java is picked.
    fn probe_java(&self, java_path: String) {
        let java_path = java_path.trim().to_string();
        if java_path.is_empty() {
            return;
        }

        let state = Arc::clone(&self.state);
        self.bridge.spawn_async(move || async move {
            refresh_java_version(&state, &java_path).await;
        });
    }

    fn finish_job(&self, status: &str) {
        self.state.update(|s| {
            s.is_busy = false;
            s.status_message = status.to_string();
        });
    }

    fn fail_job(&self, err: LauncherError) {
        if err.is_warning() {
            tracing::warn!("{}", err);
        } else {
            tracing::error!("{}", err);
        }
        self.finish_job(&err.to_string());
        self.bridge.update_ui(move |_| show_error(&err));
    }

    /// Push module switch results into state; failures land in the status line
    fn after_toggle(&self, result: Result<ModuleStates>) {
        let running = self.modules.lock().running_modules();
        match result {
            Ok(states) => {
                self.state.set_module_states(states);
            }
            Err(e) => {
                tracing::error!("Module toggle failed: {:#}", e);
                // The flag was saved even though the process did not start
                self.state.set_module_states(self.config.load_module_states());
                self.state.set_status(format!("{:#}", e));
            }
        }
        self.state.set_running_modules(running);
    }
}

/// Probe `java_path` and put the outcome into state and the status line
async fn refresh_java_version(state: &StateManager, java_path: &str) {
    match services::probe_java_version(java_path).await {
        Ok(Some(version)) => {
            state.set_java_version(Some(version.clone()));
            state.set_status(format!("Ready - Java {}", version));
        }
        Ok(None) => {
            state.set_java_version(None);
            state.set_status(format!("Could not determine the version of {}", java_path));
        }
        Err(e) => {
            tracing::warn!("Java probe failed: {:#}", e);
            state.set_java_version(None);
            state.set_status(format!("Java not found at {}", java_path));
        }
    }
}

fn apply_module_rows(ui: &MainWindow, state: &AppState) {
    let rows: Vec<ModuleRow> = HudKind::ALL
        .iter()
        .map(|kind| ModuleRow {
            id: kind.id().into(),
            name: kind.display_name().into(),
            enabled: state.module_states.is_enabled(*kind),
        })
        .collect();

    ui.set_modules(ModelRc::new(VecModel::from(rows)));
    ui.set_all_enabled(state.module_states.all_enabled());
}

fn names_model(names: Vec<String>) -> ModelRc<SharedString> {
    let names: Vec<SharedString> = names.into_iter().map(SharedString::from).collect();
    ModelRc::new(VecModel::from(names))
}

fn show_message(level: MessageLevel, title: &str, message: &str) {
    let _ = MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}

fn show_error(err: &LauncherError) {
    let level = if err.is_warning() {
        MessageLevel::Warning
    } else {
        MessageLevel::Error
    };
    show_message(level, err.dialog_title(), &err.to_string());
}

/// Show a native file dialog, returning `None` on cancel or a non-UTF-8 path
fn show_file_picker(title: &str, filters: &[(&str, &[&str])]) -> Option<Utf8PathBuf> {
    let mut dialog = rfd::FileDialog::new().set_title(title);
    for (name, extensions) in filters {
        dialog = dialog.add_filter(*name, *extensions);
    }

    dialog.pick_file().and_then(into_utf8)
}

fn show_folder_picker(title: &str) -> Option<Utf8PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .pick_folder()
        .and_then(into_utf8)
}

fn into_utf8(path: std::path::PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::try_from(path)
        .map_err(|e| {
            tracing::error!("{}", LauncherError::NonUtf8Path(e.as_path().display().to_string()));
            e
        })
        .ok()
}
