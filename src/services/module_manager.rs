//! Overlay process lifecycle.
//!
//! Every HUD module runs as `karlauncher hud <kind>` in its own process.
//! [`ModuleManager`] owns the running children and keeps `modules.json` in
//! step with the switches in the launcher window.

use crate::config::ConfigManager;
use crate::error::LauncherError;
use crate::models::{HudKind, ModuleStates};
use anyhow::Result;
use camino::Utf8PathBuf;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

/// A running overlay process.
#[cfg_attr(test, mockall::automock)]
pub trait ModuleProcess: Send {
    fn id(&self) -> u32;

    /// True once the process has exited on its own
    fn has_exited(&mut self) -> bool;

    /// Kill the process and wait for it to be reaped
    fn terminate(&mut self) -> io::Result<()>;
}

/// Starts overlay processes. The seam the tests replace.
#[cfg_attr(test, mockall::automock)]
pub trait ModuleSpawner: Send + Sync {
    fn spawn(&self, kind: HudKind) -> io::Result<Box<dyn ModuleProcess>>;
}

impl ModuleProcess for Child {
    fn id(&self) -> u32 {
        Child::id(self)
    }

    fn has_exited(&mut self) -> bool {
        !matches!(self.try_wait(), Ok(None))
    }

    fn terminate(&mut self) -> io::Result<()> {
        match self.kill() {
            Ok(()) => {}
            // Already exited and reaped
            Err(e) if e.kind() == io::ErrorKind::InvalidInput => {}
            Err(e) => return Err(e),
        }
        self.wait().map(|_| ())
    }
}

/// Spawns overlays by re-running the current executable in HUD mode.
#[derive(Debug, Clone)]
pub struct ProcessSpawner {
    exe: PathBuf,
    data_dir: Option<Utf8PathBuf>,
}

impl ProcessSpawner {
    pub fn new(exe: PathBuf, data_dir: Option<Utf8PathBuf>) -> Self {
        Self { exe, data_dir }
    }

    /// Spawner for the running binary; `data_dir` is forwarded to children
    /// so they read the same config files as the launcher.
    pub fn current(data_dir: Option<Utf8PathBuf>) -> io::Result<Self> {
        Ok(Self::new(std::env::current_exe()?, data_dir))
    }

    fn command(&self, kind: HudKind) -> Command {
        let mut cmd = Command::new(&self.exe);
        if let Some(data_dir) = &self.data_dir {
            cmd.arg("--data-dir").arg(data_dir.as_str());
        }
        cmd.args(["hud", kind.id()]).stdin(Stdio::null());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            cmd.creation_flags(CREATE_NO_WINDOW);
        }

        cmd
    }
}

impl ModuleSpawner for ProcessSpawner {
    fn spawn(&self, kind: HudKind) -> io::Result<Box<dyn ModuleProcess>> {
        let child = self.command(kind).spawn()?;
        Ok(Box::new(child))
    }
}

/// Starts, stops and remembers overlay modules.
pub struct ModuleManager {
    spawner: Box<dyn ModuleSpawner>,
    config: ConfigManager,
    running: BTreeMap<HudKind, Box<dyn ModuleProcess>>,
}

impl ModuleManager {
    pub fn new(config: ConfigManager, spawner: Box<dyn ModuleSpawner>) -> Self {
        Self {
            spawner,
            config,
            running: BTreeMap::new(),
        }
    }

    /// Start `kind` unless it is already running.
    ///
    /// # Returns
    ///
    /// `true` when a new process was spawned
    pub fn start_module(&mut self, kind: HudKind) -> Result<bool, LauncherError> {
        self.prune_exited();

        if self.running.contains_key(&kind) {
            tracing::debug!("Module {} already running", kind);
            return Ok(false);
        }

        let process = self
            .spawner
            .spawn(kind)
            .map_err(|source| LauncherError::ModuleStart {
                module: kind.to_string(),
                source,
            })?;

        tracing::info!("Started module {} (pid {})", kind, process.id());
        self.running.insert(kind, process);
        Ok(true)
    }

    /// Stop `kind` if it is running.
    ///
    /// # Returns
    ///
    /// `true` when a running process was stopped. A process that could not
    /// be terminated stays tracked so a later stop can retry it.
    pub fn stop_module(&mut self, kind: HudKind) -> Result<bool, LauncherError> {
        let Some(process) = self.running.get_mut(&kind) else {
            return Ok(false);
        };

        let pid = process.id();
        process
            .terminate()
            .map_err(|source| LauncherError::ModuleStop {
                module: kind.to_string(),
                source,
            })?;

        self.running.remove(&kind);
        tracing::info!("Stopped module {} (pid {})", kind, pid);
        Ok(true)
    }

    /// Stop every running module, continuing past failures.
    ///
    /// # Returns
    ///
    /// Number of modules stopped
    pub fn stop_all_modules(&mut self) -> usize {
        let kinds: Vec<HudKind> = self.running.keys().copied().collect();
        let mut stopped = 0;

        for kind in kinds {
            match self.stop_module(kind) {
                Ok(true) => stopped += 1,
                Ok(false) => {}
                Err(e) => tracing::error!("{}", e),
            }
        }

        stopped
    }

    /// Apply a module switch: start or stop the process, then persist the flag.
    ///
    /// The flag is saved even when the process could not be started, so the
    /// launcher remembers what the user asked for.
    pub fn toggle(&mut self, kind: HudKind, enabled: bool) -> Result<ModuleStates> {
        let outcome = if enabled {
            self.start_module(kind).map(|_| ())
        } else {
            self.stop_module(kind).map(|_| ())
        };

        let states = self.config.set_module_state(kind, enabled)?;
        outcome?;
        Ok(states)
    }

    /// Apply the master switch to every registered module.
    ///
    /// Every module is attempted; the first failure is returned afterwards.
    pub fn toggle_all(&mut self, enabled: bool) -> Result<ModuleStates> {
        let mut first_error = None;

        for kind in HudKind::ALL {
            if let Err(e) = self.toggle(kind, enabled) {
                tracing::error!("Failed to toggle module {}: {:#}", kind, e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(self.config.load_module_states()),
        }
    }

    /// Start every module whose persisted flag is on.
    ///
    /// Called once when the launcher opens; failures are logged, not fatal.
    pub fn start_enabled(&mut self) -> ModuleStates {
        let states = self.config.load_module_states();

        for kind in states.enabled() {
            if let Err(e) = self.start_module(kind) {
                tracing::error!("{}", e);
            }
        }

        states
    }

    pub fn is_running(&mut self, kind: HudKind) -> bool {
        self.prune_exited();
        self.running.contains_key(&kind)
    }

    pub fn running_modules(&mut self) -> Vec<HudKind> {
        self.prune_exited();
        self.running.keys().copied().collect()
    }

    /// Display names of enabled modules, sorted by name
    pub fn active_modules(&self) -> Vec<String> {
        self.config.load_module_states().active_display_names()
    }

    /// Forget children that exited by themselves (e.g. the keystrokes
    /// overlay closed with its key gesture) so they can be started again.
    fn prune_exited(&mut self) {
        self.running.retain(|kind, process| {
            let exited = process.has_exited();
            if exited {
                tracing::info!("Module {} exited on its own", kind);
            }
            !exited
        });
    }
}
