//! Error types shared by the launcher and the overlays.
//!
//! Library code returns [`LauncherError`] where the caller has to branch on
//! the failure (the launcher maps several variants to distinct dialogs);
//! application glue uses `anyhow` with context instead.

use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LauncherError {
    #[error("Please specify both Minecraft directory and Java path")]
    MissingSettings,

    #[error("Please specify Minecraft directory first")]
    MissingMinecraftDir,

    #[error("Could not create Minecraft directory {path}: {source}")]
    CreateMinecraftDir {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not save settings: {0}")]
    SaveSettings(#[source] anyhow::Error),

    #[error("Could not generate launch script: {0}")]
    LaunchScript(#[source] anyhow::Error),

    #[error("Client files not found in {0}")]
    ClientFilesMissing(Utf8PathBuf),

    #[error("Installation failed: {0}")]
    InstallFailed(#[source] anyhow::Error),

    #[error("Failed to launch Minecraft: {0}")]
    LaunchFailed(#[source] std::io::Error),

    #[error("Unknown module: {0}")]
    UnknownModule(String),

    #[error("Error starting module {module}: {source}")]
    ModuleStart {
        module: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error stopping module {module}: {source}")]
    ModuleStop {
        module: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Path(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LauncherError {
    /// Dialog title the launcher shows for this error.
    ///
    /// Input problems are warnings the user can fix in the form; everything
    /// else is reported as an error.
    pub fn dialog_title(&self) -> &'static str {
        match self {
            LauncherError::MissingSettings | LauncherError::MissingMinecraftDir => "Warning",
            _ => "Error",
        }
    }

    pub fn is_warning(&self) -> bool {
        self.dialog_title() == "Warning"
    }
}

pub type Result<T> = std::result::Result<T, LauncherError>;
