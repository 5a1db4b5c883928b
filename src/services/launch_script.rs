//! Launch script generation and game start.
//!
//! The launcher never starts Java itself. It renders a shell or batch
//! script into the data directory and runs that, so users can inspect and
//! rerun the exact command line.

use crate::config::ConfigManager;
use crate::error::LauncherError;
use crate::models::LaunchSettings;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};

const SH_TEMPLATE: &str = include_str!("../../resource/start.sh.template");
const BAT_TEMPLATE: &str = include_str!("../../resource/start.bat.template");

/// Placeholders substituted into launch templates
pub const JAVA_PATH_PLACEHOLDER: &str = "#<java_path>#";
pub const MC_DIR_PLACEHOLDER: &str = "#<mc_dir>#";
pub const HOME_DIR_PLACEHOLDER: &str = "#<home_dir>#";
pub const CLIENT_NAME_PLACEHOLDER: &str = "#<client_name>#";

/// Which script flavour to write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    Batch,
    Shell,
}

impl ScriptKind {
    pub fn for_platform() -> Self {
        if cfg!(target_os = "windows") {
            ScriptKind::Batch
        } else {
            ScriptKind::Shell
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            ScriptKind::Batch => "start.bat",
            ScriptKind::Shell => "start.sh",
        }
    }

    /// Name of the user override looked up in the data directory
    pub fn template_name(self) -> &'static str {
        match self {
            ScriptKind::Batch => "start.bat.template",
            ScriptKind::Shell => "start.sh.template",
        }
    }

    pub fn builtin_template(self) -> &'static str {
        match self {
            ScriptKind::Batch => BAT_TEMPLATE,
            ScriptKind::Shell => SH_TEMPLATE,
        }
    }
}

/// Values substituted into a template
#[derive(Debug, Clone)]
pub struct ScriptValues<'a> {
    pub java_path: &'a str,
    pub mc_dir: &'a str,
    pub home_dir: &'a str,
    pub client_name: &'a str,
}

pub fn render_template(template: &str, values: &ScriptValues<'_>) -> String {
    template
        .replace(JAVA_PATH_PLACEHOLDER, values.java_path)
        .replace(MC_DIR_PLACEHOLDER, values.mc_dir)
        .replace(HOME_DIR_PLACEHOLDER, values.home_dir)
        .replace(CLIENT_NAME_PLACEHOLDER, values.client_name)
}

/// Template text for `kind`: the data directory override if present,
/// otherwise the built-in one.
pub fn load_template(data_dir: &Utf8Path, kind: ScriptKind) -> Result<String> {
    let override_path = data_dir.join(kind.template_name());
    if override_path.is_file() {
        tracing::info!("Using launch template override: {}", override_path);
        return fs::read_to_string(&override_path)
            .with_context(|| format!("Failed to read template {}", override_path));
    }
    Ok(kind.builtin_template().to_string())
}

/// Write the launch script for `settings` into `data_dir`.
///
/// # Arguments
///
/// * `data_dir` - Launcher data directory; receives `start.sh` or `start.bat`
/// * `settings` - Validated launch settings
/// * `client_name` - Version directory name of the installed client
///
/// # Returns
///
/// Path of the written script
pub fn generate_launch_script(
    data_dir: &Utf8Path,
    settings: &LaunchSettings,
    client_name: &str,
) -> Result<Utf8PathBuf> {
    write_launch_script(data_dir, settings, client_name, ScriptKind::for_platform())
}

pub fn write_launch_script(
    data_dir: &Utf8Path,
    settings: &LaunchSettings,
    client_name: &str,
    kind: ScriptKind,
) -> Result<Utf8PathBuf> {
    let template = load_template(data_dir, kind)?;
    let home_dir = dirs::home_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    let content = render_template(
        &template,
        &ScriptValues {
            java_path: &settings.java_path,
            mc_dir: &settings.mc_dir,
            home_dir: &home_dir,
            client_name,
        },
    );

    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir))?;

    let script_path = data_dir.join(kind.file_name());
    fs::write(&script_path, content)
        .with_context(|| format!("Failed to write launch script: {}", script_path))?;

    if kind == ScriptKind::Shell {
        make_executable(&script_path)?;
    }

    tracing::info!("Generated launch script: {}", script_path);
    Ok(script_path)
}

#[cfg(unix)]
fn make_executable(path: &Utf8Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("Failed to mark {} executable", path))
}

#[cfg(not(unix))]
fn make_executable(_path: &Utf8Path) -> Result<()> {
    Ok(())
}

/// Everything the Launch button does before the game starts.
///
/// Settings are validated and saved first; the script is only regenerated
/// once that succeeded, so a failed save never leaves a stale script behind.
pub fn prepare_launch(
    config: &ConfigManager,
    settings: &LaunchSettings,
    client_name: &str,
) -> std::result::Result<Utf8PathBuf, LauncherError> {
    let settings = config.commit_settings(settings)?;
    generate_launch_script(config.data_dir(), &settings, client_name)
        .map_err(LauncherError::LaunchScript)
}

/// Program and arguments that run `script` on the current platform.
///
/// Windows goes through `cmd /C`, macOS opens a Terminal window, and
/// everything else executes the script directly.
pub fn launch_command_line(script: &Utf8Path) -> (String, Vec<String>) {
    if cfg!(target_os = "windows") {
        (
            "cmd".to_string(),
            vec!["/C".to_string(), script.to_string()],
        )
    } else if cfg!(target_os = "macos") {
        (
            "open".to_string(),
            vec!["-a".to_string(), "Terminal".to_string(), script.to_string()],
        )
    } else {
        (script.to_string(), Vec::new())
    }
}

/// Start the game through `script` and return without waiting for it.
pub fn launch_game(script: &Utf8Path) -> std::result::Result<(), LauncherError> {
    let (program, args) = launch_command_line(script);
    tracing::info!("Launching Minecraft: {} {}", program, args.join(" "));

    let mut cmd = Command::new(&program);
    cmd.args(&args).stdin(Stdio::null());
    if let Some(parent) = script.parent() {
        cmd.current_dir(parent);
    }

    let child = cmd.spawn().map_err(LauncherError::LaunchFailed)?;
    tracing::info!("Minecraft launch script started (pid {})", child.id());
    reap_in_background(child).map_err(LauncherError::LaunchFailed)?;
    Ok(())
}

/// Wait for `child` on a detached thread so a finished script is reaped
/// instead of lingering as a zombie until the launcher exits.
fn reap_in_background(mut child: Child) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("launch-reaper".to_string())
        .spawn(move || match child.wait() {
            Ok(status) => tracing::info!("Launch script (pid {}) exited: {}", child.id(), status),
            Err(e) => tracing::warn!("Failed to wait for launch script: {}", e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_data_dir() -> (TempDir, Utf8PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        (temp_dir, path)
    }

    #[test]
    fn test_render_replaces_every_placeholder() {
        let rendered = render_template(
            "#<java_path># #<mc_dir># #<home_dir># #<client_name># #<mc_dir>#",
            &ScriptValues {
                java_path: "/usr/bin/java",
                mc_dir: "/mc",
                home_dir: "/home/steve",
                client_name: "pycheat",
            },
        );
        assert_eq!(rendered, "/usr/bin/java /mc /home/steve pycheat /mc");
    }

    #[test]
    fn test_builtin_templates_use_placeholders() {
        for kind in [ScriptKind::Batch, ScriptKind::Shell] {
            let template = kind.builtin_template();
            assert!(template.contains(JAVA_PATH_PLACEHOLDER));
            assert!(template.contains(MC_DIR_PLACEHOLDER));
        }
    }

    #[test]
    fn test_write_shell_script() {
        let (_guard, data_dir) = temp_data_dir();
        let settings = LaunchSettings::new("/games/.minecraft", "/opt/java/bin/java");

        let script =
            write_launch_script(&data_dir, &settings, "pycheat", ScriptKind::Shell).unwrap();

        assert_eq!(script, data_dir.join("start.sh"));
        let content = fs::read_to_string(&script).unwrap();
        assert!(content.contains("/opt/java/bin/java"));
        assert!(content.contains("/games/.minecraft"));
        assert!(!content.contains("#<"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&script).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[test]
    fn test_template_override_in_data_dir() {
        let (_guard, data_dir) = temp_data_dir();
        fs::write(data_dir.join("start.bat.template"), "run #<java_path>#").unwrap();
        let settings = LaunchSettings::new("C:\\mc", "java.exe");

        let script =
            write_launch_script(&data_dir, &settings, "pycheat", ScriptKind::Batch).unwrap();

        assert_eq!(fs::read_to_string(script).unwrap(), "run java.exe");
    }

    #[test]
    fn test_prepare_launch_saves_then_writes_script() {
        let (_guard, data_dir) = temp_data_dir();
        let config = ConfigManager::new(&data_dir).unwrap();
        let mc_dir = data_dir.join("minecraft");
        let settings = LaunchSettings::new(format!("  {}  ", mc_dir), "/usr/bin/java");

        let script = prepare_launch(&config, &settings, "pycheat").unwrap();

        assert!(mc_dir.is_dir());
        assert_eq!(config.load_settings().mc_dir, mc_dir.as_str());
        assert!(script.exists());
    }

    #[test]
    fn test_prepare_launch_rejects_missing_fields() {
        let (_guard, data_dir) = temp_data_dir();
        let config = ConfigManager::new(&data_dir).unwrap();

        let err = prepare_launch(&config, &LaunchSettings::new("", "java"), "pycheat").unwrap_err();

        assert!(matches!(err, LauncherError::MissingSettings));
        assert!(!data_dir.join(ScriptKind::for_platform().file_name()).exists());
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_finished_script_is_reaped() {
        let child = Command::new("true").spawn().unwrap();
        let proc_entry = format!("/proc/{}", child.id());

        reap_in_background(child).unwrap().join().unwrap();

        assert!(!Utf8Path::new(&proc_entry).exists());
    }

    #[test]
    fn test_launch_command_line_includes_script() {
        let script = Utf8PathBuf::from("/data/start.sh");
        let (program, args) = launch_command_line(&script);
        assert!(program == script.as_str() || args.iter().any(|a| a == script.as_str()));
    }
}
