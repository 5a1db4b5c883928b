use crate::error::LauncherError;
use crate::models::{AppConfig, HudKind, LaunchSettings, ModuleStates};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Environment prefix for `karlauncher.yaml` overrides
pub const ENV_PREFIX: &str = "KARLAUNCHER";

/// Configuration manager for the launcher's data directory.
///
/// Manages the files the launcher and overlays share:
/// - `settings.json`: Minecraft directory and Java path
/// - `modules.json` (legacy `module_states.json`): per-module enabled flags
/// - `karlauncher.yaml`: optional ports, refresh rates and overlay geometry
#[derive(Debug, Clone)]
pub struct ConfigManager {
    data_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
    modules_path: Utf8PathBuf,
    app_config_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager rooted at `data_dir`, creating it if needed.
    pub fn new<P: AsRef<Utf8Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();

        if !data_dir.exists() {
            fs::create_dir_all(&data_dir)
                .with_context(|| format!("Failed to create data directory: {}", data_dir))?;
        }

        Ok(Self {
            settings_path: data_dir.join("settings.json"),
            modules_path: data_dir.join("modules.json"),
            app_config_path: data_dir.join("karlauncher.yaml"),
            data_dir,
        })
    }

    /// ConfigManager for the platform config directory (`<config dir>/karlauncher`).
    pub fn for_platform() -> Result<Self> {
        Self::new(default_data_dir()?)
    }

    /// Load launch settings, falling back to platform defaults.
    ///
    /// A missing file is normal on first start; an unreadable one is logged
    /// and treated the same way so the launcher always opens.
    pub fn load_settings(&self) -> LaunchSettings {
        if !self.settings_path.exists() {
            tracing::info!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            );
            return LaunchSettings::default();
        }

        match self.read_json::<LaunchSettings>(&self.settings_path) {
            Ok(settings) => {
                tracing::info!("Loaded settings from {}", self.settings_path);
                settings
            }
            Err(e) => {
                tracing::warn!("Failed to load settings, using defaults: {:#}", e);
                LaunchSettings::default()
            }
        }
    }

    /// Save launch settings as given.
    pub fn save_settings(&self, settings: &LaunchSettings) -> Result<()> {
        self.write_json(&self.settings_path, settings)?;
        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Validate and persist settings the way the launcher form does.
    ///
    /// Order matters: both fields must be filled in, then the Minecraft
    /// directory is created, then `settings.json` is written. Launch-script
    /// generation is the caller's last step.
    pub fn commit_settings(&self, settings: &LaunchSettings) -> Result<LaunchSettings, LauncherError> {
        let settings = settings.trimmed();
        if !settings.is_complete() {
            return Err(LauncherError::MissingSettings);
        }

        let mc_dir = Utf8PathBuf::from(&settings.mc_dir);
        fs::create_dir_all(&mc_dir).map_err(|source| LauncherError::CreateMinecraftDir {
            path: mc_dir.clone(),
            source,
        })?;

        self.save_settings(&settings)
            .map_err(LauncherError::SaveSettings)?;

        Ok(settings)
    }

    /// Load per-module enabled flags.
    ///
    /// Reads `modules.json`, or `module_states.json` written by older
    /// launchers. Missing or unreadable files mean every module is off.
    pub fn load_module_states(&self) -> ModuleStates {
        let legacy_path = self.data_dir.join("module_states.json");

        let path = if self.modules_path.exists() {
            &self.modules_path
        } else if legacy_path.exists() {
            tracing::info!("Using legacy module state file: {}", legacy_path);
            &legacy_path
        } else {
            return ModuleStates::all_disabled();
        };

        match self.read_json::<ModuleStates>(path) {
            Ok(states) => states,
            Err(e) => {
                tracing::warn!("Failed to load module states, disabling all: {:#}", e);
                ModuleStates::all_disabled()
            }
        }
    }

    pub fn save_module_states(&self, states: &ModuleStates) -> Result<()> {
        self.write_json(&self.modules_path, states)?;
        tracing::debug!("Saved module states to {}", self.modules_path);
        Ok(())
    }

    /// Re-read the stored flags, change one, and write them back.
    pub fn set_module_state(&self, kind: HudKind, enabled: bool) -> Result<ModuleStates> {
        let mut states = self.load_module_states();
        states.set(kind, enabled);
        self.save_module_states(&states)?;
        Ok(states)
    }

    /// Load `karlauncher.yaml` layered over defaults and environment overrides.
    pub fn load_app_config(&self) -> Result<AppConfig> {
        let defaults = ::config::Config::try_from(&AppConfig::default())
            .context("Failed to build default app config")?;

        let config = ::config::Config::builder()
            .add_source(defaults)
            .add_source(
                ::config::File::from(self.app_config_path.as_std_path())
                    .format(::config::FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read app config: {}", self.app_config_path))?;

        let app_config: AppConfig = config
            .try_deserialize()
            .with_context(|| format!("Failed to parse app config: {}", self.app_config_path))?;

        tracing::debug!("Loaded app config: {:?}", app_config);
        Ok(app_config)
    }

    /// Write the default `karlauncher.yaml` if none exists yet.
    pub fn ensure_app_config(&self) -> Result<()> {
        if self.app_config_path.exists() {
            return Ok(());
        }

        let yaml_string = serde_yaml_ng::to_string(&AppConfig::default())
            .context("Failed to serialize app config to YAML")?;

        fs::write(&self.app_config_path, yaml_string)
            .with_context(|| format!("Failed to write app config: {}", self.app_config_path))?;

        tracing::info!("Wrote default app config to {}", self.app_config_path);
        Ok(())
    }

    pub fn data_dir(&self) -> &Utf8Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> Utf8PathBuf {
        self.data_dir.join("logs")
    }

    pub fn app_config_path(&self) -> &Utf8Path {
        &self.app_config_path
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, path: &Utf8Path) -> Result<T> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
        serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path))
    }

    /// Write through a temp file and rename so a crash never leaves half a file
    fn write_json<T: serde::Serialize>(&self, path: &Utf8Path, value: &T) -> Result<()> {
        let json = serde_json::to_string(value).context("Failed to serialize JSON")?;
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json).with_context(|| format!("Failed to write {}", temp_path))?;
        fs::rename(&temp_path, path).with_context(|| format!("Failed to replace {}", path))?;
        Ok(())
    }
}

/// `<platform config dir>/karlauncher`
pub fn default_data_dir() -> Result<Utf8PathBuf> {
    let base = dirs::config_dir().context("No configuration directory on this platform")?;
    let base = Utf8PathBuf::try_from(base)
        .map_err(|e| LauncherError::NonUtf8Path(e.into_path_buf().display().to_string()))?;
    Ok(base.join("karlauncher"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let manager = ConfigManager::new(&config_path).unwrap();
        (manager, temp_dir)
    }

    #[test]
    fn test_create_config_manager() {
        let (manager, _temp_dir) = create_test_config_manager();
        assert!(manager.data_dir().exists());
    }

    #[test]
    fn test_load_save_settings() {
        let (manager, _temp_dir) = create_test_config_manager();

        let settings = LaunchSettings::new("/games/.minecraft", "/opt/java8/bin/java");
        manager.save_settings(&settings).unwrap();

        assert_eq!(manager.load_settings(), settings);
    }

    #[test]
    fn test_corrupt_settings_fall_back_to_defaults() {
        let (manager, _temp_dir) = create_test_config_manager();
        fs::write(manager.data_dir().join("settings.json"), "{ not json").unwrap();

        assert_eq!(manager.load_settings(), LaunchSettings::default());
    }

    #[test]
    fn test_commit_settings_rejects_blank_fields() {
        let (manager, _temp_dir) = create_test_config_manager();
        let err = manager
            .commit_settings(&LaunchSettings::new("   ", "/usr/bin/java"))
            .unwrap_err();
        assert!(matches!(err, LauncherError::MissingSettings));
        assert!(!manager.data_dir().join("settings.json").exists());
    }

    #[test]
    fn test_commit_settings_creates_minecraft_dir() {
        let (manager, temp_dir) = create_test_config_manager();
        let mc_dir = temp_dir.path().join("nested").join(".minecraft");
        let settings = LaunchSettings::new(format!(" {} ", mc_dir.display()), " /usr/bin/java ");

        let saved = manager.commit_settings(&settings).unwrap();

        assert!(mc_dir.is_dir());
        assert_eq!(saved.java_path, "/usr/bin/java");
        assert_eq!(manager.load_settings(), saved);
    }

    #[test]
    fn test_set_module_state() {
        let (manager, _temp_dir) = create_test_config_manager();

        manager.set_module_state(HudKind::Fps, true).unwrap();
        let states = manager.set_module_state(HudKind::Target, true).unwrap();

        assert!(states.is_enabled(HudKind::Fps));
        assert!(states.is_enabled(HudKind::Target));
        assert_eq!(manager.load_module_states(), states);
    }

    #[test]
    fn test_default_app_config_round_trips_through_yaml() {
        let (manager, _temp_dir) = create_test_config_manager();
        manager.ensure_app_config().unwrap();
        assert!(manager.app_config_path().exists());

        let loaded = manager.load_app_config().unwrap();
        assert_eq!(loaded, AppConfig::default());
    }
}
