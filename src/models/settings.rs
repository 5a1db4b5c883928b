use crate::models::HudKind;
use camino::Utf8PathBuf;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Launch settings stored in `settings.json`.
///
/// Field names are the on-disk keys the launcher has always used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchSettings {
    pub mc_dir: String,
    pub java_path: String,
}

impl LaunchSettings {
    pub fn new(mc_dir: impl Into<String>, java_path: impl Into<String>) -> Self {
        Self {
            mc_dir: mc_dir.into(),
            java_path: java_path.into(),
        }
    }

    /// Both fields trimmed, the way they are validated and saved
    pub fn trimmed(&self) -> Self {
        Self::new(self.mc_dir.trim(), self.java_path.trim())
    }

    pub fn is_complete(&self) -> bool {
        !self.mc_dir.trim().is_empty() && !self.java_path.trim().is_empty()
    }
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            mc_dir: default_minecraft_dir().to_string(),
            java_path: default_java_path().to_string(),
        }
    }
}

/// Platform `.minecraft` directory used when nothing has been saved yet.
pub fn default_minecraft_dir() -> Utf8PathBuf {
    let home = dirs::home_dir()
        .and_then(|p| Utf8PathBuf::try_from(p).ok())
        .unwrap_or_else(|| Utf8PathBuf::from("."));

    if cfg!(target_os = "windows") {
        std::env::var("APPDATA")
            .map(Utf8PathBuf::from)
            .unwrap_or(home)
            .join(".minecraft")
    } else if cfg!(target_os = "macos") {
        home.join("Library/Application Support/minecraft")
    } else {
        home.join(".minecraft")
    }
}

pub fn default_java_path() -> &'static str {
    if cfg!(target_os = "windows") {
        "java.exe"
    } else {
        "/usr/bin/java"
    }
}

/// Per-module enabled flags stored in `modules.json`.
///
/// Launcher versions disagreed on the file format: some wrote native JSON
/// booleans, some wrote `"true"`/`"false"` strings, and keys were either the
/// module script name or the module id. Reading accepts all of them; writing
/// always produces `{"<id>": <bool>}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleStates {
    states: IndexMap<HudKind, bool>,
}

impl ModuleStates {
    /// Every registered module, disabled
    pub fn all_disabled() -> Self {
        Self {
            states: HudKind::ALL.into_iter().map(|k| (k, false)).collect(),
        }
    }

    pub fn is_enabled(&self, kind: HudKind) -> bool {
        self.states.get(&kind).copied().unwrap_or(false)
    }

    pub fn set(&mut self, kind: HudKind, enabled: bool) {
        self.states.insert(kind, enabled);
    }

    /// True only when every registered module is on.
    pub fn all_enabled(&self) -> bool {
        HudKind::ALL.into_iter().all(|k| self.is_enabled(k))
    }

    pub fn enabled(&self) -> impl Iterator<Item = HudKind> + '_ {
        self.states
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(kind, _)| *kind)
    }

    /// Display names of enabled modules, sorted alphabetically
    pub fn active_display_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .enabled()
            .map(|k| k.display_name().to_string())
            .collect();
        names.sort();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (HudKind, bool)> + '_ {
        self.states.iter().map(|(k, v)| (*k, *v))
    }
}

impl Default for ModuleStates {
    fn default() -> Self {
        Self::all_disabled()
    }
}

/// A flag written either as a JSON boolean or as a string
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientFlag {
    Bool(bool),
    Text(String),
    Other(serde_json::Value),
}

impl LenientFlag {
    fn into_bool(self) -> bool {
        match self {
            LenientFlag::Bool(b) => b,
            LenientFlag::Text(s) => s.trim().eq_ignore_ascii_case("true"),
            LenientFlag::Other(_) => false,
        }
    }
}

impl Serialize for ModuleStates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let map: IndexMap<&str, bool> = self.states.iter().map(|(k, v)| (k.id(), *v)).collect();
        map.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ModuleStates {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, LenientFlag>::deserialize(deserializer)?;
        let mut states = ModuleStates::all_disabled();

        for (key, flag) in raw {
            match HudKind::from_key(&key) {
                Some(kind) => states.set(kind, flag.into_bool()),
                None => tracing::warn!("Ignoring unknown module in module states: {}", key),
            }
        }

        Ok(states)
    }
}
