use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::LauncherError;

/// Every launchable overlay module, in launcher display order.
///
/// A module is one HUD window running in its own process with its own
/// loopback status receiver. The launcher refers to modules by [`HudKind::id`];
/// older `modules.json` files used the script file name instead, which
/// [`HudKind::from_key`] still understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HudKind {
    Armor,
    Fps,
    Potion,
    Target,
    Keystrokes,
}

impl HudKind {
    /// All modules in registry order
    pub const ALL: [HudKind; 5] = [
        HudKind::Armor,
        HudKind::Fps,
        HudKind::Potion,
        HudKind::Target,
        HudKind::Keystrokes,
    ];

    /// Stable identifier used on the command line and in `modules.json`
    pub fn id(self) -> &'static str {
        match self {
            HudKind::Armor => "armor",
            HudKind::Fps => "fps",
            HudKind::Potion => "potion",
            HudKind::Target => "target",
            HudKind::Keystrokes => "keystrokes",
        }
    }

    /// File name the module was stored under by older launcher versions
    pub fn legacy_file(self) -> &'static str {
        match self {
            HudKind::Armor => "armorr.py",
            HudKind::Fps => "fps.py",
            HudKind::Potion => "potion.py",
            HudKind::Target => "TargetHUD.py",
            HudKind::Keystrokes => "key.py",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            HudKind::Armor => "Armor Status",
            HudKind::Fps => "FPS Display",
            HudKind::Potion => "Potion Effects",
            HudKind::Target => "Target HUD",
            HudKind::Keystrokes => "Keystrokes",
        }
    }

    /// HTTP route the in-game mod posts status updates to
    pub fn route(self) -> &'static str {
        match self {
            HudKind::Armor => "/update_armor",
            HudKind::Fps => "/update_fps",
            HudKind::Potion => "/update_potions",
            HudKind::Target => "/update_target",
            HudKind::Keystrokes => "/update_keys",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            HudKind::Armor => 5000,
            HudKind::Potion => 5001,
            HudKind::Fps => 5002,
            HudKind::Target => 5003,
            HudKind::Keystrokes => 5004,
        }
    }

    /// How often the overlay redraws from the latest snapshot
    pub fn default_refresh(self) -> Duration {
        match self {
            HudKind::Target => Duration::from_millis(300),
            // Keystroke tiles have to follow key presses closely
            HudKind::Keystrokes => Duration::from_millis(50),
            _ => Duration::from_millis(500),
        }
    }

    /// Resolve a `modules.json` key, accepting both ids and legacy file names.
    pub fn from_key(key: &str) -> Option<HudKind> {
        HudKind::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(key) || kind.legacy_file() == key)
    }
}

impl fmt::Display for HudKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for HudKind {
    type Err = LauncherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HudKind::from_key(s).ok_or_else(|| LauncherError::UnknownModule(s.to_string()))
    }
}
