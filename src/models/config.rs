use crate::models::HudKind;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Application configuration from `karlauncher.yaml`
///
/// Every field has a default, so a missing or partial file is fine.
/// Environment variables of the form `KARLAUNCHER__HUD__PORTS__FPS=6002`
/// override file values (see [`crate::config::ConfigManager::load_app_config`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub hud: HudConfig,
    pub overlay: OverlayConfig,
    pub client: ClientConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudConfig {
    /// Status receivers only ever listen on loopback unless told otherwise
    pub bind_address: IpAddr,
    pub ports: PerHud<u16>,
    pub refresh_ms: PerHud<u64>,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            ports: PerHud::from_fn(HudKind::default_port),
            refresh_ms: PerHud::from_fn(|k| k.default_refresh().as_millis() as u64),
        }
    }
}

impl HudConfig {
    pub fn socket_addr(&self, kind: HudKind) -> SocketAddr {
        SocketAddr::new(self.bind_address, *self.ports.get(kind))
    }

    pub fn refresh(&self, kind: HudKind) -> Duration {
        // A zero interval would spin the GUI timer
        Duration::from_millis((*self.refresh_ms.get(kind)).max(10))
    }
}

/// One value per overlay module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerHud<T> {
    pub armor: T,
    pub potion: T,
    pub fps: T,
    pub target: T,
    pub keystrokes: T,
}

impl<T> PerHud<T> {
    pub fn from_fn(f: impl Fn(HudKind) -> T) -> Self {
        Self {
            armor: f(HudKind::Armor),
            potion: f(HudKind::Potion),
            fps: f(HudKind::Fps),
            target: f(HudKind::Target),
            keystrokes: f(HudKind::Keystrokes),
        }
    }

    pub fn get(&self, kind: HudKind) -> &T {
        match kind {
            HudKind::Armor => &self.armor,
            HudKind::Potion => &self.potion,
            HudKind::Fps => &self.fps,
            HudKind::Target => &self.target,
            HudKind::Keystrokes => &self.keystrokes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    pub margin: u32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            screen_width: 1920,
            screen_height: 1080,
            margin: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Client directory shipped next to the executable, also used as the
    /// version name under `<mc_dir>/versions/`
    pub name: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            name: "pycheat".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub debug: bool,
}
