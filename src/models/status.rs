//! Status payloads pushed by the in-game mod.
//!
//! Each overlay keeps exactly one of these as its latest snapshot. Every
//! field defaults, so a body that omits fields still replaces the snapshot
//! and the overlay falls back to its default display values.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetStatus {
    pub name: String,
    pub health: f64,
    pub max_health: f64,
    pub distance: f64,
}

impl Default for TargetStatus {
    fn default() -> Self {
        Self {
            name: "No Target".to_string(),
            health: 0.0,
            max_health: 0.0,
            distance: 0.0,
        }
    }
}

impl TargetStatus {
    /// Health as a fraction of max health, `None` when max health is unknown
    pub fn health_ratio(&self) -> Option<f64> {
        if self.max_health > 0.0 && self.health.is_finite() {
            Some(self.health / self.max_health)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmorSlot {
    #[serde(default)]
    pub item: String,
    #[serde(default)]
    pub durability: u32,
}

impl ArmorSlot {
    pub fn is_empty(&self) -> bool {
        let item = self.item.trim();
        item.is_empty() || item.eq_ignore_ascii_case("empty")
    }
}

/// Armor slots in inventory order: boots, leggings, chestplate, helmet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmorStatus {
    pub slots: Vec<Option<ArmorSlot>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FpsStatus {
    pub fps: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PotionEffect {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub duration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PotionStatus {
    pub effects: Vec<PotionEffect>,
}

/// Inputs shown on the keystrokes overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyInput {
    W,
    A,
    S,
    D,
    Space,
    Shift,
    /// Right shift only feeds the close gesture, it has no tile
    Rshift,
    Lmb,
    Rmb,
}

/// One press or release reported by the mod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub input: KeyInput,
    #[serde(default = "default_pressed")]
    pub pressed: bool,
}

fn default_pressed() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_missing_fields_use_defaults() {
        let status: TargetStatus = serde_json::from_str(r#"{"health": 12.5}"#).unwrap();
        assert_eq!(status.name, "No Target");
        assert_eq!(status.health, 12.5);
        assert_eq!(status.health_ratio(), None);
    }

    #[test]
    fn test_health_ratio() {
        let status = TargetStatus {
            name: "Zombie".into(),
            health: 10.0,
            max_health: 20.0,
            distance: 2.0,
        };
        assert_eq!(status.health_ratio(), Some(0.5));
    }

    #[test]
    fn test_armor_slots_accept_nulls() {
        let status: ArmorStatus = serde_json::from_str(
            r#"{"slots": [{"item": "diamond_boots", "durability": 90}, null, {"item": "Empty"}]}"#,
        )
        .unwrap();
        assert_eq!(status.slots.len(), 3);
        assert!(status.slots[1].is_none());
        assert!(status.slots[2].as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_key_event_defaults_to_pressed() {
        let event: KeyEvent = serde_json::from_str(r#"{"input": "lmb"}"#).unwrap();
        assert_eq!(event.input, KeyInput::Lmb);
        assert!(event.pressed);
    }
}
