//! Display values derived from status snapshots.
//!
//! These are pure functions so the overlay windows only copy strings and
//! colours into Slint properties.

use crate::hud::color::{self, Rgb};
use crate::models::{ArmorSlot, ArmorStatus, FpsStatus, PotionStatus, TargetStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct TargetView {
    pub name: String,
    pub health_text: String,
    pub health_color: Rgb,
    pub distance_text: String,
}

impl TargetView {
    pub fn from_status(status: &TargetStatus) -> Self {
        let health_color = status
            .health_ratio()
            .map(color::health_color)
            .unwrap_or(color::WHITE);

        Self {
            name: status.name.clone(),
            health_text: format!("HP: {:.1}/{:.1}", status.health, status.max_health),
            health_color,
            distance_text: format!("Distance: {:.1}", status.distance),
        }
    }
}

/// Row labels top to bottom
pub const ARMOR_LABELS: [&str; 4] = ["Helmet", "Chestplate", "Leggings", "Boots"];

pub const EMPTY_ARMOR_TEXT: &str = "None, 0%";

#[derive(Debug, Clone, PartialEq)]
pub struct ArmorRowView {
    pub label: &'static str,
    pub text: String,
    pub swatch: Rgb,
}

impl ArmorRowView {
    fn empty(label: &'static str) -> Self {
        Self {
            label,
            text: EMPTY_ARMOR_TEXT.to_string(),
            swatch: color::GRAY,
        }
    }

    fn from_slot(label: &'static str, slot: Option<&ArmorSlot>) -> Self {
        match slot {
            Some(slot) if !slot.is_empty() => Self {
                label,
                text: format!("{}, {}%", slot.item.trim(), slot.durability),
                swatch: color::armor_color(&slot.item),
            },
            _ => Self::empty(label),
        }
    }
}

/// Always four rows, helmet first.
///
/// The mod reports slots boots first. Only the first four are used, in
/// reverse, filling rows from the top; rows without a slot read "None, 0%".
pub fn armor_rows(status: &ArmorStatus) -> [ArmorRowView; 4] {
    let mut rows = ARMOR_LABELS.map(ArmorRowView::empty);

    let slots = &status.slots[..status.slots.len().min(4)];
    for (row, slot) in rows.iter_mut().zip(slots.iter().rev()) {
        *row = ArmorRowView::from_slot(row.label, slot.as_ref());
    }

    rows
}

#[derive(Debug, Clone, PartialEq)]
pub struct FpsView {
    pub text: String,
    pub color: Rgb,
}

impl FpsView {
    pub fn from_status(status: &FpsStatus) -> Self {
        Self {
            text: format!("FPS: {}", status.fps),
            color: color::fps_color(status.fps),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PotionRowView {
    pub name: String,
    pub duration: String,
    pub color: Rgb,
}

pub fn potion_rows(status: &PotionStatus) -> Vec<PotionRowView> {
    status
        .effects
        .iter()
        .map(|effect| PotionRowView {
            name: effect.name.clone(),
            duration: effect.duration.clone(),
            color: color::potion_color(&effect.name),
        })
        .collect()
}

pub const POTION_MIN_HEIGHT: u32 = 30;
pub const POTION_ROW_HEIGHT: u32 = 40;

/// 30px of padding plus 40px per effect, never below 30px
pub fn potion_window_height(effects: usize) -> u32 {
    let rows = u32::try_from(effects).unwrap_or(u32::MAX);
    POTION_MIN_HEIGHT
        .saturating_add(rows.saturating_mul(POTION_ROW_HEIGHT))
        .max(POTION_MIN_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_target_view() {
        let view = TargetView::from_status(&TargetStatus::default());
        assert_eq!(view.name, "No Target");
        assert_eq!(view.health_text, "HP: 0.0/0.0");
        assert_eq!(view.distance_text, "Distance: 0.0");
        assert_eq!(view.health_color, color::WHITE);
    }

    #[test]
    fn test_target_view_formats_one_decimal() {
        let view = TargetView::from_status(&TargetStatus {
            name: "Zombie".into(),
            health: 7.26,
            max_health: 20.0,
            distance: 4.44,
        });
        assert_eq!(view.health_text, "HP: 7.3/20.0");
        assert_eq!(view.distance_text, "Distance: 4.4");
        assert_eq!(view.health_color, color::YELLOW);
    }

    #[test]
    fn test_potion_window_height() {
        assert_eq!(potion_window_height(0), 30);
        assert_eq!(potion_window_height(1), 70);
        assert_eq!(potion_window_height(3), 150);
    }
}
