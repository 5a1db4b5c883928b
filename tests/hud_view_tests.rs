//! Integration tests for overlay display logic
//!
//! These tests verify the snapshot -> display mapping the overlay windows
//! rely on: colour thresholds, armor row ordering, potion window sizing and
//! screen anchoring.

use karlauncher::HudKind;
use karlauncher::hud::color::{self, Rgb};
use karlauncher::hud::layout::{self, Anchor};
use karlauncher::hud::view::{self, EMPTY_ARMOR_TEXT, FpsView, TargetView};
use karlauncher::models::{
    ArmorSlot, ArmorStatus, FpsStatus, OverlayConfig, PotionEffect, PotionStatus, TargetStatus,
};
use proptest::prelude::*;

fn slot(item: &str, durability: u32) -> Option<ArmorSlot> {
    Some(ArmorSlot {
        item: item.to_string(),
        durability,
    })
}

#[test]
fn test_armor_rows_show_helmet_first() {
    let status = ArmorStatus {
        slots: vec![
            slot("diamond_boots", 91),
            slot("iron_leggings", 40),
            None,
            slot("leather_helmet", 12),
        ],
    };

    let rows = view::armor_rows(&status);

    assert_eq!(rows[0].label, "Helmet");
    assert_eq!(rows[0].text, "leather_helmet, 12%");
    assert_eq!(rows[0].swatch, Rgb::hex(0xA0522D));
    assert_eq!(rows[1].text, EMPTY_ARMOR_TEXT);
    assert_eq!(rows[1].swatch, color::GRAY);
    assert_eq!(rows[2].text, "iron_leggings, 40%");
    assert_eq!(rows[3].label, "Boots");
    assert_eq!(rows[3].swatch, Rgb::hex(0x00FFFF));
}

#[test]
fn test_short_armor_list_fills_from_top() {
    let status = ArmorStatus {
        slots: vec![slot("golden_boots", 55), slot("chainmail_leggings", 70)],
    };

    let rows = view::armor_rows(&status);

    assert_eq!(rows[0].text, "chainmail_leggings, 70%");
    assert_eq!(rows[0].label, "Helmet");
    assert_eq!(rows[1].text, "golden_boots, 55%");
    assert_eq!(rows[2].text, EMPTY_ARMOR_TEXT);
    assert_eq!(rows[3].text, EMPTY_ARMOR_TEXT);
}

#[test]
fn test_extra_armor_slots_are_ignored() {
    let mut slots = vec![slot("a_boots", 1), slot("b", 2), slot("c", 3), slot("d_helmet", 4)];
    slots.push(slot("offhand_shield", 99));

    let rows = view::armor_rows(&ArmorStatus { slots });

    assert_eq!(rows[0].text, "d_helmet, 4%");
    assert_eq!(rows[3].text, "a_boots, 1%");
    assert!(rows.iter().all(|row| !row.text.contains("shield")));
}

#[test]
fn test_potion_rows_keep_order_and_color() {
    let status = PotionStatus {
        effects: vec![
            PotionEffect {
                name: "Night Vision".into(),
                duration: "3:00".into(),
            },
            PotionEffect {
                name: "Bad Omen".into(),
                duration: "**:**".into(),
            },
        ],
    };

    let rows = view::potion_rows(&status);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].color, Rgb::hex(0x1F1FA1));
    assert_eq!(rows[1].duration, "**:**");
    assert_eq!(rows[1].color, color::WHITE);
}

#[test]
fn test_fps_view() {
    let view = FpsView::from_status(&FpsStatus { fps: 45 });
    assert_eq!(view.text, "FPS: 45");
    assert_eq!(view.color, color::YELLOW);
}

#[test]
fn test_target_without_max_health_is_white() {
    let view = TargetView::from_status(&TargetStatus {
        name: "Armor Stand".into(),
        health: 5.0,
        max_health: 0.0,
        distance: 1.0,
    });
    assert_eq!(view.health_color, color::WHITE);
    assert_eq!(view.health_text, "HP: 5.0/0.0");
}

#[test]
fn test_every_overlay_fits_default_screen() {
    let overlay = OverlayConfig::default();
    for kind in HudKind::ALL {
        let size = layout::window_size(kind);
        let (x, y) = layout::position(Anchor::for_hud(kind), size, &overlay);
        assert!(x >= 0 && y >= 0, "{} placed off screen", kind);
        assert!(x as u32 + size.0 <= overlay.screen_width);
        assert!(y as u32 + size.1 <= overlay.screen_height);
    }
}

proptest! {
    /// Health colour only ever gets worse as the ratio drops
    #[test]
    fn health_color_is_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let rank = |c: Rgb| if c == color::GREEN { 2 } else if c == color::YELLOW { 1 } else { 0 };
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(rank(color::health_color(low)) <= rank(color::health_color(high)));
    }

    #[test]
    fn fps_color_matches_thresholds(fps in 0u32..1000) {
        let expected = if fps >= 60 {
            color::GREEN
        } else if fps >= 30 {
            color::YELLOW
        } else {
            color::RED
        };
        prop_assert_eq!(color::fps_color(fps), expected);
    }

    /// Armor matching ignores case
    #[test]
    fn armor_color_ignores_case(item in "(leather|iron|chainmail|gold|diamond)_(helmet|boots)") {
        prop_assert_eq!(color::armor_color(&item), color::armor_color(&item.to_uppercase()));
        prop_assert_ne!(color::armor_color(&item), color::GRAY);
    }

    #[test]
    fn armor_rows_are_always_four(count in 0usize..10) {
        let status = ArmorStatus {
            slots: (0..count).map(|i| slot("iron_chestplate", i as u32)).collect(),
        };
        let rows = view::armor_rows(&status);
        let filled = rows.iter().filter(|row| row.text != EMPTY_ARMOR_TEXT).count();
        prop_assert_eq!(filled, count.min(4));
    }

    #[test]
    fn potion_height_grows_forty_per_effect(n in 0usize..50) {
        let height = view::potion_window_height(n);
        prop_assert!(height >= view::POTION_MIN_HEIGHT);
        prop_assert_eq!(view::potion_window_height(n + 1) - height, view::POTION_ROW_HEIGHT);
    }

    /// The potion overlay stays vertically centred whatever its height
    #[test]
    fn potion_window_stays_centred(n in 0usize..20) {
        let overlay = OverlayConfig::default();
        let height = view::potion_window_height(n);
        let (_, y) = layout::position(Anchor::LeftCenter, (200, height), &overlay);
        let centre = i64::from(y) + i64::from(height) / 2;
        prop_assert!((centre - i64::from(overlay.screen_height) / 2).abs() <= 1);
    }
}
