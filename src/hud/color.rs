//! Overlay colour tables.

use std::fmt;

/// 24-bit colour, written the way the tables below read: `Rgb::hex(0x00FF00)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for slint::Color {
    fn from(rgb: Rgb) -> Self {
        slint::Color::from_rgb_u8(rgb.r, rgb.g, rgb.b)
    }
}

pub const WHITE: Rgb = Rgb::hex(0xFFFFFF);
pub const GREEN: Rgb = Rgb::hex(0x00FF00);
pub const YELLOW: Rgb = Rgb::hex(0xFFFF00);
pub const RED: Rgb = Rgb::hex(0xFF0000);
pub const GRAY: Rgb = Rgb::hex(0x808080);

/// Material is checked before the piece, so "diamond_helmet" is cyan
const ARMOR_MATERIALS: &[(&str, Rgb)] = &[
    ("leather", Rgb::hex(0xA0522D)),
    ("iron", Rgb::hex(0xFFFFFF)),
    ("chainmail", Rgb::hex(0xA0A0A0)),
    ("gold", Rgb::hex(0xFFD700)),
    ("diamond", Rgb::hex(0x00FFFF)),
];

const ARMOR_PIECES: &[(&str, Rgb)] = &[
    ("helmet", Rgb::hex(0xFFAA00)),
    ("chestplate", Rgb::hex(0xFF5555)),
    ("leggings", Rgb::hex(0x5555FF)),
    ("boots", Rgb::hex(0x55FF55)),
];

const POTION_COLORS: &[(&[&str], Rgb)] = &[
    (&["speed", "haste"], Rgb::hex(0x7CAFC6)),
    (&["slowness"], Rgb::hex(0x5A6C81)),
    (&["strength", "damage"], Rgb::hex(0x932423)),
    (&["jump"], Rgb::hex(0x22FF33)),
    (&["regeneration"], Rgb::hex(0xCD5CAB)),
    (&["fire resistance"], Rgb::hex(0xE49E3A)),
    (&["water breathing"], Rgb::hex(0x2E5299)),
    (&["invisibility"], Rgb::hex(0x7F8392)),
    (&["night vision"], Rgb::hex(0x1F1FA1)),
    (&["poison"], Rgb::hex(0x4E9331)),
    (&["weakness"], Rgb::hex(0x484D48)),
    (&["wither"], Rgb::hex(0x352A27)),
    (&["health boost"], Rgb::hex(0xF87D23)),
    (&["absorption"], Rgb::hex(0xF8B71D)),
];

/// Green above 60% health, yellow above 30%, red otherwise
pub fn health_color(ratio: f64) -> Rgb {
    if ratio > 0.6 {
        GREEN
    } else if ratio > 0.3 {
        YELLOW
    } else {
        RED
    }
}

pub fn fps_color(fps: u32) -> Rgb {
    if fps >= 60 {
        GREEN
    } else if fps >= 30 {
        YELLOW
    } else {
        RED
    }
}

pub fn armor_color(item: &str) -> Rgb {
    let item = item.to_lowercase();
    ARMOR_MATERIALS
        .iter()
        .chain(ARMOR_PIECES)
        .find(|(needle, _)| item.contains(needle))
        .map(|(_, color)| *color)
        .unwrap_or(GRAY)
}

pub fn potion_color(name: &str) -> Rgb {
    let name = name.to_lowercase();
    POTION_COLORS
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| name.contains(needle)))
        .map(|(_, color)| *color)
        .unwrap_or(WHITE)
}
