use crate::models::{HudKind, OverlayConfig};

/// Where an overlay sits on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    LeftCenter,
    BottomLeft,
    BottomRight,
}

impl Anchor {
    pub fn for_hud(kind: HudKind) -> Self {
        match kind {
            HudKind::Target => Anchor::BottomRight,
            HudKind::Armor => Anchor::TopLeft,
            HudKind::Fps => Anchor::TopCenter,
            HudKind::Potion => Anchor::LeftCenter,
            HudKind::Keystrokes => Anchor::BottomLeft,
        }
    }
}

/// Initial window size in logical pixels.
///
/// The potion overlay starts at its minimum height and grows with the
/// number of effects.
pub fn window_size(kind: HudKind) -> (u32, u32) {
    match kind {
        HudKind::Target => (150, 80),
        HudKind::Armor => (180, 100),
        HudKind::Fps => (100, 50),
        HudKind::Potion => (200, crate::hud::view::POTION_MIN_HEIGHT),
        HudKind::Keystrokes => (210, 280),
    }
}

/// Top-left corner for a window of `size` placed at `anchor`.
///
/// Centred axes ignore the margin; edges keep `margin` pixels of space.
/// Results may be negative when the window is larger than the screen.
pub fn position(anchor: Anchor, size: (u32, u32), overlay: &OverlayConfig) -> (i32, i32) {
    let screen_w = i64::from(overlay.screen_width);
    let screen_h = i64::from(overlay.screen_height);
    let margin = i64::from(overlay.margin);
    let (w, h) = (i64::from(size.0), i64::from(size.1));

    let left = margin;
    let right = screen_w - w - margin;
    let center_x = screen_w / 2 - w / 2;
    let top = margin;
    let bottom = screen_h - h - margin;
    let center_y = screen_h / 2 - h / 2;

    let (x, y) = match anchor {
        Anchor::TopLeft => (left, top),
        Anchor::TopCenter => (center_x, top),
        Anchor::TopRight => (right, top),
        Anchor::LeftCenter => (left, center_y),
        Anchor::BottomLeft => (left, bottom),
        Anchor::BottomRight => (right, bottom),
    };

    (clamp_i32(x), clamp_i32(y))
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_bottom_right() {
        let overlay = OverlayConfig::default();
        let pos = position(Anchor::for_hud(HudKind::Target), (150, 80), &overlay);
        assert_eq!(pos, (1920 - 150 - 20, 1080 - 80 - 20));
    }

    #[test]
    fn test_fps_top_center() {
        let overlay = OverlayConfig::default();
        assert_eq!(position(Anchor::TopCenter, (100, 50), &overlay), (910, 20));
    }

    #[test]
    fn test_potion_recentres_when_growing() {
        let overlay = OverlayConfig::default();
        let small = position(Anchor::LeftCenter, (200, 30), &overlay);
        let large = position(Anchor::LeftCenter, (200, 150), &overlay);
        assert_eq!(small, (20, 525));
        assert_eq!(large, (20, 465));
    }

    #[test]
    fn test_oversized_window_goes_negative() {
        let overlay = OverlayConfig {
            screen_width: 100,
            screen_height: 100,
            margin: 0,
        };
        assert_eq!(position(Anchor::BottomRight, (150, 80), &overlay), (-50, 20));
    }
}
