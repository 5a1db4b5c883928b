//! Keystroke overlay state: held keys, click rates and the close gesture.

use crate::models::{KeyEvent, KeyInput};
use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};

/// Clicks older than this no longer count towards CPS
pub const CPS_WINDOW: Duration = Duration::from_secs(1);

/// Timestamps kept per mouse button
pub const MAX_CLICK_HISTORY: usize = 100;

/// Right-shift presses needed inside [`CPS_WINDOW`] to close the overlay
pub const CLOSE_GESTURE_PRESSES: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct KeystrokeState {
    pressed: HashSet<KeyInput>,
    left_clicks: VecDeque<Instant>,
    right_clicks: VecDeque<Instant>,
    rshift_presses: VecDeque<Instant>,
    close_requested: bool,
}

impl KeystrokeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: KeyEvent) {
        self.apply_at(event, Instant::now());
    }

    pub fn apply_at(&mut self, event: KeyEvent, now: Instant) {
        if !event.pressed {
            self.pressed.remove(&event.input);
            return;
        }

        self.pressed.insert(event.input);
        match event.input {
            KeyInput::Lmb => record_click(&mut self.left_clicks, now),
            KeyInput::Rmb => record_click(&mut self.right_clicks, now),
            KeyInput::Rshift => self.record_rshift(now),
            _ => {}
        }
    }

    fn record_rshift(&mut self, now: Instant) {
        self.rshift_presses.push_back(now);
        while let Some(first) = self.rshift_presses.front() {
            if now.duration_since(*first) > CPS_WINDOW {
                self.rshift_presses.pop_front();
            } else {
                break;
            }
        }

        if self.rshift_presses.len() >= CLOSE_GESTURE_PRESSES {
            tracing::info!("Close gesture received");
            self.rshift_presses.clear();
            self.close_requested = true;
        }
    }

    pub fn is_pressed(&self, input: KeyInput) -> bool {
        self.pressed.contains(&input)
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    pub fn left_cps_at(&self, now: Instant) -> usize {
        clicks_within_window(&self.left_clicks, now)
    }

    pub fn right_cps_at(&self, now: Instant) -> usize {
        clicks_within_window(&self.right_clicks, now)
    }

    pub fn view_at(&self, now: Instant) -> KeystrokeView {
        KeystrokeView {
            w: self.is_pressed(KeyInput::W),
            a: self.is_pressed(KeyInput::A),
            s: self.is_pressed(KeyInput::S),
            d: self.is_pressed(KeyInput::D),
            space: self.is_pressed(KeyInput::Space),
            shift: self.is_pressed(KeyInput::Shift),
            lmb: self.is_pressed(KeyInput::Lmb),
            rmb: self.is_pressed(KeyInput::Rmb),
            lmb_cps: format!("{}cps", self.left_cps_at(now)),
            rmb_cps: format!("{}cps", self.right_cps_at(now)),
            close_requested: self.close_requested,
        }
    }
}

fn record_click(clicks: &mut VecDeque<Instant>, now: Instant) {
    if clicks.len() == MAX_CLICK_HISTORY {
        clicks.pop_front();
    }
    clicks.push_back(now);
}

fn clicks_within_window(clicks: &VecDeque<Instant>, now: Instant) -> usize {
    clicks
        .iter()
        .filter(|click| now.saturating_duration_since(**click) <= CPS_WINDOW)
        .count()
}

/// What the keystroke window shows on one redraw.
///
/// Tile colours (pressed `#0000FF`, idle `#ACB6B9`) live in `hud.slint`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeystrokeView {
    pub w: bool,
    pub a: bool,
    pub s: bool,
    pub d: bool,
    pub space: bool,
    pub shift: bool,
    pub lmb: bool,
    pub rmb: bool,
    pub lmb_cps: String,
    pub rmb_cps: String,
    pub close_requested: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(input: KeyInput) -> KeyEvent {
        KeyEvent {
            input,
            pressed: true,
        }
    }

    fn release(input: KeyInput) -> KeyEvent {
        KeyEvent {
            input,
            pressed: false,
        }
    }

    #[test]
    fn test_press_and_release() {
        let mut state = KeystrokeState::new();
        state.apply(press(KeyInput::W));
        assert!(state.is_pressed(KeyInput::W));
        state.apply(release(KeyInput::W));
        assert!(!state.is_pressed(KeyInput::W));
    }

    #[test]
    fn test_cps_counts_last_second_only() {
        let start = Instant::now();
        let mut state = KeystrokeState::new();
        state.apply_at(press(KeyInput::Lmb), start);
        state.apply_at(press(KeyInput::Lmb), start + Duration::from_millis(600));
        state.apply_at(press(KeyInput::Lmb), start + Duration::from_millis(900));

        assert_eq!(state.left_cps_at(start + Duration::from_millis(950)), 3);
        assert_eq!(state.left_cps_at(start + Duration::from_millis(1500)), 2);
        assert_eq!(state.right_cps_at(start + Duration::from_millis(1500)), 0);

        let view = state.view_at(start + Duration::from_millis(1500));
        assert_eq!(view.lmb_cps, "2cps");
        assert_eq!(view.rmb_cps, "0cps");
    }

    #[test]
    fn test_click_history_is_bounded() {
        let now = Instant::now();
        let mut state = KeystrokeState::new();
        for _ in 0..250 {
            state.apply_at(press(KeyInput::Rmb), now);
        }
        assert_eq!(state.right_cps_at(now), MAX_CLICK_HISTORY);
    }

    #[test]
    fn test_triple_rshift_requests_close() {
        let start = Instant::now();
        let mut state = KeystrokeState::new();
        state.apply_at(press(KeyInput::Rshift), start);
        state.apply_at(press(KeyInput::Rshift), start + Duration::from_millis(300));
        assert!(!state.close_requested());
        state.apply_at(press(KeyInput::Rshift), start + Duration::from_millis(700));
        assert!(state.close_requested());
    }

    #[test]
    fn test_slow_rshift_does_not_close() {
        let start = Instant::now();
        let mut state = KeystrokeState::new();
        for i in 0..5 {
            state.apply_at(press(KeyInput::Rshift), start + Duration::from_millis(600 * i));
        }
        assert!(!state.close_requested());
    }
}
