//! HUD overlay windows.
//!
//! An overlay process owns one window, one [`StatusStore`] and one status
//! receiver thread. A Slint timer copies the latest snapshot into the window
//! at the module's refresh interval; the receiver never touches the window.

use crate::hud::layout::{self, Anchor};
use crate::hud::view::{self, FpsView, TargetView};
use crate::hud::{KeystrokeState, ReceiverHandle, StatusReceiver, StatusStore, spawn_receiver};
use crate::models::{
    AppConfig, ArmorStatus, FpsStatus, HudKind, OverlayConfig, PotionStatus, TargetStatus,
};
use crate::ui::{ArmorHud, ArmorRow, FpsHud, KeystrokeHud, PotionHud, PotionRow, TargetHud};
use anyhow::{Context, Result};
use slint::{ComponentHandle, LogicalPosition, LogicalSize, ModelRc, Timer, TimerMode, VecModel};
use std::time::Instant;

/// Run the overlay for `kind` until its window closes.
pub fn run_overlay(kind: HudKind, config: &AppConfig) -> Result<()> {
    tracing::info!("Starting {} overlay", kind.display_name());

    match kind {
        HudKind::Target => run_target(config),
        HudKind::Armor => run_armor(config),
        HudKind::Fps => run_fps(config),
        HudKind::Potion => run_potion(config),
        HudKind::Keystrokes => run_keystrokes(config),
    }
}

fn run_target(config: &AppConfig) -> Result<()> {
    let kind = HudKind::Target;
    let store = StatusStore::new(TargetStatus::default());
    let receiver = StatusReceiver::replacing(kind.route(), store.clone());
    let window = TargetHud::new().context("Failed to create target window")?;

    run_window(&window, kind, config, receiver, move |hud: &TargetHud| {
        let view = store.with(TargetView::from_status);
        hud.set_name(view.name.into());
        hud.set_health_text(view.health_text.into());
        hud.set_health_color(view.health_color.into());
        hud.set_distance_text(view.distance_text.into());
        true
    })
}

fn run_armor(config: &AppConfig) -> Result<()> {
    let kind = HudKind::Armor;
    let store = StatusStore::new(ArmorStatus::default());
    let receiver = StatusReceiver::replacing(kind.route(), store.clone());
    let window = ArmorHud::new().context("Failed to create armor window")?;

    let mut shown = None;
    run_window(&window, kind, config, receiver, move |hud: &ArmorHud| {
        let rows = store.with(view::armor_rows);
        if shown.as_ref() != Some(&rows) {
            let model: Vec<ArmorRow> = rows
                .iter()
                .map(|row| ArmorRow {
                    label: row.label.into(),
                    text: row.text.as_str().into(),
                    swatch: row.swatch.into(),
                })
                .collect();
            hud.set_rows(ModelRc::new(VecModel::from(model)));
            shown = Some(rows);
        }
        true
    })
}

fn run_fps(config: &AppConfig) -> Result<()> {
    let kind = HudKind::Fps;
    let store = StatusStore::new(FpsStatus::default());
    let receiver = StatusReceiver::replacing(kind.route(), store.clone());
    let window = FpsHud::new().context("Failed to create FPS window")?;

    run_window(&window, kind, config, receiver, move |hud: &FpsHud| {
        let view = store.with(FpsView::from_status);
        hud.set_text(view.text.into());
        hud.set_tint(view.color.into());
        true
    })
}

fn run_potion(config: &AppConfig) -> Result<()> {
    let kind = HudKind::Potion;
    let store = StatusStore::new(PotionStatus::default());
    let receiver = StatusReceiver::replacing(kind.route(), store.clone());
    let window = PotionHud::new().context("Failed to create potion window")?;

    let overlay = config.overlay.clone();
    let mut shown = None;
    run_window(&window, kind, config, receiver, move |hud: &PotionHud| {
        let rows = store.with(view::potion_rows);
        if shown.as_ref() == Some(&rows) {
            return true;
        }

        let height = view::potion_window_height(rows.len());
        let model: Vec<PotionRow> = rows
            .iter()
            .map(|row| PotionRow {
                name: row.name.as_str().into(),
                duration: row.duration.as_str().into(),
                tint: row.color.into(),
            })
            .collect();
        hud.set_rows(ModelRc::new(VecModel::from(model)));

        // Grows downward from the old origin unless re-centred
        let (width, _) = layout::window_size(kind);
        hud.set_window_height(height as f32);
        hud.window()
            .set_size(LogicalSize::new(width as f32, height as f32));
        place(hud.window(), kind, (width, height), &overlay);

        shown = Some(rows);
        true
    })
}

fn run_keystrokes(config: &AppConfig) -> Result<()> {
    let kind = HudKind::Keystrokes;
    let store = StatusStore::new(KeystrokeState::new());
    let receiver = StatusReceiver::keystrokes(kind.route(), store.clone());
    let window = KeystrokeHud::new().context("Failed to create keystrokes window")?;

    run_window(&window, kind, config, receiver, move |hud: &KeystrokeHud| {
        let view = store.with(|state| state.view_at(Instant::now()));
        hud.set_w_pressed(view.w);
        hud.set_a_pressed(view.a);
        hud.set_s_pressed(view.s);
        hud.set_d_pressed(view.d);
        hud.set_space_pressed(view.space);
        hud.set_shift_pressed(view.shift);
        hud.set_lmb_pressed(view.lmb);
        hud.set_rmb_pressed(view.rmb);
        hud.set_lmb_cps(view.lmb_cps.into());
        hud.set_rmb_cps(view.rmb_cps.into());
        !view.close_requested
    })
}

/// Shared overlay loop: start the receiver, place the window and redraw it
/// on a timer until `redraw` returns `false` or the window is closed.
fn run_window<W, F>(
    window: &W,
    kind: HudKind,
    config: &AppConfig,
    receiver: StatusReceiver,
    mut redraw: F,
) -> Result<()>
where
    W: ComponentHandle + 'static,
    F: FnMut(&W) -> bool + 'static,
{
    // Held for the life of the window; dropping it stops the receiver thread
    let _receiver = start_receiver(kind, config, receiver);

    place(window.window(), kind, layout::window_size(kind), &config.overlay);

    let weak = window.as_weak();
    let timer = Timer::default();
    timer.start(TimerMode::Repeated, config.hud.refresh(kind), move || {
        let Some(window) = weak.upgrade() else {
            return;
        };
        if !redraw(&window) {
            tracing::info!("{} overlay closing on request", kind.display_name());
            if let Err(e) = window.hide() {
                tracing::warn!("Failed to hide overlay window: {}", e);
            }
            let _ = slint::quit_event_loop();
        }
    });

    window
        .run()
        .with_context(|| format!("{} overlay event loop failed", kind.display_name()))?;

    timer.stop();
    tracing::info!("{} overlay stopped", kind.display_name());
    Ok(())
}

/// A receiver that fails to bind is logged; the window still opens and
/// shows its defaults.
fn start_receiver(
    kind: HudKind,
    config: &AppConfig,
    receiver: StatusReceiver,
) -> Option<ReceiverHandle> {
    let addr = config.hud.socket_addr(kind);
    match spawn_receiver(addr, receiver) {
        Ok(handle) => {
            tracing::info!("{} listening on {}", kind.display_name(), handle.local_addr());
            Some(handle)
        }
        Err(e) => {
            tracing::error!(
                "{} could not start its status receiver on {}: {:#}",
                kind.display_name(),
                addr,
                e
            );
            None
        }
    }
}

fn place(window: &slint::Window, kind: HudKind, size: (u32, u32), overlay: &OverlayConfig) {
    let (x, y) = layout::position(Anchor::for_hud(kind), size, overlay);
    window.set_position(LogicalPosition::new(x as f32, y as f32));
}
