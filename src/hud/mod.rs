// HUD overlays - everything an overlay process needs apart from its window
//
// - StatusStore: latest snapshot shared between the receiver thread and the GUI timer
// - server: loopback HTTP receiver for the mod's status pushes
// - view/color: snapshot -> display strings and colours
// - layout: screen anchoring for each overlay
// - keystrokes: held keys, click rates and the close gesture

pub mod color;
pub mod keystrokes;
pub mod layout;
pub mod server;
pub mod store;
pub mod view;

pub use color::Rgb;
pub use keystrokes::{KeystrokeState, KeystrokeView};
pub use layout::{Anchor, position, window_size};
pub use server::{ReceiverHandle, StatusReceiver, serve, spawn_receiver};
pub use store::StatusStore;
pub use view::{ArmorRowView, FpsView, PotionRowView, TargetView, armor_rows, potion_rows};
