//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. This module stays free of rendering and
//! platform code:
//! - One tick per display frame, no wall-clock time
//! - Seeded RNG only, so a seed plus an input log replays a run
//! - Sound and effects leave through `AudioSink` and `GameEvent`

pub mod collision;
pub mod geometry;
pub mod input;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod upgrade;

pub use geometry::SweepArc;
pub use input::{DirectionKeys, InputEvent, MoveIntent, TickInput, TouchDrag};
pub use snapshot::{Snapshot, UpgradeChoice};
pub use state::{FxParticle, GameEvent, GameMode, GameState, Hsla, Player, ScreenShake, Sludge};
pub use tick::tick;
pub use upgrade::{CATALOG, Upgrade, UpgradeId, apply_selected_upgrade, generate_upgrade_choices};
