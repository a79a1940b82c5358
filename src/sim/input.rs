//! Input intent resolution
//!
//! Hosts translate devices into a `TickInput`; this module collapses it into
//! one discrete movement direction and an optional aim point.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Held state of the eight directional keys (WASD + arrows)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionKeys {
    pub w: bool,
    pub a: bool,
    pub s: bool,
    pub d: bool,
    pub arrow_up: bool,
    pub arrow_left: bool,
    pub arrow_down: bool,
    pub arrow_right: bool,
}

impl DirectionKeys {
    pub fn up(&self) -> bool {
        self.w || self.arrow_up
    }

    pub fn down(&self) -> bool {
        self.s || self.arrow_down
    }

    pub fn left(&self) -> bool {
        self.a || self.arrow_left
    }

    pub fn right(&self) -> bool {
        self.d || self.arrow_right
    }
}

/// An active touch drag: where the finger went down and where it is now
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchDrag {
    pub start: Vec2,
    pub current: Vec2,
}

/// Discrete, edge-triggered input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    /// Pause key / pause button
    TogglePause,
    /// Space, Enter or a tap; resumes from pause
    Accept,
    /// Pick an entry on the upgrade screen (0-based)
    SelectUpgrade(usize),
    /// Music on/off
    ToggleMusic,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TickInput {
    pub keys: DirectionKeys,
    /// Present while a finger is dragging on the play field
    pub touch: Option<TouchDrag>,
    /// Mouse position in arena coordinates, when the host has one this frame
    ///
    /// Hosts may send it every frame or only on change; the engine keeps the
    /// latest touch or pointer point as the aim after either goes away.
    pub pointer: Option<Vec2>,
    /// Events that happened since the previous tick, in order
    pub events: Vec<InputEvent>,
}

/// Discrete movement direction, each axis in {-1, 0, 1}
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub dx: i8,
    pub dy: i8,
}

impl MoveIntent {
    pub const NONE: Self = Self { dx: 0, dy: 0 };

    pub fn new(dx: i8, dy: i8) -> Self {
        Self {
            dx: dx.signum(),
            dy: dy.signum(),
        }
    }

    pub fn is_moving(&self) -> bool {
        self.dx != 0 || self.dy != 0
    }

    pub fn is_diagonal(&self) -> bool {
        self.dx != 0 && self.dy != 0
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.dx as f32, self.dy as f32)
    }
}

impl TickInput {
    /// Resolve the movement direction for this tick
    ///
    /// A live touch drag replaces the keyboard entirely, including resolving
    /// to no movement while the drag sits inside the dead zone.
    pub fn move_intent(&self, touch_threshold: f32) -> MoveIntent {
        if let Some(drag) = self.touch {
            let delta = drag.current - drag.start;
            let axis = |d: f32| -> i8 {
                if d.abs() > touch_threshold {
                    if d > 0.0 { 1 } else { -1 }
                } else {
                    0
                }
            };
            return MoveIntent::new(axis(delta.x), axis(delta.y));
        }

        // Up wins over down, left wins over right
        let dy = if self.keys.up() {
            -1
        } else if self.keys.down() {
            1
        } else {
            0
        };
        let dx = if self.keys.left() {
            -1
        } else if self.keys.right() {
            1
        } else {
            0
        };
        MoveIntent::new(dx, dy)
    }

    /// Point the sword should swing toward, if any
    pub fn aim_point(&self) -> Option<Vec2> {
        self.touch.map(|t| t.current).or(self.pointer)
    }

    pub fn with_event(mut self, event: InputEvent) -> Self {
        self.events.push(event);
        self
    }
}
