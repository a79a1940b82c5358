//! Sludge Sweeper - A top-down arcade survival game
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (movement, sweeps, merges, game state)
//! - `audio`: Sound event boundary (the core triggers, hosts synthesize)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod audio;
pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use audio::{AudioSink, NullAudio, SoundEvent};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Base tile size in logical units; the player body is one tile
    pub const TILE_SIZE: f32 = 32.0;

    /// Logical arena dimensions in landscape orientation
    pub const LOGICAL_WIDTH_LANDSCAPE: f32 = 800.0;
    pub const LOGICAL_HEIGHT_LANDSCAPE: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_MAX_HEALTH: i32 = 10;
    pub const XP_TO_FIRST_LEVEL: u32 = 10;
    /// Threshold growth per level (floored)
    pub const XP_GROWTH: f32 = 1.5;

    /// Sword defaults
    pub const SWORD_SWEEP_ANGLE: f32 = std::f32::consts::PI * 0.8;
    pub const SWORD_LENGTH: f32 = TILE_SIZE * 2.5;
    pub const ATTACK_DURATION_FRAMES: u32 = 20;
    pub const ATTACK_COOLDOWN_FRAMES: u32 = 45;
    /// Swift Strikes never takes the cooldown below this
    pub const MIN_ATTACK_COOLDOWN_FRAMES: u32 = 15;

    /// Sludge population
    pub const BASE_MAX_PARTICLES: usize = 30;
    pub const PARTICLES_PER_LEVEL_INCREASE: usize = 5;
    /// Per-frame spawn probability while under the cap
    pub const PARTICLE_SPAWN_RATE: f64 = 0.05;
    pub const MAX_PARTICLE_SIZE: u8 = 4;

    /// Frames spent on the game over screen before the automatic restart
    pub const GAME_RESTART_DELAY: u32 = 180;
    /// Frames the level-up pulse stays armed (0.5s at 60fps)
    pub const LEVEL_UP_PULSE_DURATION: u32 = 30;

    /// Drag distance a touch must exceed on an axis to count as movement
    pub const TOUCH_MOVE_THRESHOLD: f32 = TILE_SIZE * 0.3;

    /// Screen shake applied when the player takes a hit
    pub const SCREEN_SHAKE_INTENSITY: f32 = 8.0;
    pub const SCREEN_SHAKE_DURATION: u32 = 20;

    /// Purge Pulse clears sludge within this fraction of the sword length
    pub const AOE_PULSE_RANGE_FACTOR: f32 = 0.75;

    /// Cosmetic trail behind the moving player
    pub const MAX_TRAIL_PARTICLES: usize = 20;
    pub const TRAIL_SPAWN_CHANCE: f64 = 0.6;
}

/// Normalize an angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU { 0.0 } else { a }
}

/// Angle of a vector measured from +x, in [0, 2π)
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    normalize_angle(v.y.atan2(v.x))
}

/// Logical arena rectangle for the current orientation
///
/// Portrait swaps the landscape dimensions so the play field keeps its area.
pub fn logical_arena(portrait: bool) -> Vec2 {
    use consts::{LOGICAL_HEIGHT_LANDSCAPE, LOGICAL_WIDTH_LANDSCAPE};
    if portrait {
        Vec2::new(LOGICAL_HEIGHT_LANDSCAPE, LOGICAL_WIDTH_LANDSCAPE)
    } else {
        Vec2::new(LOGICAL_WIDTH_LANDSCAPE, LOGICAL_HEIGHT_LANDSCAPE)
    }
}
