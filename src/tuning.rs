//! Data-driven game balance
//!
//! Every number the simulation reads for balance lives here. Defaults match
//! `crate::consts`; a JSON file may override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Balance parameters read by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_speed: f32,
    pub player_max_health: i32,
    pub xp_to_first_level: u32,
    pub xp_growth: f32,

    // === Sword ===
    pub sword_sweep_angle: f32,
    pub sword_length: f32,
    pub attack_duration: u32,
    pub attack_cooldown: u32,
    pub min_attack_cooldown: u32,

    // === Sludge ===
    pub base_max_particles: usize,
    pub particles_per_level: usize,
    pub particle_spawn_rate: f64,
    /// Sludge seeded by a full reset
    pub initial_particles: usize,

    // === Flow ===
    pub restart_delay: u32,
    pub level_up_pulse_duration: u32,
    pub touch_move_threshold: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: PLAYER_SPEED,
            player_max_health: PLAYER_MAX_HEALTH,
            xp_to_first_level: XP_TO_FIRST_LEVEL,
            xp_growth: XP_GROWTH,

            sword_sweep_angle: SWORD_SWEEP_ANGLE,
            sword_length: SWORD_LENGTH,
            attack_duration: ATTACK_DURATION_FRAMES,
            attack_cooldown: ATTACK_COOLDOWN_FRAMES,
            min_attack_cooldown: MIN_ATTACK_COOLDOWN_FRAMES,

            base_max_particles: BASE_MAX_PARTICLES,
            particles_per_level: PARTICLES_PER_LEVEL_INCREASE,
            particle_spawn_rate: PARTICLE_SPAWN_RATE,
            initial_particles: BASE_MAX_PARTICLES / 2,

            restart_delay: GAME_RESTART_DELAY,
            level_up_pulse_duration: LEVEL_UP_PULSE_DURATION,
            touch_move_threshold: TOUCH_MOVE_THRESHOLD,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON (missing fields keep their defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Parse overrides, logging and falling back to defaults on bad input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Invalid tuning JSON ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Sludge cap for a given player level
    pub fn max_particles_for_level(&self, level: u32) -> usize {
        self.base_max_particles + level.saturating_sub(1) as usize * self.particles_per_level
    }

    /// Clamp values the simulation cannot run with
    pub fn sanitized(mut self) -> Self {
        if self.player_max_health < 1 {
            log::warn!("player_max_health {} < 1, clamping", self.player_max_health);
            self.player_max_health = 1;
        }
        if self.xp_to_first_level < 1 {
            log::warn!("xp_to_first_level is 0, clamping to 1");
            self.xp_to_first_level = 1;
        }
        if !(self.xp_growth >= 1.0) {
            log::warn!("xp_growth {} < 1, clamping", self.xp_growth);
            self.xp_growth = 1.0;
        }
        if self.attack_duration == 0 {
            log::warn!("attack_duration is 0, clamping to 1");
            self.attack_duration = 1;
        }
        if !(0.0..=1.0).contains(&self.particle_spawn_rate) {
            log::warn!("particle_spawn_rate {} outside [0, 1], clamping", self.particle_spawn_rate);
            self.particle_spawn_rate = self.particle_spawn_rate.clamp(0.0, 1.0);
        }
        self.player_speed = self.player_speed.max(0.0);
        self.sword_length = self.sword_length.max(0.0);
        self.sword_sweep_angle = self.sword_sweep_angle.clamp(0.0, std::f32::consts::TAU);
        self.touch_move_threshold = self.touch_move_threshold.max(0.0);
        self
    }
}
