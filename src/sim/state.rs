//! Game state and core simulation types
//!
//! Everything the update step mutates lives in `GameState`; nothing is global.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::clamp_box_to_arena;
use super::input::MoveIntent;
use super::upgrade::UpgradeId;
use crate::consts::*;
use crate::{Settings, Tuning, logical_arena};

/// Top-level game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Active gameplay
    Running,
    /// Frozen by the player
    Paused,
    /// Level up: waiting for an upgrade choice
    UpgradeSelect,
    /// Health ran out; counting down to an automatic restart
    GameOver,
}

/// Cosmetic HSLA colour (hue in degrees, saturation/lightness in percent)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsla {
    pub h: f32,
    pub s: f32,
    pub l: f32,
    pub a: f32,
}

impl Hsla {
    /// Random sludge green, darker for small sludge
    pub fn sludge(size: u8, rng: &mut impl Rng) -> Self {
        Self {
            h: rng.random::<f32>() * 40.0 + 70.0,
            s: rng.random::<f32>() * 30.0 + 40.0,
            l: rng.random::<f32>() * 20.0 + 20.0 * size as f32,
            a: 1.0,
        }
    }

    /// Brighter, translucent variant used for sparks
    pub fn spark(&self, rng: &mut impl Rng) -> Self {
        Self {
            l: (self.l + 30.0).min(100.0),
            a: 0.6 + rng.random::<f32>() * 0.4,
            ..*self
        }
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner of the body box
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub xp_multiplier: f32,

    // Sword parameters
    pub sword_sweep_angle: f32,
    pub sword_length: f32,
    pub attack_duration: u32,
    pub attack_cooldown_max: u32,

    // Swing state
    pub is_attacking: bool,
    pub attack_timer: u32,
    pub attack_cooldown_timer: u32,
    /// Angle (radians) where the current swing began
    pub attack_angle_start: f32,

    /// Unit vector of the last movement direction
    pub facing: Vec2,
    /// Raw movement intent this tick
    pub current_move: MoveIntent,

    pub level_up_pulse_active: bool,
    pub level_up_pulse_timer: u32,
}

impl Player {
    /// Fresh level-1 player centred in the arena
    pub fn new(tuning: &Tuning, arena: Vec2) -> Self {
        let size = Vec2::splat(TILE_SIZE);
        Self {
            pos: arena / 2.0 - size / 2.0,
            size,
            speed: tuning.player_speed,
            health: tuning.player_max_health,
            max_health: tuning.player_max_health,
            level: 1,
            xp: 0,
            xp_to_next_level: tuning.xp_to_first_level,
            xp_multiplier: 1.0,
            sword_sweep_angle: tuning.sword_sweep_angle,
            sword_length: tuning.sword_length,
            attack_duration: tuning.attack_duration,
            attack_cooldown_max: tuning.attack_cooldown,
            is_attacking: false,
            attack_timer: 0,
            attack_cooldown_timer: 0,
            attack_angle_start: 0.0,
            facing: Vec2::X,
            current_move: MoveIntent::NONE,
            level_up_pulse_active: false,
            level_up_pulse_timer: 0,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Radius of the circular body used for contact
    #[inline]
    pub fn body_radius(&self) -> f32 {
        self.size.x / 2.0
    }

    /// Keep the body box inside the arena
    pub fn clamp_to_arena(&mut self, arena: Vec2) {
        self.pos = clamp_box_to_arena(self.pos, self.size, arena);
    }

    /// Add XP from a kill; returns true if it crossed the level threshold
    ///
    /// Overflow carries into the next level but never reaches the new
    /// threshold, so one kill grants at most one level.
    pub fn award_xp(&mut self, xp_value: u32, growth: f32) -> bool {
        let gained = (xp_value as f32 * self.xp_multiplier).floor() as u32;
        self.xp = self.xp.saturating_add(gained);
        if self.xp < self.xp_to_next_level {
            return false;
        }

        let excess = self.xp.saturating_sub(self.xp_to_next_level);
        self.level += 1;
        self.xp_to_next_level = ((self.xp_to_next_level as f32 * growth).floor() as u32).max(1);
        self.xp = excess.min(self.xp_to_next_level - 1);
        true
    }

    /// Arm the expanding ring drawn after an upgrade
    pub fn arm_level_up_pulse(&mut self, duration: u32) {
        self.level_up_pulse_active = duration > 0;
        self.level_up_pulse_timer = duration;
    }

    /// Count the pulse down, disarming it at zero
    pub fn tick_level_up_pulse(&mut self) {
        if self.level_up_pulse_active {
            self.level_up_pulse_timer = self.level_up_pulse_timer.saturating_sub(1);
            if self.level_up_pulse_timer == 0 {
                self.level_up_pulse_active = false;
            }
        }
    }
}

/// A sludge particle (the enemy)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sludge {
    pub id: u32,
    /// Centre position
    pub pos: Vec2,
    /// Size tier, 1..=MAX_PARTICLE_SIZE
    pub size: u8,
    pub radius: f32,
    pub damage: i32,
    pub xp_value: u32,
    /// Distance moved toward the player per tick
    pub speed: f32,
    pub color: Hsla,
}

impl Sludge {
    /// Build a sludge of the given tier; derived stats follow from the size
    pub fn new(id: u32, pos: Vec2, size: u8, rng: &mut impl Rng) -> Self {
        let size = size.clamp(1, MAX_PARTICLE_SIZE);
        let tier = size as f32;
        let speed = ((rng.random::<f32>() * 0.75 + 0.25) / (tier * 0.5)).max(0.25);
        Self {
            id,
            pos,
            size,
            radius: Self::radius_for(size),
            damage: size as i32,
            xp_value: size as u32,
            speed,
            color: Hsla::sludge(size, rng),
        }
    }

    #[inline]
    pub fn radius_for(size: u8) -> f32 {
        size as f32 * 2.0 + 3.0
    }
}

/// A cosmetic particle (movement trail or hit spark)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: Hsla,
    /// Frames left before removal
    pub lifespan: u32,
}

const TRAIL_COLOR: Hsla = Hsla {
    h: 240.0,
    s: 100.0,
    l: 93.0,
    a: 0.4,
};

impl FxParticle {
    /// Trail puff near a player body centre
    pub fn trail(center: Vec2, body: Vec2, rng: &mut impl Rng) -> Self {
        let jitter = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * body / 4.0;
        Self {
            pos: center + jitter,
            vel: Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * 0.3,
            size: rng.random::<f32>() * 2.0 + 2.0,
            color: TRAIL_COLOR,
            lifespan: rng.random_range(15..25),
        }
    }

    /// Burst of sparks where a sludge was cut down
    pub fn sparks(pos: Vec2, base: Hsla, rng: &mut impl Rng) -> Vec<Self> {
        let count = rng.random_range(4..8);
        (0..count)
            .map(|_| Self {
                pos,
                vel: Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * 3.5,
                size: rng.random::<f32>() * 2.5 + 1.0,
                color: base.spark(rng),
                lifespan: rng.random_range(20..30),
            })
            .collect()
    }

    /// Advance a trail puff; returns false once expired
    pub fn age_trail(&mut self) -> bool {
        self.pos += self.vel;
        self.lifespan = self.lifespan.saturating_sub(1);
        self.lifespan > 0
    }

    /// Advance a spark (drag + shrink); returns false once expired
    pub fn age_spark(&mut self) -> bool {
        self.pos += self.vel;
        self.vel *= 0.92;
        self.size *= 0.96;
        self.lifespan = self.lifespan.saturating_sub(1);
        self.lifespan > 0 && self.size >= 0.5
    }
}

/// Camera shake after taking a hit
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenShake {
    pub intensity: f32,
    pub ticks: u32,
}

impl ScreenShake {
    pub fn trigger(&mut self) {
        self.intensity = SCREEN_SHAKE_INTENSITY;
        self.ticks = SCREEN_SHAKE_DURATION;
    }

    pub fn decay(&mut self) {
        if self.ticks > 0 {
            self.ticks -= 1;
            if self.ticks == 0 {
                self.intensity = 0.0;
            }
        }
    }
}

/// Things that happened during a tick, for effects and logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ParticleKilled { pos: Vec2, size: u8 },
    ParticlesMerged { pos: Vec2, size: u8 },
    DamageTaken { damage: i32, health: i32 },
    LevelUp { level: u32 },
    UpgradeApplied { upgrade: UpgradeId },
    PurgePulse { cleared: usize },
    GameOver,
    Restarted,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    pub settings: Settings,
    /// Arena rectangle (logical units)
    pub arena: Vec2,
    pub mode: GameMode,
    /// Ticks left on the game over screen
    pub restart_timer: u32,
    /// Simulation tick counter (survives restarts)
    pub time_ticks: u64,
    pub player: Player,
    pub particles: Vec<Sludge>,
    pub trail_fx: Vec<FxParticle>,
    pub spark_fx: Vec<FxParticle>,
    /// Open upgrade episode (empty unless in UpgradeSelect)
    pub upgrade_choices: Vec<UpgradeId>,
    pub screen_shake: ScreenShake,
    /// Most recent touch or pointer position; survives the finger lifting
    pub last_aim: Option<Vec2>,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game with default tuning in a landscape arena
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), Settings::default(), logical_arena(false))
    }

    pub fn with_config(seed: u64, tuning: Tuning, settings: Settings, arena: Vec2) -> Self {
        let arena = arena.max(Vec2::ONE);
        let player = Player::new(&tuning, arena);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            settings,
            arena,
            mode: GameMode::Running,
            restart_timer: 0,
            time_ticks: 0,
            player,
            particles: Vec::new(),
            trail_fx: Vec::new(),
            spark_fx: Vec::new(),
            upgrade_choices: Vec::new(),
            screen_shake: ScreenShake::default(),
            last_aim: None,
            events: Vec::new(),
            next_id: 1,
        };
        state.reset();
        state
    }

    /// Full reset: fresh player, fresh sludge, back to Running
    pub fn reset(&mut self) {
        self.player = Player::new(&self.tuning, self.arena);
        self.particles.clear();
        self.trail_fx.clear();
        self.spark_fx.clear();
        self.upgrade_choices.clear();
        self.screen_shake = ScreenShake::default();
        self.mode = GameMode::Running;
        self.restart_timer = 0;

        let cap = self.tuning.max_particles_for_level(1);
        for _ in 0..self.tuning.initial_particles.min(cap) {
            self.spawn_particle_random();
        }
        log::info!("Game reset (seed {}, {} sludge seeded)", self.seed, self.particles.len());
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Spawn sludge at an explicit position; returns its id
    pub fn spawn_particle_at(&mut self, pos: Vec2, size: u8) -> u32 {
        let id = self.next_entity_id();
        let sludge = Sludge::new(id, pos, size, &mut self.rng);
        self.particles.push(sludge);
        id
    }

    /// Spawn size-1 sludge anywhere in the arena
    pub fn spawn_particle_random(&mut self) -> u32 {
        let pos = Vec2::new(
            self.rng.random::<f32>() * self.arena.x,
            self.rng.random::<f32>() * self.arena.y,
        );
        self.spawn_particle_at(pos, 1)
    }

    /// Current sludge cap for the player's level
    pub fn particle_cap(&self) -> usize {
        self.tuning.max_particles_for_level(self.player.level)
    }

    /// Replace the arena rectangle (layout change) and re-clamp the player
    pub fn set_arena(&mut self, width: f32, height: f32) {
        let arena = Vec2::new(width, height).max(Vec2::ONE);
        if arena != self.arena {
            log::info!("Arena resized to {}x{}", arena.x, arena.y);
            self.arena = arena;
        }
        self.player.clamp_to_arena(self.arena);
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
