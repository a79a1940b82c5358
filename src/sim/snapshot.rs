//! Read-only view of the game for presentation collaborators
//!
//! Built fresh at the end of every tick. Owning copies keeps renderers from
//! holding references into engine state.

use serde::Serialize;

use super::state::{FxParticle, GameEvent, GameMode, GameState, Player, Sludge};
use super::upgrade::UpgradeId;

/// An offered upgrade, with the text the upgrade screen shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeChoice {
    pub id: UpgradeId,
    pub name: &'static str,
    pub description: &'static str,
}

impl From<UpgradeId> for UpgradeChoice {
    fn from(id: UpgradeId) -> Self {
        let info = id.info();
        Self {
            id,
            name: info.name,
            description: info.description,
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub mode: GameMode,
    pub player: Player,
    pub particles: Vec<Sludge>,
    pub trail_fx: Vec<FxParticle>,
    pub spark_fx: Vec<FxParticle>,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub health: i32,
    pub max_health: i32,
    pub arena_width: f32,
    pub arena_height: f32,
    pub upgrade_choices: Vec<UpgradeChoice>,
    /// Shake offset magnitude, already zeroed when the settings disable it
    pub screen_shake: f32,
    pub restart_ticks_remaining: u32,
    pub music_enabled: bool,
    /// Master volume in [0, 1] for the host's mixer
    pub master_volume: f32,
    /// Run seed, for replaying this run
    pub seed: u64,
    pub time_ticks: u64,
    pub events: Vec<GameEvent>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// XP bar fill in [0, 1]
    pub fn xp_progress(&self) -> f32 {
        if self.xp_to_next_level == 0 {
            0.0
        } else {
            (self.xp as f32 / self.xp_to_next_level as f32).min(1.0)
        }
    }

    /// Health bar fill in [0, 1]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0 {
            0.0
        } else {
            self.health as f32 / self.max_health as f32
        }
    }
}

impl GameState {
    /// Publish the externally visible state
    pub fn snapshot(&self) -> Snapshot {
        let screen_shake = if self.settings.effective_screen_shake() {
            self.screen_shake.intensity
        } else {
            0.0
        };
        Snapshot {
            mode: self.mode,
            player: self.player.clone(),
            particles: self.particles.clone(),
            trail_fx: self.trail_fx.clone(),
            spark_fx: self.spark_fx.clone(),
            level: self.player.level,
            xp: self.player.xp,
            xp_to_next_level: self.player.xp_to_next_level,
            health: self.player.health,
            max_health: self.player.max_health,
            arena_width: self.arena.x,
            arena_height: self.arena.y,
            upgrade_choices: self.upgrade_choices.iter().copied().map(UpgradeChoice::from).collect(),
            screen_shake,
            restart_ticks_remaining: self.restart_timer,
            music_enabled: self.settings.music_enabled,
            master_volume: self.settings.master_volume,
            seed: self.seed,
            time_ticks: self.time_ticks,
            events: self.events.clone(),
        }
    }
}
