//! Level-up upgrades
//!
//! A fixed catalog; each level up offers up to three distinct entries and the
//! chosen one is applied to the player.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameMode, GameState, Player};
use crate::audio::{AudioSink, SoundEvent};
use crate::consts::AOE_PULSE_RANGE_FACTOR;

/// Choices offered per level up
pub const UPGRADE_CHOICES: usize = 3;

/// Catalog identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeId {
    SwordLength,
    AttackSpeed,
    MoveSpeed,
    MaxHealth,
    XpBoostPermanent,
    AoePulse,
}

/// A catalog entry
#[derive(Debug)]
pub struct Upgrade {
    pub id: UpgradeId,
    pub name: &'static str,
    pub description: &'static str,
}

/// Every upgrade the game can offer
pub static CATALOG: &[Upgrade] = &[
    Upgrade {
        id: UpgradeId::SwordLength,
        name: "Longer Sword",
        description: "Increases attack range by 15%. Slice more sludge!",
    },
    Upgrade {
        id: UpgradeId::AttackSpeed,
        name: "Swift Strikes",
        description: "Reduces attack cooldown by 15%. Attack faster!",
    },
    Upgrade {
        id: UpgradeId::MoveSpeed,
        name: "Speed Boost",
        description: "Increases movement speed by 0.5. Zoom zoom!",
    },
    Upgrade {
        id: UpgradeId::MaxHealth,
        name: "Fortify Hull",
        description: "Increases Max Health by 10 and heals 10 HP.",
    },
    Upgrade {
        id: UpgradeId::XpBoostPermanent,
        name: "XP Magnet",
        description: "Permanently increases all XP gained by 10%.",
    },
    Upgrade {
        id: UpgradeId::AoePulse,
        name: "Purge Pulse",
        description: "Unleash an energy pulse, clearing nearby particles.",
    },
];

impl UpgradeId {
    /// Catalog entry for this id
    pub fn info(self) -> &'static Upgrade {
        CATALOG
            .iter()
            .find(|u| u.id == self)
            .unwrap_or(&CATALOG[0])
    }

    /// Apply the stat change to the player
    ///
    /// Purge Pulse has no stat change; its effect is on the sludge and is
    /// handled by `apply_selected_upgrade`.
    pub fn apply_to(self, player: &mut Player, min_cooldown: u32) {
        match self {
            UpgradeId::SwordLength => player.sword_length *= 1.15,
            UpgradeId::AttackSpeed => {
                let reduced = (player.attack_cooldown_max as f32 * 0.85).floor() as u32;
                player.attack_cooldown_max = reduced.max(min_cooldown);
            }
            UpgradeId::MoveSpeed => player.speed += 0.5,
            UpgradeId::MaxHealth => {
                player.max_health += 10;
                player.health = (player.health + 10).min(player.max_health);
            }
            UpgradeId::XpBoostPermanent => {
                player.xp_multiplier = (player.xp_multiplier * 1.1 * 100.0).round() / 100.0;
            }
            UpgradeId::AoePulse => {}
        }
    }
}

/// Open an upgrade episode: sample distinct catalog entries in random order
pub fn generate_upgrade_choices(state: &mut GameState) {
    let mut available: Vec<UpgradeId> = CATALOG.iter().map(|u| u.id).collect();
    let count = available.len().min(UPGRADE_CHOICES);
    let mut choices = Vec::with_capacity(count);
    for _ in 0..count {
        let idx = state.rng().random_range(0..available.len());
        choices.push(available.swap_remove(idx));
    }
    log::info!("Upgrade choices: {:?}", choices);
    state.upgrade_choices = choices;
}

/// Apply the upgrade at `index` in the open episode
///
/// Returns false (and changes nothing) when no episode is open or the index
/// is out of range.
pub fn apply_selected_upgrade(state: &mut GameState, index: usize, audio: &mut dyn AudioSink) -> bool {
    if state.mode != GameMode::UpgradeSelect {
        return false;
    }
    let Some(&upgrade) = state.upgrade_choices.get(index) else {
        log::debug!("Ignoring upgrade choice {index} ({} offered)", state.upgrade_choices.len());
        return false;
    };

    let min_cooldown = state.tuning.min_attack_cooldown;
    upgrade.apply_to(&mut state.player, min_cooldown);
    if upgrade == UpgradeId::AoePulse {
        trigger_aoe_pulse(state, audio);
    }
    log::info!("Applied upgrade: {}", upgrade.info().name);

    state.mode = GameMode::Running;
    state.upgrade_choices.clear();
    let pulse = state.tuning.level_up_pulse_duration;
    state.player.arm_level_up_pulse(pulse);
    state.emit(GameEvent::UpgradeApplied { upgrade });
    audio.play(SoundEvent::LevelUp);
    true
}

/// Clear every sludge near the player without awarding XP
fn trigger_aoe_pulse(state: &mut GameState, audio: &mut dyn AudioSink) {
    let center = state.player.center();
    let range = state.player.sword_length * AOE_PULSE_RANGE_FACTOR;
    let before = state.particles.len();
    state.particles.retain(|p| p.pos.distance(center) > range);
    let cleared = before - state.particles.len();
    state.emit(GameEvent::PurgePulse { cleared });
    audio.play(SoundEvent::ParticleCombine);
}
