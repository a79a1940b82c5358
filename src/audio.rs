//! Sound event boundary
//!
//! The simulation never synthesizes audio. It names what happened and hands
//! that to an injected `AudioSink`; hosts decide how (or whether) it sounds.

use serde::{Deserialize, Serialize};

/// Sound effect triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundEvent {
    /// A new sword swing started
    PlayerAttack,
    /// Sword sweep destroyed a sludge
    ParticleHitSword,
    /// Sludge touched the player
    PlayerTakeDamage,
    /// Health ran out
    GameOver,
    /// Upgrade chosen after a level up
    LevelUp,
    /// Purge Pulse cleared the surroundings
    ParticleCombine,
}

impl SoundEvent {
    /// Wire name used by hosts to pick a sound
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEvent::PlayerAttack => "player_attack",
            SoundEvent::ParticleHitSword => "particle_hit_sword",
            SoundEvent::PlayerTakeDamage => "player_take_damage",
            SoundEvent::GameOver => "game_over",
            SoundEvent::LevelUp => "level_up",
            SoundEvent::ParticleCombine => "particle_combine",
        }
    }
}

/// Receiver for fire-and-forget sound triggers
pub trait AudioSink {
    /// Play a sound effect
    fn play(&mut self, effect: SoundEvent);

    /// Start or stop background music
    fn set_music_enabled(&mut self, _enabled: bool) {}
}

/// Sink that ignores everything (headless runs, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEvent) {}
}

/// Sink that remembers what it was asked to play
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    pub played: Vec<SoundEvent>,
    pub music_enabled: Option<bool>,
}

impl RecordingAudio {
    pub fn count(&self, effect: SoundEvent) -> usize {
        self.played.iter().filter(|e| **e == effect).count()
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, effect: SoundEvent) {
        self.played.push(effect);
    }

    fn set_music_enabled(&mut self, enabled: bool) {
        self.music_enabled = Some(enabled);
    }
}
