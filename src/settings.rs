//! Game settings and preferences
//!
//! Unlike `Tuning`, nothing here changes gameplay: these only shape what the
//! presentation and audio collaborators are told.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Screen shake when the player takes a hit
    pub screen_shake: bool,
    /// Trail behind the moving player
    pub trails: bool,

    // === Audio ===
    /// Background music on/off (toggled in-game)
    pub music_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_shake: true,
            trails: true,
            music_enabled: true,
            master_volume: 0.3,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse settings from JSON, logging and falling back to defaults
    pub fn from_json_or_default(json: &str) -> Self {
        match serde_json::from_str::<Self>(json) {
            Ok(mut settings) => {
                settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings JSON ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Flip background music, returning the new state
    pub fn toggle_music(&mut self) -> bool {
        self.music_enabled = !self.music_enabled;
        log::info!(
            "Background music {}",
            if self.music_enabled { "ON" } else { "OFF" }
        );
        self.music_enabled
    }
}
