//! Browser binding
//!
//! JavaScript owns the canvas, input listeners and Web Audio; it hands each
//! frame's input over as JSON and gets the snapshot back as JSON.

use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::audio::{AudioSink, SoundEvent};
use crate::sim::{GameState, TickInput, tick};
use crate::{Settings, Tuning, logical_arena};

/// Forwards sound triggers to a JS callback `(name: string) => void`
struct JsAudio {
    on_sound: Option<Function>,
    on_music: Option<Function>,
}

impl AudioSink for JsAudio {
    fn play(&mut self, effect: SoundEvent) {
        if let Some(f) = &self.on_sound {
            let _ = f.call1(&JsValue::NULL, &JsValue::from_str(effect.as_str()));
        }
    }

    fn set_music_enabled(&mut self, enabled: bool) {
        if let Some(f) = &self.on_music {
            let _ = f.call1(&JsValue::NULL, &JsValue::from_bool(enabled));
        }
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Sludge Sweeper starting...");
}

/// Game instance driven from the page's animation loop
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    audio: JsAudio,
}

#[wasm_bindgen]
impl WebGame {
    /// `tuning_json` and `settings_json` may be empty for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64, portrait: bool, tuning_json: &str, settings_json: &str) -> WebGame {
        let tuning = if tuning_json.is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json_or_default(tuning_json)
        };
        let settings = if settings_json.is_empty() {
            Settings::default()
        } else {
            Settings::from_json_or_default(settings_json)
        };
        WebGame {
            state: GameState::with_config(seed as u64, tuning, settings, logical_arena(portrait)),
            audio: JsAudio {
                on_sound: None,
                on_music: None,
            },
        }
    }

    pub fn set_sound_callback(&mut self, f: Function) {
        self.audio.on_sound = Some(f);
    }

    pub fn set_music_callback(&mut self, f: Function) {
        self.audio.on_music = Some(f);
    }

    /// Switch orientation; the player is re-clamped into the new arena
    pub fn set_portrait(&mut self, portrait: bool) {
        let arena = logical_arena(portrait);
        self.state.set_arena(arena.x, arena.y);
    }

    /// Advance one frame. Malformed input JSON counts as "no input".
    pub fn tick(&mut self, input_json: &str) -> String {
        let input: TickInput = serde_json::from_str(input_json).unwrap_or_else(|e| {
            log::warn!("Bad input frame ({e}), treating as idle");
            TickInput::default()
        });
        let snapshot = tick(&mut self.state, &input, &mut self.audio);
        snapshot.to_json().unwrap_or_else(|e| {
            log::error!("Snapshot serialization failed: {e}");
            String::from("{}")
        })
    }

    /// Current snapshot without advancing
    pub fn snapshot(&self) -> String {
        self.state.snapshot().to_json().unwrap_or_default()
    }
}
