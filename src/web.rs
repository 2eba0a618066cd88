//! Browser bindings
//!
//! The page owns the canvas and the `requestAnimationFrame` loop; it feeds
//! input and frame times in and draws from the JSON snapshot.

use wasm_bindgen::prelude::*;

use crate::audio::AudioManager;
use crate::persistence::LocalStorage;
use crate::rewards::Rewards;
use crate::settings::Settings;
use crate::sim::{GamePhase, Session, Viewport};
use crate::telegram::{self, TelegramNotifier};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_main() {
    crate::platform::init_logging();
    TelegramNotifier::ready();
    log::info!("Septic Surfer (wasm) starting...");
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("Serialization failed: {e}");
        "null".to_string()
    })
}

/// Game instance handed to the page
#[wasm_bindgen]
pub struct WebGame {
    session: Session,
    settings: Settings,
    settings_storage: LocalStorage,
    audio: AudioManager,
}

#[wasm_bindgen]
impl WebGame {
    /// `tuning_json` may be partial; bad JSON falls back to defaults
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64, width: f32, height: f32, tuning_json: Option<String>) -> WebGame {
        let tuning = tuning_json
            .as_deref()
            .map(Tuning::load_or_default)
            .unwrap_or_default();
        let settings_storage = LocalStorage::new();
        let settings = Settings::load(&settings_storage);
        let session = Session::new(
            seed.max(0.0) as u64,
            Viewport::new(width, height),
            tuning,
            Box::new(LocalStorage::new()),
            Box::new(TelegramNotifier),
        );
        WebGame {
            audio: AudioManager::new(&settings),
            session,
            settings,
            settings_storage,
        }
    }

    pub fn start(&mut self) {
        self.audio.resume();
        self.session.start();
    }

    pub fn restart(&mut self) {
        self.audio.resume();
        self.session.restart();
    }

    pub fn pause(&mut self) {
        self.session.pause();
    }

    pub fn resume(&mut self) {
        self.session.resume();
    }

    /// Tap, click or jump key
    pub fn request_jump(&mut self) {
        self.audio.resume();
        self.session.request_jump();
    }

    /// Keyboard shortcut; returns true if the key was used
    pub fn handle_key(&mut self, key: &str) -> bool {
        match key {
            " " | "ArrowUp" | "w" | "W" => self.request_jump(),
            "Escape" | "p" | "P" => match self.session.phase() {
                GamePhase::Playing => self.pause(),
                GamePhase::Paused => self.resume(),
                _ => return false,
            },
            "Enter" => match self.session.phase() {
                GamePhase::Start => self.start(),
                GamePhase::GameOver => self.restart(),
                _ => return false,
            },
            _ => return false,
        }
        true
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        log::info!("Idle mode: {enabled}");
        self.session.set_autopilot(enabled);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.resize(Viewport::new(width, height));
    }

    /// Run one frame, play its sounds and return its events as JSON.
    /// `now_ms` is the wall clock (`Date.now()`); it stamps the result sent
    /// to Telegram.
    pub fn advance(&mut self, now_ms: f64, delta_ms: f32) -> String {
        let events = self.session.advance(now_ms, delta_ms);
        self.audio.play_events(&events);
        to_json(&events)
    }

    pub fn snapshot(&self) -> String {
        to_json(&self.session.snapshot())
    }

    /// "start", "playing", "paused" or "gameOver"
    pub fn phase(&self) -> String {
        to_json(&self.session.phase()).trim_matches('"').to_string()
    }

    /// Reward ladder against the best score
    pub fn rewards(&self) -> String {
        to_json(&Rewards::statuses(self.session.state().best_score))
    }

    pub fn share_text(&self) -> String {
        telegram::share_text(self.session.state().score)
    }

    pub fn sound_enabled(&self) -> bool {
        self.settings.sound_enabled
    }

    pub fn toggle_sound(&mut self) -> bool {
        let enabled = self.settings.toggle_sound();
        self.store_settings();
        enabled
    }

    pub fn volume(&self) -> f32 {
        self.settings.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.settings.set_volume(volume);
        self.store_settings();
    }

    fn store_settings(&mut self) {
        self.settings.save(&mut self.settings_storage);
        self.audio.apply_settings(&self.settings);
    }
}
