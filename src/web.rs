//! Browser entry point
//!
//! A thin `wasm_bindgen` facade over [`Game`]. The host page owns the DOM,
//! canvas drawing and audio; it forwards events here, schedules the timer and
//! frame callbacks, and reads JSON back for display.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use wasm_bindgen::prelude::*;

use crate::game::Game;
use crate::persistence::LocalStorageBackend;
use crate::platform::{InputEvent, SystemClock};
use crate::settings::Settings;
use crate::sim::{Generation, ParticleView, SessionEvent};

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Circle Pop starting...");
}

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game<SystemClock, Pcg32, LocalStorageBackend>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(stage_width: f32, stage_height: f32) -> Result<WebGame, JsError> {
        let mut settings = Settings::load();
        if let Err(e) = settings.validate() {
            log::warn!("Stored settings rejected ({}), using defaults", e);
            settings = Settings {
                last_player: settings.last_player,
                ..Settings::default()
            };
        }

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(
            settings,
            SystemClock::new(),
            Pcg32::seed_from_u64(seed),
            LocalStorageBackend,
            Vec2::new(stage_width, stage_height),
        )
        .map_err(js_error)?;
        Ok(WebGame { game })
    }

    /// Keyboard event; returns whether it scored
    pub fn key_down(&mut self, code: &str, key: &str) -> bool {
        self.game.handle_input(&InputEvent::Key {
            code: code.to_string(),
            key: key.to_string(),
        })
    }

    /// Pointer press in client coordinates; returns whether it scored
    pub fn pointer_down(&mut self, client_x: f32, client_y: f32, stage_left: f32, stage_top: f32) -> bool {
        self.game.handle_input(&InputEvent::Pointer {
            client: Vec2::new(client_x, client_y),
            stage_origin: Vec2::new(stage_left, stage_top),
        })
    }

    pub fn start(&mut self) {
        self.game.start();
    }

    pub fn pause(&mut self) {
        self.game.pause();
    }

    pub fn reset(&mut self) {
        self.game.reset();
    }

    /// Session id for the timer callback to carry
    pub fn generation(&self) -> f64 {
        self.game.session().generation().0 as f64
    }

    /// Timer callback
    pub fn tick(&mut self, generation: f64) {
        let now = self.game.session().now();
        self.game.tick_for(Generation(generation as u64), now);
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), JsError> {
        self.game
            .set_stage(Vec2::new(width, height))
            .map_err(js_error)
    }

    /// Frame callback: live circles as JSON `[{pos, radius, color, opacity}]`
    pub fn snapshot_json(&mut self) -> Result<String, JsError> {
        let views: Vec<ParticleView> = self.game.snapshot().collect();
        serde_json::to_string(&views).map_err(js_error)
    }

    /// Events since the last call, as JSON
    pub fn events_json(&mut self) -> Result<String, JsError> {
        let events: Vec<SessionEvent> = self.game.drain_events();
        serde_json::to_string(&events).map_err(js_error)
    }

    pub fn hud_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.game.hud()).map_err(js_error)
    }

    pub fn leaderboard_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.game.leaderboard_rows()).map_err(js_error)
    }

    /// Save the finished session. Returns the rank, or nothing if unranked.
    pub fn save_score(&mut self, name: &str) -> Result<Option<u32>, JsError> {
        let rank = self
            .game
            .save_score(name, js_sys::Date::now())
            .map_err(js_error)?;
        self.save_settings();
        Ok(rank.map(|r| r as u32))
    }

    /// Save the current count without waiting for time to run out
    pub fn save_current_score(&mut self, name: &str) -> Result<Option<u32>, JsError> {
        let rank = self
            .game
            .save_current_score(name, js_sys::Date::now())
            .map_err(js_error)?;
        self.save_settings();
        Ok(rank.map(|r| r as u32))
    }

    pub fn potential_rank(&self) -> Option<u32> {
        self.game.potential_rank().map(|r| r as u32)
    }

    pub fn suggested_name(&self) -> Option<String> {
        self.game.suggested_name().map(str::to_string)
    }

    pub fn settings_json(&self) -> Result<String, JsError> {
        serde_json::to_string(self.game.settings()).map_err(js_error)
    }

    /// Replace settings from JSON; rejected settings leave the game unchanged
    pub fn apply_settings_json(&mut self, json: &str) -> Result<(), JsError> {
        let settings: Settings = serde_json::from_str(json).map_err(js_error)?;
        self.game.apply_settings(settings).map_err(js_error)?;
        self.save_settings();
        Ok(())
    }
}

impl WebGame {
    fn save_settings(&self) {
        if let Err(e) = self.game.settings().save() {
            log::warn!("Could not save settings: {}", e);
        }
    }
}
