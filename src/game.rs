//! Game composition
//!
//! Wires the session controller, the leaderboards and the settings together
//! for a host loop. The host forwards input, calls `tick` from its timer and
//! `snapshot` from its frame callback, and reacts to drained events.

use glam::Vec2;
use rand::Rng;

use crate::consts::LEADERBOARD_VIEW_LEN;
use crate::error::{ConfigError, EntryError};
use crate::highscores::{LeaderRow, LeaderboardStore, ScoreEntry, leaderboard_rows};
use crate::hud::HudReadout;
use crate::persistence::LeaderboardBackend;
use crate::platform::{Clock, InputEvent};
use crate::settings::{Settings, check_stage};
use crate::sim::{Generation, ParticleView, SessionController, SessionEvent, SessionPhase};

pub struct Game<C: Clock, R: Rng, B: LeaderboardBackend> {
    session: SessionController<C, R>,
    leaderboard: LeaderboardStore<B>,
    settings: Settings,
}

impl<C: Clock, R: Rng, B: LeaderboardBackend> Game<C, R, B> {
    /// Fails if `settings` do not validate or `stage` is not a positive,
    /// finite size
    pub fn new(
        settings: Settings,
        clock: C,
        rng: R,
        backend: B,
        stage: Vec2,
    ) -> Result<Self, ConfigError> {
        let config = settings.validate()?;
        let stage = check_stage(stage)?;
        Ok(Self {
            session: SessionController::new(config, clock, rng, stage),
            leaderboard: LeaderboardStore::new(backend),
            settings,
        })
    }

    /// Validate and adopt new settings. The duration takes effect for the
    /// next session; on error nothing changes.
    pub fn apply_settings(&mut self, settings: Settings) -> Result<(), ConfigError> {
        let config = settings.validate()?;
        self.session.configure(config);
        self.settings = settings;
        Ok(())
    }

    /// Feed a raw input event. Returns whether it produced a scoring hit.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event.to_hit() {
            Some(hit) => self.session.register_hit(hit.position),
            None => false,
        }
    }

    pub fn hit(&mut self, position: Option<Vec2>) -> bool {
        self.session.register_hit(position)
    }

    pub fn start(&mut self) {
        self.session.start();
    }

    pub fn pause(&mut self) {
        self.session.pause();
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Stage resized; a bad size keeps the old one
    pub fn set_stage(&mut self, stage: Vec2) -> Result<(), ConfigError> {
        self.session.set_stage(stage)
    }

    /// Timer driver entry point, using the clock's current time
    pub fn tick(&mut self) {
        let now = self.session.now();
        self.session.tick(now);
    }

    /// Timer driver entry point for a tick scheduled under `generation`
    pub fn tick_for(&mut self, generation: Generation, now: f64) {
        self.session.tick_for(generation, now);
    }

    /// Render driver entry point: live circles at the clock's current time
    pub fn snapshot(&mut self) -> impl Iterator<Item = ParticleView> + '_ {
        let now = self.session.now();
        self.session.particles_mut().snapshot(now)
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.session.drain_events().collect()
    }

    pub fn hud(&self) -> HudReadout {
        HudReadout::new(self.session.state(), self.session.current_rate())
    }

    /// Save the finished session's score under `name`.
    ///
    /// Returns the leaderboard rank, or `Ok(None)` if the score did not place.
    pub fn save_score(&mut self, name: &str, timestamp: f64) -> Result<Option<usize>, EntryError> {
        let result = self
            .session
            .final_score()
            .ok_or(EntryError::NoFinishedSession)?;
        self.record(name, result.hit_count, result.duration_secs, timestamp)
    }

    /// Save the current hit count at any point, finished or not
    pub fn save_current_score(
        &mut self,
        name: &str,
        timestamp: f64,
    ) -> Result<Option<usize>, EntryError> {
        let score = self.session.hit_count();
        let duration_secs = self.session.config().duration_secs();
        self.record(name, score, duration_secs, timestamp)
    }

    /// Rank the finished session would get if saved now
    pub fn potential_rank(&self) -> Option<usize> {
        let result = self.session.final_score()?;
        self.leaderboard
            .potential_rank(result.duration_secs, result.hit_count)
    }

    /// Sidebar rows for the currently selected duration
    pub fn leaderboard_rows(&self) -> Vec<LeaderRow> {
        let entries = self
            .leaderboard
            .top_n(self.settings.duration_secs, LEADERBOARD_VIEW_LEN);
        leaderboard_rows(&entries)
    }

    /// Name to pre-fill in the save prompt
    pub fn suggested_name(&self) -> Option<&str> {
        self.settings.last_player.as_deref()
    }

    pub fn is_finished(&self) -> bool {
        self.session.phase() == SessionPhase::Finished
    }

    pub fn session(&self) -> &SessionController<C, R> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionController<C, R> {
        &mut self.session
    }

    pub fn leaderboard(&self) -> &LeaderboardStore<B> {
        &self.leaderboard
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn record(
        &mut self,
        name: &str,
        score: u32,
        duration_secs: u32,
        timestamp: f64,
    ) -> Result<Option<usize>, EntryError> {
        let entry = ScoreEntry::new(name, score, timestamp)?;
        self.settings.remember_player(&entry.name);
        let rank = self.leaderboard.insert(duration_secs, entry);
        match rank {
            Some(rank) => log::info!("Saved {} hits ({}s) at rank #{}", score, duration_secs, rank),
            None => log::info!("Saved {} hits ({}s), outside the top scores", score, duration_secs),
        }
        Ok(rank)
    }
}
