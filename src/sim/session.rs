//! Session controller
//!
//! Drives Idle -> Running <-> Paused -> Finished. Every operation is safe to
//! call in any phase; calls that make no sense for the current phase are
//! ignored, since timers and input handlers cannot guarantee ordering.
//!
//! Elapsed time is derived from the clock, not accumulated per tick, so the
//! controller is exact at any tick cadence, including one very late tick.

use glam::Vec2;
use rand::Rng;

use super::particles::{ParticleStore, random_position};
use super::state::{FinalScore, Generation, SessionEvent, SessionPhase, SessionState};
use crate::error::ConfigError;
use crate::platform::Clock;
use crate::settings::{SessionConfig, check_stage};

/// Owns one player's session and the circles it spawns
pub struct SessionController<C: Clock, R: Rng> {
    clock: C,
    rng: R,
    /// Config of the current session
    config: SessionConfig,
    /// Config staged while a session is underway, applied on reset
    pending: Option<SessionConfig>,
    state: SessionState,
    /// Clock time the session would have started had it never paused
    started_at: f64,
    /// Elapsed time captured by the last pause
    paused_elapsed: f64,
    generation: Generation,
    /// Stage size used for randomly placed circles
    stage: Vec2,
    particles: ParticleStore,
    events: Vec<SessionEvent>,
    result: Option<FinalScore>,
}

impl<C: Clock, R: Rng> SessionController<C, R> {
    pub fn new(config: SessionConfig, clock: C, rng: R, stage: Vec2) -> Self {
        Self {
            clock,
            rng,
            state: SessionState::new(config.duration_ms()),
            config,
            pending: None,
            started_at: 0.0,
            paused_elapsed: 0.0,
            generation: Generation::default(),
            stage,
            particles: ParticleStore::new(),
            events: Vec::new(),
            result: None,
        }
    }

    /// Register one hit. Starts the session if idle and resumes it if paused.
    ///
    /// A circle is spawned in every phase; the hit only counts towards the
    /// score while the session is running. Once finished, the count is the
    /// final score the save prompt and `potential_rank` were shown, so later
    /// presses stay visual only until reset. Returns whether it counted.
    pub fn register_hit(&mut self, position: Option<Vec2>) -> bool {
        let now = self.clock.now();
        match self.state.phase {
            SessionPhase::Idle => self.begin(now),
            SessionPhase::Paused => self.resume(now),
            SessionPhase::Running => self.advance(now),
            SessionPhase::Finished => {}
        }

        let counted = self.state.phase == SessionPhase::Running;
        if counted {
            self.state.hit_count += 1;
        }

        let pos = position.unwrap_or_else(|| random_position(self.stage, &mut self.rng));
        self.particles.add(
            pos,
            self.config.size_range(),
            self.config.palette(),
            now,
            &mut self.rng,
        );

        counted
    }

    /// Start from idle, or resume from pause
    pub fn start(&mut self) {
        let now = self.clock.now();
        match self.state.phase {
            SessionPhase::Idle => self.begin(now),
            SessionPhase::Paused => self.resume(now),
            phase => log::debug!("start ignored while {:?}", phase),
        }
    }

    /// Freeze the timer, keeping elapsed time for the resume
    pub fn pause(&mut self) {
        if self.state.phase != SessionPhase::Running {
            log::debug!("pause ignored while {:?}", self.state.phase);
            return;
        }
        let now = self.clock.now();
        // Time may already be up even though no tick has noticed yet
        self.advance(now);
        if self.state.phase != SessionPhase::Running {
            return;
        }

        self.paused_elapsed = self.state.elapsed_ms;
        self.state.phase = SessionPhase::Paused;
        self.events.push(SessionEvent::Paused);
        log::debug!("Session paused at {:.0}ms", self.paused_elapsed);
    }

    /// Back to idle: clears hits, elapsed time, circles, and any final score.
    ///
    /// Bumps the generation so timer ticks scheduled before the reset are ignored.
    pub fn reset(&mut self) {
        if let Some(config) = self.pending.take() {
            self.config = config;
        }
        self.state = SessionState::new(self.config.duration_ms());
        self.started_at = 0.0;
        self.paused_elapsed = 0.0;
        self.particles.clear();
        self.result = None;
        self.generation = self.generation.next();
        self.events.push(SessionEvent::Reset);
        log::debug!("Session reset (generation {})", self.generation.0);
    }

    /// Timer callback: update elapsed time and finish when time is up.
    /// Ignored unless running.
    pub fn tick(&mut self, now: f64) {
        if self.state.phase == SessionPhase::Running {
            self.advance(now);
        }
    }

    /// Timer callback carrying the generation it was scheduled under
    pub fn tick_for(&mut self, generation: Generation, now: f64) {
        if generation != self.generation {
            log::debug!(
                "Dropping stale tick (generation {} != {})",
                generation.0,
                self.generation.0
            );
            return;
        }
        self.tick(now);
    }

    /// Hits per second so far, 0 before any time has elapsed
    pub fn current_rate(&self) -> f64 {
        if self.state.elapsed_ms > 0.0 {
            f64::from(self.state.hit_count) / (self.state.elapsed_ms / 1000.0)
        } else {
            0.0
        }
    }

    /// Use `config` for the next session. Applies immediately when idle,
    /// otherwise on the next reset so a running session keeps its duration.
    pub fn configure(&mut self, config: SessionConfig) {
        if self.state.phase == SessionPhase::Idle {
            self.state.duration_ms = config.duration_ms();
            self.config = config;
            self.pending = None;
        } else {
            self.pending = Some(config);
        }
    }

    /// Resize the spawn area. A non-finite or non-positive size is rejected
    /// and the previous stage kept.
    pub fn set_stage(&mut self, stage: Vec2) -> Result<(), ConfigError> {
        self.stage = check_stage(stage)?;
        Ok(())
    }

    pub fn stage(&self) -> Vec2 {
        self.stage
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, SessionEvent> {
        self.events.drain(..)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn hit_count(&self) -> u32 {
        self.state.hit_count
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.state.elapsed_ms
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Set once the session finishes, cleared by reset
    pub fn final_score(&self) -> Option<FinalScore> {
        self.result
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn particles(&self) -> &ParticleStore {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut ParticleStore {
        &mut self.particles
    }

    /// Current time on the injected clock
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    fn begin(&mut self, now: f64) {
        self.state.duration_ms = self.config.duration_ms();
        self.state.elapsed_ms = 0.0;
        self.started_at = now;
        self.paused_elapsed = 0.0;
        self.state.phase = SessionPhase::Running;
        self.events.push(SessionEvent::Started);
        log::debug!(
            "Session started ({}s, generation {})",
            self.config.duration_secs(),
            self.generation.0
        );
    }

    fn resume(&mut self, now: f64) {
        self.started_at = now - self.paused_elapsed;
        self.state.phase = SessionPhase::Running;
        self.events.push(SessionEvent::Resumed);
        log::debug!("Session resumed at {:.0}ms", self.paused_elapsed);
    }

    fn advance(&mut self, now: f64) {
        let elapsed = (now - self.started_at).max(0.0);
        if elapsed < self.state.duration_ms {
            self.state.elapsed_ms = elapsed;
            return;
        }

        self.state.elapsed_ms = self.state.duration_ms;
        self.state.phase = SessionPhase::Finished;
        let score = FinalScore {
            hit_count: self.state.hit_count,
            duration_secs: self.config.duration_secs(),
        };
        self.result = Some(score);
        self.events.push(SessionEvent::Finished(score));
        log::info!(
            "Time up: {} hits in {}s",
            score.hit_count,
            score.duration_secs
        );
    }
}
