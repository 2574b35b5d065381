//! Circle Pop - a timed spacebar reaction game
//!
//! Core modules:
//! - `sim`: Session state machine and the fading particle store
//! - `highscores`: Per-duration ranked leaderboards
//! - `persistence`: Pluggable leaderboard storage backends
//! - `platform`: Clock and input abstraction (browser/native)
//! - `settings`: Player-facing configuration, validated before a session starts
//! - `game`: Composition of the above for a host loop

pub mod error;
pub mod game;
pub mod highscores;
pub mod hud;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{ConfigError, EntryError, StorageError};
pub use game::Game;
pub use highscores::{LeaderboardBucket, LeaderboardStore, ScoreEntry};
pub use settings::{Color, SessionConfig, Settings};

/// Game configuration constants
pub mod consts {
    /// How long a circle takes to fade out completely (ms)
    pub const PARTICLE_LIFE_MS: f64 = 3000.0;
    /// Margin kept from the stage edge for randomly placed circles
    pub const SPAWN_MARGIN: f32 = 30.0;

    /// Timer driver cadence (ms)
    pub const TIMER_INTERVAL_MS: f64 = 80.0;

    /// Leaderboard entries retained per duration bucket
    pub const MAX_HIGH_SCORES: usize = 50;
    /// Entries shown in the sidebar leaderboard
    pub const LEADERBOARD_VIEW_LEN: usize = 5;
    /// Ranks that get a trophy in the leaderboard view
    pub const TROPHY_RANKS: usize = 3;
}
