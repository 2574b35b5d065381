//! Error types
//!
//! Only configuration and name validation are surfaced to callers. Storage
//! failures are reported by backends but swallowed by the leaderboard store.

use thiserror::Error;

/// Rejected configuration. Reported before any session starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("session duration must be positive, got {0}s")]
    NonPositiveDuration(u32),

    #[error("duration {selected}s is not one of the offered options {offered:?}")]
    DurationNotOffered { selected: u32, offered: Vec<u32> },

    #[error("particle size must be positive, got min {min} / max {max}")]
    NonPositiveSize { min: f32, max: f32 },

    #[error("particle size range is inverted: min {min} > max {max}")]
    InvertedSizeRange { min: f32, max: f32 },

    #[error("colour palette is empty")]
    EmptyPalette,

    #[error("invalid colour {0:?}, expected #RRGGBB")]
    InvalidColor(String),

    #[error("stage must have a positive, finite size, got {width} x {height}")]
    InvalidStage { width: f32, height: f32 },
}

/// The leaderboard backend could not load or save a bucket.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable")]
    Unavailable,

    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed stored data: {0}")]
    Serde(#[from] serde_json::Error),
}

/// A score could not be saved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("player name is empty")]
    EmptyName,

    #[error("no finished session to save")]
    NoFinishedSession,
}
