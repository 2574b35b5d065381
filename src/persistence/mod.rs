//! Leaderboard persistence
//!
//! Backends store one list of entries per duration bucket. They only move
//! bytes; ordering and the size cap are enforced by
//! [`LeaderboardBucket`](crate::highscores::LeaderboardBucket) on load, so
//! every backend ends up with the same ranking.
//!
//! Features:
//! - In-memory backend (tests, headless runs)
//! - JSON directory backend with atomic replace (native)
//! - LocalStorage backend (web)
//! - Mirrored fan-out decorator over any two backends

use std::collections::HashMap;

use crate::error::StorageError;
use crate::highscores::ScoreEntry;

#[cfg(not(target_arch = "wasm32"))]
pub mod json_dir;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;
pub mod mirrored;

#[cfg(not(target_arch = "wasm32"))]
pub use json_dir::JsonDirBackend;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageBackend;
pub use mirrored::Mirrored;

/// Key-value storage for leaderboard buckets
pub trait LeaderboardBackend {
    /// Entries stored for `duration_secs`; an unknown bucket is empty, not an error
    fn load(&self, duration_secs: u32) -> Result<Vec<ScoreEntry>, StorageError>;

    /// Replace the entries stored for `duration_secs`
    fn save(&mut self, duration_secs: u32, entries: &[ScoreEntry]) -> Result<(), StorageError>;
}

/// Storage key / file stem of a bucket
pub fn bucket_key(duration_secs: u32) -> String {
    format!("leader_{}", duration_secs)
}

/// Buckets kept in process memory
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    buckets: HashMap<u32, Vec<ScoreEntry>>,
    available: bool,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            buckets: HashMap::new(),
            available: true,
        }
    }

    /// Simulate an outage: while unavailable every load and save fails
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }
}

impl LeaderboardBackend for MemoryBackend {
    fn load(&self, duration_secs: u32) -> Result<Vec<ScoreEntry>, StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        Ok(self.buckets.get(&duration_secs).cloned().unwrap_or_default())
    }

    fn save(&mut self, duration_secs: u32, entries: &[ScoreEntry]) -> Result<(), StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        self.buckets.insert(duration_secs, entries.to_vec());
        Ok(())
    }
}
