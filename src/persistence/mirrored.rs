//! Fan-out decorator: one local store mirrored to a second (e.g. remote) one

use super::LeaderboardBackend;
use crate::error::StorageError;
use crate::highscores::ScoreEntry;

/// Writes go to both backends; reads prefer `primary` and fall back to `mirror`
#[derive(Debug, Clone, Default)]
pub struct Mirrored<P, M> {
    pub primary: P,
    pub mirror: M,
}

impl<P, M> Mirrored<P, M> {
    pub fn new(primary: P, mirror: M) -> Self {
        Self { primary, mirror }
    }
}

impl<P: LeaderboardBackend, M: LeaderboardBackend> LeaderboardBackend for Mirrored<P, M> {
    fn load(&self, duration_secs: u32) -> Result<Vec<ScoreEntry>, StorageError> {
        match self.primary.load(duration_secs) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                log::warn!("Primary leaderboard unavailable ({}), reading mirror", e);
                self.mirror.load(duration_secs)
            }
        }
    }

    /// Succeeds if at least one side stored the bucket
    fn save(&mut self, duration_secs: u32, entries: &[ScoreEntry]) -> Result<(), StorageError> {
        let primary = self.primary.save(duration_secs, entries);
        let mirror = self.mirror.save(duration_secs, entries);
        match (primary, mirror) {
            (Ok(()), Ok(())) => Ok(()),
            (Ok(()), Err(e)) => {
                log::warn!("Leaderboard mirror save failed: {}", e);
                Ok(())
            }
            (Err(e), Ok(())) => {
                log::warn!("Primary leaderboard save failed, mirror kept it: {}", e);
                Ok(())
            }
            (Err(e), Err(_)) => Err(e),
        }
    }
}
