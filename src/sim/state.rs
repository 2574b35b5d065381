//! Session state and events
//!
//! Plain data observed by the HUD and the game-over flow. Mutated only by
//! [`SessionController`](super::SessionController).

use serde::{Deserialize, Serialize};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Nothing started yet (or just reset); the first hit starts the timer
    #[default]
    Idle,
    /// Timer running
    Running,
    /// Timer frozen, elapsed time kept
    Paused,
    /// Time is up; score is final
    Finished,
}

/// Observable session numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: SessionPhase,
    /// Hits counted this session
    pub hit_count: u32,
    /// Elapsed play time (ms), frozen while paused, capped at `duration_ms`
    pub elapsed_ms: f64,
    /// Session length (ms), fixed when the session starts
    pub duration_ms: f64,
}

impl SessionState {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            phase: SessionPhase::Idle,
            hit_count: 0,
            elapsed_ms: 0.0,
            duration_ms,
        }
    }

    /// Time left on the clock (ms)
    pub fn remaining_ms(&self) -> f64 {
        (self.duration_ms - self.elapsed_ms).max(0.0)
    }
}

/// Result handed to the leaderboard when time runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScore {
    pub hit_count: u32,
    /// Leaderboard bucket key
    pub duration_secs: u32,
}

/// Things that happened during a controller call, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    Started,
    Paused,
    Resumed,
    Finished(FinalScore),
    Reset,
}

/// Identifies one session between resets. Timer callbacks carry the
/// generation they were scheduled for and are dropped if it is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}
