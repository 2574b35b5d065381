//! Session simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes from an injected clock or explicit timestamps
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod particles;
pub mod session;
pub mod state;

pub use particles::{Particle, ParticleStore, ParticleView, random_position};
pub use session::SessionController;
pub use state::{FinalScore, Generation, SessionEvent, SessionPhase, SessionState};
