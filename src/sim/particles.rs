//! Fading hit circles
//!
//! A particle never stores its own fade. Opacity is derived from its age on
//! every read, and fully faded particles are culled by the per-frame snapshot.

use std::ops::RangeInclusive;

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::consts::{PARTICLE_LIFE_MS, SPAWN_MARGIN};
use crate::settings::Color;

/// A circle spawned by a hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Stage-local centre
    pub pos: Vec2,
    /// Always positive
    pub radius: f32,
    pub color: Color,
    /// Clock time (ms) the hit happened
    pub created_at: f64,
}

impl Particle {
    /// Opacity in [0, 1]: 1 when fresh, 0 once `PARTICLE_LIFE_MS` has passed
    pub fn opacity(&self, now: f64) -> f32 {
        let age = now - self.created_at;
        (1.0 - age / PARTICLE_LIFE_MS).clamp(0.0, 1.0) as f32
    }
}

/// What the renderer gets for one live particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
    pub opacity: f32,
}

/// Owns every live particle
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a particle at `pos` with a random radius and colour.
    ///
    /// Returns `None` (and spawns nothing) for an empty palette or a size range
    /// that is not positive and ordered; validated configs never hit this.
    pub fn add<R: Rng + ?Sized>(
        &mut self,
        pos: Vec2,
        radius_range: RangeInclusive<f32>,
        palette: &[Color],
        now: f64,
        rng: &mut R,
    ) -> Option<&Particle> {
        let (min, max) = (*radius_range.start(), *radius_range.end());
        if !(min > 0.0 && min <= max) {
            log::warn!("Refusing particle with size range {}..={}", min, max);
            return None;
        }
        let Some(&color) = palette.choose(rng) else {
            log::warn!("Refusing particle with empty palette");
            return None;
        };

        self.particles.push(Particle {
            pos,
            radius: rng.random_range(radius_range),
            color,
            created_at: now,
        });
        self.particles.last()
    }

    /// Drop faded particles, then yield every remaining one with its opacity
    pub fn snapshot(&mut self, now: f64) -> impl Iterator<Item = ParticleView> + '_ {
        let before = self.particles.len();
        self.particles.retain(|p| p.opacity(now) > 0.0);
        let culled = before - self.particles.len();
        if culled > 0 {
            log::trace!("Culled {} faded particles", culled);
        }

        self.particles.iter().map(move |p| ParticleView {
            pos: p.pos,
            radius: p.radius,
            color: p.color,
            opacity: p.opacity(now),
        })
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Raw particles, faded ones included until the next snapshot
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}

/// Uniformly random point on a `stage`-sized area, kept `SPAWN_MARGIN` from
/// the edges (less on stages too small for the full margin). Negative or
/// non-finite extents collapse to zero.
pub fn random_position<R: Rng + ?Sized>(stage: Vec2, rng: &mut R) -> Vec2 {
    let axis = |extent: f32, rng: &mut R| {
        let extent = if extent.is_finite() { extent.max(0.0) } else { 0.0 };
        let margin = SPAWN_MARGIN.min(extent / 2.0);
        rng.random_range(margin..=extent - margin)
    };
    let x = axis(stage.x, &mut *rng);
    let y = axis(stage.y, &mut *rng);
    Vec2::new(x, y)
}
