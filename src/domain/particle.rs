//! Particle records
//!
//! The particle ensemble is split into two same-length arrays indexed by
//! particle id: `Particle` holds the committed state every kernel may read,
//! `StagedParticle` holds the next state each kernel writes only for its own
//! index. Commit copies staged into committed in one pass. Keeping them in
//! separate buffers means no kernel can read another particle's next fields.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Committed per-particle state (stable index = identity)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Collision radius; constant for the particle's lifetime
    pub size: f32,
    /// Visual only, heated by impacts
    pub temperature: f32,
    /// Overlaps found in the last tick
    pub collision_count: i32,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, size: f32) -> Self {
        Self {
            position,
            velocity,
            size,
            temperature: 0.0,
            collision_count: 0,
        }
    }
}

/// Write-only scratch for the tick in flight
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StagedParticle {
    pub next_position: Vec2,
    pub next_velocity: Vec2,
    pub temperature: f32,
    pub collision_count: i32,
}

impl StagedParticle {
    /// Staged state equal to the committed state (a no-op commit)
    pub fn from_committed(p: &Particle) -> Self {
        Self {
            next_position: p.position,
            next_velocity: p.velocity,
            temperature: p.temperature,
            collision_count: p.collision_count,
        }
    }
}

/// Caller-supplied particle for explicit placement
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleSeed {
    pub position: Vec2,
    #[serde(default)]
    pub velocity: Vec2,
    pub size: f32,
}

impl ParticleSeed {
    pub fn new(position: Vec2, velocity: Vec2, size: f32) -> Self {
        Self { position, velocity, size }
    }

    pub fn at_rest(x: f32, y: f32, size: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::ZERO, size)
    }
}

impl From<ParticleSeed> for Particle {
    fn from(seed: ParticleSeed) -> Self {
        Particle::new(seed.position, seed.velocity, seed.size)
    }
}

/// Floats per particle in the packed render buffer:
/// x, y, vx, vy, size, temperature, collisions
pub const RENDER_STRIDE: usize = 7;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_copy_is_identity() {
        let mut p = Particle::new(Vec2::new(0.1, -0.2), Vec2::new(1.0, 2.0), 0.01);
        p.temperature = 3.0;
        p.collision_count = 2;
        let s = StagedParticle::from_committed(&p);
        assert_eq!(s.next_position, p.position);
        assert_eq!(s.next_velocity, p.velocity);
        assert_eq!(s.temperature, 3.0);
        assert_eq!(s.collision_count, 2);
    }

    #[test]
    fn seed_json_defaults_velocity() {
        let seed: ParticleSeed =
            serde_json::from_str(r#"{"position":[0.5,-0.5],"size":0.02}"#).unwrap();
        assert_eq!(seed.velocity, Vec2::ZERO);
        assert_eq!(seed.position, Vec2::new(0.5, -0.5));
    }
}
