use crate::core::error::{try_with, ConfigError, SimResult};
use crate::domain::config::MAX_PARTICLES;
use crate::domain::particle::{Particle, ParticleSeed};

use super::init::{build_ensemble, install};
use super::SimulationCore;

/// Replace the ensemble with caller-placed particles.
///
/// Any count in 1..=MAX_PARTICLES is accepted. Every seed must sit inside
/// the domain with a finite velocity and a finite positive size. The
/// configured particle count is left as is; `reseed` keeps the new count.
pub(super) fn load_particles(sim: &mut SimulationCore, seeds: &[ParticleSeed]) -> SimResult<()> {
    if seeds.is_empty() || seeds.len() > MAX_PARTICLES as usize {
        return Err(ConfigError::ParticleCount {
            requested: seeds.len().min(u32::MAX as usize) as u32,
            min: 1,
            max: MAX_PARTICLES,
        }
        .into());
    }

    let bounds = sim.config.bounds;
    for (index, seed) in seeds.iter().enumerate() {
        let reason = if !seed.position.is_finite() || !bounds.contains(seed.position) {
            Some(format!("position {} outside the domain", seed.position))
        } else if !seed.velocity.is_finite() {
            Some(format!("velocity {} is not finite", seed.velocity))
        } else if !seed.size.is_finite() || seed.size <= 0.0 {
            Some(format!("size {} must be finite and > 0", seed.size))
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(ConfigError::InvalidParticle { index, reason }.into());
        }
    }

    let particles = try_with("particles", seeds.len(), |i| Particle::from(seeds[i]))?;
    let ensemble = build_ensemble(particles, &bounds)?;
    install(sim, ensemble);

    log::info!("loaded {} explicit particles", seeds.len());
    Ok(())
}
