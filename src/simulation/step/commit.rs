use crate::core::dispatch::dispatch_zip_mut;
use crate::domain::particle::{Particle, StagedParticle};

/// Move every staged record into the committed array (one kernel per particle)
///
/// Runs as a single dispatch after integration, so readers of the next tick
/// see either none or all of the new state. The staged slot is left equal to
/// the committed one.
pub(super) fn commit(particles: &mut [Particle], staged: &mut [StagedParticle]) {
    dispatch_zip_mut(particles, staged, |_, p, s| {
        p.position = s.next_position;
        p.velocity = s.next_velocity;
        p.temperature = s.temperature;
        p.collision_count = s.collision_count;
        *s = StagedParticle::from_committed(p);
    });
}
