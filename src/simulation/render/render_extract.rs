use crate::core::dispatch::dispatch_mut;
use crate::domain::particle::RENDER_STRIDE;

use super::SimulationCore;

/// Pack `[x, y, vx, vy, size, temperature, collisions]` per particle into
/// the reusable transfer buffer. Returns the number of floats written.
pub(super) fn extract_particles(sim: &mut SimulationCore) -> usize {
    let len = sim.particles.len() * RENDER_STRIDE;
    let buffer = &mut sim.render.particles;
    // May reallocate; hosts re-read the pointer after every call
    if buffer.len() != len {
        buffer.resize(len, 0.0);
    }

    let particles = &sim.particles;
    dispatch_mut(buffer.as_mut_slice(), |k, out| {
        let p = &particles[k / RENDER_STRIDE];
        *out = match k % RENDER_STRIDE {
            0 => p.position.x,
            1 => p.position.y,
            2 => p.velocity.x,
            3 => p.velocity.y,
            4 => p.size,
            5 => p.temperature,
            _ => p.collision_count as f32,
        };
    });
    len
}
