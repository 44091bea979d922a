//! Collision Resolver - owner-computes pairwise response over the 3x3 block
//!
//! One kernel per particle. The owner `i` walks the chains of its cell and
//! the eight neighbours, and for each overlapping `j` updates only its own
//! staged velocity. `j` computes its side of the same pair when it is the
//! owner. Committed state is read-only here; nothing is accumulated across
//! particles.

use glam::Vec2;

use crate::core::dispatch::dispatch_mut;
use crate::domain::particle::{Particle, StagedParticle};
use crate::spatial::BucketGrid;

/// Below this centre distance a pair counts as coincident
const COINCIDENT_EPSILON: f32 = 1.0e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionParams {
    /// Push-apart speed at full overlap
    pub separation_speed: f32,
    pub heat_per_impact: f32,
    /// Fraction of temperature lost per tick
    pub cooling_rate: f32,
}

/// Fill `staged` from the committed `particles` using the current buckets.
///
/// Particles without overlaps get `next_velocity = velocity` and a zero
/// collision count. Panics if the three lengths disagree.
pub fn resolve(
    particles: &[Particle],
    buckets: &BucketGrid,
    staged: &mut [StagedParticle],
    params: &CollisionParams,
) {
    assert_eq!(particles.len(), staged.len(), "resolve: staged length mismatch");
    assert_eq!(
        particles.len(),
        buckets.particle_capacity(),
        "resolve: buckets built for a different ensemble"
    );
    let grid = buckets.grid();

    dispatch_mut(staged, |i, out| {
        let owner = &particles[i];
        let mut velocity = owner.velocity;
        let mut hits = 0i32;
        let mut heat = 0.0f32;

        let (cx, cy) = grid.cell_coords(owner.position);
        for cell in grid.neighborhood(cx, cy) {
            for j in buckets.chain(cell) {
                if j == i {
                    continue;
                }
                let other = &particles[j];
                if let Some(delta) = pair_response(i, owner, velocity, j, other, params) {
                    velocity += delta;
                    heat += delta.length();
                    hits += 1;
                }
            }
        }

        let cooled = owner.temperature * (1.0 - params.cooling_rate);
        *out = StagedParticle {
            next_position: owner.position,
            next_velocity: velocity,
            temperature: cooled + heat * params.heat_per_impact,
            collision_count: hits,
        };
    });
}

/// Velocity change of owner `i` (currently moving at `velocity`) from its
/// contact with `j`, or `None` when they do not overlap.
///
/// Masses go as size². An approaching pair exchanges normal momentum
/// elastically; every overlapping pair also gets a separation term
/// proportional to the penetration depth.
pub fn pair_response(
    i: usize,
    owner: &Particle,
    velocity: Vec2,
    j: usize,
    other: &Particle,
    params: &CollisionParams,
) -> Option<Vec2> {
    let contact = owner.size + other.size;
    let offset = other.position - owner.position;
    let dist_sq = offset.length_squared();
    if !(dist_sq < contact * contact) {
        return None;
    }

    let dist = dist_sq.sqrt();
    // normal points from owner to other
    let normal = if dist > COINCIDENT_EPSILON {
        offset / dist
    } else if i < j {
        Vec2::X
    } else {
        Vec2::NEG_X
    };

    let mut delta = Vec2::ZERO;

    let vi = velocity.dot(normal);
    let vj = other.velocity.dot(normal);
    if vi > vj {
        let mi = owner.size * owner.size;
        let mj = other.size * other.size;
        let total = mi + mj;
        if total > 0.0 {
            let vi_after = ((mi - mj) * vi + 2.0 * mj * vj) / total;
            delta += normal * (vi_after - vi);
        }
    }

    if contact > 0.0 {
        let penetration = contact - dist;
        delta -= normal * params.separation_speed * (penetration / contact);
    }

    Some(delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bounds::DomainBounds;
    use crate::spatial::CellGrid;

    fn params() -> CollisionParams {
        CollisionParams {
            separation_speed: 0.5,
            heat_per_impact: 0.5,
            cooling_rate: 0.0,
        }
    }

    fn run(particles: &[Particle]) -> Vec<StagedParticle> {
        let max_size = particles.iter().map(|p| p.size).fold(0.0, f32::max);
        let grid = CellGrid::for_particles(particles.len(), max_size, DomainBounds::unit());
        let mut buckets = BucketGrid::new(grid, particles.len()).unwrap();
        buckets.reset();
        buckets.scatter(particles);
        let mut staged = vec![StagedParticle::default(); particles.len()];
        resolve(particles, &buckets, &mut staged, &params());
        staged
    }

    #[test]
    fn resting_overlap_pushes_apart_symmetrically() {
        let particles = [
            Particle::new(Vec2::new(0.0, 0.0), Vec2::ZERO, 0.01),
            Particle::new(Vec2::new(0.001, 0.0), Vec2::ZERO, 0.01),
        ];
        let staged = run(&particles);
        assert_eq!(staged[0].collision_count, 1);
        assert_eq!(staged[1].collision_count, 1);
        assert!(staged[0].next_velocity.x < 0.0);
        assert!(staged[1].next_velocity.x > 0.0);
        assert!((staged[0].next_velocity + staged[1].next_velocity).length() < 1e-6);
    }

    #[test]
    fn head_on_equal_masses_swap_normal_velocity() {
        let mut p = params();
        p.separation_speed = 0.0;
        let a = Particle::new(Vec2::new(-0.005, 0.0), Vec2::new(1.0, 0.0), 0.01);
        let b = Particle::new(Vec2::new(0.005, 0.0), Vec2::new(-1.0, 0.0), 0.01);
        let da = pair_response(0, &a, a.velocity, 1, &b, &p).unwrap();
        let db = pair_response(1, &b, b.velocity, 0, &a, &p).unwrap();
        assert!((a.velocity + da - Vec2::new(-1.0, 0.0)).length() < 1e-6);
        assert!((b.velocity + db - Vec2::new(1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn receding_pair_only_separates() {
        let a = Particle::new(Vec2::new(-0.005, 0.0), Vec2::new(-1.0, 0.0), 0.01);
        let b = Particle::new(Vec2::new(0.005, 0.0), Vec2::new(1.0, 0.0), 0.01);
        let d = pair_response(0, &a, a.velocity, 1, &b, &params()).unwrap();
        // separation only: along -x, no elastic exchange
        assert!(d.x < 0.0 && d.x > -0.5);
    }

    #[test]
    fn coincident_pair_uses_index_ordered_normal() {
        let a = Particle::new(Vec2::ZERO, Vec2::ZERO, 0.01);
        let da = pair_response(0, &a, Vec2::ZERO, 1, &a, &params()).unwrap();
        let db = pair_response(1, &a, Vec2::ZERO, 0, &a, &params()).unwrap();
        assert!(da.x < 0.0 && db.x > 0.0);
        assert!(da.is_finite() && db.is_finite());
    }

    #[test]
    fn distant_particles_keep_their_velocity() {
        let particles = [
            Particle::new(Vec2::new(-0.5, 0.0), Vec2::new(0.1, 0.2), 0.01),
            Particle::new(Vec2::new(0.5, 0.0), Vec2::new(-0.3, 0.0), 0.01),
        ];
        let staged = run(&particles);
        assert_eq!(staged[0].next_velocity, Vec2::new(0.1, 0.2));
        assert_eq!(staged[0].collision_count, 0);
        assert_eq!(staged[1].next_velocity, Vec2::new(-0.3, 0.0));
        assert_eq!(staged[1].next_position, particles[1].position);
    }

    #[test]
    fn neighbours_across_a_cell_edge_are_found() {
        // 100 particles -> 10x10 grid of 0.2 cells; the pair straddles x = 0
        let mut particles: Vec<Particle> = (0..98)
            .map(|k| {
                let x = -0.9 + (k % 10) as f32 * 0.2;
                let y = -0.9 + (k / 10) as f32 * 0.2;
                Particle::new(Vec2::new(x, y), Vec2::ZERO, 0.001)
            })
            .collect();
        particles.push(Particle::new(Vec2::new(-0.004, 0.95), Vec2::ZERO, 0.005));
        particles.push(Particle::new(Vec2::new(0.004, 0.95), Vec2::ZERO, 0.005));
        let staged = run(&particles);
        assert_eq!(staged[98].collision_count, 1);
        assert_eq!(staged[99].collision_count, 1);
        assert!(staged[..98].iter().all(|s| s.collision_count == 0));
    }

    #[test]
    #[should_panic(expected = "different ensemble")]
    fn resolve_rejects_stale_buckets() {
        let particles = [
            Particle::new(Vec2::ZERO, Vec2::ZERO, 0.01),
            Particle::new(Vec2::ONE * 0.5, Vec2::ZERO, 0.01),
        ];
        let grid = CellGrid::new(2, 2, DomainBounds::unit());
        let buckets = BucketGrid::new(grid, 1).unwrap();
        let mut staged = vec![StagedParticle::default(); 2];
        resolve(&particles, &buckets, &mut staged, &params());
    }

    #[test]
    fn impacts_heat_and_time_cools() {
        let mut p = params();
        p.cooling_rate = 0.5;
        let mut particles = vec![
            Particle::new(Vec2::new(0.0, 0.0), Vec2::ZERO, 0.01),
            Particle::new(Vec2::new(0.5, 0.5), Vec2::ZERO, 0.01),
        ];
        particles[1].temperature = 2.0;
        let grid = CellGrid::for_particles(2, 0.01, DomainBounds::unit());
        let mut buckets = BucketGrid::new(grid, 2).unwrap();
        buckets.scatter(&particles);
        let mut staged = vec![StagedParticle::default(); 2];
        resolve(&particles, &buckets, &mut staged, &p);
        assert_eq!(staged[1].temperature, 1.0);
        assert_eq!(staged[0].temperature, 0.0);
    }
}
