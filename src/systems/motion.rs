//! Motion Integrator - fluid coupling, explicit step, boundary policy

use glam::Vec2;

use crate::core::dispatch::dispatch_mut;
use crate::domain::bounds::{BoundaryPolicy, DomainBounds};
use crate::domain::particle::{Particle, StagedParticle};

use super::fluid::FluidField;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionParams {
    /// Already clamped and scaled by the simulation speed
    pub dt: f32,
    pub fluid_coupling: f32,
    pub max_speed: f32,
    pub boundary: BoundaryPolicy,
    pub restitution: f32,
}

/// One kernel per particle: reads the committed position and the resolved
/// `next_velocity`, writes `next_position` and the final `next_velocity`.
pub fn integrate(
    particles: &[Particle],
    fluid: &FluidField,
    staged: &mut [StagedParticle],
    params: &MotionParams,
) {
    assert_eq!(particles.len(), staged.len(), "integrate: staged length mismatch");
    let bounds = *fluid.bounds();

    dispatch_mut(staged, |i, out| {
        let position = particles[i].position;
        let ambient = fluid.sample_clamped(position) * params.fluid_coupling;
        let velocity = (out.next_velocity + ambient).clamp_length_max(params.max_speed);

        let (next_position, next_velocity) =
            apply_boundary(position + velocity * params.dt, velocity, &bounds, params);
        out.next_position = next_position;
        out.next_velocity = next_velocity;
    });
}

/// Bring `position` back inside `bounds` under the configured policy.
///
/// A non-finite position resets to the domain centre at rest.
pub fn apply_boundary(
    position: Vec2,
    velocity: Vec2,
    bounds: &DomainBounds,
    params: &MotionParams,
) -> (Vec2, Vec2) {
    if !position.is_finite() || !velocity.is_finite() {
        return (bounds.center(), Vec2::ZERO);
    }

    match params.boundary {
        BoundaryPolicy::Reflect => {
            let e = params.restitution;
            let (x, vx) = reflect_axis(position.x, velocity.x, bounds.min.x, bounds.max.x, e);
            let (y, vy) = reflect_axis(position.y, velocity.y, bounds.min.y, bounds.max.y, e);
            (Vec2::new(x, y), Vec2::new(vx, vy))
        }
        BoundaryPolicy::Wrap => {
            let x = wrap_axis(position.x, bounds.min.x, bounds.max.x);
            let y = wrap_axis(position.y, bounds.min.y, bounds.max.y);
            (Vec2::new(x, y), velocity)
        }
    }
}

#[inline]
fn reflect_axis(p: f32, v: f32, min: f32, max: f32, restitution: f32) -> (f32, f32) {
    if p < min {
        ((min + (min - p)).min(max), -v * restitution)
    } else if p > max {
        ((max - (p - max)).max(min), -v * restitution)
    } else {
        (p, v)
    }
}

#[inline]
fn wrap_axis(p: f32, min: f32, max: f32) -> f32 {
    if p >= min && p <= max {
        return p;
    }
    let extent = max - min;
    let wrapped = min + (p - min).rem_euclid(extent);
    // rem_euclid may round up to exactly `extent`
    wrapped.clamp(min, max)
}
