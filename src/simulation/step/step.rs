use crate::core::dispatch::dispatch_reduce;
use crate::domain::particle::{Particle, StagedParticle};
use crate::systems::collision::{self, CollisionParams};
use crate::systems::fluid::{orbit_time, FluidStep, ForceParams};
use crate::systems::motion::{self, MotionParams};

use super::commit::commit;
use super::{PerfTimer, SimulationCore};

/// Replace a non-finite host input with zero
fn sanitize(name: &str, value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        log::warn!("tick: non-finite {} ({}), using 0", name, value);
        0.0
    }
}

pub(super) fn tick(sim: &mut SimulationCore, elapsed: f32, speed: f32, viscosity: f32) {
    let cfg = &sim.config;
    let elapsed = sanitize("elapsedSeconds", elapsed);
    let speed = sanitize("simulationSpeed", speed).clamp(0.0, cfg.max_simulation_speed);
    let viscosity = sanitize("viscosity", viscosity).max(0.0);

    // Both factors are capped by validated config, so dt is always finite
    let dt = elapsed.clamp(0.0, cfg.max_time_step) * speed;

    let force = ForceParams {
        strength: cfg.force_strength,
        radius: cfg.force_radius,
        orbit_radius: cfg.force_orbit_radius,
        orbit_rate: cfg.force_orbit_rate,
    };
    let orbit_clock = orbit_time(sim.orbit_clock + dt, &force);
    let fluid_step = FluidStep {
        time: orbit_clock,
        dt: dt * cfg.fluid_time_scale,
        viscosity: viscosity * cfg.viscosity_scale,
        dissipation: cfg.dissipation,
        force,
    };
    let collision_params = CollisionParams {
        separation_speed: cfg.separation_speed,
        heat_per_impact: cfg.heat_per_impact,
        cooling_rate: cfg.cooling_rate,
    };
    let motion_params = MotionParams {
        dt,
        fluid_coupling: cfg.fluid_coupling,
        max_speed: cfg.max_speed,
        boundary: cfg.boundary,
        restitution: cfg.restitution,
    };

    let perf_on = sim.perf_enabled;
    if perf_on {
        sim.perf_stats.reset();
    }
    let step_start = if perf_on { Some(PerfTimer::start()) } else { None };
    let mut lap = PerfTimer::start();

    // 1. Fluid: inject then advect, each flipping the buffers
    sim.fluid.step(&fluid_step);
    if perf_on {
        sim.perf_stats.fluid_ms = lap.lap();
    }

    // 2-3. Buckets from the committed positions
    sim.buckets.reset();
    if perf_on {
        sim.perf_stats.reset_ms = lap.lap();
    }
    sim.buckets.scatter(&sim.particles);
    if perf_on {
        sim.perf_stats.scatter_ms = lap.lap();
    }

    // 4. Collisions write staged velocity, temperature, contact count
    collision::resolve(&sim.particles, &sim.buckets, &mut sim.staged, &collision_params);
    if perf_on {
        sim.perf_stats.collide_ms = lap.lap();
    }

    // 5. Motion writes staged position and final velocity
    motion::integrate(&sim.particles, &sim.fluid, &mut sim.staged, &motion_params);
    if perf_on {
        sim.perf_stats.integrate_ms = lap.lap();
    }

    // 6. Staged becomes committed for every particle at once
    commit(&mut sim.particles, &mut sim.staged);
    if perf_on {
        sim.perf_stats.commit_ms = lap.lap();
    }

    sim.time += dt;
    sim.orbit_clock = orbit_clock;
    sim.frame += 1;

    if perf_on {
        collect_stats(sim);
        if let Some(start) = step_start {
            sim.perf_stats.step_ms = start.elapsed_ms();
        }
        log::debug!(
            "tick {}: fluid {:.3}ms scatter {:.3}ms collide {:.3}ms integrate {:.3}ms",
            sim.frame,
            sim.perf_stats.fluid_ms,
            sim.perf_stats.scatter_ms,
            sim.perf_stats.collide_ms,
            sim.perf_stats.integrate_ms,
        );
    }
}

// Post-tick counters (only when perf is enabled)
fn collect_stats(sim: &mut SimulationCore) {
    let particles = &sim.particles;
    let (collisions, colliding) = dispatch_reduce(
        particles.len(),
        (0u32, 0u32),
        |i| {
            let c = particles[i].collision_count.max(0) as u32;
            (c, (c > 0) as u32)
        },
        |a, b| (a.0.saturating_add(b.0), a.1 + b.1),
    );

    let stats = &mut sim.perf_stats;
    stats.particle_count = particles.len() as u32;
    stats.collisions = collisions;
    stats.colliding_particles = colliding;
    // Buckets still hold this tick's scatter
    stats.occupied_cells = sim.buckets.occupied_cells() as u32;
    stats.max_cell_occupancy = sim.buckets.max_occupancy() as u32;
    stats.bucket_cells = sim.buckets.grid().cell_count() as u32;
    stats.fluid_cells = sim.fluid.front().len() as u32;
    stats.fluid_speed_max = sim.fluid.max_speed();

    let particle_bytes = std::mem::size_of::<Particle>()
        + std::mem::size_of::<StagedParticle>()
        + std::mem::size_of::<i32>();
    let fluid_bytes = 2 * std::mem::size_of::<glam::Vec2>();
    stats.memory_bytes = (particles.len() * particle_bytes
        + sim.fluid.front().len() * fluid_bytes
        + sim.buckets.grid().cell_count() * std::mem::size_of::<i32>())
        .min(u32::MAX as usize) as u32;
}
