use glam::Vec2;

use crate::core::error::{try_filled, try_with, SimResult};
use crate::domain::bounds::DomainBounds;
use crate::domain::config::SimulationConfig;
use crate::domain::particle::{Particle, StagedParticle};
use crate::spatial::{BucketGrid, CellGrid};
use crate::systems::FluidField;

use super::perf_stats::PerfStats;
use super::random::{next_range, next_unit, seed_state};
use super::{RenderBuffers, SimulationCore};

/// Largest base radius a seeded particle gets
const MAX_BASE_SIZE: f32 = 0.05;
/// Base radius scale: `0.7 / sqrt(N)` keeps total coverage roughly constant
const COVERAGE: f32 = 0.7;
/// Initial speed per unit of base radius
const SPEED_PER_SIZE: f32 = 5.0;

/// Buffers derived from one particle set, allocated before anything is swapped in
pub(super) struct Ensemble {
    pub(super) particles: Vec<Particle>,
    pub(super) staged: Vec<StagedParticle>,
    pub(super) buckets: BucketGrid,
}

pub(super) fn create_simulation_core(config: SimulationConfig) -> SimResult<SimulationCore> {
    config.validate()?;

    let particles = seed_particles(config.particle_count as usize, &config.bounds, config.seed)?;
    let ensemble = build_ensemble(particles, &config.bounds)?;
    let fluid = FluidField::new(config.fluid_resolution, config.bounds)?;

    log::info!(
        "simulation created: {} particles, fluid {}x{}, buckets {}x{}",
        ensemble.particles.len(),
        fluid.resolution(),
        fluid.resolution(),
        ensemble.buckets.grid().width(),
        ensemble.buckets.grid().height(),
    );

    Ok(SimulationCore {
        config,
        particles: ensemble.particles,
        staged: ensemble.staged,
        buckets: ensemble.buckets,
        fluid,
        frame: 0,
        time: 0.0,
        orbit_clock: 0.0,
        perf_enabled: false,
        perf_stats: PerfStats::default(),
        render: RenderBuffers { particles: Vec::new() },
    })
}

/// Validate `config`, allocate everything it needs, then swap it in.
///
/// The fluid field survives when its resolution and bounds are unchanged.
pub(super) fn apply_config(sim: &mut SimulationCore, config: SimulationConfig) -> SimResult<()> {
    config.validate()?;

    let particles = seed_particles(config.particle_count as usize, &config.bounds, config.seed)?;
    let ensemble = build_ensemble(particles, &config.bounds)?;

    let rebuild_fluid = config.fluid_resolution != sim.fluid.resolution()
        || config.bounds != *sim.fluid.bounds();
    let fluid = if rebuild_fluid {
        Some(FluidField::new(config.fluid_resolution, config.bounds)?)
    } else {
        None
    };

    // Nothing below can fail
    install(sim, ensemble);
    if let Some(fluid) = fluid {
        sim.fluid = fluid;
    }
    sim.config = config;

    log::info!(
        "configured: {} particles, fluid {}x{}{}",
        sim.particles.len(),
        sim.fluid.resolution(),
        sim.fluid.resolution(),
        if rebuild_fluid { " (field rebuilt)" } else { "" },
    );
    Ok(())
}

pub(super) fn reseed(sim: &mut SimulationCore, seed: u32) -> SimResult<()> {
    let count = sim.particles.len();
    let particles = seed_particles(count, &sim.config.bounds, seed)?;
    let ensemble = build_ensemble(particles, &sim.config.bounds)?;
    install(sim, ensemble);
    sim.config.seed = seed;
    log::debug!("reseeded {} particles with seed {}", count, seed);
    Ok(())
}

/// Swap a fully allocated ensemble into the simulation
pub(super) fn install(sim: &mut SimulationCore, ensemble: Ensemble) {
    sim.particles = ensemble.particles;
    sim.staged = ensemble.staged;
    sim.buckets = ensemble.buckets;
    sim.render.particles.clear();
}

/// Allocate the staging buffer and a bucket grid sized for `particles`
pub(super) fn build_ensemble(
    particles: Vec<Particle>,
    bounds: &DomainBounds,
) -> SimResult<Ensemble> {
    let max_size = particles.iter().map(|p| p.size).fold(0.0f32, f32::max);
    let grid = CellGrid::for_particles(particles.len(), max_size, *bounds);
    let buckets = BucketGrid::new(grid, particles.len())?;
    let staged = try_filled("staged_particles", particles.len(), StagedParticle::default())?;
    Ok(Ensemble { particles, staged, buckets })
}

/// Deterministic random ensemble: uniform positions, sizes around
/// `min(0.05, 0.7 / sqrt(N))`, small random velocities
pub(super) fn seed_particles(
    count: usize,
    bounds: &DomainBounds,
    seed: u32,
) -> SimResult<Vec<Particle>> {
    let base = if count > 0 {
        MAX_BASE_SIZE.min(COVERAGE / (count as f32).sqrt())
    } else {
        MAX_BASE_SIZE
    };
    let mut state = seed_state(seed);

    try_with("particles", count, |_| {
        let uv = Vec2::new(next_unit(&mut state), next_unit(&mut state));
        let size = base * next_range(&mut state, 0.5, 1.0);
        let velocity = Vec2::new(
            next_range(&mut state, -1.0, 1.0),
            next_range(&mut state, -1.0, 1.0),
        ) * base * SPEED_PER_SIZE;
        Particle::new(bounds.from_unit(uv), velocity, size)
    })
}
