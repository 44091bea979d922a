//! Simulation - tick orchestration over the particle ensemble and fluid field
//!
//! `SimulationCore` owns every buffer and runs the fixed pipeline:
//! fluid step, bucket reset, bucket scatter, collision resolve, motion
//! integrate, commit. Each phase is one dispatch; a dispatch returning is
//! the barrier before the next phase starts.
//!
//! Committed particle state only changes inside `tick` (which holds
//! `&mut self`), so a `ParticleSnapshot` always shows one whole tick.
//!
//! Sub-modules follow the pipeline:
//! - init/      - construction, (re)configuration, seeding, settings
//! - step/      - the tick and the commit
//! - commands/  - explicit particle placement
//! - render/    - packed transfer buffers for hosts
//! - perf/      - timers and per-tick stats

use glam::Vec2;

use crate::core::error::SimResult;
use crate::domain::bounds::{BoundaryPolicy, DomainBounds};
use crate::domain::config::SimulationConfig;
use crate::domain::particle::{Particle, ParticleSeed, StagedParticle};
use crate::spatial::BucketGrid;
use crate::systems::FluidField;

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "init/random.rs"]
mod random;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
#[path = "step/step.rs"]
mod step;
#[path = "step/commit.rs"]
mod commit;
#[path = "commands/commands.rs"]
mod commands;
#[path = "render/render_extract.rs"]
mod render_extract;
mod facade;

pub use facade::{Simulation, TransferLayout};
pub use perf_stats::PerfStats;

use perf_timer::PerfTimer;

/// Reusable host transfer buffers
struct RenderBuffers {
    particles: Vec<f32>,
}

/// The simulation state and its pipeline
pub struct SimulationCore {
    config: SimulationConfig,

    // Committed state (read by every kernel) and the tick-in-flight scratch
    particles: Vec<Particle>,
    staged: Vec<StagedParticle>,

    buckets: BucketGrid,
    fluid: FluidField,

    // State
    frame: u64,
    time: f32,
    /// Force-orbit clock, folded into one orbit period
    orbit_clock: f32,

    // Perf metrics
    perf_enabled: bool,
    perf_stats: PerfStats,

    render: RenderBuffers,
}

/// Read-only view of the committed particles
#[derive(Clone, Copy)]
pub struct ParticleSnapshot<'a> {
    particles: &'a [Particle],
}

impl<'a> ParticleSnapshot<'a> {
    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&'a Particle> {
        self.particles.get(index)
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'a, Particle> {
        self.particles.iter()
    }
}

impl SimulationCore {
    /// Allocate and seed a simulation for a validated config
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        init::create_simulation_core(config)
    }

    /// (Re)allocate the particle and grid buffers and reseed.
    ///
    /// `fluid_resolution` is the velocity-grid resolution; the bucket grid
    /// is derived from the particle count. Nothing changes on error.
    pub fn configure(
        &mut self,
        particle_count: u32,
        fluid_resolution: u32,
        bounds: DomainBounds,
    ) -> SimResult<()> {
        let mut config = self.config.clone();
        config.particle_count = particle_count;
        config.fluid_resolution = fluid_resolution;
        config.bounds = bounds;
        init::apply_config(self, config)
    }

    /// Replace the whole configuration (counts, bounds and parameters)
    pub fn load_config(&mut self, config: SimulationConfig) -> SimResult<()> {
        init::apply_config(self, config)
    }

    pub fn load_config_json(&mut self, json: &str) -> SimResult<()> {
        let config = SimulationConfig::from_json(json)?;
        init::apply_config(self, config)
    }

    /// Reseed the current ensemble from `seed`
    pub fn reseed(&mut self, seed: u32) -> SimResult<()> {
        init::reseed(self, seed)
    }

    /// Replace the ensemble with explicitly placed particles
    pub fn load_particles(&mut self, seeds: &[ParticleSeed]) -> SimResult<()> {
        commands::load_particles(self, seeds)
    }

    /// Run one pipeline pass
    pub fn tick(&mut self, elapsed_seconds: f32, simulation_speed: f32, viscosity: f32) {
        step::tick(self, elapsed_seconds, simulation_speed, viscosity);
    }

    /// Fluid velocity at `position`; zero outside the domain
    pub fn sample_velocity(&self, position: Vec2) -> Vec2 {
        self.fluid.sample(position)
    }

    pub fn particle_snapshot(&self) -> ParticleSnapshot<'_> {
        ParticleSnapshot { particles: &self.particles }
    }

    pub fn config(&self) -> &SimulationConfig {

        &self.config

    }

    pub fn particle_count(&self) -> u32 {

        self.particles.len() as u32

    }

    pub fn fluid_resolution(&self) -> u32 {

        self.fluid.resolution()

    }

    pub fn bounds(&self) -> &DomainBounds {

        &self.config.bounds

    }

    pub fn frame(&self) -> u64 {

        self.frame

    }

    /// Accumulated simulation time (seconds)
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn fluid(&self) -> &FluidField {

        &self.fluid

    }

    /// Bucket grid cells per axis
    pub fn bucket_dimensions(&self) -> (u32, u32) {
        let grid = self.buckets.grid();
        (grid.width(), grid.height())
    }

    // === Settings ===

    pub fn set_boundary_policy(&mut self, policy: BoundaryPolicy) {
        settings::set_boundary_policy(self, policy);
    }

    pub fn set_restitution(&mut self, restitution: f32) -> SimResult<()> {
        settings::set_restitution(self, restitution)
    }

    pub fn set_fluid_coupling(&mut self, coupling: f32) -> SimResult<()> {
        settings::set_fluid_coupling(self, coupling)
    }

    pub fn set_force_strength(&mut self, strength: f32) -> SimResult<()> {
        settings::set_force_strength(self, strength)
    }

    /// Enable or disable per-tick perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        settings::enable_perf_metrics(self, enabled);
    }

    /// Last tick's perf snapshot (zeros when perf disabled)
    pub fn perf_stats(&self) -> PerfStats {
        settings::get_perf_stats(self)
    }

    // === Transfer buffers ===

    /// Pack the committed particles for the host; returns the float count
    pub fn extract_render_buffer(&mut self) -> usize {
        render_extract::extract_particles(self)
    }

    pub fn render_buffer(&self) -> &[f32] {
        &self.render.particles
    }

    pub fn render_buffer_ptr(&self) -> *const f32 {
        self.render.particles.as_ptr()
    }

    /// Front fluid buffer as interleaved `[vx, vy]`
    pub fn fluid_ptr(&self) -> *const f32 {
        self.fluid.front().as_ptr()
    }

    /// Float count of the fluid buffer
    pub fn fluid_len(&self) -> usize {
        self.fluid.front().len() * 2
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
