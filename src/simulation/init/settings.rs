use crate::core::error::{ConfigError, SimResult};
use crate::domain::bounds::BoundaryPolicy;
use crate::domain::config::SimulationConfig;

use super::perf_stats::PerfStats;
use super::SimulationCore;

pub(super) fn enable_perf_metrics(sim: &mut SimulationCore, enabled: bool) {
    sim.perf_enabled = enabled;
    if !enabled {
        sim.perf_stats.reset();
    }
}

pub(super) fn get_perf_stats(sim: &SimulationCore) -> PerfStats {
    sim.perf_stats.clone()
}

pub(super) fn set_boundary_policy(sim: &mut SimulationCore, policy: BoundaryPolicy) {
    sim.config.boundary = policy;
}

pub(super) fn set_restitution(sim: &mut SimulationCore, restitution: f32) -> SimResult<()> {
    let mut next = sim.config.clone();
    next.restitution = restitution;
    commit_validated(sim, next)
}

pub(super) fn set_fluid_coupling(sim: &mut SimulationCore, coupling: f32) -> SimResult<()> {
    let mut next = sim.config.clone();
    next.fluid_coupling = coupling;
    commit_validated(sim, next)
}

pub(super) fn set_force_strength(sim: &mut SimulationCore, strength: f32) -> SimResult<()> {
    let mut next = sim.config.clone();
    next.force_strength = strength;
    commit_validated(sim, next)
}

// Parameter-only change: buffers stay as they are
fn commit_validated(sim: &mut SimulationCore, next: SimulationConfig) -> SimResult<()> {
    next.validate().map_err(|e: ConfigError| {
        log::warn!("rejected setting: {}", e);
        e
    })?;
    sim.config = next;
    Ok(())
}
