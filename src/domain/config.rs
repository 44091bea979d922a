//! Simulation configuration
//!
//! Loaded from JSON (camelCase keys, every key optional) or built in code.
//! `validate` runs before any buffer is touched.

use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;
use super::bounds::{BoundaryPolicy, DomainBounds};

pub const MIN_PARTICLES: u32 = 100;
pub const MAX_PARTICLES: u32 = 100_000;

pub const MIN_FLUID_RESOLUTION: u32 = 8;
pub const MAX_FLUID_RESOLUTION: u32 = 1024;

/// Largest accepted `maxTimeStep` (seconds)
pub const MAX_TIME_STEP_LIMIT: f32 = 1.0;
/// Largest accepted `maxSimulationSpeed`
pub const SIMULATION_SPEED_LIMIT: f32 = 100.0;

pub const DEFAULT_PARTICLES: u32 = 2000;
pub const DEFAULT_FLUID_RESOLUTION: u32 = 256;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfig {
    pub particle_count: u32,
    /// Cells per axis of the fluid velocity grid
    pub fluid_resolution: u32,
    pub bounds: DomainBounds,
    pub boundary: BoundaryPolicy,
    /// Fraction of normal speed kept after a wall bounce
    pub restitution: f32,
    /// Upper bound on a tick's elapsed time (seconds)
    pub max_time_step: f32,
    /// Upper bound on the per-tick speed multiplier
    pub max_simulation_speed: f32,
    pub max_speed: f32,
    /// Push-apart speed for fully overlapping pairs
    pub separation_speed: f32,
    /// Weight of the sampled flow added to particle velocity
    pub fluid_coupling: f32,
    pub force_strength: f32,
    /// Force falloff radius in normalized field space
    pub force_radius: f32,
    pub force_orbit_radius: f32,
    /// Angular rate of the force center (radians per second)
    pub force_orbit_rate: f32,
    /// Fluid dt = particle dt * fluid_time_scale
    pub fluid_time_scale: f32,
    pub viscosity_scale: f32,
    /// Per-tick multiplier on advected velocity
    pub dissipation: f32,
    pub heat_per_impact: f32,
    /// Per-tick fraction of temperature lost
    pub cooling_rate: f32,
    pub seed: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLES,
            fluid_resolution: DEFAULT_FLUID_RESOLUTION,
            bounds: DomainBounds::unit(),
            boundary: BoundaryPolicy::Reflect,
            restitution: 0.8,
            max_time_step: 1.0 / 60.0,
            max_simulation_speed: 5.0,
            max_speed: 4.0,
            separation_speed: 0.5,
            fluid_coupling: 1.0,
            force_strength: 1.0,
            force_radius: 0.18,
            force_orbit_radius: 0.5,
            force_orbit_rate: 0.3,
            fluid_time_scale: 0.7,
            viscosity_scale: 1.5,
            dissipation: 0.995,
            heat_per_impact: 0.5,
            cooling_rate: 0.02,
            seed: 12345,
        }
    }
}

impl SimulationConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_particle_count(self.particle_count)?;
        validate_fluid_resolution(self.fluid_resolution)?;
        self.bounds.validate()?;

        unit_interval("restitution", self.restitution)?;
        unit_interval("dissipation", self.dissipation)?;
        unit_interval("coolingRate", self.cooling_rate)?;
        bounded("maxTimeStep", self.max_time_step, MAX_TIME_STEP_LIMIT)?;
        bounded("maxSimulationSpeed", self.max_simulation_speed, SIMULATION_SPEED_LIMIT)?;
        positive("maxSpeed", self.max_speed)?;
        non_negative("separationSpeed", self.separation_speed)?;
        non_negative("fluidCoupling", self.fluid_coupling)?;
        non_negative("forceStrength", self.force_strength)?;
        non_negative("forceRadius", self.force_radius)?;
        non_negative("forceOrbitRadius", self.force_orbit_radius)?;
        finite("forceOrbitRate", self.force_orbit_rate)?;
        non_negative("fluidTimeScale", self.fluid_time_scale)?;
        non_negative("viscosityScale", self.viscosity_scale)?;
        non_negative("heatPerImpact", self.heat_per_impact)?;
        Ok(())
    }
}

pub fn validate_particle_count(count: u32) -> Result<(), ConfigError> {
    if !(MIN_PARTICLES..=MAX_PARTICLES).contains(&count) {
        return Err(ConfigError::ParticleCount {
            requested: count,
            min: MIN_PARTICLES,
            max: MAX_PARTICLES,
        });
    }
    Ok(())
}

pub fn validate_fluid_resolution(resolution: u32) -> Result<(), ConfigError> {
    if !(MIN_FLUID_RESOLUTION..=MAX_FLUID_RESOLUTION).contains(&resolution) {
        return Err(ConfigError::GridResolution {
            requested: resolution,
            min: MIN_FLUID_RESOLUTION,
            max: MAX_FLUID_RESOLUTION,
        });
    }
    Ok(())
}

fn finite(name: &'static str, v: f32) -> Result<(), ConfigError> {
    if !v.is_finite() {
        return Err(ConfigError::Parameter { name, reason: format!("{} is not finite", v) });
    }
    Ok(())
}

fn non_negative(name: &'static str, v: f32) -> Result<(), ConfigError> {
    finite(name, v)?;
    if v < 0.0 {
        return Err(ConfigError::Parameter { name, reason: format!("{} is negative", v) });
    }
    Ok(())
}

fn positive(name: &'static str, v: f32) -> Result<(), ConfigError> {
    finite(name, v)?;
    if v <= 0.0 {
        return Err(ConfigError::Parameter { name, reason: format!("{} must be > 0", v) });
    }
    Ok(())
}

fn bounded(name: &'static str, v: f32, max: f32) -> Result<(), ConfigError> {
    positive(name, v)?;
    if v > max {
        return Err(ConfigError::Parameter { name, reason: format!("{} exceeds {}", v, max) });
    }
    Ok(())
}

fn unit_interval(name: &'static str, v: f32) -> Result<(), ConfigError> {
    finite(name, v)?;
    if !(0.0..=1.0).contains(&v) {
        return Err(ConfigError::Parameter { name, reason: format!("{} outside [0, 1]", v) });
    }
    Ok(())
}
