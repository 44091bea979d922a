//! Flowfield Engine - data-parallel particle collisions in an advected flow
//!
//! Each tick advances a 2D particle ensemble through a fixed pipeline:
//! fluid step, bucket reset, bucket scatter, collision resolve, motion
//! integrate, commit. Every phase is a per-element kernel dispatched over
//! particles or fluid cells; phases are separated by full barriers.
//!
//! Layout:
//! - core/        - dispatch primitive, errors, logging
//! - domain/      - particle records, bounds, configuration
//! - spatial/     - grid index and concurrent cell buckets
//! - systems/     - collision, motion, fluid field
//! - simulation/  - tick orchestration and the wasm facade

pub mod core;
pub mod domain;
pub mod spatial;
pub mod systems;
pub mod simulation;

use wasm_bindgen::prelude::*;

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
pub use wasm_bindgen_rayon::init_thread_pool;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine: panic hook plus console logging
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    crate::core::logging::install(log::LevelFilter::Info);
    log::info!("flowfield engine {} initialized", env!("CARGO_PKG_VERSION"));
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[wasm_bindgen]
pub fn min_particles() -> u32 {
    domain::config::MIN_PARTICLES
}

#[wasm_bindgen]
pub fn max_particles() -> u32 {
    domain::config::MAX_PARTICLES
}

pub use glam;

pub use crate::core::error::{ConfigError, SimError};
pub use domain::bounds::{BoundaryPolicy, DomainBounds};
pub use domain::config::SimulationConfig;
pub use domain::particle::{Particle, ParticleSeed};
pub use simulation::{ParticleSnapshot, PerfStats, Simulation, SimulationCore};
