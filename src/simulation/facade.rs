use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::domain::bounds::{BoundaryPolicy, DomainBounds};
use crate::domain::config::SimulationConfig;
use crate::domain::particle::{ParticleSeed, RENDER_STRIDE};

use super::perf_stats::PerfStats;
use super::SimulationCore;

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Where the host finds the transfer buffers in wasm memory
#[wasm_bindgen]
pub struct TransferLayout {
    particles_ptr: u32,
    particles_len_elements: u32,
    particles_len_bytes: u32,
    particle_stride: u32,
    fluid_ptr: u32,
    fluid_len_elements: u32,
    fluid_len_bytes: u32,
    fluid_resolution: u32,
}

#[wasm_bindgen]
impl TransferLayout {
    #[wasm_bindgen(getter)]
    pub fn particles_ptr(&self) -> u32 {
        self.particles_ptr
    }
    #[wasm_bindgen(getter)]
    pub fn particles_len_elements(&self) -> u32 {
        self.particles_len_elements
    }
    #[wasm_bindgen(getter)]
    pub fn particles_len_bytes(&self) -> u32 {
        self.particles_len_bytes
    }
    #[wasm_bindgen(getter)]
    pub fn particle_stride(&self) -> u32 {
        self.particle_stride
    }

    #[wasm_bindgen(getter)]
    pub fn fluid_ptr(&self) -> u32 {
        self.fluid_ptr
    }
    #[wasm_bindgen(getter)]
    pub fn fluid_len_elements(&self) -> u32 {
        self.fluid_len_elements
    }
    #[wasm_bindgen(getter)]
    pub fn fluid_len_bytes(&self) -> u32 {
        self.fluid_len_bytes
    }
    #[wasm_bindgen(getter)]
    pub fn fluid_resolution(&self) -> u32 {
        self.fluid_resolution
    }
}

#[wasm_bindgen]
pub struct Simulation {
    core: SimulationCore,
}

impl Simulation {
    /// Native access to the core
    pub fn core(&self) -> &SimulationCore {
        &self.core
    }
}

#[wasm_bindgen]
impl Simulation {
    /// Create a simulation with default parameters and `particle_count` particles
    #[wasm_bindgen(constructor)]
    pub fn new(particle_count: u32) -> Result<Simulation, JsValue> {
        let config = SimulationConfig::default().with_particle_count(particle_count);
        let core = SimulationCore::new(config).map_err(to_js)?;
        Ok(Self { core })
    }

    #[wasm_bindgen(js_name = fromConfigJson)]
    pub fn from_config_json(json: &str) -> Result<Simulation, JsValue> {
        let config = SimulationConfig::from_json(json).map_err(to_js)?;
        let core = SimulationCore::new(config).map_err(to_js)?;
        Ok(Self { core })
    }

    /// (Re)allocate buffers for a new particle count, fluid resolution and domain
    pub fn configure(
        &mut self,
        particle_count: u32,
        fluid_resolution: u32,
        min_x: f32,
        min_y: f32,
        max_x: f32,
        max_y: f32,
    ) -> Result<(), JsValue> {
        let bounds = DomainBounds::new(Vec2::new(min_x, min_y), Vec2::new(max_x, max_y));
        self.core
            .configure(particle_count, fluid_resolution, bounds)
            .map_err(to_js)
    }

    pub fn load_config_json(&mut self, json: &str) -> Result<(), JsValue> {
        self.core.load_config_json(json).map_err(to_js)
    }

    pub fn config_json(&self) -> String {
        self.core.config().to_json()
    }

    /// Replace the ensemble with a JSON array of `{position, velocity?, size}`
    pub fn load_particles_json(&mut self, json: &str) -> Result<(), JsValue> {
        let seeds: Vec<ParticleSeed> = serde_json::from_str(json).map_err(to_js)?;
        self.core.load_particles(&seeds).map_err(to_js)
    }

    pub fn reseed(&mut self, seed: u32) -> Result<(), JsValue> {
        self.core.reseed(seed).map_err(to_js)
    }

    /// Advance one tick
    pub fn tick(&mut self, elapsed_seconds: f32, simulation_speed: f32, viscosity: f32) {
        self.core.tick(elapsed_seconds, simulation_speed, viscosity);
    }

    /// Fluid velocity at (x, y) as `[vx, vy]`; zero outside the domain
    pub fn sample_velocity(&self, x: f32, y: f32) -> Vec<f32> {
        self.core.sample_velocity(Vec2::new(x, y)).to_array().to_vec()
    }

    #[wasm_bindgen(getter)]
    pub fn particle_count(&self) -> u32 {
        self.core.particle_count()
    }

    #[wasm_bindgen(getter)]
    pub fn fluid_resolution(&self) -> u32 {
        self.core.fluid_resolution()
    }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 {
        self.core.frame()
    }

    #[wasm_bindgen(getter)]
    pub fn time(&self) -> f32 {
        self.core.time()
    }

    /// Switch between "reflect" and "wrap"
    pub fn set_boundary_policy(&mut self, policy: &str) -> Result<(), JsValue> {
        let policy = match policy {
            "reflect" => BoundaryPolicy::Reflect,
            "wrap" => BoundaryPolicy::Wrap,
            other => return Err(JsValue::from_str(&format!("unknown boundary policy '{}'", other))),
        };
        self.core.set_boundary_policy(policy);
        Ok(())
    }

    pub fn set_restitution(&mut self, restitution: f32) -> Result<(), JsValue> {
        self.core.set_restitution(restitution).map_err(to_js)
    }

    pub fn set_fluid_coupling(&mut self, coupling: f32) -> Result<(), JsValue> {
        self.core.set_fluid_coupling(coupling).map_err(to_js)
    }

    pub fn set_force_strength(&mut self, strength: f32) -> Result<(), JsValue> {
        self.core.set_force_strength(strength).map_err(to_js)
    }

    /// Enable or disable per-tick perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.core.enable_perf_metrics(enabled);
    }

    /// Get last tick perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        self.core.perf_stats()
    }

    /// Pack particles into the transfer buffer; returns the float count
    pub fn extract_render_buffer(&mut self) -> usize {
        self.core.extract_render_buffer()
    }

    pub fn render_buffer_ptr(&self) -> *const f32 {
        self.core.render_buffer_ptr()
    }

    pub fn fluid_ptr(&self) -> *const f32 {
        self.core.fluid_ptr()
    }

    pub fn transfer_layout(&self) -> TransferLayout {
        let particles_len = self.core.render_buffer().len();
        let fluid_len = self.core.fluid_len();
        let float = std::mem::size_of::<f32>();
        TransferLayout {
            particles_ptr: self.core.render_buffer_ptr() as u32,
            particles_len_elements: particles_len as u32,
            particles_len_bytes: (particles_len * float) as u32,
            particle_stride: RENDER_STRIDE as u32,
            fluid_ptr: self.core.fluid_ptr() as u32,
            fluid_len_elements: fluid_len as u32,
            fluid_len_bytes: (fluid_len * float) as u32,
            fluid_resolution: self.core.fluid_resolution(),
        }
    }
}
