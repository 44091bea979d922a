use wasm_bindgen::prelude::*;

/// Timings and counters of the last tick (zeros while perf is disabled)
#[wasm_bindgen]
#[derive(Clone, Debug, Default)]
pub struct PerfStats {
    pub(super) step_ms: f64,
    pub(super) fluid_ms: f64,
    pub(super) reset_ms: f64,
    pub(super) scatter_ms: f64,
    pub(super) collide_ms: f64,
    pub(super) integrate_ms: f64,
    pub(super) commit_ms: f64,

    pub(super) particle_count: u32,
    pub(super) collisions: u32,
    pub(super) colliding_particles: u32,
    pub(super) occupied_cells: u32,
    pub(super) max_cell_occupancy: u32,
    pub(super) bucket_cells: u32,
    pub(super) fluid_cells: u32,
    pub(super) fluid_speed_max: f32,
    pub(super) memory_bytes: u32,
}

impl PerfStats {
    pub(crate) fn reset(&mut self) {
        *self = PerfStats::default();
    }
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }
    #[wasm_bindgen(getter)]
    pub fn fluid_ms(&self) -> f64 {
        self.fluid_ms
    }
    #[wasm_bindgen(getter)]
    pub fn reset_ms(&self) -> f64 {
        self.reset_ms
    }
    #[wasm_bindgen(getter)]
    pub fn scatter_ms(&self) -> f64 {
        self.scatter_ms
    }
    #[wasm_bindgen(getter)]
    pub fn collide_ms(&self) -> f64 {
        self.collide_ms
    }
    #[wasm_bindgen(getter)]
    pub fn integrate_ms(&self) -> f64 {
        self.integrate_ms
    }
    #[wasm_bindgen(getter)]
    pub fn commit_ms(&self) -> f64 {
        self.commit_ms
    }
    #[wasm_bindgen(getter)]
    pub fn particle_count(&self) -> u32 {
        self.particle_count
    }
    /// Sum of per-particle contact counts (each pair counted twice)
    #[wasm_bindgen(getter)]
    pub fn collisions(&self) -> u32 {
        self.collisions
    }
    #[wasm_bindgen(getter)]
    pub fn colliding_particles(&self) -> u32 {
        self.colliding_particles
    }
    #[wasm_bindgen(getter)]
    pub fn occupied_cells(&self) -> u32 {
        self.occupied_cells
    }
    #[wasm_bindgen(getter)]
    pub fn max_cell_occupancy(&self) -> u32 {
        self.max_cell_occupancy
    }
    #[wasm_bindgen(getter)]
    pub fn bucket_cells(&self) -> u32 {
        self.bucket_cells
    }
    #[wasm_bindgen(getter)]
    pub fn fluid_cells(&self) -> u32 {
        self.fluid_cells
    }
    #[wasm_bindgen(getter)]
    pub fn fluid_speed_max(&self) -> f32 {
        self.fluid_speed_max
    }
    #[wasm_bindgen(getter)]
    pub fn memory_bytes(&self) -> u32 {
        self.memory_bytes
    }
}
