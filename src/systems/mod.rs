//! Per-tick kernels: collision, motion, fluid.

pub mod collision;
pub mod fluid;
pub mod motion;

pub use collision::CollisionParams;
pub use fluid::{FluidField, FluidStep};
pub use motion::MotionParams;
