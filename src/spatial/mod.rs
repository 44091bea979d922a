//! Broad phase: uniform grid index plus per-cell particle chains.

pub mod buckets;
pub mod grid;

pub use buckets::{BucketGrid, SENTINEL};
pub use grid::CellGrid;
