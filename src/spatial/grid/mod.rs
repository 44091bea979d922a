//! Grid Index - uniform cells over the simulation domain
//!
//! Maps a position to a cell id. Resolution is derived from the particle
//! count so average occupancy stays around one particle per cell, but a cell
//! is never narrower than the largest collision diameter; otherwise the 3x3
//! neighbourhood would miss overlapping pairs.

use glam::Vec2;

use crate::domain::bounds::DomainBounds;

mod indexing;

pub use indexing::NEIGHBOR_OFFSETS;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellGrid {
    width: u32,
    height: u32,
    bounds: DomainBounds,
    /// Reciprocal cell edge per axis
    inv_cell: Vec2,
}

impl CellGrid {
    pub fn new(width: u32, height: u32, bounds: DomainBounds) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let cell = bounds.extent() / Vec2::new(width as f32, height as f32);
        Self {
            width,
            height,
            bounds,
            inv_cell: cell.recip(),
        }
    }

    /// Size the grid for `count` particles whose largest radius is `max_size`
    pub fn for_particles(count: usize, max_size: f32, bounds: DomainBounds) -> Self {
        let per_axis = ((count as f32).sqrt().floor() as u32).max(1);
        let extent = bounds.extent();
        let diameter = 2.0 * max_size;

        let fit = |len: f32| -> u32 {
            if diameter > 0.0 && diameter.is_finite() {
                ((len / diameter).floor() as u32).clamp(1, per_axis)
            } else {
                per_axis
            }
        };

        Self::new(fit(extent.x), fit(extent.y), bounds)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    #[inline]
    pub fn bounds(&self) -> &DomainBounds {
        &self.bounds
    }

    /// Edge length of one cell per axis
    #[inline]
    pub fn cell_size(&self) -> Vec2 {
        self.inv_cell.recip()
    }
}
