use glam::Vec2;

use crate::core::dispatch::dispatch_reduce;
use crate::core::error::{try_with, SimResult};

/// Square grid of cell-centred velocities, row-major
///
/// Cell `(x, y)` sits at uv `((x + 0.5) / res, (y + 0.5) / res)` in the
/// unit square; `uv` is the domain position mapped to [0, 1]².
#[derive(Clone, Debug)]
pub struct VelocityGrid {
    resolution: u32,
    cells: Vec<Vec2>,
}

impl VelocityGrid {
    /// Fill every cell with `flow(uv of the cell centre)`
    pub fn from_fn<F>(buffer: &'static str, resolution: u32, flow: F) -> SimResult<Self>
    where
        F: Fn(Vec2) -> Vec2,
    {
        let resolution = resolution.max(1);
        let len = (resolution as usize) * (resolution as usize);
        let res = resolution as usize;
        let cells = try_with(buffer, len, |i| {
            flow(Self::center_uv_of(i % res, i / res, resolution))
        })?;
        Ok(Self { resolution, cells })
    }

    #[inline]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn cells(&self) -> &[Vec2] {
        &self.cells
    }

    #[inline]
    pub fn cells_mut(&mut self) -> &mut [Vec2] {
        &mut self.cells
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Vec2 {
        let x = x.min(self.resolution - 1) as usize;
        let y = y.min(self.resolution - 1) as usize;
        self.cells[y * self.resolution as usize + x]
    }

    /// uv of the centre of cell `idx`
    #[inline]
    pub fn center_uv(&self, idx: usize) -> Vec2 {
        let res = self.resolution as usize;
        Self::center_uv_of(idx % res, idx / res, self.resolution)
    }

    #[inline]
    fn center_uv_of(x: usize, y: usize, resolution: u32) -> Vec2 {
        (Vec2::new(x as f32, y as f32) + 0.5) / resolution as f32
    }

    /// Bilinear sample at `uv`; outside the unit square the edge cells extend
    pub fn sample_uv(&self, uv: Vec2) -> Vec2 {
        let max = (self.resolution - 1) as f32;
        let g = (uv * self.resolution as f32 - 0.5).clamp(Vec2::ZERO, Vec2::splat(max));
        // NaN survives clamp; pin it to the first cell
        let g = Vec2::new(
            if g.x.is_nan() { 0.0 } else { g.x },
            if g.y.is_nan() { 0.0 } else { g.y },
        );

        let x0 = g.x.floor() as u32;
        let y0 = g.y.floor() as u32;
        let t = g - Vec2::new(x0 as f32, y0 as f32);

        let a = self.get(x0, y0).lerp(self.get(x0 + 1, y0), t.x);
        let b = self.get(x0, y0 + 1).lerp(self.get(x0 + 1, y0 + 1), t.x);
        a.lerp(b, t.y)
    }

    /// Mean of the four edge neighbours of cell `idx` (edges clamp)
    #[inline]
    pub fn neighbor_mean(&self, idx: usize) -> Vec2 {
        let res = self.resolution;
        let x = (idx % res as usize) as u32;
        let y = (idx / res as usize) as u32;
        let left = self.get(x.saturating_sub(1), y);
        let right = self.get(x + 1, y);
        let down = self.get(x, y.saturating_sub(1));
        let up = self.get(x, y + 1);
        (left + right + down + up) * 0.25
    }

    /// Largest velocity magnitude in the grid; NaN if any cell is NaN
    pub fn max_speed(&self) -> f32 {
        let cells = &self.cells;
        dispatch_reduce(cells.len(), 0.0f32, |i| cells[i].length(), nan_max)
    }

    /// Interleaved `[vx, vy]` floats, for host overlays
    #[inline]
    pub fn as_ptr(&self) -> *const f32 {
        self.cells.as_ptr() as *const f32
    }
}

// `f32::max` drops NaN; a poisoned field must show up in the stats
#[inline]
fn nan_max(a: f32, b: f32) -> f32 {
    if a.is_nan() || b.is_nan() {
        f32::NAN
    } else {
        a.max(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_centres_sample_exactly() {
        let g = VelocityGrid::from_fn("t", 8, |uv| uv * 3.0).unwrap();
        for idx in [0, 9, 27, 63] {
            let uv = g.center_uv(idx);
            assert_eq!(g.sample_uv(uv), g.cells()[idx]);
        }
    }

    #[test]
    fn linear_field_interpolates_between_centres() {
        let g = VelocityGrid::from_fn("t", 16, |uv| Vec2::new(uv.x, 2.0 * uv.y)).unwrap();
        let v = g.sample_uv(Vec2::new(0.4, 0.6));
        assert!((v.x - 0.4).abs() < 1e-5);
        assert!((v.y - 1.2).abs() < 1e-5);
    }

    #[test]
    fn samples_outside_clamp_to_edges() {
        let g = VelocityGrid::from_fn("t", 4, |uv| uv).unwrap();
        assert_eq!(g.sample_uv(Vec2::new(-3.0, -3.0)), g.get(0, 0));
        assert_eq!(g.sample_uv(Vec2::new(7.0, 7.0)), g.get(3, 3));
        assert!(g.sample_uv(Vec2::new(f32::NAN, 0.5)).is_finite());
    }

    #[test]
    fn neighbour_mean_of_uniform_field_is_the_field() {
        let g = VelocityGrid::from_fn("t", 5, |_| Vec2::new(0.25, -0.5)).unwrap();
        assert_eq!(g.neighbor_mean(0), Vec2::new(0.25, -0.5));
        assert_eq!(g.neighbor_mean(12), Vec2::new(0.25, -0.5));
    }

    #[test]
    fn max_speed_finds_the_peak() {
        let g = VelocityGrid::from_fn("t", 8, |uv| {
            if uv.x > 0.9 && uv.y > 0.9 { Vec2::new(3.0, 4.0) } else { Vec2::ZERO }
        })
        .unwrap();
        assert_eq!(g.max_speed(), 5.0);
    }

    #[test]
    fn max_speed_surfaces_nan_cells() {
        let mut g = VelocityGrid::from_fn("t", 8, |_| Vec2::ONE).unwrap();
        g.cells_mut()[17] = Vec2::new(f32::NAN, 0.0);
        assert!(g.max_speed().is_nan());
    }
}
