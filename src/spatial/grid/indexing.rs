use glam::Vec2;

use super::CellGrid;

/// 3x3 block around a cell, self included
pub const NEIGHBOR_OFFSETS: [(i32, i32); 9] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0), (0, 0), (1, 0),
    (-1, 1), (0, 1), (1, 1),
];

impl CellGrid {
    // === Index conversion ===
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    #[inline]
    pub fn coords(&self, idx: usize) -> (u32, u32) {
        let x = (idx % self.width as usize) as u32;
        let y = (idx / self.width as usize) as u32;
        (x, y)
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Cell coordinates of a position, clamped to the nearest valid cell.
    /// NaN lands in cell 0 (float-to-int casts saturate).
    #[inline]
    pub fn cell_coords(&self, position: Vec2) -> (u32, u32) {
        let rel = (position - self.bounds.min) * self.inv_cell;
        let x = (rel.x.floor() as i32).clamp(0, self.width as i32 - 1);
        let y = (rel.y.floor() as i32).clamp(0, self.height as i32 - 1);
        (x as u32, y as u32)
    }

    /// Cell id for a position
    #[inline]
    pub fn cell_of(&self, position: Vec2) -> usize {
        let (x, y) = self.cell_coords(position);
        self.index(x, y)
    }

    /// Ids of the in-grid cells of the 3x3 block around `(x, y)`
    #[inline]
    pub fn neighborhood(&self, x: u32, y: u32) -> impl Iterator<Item = usize> + '_ {
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(dx, dy)| {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if self.in_bounds(nx, ny) {
                Some(self.index(nx as u32, ny as u32))
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bounds::DomainBounds;

    fn grid4() -> CellGrid {
        CellGrid::new(4, 4, DomainBounds::unit())
    }

    #[test]
    fn corners_map_to_corner_cells() {
        let g = grid4();
        assert_eq!(g.cell_coords(Vec2::new(-1.0, -1.0)), (0, 0));
        assert_eq!(g.cell_coords(Vec2::new(0.99, 0.99)), (3, 3));
        // the max edge itself clamps into the last cell
        assert_eq!(g.cell_coords(Vec2::new(1.0, 1.0)), (3, 3));
    }

    #[test]
    fn out_of_range_clamps_instead_of_panicking() {
        let g = grid4();
        assert_eq!(g.cell_coords(Vec2::new(-50.0, 3.0)), (0, 3));
        assert_eq!(g.cell_coords(Vec2::new(f32::INFINITY, f32::NEG_INFINITY)), (3, 0));
        assert_eq!(g.cell_of(Vec2::new(f32::NAN, f32::NAN)), 0);
    }

    #[test]
    fn index_and_coords_agree() {
        let g = CellGrid::new(5, 3, DomainBounds::unit());
        for idx in 0..g.cell_count() {
            let (x, y) = g.coords(idx);
            assert_eq!(g.index(x, y), idx);
        }
    }

    #[test]
    fn corner_neighbourhood_skips_outside_cells() {
        let g = grid4();
        let mut corner: Vec<usize> = g.neighborhood(0, 0).collect();
        corner.sort_unstable();
        assert_eq!(corner, vec![0, 1, 4, 5]);
        assert_eq!(g.neighborhood(1, 1).count(), 9);
        assert_eq!(g.neighborhood(3, 1).count(), 6);
    }
}
