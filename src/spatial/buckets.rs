//! Per-cell particle chains built concurrently
//!
//! `cell_head[c]` holds the most recently inserted particle of cell `c` and
//! `particle_next[i]` links particle `i` to the one inserted before it. A
//! scatter pushes every particle onto the head of its cell with an atomic
//! swap, so many particles may land in the same cell at once without locks.
//! Insertion order inside a chain is unspecified; only membership matters.
//!
//! Both arrays are rebuilt from scratch every tick: `reset` then `scatter`,
//! each a full dispatch. Readers walk chains only after scatter returned.

use std::sync::atomic::{AtomicI32, Ordering};

use crate::core::dispatch::dispatch_mut;
use crate::core::error::{try_filled, try_with, SimResult};
use crate::domain::particle::Particle;

use super::grid::CellGrid;

/// End-of-chain marker
pub const SENTINEL: i32 = -1;

pub struct BucketGrid {
    grid: CellGrid,
    cell_head: Vec<AtomicI32>,
    particle_next: Vec<i32>,
}

impl BucketGrid {
    pub fn new(grid: CellGrid, particle_count: usize) -> SimResult<Self> {
        let cell_head = try_with("cell_head", grid.cell_count(), |_| AtomicI32::new(SENTINEL))?;
        let particle_next = try_filled("particle_next", particle_count, SENTINEL)?;
        Ok(Self { grid, cell_head, particle_next })
    }

    #[inline]
    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    #[inline]
    pub fn particle_capacity(&self) -> usize {
        self.particle_next.len()
    }

    /// Mark every cell empty (one kernel per cell)
    pub fn reset(&mut self) {
        dispatch_mut(&mut self.cell_head, |_, head| {
            *head.get_mut() = SENTINEL;
        });
    }

    /// Link every particle into the chain of the cell its committed position
    /// falls in (one kernel per particle)
    ///
    /// Panics unless `particles` has exactly `particle_capacity()` elements.
    pub fn scatter(&mut self, particles: &[Particle]) {
        assert_eq!(
            particles.len(),
            self.particle_next.len(),
            "scatter: particle count does not match bucket capacity"
        );
        let Self { grid, cell_head, particle_next } = self;
        let grid = &*grid;
        let heads = &cell_head[..];

        dispatch_mut(particle_next, |i, next| {
            // cell_of clamps, so the cell id is always in range
            let cell = grid.cell_of(particles[i].position);
            // AcqRel: the previous head we link to was published by another kernel
            *next = heads[cell].swap(i as i32, Ordering::AcqRel);
        });
    }

    /// First particle of a cell's chain; `SENTINEL` for an empty or unknown cell
    #[inline]
    pub fn head(&self, cell: usize) -> i32 {
        self.cell_head
            .get(cell)
            .map_or(SENTINEL, |h| h.load(Ordering::Acquire))
    }

    /// Iterate the particles currently chained into `cell`
    #[inline]
    pub fn chain(&self, cell: usize) -> Chain<'_> {
        Chain {
            next: &self.particle_next,
            cursor: self.head(cell),
        }
    }

    /// Number of cells holding at least one particle
    pub fn occupied_cells(&self) -> usize {
        self.cell_head
            .iter()
            .filter(|h| h.load(Ordering::Relaxed) != SENTINEL)
            .count()
    }

    /// Length of the longest chain
    pub fn max_occupancy(&self) -> usize {
        (0..self.cell_head.len())
            .map(|c| self.chain(c).count())
            .max()
            .unwrap_or(0)
    }
}

pub struct Chain<'a> {
    next: &'a [i32],
    cursor: i32,
}

impl Iterator for Chain<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.cursor == SENTINEL {
            return None;
        }
        let current = self.cursor as usize;
        self.cursor = self.next.get(current).copied().unwrap_or(SENTINEL);
        Some(current)
    }
}
