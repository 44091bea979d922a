//! Semi-Lagrangian advection with a viscosity blend

use glam::Vec2;

use crate::core::dispatch::dispatch_mut;

use super::velocity_grid::VelocityGrid;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdvectParams {
    /// Fluid time step (seconds)
    pub dt: f32,
    /// Weight of the neighbour mean against the advected value, [0, 1]
    pub viscosity: f32,
    /// Multiplier on the result, [0, 1]
    pub dissipation: f32,
    /// Domain extent, converts velocity into uv displacement
    pub extent: Vec2,
}

/// One kernel per cell: trace back from the cell centre along its own
/// velocity, sample `src` there, blend toward the neighbour mean, damp.
///
/// Reads only `src`, writes only `dst`. Every output is a convex
/// combination of `src` values scaled by `dissipation`, so the peak speed
/// never grows.
pub fn advect(src: &VelocityGrid, dst: &mut VelocityGrid, params: &AdvectParams) {
    assert_eq!(src.resolution(), dst.resolution(), "advect: resolution mismatch");
    let blend = params.viscosity.clamp(0.0, 1.0);
    let damp = params.dissipation.clamp(0.0, 1.0);
    let step = params.dt / params.extent;

    dispatch_mut(dst.cells_mut(), |i, out| {
        let uv = src.center_uv(i);
        let velocity = src.cells()[i];
        let source = uv - velocity * step;

        let carried = src.sample_uv(source);
        let smoothed = carried.lerp(src.neighbor_mean(i), blend);
        *out = smoothed * damp;
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(dt: f32, viscosity: f32) -> AdvectParams {
        AdvectParams {
            dt,
            viscosity,
            dissipation: 1.0,
            extent: Vec2::splat(2.0),
        }
    }

    #[test]
    fn uniform_flow_is_preserved() {
        let src = VelocityGrid::from_fn("src", 16, |_| Vec2::new(0.3, -0.1)).unwrap();
        let mut dst = VelocityGrid::from_fn("dst", 16, |_| Vec2::ZERO).unwrap();
        advect(&src, &mut dst, &params(0.1, 0.5));
        for v in dst.cells() {
            assert!((*v - Vec2::new(0.3, -0.1)).length() < 1e-6);
        }
    }

    #[test]
    fn zero_step_without_viscosity_copies() {
        let src = VelocityGrid::from_fn("src", 8, |uv| uv).unwrap();
        let mut dst = VelocityGrid::from_fn("dst", 8, |_| Vec2::ZERO).unwrap();
        advect(&src, &mut dst, &params(0.0, 0.0));
        assert_eq!(dst.cells(), src.cells());
    }

    #[test]
    fn dissipation_scales_the_result() {
        let src = VelocityGrid::from_fn("src", 8, |_| Vec2::new(1.0, 0.0)).unwrap();
        let mut dst = VelocityGrid::from_fn("dst", 8, |_| Vec2::ZERO).unwrap();
        let mut p = params(0.0, 0.0);
        p.dissipation = 0.5;
        advect(&src, &mut dst, &p);
        assert!(dst.cells().iter().all(|v| *v == Vec2::new(0.5, 0.0)));
    }

    #[test]
    fn huge_time_step_stays_bounded() {
        let src = VelocityGrid::from_fn("src", 16, |uv| (uv - 0.5).perp() * 4.0).unwrap();
        let mut dst = VelocityGrid::from_fn("dst", 16, |_| Vec2::ZERO).unwrap();
        advect(&src, &mut dst, &params(1.0e6, 0.2));
        let peak = src.max_speed();
        assert!(dst.cells().iter().all(|v| v.is_finite() && v.length() <= peak + 1e-5));
    }
}
