//! Localized force impulse that orbits the domain centre

use std::f32::consts::TAU;

use glam::Vec2;

use crate::core::dispatch::dispatch_mut;

use super::velocity_grid::VelocityGrid;

/// Impulse applied on the first tick, before any displacement exists
const FIRST_TICK_FORCE: Vec2 = Vec2::new(0.05, 0.05);
/// Displacement-to-force gain
const DISPLACEMENT_GAIN: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceParams {
    pub strength: f32,
    /// Falloff radius in normalized [-1, 1]² space
    pub radius: f32,
    pub orbit_radius: f32,
    /// Radians per second of simulation time
    pub orbit_rate: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceImpulse {
    /// Centre in normalized [-1, 1]² space
    pub center: Vec2,
    pub force: Vec2,
    pub radius: f32,
}

/// Centre of the force at simulation time `time`
#[inline]
pub fn orbit_center(time: f32, params: &ForceParams) -> Vec2 {
    let angle = time * params.orbit_rate;
    Vec2::new(angle.sin(), angle.cos()) * params.orbit_radius
}

/// `time` folded into one orbit period. The orbit repeats, so the centre
/// is the same; the folded clock keeps full precision forever.
pub fn orbit_time(time: f32, params: &ForceParams) -> f32 {
    let rate = params.orbit_rate.abs();
    if !time.is_finite() || !rate.is_finite() || rate == 0.0 {
        return 0.0;
    }
    let folded = time.rem_euclid(TAU / rate);
    if folded.is_finite() {
        folded
    } else {
        0.0
    }
}

/// Impulse for this tick; the force follows the centre's displacement.
///
/// A non-finite centre or force yields no force, and the last finite
/// centre is kept so the next displacement stays finite.
pub fn impulse(time: f32, last_center: Option<Vec2>, params: &ForceParams) -> ForceImpulse {
    let center = orbit_center(time, params);
    let force = match last_center {
        Some(last) => (center - last) * DISPLACEMENT_GAIN,
        None => FIRST_TICK_FORCE,
    } * params.strength;

    if !center.is_finite() || !force.is_finite() {
        let center = match last_center {
            Some(last) if last.is_finite() => last,
            _ => Vec2::ZERO,
        };
        return ForceImpulse { center, force: Vec2::ZERO, radius: params.radius };
    }
    ForceImpulse { center, force, radius: params.radius }
}

/// Quadratic falloff weight of a cell at normalized position `p`
#[inline]
pub fn falloff(p: Vec2, impulse: &ForceImpulse) -> f32 {
    if impulse.radius <= 0.0 {
        return 0.0;
    }
    let d = p.distance(impulse.center);
    if d >= impulse.radius {
        return 0.0;
    }
    let w = 1.0 - d / impulse.radius;
    w * w
}

/// One kernel per cell: `dst = src + force * falloff`
///
/// Cells outside the radius copy `src` unchanged.
pub fn inject(src: &VelocityGrid, dst: &mut VelocityGrid, impulse: &ForceImpulse) {
    assert_eq!(src.resolution(), dst.resolution(), "inject: resolution mismatch");
    dispatch_mut(dst.cells_mut(), |i, out| {
        let p = src.center_uv(i) * 2.0 - 1.0;
        let base = src.cells()[i];
        *out = base + impulse.force * falloff(p, impulse);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ForceParams {
        ForceParams {
            strength: 1.0,
            radius: 0.18,
            orbit_radius: 0.5,
            orbit_rate: 0.3,
        }
    }

    #[test]
    fn first_tick_uses_the_seed_impulse() {
        let imp = impulse(0.0, None, &params());
        assert_eq!(imp.force, Vec2::new(0.05, 0.05));
        assert_eq!(imp.center, Vec2::new(0.0, 0.5));
    }

    #[test]
    fn later_ticks_follow_the_orbit_displacement() {
        let p = params();
        let last = orbit_center(1.0, &p);
        let imp = impulse(1.1, Some(last), &p);
        assert!((imp.force - (imp.center - last) * 3.0).length() < 1e-7);
    }

    #[test]
    fn non_finite_time_injects_nothing() {
        let last = Vec2::new(0.0, 0.5);
        let imp = impulse(f32::INFINITY, Some(last), &params());
        assert_eq!(imp.force, Vec2::ZERO);
        assert_eq!(imp.center, last);

        let mut p = params();
        p.strength = f32::MAX;
        let imp = impulse(1.0, Some(orbit_center(0.0, &p)), &p);
        assert_eq!(imp.force, Vec2::ZERO);
        assert!(imp.center.is_finite());
    }

    #[test]
    fn folded_clock_keeps_the_centre() {
        let p = params();
        let period = TAU / p.orbit_rate;
        let t = 3.0 * period + 1.25;
        let folded = orbit_time(t, &p);
        assert!((folded - 1.25).abs() < 1e-3);
        assert!((orbit_center(folded, &p) - orbit_center(t, &p)).length() < 1e-3);
        assert_eq!(orbit_time(f32::INFINITY, &p), 0.0);
        assert_eq!(orbit_time(7.0, &ForceParams { orbit_rate: 0.0, ..p }), 0.0);
    }

    #[test]
    fn zero_strength_means_no_force() {
        let mut p = params();
        p.strength = 0.0;
        assert_eq!(impulse(0.0, None, &p).force, Vec2::ZERO);
    }

    #[test]
    fn falloff_is_one_at_centre_and_zero_at_rim() {
        let imp = impulse(0.0, None, &params());
        assert_eq!(falloff(imp.center, &imp), 1.0);
        assert_eq!(falloff(imp.center + Vec2::new(0.18, 0.0), &imp), 0.0);
        let half = falloff(imp.center + Vec2::new(0.09, 0.0), &imp);
        assert!((half - 0.25).abs() < 1e-5);
    }

    #[test]
    fn injection_touches_only_cells_inside_the_radius() {
        let src = VelocityGrid::from_fn("src", 32, |_| Vec2::ZERO).unwrap();
        let mut dst = VelocityGrid::from_fn("dst", 32, |_| Vec2::splat(9.0)).unwrap();
        let imp = ForceImpulse {
            center: Vec2::ZERO,
            force: Vec2::new(1.0, 0.0),
            radius: 0.2,
        };
        inject(&src, &mut dst, &imp);

        for (i, v) in dst.cells().iter().enumerate() {
            let p = dst.center_uv(i) * 2.0 - 1.0;
            if p.length() >= 0.2 {
                assert_eq!(*v, Vec2::ZERO);
            } else {
                assert!(v.x > 0.0 && v.y == 0.0);
            }
        }
    }
}
