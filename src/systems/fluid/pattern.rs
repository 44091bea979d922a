//! Initial flow: superposed vortices and waves, evaluated in uv space

use glam::Vec2;

struct MiniVortex {
    center: Vec2,
    radius: f32,
    strength: f32,
    clockwise: bool,
}

const MINI_VORTICES: [MiniVortex; 4] = [
    MiniVortex { center: Vec2::new(0.25, 0.25), radius: 0.1, strength: 0.03, clockwise: true },
    MiniVortex { center: Vec2::new(0.75, 0.25), radius: 0.08, strength: 0.03, clockwise: false },
    MiniVortex { center: Vec2::new(0.25, 0.75), radius: 0.08, strength: 0.03, clockwise: false },
    MiniVortex { center: Vec2::new(0.75, 0.75), radius: 0.1, strength: 0.03, clockwise: true },
];

const CENTRAL_RADIUS: f32 = 0.3;

/// Velocity of the seeded flow at `uv` in [0, 1]²
pub fn initial_flow(uv: Vec2) -> Vec2 {
    let (fx, fy) = (uv.x, uv.y);
    let n = uv - 0.5;
    let dist = n.length();

    // central vortex, fading to zero at its rim
    let central = if dist < CENTRAL_RADIUS {
        let falloff = (CENTRAL_RADIUS - dist) / CENTRAL_RADIUS;
        n.perp() * (CENTRAL_RADIUS - dist) * 0.1 * falloff
    } else {
        Vec2::ZERO
    };

    let horizontal = Vec2::new((fy * 10.0).cos() * 0.02, 0.0);
    let vertical = Vec2::new(0.0, (fx * 8.0).sin() * 0.02);
    let diagonal = Vec2::new(((fx + fy) * 6.0).sin(), ((fx - fy) * 6.0).cos()) * 0.015;

    central + horizontal + vertical + diagonal + mini_vortices(uv)
}

fn mini_vortices(uv: Vec2) -> Vec2 {
    let mut flow = Vec2::ZERO;
    for v in &MINI_VORTICES {
        let d = uv - v.center;
        let dist = d.length();
        if dist < v.radius {
            let factor = (v.radius - dist) / v.radius * v.strength;
            let dir = if v.clockwise { -1.0 } else { 1.0 };
            flow += d.perp() * factor * dir;
        }
    }
    flow
}
