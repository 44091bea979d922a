/// Xorshift32 random number generator
#[inline]
pub fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// Xorshift has a fixed point at zero
#[inline]
pub fn seed_state(seed: u32) -> u32 {
    if seed == 0 { 0x9E37_79B9 } else { seed }
}

/// Uniform in [0, 1)
#[inline]
pub fn next_unit(state: &mut u32) -> f32 {
    (xorshift32(state) >> 8) as f32 / (1u32 << 24) as f32
}

/// Uniform in [lo, hi)
#[inline]
pub fn next_range(state: &mut u32, lo: f32, hi: f32) -> f32 {
    lo + (hi - lo) * next_unit(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_samples_stay_in_range() {
        let mut s = seed_state(12345);
        for _ in 0..10_000 {
            let u = next_unit(&mut s);
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn zero_seed_does_not_stall() {
        let mut s = seed_state(0);
        assert_ne!(xorshift32(&mut s), 0);
    }
}
