use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

/// Derives an independent generator, advancing the base by exactly one draw.
pub fn fork_rng(base_rng: &mut XorShiftRng) -> XorShiftRng {
    XorShiftRng::seed_from_u64(base_rng.gen())
}

/// Samples uniformly from `[low, high)`. A collapsed range always yields `low`.
pub fn sample_uniform(rng: &mut XorShiftRng, (low, high): (f64, f64)) -> f64 {
    assert!(high >= low, "bad range ({}, {})", low, high);
    if high == low {
        return low;
    }
    rng.gen_range(low..high)
}

/// A velocity for procedurally placed vehicles.
pub fn sample_velocity_uniform(rng: &mut XorShiftRng, velocity_range: (f64, f64)) -> f64 {
    sample_uniform(rng, velocity_range)
}

/// A bumper-to-bumper gap between procedurally placed vehicles, in meters.
pub fn sample_distance_uniform(rng: &mut XorShiftRng, distance_range: (f64, f64)) -> f64 {
    sample_uniform(rng, distance_range)
}
