use glam::Vec2;

use crate::random::{random_f32_ranged, splitmix_64, xor_shift_u32};

/// Rejection-sample a uniform point inside the unit disk.
pub fn sample_uniform_disk(state: &mut u32) -> Vec2 {
    loop {
        let x = random_f32_ranged(state, -1.0, 1.0);
        let y = random_f32_ranged(state, -1.0, 1.0);
        if x * x + y * y <= 1.0 {
            return Vec2::new(x, y);
        }
    }
}

/// Fill `points` with uniform unit-disk samples, forcing index 0 to the disk centre so the
/// zero-aperture case always includes the un-jittered principal ray.
pub fn fill_disk_samples(points: &mut [Vec2], seed: u64) {
    let mut seed_state = seed;
    let mut state = splitmix_64(&mut seed_state) as u32 | 1;
    xor_shift_u32(&mut state);

    if let Some(first) = points.first_mut() {
        *first = Vec2::ZERO;
    }
    for point in points.iter_mut().skip(1) {
        *point = sample_uniform_disk(&mut state);
    }
}
