use glam::Vec2;

use spiralens_math::fill_disk_samples;
use spiralens_scene::MAX_RAY_COUNT;

/// Precomputed jitter offsets on the unit aperture disk, generated once and reused for every
/// frame. Index 0 is the disk centre, so the zero-aperture case always traces the un-jittered
/// principal ray.
#[derive(Debug, Clone)]
pub struct ApertureSamples {
    offsets: [Vec2; MAX_RAY_COUNT as usize],
}

impl Default for ApertureSamples {
    fn default() -> Self {
        Self::generate(0x51_24_1)
    }
}

impl ApertureSamples {
    pub fn generate(seed: u64) -> Self {
        let mut offsets = [Vec2::ZERO; MAX_RAY_COUNT as usize];
        fill_disk_samples(&mut offsets, seed);
        Self { offsets }
    }

    pub fn offsets(&self) -> &[Vec2] {
        &self.offsets
    }
}
