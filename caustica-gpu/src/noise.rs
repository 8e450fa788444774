use core::f32::consts::PI;

use glam::{uvec2, vec2, vec3, UVec2, Vec2, Vec3};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::hash_u32;

/// Deterministic white-noise generator.
///
/// Each pixel-sample (and each photon slot) gets its own sequence derived from
/// the frame index, so re-rendering the same frame yields the same image.
#[derive(Copy, Clone)]
pub struct WhiteNoise {
    state: u32,
}

impl WhiteNoise {
    pub fn new(seed: u32, id: UVec2) -> Self {
        Self {
            state: seed
                ^ 48619u32.wrapping_mul(id.x)
                ^ 95461u32.wrapping_mul(id.y),
        }
    }

    /// Creates noise for given sample of given pixel.
    pub fn for_sample(frame: u32, screen_pos: UVec2, sample: u32) -> Self {
        let seed = hash_u32(frame ^ hash_u32(sample.wrapping_add(0x9e3779b9)));
        let mut this = Self::new(seed, screen_pos);

        // Decorrelates neighbouring pixels that share the seed
        this.sample_int();
        this
    }

    /// Creates noise for given photon slot.
    pub fn for_photon(frame: u32, slot: u32) -> Self {
        let seed = hash_u32(frame.wrapping_add(0x5bd1e995));
        let mut this = Self::new(seed, uvec2(slot, 0x2545f491));

        this.sample_int();
        this
    }

    /// Generates a uniform sample in range `<0.0, 1.0)`.
    pub fn sample(&mut self) -> f32 {
        (self.sample_int() >> 8) as f32 / 16_777_216.0
    }

    /// Generates a uniform sample in range `<0, u32::MAX>`.
    pub fn sample_int(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(747796405)
            .wrapping_add(2891336453);

        let word = ((self.state >> ((self.state >> 28) + 4)) ^ self.state)
            .wrapping_mul(277803737);

        (word >> 22) ^ word
    }

    /// Generates a uniform sample on a circle.
    pub fn sample_circle(&mut self) -> Vec2 {
        let angle = self.sample() * PI * 2.0;

        vec2(angle.cos(), angle.sin())
    }

    /// Generates a uniform sample inside of a unit disk.
    pub fn sample_disk(&mut self) -> Vec2 {
        let radius = self.sample().sqrt();

        self.sample_circle() * radius
    }

    /// Generates a uniform direction.
    pub fn sample_sphere(&mut self) -> Vec3 {
        let z = self.sample() * 2.0 - 1.0;
        let r = (1.0 - z * z).max(0.0).sqrt();
        let phi = self.sample() * 2.0 * PI;

        vec3(r * phi.cos(), r * phi.sin(), z)
    }

    /// Generates a uniform direction inside of a cone around `axis` whose
    /// half-angle has the given cosine.
    pub fn sample_cone(&mut self, axis: Vec3, cos_max: f32) -> Vec3 {
        let cos_theta = 1.0 - self.sample() * (1.0 - cos_max);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let phi = self.sample() * 2.0 * PI;
        let (t, b) = axis.any_orthonormal_pair();

        (t * (sin_theta * phi.cos())
            + b * (sin_theta * phi.sin())
            + axis * cos_theta)
            .normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let mut a = WhiteNoise::for_sample(7, uvec2(10, 20), 3);
        let mut b = WhiteNoise::for_sample(7, uvec2(10, 20), 3);

        for _ in 0..32 {
            assert_eq!(a.sample_int(), b.sample_int());
        }
    }

    #[test]
    fn samples_stay_in_range() {
        let mut noise = WhiteNoise::for_sample(1, uvec2(3, 4), 0);

        for _ in 0..4096 {
            let s = noise.sample();

            assert!(s >= 0.0 && s < 1.0);
            assert!(noise.sample_disk().length() <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn cone_samples_stay_inside_cone() {
        let mut noise = WhiteNoise::for_photon(0, 123);
        let axis = vec3(0.0, 1.0, 1.0).normalize();
        let cos_max = 20f32.to_radians().cos();

        for _ in 0..1024 {
            let dir = noise.sample_cone(axis, cos_max);

            assert!(dir.dot(axis) >= cos_max - 1e-4);
        }
    }
}
