use bytemuck::{Pod, Zeroable};
use glam::Vec4;

use crate::{Camera, RAY_BUDGET_PER_PIXEL};

/// Per-frame parameters shared by all invocations.
#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct SceneConstants {
    pub camera: Camera,

    /// x - constant term
    /// y - linear term
    /// z - quadratic term
    pub attenuation: Vec4,

    pub sphere_count: u32,
    pub plane_count: u32,
    pub cuboid_count: u32,
    pub light_count: u32,
    pub triangle_count: u32,
    pub samples_per_pixel: u32,
    pub max_bounces: u32,
    pub frame: u32,
    pub photon_count: u32,

    pub photon_radius: f32,
    pub caustic_intensity: f32,
    pub shadow_strength: f32,
    pub sky_intensity: f32,
    pub _pad0: u32,
    pub _pad1: u32,
    pub _pad2: u32,
}

impl SceneConstants {
    pub fn max_bounces(&self) -> u32 {
        self.max_bounces.max(1)
    }

    /// Returns the number of samples taken per pixel, reduced so that all of
    /// them together stay within the per-pixel ray budget.
    pub fn sample_count(&self) -> u32 {
        let limit = (RAY_BUDGET_PER_PIXEL / self.max_bounces()).max(1);

        self.samples_per_pixel.clamp(1, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_count() {
        let mut constants = SceneConstants {
            samples_per_pixel: 0,
            max_bounces: 4,
            ..Default::default()
        };

        assert_eq!(1, constants.sample_count());

        constants.samples_per_pixel = 8;
        assert_eq!(8, constants.sample_count());

        constants.samples_per_pixel = 100;
        assert_eq!(RAY_BUDGET_PER_PIXEL / 4, constants.sample_count());

        constants.max_bounces = 1000;
        assert_eq!(1, constants.sample_count());
    }
}
