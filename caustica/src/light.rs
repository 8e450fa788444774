use glam::Vec3;

use crate::gpu;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Light {
    /// Light coming uniformly from everywhere; casts no shadows.
    Ambient { color: Vec3, intensity: f32 },

    Point {
        position: Vec3,

        /// Size of the light; zero yields hard shadows.
        radius: f32,

        color: Vec3,
        intensity: f32,
        soft_shadow_samples: u32,
    },

    Directional {
        /// Direction light travels in.
        direction: Vec3,

        /// Angular radius, in radians; zero yields hard shadows.
        angular_radius: f32,

        color: Vec3,
        intensity: f32,
        soft_shadow_samples: u32,
    },
}

impl Light {
    pub fn ambient(color: Vec3, intensity: f32) -> Self {
        Self::Ambient { color, intensity }
    }

    pub fn point(position: Vec3, color: Vec3, intensity: f32) -> Self {
        Self::Point {
            position,
            radius: 0.0,
            color,
            intensity,
            soft_shadow_samples: 1,
        }
    }

    pub fn directional(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Self::Directional {
            direction,
            angular_radius: 0.0,
            color,
            intensity,
            soft_shadow_samples: 1,
        }
    }

    /// Makes shadows soft; for directional lights `radius` is the angular
    /// radius.
    pub fn with_radius(mut self, radius: f32, samples: u32) -> Self {
        match &mut self {
            Light::Ambient { .. } => {}

            Light::Point {
                radius: r,
                soft_shadow_samples,
                ..
            }
            | Light::Directional {
                angular_radius: r,
                soft_shadow_samples,
                ..
            } => {
                *r = radius.max(0.0);
                *soft_shadow_samples = samples;
            }
        }

        self
    }

    pub(crate) fn serialize(&self) -> gpu::Light {
        match *self {
            Light::Ambient { color, intensity } => {
                gpu::Light::ambient(color, intensity)
            }

            Light::Point {
                position,
                radius,
                color,
                intensity,
                soft_shadow_samples,
            } => gpu::Light::point(
                position,
                radius,
                color,
                intensity,
                soft_shadow_samples,
            ),

            Light::Directional {
                direction,
                angular_radius,
                color,
                intensity,
                soft_shadow_samples,
            } => gpu::Light::directional(
                direction.normalize_or_zero(),
                angular_radius,
                color,
                intensity,
                soft_shadow_samples,
            ),
        }
    }
}
