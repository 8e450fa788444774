use glam::Vec3;
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{lerp, F32Ext};

/// Simple analytic sky: a gradient from the horizon towards the zenith, with
/// a darker ground below the horizon.
#[derive(Clone, Copy)]
pub struct Sky {
    intensity: f32,
}

impl Sky {
    const ZENITH: Vec3 = Vec3::new(0.25, 0.45, 0.85);
    const HORIZON: Vec3 = Vec3::new(0.8, 0.85, 0.9);
    const GROUND: Vec3 = Vec3::new(0.3, 0.28, 0.25);

    pub fn new(intensity: f32) -> Self {
        Self {
            intensity: intensity.max(0.0),
        }
    }

    pub fn eval(&self, direction: Vec3) -> Vec3 {
        let y = direction.normalize_or_zero().y;

        let color = if y >= 0.0 {
            lerp(Self::HORIZON, Self::ZENITH, y.sqrt())
        } else {
            lerp(Self::HORIZON, Self::GROUND, (-y * 4.0).saturate())
        };

        color * self.intensity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eval() {
        let sky = Sky::new(2.0);

        assert!(sky.eval(Vec3::Y).abs_diff_eq(Sky::ZENITH * 2.0, 1e-6));
        assert!(sky.eval(Vec3::X).abs_diff_eq(Sky::HORIZON * 2.0, 1e-6));
        assert!(sky.eval(-Vec3::Y).abs_diff_eq(Sky::GROUND * 2.0, 1e-6));
        assert_eq!(Vec3::ZERO, Sky::new(0.0).eval(Vec3::Y));
    }
}
