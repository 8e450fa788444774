use bytemuck::{Pod, Zeroable};
use glam::{vec4, Vec3, Vec4, Vec4Swizzles};

use crate::{F32Ext, Vec3Ext};

#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct Light {
    /// x - position x (point lights) or direction x (directional lights)
    /// y - position y (point lights) or direction y (directional lights)
    /// z - position z (point lights) or direction z (directional lights)
    /// w - radius (point lights) or angular radius in radians (directional
    ///     lights); zero means hard shadows
    pub d0: Vec4,

    /// x - color r
    /// y - color g
    /// z - color b
    /// w - intensity
    pub d1: Vec4,

    /// x - (as u32) light type, see `Self::TYPE_*`
    /// y - (as u32) number of soft-shadow samples
    pub d2: Vec4,
}

impl Light {
    pub const TYPE_AMBIENT: u32 = 0;
    pub const TYPE_POINT: u32 = 1;
    pub const TYPE_DIRECTIONAL: u32 = 2;

    /// Lights with radius up to this value cast hard shadows.
    pub const HARD_SHADOW_RADIUS: f32 = 0.001;

    /// Maximum number of soft-shadow samples taken per light.
    pub const MAX_SOFT_SHADOW_SAMPLES: u32 = 16;

    /// Distance at which directional lights are assumed to be, for the
    /// purposes of shadow rays and penumbra estimation.
    pub const DIRECTIONAL_DISTANCE: f32 = 100_000.0;

    pub fn ambient(color: Vec3, intensity: f32) -> Self {
        Self::build(Self::TYPE_AMBIENT, Vec3::ZERO, 0.0, color, intensity, 0)
    }

    pub fn point(
        position: Vec3,
        radius: f32,
        color: Vec3,
        intensity: f32,
        soft_shadow_samples: u32,
    ) -> Self {
        Self::build(
            Self::TYPE_POINT,
            position,
            radius,
            color,
            intensity,
            soft_shadow_samples,
        )
    }

    /// Creates a directional light; `direction` is the direction the light
    /// travels in.
    pub fn directional(
        direction: Vec3,
        angular_radius: f32,
        color: Vec3,
        intensity: f32,
        soft_shadow_samples: u32,
    ) -> Self {
        Self::build(
            Self::TYPE_DIRECTIONAL,
            direction.normalize(),
            angular_radius,
            color,
            intensity,
            soft_shadow_samples,
        )
    }

    fn build(
        ty: u32,
        position_or_direction: Vec3,
        radius: f32,
        color: Vec3,
        intensity: f32,
        soft_shadow_samples: u32,
    ) -> Self {
        Self {
            d0: position_or_direction.extend(radius.max(0.0)),
            d1: color.extend(intensity),
            d2: vec4(
                f32::from_bits(ty),
                f32::from_bits(soft_shadow_samples),
                0.0,
                0.0,
            ),
        }
    }

    pub fn ty(&self) -> u32 {
        self.d2.x.to_bits()
    }

    pub fn is_ambient(&self) -> bool {
        self.ty() == Self::TYPE_AMBIENT
    }

    pub fn is_point(&self) -> bool {
        self.ty() == Self::TYPE_POINT
    }

    pub fn is_directional(&self) -> bool {
        self.ty() == Self::TYPE_DIRECTIONAL
    }

    pub fn position(&self) -> Vec3 {
        self.d0.xyz()
    }

    pub fn direction(&self) -> Vec3 {
        self.d0.xyz()
    }

    pub fn radius(&self) -> f32 {
        self.d0.w
    }

    pub fn color(&self) -> Vec3 {
        self.d1.xyz()
    }

    pub fn intensity(&self) -> f32 {
        self.d1.w
    }

    pub fn radiance(&self) -> Vec3 {
        self.color() * self.intensity()
    }

    pub fn casts_hard_shadows(&self) -> bool {
        self.radius() <= Self::HARD_SHADOW_RADIUS
    }

    pub fn soft_shadow_samples(&self) -> u32 {
        self.d2.y.to_bits().clamp(1, Self::MAX_SOFT_SHADOW_SAMPLES)
    }

    /// Returns direction from `point` towards this light, together with the
    /// distance to it.
    pub fn incidence(&self, point: Vec3) -> (Vec3, f32) {
        if self.is_directional() {
            (-self.direction(), Self::DIRECTIONAL_DISTANCE)
        } else {
            let to_light = self.position() - point;
            let distance = to_light.length();

            (to_light / distance.max(crate::CAUSTICA_EPSILON), distance)
        }
    }

    /// Returns attenuation at given distance; `coefficients` contain the
    /// constant, linear and quadratic terms.
    pub fn attenuation(&self, distance: f32, coefficients: Vec4) -> f32 {
        if !self.is_point() {
            return 1.0;
        }

        let denominator = coefficients.x
            + coefficients.y * distance
            + coefficients.z * distance.sqr();

        1.0 / denominator.max(crate::CAUSTICA_EPSILON)
    }

    /// Returns how much this light matters for given surface point; used to
    /// pick the light whose shadow goes to the denoiser.
    pub fn importance(
        &self,
        point: Vec3,
        normal: Vec3,
        coefficients: Vec4,
    ) -> f32 {
        if self.is_ambient() {
            return 0.0;
        }

        let (l, distance) = self.incidence(point);

        normal.dot(l).max(0.0)
            * self.attenuation(distance, coefficients)
            * self.intensity()
            * self.color().luma()
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct LightId(u32);

impl LightId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;

    const ATTENUATION: Vec4 = Vec4::new(1.0, 0.0, 1.0, 0.0);

    #[test]
    fn point_light() {
        let light = Light::point(vec3(0.0, 4.0, 0.0), 0.0, Vec3::ONE, 2.0, 4);
        let (l, distance) = light.incidence(Vec3::ZERO);

        assert!(light.is_point());
        assert!(light.casts_hard_shadows());
        assert_eq!(Vec3::Y, l);
        assert_relative_eq!(distance, 4.0);
        assert_relative_eq!(
            light.attenuation(distance, ATTENUATION),
            1.0 / 17.0
        );
    }

    #[test]
    fn directional_light() {
        let light =
            Light::directional(-Vec3::Y, 0.01, Vec3::ONE, 1.0, 64);

        let (l, _) = light.incidence(vec3(5.0, 0.0, 5.0));

        assert_eq!(Vec3::Y, l);
        assert_eq!(1.0, light.attenuation(1000.0, ATTENUATION));
        assert_eq!(Light::MAX_SOFT_SHADOW_SAMPLES, light.soft_shadow_samples());
        assert!(!light.casts_hard_shadows());
    }

    #[test]
    fn importance() {
        let light = Light::point(vec3(0.0, 4.0, 0.0), 0.0, Vec3::ONE, 2.0, 1);

        assert!(light.importance(Vec3::ZERO, Vec3::Y, ATTENUATION) > 0.0);
        assert_eq!(0.0, light.importance(Vec3::ZERO, -Vec3::Y, ATTENUATION));

        assert_eq!(
            0.0,
            Light::ambient(Vec3::ONE, 1.0).importance(
                Vec3::ZERO,
                Vec3::Y,
                ATTENUATION
            )
        );
    }
}
