use glam::{vec3, Vec3};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

pub trait Vec3Ext
where
    Self: Sized,
{
    /// Reflects this direction-vector around `normal`.
    fn reflect(self, normal: Self) -> Self;

    /// Refracts this direction-vector through a surface with given normal
    /// (pointing against this vector) and ratio of indices of refraction.
    ///
    /// Returns zero on total internal reflection, as GLSL's `refract()` does.
    fn refract(self, normal: Self, eta: f32) -> Self;

    /// Returns luminance of this color-vector.
    fn luma(self) -> f32;

    /// Applies `exp()` to each component.
    fn exp(self) -> Self;

    /// Returns `exp(-self * distance)`, i.e. Beer-Lambert transmittance
    /// through a medium with this absorption coefficient.
    fn beer_lambert(self, distance: f32) -> Self;
}

impl Vec3Ext for Vec3 {
    fn reflect(self, normal: Self) -> Self {
        self - 2.0 * normal.dot(self) * normal
    }

    fn refract(self, normal: Self, eta: f32) -> Self {
        let cos_i = normal.dot(self);
        let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);

        if k < 0.0 {
            Vec3::ZERO
        } else {
            eta * self - (eta * cos_i + k.sqrt()) * normal
        }
    }

    fn luma(self) -> f32 {
        self.dot(vec3(0.2126, 0.7152, 0.0722))
    }

    fn exp(self) -> Self {
        vec3(self.x.exp(), self.y.exp(), self.z.exp())
    }

    fn beer_lambert(self, distance: f32) -> Self {
        (-self * distance.max(0.0)).exp()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn refract_straight_through() {
        let dir = vec3(0.0, -1.0, 0.0);
        let out = dir.refract(Vec3::Y, 1.0 / 1.5);

        assert_relative_eq!(out.x, 0.0);
        assert_relative_eq!(out.y, -1.0);
        assert_relative_eq!(out.z, 0.0);
    }

    #[test]
    fn refract_total_internal_reflection() {
        // 60 degrees off the normal, leaving glass (critical angle ~41.8)
        let dir = vec3(60f32.to_radians().sin(), 60f32.to_radians().cos(), 0.0);
        let out = dir.refract(-Vec3::Y, 1.5);

        assert_eq!(Vec3::ZERO, out);
    }

    #[test]
    fn beer_lambert() {
        let t = vec3(0.0, 1.0, 2.0).beer_lambert(0.5);

        assert_relative_eq!(t.x, 1.0);
        assert_relative_eq!(t.y, (-0.5f32).exp());
        assert_relative_eq!(t.z, (-1.0f32).exp());
    }
}
