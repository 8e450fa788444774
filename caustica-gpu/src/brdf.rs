use core::f32::consts::PI;

use glam::Vec3;
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{F32Ext, Surface, Vec3Ext};

/// Cook-Torrance specular lobe (GGX distribution, Smith-Schlick geometry
/// term, Schlick's Fresnel) paired with Lambertian diffuse.
///
/// The model is an approximation and doesn't account for multiple scattering
/// between microfacets.
#[derive(Clone, Copy)]
pub struct PbrBrdf<'a> {
    surface: &'a Surface,
}

impl<'a> PbrBrdf<'a> {
    /// Roughness is clamped to this value, since perfectly smooth surfaces
    /// would produce infinitely narrow highlights.
    pub const MIN_ROUGHNESS: f32 = 0.045;

    pub fn new(surface: &'a Surface) -> Self {
        Self { surface }
    }

    /// Evaluates the BRDF for given normal, view and light directions (all
    /// pointing away from the surface); the result is not multiplied by
    /// `n·l`.
    pub fn eval(self, n: Vec3, v: Vec3, l: Vec3) -> BrdfValue {
        let n_o_l = n.dot(l);
        let n_o_v = n.dot(v);

        if n_o_l <= 0.0 || n_o_v <= 0.0 {
            return BrdfValue::default();
        }

        let h = (v + l).normalize();
        let n_o_h = n.dot(h).saturate();
        let v_o_h = v.dot(h).saturate();
        let roughness = self.surface.roughness.max(Self::MIN_ROUGHNESS);

        let d = d_ggx(roughness, n_o_h);
        let g = g_smith_schlick(roughness, n_o_v, n_o_l);
        let f = f_schlick(self.surface.f0(), v_o_h);

        let specular = f * (d * g / (4.0 * n_o_v * n_o_l).max(0.0001));
        let k_d = (Vec3::ONE - f) * (1.0 - self.surface.metallic);
        let diffuse = k_d * self.surface.base_color / PI;

        BrdfValue { diffuse, specular }
    }
}

#[derive(Clone, Copy, Default)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct BrdfValue {
    pub diffuse: Vec3,
    pub specular: Vec3,
}

/// GGX normal distribution; uses the perceptual mapping `α = roughness²`.
pub fn d_ggx(roughness: f32, n_o_h: f32) -> f32 {
    let a2 = roughness.sqr().sqr();
    let denom = n_o_h.sqr() * (a2 - 1.0) + 1.0;

    a2 / (PI * denom.sqr()).max(crate::CAUSTICA_EPSILON)
}

/// Smith's shadowing-masking with the Schlick-GGX approximation, using the
/// `k = (roughness + 1)² / 8` remapping for analytic lights.
pub fn g_smith_schlick(roughness: f32, n_o_v: f32, n_o_l: f32) -> f32 {
    let k = (roughness + 1.0).sqr() / 8.0;

    let g1 = |n_o_x: f32| n_o_x / (n_o_x * (1.0 - k) + k);

    g1(n_o_v) * g1(n_o_l)
}

pub fn f_schlick(f0: Vec3, cos_theta: f32) -> Vec3 {
    f0 + (Vec3::ONE - f0) * (1.0 - cos_theta).saturate().powf(5.0)
}

pub fn f_schlick_scalar(f0: f32, cos_theta: f32) -> f32 {
    f0 + (1.0 - f0) * (1.0 - cos_theta).saturate().powf(5.0)
}

/// Refracts `direction` through a dielectric interface whose `normal` faces
/// against it, returning the refracted direction and Schlick's reflectance.
///
/// On total internal reflection the direction is zero and the reflectance is
/// one.
pub fn fresnel_dielectric(
    direction: Vec3,
    normal: Vec3,
    eta: f32,
    f0: f32,
) -> (Vec3, f32) {
    let refracted = direction.refract(normal, eta);

    if refracted == Vec3::ZERO {
        return (Vec3::ZERO, 1.0);
    }

    // Schlick's approximation uses the angle on the less dense side
    let cos_theta = if eta <= 1.0 {
        -direction.dot(normal)
    } else {
        -refracted.dot(normal)
    };

    (refracted.normalize(), f_schlick_scalar(f0, cos_theta.saturate()))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;
    use crate::MaterialClass;

    fn surface(roughness: f32, metallic: f32) -> Surface {
        Surface {
            base_color: Vec3::ONE,
            emission: Vec3::ZERO,
            absorption: Vec3::ZERO,
            metallic,
            roughness,
            transmission: 0.0,
            ior: 1.5,
            specular: 1.0,
            class: MaterialClass::Diffuse,
        }
    }

    /// Integrates `(diffuse + specular) · n·l` over the hemisphere, for view
    /// direction aligned with the normal (where the integrand is symmetric
    /// around the normal).
    fn directional_albedo(surface: &Surface) -> f32 {
        const STEPS: u32 = 50_000;

        let brdf = PbrBrdf::new(surface);
        let n = Vec3::Z;
        let d_theta = (PI / 2.0) / (STEPS as f32);
        let mut total = 0.0;

        for step in 0..STEPS {
            let theta = (step as f32 + 0.5) * d_theta;
            let l = vec3(theta.sin(), 0.0, theta.cos());
            let value = brdf.eval(n, n, l);
            let response = (value.diffuse + value.specular).max_element();

            total += response * theta.cos() * theta.sin() * d_theta;
        }

        total * 2.0 * PI
    }

    #[test]
    fn conserves_energy() {
        for roughness in [0.2, 0.4, 0.6, 0.8, 1.0] {
            for metallic in [0.0, 0.5, 1.0] {
                let albedo = directional_albedo(&surface(roughness, metallic));

                assert!(
                    albedo <= 1.02,
                    "roughness={roughness}, metallic={metallic}: {albedo}"
                );
            }
        }
    }

    #[test]
    fn diffuse_and_fresnel_stay_below_one() {
        for metallic in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let surface = surface(0.5, metallic);
            let f = f_schlick(surface.f0(), 1.0);
            let k_d = (Vec3::ONE - f) * (1.0 - surface.metallic);

            assert!((k_d + f).max_element() <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn no_response_below_the_horizon() {
        let surface = surface(0.5, 0.0);
        let value =
            PbrBrdf::new(&surface).eval(Vec3::Z, Vec3::Z, -Vec3::Z);

        assert_eq!(Vec3::ZERO, value.diffuse);
        assert_eq!(Vec3::ZERO, value.specular);
    }

    #[test]
    fn dielectric() {
        let (refracted, f) =
            fresnel_dielectric(-Vec3::Y, Vec3::Y, 1.0 / 1.5, 0.04);

        assert_relative_eq!(refracted.y, -1.0);
        assert_relative_eq!(f, 0.04);

        // Leaving glass at 60 degrees, past the critical angle
        let dir = vec3(60f32.to_radians().sin(), 60f32.to_radians().cos(), 0.0);
        let (refracted, f) = fresnel_dielectric(dir, -Vec3::Y, 1.5, 0.04);

        assert_eq!(Vec3::ZERO, refracted);
        assert_eq!(1.0, f);
    }

    #[test]
    fn schlick() {
        assert_relative_eq!(f_schlick_scalar(0.04, 1.0), 0.04);
        assert_relative_eq!(f_schlick_scalar(0.04, 0.0), 1.0);
    }
}
