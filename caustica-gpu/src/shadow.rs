use glam::{Vec3, Vec4Swizzles};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{
    lerp, Intersector, Light, MaterialClass, MaterialsView, Ray, Vec3Ext,
    WhiteNoise, PENUMBRA_MAX,
};

/// Result of testing a surface point's visibility towards a light.
#[derive(Clone, Copy)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct SoftShadow {
    /// Fraction of light reaching the point, `<0.0, 1.0>`.
    pub visibility: f32,

    /// Estimated world-space width of the penumbra at the receiver.
    pub penumbra: f32,

    /// Distance to the nearest occluder or [`Self::NO_OCCLUDER`].
    pub occluder_distance: f32,

    /// Color of light that got through translucent occluders, normalized so
    /// that its largest component is one.
    pub tint: Vec3,
}

impl SoftShadow {
    pub const NO_OCCLUDER: f32 = f32::MAX;

    pub fn lit() -> Self {
        Self {
            visibility: 1.0,
            penumbra: 0.0,
            occluder_distance: Self::NO_OCCLUDER,
            tint: Vec3::ONE,
        }
    }

    fn from_transmittance(
        transmittance: Vec3,
        penumbra: f32,
        occluder_distance: f32,
    ) -> Self {
        let visibility = transmittance.max_element().clamp(0.0, 1.0);

        let tint = if visibility > 0.0 {
            transmittance / visibility
        } else {
            Vec3::ONE
        };

        Self {
            visibility,
            penumbra,
            occluder_distance,
            tint,
        }
    }

    pub fn transmittance(&self) -> Vec3 {
        self.tint * self.visibility
    }

    pub fn is_occluded(&self) -> bool {
        self.occluder_distance < Self::NO_OCCLUDER
    }

    /// Returns transmittance blended towards full light by `1 - strength`;
    /// strength of zero disables shadows.
    pub fn with_strength(&self, strength: f32) -> Vec3 {
        lerp(Vec3::ONE, self.transmittance(), strength)
    }
}

/// Traces shadow rays, optionally through translucent occluders.
#[derive(Clone, Copy)]
pub struct ShadowSampler<'a> {
    intersector: Intersector<'a>,
    materials: MaterialsView<'a>,
}

impl<'a> ShadowSampler<'a> {
    /// Maximum number of surfaces a single shadow ray can pass through.
    pub const MAX_CROSSINGS: u32 = 16;

    /// Offset applied to shadow-ray origins to avoid self-shadowing.
    pub const BIAS: f32 = 0.001;

    pub fn new(
        intersector: Intersector<'a>,
        materials: MaterialsView<'a>,
    ) -> Self {
        Self {
            intersector,
            materials,
        }
    }

    pub fn sample(
        &self,
        point: Vec3,
        normal: Vec3,
        light: Light,
        noise: &mut WhiteNoise,
    ) -> SoftShadow {
        if light.is_ambient() {
            return SoftShadow::lit();
        }

        let origin = point + normal * Self::BIAS;

        if light.casts_hard_shadows() {
            let (l, distance) = light.incidence(origin);
            let (transmittance, occluder_distance) =
                self.march(origin, l, distance);

            return SoftShadow::from_transmittance(
                transmittance,
                0.0,
                occluder_distance,
            );
        }

        let (l, _) = light.incidence(origin);
        let (t, b) = l.any_orthonormal_pair();

        let light_size = if light.is_directional() {
            2.0 * light.radius().tan() * Light::DIRECTIONAL_DISTANCE
        } else {
            2.0 * light.radius()
        };

        let mut transmittance = Vec3::ZERO;
        let mut counted = 0;
        let mut penumbra = 0.0;
        let mut occluded = 0;
        let mut occluder_distance = SoftShadow::NO_OCCLUDER;
        let mut sample_idx = 0;

        while sample_idx < light.soft_shadow_samples() {
            sample_idx += 1;

            let disk = noise.sample_disk();
            let offset = t * disk.x + b * disk.y;

            let (dir, distance) = if light.is_directional() {
                (
                    (l + offset * light.radius().tan()).normalize(),
                    Light::DIRECTIONAL_DISTANCE,
                )
            } else {
                let to_light =
                    light.position() + offset * light.radius() - origin;

                (to_light.normalize(), to_light.length())
            };

            if dir.dot(normal) <= 0.0 {
                continue;
            }

            counted += 1;

            let (sample_transmittance, sample_occluder_distance) =
                self.march(origin, dir, distance);

            transmittance += sample_transmittance;

            if sample_occluder_distance < SoftShadow::NO_OCCLUDER {
                occluded += 1;
                penumbra += estimate_penumbra(
                    light_size,
                    sample_occluder_distance,
                    distance,
                );

                occluder_distance =
                    occluder_distance.min(sample_occluder_distance);
            }
        }

        if counted == 0 {
            return SoftShadow {
                visibility: 0.0,
                penumbra: 0.0,
                occluder_distance: SoftShadow::NO_OCCLUDER,
                tint: Vec3::ONE,
            };
        }

        let penumbra = if occluded > 0 {
            (penumbra / (occluded as f32)).min(PENUMBRA_MAX)
        } else {
            0.0
        };

        SoftShadow::from_transmittance(
            transmittance / (counted as f32),
            penumbra,
            occluder_distance,
        )
    }

    /// Marches a shadow ray through translucent occluders, returning the
    /// transmittance and the distance to the first occluder.
    fn march(
        &self,
        mut origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> (Vec3, f32) {
        let mut transmittance = Vec3::ONE;
        let mut travelled = 0.0;
        let mut occluder_distance = SoftShadow::NO_OCCLUDER;
        let mut crossings = 0;

        while crossings < Self::MAX_CROSSINGS {
            crossings += 1;

            let remaining = max_distance - travelled;

            if remaining <= Ray::MIN_DISTANCE {
                break;
            }

            let ray = Ray::new(origin, direction)
                .with_range(Ray::MIN_DISTANCE, remaining);

            let hit = self.intersector.trace_nearest(ray);

            if hit.is_none() {
                break;
            }

            if occluder_distance == SoftShadow::NO_OCCLUDER {
                occluder_distance = travelled + hit.distance;
            }

            let material = self.materials.get(hit.material_id);

            match material.classify() {
                MaterialClass::Glass { .. } => {
                    if hit.is_front_face(direction) {
                        transmittance *= material.base_color.xyz()
                            * material.effective_transmission();
                    } else {
                        transmittance *= material
                            .absorption
                            .xyz()
                            .beer_lambert(hit.distance);
                    }
                }

                _ => {
                    return (Vec3::ZERO, occluder_distance);
                }
            }

            if transmittance.max_element() <= 0.0 {
                return (Vec3::ZERO, occluder_distance);
            }

            origin = hit.point + direction * Self::BIAS;
            travelled += hit.distance + Self::BIAS;
        }

        (transmittance, occluder_distance)
    }
}

/// Estimates penumbra width from the similar triangles formed by the light,
/// the occluder and the receiver.
pub fn estimate_penumbra(
    light_size: f32,
    occluder_distance: f32,
    light_distance: f32,
) -> f32 {
    light_size * occluder_distance
        / (light_distance - occluder_distance).max(crate::CAUSTICA_EPSILON)
        / 2.0
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{uvec2, vec3, vec4, Vec4};

    use super::*;
    use crate::{BvhView, Material, MaterialId, Sphere, TrianglesView};

    fn sampler<'a>(
        spheres: &'a [Sphere],
        materials: &'a [Material],
    ) -> ShadowSampler<'a> {
        ShadowSampler::new(
            Intersector::new(
                spheres,
                &[],
                &[],
                TrianglesView::new(&[]),
                BvhView::new(&[]),
            ),
            MaterialsView::new(materials),
        )
    }

    fn diffuse() -> Material {
        Material {
            base_color: vec4(0.8, 0.8, 0.8, 1.0),
            roughness: 1.0,
            ior: 1.5,
            ..Default::default()
        }
    }

    fn noise() -> WhiteNoise {
        WhiteNoise::for_sample(0, uvec2(1, 2), 0)
    }

    #[test]
    fn hard_shadow_behind_sphere() {
        let spheres = [Sphere::new(Vec3::ZERO, 1.0, MaterialId::new(0))];
        let materials = [diffuse()];
        let sampler = sampler(&spheres, &materials);
        let light = Light::point(vec3(0.0, 5.0, 0.0), 0.0, Vec3::ONE, 1.0, 1);

        let shadow = sampler.sample(
            vec3(0.0, -5.0, 0.0),
            Vec3::Y,
            light,
            &mut noise(),
        );

        assert_eq!(0.0, shadow.visibility);
        assert!(shadow.is_occluded());
        assert_relative_eq!(shadow.occluder_distance, 4.0, epsilon = 0.01);

        let shadow = sampler.sample(
            vec3(5.0, -5.0, 0.0),
            Vec3::Y,
            light,
            &mut noise(),
        );

        assert_eq!(1.0, shadow.visibility);
        assert!(!shadow.is_occluded());
        assert_eq!(SoftShadow::lit().tint, shadow.tint);
    }

    #[test]
    fn colored_shadow_through_glass() {
        let spheres = [Sphere::new(Vec3::ZERO, 1.0, MaterialId::new(0))];

        let materials = [Material {
            base_color: vec4(1.0, 0.5, 0.25, 1.0),
            transmission: 1.0,
            ..diffuse()
        }];

        let sampler = sampler(&spheres, &materials);
        let light = Light::point(vec3(0.0, 5.0, 0.0), 0.0, Vec3::ONE, 1.0, 1);

        let shadow = sampler.sample(
            vec3(0.0, -5.0, 0.0),
            Vec3::Y,
            light,
            &mut noise(),
        );

        assert_relative_eq!(shadow.visibility, 1.0);
        assert_relative_eq!(shadow.tint.y, 0.5);
        assert_relative_eq!(shadow.tint.z, 0.25);
        assert!(shadow.is_occluded());
    }

    #[test]
    fn glass_absorbs_with_thickness() {
        let spheres = [Sphere::new(Vec3::ZERO, 1.0, MaterialId::new(0))];

        let materials = [Material {
            base_color: Vec4::ONE,
            absorption: vec4(0.5, 0.5, 0.5, 0.0),
            transmission: 1.0,
            ..diffuse()
        }];

        let sampler = sampler(&spheres, &materials);
        let light = Light::point(vec3(0.0, 5.0, 0.0), 0.0, Vec3::ONE, 1.0, 1);

        let shadow = sampler.sample(
            vec3(0.0, -5.0, 0.0),
            Vec3::Y,
            light,
            &mut noise(),
        );

        // Two units of glass
        assert_relative_eq!(
            shadow.visibility,
            (-1.0f32).exp(),
            epsilon = 0.01
        );
    }

    #[test]
    fn soft_shadow_is_partial() {
        let spheres = [Sphere::new(Vec3::ZERO, 1.0, MaterialId::new(0))];
        let materials = [diffuse()];
        let sampler = sampler(&spheres, &materials);
        let light = Light::point(vec3(0.0, 5.0, 0.0), 2.0, Vec3::ONE, 1.0, 16);

        let shadow = sampler.sample(
            vec3(1.5, -5.0, 0.0),
            Vec3::Y,
            light,
            &mut noise(),
        );

        assert!(shadow.visibility > 0.0);
        assert!(shadow.visibility < 1.0);
        assert!(shadow.penumbra > 0.0);
        assert!(shadow.penumbra <= PENUMBRA_MAX);
    }

    #[test]
    fn soft_light_below_the_surface() {
        let sampler = sampler(&[], &[]);
        let light = Light::point(vec3(0.0, -5.0, 0.0), 1.0, Vec3::ONE, 1.0, 8);
        let shadow = sampler.sample(Vec3::ZERO, Vec3::Y, light, &mut noise());

        assert_eq!(0.0, shadow.visibility);
    }

    #[test]
    fn ambient_light_is_never_shadowed() {
        let spheres = [Sphere::new(Vec3::ZERO, 1.0, MaterialId::new(0))];
        let materials = [diffuse()];

        let shadow = sampler(&spheres, &materials).sample(
            vec3(0.0, -5.0, 0.0),
            Vec3::Y,
            Light::ambient(Vec3::ONE, 1.0),
            &mut noise(),
        );

        assert_eq!(SoftShadow::lit(), shadow);
    }

    #[test]
    fn strength() {
        let shadow = SoftShadow {
            visibility: 0.0,
            ..SoftShadow::lit()
        };

        assert_eq!(Vec3::ONE, shadow.with_strength(0.0));
        assert_eq!(Vec3::splat(0.5), shadow.with_strength(0.5));
        assert_eq!(Vec3::ZERO, shadow.with_strength(1.0));
    }

    #[test]
    fn penumbra_grows_with_occluder_distance() {
        let near = estimate_penumbra(1.0, 1.0, 10.0);
        let far = estimate_penumbra(1.0, 5.0, 10.0);

        assert!(far > near);
        assert_relative_eq!(far, 0.5);
    }
}
