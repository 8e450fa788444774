use core::f32::consts::PI;

use glam::Vec3;

use crate::{
    f_schlick, fresnel_dielectric, Hit, LightId, LightsView, MaterialClass,
    MaterialsView, PathFlags, PathState, PbrBrdf, PhotonMapView,
    SceneConstants, ShadowSampler, SoftShadow, Surface, Vec3Ext, WhiteNoise,
};

/// Everything the renderer knows about a shaded surface point.
#[derive(Clone, Copy)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct HitRecord {
    pub point: Vec3,

    /// Shading normal, facing the incoming ray.
    pub normal: Vec3,
    pub face_normal: Vec3,
    pub distance: f32,
    pub surface: Surface,

    /// Radiance leaving the surface through the diffuse lobe (including
    /// ambient light, caustics and emission).
    pub diffuse: Vec3,

    /// Radiance leaving the surface through the analytic specular lobe.
    pub specular: Vec3,

    /// Part of `diffuse` coming from the photon map.
    pub caustic: Vec3,

    /// Shadow cast towards the light contributing the most to this point.
    pub shadow: SoftShadow,
}

/// Secondary segments spawned by a surface interaction.
#[derive(Clone, Copy, Default)]
pub struct Children {
    items: [PathState; 2],
    len: usize,
}

impl Children {
    pub fn push(&mut self, state: PathState) {
        if self.len < self.items.len() {
            self.items[self.len] = state;
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, idx: usize) -> PathState {
        self.items[idx]
    }

    pub fn as_slice(&self) -> &[PathState] {
        &self.items[..self.len]
    }
}

#[derive(Clone, Copy)]
pub struct Shading {
    pub record: HitRecord,

    /// Radiance leaving the surface towards the incoming ray, excluding what
    /// children will find.
    pub color: Vec3,

    /// Children's throughput is relative to the parent's.
    pub children: Children,
}

#[derive(Clone, Copy)]
pub struct MaterialShader<'a> {
    constants: &'a SceneConstants,
    lights: LightsView<'a>,
    materials: MaterialsView<'a>,
    shadows: ShadowSampler<'a>,
    photons: PhotonMapView<'a>,
}

impl<'a> MaterialShader<'a> {
    pub fn new(
        constants: &'a SceneConstants,
        lights: LightsView<'a>,
        materials: MaterialsView<'a>,
        shadows: ShadowSampler<'a>,
        photons: PhotonMapView<'a>,
    ) -> Self {
        Self {
            constants,
            lights,
            materials,
            shadows,
            photons,
        }
    }

    pub fn shade(
        &self,
        state: &PathState,
        hit: &Hit,
        noise: &mut WhiteNoise,
    ) -> Shading {
        let view_distance =
            hit.point.distance(self.constants.camera.position());

        let surface = self
            .materials
            .get(hit.material_id)
            .surface(hit.point, view_distance);

        let record = HitRecord {
            point: hit.point,
            normal: hit.facing_normal(state.direction),
            face_normal: hit.face_normal,
            distance: hit.distance,
            surface,
            diffuse: Vec3::ZERO,
            specular: Vec3::ZERO,
            caustic: Vec3::ZERO,
            shadow: SoftShadow::lit(),
        };

        match surface.class {
            MaterialClass::Glass { ior } => {
                self.shade_glass(state, hit, record, ior, noise)
            }
            _ => self.shade_opaque(state, record, noise),
        }
    }

    fn shade_opaque(
        &self,
        state: &PathState,
        mut record: HitRecord,
        noise: &mut WhiteNoise,
    ) -> Shading {
        let surface = record.surface;
        let n = record.normal;
        let v = -state.direction;
        let brdf = PbrBrdf::new(&surface);
        let attenuation = self.constants.attenuation;
        let dominant = self.lights.dominant(record.point, n, attenuation);

        let mut light_idx = 0;

        while light_idx < self.lights.len() {
            let light_id = LightId::new(light_idx as u32);
            let light = self.lights.get(light_id);

            light_idx += 1;

            if light.is_ambient() {
                record.diffuse += light.radiance() * surface.diffuse_albedo();
                continue;
            }

            let (l, distance) = light.incidence(record.point);
            let n_o_l = n.dot(l);

            if n_o_l <= 0.0 {
                continue;
            }

            let shadow = self.shadows.sample(record.point, n, light, noise);

            if dominant == Some(light_id) {
                record.shadow = shadow;
            }

            let radiance = light.radiance()
                * light.attenuation(distance, attenuation)
                * n_o_l
                * shadow.with_strength(self.constants.shadow_strength);

            let value = brdf.eval(n, v, l);

            record.diffuse += value.diffuse * radiance;

            // Metals get their highlights from the reflection child
            if !surface.class.is_metal() {
                record.specular += value.specular * radiance * surface.specular;
            }
        }

        if surface.class.is_diffuse() && state.depth == 0 {
            record.caustic = self.photons.gather(
                record.point,
                n,
                self.constants.photon_radius,
                self.constants.caustic_intensity,
            ) * surface.diffuse_albedo()
                / PI;

            record.diffuse += record.caustic;
        }

        record.diffuse += surface.emission;

        let mut children = Children::default();

        if surface.class.is_metal() {
            let direction = perturb(
                state.direction.reflect(n),
                n,
                surface.roughness,
                noise,
            );

            let weight = f_schlick(surface.base_color, n.dot(v).max(0.0))
                * surface.specular;

            children.push(PathState {
                origin: record.point + n * Hit::NUDGE_OFFSET,
                direction,
                throughput: weight,
                flags: state.flags.with(PathFlags::SPECULAR, true),
                ..*state
            });
        }

        Shading {
            color: record.diffuse + record.specular,
            record,
            children,
        }
    }

    fn shade_glass(
        &self,
        state: &PathState,
        hit: &Hit,
        mut record: HitRecord,
        ior: f32,
        noise: &mut WhiteNoise,
    ) -> Shading {
        let surface = record.surface;
        let n = record.normal;
        let entering = hit.is_front_face(state.direction);
        let eta = if entering { 1.0 / ior } else { ior };

        let (refracted, reflectance) = fresnel_dielectric(
            state.direction,
            n,
            eta,
            surface.dielectric_f0(),
        );

        let mut children = Children::default();

        children.push(PathState {
            origin: record.point + n * Hit::NUDGE_OFFSET,
            direction: perturb(
                state.direction.reflect(n),
                n,
                surface.roughness,
                noise,
            ),
            throughput: Vec3::splat(reflectance * surface.specular),
            flags: state.flags.with(PathFlags::SPECULAR, true),
            ..*state
        });

        if refracted != Vec3::ZERO {
            let weight = (1.0 - reflectance)
                * surface.transmission
                * surface.glass_tint(state.depth == 0);

            children.push(PathState {
                origin: record.point - n * Hit::NUDGE_OFFSET,
                direction: perturb(refracted, -n, surface.roughness, noise),
                throughput: weight,
                absorption: if entering {
                    surface.absorption
                } else {
                    Vec3::ZERO
                },
                flags: state
                    .flags
                    .with(PathFlags::SPECULAR, true)
                    .with(PathFlags::INSIDE_MEDIUM, entering),
                ..*state
            });
        }

        record.specular = surface.emission;

        Shading {
            color: surface.emission,
            record,
            children,
        }
    }
}

/// Jitters a specular direction proportionally to roughness, keeping it in
/// the hemisphere around `hemisphere_normal`.
pub fn perturb(
    direction: Vec3,
    hemisphere_normal: Vec3,
    roughness: f32,
    noise: &mut WhiteNoise,
) -> Vec3 {
    if roughness <= 0.0 {
        return direction;
    }

    let (t, b) = direction.any_orthonormal_pair();
    let offset = noise.sample_disk() * roughness * roughness;
    let perturbed = (direction + t * offset.x + b * offset.y).normalize();

    if perturbed.dot(hemisphere_normal) < 0.0 {
        perturbed.reflect(hemisphere_normal)
    } else {
        perturbed
    }
}
