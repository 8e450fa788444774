use glam::{vec2, UVec2, Vec3, Vec4};

use crate::{
    AlphaClass, Camera, DenoiserBridge, DenoiserInputs, HitRecord,
    Intersector, MaterialShader, PathState, SceneConstants, Sky, Vec3Ext,
    WhiteNoise, WorkQueue,
};

/// Maximum number of rays cast for a single pixel, summed over its samples;
/// limits the number of samples taken when bounces are deep.
pub const RAY_BUDGET_PER_PIXEL: u32 = 64;

/// Number of rays a single sample can cast before it starts skipping
/// non-specular segments.
pub const RAY_BUDGET_PER_SAMPLE: u32 = 48;

/// Number of rays after which a sample is terminated unconditionally.
pub const HARD_RAY_LIMIT: u32 = 96;

/// Throughput below which non-specular segments are not worth following.
pub const ENERGY_CUTOFF: f32 = 0.01;

#[derive(Clone, Copy, Default)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct PixelOutput {
    pub color: Vec3,

    /// Part of `color` that comes from first-bounce shading.
    pub primary: Vec3,

    pub caustic: Vec3,
    pub ray_count: u32,
    pub gbuffer: DenoiserInputs,
}

/// Renders pixels by following light paths from the camera, scheduling the
/// segments through a bounded [`WorkQueue`].
#[derive(Clone, Copy)]
pub struct PathTracer<'a> {
    constants: &'a SceneConstants,
    intersector: Intersector<'a>,
    shader: MaterialShader<'a>,
    sky: Sky,
}

impl<'a> PathTracer<'a> {
    pub fn new(
        constants: &'a SceneConstants,
        intersector: Intersector<'a>,
        shader: MaterialShader<'a>,
    ) -> Self {
        Self {
            constants,
            intersector,
            shader,
            sky: Sky::new(constants.sky_intensity),
        }
    }

    pub fn render_pixel(&self, screen_pos: UVec2) -> PixelOutput {
        let camera = &self.constants.camera;
        let sample_count = self.constants.sample_count();

        let mut out = PixelOutput::default();
        let mut diffuse = Vec3::ZERO;
        let mut specular = Vec3::ZERO;
        let mut specular_distance = 0.0;
        let mut visibility = 0.0;
        let mut tint = Vec3::ZERO;
        let mut sample_idx = 0;

        while sample_idx < sample_count {
            let mut noise = WhiteNoise::for_sample(
                self.constants.frame,
                screen_pos,
                sample_idx,
            );

            let jitter = vec2(noise.sample(), noise.sample());
            let lens = noise.sample_disk();
            let ray = camera.ray(screen_pos.as_vec2() + jitter, lens);
            let sample =
                self.trace_sample(PathState::primary(ray, 1.0), &mut noise);

            out.color += sample.color;
            out.primary += sample.primary;
            out.ray_count += sample.ray_count;

            if let Some(record) = sample.first {
                out.caustic += record.caustic;
                diffuse += record.diffuse;
                specular += (sample.color - record.diffuse).max(Vec3::ZERO);
                specular_distance += sample.specular_distance;
                visibility += record.shadow.visibility;
                tint += record.shadow.tint;
            } else {
                visibility += 1.0;
                tint += Vec3::ONE;
            }

            if sample_idx == 0 {
                out.gbuffer = match sample.first {
                    Some(record) => Self::geometry(camera, &record),
                    None => DenoiserInputs::miss(camera, ray.direction()),
                };
            }

            sample_idx += 1;
        }

        let norm = 1.0 / (sample_count as f32);

        out.color *= norm;
        out.primary *= norm;
        out.caustic *= norm;

        if out.gbuffer.alpha_class() != AlphaClass::Miss {
            let albedo = out.gbuffer.albedo.truncate();
            let diffuse = DenoiserBridge::demodulate(diffuse * norm, albedo);

            out.gbuffer.diffuse = diffuse.extend(out.gbuffer.diffuse.w);
            out.gbuffer.specular =
                (specular * norm).extend(specular_distance * norm);

            out.gbuffer.shadow.y = visibility * norm;
            out.gbuffer.translucency = (tint * norm).extend(visibility * norm);
        }

        out
    }

    /// Follows all the segments spawned by given camera ray.
    fn trace_sample(
        &self,
        primary: PathState,
        noise: &mut WhiteNoise,
    ) -> SampleOutput {
        let max_bounces = self.constants.max_bounces();
        let mut out = SampleOutput::default();
        let mut queue = WorkQueue::default();

        queue.push(primary);

        while let Some(state) = queue.pop() {
            if out.ray_count >= HARD_RAY_LIMIT {
                break;
            }

            if out.ray_count >= RAY_BUDGET_PER_SAMPLE && !state.is_specular() {
                continue;
            }

            if state.depth >= max_bounces {
                out.color += state.throughput * self.sky_radiance(&state);
                continue;
            }

            if state.strength() < ENERGY_CUTOFF && !state.is_specular() {
                continue;
            }

            let hit = self.intersector.trace_nearest(state.ray());

            out.ray_count += 1;

            if hit.is_none() {
                let color = state.throughput * self.sky_radiance(&state);

                out.color += color;

                if state.depth == 0 {
                    out.primary += color;
                }

                continue;
            }

            let mut throughput = state.throughput;

            if state.is_inside_medium() {
                throughput *= state.absorption.beer_lambert(hit.distance);
            }

            let shading = self.shader.shade(&state, &hit, noise);
            let color = throughput * shading.color;

            if !color.is_finite() || !throughput.is_finite() {
                out.color += self.sky_radiance(&state);
                continue;
            }

            out.color += color;

            if state.depth == 0 {
                out.primary += color;
                out.first = Some(shading.record);
            } else if state.depth == 1
                && state.is_specular()
                && out.specular_distance == 0.0
            {
                out.specular_distance = hit.distance;
            }

            for child in shading.children.as_slice() {
                let child = PathState {
                    throughput: child.throughput * throughput,
                    depth: state.depth + 1,
                    ..*child
                };

                if !child.throughput.is_finite() || !child.direction.is_finite()
                {
                    continue;
                }

                queue.push(child);
            }
        }

        out
    }

    fn sky_radiance(&self, state: &PathState) -> Vec3 {
        self.sky.eval(state.direction) * state.sky_boost
    }

    /// Fills the geometric part of denoiser's inputs; radiance and shadows
    /// get filled once all samples are done.
    fn geometry(camera: &Camera, record: &HitRecord) -> DenoiserInputs {
        let surface = &record.surface;
        let class = AlphaClass::new(Some(surface.class));

        // Diffuse signal depends on the shadow ray only, so the occluder
        // distance stands for its hit distance
        let diffuse_distance = if record.shadow.is_occluded() {
            record.shadow.occluder_distance
        } else {
            DenoiserBridge::NO_OCCLUDER
        };

        DenoiserInputs {
            diffuse: Vec4::new(0.0, 0.0, 0.0, diffuse_distance),
            specular: Vec4::ZERO,
            normal_roughness: DenoiserBridge::pack_normal_roughness(
                record.normal,
                surface.roughness,
            ),
            view_depth: DenoiserBridge::view_depth(camera, Some(record.point)),
            motion: DenoiserBridge::motion(camera, record.point),
            albedo: surface.diffuse_albedo().extend(class.code()),
            shadow: vec2(DenoiserBridge::pack_penumbra(&record.shadow), 1.0),
            translucency: DenoiserBridge::pack_translucency(&record.shadow),
        }
    }
}

#[derive(Default)]
struct SampleOutput {
    color: Vec3,
    primary: Vec3,
    ray_count: u32,

    /// First (camera-ray) hit, if any.
    first: Option<HitRecord>,

    /// Distance travelled by the first specular child before hitting
    /// something.
    specular_distance: f32,
}
