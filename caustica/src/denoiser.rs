use derivative::Derivative;
use glam::{ivec2, IVec2, UVec2, Vec3, Vec4Swizzles};
use rayon::prelude::*;

use crate::{gpu, GBuffers};

/// Something that turns noisy signals from [`GBuffers`] into clean ones.
pub trait Denoiser: Send {
    fn denoise(&mut self, gbuffers: &GBuffers) -> DenoisedSignals;

    /// Forgets the accumulated history, if any.
    fn reset(&mut self) {}
}

/// Outputs of a [`Denoiser`], in row-major order.
#[derive(Clone, Default, Derivative)]
#[derivative(Debug)]
pub struct DenoisedSignals {
    /// Diffuse radiance, still demodulated.
    #[derivative(Debug = "ignore")]
    pub diffuse: Vec<Vec3>,

    #[derivative(Debug = "ignore")]
    pub specular: Vec<Vec3>,
}

/// Denoiser that doesn't denoise; useful for looking at the raw signals.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassthroughDenoiser;

impl Denoiser for PassthroughDenoiser {
    fn denoise(&mut self, gbuffers: &GBuffers) -> DenoisedSignals {
        DenoisedSignals {
            diffuse: gbuffers.diffuse().iter().map(|d| d.xyz()).collect(),
            specular: gbuffers.specular().iter().map(|s| s.xyz()).collect(),
        }
    }
}

/// Reference temporal denoiser: reprojects the previous frame through
/// motion vectors, clamps it to the current frame's 3x3 neighbourhood and
/// blends both together.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct TemporalDenoiser {
    min_alpha: f32,
    depth_tolerance: f32,

    #[derivative(Debug = "ignore")]
    history: Option<History>,
}

impl TemporalDenoiser {
    pub fn new() -> Self {
        Self {
            min_alpha: 0.1,
            depth_tolerance: 0.1,
            history: None,
        }
    }

    /// Sets the smallest weight of the current frame; lower values converge
    /// better, but lag more.
    pub fn with_min_alpha(mut self, min_alpha: f32) -> Self {
        self.min_alpha = min_alpha.clamp(0.0, 1.0);
        self
    }

    /// Sets the relative depth difference above which history is rejected.
    pub fn with_depth_tolerance(mut self, depth_tolerance: f32) -> Self {
        self.depth_tolerance = depth_tolerance.max(0.0);
        self
    }

    fn denoise_pixel(&self, gbuffers: &GBuffers, pos: UVec2) -> Pixel {
        let idx = gbuffers.idx(pos);
        let inputs = gbuffers.inputs(idx);
        let diffuse = inputs.diffuse.xyz();
        let specular = inputs.specular.xyz();

        let current = Pixel {
            diffuse,
            specular,
            view_depth: inputs.view_depth,
            frames: 0,
        };

        if inputs.alpha_class() == gpu::AlphaClass::Miss {
            return current;
        }

        let Some(prev) = self.reproject(gbuffers, pos, &inputs) else {
            return current;
        };

        let (diffuse_min, diffuse_max, specular_min, specular_max) =
            neighbourhood(gbuffers, pos);

        let frames = prev.frames.saturating_add(1);
        let alpha = (1.0 / (frames as f32 + 1.0)).max(self.min_alpha);

        let history_diffuse = prev.diffuse.clamp(diffuse_min, diffuse_max);
        let history_specular = prev.specular.clamp(specular_min, specular_max);

        Pixel {
            diffuse: history_diffuse.lerp(diffuse, alpha),
            specular: history_specular.lerp(specular, alpha),
            view_depth: inputs.view_depth,
            frames,
        }
    }

    fn reproject(
        &self,
        gbuffers: &GBuffers,
        pos: UVec2,
        inputs: &gpu::DenoiserInputs,
    ) -> Option<Pixel> {
        let history = self.history.as_ref()?;

        if history.size != gbuffers.size() {
            return None;
        }

        let prev_pos = (pos.as_vec2() + 0.5 + inputs.motion).floor();

        if !prev_pos.is_finite() {
            return None;
        }

        let prev_pos = prev_pos.as_ivec2();

        if !contains(history.size, prev_pos) {
            return None;
        }

        let prev = history.pixels[(prev_pos.y as u32 * history.size.x
            + prev_pos.x as u32) as usize];

        let depth = inputs.view_depth;

        if (prev.view_depth - depth).abs() > self.depth_tolerance * depth {
            return None;
        }

        Some(prev)
    }
}

impl Default for TemporalDenoiser {
    fn default() -> Self {
        Self::new()
    }
}

impl Denoiser for TemporalDenoiser {
    fn denoise(&mut self, gbuffers: &GBuffers) -> DenoisedSignals {
        let size = gbuffers.size();

        let pixels: Vec<_> = (0..gbuffers.len())
            .into_par_iter()
            .map(|idx| {
                let pos = UVec2::new(idx as u32 % size.x, idx as u32 / size.x);

                self.denoise_pixel(gbuffers, pos)
            })
            .collect();

        let signals = DenoisedSignals {
            diffuse: pixels.iter().map(|pixel| pixel.diffuse).collect(),
            specular: pixels.iter().map(|pixel| pixel.specular).collect(),
        };

        self.history = Some(History { size, pixels });

        signals
    }

    fn reset(&mut self) {
        self.history = None;
    }
}

struct History {
    size: UVec2,
    pixels: Vec<Pixel>,
}

#[derive(Clone, Copy)]
struct Pixel {
    diffuse: Vec3,
    specular: Vec3,
    view_depth: f32,

    /// Number of frames accumulated into this pixel so far.
    frames: u32,
}

fn contains(size: UVec2, pos: IVec2) -> bool {
    pos.x >= 0
        && pos.y >= 0
        && (pos.x as u32) < size.x
        && (pos.y as u32) < size.y
}

/// Returns bounds of diffuse and specular radiance around given pixel,
/// skipping pixels that missed.
fn neighbourhood(gbuffers: &GBuffers, pos: UVec2) -> (Vec3, Vec3, Vec3, Vec3) {
    let mut diffuse_min = Vec3::MAX;
    let mut diffuse_max = Vec3::MIN;
    let mut specular_min = Vec3::MAX;
    let mut specular_max = Vec3::MIN;

    for dy in -1..=1 {
        for dx in -1..=1 {
            let neighbour = pos.as_ivec2() + ivec2(dx, dy);

            if !contains(gbuffers.size(), neighbour) {
                continue;
            }

            let idx = gbuffers.idx(neighbour.as_uvec2());
            let inputs = gbuffers.inputs(idx);

            if inputs.alpha_class() == gpu::AlphaClass::Miss {
                continue;
            }

            diffuse_min = diffuse_min.min(inputs.diffuse.xyz());
            diffuse_max = diffuse_max.max(inputs.diffuse.xyz());
            specular_min = specular_min.min(inputs.specular.xyz());
            specular_max = specular_max.max(inputs.specular.xyz());
        }
    }

    (diffuse_min, diffuse_max, specular_min, specular_max)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{uvec2, vec2, Vec2, Vec4};

    use super::*;

    fn gbuffers(
        size: UVec2,
        view_depth: f32,
        diffuse: impl Fn(UVec2) -> f32,
    ) -> GBuffers {
        let mut gbuffers = GBuffers::new(size);

        for y in 0..size.y {
            for x in 0..size.x {
                let pos = uvec2(x, y);

                let output = gpu::PixelOutput {
                    gbuffer: gpu::DenoiserInputs {
                        diffuse: Vec3::splat(diffuse(pos)).extend(0.0),
                        view_depth,
                        motion: Vec2::ZERO,
                        albedo: Vec3::ONE
                            .extend(gpu::AlphaClass::Diffuse.code()),
                        shadow: vec2(gpu::DenoiserBridge::NO_OCCLUDER, 1.0),
                        translucency: Vec4::ONE,
                        ..Default::default()
                    },
                    ..Default::default()
                };

                let idx = gbuffers.idx(pos);

                gbuffers.write(idx, &output);
            }
        }

        gbuffers
    }

    fn checkerboard(pos: UVec2) -> f32 {
        if (pos.x + pos.y) % 2 == 0 {
            0.0
        } else {
            2.0
        }
    }

    #[test]
    fn passthrough() {
        let gbuffers = gbuffers(uvec2(4, 4), 1.0, checkerboard);
        let signals = PassthroughDenoiser.denoise(&gbuffers);

        assert_eq!(16, signals.diffuse.len());
        assert_eq!(Vec3::ZERO, signals.diffuse[0]);
        assert_eq!(Vec3::splat(2.0), signals.diffuse[1]);
    }

    #[test]
    fn accumulates_history() {
        let mut denoiser = TemporalDenoiser::new();

        let first = denoiser.denoise(&gbuffers(uvec2(4, 4), 1.0, |_| 1.0));

        assert_eq!(Vec3::ONE, first.diffuse[5]);

        // History (1.0) lies within the new neighbourhood (0.0 ..= 2.0), so
        // it gets blended with the current frame half-and-half
        let second =
            denoiser.denoise(&gbuffers(uvec2(4, 4), 1.0, checkerboard));

        assert_relative_eq!(second.diffuse[5].x, 0.5);
        assert_relative_eq!(second.diffuse[6].x, 1.5);
    }

    #[test]
    fn rejects_disoccluded_history() {
        let mut denoiser = TemporalDenoiser::new();

        denoiser.denoise(&gbuffers(uvec2(4, 4), 1.0, |_| 1.0));

        let signals =
            denoiser.denoise(&gbuffers(uvec2(4, 4), 5.0, checkerboard));

        assert_eq!(Vec3::ZERO, signals.diffuse[5]);
        assert_eq!(Vec3::splat(2.0), signals.diffuse[6]);
    }

    #[test]
    fn reset() {
        let mut denoiser = TemporalDenoiser::new();

        denoiser.denoise(&gbuffers(uvec2(4, 4), 1.0, |_| 1.0));
        denoiser.reset();

        let signals =
            denoiser.denoise(&gbuffers(uvec2(4, 4), 1.0, checkerboard));

        assert_eq!(Vec3::ZERO, signals.diffuse[5]);
    }
}
