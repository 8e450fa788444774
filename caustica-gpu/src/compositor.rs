use bytemuck::{Pod, Zeroable};
use glam::{uvec2, vec3, UVec2, Vec3, Vec4, Vec4Swizzles};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{
    lerp, AlphaClass, Camera, DenoiserBridge, DenoiserInputs, F32Ext,
    RAY_BUDGET_PER_PIXEL,
};

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct CompositorParams {
    pub exposure: f32,
    pub gamma: f32,

    /// See: [`ToneMap`].
    pub tone_map: u32,

    /// See: [`DebugMode`].
    pub debug_mode: u32,

    pub denoiser_enabled: u32,
    pub _pad0: u32,
    pub _pad1: u32,
    pub _pad2: u32,
}

impl Default for CompositorParams {
    fn default() -> Self {
        Self {
            exposure: 1.0,
            gamma: 2.2,
            tone_map: ToneMap::AcesFilmic as u32,
            debug_mode: DebugMode::None as u32,
            denoiser_enabled: 0,
            _pad0: 0,
            _pad1: 0,
            _pad2: 0,
        }
    }
}

impl CompositorParams {
    pub fn tone_map(&self) -> ToneMap {
        ToneMap::from_u32(self.tone_map)
    }

    pub fn debug_mode(&self) -> DebugMode {
        DebugMode::from_u32(self.debug_mode)
    }

    pub fn is_denoiser_enabled(&self) -> bool {
        self.denoiser_enabled != 0
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub enum ToneMap {
    None = 0,
    Reinhard = 1,
    #[default]
    AcesFilmic = 2,
}

impl ToneMap {
    pub fn from_u32(value: u32) -> Self {
        match value {
            1 => Self::Reinhard,
            2 => Self::AcesFilmic,
            _ => Self::None,
        }
    }

    pub fn apply(self, color: Vec3) -> Vec3 {
        let color = color.max(Vec3::ZERO);

        match self {
            ToneMap::None => color,
            ToneMap::Reinhard => color / (Vec3::ONE + color),

            // Narkowicz's fit of the ACES reference rendering transform
            ToneMap::AcesFilmic => {
                let a = color * (color * 2.51 + 0.03);
                let b = color * (color * 2.43 + 0.59) + 0.14;

                (a / b).clamp(Vec3::ZERO, Vec3::ONE)
            }
        }
    }
}

/// What the compositor puts on the screen.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub enum DebugMode {
    /// Final image.
    #[default]
    None = 0,

    /// 2x2 grid of the final image, normals, albedo and shadows.
    Tiles = 1,

    Normals = 2,
    Depth = 3,
    Motion = 4,
    Albedo = 5,
    Shadow = 6,
    Penumbra = 7,
    DiffuseRadiance = 8,
    SpecularRadiance = 9,

    /// Light reaching the camera straight from the first bounce.
    PrimaryOnly = 10,

    /// Light reaching the camera through secondary bounces.
    IndirectOnly = 11,

    Caustics = 12,

    /// Number of rays cast per pixel.
    RayHeatmap = 13,

    /// Pixel classes as seen by the compositor (miss, specular, diffuse).
    Classification = 14,
}

impl DebugMode {
    pub const ALL: [Self; 15] = [
        Self::None,
        Self::Tiles,
        Self::Normals,
        Self::Depth,
        Self::Motion,
        Self::Albedo,
        Self::Shadow,
        Self::Penumbra,
        Self::DiffuseRadiance,
        Self::SpecularRadiance,
        Self::PrimaryOnly,
        Self::IndirectOnly,
        Self::Caustics,
        Self::RayHeatmap,
        Self::Classification,
    ];

    /// Modes shown by [`DebugMode::Tiles`], in order: top-left, top-right,
    /// bottom-left, bottom-right.
    pub const TILES: [Self; 4] =
        [Self::None, Self::Normals, Self::Albedo, Self::Shadow];

    pub fn from_u32(value: u32) -> Self {
        let mut idx = 0;

        while idx < Self::ALL.len() {
            if Self::ALL[idx] as u32 == value {
                return Self::ALL[idx];
            }

            idx += 1;
        }

        Self::None
    }

    /// Returns how values produced by this mode are brought to the screen.
    pub fn encoding(self) -> Encoding {
        match self {
            DebugMode::None
            | DebugMode::Tiles
            | DebugMode::DiffuseRadiance
            | DebugMode::SpecularRadiance
            | DebugMode::PrimaryOnly
            | DebugMode::IndirectOnly
            | DebugMode::Caustics => Encoding::Scene,

            DebugMode::Albedo | DebugMode::Shadow => Encoding::Linear,

            DebugMode::Normals
            | DebugMode::Depth
            | DebugMode::Motion
            | DebugMode::Penumbra
            | DebugMode::RayHeatmap
            | DebugMode::Classification => Encoding::Display,
        }
    }
}

/// Transformation from a visualized value into a display value.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub enum Encoding {
    /// Radiance: exposure, then tone mapping, then gamma.
    Scene,

    /// Linear quantities in range `<0.0, 1.0>`: gamma only.
    Linear,

    /// Already display-encoded; used as-is.
    Display,
}

/// Everything the compositor knows about a single pixel.
#[derive(Clone, Copy, Default)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct CompositorSample {
    /// Raw (noisy) radiance.
    pub color: Vec3,
    pub primary: Vec3,
    pub caustic: Vec3,

    /// Diffuse radiance returned by the denoiser (still demodulated).
    pub denoised_diffuse: Vec3,

    pub denoised_specular: Vec3,
    pub gbuffer: DenoiserInputs,
    pub ray_count: u32,
}

pub struct Compositor<'a> {
    params: &'a CompositorParams,
    camera: &'a Camera,
}

impl<'a> Compositor<'a> {
    const DEPTH_RANGE: f32 = 50.0;
    const MOTION_SCALE: f32 = 0.05;
    const SRGB_GAMMA: f32 = 2.2;

    pub fn new(params: &'a CompositorParams, camera: &'a Camera) -> Self {
        Self { params, camera }
    }

    /// Returns display-encoded color of given pixel; `fetch` provides
    /// samples of the pixels to composite.
    pub fn composite(
        &self,
        screen_pos: UVec2,
        fetch: impl Fn(UVec2) -> CompositorSample,
    ) -> Vec4 {
        let mode = self.params.debug_mode();

        let color = if mode == DebugMode::Tiles {
            let screen_size = self.camera.screen_size();
            let (mode, source) = Self::tile(screen_pos, screen_size);

            self.render(mode, &fetch(source))
        } else {
            self.render(mode, &fetch(screen_pos))
        };

        color.extend(1.0)
    }

    /// Returns which mode and which source pixel should be shown at given
    /// position of the tiled view.
    pub fn tile(screen_pos: UVec2, screen_size: UVec2) -> (DebugMode, UVec2) {
        let half = (screen_size / 2).max(UVec2::ONE);
        let right = screen_pos.x >= half.x;
        let bottom = screen_pos.y >= half.y;

        let tile = (bottom as usize) * 2 + (right as usize);
        let local = screen_pos - uvec2(right as u32, bottom as u32) * half;

        let source =
            (local * 2).min(screen_size.max(UVec2::ONE) - UVec2::ONE);

        (DebugMode::TILES[tile], source)
    }

    /// Visualizes given sample according to given mode and encodes it for
    /// the display.
    pub fn render(&self, mode: DebugMode, sample: &CompositorSample) -> Vec3 {
        let mode = if mode == DebugMode::Tiles {
            DebugMode::None
        } else {
            mode
        };

        self.encode(self.visualize(mode, sample), mode.encoding())
    }

    /// Returns the final (linear, unexposed) radiance of given sample.
    pub fn resolve(&self, sample: &CompositorSample) -> Vec3 {
        let gbuffer = &sample.gbuffer;

        match gbuffer.alpha_class() {
            AlphaClass::Miss | AlphaClass::Specular => sample.color,

            AlphaClass::Diffuse => {
                if self.params.is_denoiser_enabled() {
                    DenoiserBridge::remodulate(
                        sample.denoised_diffuse,
                        gbuffer.albedo.xyz(),
                    ) + sample.denoised_specular
                } else {
                    sample.color
                }
            }
        }
    }

    fn visualize(&self, mode: DebugMode, sample: &CompositorSample) -> Vec3 {
        let gbuffer = &sample.gbuffer;
        let is_miss = gbuffer.alpha_class() == AlphaClass::Miss;

        match mode {
            DebugMode::None | DebugMode::Tiles => self.resolve(sample),

            DebugMode::Normals => {
                if is_miss {
                    return Vec3::ZERO;
                }

                let (normal, _) = DenoiserBridge::unpack_normal_roughness(
                    gbuffer.normal_roughness,
                );

                self.camera.view_normal(normal) * 0.5 + 0.5
            }

            DebugMode::Depth => {
                if is_miss {
                    return Vec3::ZERO;
                }

                Vec3::splat(
                    1.0 - (gbuffer.view_depth / Self::DEPTH_RANGE).saturate(),
                )
            }

            DebugMode::Motion => {
                let motion = gbuffer.motion * Self::MOTION_SCALE;

                vec3(0.5 + motion.x, 0.5 + motion.y, 0.5)
                    .clamp(Vec3::ZERO, Vec3::ONE)
            }

            DebugMode::Albedo => gbuffer.albedo.xyz(),

            DebugMode::Shadow => {
                gbuffer.translucency.xyz() * gbuffer.translucency.w
            }

            DebugMode::Penumbra => {
                match DenoiserBridge::unpack_penumbra(gbuffer.shadow.x) {
                    Some(penumbra) => Vec3::splat(penumbra / (1.0 + penumbra)),
                    None => Vec3::ZERO,
                }
            }

            DebugMode::DiffuseRadiance => {
                let diffuse = if self.params.is_denoiser_enabled() {
                    sample.denoised_diffuse
                } else {
                    gbuffer.diffuse.xyz()
                };

                DenoiserBridge::remodulate(diffuse, gbuffer.albedo.xyz())
            }

            DebugMode::SpecularRadiance => {
                if self.params.is_denoiser_enabled() {
                    sample.denoised_specular
                } else {
                    gbuffer.specular.xyz()
                }
            }

            DebugMode::PrimaryOnly => sample.primary,

            DebugMode::IndirectOnly => {
                (sample.color - sample.primary).max(Vec3::ZERO)
            }

            DebugMode::Caustics => sample.caustic,

            DebugMode::RayHeatmap => heatmap(
                sample.ray_count as f32 / RAY_BUDGET_PER_PIXEL as f32,
            ),

            DebugMode::Classification => match gbuffer.alpha_class() {
                AlphaClass::Miss => vec3(0.1, 0.1, 0.4),
                AlphaClass::Specular => vec3(1.0, 0.8, 0.1),
                AlphaClass::Diffuse => vec3(0.2, 0.7, 0.2),
            },
        }
    }

    /// Brings given value to the display; gamma is applied here and only
    /// here.
    pub fn encode(&self, color: Vec3, encoding: Encoding) -> Vec3 {
        let color = if color.is_finite() { color } else { Vec3::ZERO };

        match encoding {
            Encoding::Scene => {
                let color = color * self.params.exposure.max(0.0);
                let color = self.params.tone_map().apply(color);

                self.apply_gamma(color.clamp(Vec3::ZERO, Vec3::ONE))
            }

            Encoding::Linear => {
                self.apply_gamma(color.clamp(Vec3::ZERO, Vec3::ONE))
            }

            Encoding::Display => color.clamp(Vec3::ZERO, Vec3::ONE),
        }
    }

    fn apply_gamma(&self, color: Vec3) -> Vec3 {
        let gamma = self.params.gamma;

        if (gamma - Self::SRGB_GAMMA).abs() < 0.01 {
            vec3(
                linear_to_srgb(color.x),
                linear_to_srgb(color.y),
                linear_to_srgb(color.z),
            )
        } else {
            let inv = 1.0 / gamma.max(0.01);

            vec3(color.x.powf(inv), color.y.powf(inv), color.z.powf(inv))
        }
    }
}

pub fn linear_to_srgb(value: f32) -> f32 {
    if value <= 0.0031308 {
        value * 12.92
    } else {
        1.055 * value.powf(1.0 / 2.4) - 0.055
    }
}

/// Maps `<0.0, 1.0>` onto blue-green-red; values above 1.0 saturate to red.
fn heatmap(value: f32) -> Vec3 {
    let value = value.saturate();

    if value < 0.5 {
        lerp(vec3(0.0, 0.0, 1.0), vec3(0.0, 1.0, 0.0), value * 2.0)
    } else {
        lerp(vec3(0.0, 1.0, 0.0), vec3(1.0, 0.0, 0.0), value * 2.0 - 1.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec2;

    use super::*;

    fn camera() -> Camera {
        Camera::new(vec3(0.0, 0.0, 5.0), -Vec3::Z, Vec3::Y, 1.0, uvec2(8, 6))
    }

    fn diffuse_sample() -> CompositorSample {
        CompositorSample {
            color: Vec3::splat(0.3),
            primary: Vec3::splat(0.2),
            caustic: Vec3::ZERO,
            denoised_diffuse: Vec3::splat(0.4),
            denoised_specular: Vec3::splat(0.1),
            gbuffer: DenoiserInputs {
                albedo: Vec3::splat(0.5).extend(AlphaClass::Diffuse.code()),
                ..Default::default()
            },
            ray_count: 4,
        }
    }

    #[test]
    fn tone_maps() {
        let one = Vec3::ONE;

        assert_eq!(one, ToneMap::None.apply(one));
        assert_relative_eq!(ToneMap::Reinhard.apply(one).x, 0.5);
        assert_relative_eq!(ToneMap::AcesFilmic.apply(Vec3::ZERO).x, 0.0);

        let mut prev = 0.0;

        for idx in 1..100 {
            let color = Vec3::splat(idx as f32 * 0.1);
            let value = ToneMap::AcesFilmic.apply(color).x;

            assert!(value >= prev);
            assert!(value <= 1.0);

            prev = value;
        }
    }

    #[test]
    fn srgb_curve() {
        assert_relative_eq!(linear_to_srgb(0.0), 0.0);
        assert_relative_eq!(linear_to_srgb(1.0), 1.0, epsilon = 1e-5);

        // Both pieces meet at the threshold
        let below = linear_to_srgb(0.0031308);
        let above = linear_to_srgb(0.0031309);

        assert_relative_eq!(below, above, epsilon = 1e-4);
    }

    #[test]
    fn gamma_is_applied_once() {
        let params = CompositorParams::default();
        let camera = camera();
        let compositor = Compositor::new(&params, &camera);

        let sample = diffuse_sample();
        let albedo = compositor.render(DebugMode::Albedo, &sample);

        assert_relative_eq!(albedo.x, linear_to_srgb(0.5), epsilon = 1e-6);

        let params = CompositorParams {
            gamma: 1.0,
            ..params
        };

        let compositor = Compositor::new(&params, &camera);
        let albedo = compositor.render(DebugMode::Albedo, &sample);

        assert_relative_eq!(albedo.x, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn power_law_gamma() {
        let params = CompositorParams {
            gamma: 2.0,
            ..Default::default()
        };

        let camera = camera();
        let compositor = Compositor::new(&params, &camera);

        let color = compositor.encode(Vec3::splat(0.25), Encoding::Linear);

        assert_relative_eq!(color.x, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn resolve_by_class() {
        let params = CompositorParams {
            denoiser_enabled: 1,
            ..Default::default()
        };

        let camera = camera();
        let compositor = Compositor::new(&params, &camera);
        let sample = diffuse_sample();

        // 0.4 * 0.5 + 0.1
        assert_relative_eq!(compositor.resolve(&sample).x, 0.3);

        let sample = CompositorSample {
            color: Vec3::splat(0.7),
            gbuffer: DenoiserInputs {
                albedo: Vec3::ZERO.extend(AlphaClass::Miss.code()),
                ..Default::default()
            },
            ..sample
        };

        assert_relative_eq!(compositor.resolve(&sample).x, 0.7);

        let sample = CompositorSample {
            gbuffer: DenoiserInputs {
                albedo: Vec3::ONE.extend(AlphaClass::Specular.code()),
                ..Default::default()
            },
            ..sample
        };

        assert_relative_eq!(compositor.resolve(&sample).x, 0.7);
    }

    #[test]
    fn raw_signal_without_denoiser() {
        let params = CompositorParams::default();
        let camera = camera();
        let compositor = Compositor::new(&params, &camera);

        assert_relative_eq!(compositor.resolve(&diffuse_sample()).x, 0.3);
    }

    #[test]
    fn tiles() {
        let size = uvec2(8, 6);

        assert_eq!(
            (DebugMode::None, uvec2(0, 0)),
            Compositor::tile(uvec2(0, 0), size)
        );

        assert_eq!(
            (DebugMode::Normals, uvec2(2, 0)),
            Compositor::tile(uvec2(5, 0), size)
        );

        assert_eq!(
            (DebugMode::Albedo, uvec2(6, 4)),
            Compositor::tile(uvec2(3, 5), size)
        );

        assert_eq!(
            (DebugMode::Shadow, uvec2(6, 4)),
            Compositor::tile(uvec2(7, 5), size)
        );
    }

    #[test]
    fn debug_modes() {
        for mode in DebugMode::ALL {
            assert_eq!(mode, DebugMode::from_u32(mode as u32));
        }

        assert_eq!(DebugMode::None, DebugMode::from_u32(1234));
    }

    #[test]
    fn display_values_stay_in_range() {
        let params = CompositorParams::default();
        let camera = camera();
        let compositor = Compositor::new(&params, &camera);

        let sample = CompositorSample {
            color: Vec3::splat(f32::NAN),
            ray_count: 10_000,
            gbuffer: DenoiserInputs {
                motion: vec2(1000.0, -1000.0),
                ..diffuse_sample().gbuffer
            },
            ..diffuse_sample()
        };

        for mode in DebugMode::ALL {
            let color = compositor.render(mode, &sample);

            assert!(color.is_finite(), "mode={mode:?}");
            assert!(color.cmpge(Vec3::ZERO).all(), "mode={mode:?}");
            assert!(color.cmple(Vec3::ONE).all(), "mode={mode:?}");
        }

        let color = compositor.composite(uvec2(1, 1), |_| sample);

        assert_eq!(1.0, color.w);
    }
}
