use glam::{vec3, Vec3};

use crate::{gpu, DebugMode, ToneMap};

/// Knobs controlling how frames get rendered and composed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSettings {
    /// Number of samples taken per pixel; reduced automatically when
    /// `max_bounces` is large, so that pixels stay within their ray budget.
    pub samples_per_pixel: u32,

    pub max_bounces: u32,
    pub exposure: f32,
    pub tone_map: ToneMap,
    pub gamma: f32,

    /// Whether the compositor should use the denoised signals.
    pub denoiser: bool,

    pub debug_mode: DebugMode,

    /// Number of photon emission slots; zero disables caustics.
    pub photon_count: u32,

    /// Gather radius, also used as the photon grid's cell size.
    pub photon_radius: f32,

    pub caustic_intensity: f32,
    pub photon_refresh: PhotonRefresh,

    /// How dark shadows are, from 0.0 (no shadows) to 1.0 (physical).
    pub shadow_strength: f32,

    /// Point light attenuation: constant, linear and quadratic terms.
    pub attenuation: Vec3,

    pub sky_intensity: f32,
}

impl RenderSettings {
    pub fn with_samples_per_pixel(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    pub fn with_max_bounces(mut self, max_bounces: u32) -> Self {
        self.max_bounces = max_bounces;
        self
    }

    pub fn with_exposure(mut self, exposure: f32) -> Self {
        self.exposure = exposure;
        self
    }

    pub fn with_tone_map(mut self, tone_map: ToneMap) -> Self {
        self.tone_map = tone_map;
        self
    }

    pub fn with_gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_denoiser(mut self, denoiser: bool) -> Self {
        self.denoiser = denoiser;
        self
    }

    pub fn with_debug_mode(mut self, debug_mode: DebugMode) -> Self {
        self.debug_mode = debug_mode;
        self
    }

    pub fn with_photons(mut self, photon_count: u32, radius: f32) -> Self {
        self.photon_count = photon_count;
        self.photon_radius = radius;
        self
    }

    pub fn with_caustic_intensity(mut self, caustic_intensity: f32) -> Self {
        self.caustic_intensity = caustic_intensity;
        self
    }

    pub fn with_photon_refresh(mut self, refresh: PhotonRefresh) -> Self {
        self.photon_refresh = refresh;
        self
    }

    pub fn with_shadow_strength(mut self, shadow_strength: f32) -> Self {
        self.shadow_strength = shadow_strength;
        self
    }

    pub fn with_attenuation(mut self, attenuation: Vec3) -> Self {
        self.attenuation = attenuation;
        self
    }

    pub fn with_sky_intensity(mut self, sky_intensity: f32) -> Self {
        self.sky_intensity = sky_intensity;
        self
    }

    pub(crate) fn compositor_params(&self) -> gpu::CompositorParams {
        gpu::CompositorParams {
            exposure: self.exposure.max(0.0),
            gamma: self.gamma.max(0.1),
            tone_map: self.tone_map as u32,
            debug_mode: self.debug_mode as u32,
            denoiser_enabled: self.denoiser as u32,
            ..Default::default()
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            samples_per_pixel: 4,
            max_bounces: 6,
            exposure: 1.0,
            tone_map: ToneMap::AcesFilmic,
            gamma: 2.2,
            denoiser: true,
            debug_mode: DebugMode::None,
            photon_count: 65536,
            photon_radius: 0.25,
            caustic_intensity: 1.0,
            photon_refresh: PhotonRefresh::OnSceneChange,
            shadow_strength: 1.0,
            attenuation: vec3(1.0, 0.0, 0.05),
            sky_intensity: 1.0,
        }
    }
}

/// Decides when photons get re-emitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PhotonRefresh {
    /// Every frame, with fresh noise; caustics converge over time when
    /// accumulated by the denoiser.
    EveryFrame,

    /// Only when the scene (or photon settings) change.
    #[default]
    OnSceneChange,
}
