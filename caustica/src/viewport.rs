mod composition_pass;
mod path_tracing_pass;
mod photon_pass;

use std::path::Path;
use std::time::Duration;

use glam::{Mat4, UVec2};
use log::{debug, info};

use self::composition_pass::*;
use self::path_tracing_pass::*;
use self::photon_pass::*;
use crate::utils::measure;
use crate::{
    gpu, Camera, Denoiser, Engine, Error, GBuffers, Params, PhotonMap,
    RenderSettings, Result, SceneData, TemporalDenoiser, Texture,
};

/// Render target together with everything that's kept between its frames:
/// camera history, photons, denoiser state.
pub struct Viewport {
    size: UVec2,
    camera: Camera,
    settings: RenderSettings,
    frame: u32,
    prev_view_proj: Option<Mat4>,
    gbuffers: GBuffers,
    output: Texture,
    photon_pass: PhotonPass,
    path_tracing_pass: PathTracingPass,
    composition_pass: CompositionPass,
    denoiser: Box<dyn Denoiser>,
}

impl Viewport {
    pub(crate) fn new(
        size: UVec2,
        camera: Camera,
        settings: RenderSettings,
    ) -> Result<Self> {
        Self::validate_size(size)?;

        info!("Creating viewport ({})", Self::describe(size, &settings));

        Ok(Self {
            size,
            camera,
            settings,
            frame: 0,
            prev_view_proj: None,
            gbuffers: GBuffers::new(size),
            output: Texture::new(size),
            photon_pass: PhotonPass::new(),
            path_tracing_pass: PathTracingPass::new(),
            composition_pass: CompositionPass::new(),
            denoiser: Box::new(TemporalDenoiser::new()),
        })
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: RenderSettings) {
        self.settings = settings;
    }

    /// Replaces the denoiser; the new one starts with no history.
    pub fn set_denoiser(&mut self, denoiser: impl Denoiser + 'static) {
        self.denoiser = Box::new(denoiser);
    }

    pub fn resize(&mut self, size: UVec2) -> Result<()> {
        Self::validate_size(size)?;

        if size == self.size {
            return Ok(());
        }

        debug!(
            "Resizing viewport ({} -> {}x{})",
            Self::describe(self.size, &self.settings),
            size.x,
            size.y
        );

        self.size = size;
        self.prev_view_proj = None;
        self.gbuffers = GBuffers::new(size);
        self.output = Texture::new(size);
        self.denoiser.reset();

        Ok(())
    }

    /// Returns the number of frames rendered so far.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn gbuffers(&self) -> &GBuffers {
        &self.gbuffers
    }

    /// Returns the composed, display-encoded image.
    pub fn output(&self) -> &Texture {
        &self.output
    }

    pub fn photon_map(&self) -> &PhotonMap {
        self.photon_pass.map()
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.output.save_png(path)
    }

    pub(crate) fn render<P>(&mut self, engine: &Engine<P>) -> FrameStats
    where
        P: Params,
    {
        let (stats, elapsed) = measure(|| {
            let scene = engine.buffers();
            let constants = self.constants(scene);

            let photons = self.photon_pass.run(
                &constants,
                scene,
                &self.settings,
                engine.version(),
            );

            let gpu_scene = gpu::Scene::new(
                &constants,
                scene.as_buffers(),
                self.photon_pass.map().view(),
            );

            let rays =
                self.path_tracing_pass.run(&gpu_scene, &mut self.gbuffers);

            let denoised = if self.settings.denoiser {
                Some(self.denoiser.denoise(&self.gbuffers))
            } else {
                None
            };

            self.composition_pass.run(
                &constants.camera,
                &self.settings.compositor_params(),
                &self.gbuffers,
                denoised.as_ref(),
                &mut self.output,
            );

            self.prev_view_proj = Some(constants.camera.view_proj);

            FrameStats {
                frame: self.frame,
                rays,
                photons,
                elapsed: Duration::ZERO,
            }
        });

        self.frame = self.frame.wrapping_add(1);

        let stats = FrameStats { elapsed, ..stats };

        debug!(
            "Frame rendered; frame={}, rays={}, photons-emitted={}, \
             photons-stored={}, photons-dropped={}, elapsed={:?}",
            stats.frame,
            stats.rays,
            stats.photons.emitted,
            stats.photons.stored,
            stats.photons.dropped,
            stats.elapsed,
        );

        stats
    }

    fn constants(&self, scene: &SceneData) -> gpu::SceneConstants {
        let settings = &self.settings;

        gpu::SceneConstants {
            camera: self.camera.serialize(self.size, self.prev_view_proj),
            attenuation: settings.attenuation.extend(0.0),
            sphere_count: scene.spheres.len() as u32,
            plane_count: scene.planes.len() as u32,
            cuboid_count: scene.cuboids.len() as u32,
            light_count: scene.lights.len() as u32,
            triangle_count: scene.triangles.len() as u32,
            samples_per_pixel: settings.samples_per_pixel,
            max_bounces: settings.max_bounces,
            frame: self.frame,
            photon_count: settings.photon_count,
            photon_radius: settings.photon_radius,
            caustic_intensity: settings.caustic_intensity,
            shadow_strength: settings.shadow_strength.clamp(0.0, 1.0),
            sky_intensity: settings.sky_intensity,
            ..Default::default()
        }
    }

    fn validate_size(size: UVec2) -> Result<()> {
        if size.x == 0 || size.y == 0 {
            return Err(Error::InvalidViewportSize(size.x, size.y));
        }

        Ok(())
    }

    fn describe(size: UVec2, settings: &RenderSettings) -> String {
        format!(
            "size={}x{}, spp={}, max-bounces={}, photons={}",
            size.x,
            size.y,
            settings.samples_per_pixel,
            settings.max_bounces,
            settings.photon_count,
        )
    }
}

impl Drop for Viewport {
    fn drop(&mut self) {
        info!(
            "Releasing viewport ({})",
            Self::describe(self.size, &self.settings)
        );
    }
}

/// Statistics of a single rendered frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameStats {
    pub frame: u32,

    /// Number of rays cast by the path tracing pass.
    pub rays: u64,

    pub photons: PhotonStats,
    pub elapsed: Duration,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhotonStats {
    /// Number of emission slots processed this frame; zero if photons from
    /// the previous frame got reused.
    pub emitted: u32,

    /// Number of photons in the photon map.
    pub stored: u32,

    /// Number of photons that didn't fit into the arena.
    pub dropped: u32,
}
