use glam::{uvec2, UVec2, Vec4Swizzles};
use log::debug;
use rayon::prelude::*;

use crate::utils::metric;
use crate::{gpu, DenoisedSignals, GBuffers, Texture};

/// Merges raw and denoised signals into the displayed image.
pub struct CompositionPass;

impl CompositionPass {
    pub fn new() -> Self {
        debug!("Initializing pass: composition");

        Self
    }

    pub fn run(
        &self,
        camera: &gpu::Camera,
        params: &gpu::CompositorParams,
        gbuffers: &GBuffers,
        denoised: Option<&DenoisedSignals>,
        output: &mut Texture,
    ) {
        let size = output.size();
        let compositor = gpu::Compositor::new(params, camera);

        let fetch = |pos: UVec2| {
            let idx = gbuffers.idx(pos);

            let (denoised_diffuse, denoised_specular) = match denoised {
                Some(denoised) => {
                    (denoised.diffuse[idx], denoised.specular[idx])
                }
                None => (
                    gbuffers.diffuse()[idx].xyz(),
                    gbuffers.specular()[idx].xyz(),
                ),
            };

            gpu::CompositorSample {
                color: gbuffers.color()[idx],
                primary: gbuffers.primary()[idx],
                caustic: gbuffers.caustic()[idx],
                denoised_diffuse,
                denoised_specular,
                gbuffer: gbuffers.inputs(idx),
                ray_count: gbuffers.ray_count()[idx],
            }
        };

        metric("composition", || {
            output.pixels_mut().par_iter_mut().enumerate().for_each(
                |(idx, pixel)| {
                    let idx = idx as u32;
                    let pos = uvec2(idx % size.x, idx / size.x);

                    *pixel = compositor.composite(pos, &fetch);
                },
            );
        });
    }
}
