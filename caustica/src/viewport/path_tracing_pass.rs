use glam::uvec2;
use log::debug;
use rayon::prelude::*;

use crate::utils::metric;
use crate::{gpu, GBuffers};

/// Runs the path tracer for every pixel of the viewport.
pub struct PathTracingPass;

impl PathTracingPass {
    pub fn new() -> Self {
        debug!("Initializing pass: path_tracing");

        Self
    }

    /// Renders the frame into `gbuffers`, returning the number of rays cast.
    pub fn run(&self, scene: &gpu::Scene, gbuffers: &mut GBuffers) -> u64 {
        let size = gbuffers.size();
        let tracer = scene.path_tracer();

        let outputs: Vec<_> = metric("path_tracing", || {
            (0..(size.x * size.y))
                .into_par_iter()
                .map(|idx| {
                    tracer.render_pixel(uvec2(idx % size.x, idx / size.x))
                })
                .collect()
        });

        gbuffers.store(&outputs);

        outputs.iter().map(|output| output.ray_count as u64).sum()
    }
}
