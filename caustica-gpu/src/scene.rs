use glam::Vec4;

use crate::{
    BvhView, Cuboid, Intersector, Light, LightsView, Material, MaterialShader,
    MaterialsView, PathTracer, PhotonMapView, PhotonTracer, Plane,
    SceneConstants, ShadowSampler, Sphere, Triangle, TrianglesView,
};

/// Buffers describing the scene, as uploaded by the host.
#[derive(Clone, Copy)]
pub struct SceneBuffers<'a> {
    pub spheres: &'a [Sphere],
    pub planes: &'a [Plane],
    pub cuboids: &'a [Cuboid],
    pub triangles: &'a [Triangle],
    pub bvh: &'a [Vec4],
    pub materials: &'a [Material],
    pub lights: &'a [Light],
}

/// Entry point of per-invocation code: binds scene buffers together and
/// hands out the algorithms operating on them.
#[derive(Clone, Copy)]
pub struct Scene<'a> {
    constants: &'a SceneConstants,
    intersector: Intersector<'a>,
    materials: MaterialsView<'a>,
    lights: LightsView<'a>,
    photons: PhotonMapView<'a>,
}

impl<'a> Scene<'a> {
    /// Creates the scene; buffers longer than what `constants` declare are
    /// truncated, so that the host can keep them over-allocated.
    pub fn new(
        constants: &'a SceneConstants,
        buffers: SceneBuffers<'a>,
        photons: PhotonMapView<'a>,
    ) -> Self {
        let spheres = truncate(buffers.spheres, constants.sphere_count);
        let planes = truncate(buffers.planes, constants.plane_count);
        let cuboids = truncate(buffers.cuboids, constants.cuboid_count);
        let triangles = truncate(buffers.triangles, constants.triangle_count);
        let lights = truncate(buffers.lights, constants.light_count);

        let bvh = if triangles.is_empty() {
            &[]
        } else {
            buffers.bvh
        };

        Self {
            constants,
            intersector: Intersector::new(
                spheres,
                planes,
                cuboids,
                TrianglesView::new(triangles),
                BvhView::new(bvh),
            ),
            materials: MaterialsView::new(buffers.materials),
            lights: LightsView::new(lights),
            photons,
        }
    }

    pub fn constants(&self) -> &'a SceneConstants {
        self.constants
    }

    pub fn intersector(&self) -> Intersector<'a> {
        self.intersector
    }

    pub fn shadow_sampler(&self) -> ShadowSampler<'a> {
        ShadowSampler::new(self.intersector, self.materials)
    }

    pub fn material_shader(&self) -> MaterialShader<'a> {
        MaterialShader::new(
            self.constants,
            self.lights,
            self.materials,
            self.shadow_sampler(),
            self.photons,
        )
    }

    pub fn photon_tracer(&self) -> PhotonTracer<'a> {
        PhotonTracer::new(
            self.constants,
            self.intersector,
            self.materials,
            self.lights,
        )
    }

    pub fn path_tracer(&self) -> PathTracer<'a> {
        PathTracer::new(
            self.constants,
            self.intersector,
            self.material_shader(),
        )
    }
}

fn truncate<T>(items: &[T], count: u32) -> &[T] {
    &items[..(count as usize).min(items.len())]
}
