use derivative::Derivative;
use glam::{UVec2, Vec2, Vec3, Vec4};

use crate::gpu;

/// Per-pixel outputs of the path tracing pass, one buffer per signal.
///
/// Layout of the packed signals follows [`gpu::DenoiserInputs`].
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct GBuffers {
    size: UVec2,

    #[derivative(Debug = "ignore")]
    color: Vec<Vec3>,

    #[derivative(Debug = "ignore")]
    primary: Vec<Vec3>,

    #[derivative(Debug = "ignore")]
    caustic: Vec<Vec3>,

    #[derivative(Debug = "ignore")]
    diffuse: Vec<Vec4>,

    #[derivative(Debug = "ignore")]
    specular: Vec<Vec4>,

    #[derivative(Debug = "ignore")]
    normal_roughness: Vec<Vec4>,

    #[derivative(Debug = "ignore")]
    view_depth: Vec<f32>,

    #[derivative(Debug = "ignore")]
    motion: Vec<Vec2>,

    #[derivative(Debug = "ignore")]
    albedo: Vec<Vec4>,

    #[derivative(Debug = "ignore")]
    shadow: Vec<Vec2>,

    #[derivative(Debug = "ignore")]
    translucency: Vec<Vec4>,

    #[derivative(Debug = "ignore")]
    ray_count: Vec<u32>,
}

impl GBuffers {
    pub fn new(size: UVec2) -> Self {
        let len = (size.x * size.y) as usize;

        Self {
            size,
            color: vec![Vec3::ZERO; len],
            primary: vec![Vec3::ZERO; len],
            caustic: vec![Vec3::ZERO; len],
            diffuse: vec![Vec4::ZERO; len],
            specular: vec![Vec4::ZERO; len],
            normal_roughness: vec![Vec4::ZERO; len],
            view_depth: vec![gpu::DenoiserBridge::MISS_VIEW_DEPTH; len],
            motion: vec![Vec2::ZERO; len],
            albedo: vec![Vec4::ZERO; len],
            shadow: vec![Vec2::ZERO; len],
            translucency: vec![Vec4::ZERO; len],
            ray_count: vec![0; len],
        }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.color.len()
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_empty()
    }

    pub fn idx(&self, pos: UVec2) -> usize {
        (pos.y * self.size.x + pos.x) as usize
    }

    /// Stores outputs of the whole frame; `outputs` go in row-major order.
    pub fn store(&mut self, outputs: &[gpu::PixelOutput]) {
        assert_eq!(self.len(), outputs.len());

        for (idx, output) in outputs.iter().enumerate() {
            self.write(idx, output);
        }
    }

    pub fn write(&mut self, idx: usize, output: &gpu::PixelOutput) {
        let gbuffer = &output.gbuffer;

        self.color[idx] = output.color;
        self.primary[idx] = output.primary;
        self.caustic[idx] = output.caustic;
        self.diffuse[idx] = gbuffer.diffuse;
        self.specular[idx] = gbuffer.specular;
        self.normal_roughness[idx] = gbuffer.normal_roughness;
        self.view_depth[idx] = gbuffer.view_depth;
        self.motion[idx] = gbuffer.motion;
        self.albedo[idx] = gbuffer.albedo;
        self.shadow[idx] = gbuffer.shadow;
        self.translucency[idx] = gbuffer.translucency;
        self.ray_count[idx] = output.ray_count;
    }

    /// Reassembles denoiser inputs of given pixel.
    pub fn inputs(&self, idx: usize) -> gpu::DenoiserInputs {
        gpu::DenoiserInputs {
            diffuse: self.diffuse[idx],
            specular: self.specular[idx],
            normal_roughness: self.normal_roughness[idx],
            view_depth: self.view_depth[idx],
            motion: self.motion[idx],
            albedo: self.albedo[idx],
            shadow: self.shadow[idx],
            translucency: self.translucency[idx],
        }
    }

    /// Raw (noisy) radiance.
    pub fn color(&self) -> &[Vec3] {
        &self.color
    }

    /// Radiance coming from first-bounce shading.
    pub fn primary(&self) -> &[Vec3] {
        &self.primary
    }

    pub fn caustic(&self) -> &[Vec3] {
        &self.caustic
    }

    /// Demodulated diffuse radiance (xyz) and hit distance (w).
    pub fn diffuse(&self) -> &[Vec4] {
        &self.diffuse
    }

    /// Specular radiance (xyz) and hit distance (w).
    pub fn specular(&self) -> &[Vec4] {
        &self.specular
    }

    pub fn normal_roughness(&self) -> &[Vec4] {
        &self.normal_roughness
    }

    pub fn view_depth(&self) -> &[f32] {
        &self.view_depth
    }

    pub fn motion(&self) -> &[Vec2] {
        &self.motion
    }

    /// Albedo (xyz) and alpha class code (w).
    pub fn albedo(&self) -> &[Vec4] {
        &self.albedo
    }

    /// Penumbra (x) and visibility (y).
    pub fn shadow(&self) -> &[Vec2] {
        &self.shadow
    }

    pub fn translucency(&self) -> &[Vec4] {
        &self.translucency
    }

    pub fn ray_count(&self) -> &[u32] {
        &self.ray_count
    }
}
