//! Caustica: a stochastic path tracer with photon-mapped caustics.
//!
//! This crate is the host side of the renderer: it keeps track of the scene
//! (identified through caller-provided handles, see [`Params`]), builds the
//! acceleration structures, and runs the per-pixel algorithms from
//! [`caustica_gpu`] on a thread pool.
//!
//! # Usage
//!
//! ```no_run
//! use caustica::*;
//! use glam::{uvec2, vec3, vec4, Vec3};
//!
//! struct MyParams;
//!
//! impl Params for MyParams {
//!     type LightHandle = u32;
//!     type MaterialHandle = u32;
//!     type PrimitiveHandle = u32;
//!     type MeshHandle = u32;
//!     type InstanceHandle = u32;
//! }
//!
//! let mut engine = Engine::<MyParams>::new();
//!
//! engine.add_material(0, Material::default());
//! engine.add_light(0, Light::point(vec3(0.0, 5.0, 0.0), Vec3::ONE, 50.0));
//!
//! engine
//!     .add_primitive(0, Primitive::sphere(Vec3::ZERO, 1.0), 0)
//!     .unwrap();
//!
//! let camera = Camera::new(vec3(0.0, 1.0, 5.0), -Vec3::Z);
//!
//! let mut viewport = engine
//!     .create_viewport(uvec2(320, 240), camera, RenderSettings::default())
//!     .unwrap();
//!
//! engine.render(&mut viewport);
//! viewport.save_png("out.png").unwrap();
//! ```

mod bvh;
mod camera;
mod denoiser;
mod error;
mod gbuffers;
mod instance;
mod instances;
mod light;
mod lights;
mod material;
mod materials;
mod mesh;
mod meshes;
mod photons;
mod primitive;
mod primitives;
mod settings;
mod texture;
mod utils;
mod viewport;

use std::fmt::Debug;
use std::hash::Hash;

pub use caustica_gpu as gpu;
pub use caustica_gpu::{DebugMode, ToneMap};
use log::{debug, info};

pub use self::bvh::*;
pub use self::camera::*;
pub use self::denoiser::*;
pub use self::error::*;
pub use self::gbuffers::*;
pub use self::instance::*;
use self::instances::*;
pub use self::light::*;
use self::lights::*;
pub use self::material::*;
use self::materials::*;
pub use self::mesh::*;
use self::meshes::*;
pub use self::photons::*;
pub use self::primitive::*;
use self::primitives::*;
pub use self::settings::*;
pub use self::texture::*;
pub use self::viewport::*;

/// Types of handles the caller uses to identify scene objects.
pub trait Params {
    type LightHandle: Copy + Eq + Hash + Debug;
    type MaterialHandle: Copy + Eq + Hash + Debug;
    type PrimitiveHandle: Copy + Eq + Hash + Debug;
    type MeshHandle: Copy + Eq + Hash + Debug;
    type InstanceHandle: Copy + Eq + Hash + Debug;
}

pub struct Engine<P>
where
    P: Params,
{
    lights: Lights<P>,
    materials: Materials<P>,
    primitives: Primitives<P>,
    meshes: Meshes<P>,
    instances: Instances<P>,
    buffers: SceneData,
    dirty: bool,
    version: u64,
}

impl<P> Engine<P>
where
    P: Params,
{
    pub fn new() -> Self {
        info!("Initializing engine");

        Self {
            lights: Default::default(),
            materials: Default::default(),
            primitives: Default::default(),
            meshes: Default::default(),
            instances: Default::default(),
            buffers: Default::default(),
            dirty: true,
            version: 0,
        }
    }

    /// Creates or updates a light.
    pub fn add_light(&mut self, handle: P::LightHandle, light: Light) {
        self.lights.insert(handle, light);
        self.dirty = true;
    }

    pub fn remove_light(&mut self, handle: &P::LightHandle) {
        if self.lights.remove(handle).is_some() {
            self.dirty = true;
        }
    }

    /// Creates or updates a material.
    pub fn add_material(
        &mut self,
        handle: P::MaterialHandle,
        material: Material,
    ) {
        self.materials.insert(handle, material);
        self.dirty = true;
    }

    /// Removes a material; objects still referring to it are skipped until
    /// the material gets added back.
    pub fn remove_material(&mut self, handle: &P::MaterialHandle) {
        if self.materials.remove(handle).is_some() {
            self.dirty = true;
        }
    }

    /// Creates or updates an analytic primitive (sphere, plane, cuboid).
    pub fn add_primitive(
        &mut self,
        handle: P::PrimitiveHandle,
        primitive: Primitive,
        material_handle: P::MaterialHandle,
    ) -> Result<()> {
        if !self.materials.has(&material_handle) {
            return Err(Error::UnknownMaterial(format!("{material_handle:?}")));
        }

        self.primitives.insert(handle, primitive, material_handle);
        self.dirty = true;

        Ok(())
    }

    pub fn remove_primitive(&mut self, handle: &P::PrimitiveHandle) {
        if self.primitives.remove(handle).is_some() {
            self.dirty = true;
        }
    }

    /// Creates or updates a mesh; meshes are not rendered on their own, but
    /// rather through instances (see [`Self::add_instance()`]).
    pub fn add_mesh(&mut self, handle: P::MeshHandle, mesh: Mesh) {
        self.meshes.insert(handle, mesh);
        self.dirty = true;
    }

    pub fn remove_mesh(&mut self, handle: &P::MeshHandle) {
        if self.meshes.remove(handle).is_some() {
            self.dirty = true;
        }
    }

    /// Creates or updates an instance of a mesh.
    pub fn add_instance(
        &mut self,
        handle: P::InstanceHandle,
        instance: Instance<P>,
    ) -> Result<()> {
        if !self.meshes.has(&instance.mesh_handle) {
            return Err(Error::UnknownMesh(format!(
                "{:?}",
                instance.mesh_handle
            )));
        }

        if !self.materials.has(&instance.material_handle) {
            return Err(Error::UnknownMaterial(format!(
                "{:?}",
                instance.material_handle
            )));
        }

        self.instances.insert(handle, instance);
        self.dirty = true;

        Ok(())
    }

    pub fn remove_instance(&mut self, handle: &P::InstanceHandle) {
        if self.instances.remove(handle).is_some() {
            self.dirty = true;
        }
    }

    /// Returns a number that changes every time the scene gets rebuilt.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Rebuilds buffers (and BVH) if anything changed since the last call.
    pub fn flush(&mut self) {
        if !self.dirty {
            return;
        }

        let materials = self.materials.refresh();

        self.buffers.materials = materials.buffer;
        self.buffers.lights = self.lights.serialize();

        self.primitives.serialize(
            &materials.index,
            &mut self.buffers.spheres,
            &mut self.buffers.planes,
            &mut self.buffers.cuboids,
        );

        let triangles = self.instances.refresh(
            &self.meshes,
            &materials.index,
            &mut self.buffers.triangles,
        );

        self.buffers.bvh = Bvh::build(triangles);

        self.dirty = false;
        self.version += 1;

        debug!(
            "Scene rebuilt; version={}, spheres={}, planes={}, cuboids={}, \
             triangles={}, bvh-size={}, materials={}, lights={}",
            self.version,
            self.buffers.spheres.len(),
            self.buffers.planes.len(),
            self.buffers.cuboids.len(),
            self.buffers.triangles.len(),
            bytemuck::cast_slice::<_, u8>(&self.buffers.bvh).len(),
            self.buffers.materials.len(),
            self.buffers.lights.len(),
        );
    }

    pub fn create_viewport(
        &self,
        size: glam::UVec2,
        camera: Camera,
        settings: RenderSettings,
    ) -> Result<Viewport> {
        Viewport::new(size, camera, settings)
    }

    /// Flushes the scene and renders a frame into given viewport.
    pub fn render(&mut self, viewport: &mut Viewport) -> FrameStats {
        self.flush();
        viewport.render(self)
    }

    pub(crate) fn buffers(&self) -> &SceneData {
        &self.buffers
    }
}

impl<P> Default for Engine<P>
where
    P: Params,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Scene, as serialized for the per-pixel code.
#[derive(Default)]
pub(crate) struct SceneData {
    pub spheres: Vec<gpu::Sphere>,
    pub planes: Vec<gpu::Plane>,
    pub cuboids: Vec<gpu::Cuboid>,
    pub triangles: Vec<gpu::Triangle>,
    pub bvh: Vec<glam::Vec4>,
    pub materials: Vec<gpu::Material>,
    pub lights: Vec<gpu::Light>,
}

impl SceneData {
    pub fn as_buffers(&self) -> gpu::SceneBuffers<'_> {
        gpu::SceneBuffers {
            spheres: &self.spheres,
            planes: &self.planes,
            cuboids: &self.cuboids,
            triangles: &self.triangles,
            bvh: &self.bvh,
            materials: &self.materials,
            lights: &self.lights,
        }
    }
}
