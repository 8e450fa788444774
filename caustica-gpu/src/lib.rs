//! Per-invocation algorithms of Caustica's path tracer, together with the
//! plain-old-data structures they read.
//!
//! Everything here runs once per pixel (or once per photon slot) and doesn't
//! allocate, so that the code stays portable to SPIR-V; the host (see the
//! `caustica` crate) owns the buffers and dispatches the invocations.

#![cfg_attr(target_arch = "spirv", no_std)]
#![allow(clippy::len_without_is_empty)]
#![allow(clippy::manual_range_contains)]

mod brdf;
mod bvh_view;
mod camera;
mod compositor;
mod cuboid;
mod denoiser;
mod hit;
mod intersector;
mod light;
mod lights;
mod material;
mod material_shader;
mod materials;
mod noise;
mod path;
mod path_tracer;
mod photon;
mod photon_map;
mod plane;
mod ray;
mod scene;
mod scene_constants;
mod shadow;
mod sky;
mod sphere;
mod triangle;
mod triangles;
mod utils;
mod work_queue;

pub use self::brdf::*;
pub use self::bvh_view::*;
pub use self::camera::*;
pub use self::compositor::*;
pub use self::cuboid::*;
pub use self::denoiser::*;
pub use self::hit::*;
pub use self::intersector::*;
pub use self::light::*;
pub use self::lights::*;
pub use self::material::*;
pub use self::material_shader::*;
pub use self::materials::*;
pub use self::noise::*;
pub use self::path::*;
pub use self::path_tracer::*;
pub use self::photon::*;
pub use self::photon_map::*;
pub use self::plane::*;
pub use self::ray::*;
pub use self::scene::*;
pub use self::scene_constants::*;
pub use self::shadow::*;
pub use self::sky::*;
pub use self::sphere::*;
pub use self::triangle::*;
pub use self::triangles::*;
pub use self::utils::*;
pub use self::work_queue::*;

pub mod prelude {
    pub use core::f32::consts::PI;

    pub use glam::*;
    #[cfg(target_arch = "spirv")]
    pub use spirv_std::num_traits::Float;

    pub use crate::*;
}

/// Maximum number of pending nodes when traversing the BVH.
///
/// Affects the maximum depth of the BVH tree; the host-side builder never
/// produces trees deeper than this.
pub const BVH_STACK_SIZE: usize = 64;

/// Smallest value considered non-zero by the numerically sensitive parts of
/// the renderer (divisions, normalizations etc.).
pub const CAUSTICA_EPSILON: f32 = 0.00001;
