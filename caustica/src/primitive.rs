use glam::{Quat, Vec3};

use crate::gpu;

/// Analytic shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    Sphere {
        center: Vec3,
        radius: f32,
    },

    /// Infinite plane of points `x` satisfying `normal · x = offset`.
    Plane {
        normal: Vec3,
        offset: f32,
    },

    /// Oriented box.
    Cuboid {
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
    },
}

impl Primitive {
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::Sphere { center, radius }
    }

    pub fn plane(normal: Vec3, offset: f32) -> Self {
        Self::Plane { normal, offset }
    }

    pub fn cuboid(center: Vec3, half_extents: Vec3, rotation: Quat) -> Self {
        Self::Cuboid {
            center,
            half_extents,
            rotation,
        }
    }
}

pub(crate) enum SerializedPrimitive {
    Sphere(gpu::Sphere),
    Plane(gpu::Plane),
    Cuboid(gpu::Cuboid),
}

impl Primitive {
    pub(crate) fn serialize(
        &self,
        material_id: gpu::MaterialId,
    ) -> SerializedPrimitive {
        match *self {
            Primitive::Sphere { center, radius } => {
                SerializedPrimitive::Sphere(gpu::Sphere::new(
                    center,
                    radius.abs(),
                    material_id,
                ))
            }

            Primitive::Plane { normal, offset } => {
                SerializedPrimitive::Plane(gpu::Plane::new(
                    normal.normalize_or_zero(),
                    offset,
                    material_id,
                ))
            }

            Primitive::Cuboid {
                center,
                half_extents,
                rotation,
            } => SerializedPrimitive::Cuboid(gpu::Cuboid::new(
                center,
                half_extents,
                rotation,
                material_id,
            )),
        }
    }
}
