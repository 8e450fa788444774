use bytemuck::{Pod, Zeroable};
use glam::{vec2, Vec3, Vec4, Vec4Swizzles};

use crate::{Hit, ObjectKind, Ray};

/// World-space triangle with per-vertex normals.
#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct Triangle {
    pub d0: Vec4,
    pub d1: Vec4,
    pub d2: Vec4,
    pub d3: Vec4,
    pub d4: Vec4,
    pub d5: Vec4,
}

impl Triangle {
    pub fn new(positions: [Vec3; 3], normals: [Vec3; 3]) -> Self {
        Self {
            d0: positions[0].extend(0.0),
            d1: normals[0].extend(0.0),
            d2: positions[1].extend(0.0),
            d3: normals[1].extend(0.0),
            d4: positions[2].extend(0.0),
            d5: normals[2].extend(0.0),
        }
    }

    pub fn position0(&self) -> Vec3 {
        self.d0.xyz()
    }

    pub fn normal0(&self) -> Vec3 {
        self.d1.xyz()
    }

    pub fn position1(&self) -> Vec3 {
        self.d2.xyz()
    }

    pub fn normal1(&self) -> Vec3 {
        self.d3.xyz()
    }

    pub fn position2(&self) -> Vec3 {
        self.d4.xyz()
    }

    pub fn normal2(&self) -> Vec3 {
        self.d5.xyz()
    }

    pub fn positions(&self) -> [Vec3; 3] {
        [self.position0(), self.position1(), self.position2()]
    }

    pub fn center(&self) -> Vec3 {
        (self.position0() + self.position1() + self.position2()) / 3.0
    }

    /// Möller-Trumbore intersection; on success fills `hit` with everything
    /// except for the material, which is known only to the BVH.
    pub fn hit(&self, ray: Ray, hit: &mut Hit) -> bool {
        let v0v1 = self.position1() - self.position0();
        let v0v2 = self.position2() - self.position0();

        // ---

        let pvec = ray.direction().cross(v0v2);
        let det = v0v1.dot(pvec);

        if det.abs() < f32::EPSILON {
            return false;
        }

        // ---

        let inv_det = 1.0 / det;
        let tvec = ray.origin() - self.position0();
        let u = tvec.dot(pvec) * inv_det;
        let qvec = tvec.cross(v0v1);
        let v = ray.direction().dot(qvec) * inv_det;
        let distance = v0v2.dot(qvec) * inv_det;

        if (u < 0.0)
            | (u > 1.0)
            | (v < 0.0)
            | (u + v > 1.0)
            | (distance <= ray.min_distance())
            | (distance >= hit.distance)
        {
            return false;
        }

        let face_normal = v0v1.cross(v0v2).normalize();

        let normal = u * self.normal1()
            + v * self.normal2()
            + (1.0 - u - v) * self.normal0();

        // Meshes without vertex normals get flat shading
        let normal = if normal.length_squared() > 0.0 {
            normal.normalize()
        } else {
            face_normal
        };

        hit.distance = distance;
        hit.point = ray.at(distance);
        hit.normal = normal;
        hit.face_normal = face_normal;
        hit.barycentrics = vec2(u, v);
        hit.kind = ObjectKind::Triangle;

        true
    }
}

#[derive(Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct TriangleId(u32);

impl TriangleId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}
