use glam::{Vec2, Vec3};

use crate::MaterialId;

/// Kind of the object a ray has hit.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub enum ObjectKind {
    #[default]
    None,
    Sphere,
    Plane,
    Cuboid,
    Triangle,
}

/// Nearest intersection found by [`crate::Intersector`].
#[derive(Clone, Copy)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct Hit {
    pub distance: f32,
    pub point: Vec3,

    /// Shading normal; for meshes it's interpolated from vertex normals.
    pub normal: Vec3,

    /// Geometric normal, used only to tell the front side from the back side.
    pub face_normal: Vec3,

    /// Barycentric coordinates of the hit point; set for triangles only.
    pub barycentrics: Vec2,

    pub kind: ObjectKind,
    pub object_id: u32,
    pub material_id: MaterialId,
}

impl Hit {
    /// How far to move a hit point away from its surface to avoid
    /// self-intersection when spawning secondary rays.
    pub const NUDGE_OFFSET: f32 = 0.001;

    pub fn none() -> Self {
        Self {
            distance: f32::MAX,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            face_normal: Vec3::ZERO,
            barycentrics: Vec2::ZERO,
            kind: ObjectKind::None,
            object_id: 0,
            material_id: MaterialId::new(0),
        }
    }

    pub fn is_some(&self) -> bool {
        self.kind != ObjectKind::None
    }

    pub fn is_none(&self) -> bool {
        !self.is_some()
    }

    /// Returns whether a ray travelling along `direction` hits the front side
    /// of the surface (i.e. enters the object, for closed objects).
    pub fn is_front_face(&self, direction: Vec3) -> bool {
        direction.dot(self.face_normal) < 0.0
    }

    /// Returns shading normal flipped so that it faces against `direction`.
    pub fn facing_normal(&self, direction: Vec3) -> Vec3 {
        let normal = if self.is_front_face(direction) {
            self.normal
        } else {
            -self.normal
        };

        // Interpolated normals can lean over the silhouette; fall back to the
        // geometric one when that happens
        if normal.dot(direction) >= 0.0 {
            if self.is_front_face(direction) {
                self.face_normal
            } else {
                -self.face_normal
            }
        } else {
            normal
        }
    }
}

impl Default for Hit {
    fn default() -> Self {
        Self::none()
    }
}
