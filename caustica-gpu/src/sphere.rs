use bytemuck::{Pod, Zeroable};
use glam::{vec4, Vec3, Vec4, Vec4Swizzles};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{Hit, MaterialId, ObjectKind, Ray};

#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct Sphere {
    /// x - center x
    /// y - center y
    /// z - center z
    /// w - radius
    pub d0: Vec4,

    /// x - material id (as u32)
    pub d1: Vec4,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material_id: MaterialId) -> Self {
        Self {
            d0: center.extend(radius),
            d1: vec4(f32::from_bits(material_id.get()), 0.0, 0.0, 0.0),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.d0.xyz()
    }

    pub fn radius(&self) -> f32 {
        self.d0.w
    }

    pub fn material_id(&self) -> MaterialId {
        MaterialId::new(self.d1.x.to_bits())
    }

    /// Intersects given ray with this sphere, updating `hit` if the
    /// intersection is closer than the one already recorded there.
    pub fn hit(&self, ray: Ray, hit: &mut Hit) -> bool {
        let oc = ray.origin() - self.center();
        let b = oc.dot(ray.direction());
        let c = oc.length_squared() - self.radius() * self.radius();
        let discriminant = b * b - c;

        if discriminant < 0.0 {
            return false;
        }

        let sqrt_d = discriminant.sqrt();
        let mut distance = -b - sqrt_d;

        if distance <= ray.min_distance() {
            distance = -b + sqrt_d;
        }

        if distance <= ray.min_distance() || distance >= hit.distance {
            return false;
        }

        let point = ray.at(distance);
        let normal = (point - self.center()) / self.radius();

        hit.distance = distance;
        hit.point = point;
        hit.normal = normal;
        hit.face_normal = normal;
        hit.kind = ObjectKind::Sphere;
        hit.material_id = self.material_id();

        true
    }
}
