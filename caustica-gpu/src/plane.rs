use bytemuck::{Pod, Zeroable};
use glam::{vec4, Vec3, Vec4, Vec4Swizzles};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{Hit, MaterialId, ObjectKind, Ray};

/// Infinite plane of points `x` satisfying `normal · x = offset`.
#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct Plane {
    /// x - normal x
    /// y - normal y
    /// z - normal z
    /// w - offset
    pub d0: Vec4,

    /// x - material id (as u32)
    pub d1: Vec4,
}

impl Plane {
    /// Rays more parallel to the plane than this are considered to miss it.
    pub const PARALLEL_EPSILON: f32 = 0.000001;

    pub fn new(normal: Vec3, offset: f32, material_id: MaterialId) -> Self {
        Self {
            d0: normal.normalize().extend(offset),
            d1: vec4(f32::from_bits(material_id.get()), 0.0, 0.0, 0.0),
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.d0.xyz()
    }

    pub fn offset(&self) -> f32 {
        self.d0.w
    }

    pub fn material_id(&self) -> MaterialId {
        MaterialId::new(self.d1.x.to_bits())
    }

    pub fn hit(&self, ray: Ray, hit: &mut Hit) -> bool {
        let denom = self.normal().dot(ray.direction());

        if denom.abs() < Self::PARALLEL_EPSILON {
            return false;
        }

        let distance =
            (self.offset() - self.normal().dot(ray.origin())) / denom;

        if distance <= ray.min_distance() || distance >= hit.distance {
            return false;
        }

        hit.distance = distance;
        hit.point = ray.at(distance);
        hit.normal = self.normal();
        hit.face_normal = self.normal();
        hit.kind = ObjectKind::Plane;
        hit.material_id = self.material_id();

        true
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;

    #[test]
    fn hit() {
        let plane = Plane::new(Vec3::Y, -1.0, MaterialId::new(0));
        let ray =
            Ray::new(vec3(0.0, 1.0, 0.0), vec3(0.0, -1.0, 1.0).normalize());
        let mut hit = Hit::none();

        assert!(plane.hit(ray, &mut hit));
        assert_relative_eq!(hit.point.y, -1.0, epsilon = 1e-5);
        assert_relative_eq!(hit.point.z, 2.0, epsilon = 1e-5);
        assert!(hit.is_front_face(ray.direction()));
    }

    #[test]
    fn parallel_ray_misses() {
        let plane = Plane::new(Vec3::Y, 0.0, MaterialId::new(0));
        let ray = Ray::new(vec3(0.0, 1.0, 0.0), Vec3::X);

        assert!(!plane.hit(ray, &mut Hit::none()));
    }

    #[test]
    fn plane_behind_ray_misses() {
        let plane = Plane::new(Vec3::Y, 0.0, MaterialId::new(0));
        let ray = Ray::new(vec3(0.0, 1.0, 0.0), Vec3::Y);

        assert!(!plane.hit(ray, &mut Hit::none()));
    }
}
