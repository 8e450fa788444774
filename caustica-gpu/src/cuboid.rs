use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3, Vec4, Vec4Swizzles};

use crate::{Hit, MaterialId, ObjectKind, Ray};

/// Oriented box.
#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct Cuboid {
    /// x - center x
    /// y - center y
    /// z - center z
    /// w - material id (as u32)
    pub d0: Vec4,

    /// x - half extent x
    /// y - half extent y
    /// z - half extent z
    pub d1: Vec4,

    /// Rotation quaternion (x, y, z, w).
    pub d2: Vec4,
}

impl Cuboid {
    /// Ray components smaller than this are treated as parallel to the slab.
    pub const SLAB_EPSILON: f32 = 0.00000001;

    pub fn new(
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
        material_id: MaterialId,
    ) -> Self {
        Self {
            d0: center.extend(f32::from_bits(material_id.get())),
            d1: half_extents.abs().extend(0.0),
            d2: Vec4::from(rotation.normalize()),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.d0.xyz()
    }

    pub fn half_extents(&self) -> Vec3 {
        self.d1.xyz()
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_vec4(self.d2)
    }

    pub fn material_id(&self) -> MaterialId {
        MaterialId::new(self.d0.w.to_bits())
    }

    /// Radius of the sphere enclosing this box.
    pub fn bounding_radius(&self) -> f32 {
        self.half_extents().length()
    }

    /// Slab test performed in the box's local space.
    ///
    /// Tracks which axis produced the near and the far parameter, so that a
    /// ray starting inside of the box reports the face it exits through.
    pub fn hit(&self, ray: Ray, hit: &mut Hit) -> bool {
        let rotation = self.rotation();
        let inv_rotation = rotation.inverse();
        let origin = inv_rotation * (ray.origin() - self.center());
        let direction = inv_rotation * ray.direction();
        let half = self.half_extents();

        let mut t_near = -f32::MAX;
        let mut t_far = f32::MAX;
        let mut near_axis = 0;
        let mut far_axis = 0;
        let mut axis = 0;

        while axis < 3 {
            let o = origin[axis];
            let d = direction[axis];
            let h = half[axis];

            if d.abs() < Self::SLAB_EPSILON {
                if o < -h || o > h {
                    return false;
                }
            } else {
                let inv_d = 1.0 / d;
                let mut t0 = (-h - o) * inv_d;
                let mut t1 = (h - o) * inv_d;

                if t0 > t1 {
                    (t0, t1) = (t1, t0);
                }

                if t0 > t_near {
                    t_near = t0;
                    near_axis = axis;
                }

                if t1 < t_far {
                    t_far = t1;
                    far_axis = axis;
                }

                if t_near > t_far {
                    return false;
                }
            }

            axis += 1;
        }

        let (distance, axis, entering) = if t_near > ray.min_distance() {
            (t_near, near_axis, true)
        } else if t_far > ray.min_distance() {
            (t_far, far_axis, false)
        } else {
            return false;
        };

        if distance >= hit.distance {
            return false;
        }

        let mut local_normal = Vec3::ZERO;

        local_normal[axis] = if entering {
            -direction[axis].signum()
        } else {
            direction[axis].signum()
        };

        let normal = (rotation * local_normal).normalize();

        hit.distance = distance;
        hit.point = ray.at(distance);
        hit.normal = normal;
        hit.face_normal = normal;
        hit.kind = ObjectKind::Cuboid;
        hit.material_id = self.material_id();

        true
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;

    fn target(rotation: Quat) -> Cuboid {
        Cuboid::new(Vec3::ZERO, Vec3::ONE, rotation, MaterialId::new(1))
    }

    #[test]
    fn entering() {
        let ray = Ray::new(vec3(-5.0, 0.2, 0.3), Vec3::X);
        let mut hit = Hit::none();

        assert!(target(Quat::IDENTITY).hit(ray, &mut hit));
        assert_relative_eq!(hit.distance, 4.0);
        assert_eq!(-Vec3::X, hit.normal);
        assert!(hit.is_front_face(ray.direction()));
    }

    #[test]
    fn exiting() {
        let ray = Ray::new(Vec3::ZERO, -Vec3::Y);
        let mut hit = Hit::none();

        assert!(target(Quat::IDENTITY).hit(ray, &mut hit));
        assert_relative_eq!(hit.distance, 1.0);
        assert_eq!(-Vec3::Y, hit.normal);
        assert!(!hit.is_front_face(ray.direction()));
    }

    #[test]
    fn rotated() {
        let rotation = Quat::from_rotation_y(45f32.to_radians());
        let ray = Ray::new(vec3(-5.0, 0.0, 0.0), Vec3::X);
        let mut hit = Hit::none();

        assert!(target(rotation).hit(ray, &mut hit));
        assert_relative_eq!(hit.distance, 5.0 - 2f32.sqrt(), epsilon = 1e-4);
        assert!(hit.normal.x < 0.0);
        assert_relative_eq!(hit.normal.length(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn parallel_outside_slab_misses() {
        let ray = Ray::new(vec3(-5.0, 2.0, 0.0), Vec3::X);

        assert!(!target(Quat::IDENTITY).hit(ray, &mut Hit::none()));
    }

    #[test]
    fn box_behind_ray_misses() {
        let ray = Ray::new(vec3(5.0, 0.0, 0.0), Vec3::X);

        assert!(!target(Quat::IDENTITY).hit(ray, &mut Hit::none()));
    }
}
