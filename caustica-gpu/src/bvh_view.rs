use core::mem;

use glam::{Vec4, Vec4Swizzles};
#[cfg(target_arch = "spirv")]
use spirv_std::arch::IndexUnchecked;

use crate::{Hit, MaterialId, Ray, TriangleId, TrianglesView, BVH_STACK_SIZE};

/// Flattened mesh BVH, as produced by the host-side serializer.
///
/// Internal nodes take four items:
///
/// - d0: left child's bounding box min, w = 0,
/// - d1: left child's bounding box max, w = pointer to the right child,
/// - d2: right child's bounding box min,
/// - d3: right child's bounding box max.
///
/// The left child always follows its parent directly.
///
/// Leaf nodes take one item per triangle:
///
/// - d0: x = 1 if more triangles follow, y = triangle id, z = material id,
///   w = 1.
#[derive(Clone, Copy)]
pub struct BvhView<'a> {
    buffer: &'a [Vec4],
}

impl<'a> BvhView<'a> {
    pub fn new(buffer: &'a [Vec4]) -> Self {
        Self { buffer }
    }

    pub fn get(&self, ptr: u32) -> Vec4 {
        #[cfg(not(target_arch = "spirv"))]
        let item = self.buffer[ptr as usize];

        #[cfg(target_arch = "spirv")]
        let item = unsafe { *self.buffer.index_unchecked(ptr as usize) };

        item
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Traverses the tree, updating `hit` with the nearest triangle closer
    /// than what's already there; returns the number of visited nodes.
    pub fn trace(
        self,
        triangles: TrianglesView,
        ray: Ray,
        hit: &mut Hit,
    ) -> u32 {
        if self.buffer.is_empty() {
            return 0;
        }

        let mut stack = [0u32; BVH_STACK_SIZE];
        let mut stack_ptr = 0;
        let mut bvh_ptr = 0;
        let mut visited = 0;

        loop {
            visited += 1;

            let d0 = self.get(bvh_ptr);
            let is_internal_node = d0.w.to_bits() == 0;

            if is_internal_node {
                let d1 = self.get(bvh_ptr + 1);
                let d2 = self.get(bvh_ptr + 2);
                let d3 = self.get(bvh_ptr + 3);

                let mut near_ptr = bvh_ptr + 4;
                let mut far_ptr = d1.w.to_bits();
                let mut near_distance =
                    ray.distance_to_aabb(d0.xyz(), d1.xyz());

                let mut far_distance =
                    ray.distance_to_aabb(d2.xyz(), d3.xyz());

                if far_distance < near_distance {
                    mem::swap(&mut near_ptr, &mut far_ptr);
                    mem::swap(&mut near_distance, &mut far_distance);
                }

                // Visit the closer child first and keep the other one for
                // later, unless it can't contain anything nearer than what we
                // already have
                if far_distance < hit.distance && stack_ptr < BVH_STACK_SIZE {
                    stack[stack_ptr] = far_ptr;
                    stack_ptr += 1;
                }

                if near_distance < hit.distance {
                    bvh_ptr = near_ptr;
                    continue;
                }
            } else {
                let has_more_triangles = d0.x.to_bits() & 1 == 1;
                let triangle_id = TriangleId::new(d0.y.to_bits());
                let material_id = MaterialId::new(d0.z.to_bits());

                if triangles.get(triangle_id).hit(ray, hit) {
                    hit.object_id = triangle_id.get();
                    hit.material_id = material_id;
                }

                if has_more_triangles {
                    bvh_ptr += 1;
                    continue;
                }
            }

            if stack_ptr > 0 {
                stack_ptr -= 1;
                bvh_ptr = stack[stack_ptr];
            } else {
                break;
            }
        }

        visited
    }
}
