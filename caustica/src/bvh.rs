mod bvh_builder;
mod bvh_node;
mod bvh_serializer;
mod bvh_triangle;

use glam::Vec4;
use log::debug;

use self::bvh_node::*;
use self::bvh_serializer::*;
pub use self::bvh_triangle::*;
use crate::utils::measure;

/// Bounding volume hierarchy over mesh triangles.
pub struct Bvh;

impl Bvh {
    /// Builds the tree using SAH and flattens it into the layout read by
    /// [`crate::gpu::BvhView`].
    ///
    /// Returns an empty buffer when there are no triangles.
    pub fn build(triangles: Vec<BvhTriangle>) -> Vec<Vec4> {
        if triangles.is_empty() {
            return Vec::new();
        }

        let triangle_count = triangles.len();
        let (root, tt_build) = measure(|| bvh_builder::build(triangles));

        let mut buffer = Vec::with_capacity(triangle_count * 3);
        let (_, tt_serialize) =
            measure(|| BvhSerializer::process(&mut buffer, &root));

        debug!(
            "BVH built; triangles={}, depth={}, items={}, tt-build={:?}, \
             tt-serialize={:?}",
            triangle_count,
            root.depth(),
            buffer.len(),
            tt_build,
            tt_serialize,
        );

        buffer
    }
}

#[cfg(test)]
mod tests {
    use glam::{vec3, Vec3};

    use super::*;
    use crate::gpu;

    fn triangle(id: u32, center: Vec3) -> BvhTriangle {
        let triangle = gpu::Triangle::new(
            [
                center + vec3(-0.5, 0.0, 0.0),
                center + vec3(0.5, 0.0, 0.0),
                center + vec3(0.0, 0.5, 0.0),
            ],
            [Vec3::Z; 3],
        );

        BvhTriangle::new(
            &triangle,
            gpu::TriangleId::new(id),
            gpu::MaterialId::new(7),
        )
    }

    #[test]
    fn empty() {
        assert!(Bvh::build(Vec::new()).is_empty());
    }

    #[test]
    fn single_triangle() {
        let buffer = Bvh::build(vec![triangle(3, Vec3::ZERO)]);

        assert_eq!(1, buffer.len());
        assert_eq!(0, buffer[0].x.to_bits());
        assert_eq!(3, buffer[0].y.to_bits());
        assert_eq!(7, buffer[0].z.to_bits());
        assert_eq!(1, buffer[0].w.to_bits());
    }

    #[test]
    fn stacked_triangles_form_a_single_leaf() {
        // Triangles sharing their centroid can't be split, so they all have
        // to end up in one leaf, chained through the `has more` flag
        let triangles = (0..10).map(|id| triangle(id, Vec3::ONE)).collect();
        let buffer = Bvh::build(triangles);

        assert_eq!(10, buffer.len());

        for (idx, item) in buffer.iter().enumerate() {
            let has_more = if idx == 9 { 0 } else { 1 };

            assert_eq!(has_more, item.x.to_bits());
            assert_eq!(idx as u32, item.y.to_bits());
            assert_eq!(1, item.w.to_bits());
        }
    }

    #[test]
    fn distant_triangles_get_split() {
        let triangles = (0..16)
            .map(|id| triangle(id, vec3(10.0 * (id as f32), 0.0, 0.0)))
            .collect();

        let buffer = Bvh::build(triangles);

        // Root is an internal node whose left child follows it directly
        assert_eq!(0, buffer[0].w.to_bits());

        let right_ptr = buffer[1].w.to_bits() as usize;

        assert!(right_ptr > 4);
        assert!(right_ptr < buffer.len());

        // Children's boxes don't overlap along the split axis
        assert!(buffer[1].x < buffer[2].x);

        // Every triangle is referenced exactly once
        let mut ids: Vec<_> = buffer
            .iter()
            .filter(|item| item.w.to_bits() == 1)
            .map(|item| item.y.to_bits())
            .collect();

        ids.sort();

        assert_eq!((0..16).collect::<Vec<_>>(), ids);
    }
}
