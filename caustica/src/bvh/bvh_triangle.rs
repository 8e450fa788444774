use glam::Vec3;

use crate::gpu;
use crate::utils::BoundingBox;

/// Triangle as seen by the BVH builder.
#[derive(Clone, Copy, Debug)]
pub struct BvhTriangle {
    pub bb: BoundingBox,
    pub center: Vec3,
    pub triangle_id: gpu::TriangleId,
    pub material_id: gpu::MaterialId,
}

impl BvhTriangle {
    pub fn new(
        triangle: &gpu::Triangle,
        triangle_id: gpu::TriangleId,
        material_id: gpu::MaterialId,
    ) -> Self {
        Self {
            bb: BoundingBox::from_points(triangle.positions()),
            center: triangle.center(),
            triangle_id,
            material_id,
        }
    }
}
