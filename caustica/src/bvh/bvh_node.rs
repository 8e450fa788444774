use crate::gpu;
use crate::utils::BoundingBox;

#[derive(Clone, Debug)]
pub enum BvhNode {
    Internal {
        bb: BoundingBox,
        left: Box<Self>,
        right: Box<Self>,
    },

    Leaf {
        bb: BoundingBox,
        triangles: Vec<(gpu::TriangleId, gpu::MaterialId)>,
    },
}

impl BvhNode {
    pub fn bb(&self) -> BoundingBox {
        match self {
            BvhNode::Internal { bb, .. } | BvhNode::Leaf { bb, .. } => *bb,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Internal { left, right, .. } => {
                1 + left.depth().max(right.depth())
            }
            BvhNode::Leaf { .. } => 1,
        }
    }
}
