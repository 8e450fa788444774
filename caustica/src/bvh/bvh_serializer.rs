use glam::{vec4, Vec4};

use super::BvhNode;

/// Flattens [`BvhNode`] into the layout described in
/// [`crate::gpu::BvhView`].
pub struct BvhSerializer;

impl BvhSerializer {
    const INTERNAL_NODE_SIZE: usize = 4;

    pub fn process(out: &mut Vec<Vec4>, node: &BvhNode) {
        match node {
            BvhNode::Internal { left, right, .. } => {
                let ptr = out.len();

                out.resize(ptr + Self::INTERNAL_NODE_SIZE, Vec4::ZERO);

                Self::process(out, left);

                let right_ptr = out.len() as u32;

                Self::process(out, right);

                let left_bb = left.bb();
                let right_bb = right.bb();

                out[ptr] = left_bb.min().extend(f32::from_bits(0));
                out[ptr + 1] = left_bb.max().extend(f32::from_bits(right_ptr));
                out[ptr + 2] = right_bb.min().extend(0.0);
                out[ptr + 3] = right_bb.max().extend(0.0);
            }

            BvhNode::Leaf { triangles, .. } => {
                assert!(!triangles.is_empty());

                for (idx, (triangle_id, material_id)) in
                    triangles.iter().enumerate()
                {
                    let has_more = (idx + 1 < triangles.len()) as u32;

                    out.push(vec4(
                        f32::from_bits(has_more),
                        f32::from_bits(triangle_id.get()),
                        f32::from_bits(material_id.get()),
                        f32::from_bits(1),
                    ));
                }
            }
        }
    }
}
