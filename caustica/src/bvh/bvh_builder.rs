use super::{BvhNode, BvhTriangle};
use crate::gpu;
use crate::utils::{Axis, BoundingBox};

/// Number of bins tested per axis when looking for the splitting plane.
const BINS: usize = 12;

/// Nodes with more triangles are always split (if possible at all).
const MAX_LEAF_TRIANGLES: usize = 4;

/// Cost of visiting a node, relative to the cost of intersecting a triangle.
const TRAVERSAL_COST: f32 = 1.0;

/// Deeper nodes become leaves, so that the traversal stack never overflows.
const MAX_DEPTH: usize = gpu::BVH_STACK_SIZE - 1;

/// Builds BVH using binned SAH.
///
/// See: https://jacco.ompf2.com/2022/04/21/how-to-build-a-bvh-part-3-quick-builds/.
pub fn build(triangles: Vec<BvhTriangle>) -> BvhNode {
    build_node(triangles, 0)
}

fn build_node(triangles: Vec<BvhTriangle>, depth: usize) -> BvhNode {
    let bb = triangles
        .iter()
        .fold(BoundingBox::default(), |bb, triangle| bb + triangle.bb);

    if triangles.len() > 1 && depth < MAX_DEPTH {
        let centroids =
            BoundingBox::from_points(triangles.iter().map(|tri| tri.center));

        if let Some(split) = find_split(&triangles, centroids) {
            let leaf_cost = (triangles.len() as f32) * bb.half_area();
            let split_cost = TRAVERSAL_COST * bb.half_area() + split.cost;

            if split_cost < leaf_cost || triangles.len() > MAX_LEAF_TRIANGLES
            {
                let (left, right): (Vec<_>, Vec<_>) =
                    triangles.into_iter().partition(|triangle| {
                        bin_of(triangle, split.axis, centroids) <= split.bin
                    });

                return BvhNode::Internal {
                    bb,
                    left: Box::new(build_node(left, depth + 1)),
                    right: Box::new(build_node(right, depth + 1)),
                };
            }
        }
    }

    BvhNode::Leaf {
        bb,
        triangles: triangles
            .into_iter()
            .map(|triangle| (triangle.triangle_id, triangle.material_id))
            .collect(),
    }
}

#[derive(Clone, Copy, Debug)]
struct Split {
    axis: Axis,

    /// Last bin belonging to the left side.
    bin: usize,

    cost: f32,
}

#[derive(Clone, Copy, Debug, Default)]
struct Bin {
    bb: BoundingBox,
    count: usize,
}

fn find_split(
    triangles: &[BvhTriangle],
    centroids: BoundingBox,
) -> Option<Split> {
    let mut best: Option<Split> = None;

    for axis in Axis::ALL {
        if axis.pick(centroids.extent()) <= 0.0 {
            continue;
        }

        let mut bins = [Bin::default(); BINS];

        for triangle in triangles {
            let bin = &mut bins[bin_of(triangle, axis, centroids)];

            bin.bb += triangle.bb;
            bin.count += 1;
        }

        // Sweep from the right, remembering what's on the right side of each
        // plane, and then from the left, evaluating the planes
        let mut right_sides = [(0, 0.0); BINS];
        let mut right_bb = BoundingBox::default();
        let mut right_count = 0;

        for idx in (1..BINS).rev() {
            right_bb += bins[idx].bb;
            right_count += bins[idx].count;
            right_sides[idx] = (right_count, right_bb.half_area());
        }

        let mut left_bb = BoundingBox::default();
        let mut left_count = 0;

        for idx in 0..(BINS - 1) {
            left_bb += bins[idx].bb;
            left_count += bins[idx].count;

            let (right_count, right_area) = right_sides[idx + 1];

            if left_count == 0 || right_count == 0 {
                continue;
            }

            let cost = (left_count as f32) * left_bb.half_area()
                + (right_count as f32) * right_area;

            if best.map_or(true, |best| cost < best.cost) {
                best = Some(Split {
                    axis,
                    bin: idx,
                    cost,
                });
            }
        }
    }

    best
}

fn bin_of(triangle: &BvhTriangle, axis: Axis, centroids: BoundingBox) -> usize {
    let offset = axis.pick(triangle.center) - axis.pick(centroids.min());
    let extent = axis.pick(centroids.extent());
    let bin = (offset / extent * (BINS as f32)) as usize;

    bin.min(BINS - 1)
}
