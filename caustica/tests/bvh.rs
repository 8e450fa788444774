use approx::assert_relative_eq;
use caustica::gpu::{self, BvhView, Hit, Ray, TrianglesView};
use caustica::{Bvh, BvhTriangle};
use glam::{vec3, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_vec3(rng: &mut StdRng, range: f32) -> Vec3 {
    vec3(
        rng.gen_range(-range..range),
        rng.gen_range(-range..range),
        rng.gen_range(-range..range),
    )
}

#[test]
fn traversal_equals_brute_force() {
    let mut rng = StdRng::seed_from_u64(123);

    let triangles: Vec<_> = (0..300)
        .map(|_| {
            let center = random_vec3(&mut rng, 10.0);

            gpu::Triangle::new(
                [
                    center + random_vec3(&mut rng, 1.0),
                    center + random_vec3(&mut rng, 1.0),
                    center + random_vec3(&mut rng, 1.0),
                ],
                [Vec3::ZERO; 3],
            )
        })
        .collect();

    let bvh_triangles = triangles
        .iter()
        .enumerate()
        .map(|(idx, triangle)| {
            BvhTriangle::new(
                triangle,
                gpu::TriangleId::new(idx as u32),
                gpu::MaterialId::new(0),
            )
        })
        .collect();

    let bvh = Bvh::build(bvh_triangles);
    let bvh = BvhView::new(&bvh);
    let triangles_view = TrianglesView::new(&triangles);

    let mut hits = 0;

    for idx in 0..500 {
        let origin = random_vec3(&mut rng, 15.0);

        // Half of the rays go through a triangle's centroid, so that they're
        // guaranteed to hit something
        let target = if idx % 2 == 0 {
            triangles[rng.gen_range(0..triangles.len())].center()
        } else {
            random_vec3(&mut rng, 8.0)
        };

        let ray = Ray::new(origin, (target - origin).normalize());

        let mut expected = Hit::none();

        for (idx, triangle) in triangles.iter().enumerate() {
            if triangle.hit(ray, &mut expected) {
                expected.object_id = idx as u32;
            }
        }

        let mut actual = Hit::none();

        bvh.trace(triangles_view, ray, &mut actual);

        assert_eq!(expected.is_some(), actual.is_some());

        if expected.is_some() {
            hits += 1;

            assert_eq!(expected.object_id, actual.object_id);
            assert_relative_eq!(expected.distance, actual.distance);
        }
    }

    assert!(hits > 200, "hits={hits}");
}
