use crate::{
    BvhView, Cuboid, Hit, ObjectKind, Plane, Ray, Sphere, TrianglesView,
};

/// Finds nearest intersections against everything in the scene.
#[derive(Clone, Copy)]
pub struct Intersector<'a> {
    spheres: &'a [Sphere],
    planes: &'a [Plane],
    cuboids: &'a [Cuboid],
    triangles: TrianglesView<'a>,
    bvh: BvhView<'a>,
}

impl<'a> Intersector<'a> {
    pub fn new(
        spheres: &'a [Sphere],
        planes: &'a [Plane],
        cuboids: &'a [Cuboid],
        triangles: TrianglesView<'a>,
        bvh: BvhView<'a>,
    ) -> Self {
        Self {
            spheres,
            planes,
            cuboids,
            triangles,
            bvh,
        }
    }

    pub fn spheres(&self) -> &'a [Sphere] {
        self.spheres
    }

    pub fn cuboids(&self) -> &'a [Cuboid] {
        self.cuboids
    }

    /// Returns the nearest hit within ray's range, or [`Hit::none()`].
    pub fn trace_nearest(&self, ray: Ray) -> Hit {
        self.trace_nearest_ex(ray).0
    }

    /// Same as [`Self::trace_nearest()`], but also returns the number of
    /// visited BVH nodes (used by the ray heatmap).
    pub fn trace_nearest_ex(&self, ray: Ray) -> (Hit, u32) {
        if !ray.is_valid() {
            return (Hit::none(), 0);
        }

        let mut hit = Hit::none();

        hit.distance = ray.max_distance();

        let mut idx = 0;

        while idx < self.spheres.len() {
            if self.spheres[idx].hit(ray, &mut hit) {
                hit.object_id = idx as u32;
            }

            idx += 1;
        }

        idx = 0;

        while idx < self.planes.len() {
            if self.planes[idx].hit(ray, &mut hit) {
                hit.object_id = idx as u32;
            }

            idx += 1;
        }

        idx = 0;

        while idx < self.cuboids.len() {
            if self.cuboids[idx].hit(ray, &mut hit) {
                hit.object_id = idx as u32;
            }

            idx += 1;
        }

        let visited = self.bvh.trace(self.triangles, ray, &mut hit);

        if hit.kind == ObjectKind::None || !hit.distance.is_finite() {
            return (Hit::none(), visited);
        }

        (hit, visited)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{vec3, Quat, Vec3};

    use super::*;
    use crate::MaterialId;

    #[test]
    fn nearest_of_many() {
        let spheres = [
            Sphere::new(vec3(0.0, 0.0, 10.0), 1.0, MaterialId::new(0)),
            Sphere::new(vec3(0.0, 0.0, 5.0), 1.0, MaterialId::new(1)),
        ];

        let planes = [Plane::new(-Vec3::Z, -20.0, MaterialId::new(2))];

        let cuboids = [Cuboid::new(
            vec3(0.0, 0.0, 3.0),
            Vec3::splat(0.5),
            Quat::IDENTITY,
            MaterialId::new(3),
        )];

        let intersector = Intersector::new(
            &spheres,
            &planes,
            &cuboids,
            TrianglesView::new(&[]),
            BvhView::new(&[]),
        );

        let hit = intersector.trace_nearest(Ray::new(Vec3::ZERO, Vec3::Z));

        assert_eq!(ObjectKind::Cuboid, hit.kind);
        assert_eq!(3, hit.material_id.get());
        assert_relative_eq!(hit.distance, 2.5);

        let hit = intersector
            .trace_nearest(Ray::new(vec3(0.0, 0.9, 0.0), Vec3::Z));

        assert_eq!(ObjectKind::Sphere, hit.kind);
        assert_eq!(1, hit.object_id);

        let hit = intersector
            .trace_nearest(Ray::new(vec3(5.0, 5.0, 0.0), Vec3::Z));

        assert_eq!(ObjectKind::Plane, hit.kind);
        assert_relative_eq!(hit.distance, 20.0);
    }

    #[test]
    fn range_and_invalid_rays() {
        let spheres =
            [Sphere::new(vec3(0.0, 0.0, 5.0), 1.0, MaterialId::new(0))];

        let intersector = Intersector::new(
            &spheres,
            &[],
            &[],
            TrianglesView::new(&[]),
            BvhView::new(&[]),
        );

        let ray = Ray::new(Vec3::ZERO, Vec3::Z).with_range(0.001, 3.0);

        assert!(intersector.trace_nearest(ray).is_none());

        let ray = Ray::new(Vec3::ZERO, Vec3::NAN);

        assert!(intersector.trace_nearest(ray).is_none());
        assert_eq!(f32::MAX, intersector.trace_nearest(ray).distance);
    }
}
