use glam::Vec3;

#[derive(Copy, Clone, Default)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    inv_direction: Vec3,
    min_distance: f32,
    max_distance: f32,
}

impl Ray {
    /// Default lower bound of the ray's parametric range; skips hits that are
    /// too close to the origin to be trusted.
    pub const MIN_DISTANCE: f32 = 0.0001;

    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        // Axis-parallel directions would produce `0 * inf = NaN` in the slab
        // tests, so the components are kept away from zero
        let safe_direction = Vec3::select(
            direction.abs().cmplt(Vec3::splat(1.0e-20)),
            Vec3::splat(1.0e-20).copysign(direction),
            direction,
        );

        Self {
            origin,
            direction,
            inv_direction: 1.0 / safe_direction,
            min_distance: Self::MIN_DISTANCE,
            max_distance: f32::MAX,
        }
    }

    pub fn with_range(mut self, min_distance: f32, max_distance: f32) -> Self {
        self.min_distance = min_distance;
        self.max_distance = max_distance;
        self
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Returns whether this ray can be traced at all; rays produced out of
    /// numeric faults (NaNs, zero-length directions) are not.
    pub fn is_valid(&self) -> bool {
        self.origin.is_finite()
            && self.direction.is_finite()
            && self.direction.length_squared() > 0.5
            && self.min_distance < self.max_distance
    }

    /// Returns distance to given bounding box or `f32::MAX` if the ray misses
    /// it.
    pub fn distance_to_aabb(&self, aabb_min: Vec3, aabb_max: Vec3) -> f32 {
        let hit_min = (aabb_min - self.origin) * self.inv_direction;
        let hit_max = (aabb_max - self.origin) * self.inv_direction;

        let tmin = hit_min.min(hit_max).max_element();
        let tmax = hit_min.max(hit_max).min_element();

        if tmax >= tmin && tmax >= 0.0 {
            tmin
        } else {
            f32::MAX
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn distance_to_aabb() {
        let ray = Ray::new(vec3(0.0, 0.0, -5.0), Vec3::Z);

        assert_eq!(4.0, ray.distance_to_aabb(-Vec3::ONE, Vec3::ONE));

        assert_eq!(
            f32::MAX,
            ray.distance_to_aabb(vec3(2.0, 2.0, -1.0), vec3(3.0, 3.0, 1.0))
        );
    }

    #[test]
    fn invalid_rays() {
        assert!(!Ray::new(Vec3::ZERO, Vec3::ZERO).is_valid());
        assert!(!Ray::new(Vec3::NAN, Vec3::X).is_valid());
        assert!(!Ray::new(Vec3::ZERO, Vec3::X).with_range(1.0, 1.0).is_valid());
        assert!(Ray::new(Vec3::ZERO, Vec3::X).is_valid());
    }
}
