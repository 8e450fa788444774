use std::ops::{Add, AddAssign};

use glam::Vec3;

/// Axis-aligned bounding box; the default one is empty and absorbs whatever
/// gets added to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    min: Vec3,
    max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points.into_iter().fold(Self::default(), Add::add)
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.max
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        (self.max - self.min).max(Vec3::ZERO)
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    /// Returns half of the box's surface area; that's the quantity compared
    /// by the surface area heuristic.
    pub fn half_area(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }

        let extent = self.extent();

        extent.x * extent.y + extent.y * extent.z + extent.z * extent.x
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(Vec3::MAX, Vec3::MIN)
    }
}

impl Add<Vec3> for BoundingBox {
    type Output = Self;

    fn add(mut self, rhs: Vec3) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign<Vec3> for BoundingBox {
    fn add_assign(&mut self, rhs: Vec3) {
        self.min = self.min.min(rhs);
        self.max = self.max.max(rhs);
    }
}

impl Add<BoundingBox> for BoundingBox {
    type Output = Self;

    fn add(mut self, rhs: BoundingBox) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign<BoundingBox> for BoundingBox {
    fn add_assign(&mut self, rhs: BoundingBox) {
        if !rhs.is_empty() {
            *self += rhs.min;
            *self += rhs.max;
        }
    }
}
