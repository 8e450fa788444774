use glam::Vec3;

use crate::Ray;

/// Single pending segment of a light path.
#[derive(Clone, Copy, Default)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct PathState {
    pub origin: Vec3,
    pub direction: Vec3,

    /// Fraction of radiance found along this segment that reaches the camera.
    pub throughput: Vec3,

    /// Absorption coefficient of the medium this segment travels through.
    pub absorption: Vec3,

    pub depth: u32,
    pub flags: PathFlags,
    pub kind: PathKind,

    /// Multiplier applied to sky radiance when this path escapes.
    pub sky_boost: f32,
}

impl PathState {
    pub fn primary(ray: Ray, sky_boost: f32) -> Self {
        Self {
            origin: ray.origin(),
            direction: ray.direction(),
            throughput: Vec3::ONE,
            absorption: Vec3::ZERO,
            depth: 0,
            flags: PathFlags::default(),
            kind: PathKind::Radiance,
            sky_boost,
        }
    }

    pub fn ray(&self) -> Ray {
        Ray::new(self.origin, self.direction)
    }

    /// Returns the strongest component of throughput; used to decide which
    /// paths are worth following.
    pub fn strength(&self) -> f32 {
        self.throughput.max_element()
    }

    pub fn is_specular(&self) -> bool {
        self.flags.contains(PathFlags::SPECULAR)
    }

    pub fn is_inside_medium(&self) -> bool {
        self.flags.contains(PathFlags::INSIDE_MEDIUM)
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct PathFlags(u32);

impl PathFlags {
    /// Segment travels through the interior of a transmissive object.
    pub const INSIDE_MEDIUM: Self = Self(1);

    /// Segment was spawned by a specular event (mirror reflection or
    /// refraction).
    pub const SPECULAR: Self = Self(2);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn with(self, other: Self, enabled: bool) -> Self {
        if enabled {
            Self(self.0 | other.0)
        } else {
            Self(self.0 & !other.0)
        }
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub enum PathKind {
    #[default]
    Radiance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        let flags = PathFlags::default()
            .with(PathFlags::SPECULAR, true)
            .with(PathFlags::INSIDE_MEDIUM, true);

        assert!(flags.contains(PathFlags::SPECULAR));
        assert!(flags.contains(PathFlags::INSIDE_MEDIUM));

        let flags = flags.with(PathFlags::INSIDE_MEDIUM, false);

        assert!(flags.contains(PathFlags::SPECULAR));
        assert!(!flags.contains(PathFlags::INSIDE_MEDIUM));
    }
}
