use glam::{Mat4, UVec2, Vec3};

use crate::gpu;

/// Camera looking at the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,

    /// Vertical field of view, in radians.
    pub fov_y: f32,

    /// Radius of the lens; zero disables depth of field.
    pub aperture: f32,

    /// Distance to the plane that stays in focus.
    pub focus_distance: f32,
}

impl Camera {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward,
            ..Default::default()
        }
    }

    /// Creates a camera positioned at `position` and looking at `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self::new(position, target - position)
    }

    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = up;
        self
    }

    pub fn with_fov_y(mut self, fov_y: f32) -> Self {
        self.fov_y = fov_y;
        self
    }

    pub fn with_lens(mut self, aperture: f32, focus_distance: f32) -> Self {
        self.aperture = aperture;
        self.focus_distance = focus_distance;
        self
    }

    pub(crate) fn serialize(
        &self,
        size: UVec2,
        prev_view_proj: Option<Mat4>,
    ) -> gpu::Camera {
        let forward = self.forward.normalize_or_zero();
        let forward = if forward == Vec3::ZERO { -Vec3::Z } else { forward };

        // Looking straight up or down would make the basis degenerate
        let up = if forward.cross(self.up).length_squared() < 1e-6 {
            if forward.y.abs() > 0.9 {
                Vec3::Z
            } else {
                Vec3::Y
            }
        } else {
            self.up
        };

        let camera =
            gpu::Camera::new(self.position, forward, up, self.fov_y, size)
                .with_lens(self.aperture, self.focus_distance);

        match prev_view_proj {
            Some(prev_view_proj) => camera.with_prev_view_proj(prev_view_proj),
            None => camera,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: -Vec3::Z,
            up: Vec3::Y,
            fov_y: 45f32.to_radians(),
            aperture: 0.0,
            focus_distance: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{uvec2, vec3};

    use super::*;

    #[test]
    fn degenerate_up() {
        let camera = Camera::new(vec3(0.0, 10.0, 0.0), -Vec3::Y)
            .serialize(uvec2(16, 16), None);

        assert!(camera.view_proj.is_finite());
        assert_eq!(camera.view_proj, camera.prev_view_proj);
    }

    #[test]
    fn keeps_previous_frame() {
        let prev = Mat4::from_scale(Vec3::splat(2.0));
        let camera = Camera::default().serialize(uvec2(16, 16), Some(prev));

        assert_eq!(prev, camera.prev_view_proj);
    }
}
