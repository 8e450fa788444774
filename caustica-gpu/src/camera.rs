use bytemuck::{Pod, Zeroable};
use glam::{vec2, IVec2, Mat4, UVec2, Vec2, Vec3, Vec4, Vec4Swizzles};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::Ray;

#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct Camera {
    pub view: Mat4,
    pub view_proj: Mat4,

    /// View-projection matrix of the previous frame; used for motion vectors.
    pub prev_view_proj: Mat4,

    /// xyz - position
    /// w - vertical field of view (in radians)
    pub origin: Vec4,

    /// xyz - forward vector
    /// w - aperture (radius of the lens; zero disables depth of field)
    pub forward: Vec4,

    /// xyz - right vector
    /// w - focus distance
    pub right: Vec4,

    /// xyz - up vector
    pub up: Vec4,

    /// xy - screen size (in pixels)
    pub screen: Vec4,
}

impl Camera {
    pub fn new(
        position: Vec3,
        forward: Vec3,
        up: Vec3,
        fov_y: f32,
        screen_size: UVec2,
    ) -> Self {
        let forward = forward.normalize();
        let right = forward.cross(up).normalize();
        let up = right.cross(forward);
        let screen = screen_size.as_vec2();

        let view = Mat4::look_to_rh(position, forward, up);

        let proj = Mat4::perspective_rh(
            fov_y,
            screen.x / screen.y.max(1.0),
            0.01,
            10_000.0,
        );

        let view_proj = proj * view;

        Self {
            view,
            view_proj,
            prev_view_proj: view_proj,
            origin: position.extend(fov_y),
            forward: forward.extend(0.0),
            right: right.extend(1.0),
            up: up.extend(0.0),
            screen: screen.extend(0.0).extend(0.0),
        }
    }

    pub fn with_lens(mut self, aperture: f32, focus_distance: f32) -> Self {
        self.forward.w = aperture.max(0.0);
        self.right.w = focus_distance.max(crate::CAUSTICA_EPSILON);
        self
    }

    pub fn with_prev_view_proj(mut self, prev_view_proj: Mat4) -> Self {
        self.prev_view_proj = prev_view_proj;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.origin.xyz()
    }

    pub fn fov_y(&self) -> f32 {
        self.origin.w
    }

    pub fn aperture(&self) -> f32 {
        self.forward.w
    }

    pub fn focus_distance(&self) -> f32 {
        self.right.w
    }

    /// Casts a ray through given (continuous) screen position.
    ///
    /// `lens` is a sample from the unit disk; it's used to jitter the ray's
    /// origin across the aperture, keeping it aimed at the focus plane.
    pub fn ray(&self, screen_pos: Vec2, lens: Vec2) -> Ray {
        let screen_size = self.screen.xy();
        let ndc = screen_pos * 2.0 / screen_size - Vec2::ONE;
        let ndc = vec2(ndc.x, -ndc.y);

        let tan_half_fov = (self.fov_y() * 0.5).tan();
        let aspect = screen_size.x / screen_size.y.max(1.0);

        let forward = self.forward.xyz();
        let right = self.right.xyz();
        let up = self.up.xyz();

        let direction = (forward
            + right * (ndc.x * tan_half_fov * aspect)
            + up * (ndc.y * tan_half_fov))
            .normalize();

        if self.aperture() <= 0.0 {
            return Ray::new(self.position(), direction);
        }

        let focus_point = self.position()
            + direction * (self.focus_distance() / direction.dot(forward));

        let origin = self.position()
            + (right * lens.x + up * lens.y) * self.aperture();

        Ray::new(origin, (focus_point - origin).normalize())
    }

    /// Given a point in world-coordinates, returns it in screen-coordinates.
    pub fn world_to_screen(&self, pos: Vec3) -> Vec2 {
        Self::clip_to_screen(self.view_proj * pos.extend(1.0), self.screen)
    }

    /// Same as [`Self::world_to_screen()`], but for the previous frame.
    pub fn prev_world_to_screen(&self, pos: Vec3) -> Vec2 {
        Self::clip_to_screen(self.prev_view_proj * pos.extend(1.0), self.screen)
    }

    fn clip_to_screen(pos: Vec4, screen: Vec4) -> Vec2 {
        let ndc = pos.xy() / pos.w;
        let ndc = vec2(ndc.x, -ndc.y);

        (0.5 * ndc + 0.5) * screen.xy()
    }

    /// Returns positive linear depth of given point, as seen by the camera.
    pub fn view_depth(&self, pos: Vec3) -> f32 {
        (pos - self.position()).dot(self.forward.xyz())
    }

    /// Transforms given world-space normal into view-space.
    pub fn view_normal(&self, normal: Vec3) -> Vec3 {
        self.view.transform_vector3(normal).normalize_or_zero()
    }

    /// Given a point in screen-coordinates, returns a unique index for it; used
    /// to index screen-space structures.
    pub fn screen_to_idx(&self, pos: UVec2) -> usize {
        (pos.y * (self.screen.x as u32) + pos.x) as usize
    }

    pub fn screen_size(&self) -> UVec2 {
        self.screen.xy().as_uvec2()
    }

    /// Returns whether given point lays inside the screen.
    pub fn contains(&self, pos: IVec2) -> bool {
        let screen_size = self.screen.xy().as_ivec2();

        pos.x >= 0
            && pos.y >= 0
            && pos.x < screen_size.x
            && pos.y < screen_size.y
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{uvec2, vec3};

    use super::*;

    fn camera() -> Camera {
        Camera::new(
            vec3(0.0, 1.0, 5.0),
            -Vec3::Z,
            Vec3::Y,
            60f32.to_radians(),
            uvec2(64, 32),
        )
    }

    #[test]
    fn center_ray_looks_forward() {
        let ray = camera().ray(vec2(32.0, 16.0), Vec2::ZERO);

        assert_relative_eq!(ray.direction().x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(ray.direction().y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(ray.direction().z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn ray_and_projection_agree() {
        let camera = camera();
        let screen_pos = vec2(10.0, 5.0);
        let point = camera.ray(screen_pos, Vec2::ZERO).at(7.0);
        let projected = camera.world_to_screen(point);

        assert_relative_eq!(projected.x, screen_pos.x, epsilon = 1e-2);
        assert_relative_eq!(projected.y, screen_pos.y, epsilon = 1e-2);
    }

    #[test]
    fn lens_rays_converge_on_focus_plane() {
        let camera = camera().with_lens(0.2, 4.0);
        let screen_pos = vec2(20.0, 20.0);

        let a = camera.ray(screen_pos, vec2(1.0, 0.0));
        let b = camera.ray(screen_pos, vec2(0.0, -1.0));

        let a = a.at(4.0 / a.direction().dot(-Vec3::Z));
        let b = b.at(4.0 / b.direction().dot(-Vec3::Z));

        assert_relative_eq!(a.x, b.x, epsilon = 1e-4);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-4);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-4);
    }

    #[test]
    fn static_camera_has_no_motion() {
        let camera = camera();
        let point = vec3(0.3, 0.7, -2.0);

        assert_eq!(
            Vec2::ZERO,
            camera.prev_world_to_screen(point) - camera.world_to_screen(point)
        );
    }

    #[test]
    fn view_depth() {
        assert_relative_eq!(camera().view_depth(vec3(3.0, 2.0, 0.0)), 5.0);
    }
}
