use cgmath::{perspective, Deg, InnerSpace, Matrix4, Point3, Vector3};

use super::camera_utils::{Camera, CameraUniform, OPENGL_TO_WGPU_MATRIX};

/// Perspective camera looking at a target point, +Y up.
///
/// `aspect` is the only field the resize path touches; the pose belongs to
/// whoever drives the camera (nothing, or [`OrbitControls`](super::OrbitControls)).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl PerspectiveCamera {
    /// Camera at `position` looking down -Z at the origin.
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32, position: Point3<f32>) -> Self {
        Self {
            fov_degrees,
            aspect,
            near,
            far,
            position,
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::unit_y(),
        }
    }

    pub fn look_at(&mut self, target: Point3<f32>) {
        self.target = target;
    }

    /// Sets the aspect from a viewport size; zero-sized viewports are ignored.
    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(Deg(self.fov_degrees), self.aspect, self.near, self.far)
    }

    /// Distance from the eye to the look-at target
    pub fn distance(&self) -> f32 {
        (self.position - self.target).magnitude()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_position: self.position.to_homogeneous().into(),
            view_proj: self.build_view_projection_matrix().into(),
        }
    }
}

impl Camera for PerspectiveCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(75.0, 1.0, 0.1, 5000.0, Point3::new(0.0, 0.0, 8.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::{Transform, Vector4};

    #[test]
    fn resize_sets_aspect() {
        let mut camera = PerspectiveCamera::default();
        camera.resize_projection(1600, 900);
        assert_relative_eq!(camera.aspect, 1600.0 / 900.0);
    }

    #[test]
    fn zero_sized_resize_keeps_aspect() {
        let mut camera = PerspectiveCamera::default();
        camera.resize_projection(800, 400);
        camera.resize_projection(0, 400);
        camera.resize_projection(800, 0);
        assert_relative_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn target_projects_to_screen_centre() {
        let camera = PerspectiveCamera::default();
        let clip = camera.build_view_projection_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-6);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-6);
        let depth = clip.z / clip.w;
        assert!((0.0..=1.0).contains(&depth));
    }

    #[test]
    fn points_behind_near_plane_fall_outside_depth_range() {
        let camera = PerspectiveCamera::default();
        let p = camera
            .build_view_projection_matrix()
            .transform_point(Point3::new(0.0, 0.0, 7.95));
        assert!(p.z < 0.0);
    }

    #[test]
    fn off_axis_points_match_the_opengl_projection() {
        let camera = PerspectiveCamera::default();
        let opengl = perspective(Deg(camera.fov_degrees), camera.aspect, camera.near, camera.far)
            * camera.view_matrix();
        let wgpu = camera.build_view_projection_matrix();

        for point in [
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(-2.0, 1.5, -3.0),
            Point3::new(0.5, -0.7, 4.0),
        ] {
            let expected = opengl.transform_point(point);
            let actual = wgpu.transform_point(point);
            assert_relative_eq!(actual.x, expected.x, epsilon = 1e-5);
            assert_relative_eq!(actual.y, expected.y, epsilon = 1e-5);
            assert_relative_eq!(actual.z, expected.z * 0.5 + 0.5, epsilon = 1e-5);
        }
    }

    #[test]
    fn target_depth_is_near_the_far_end() {
        let camera = PerspectiveCamera::default();
        let ndc = camera
            .build_view_projection_matrix()
            .transform_point(Point3::new(0.0, 0.0, 0.0));
        assert!(ndc.z > 0.98 && ndc.z < 1.0, "depth {}", ndc.z);
    }

    #[test]
    fn uniform_carries_eye_position() {
        let camera = PerspectiveCamera::default();
        assert_eq!(camera.uniform().view_position, [0.0, 0.0, 8.0, 1.0]);
        assert_relative_eq!(camera.distance(), 8.0);
    }
}
