//! Damped orbit controls.
//!
//! The camera orbits `target` on a sphere. Input accumulates pending deltas
//! (rotation, pan, zoom scale); [`OrbitControls::update`] applies them to the
//! camera once per frame. With damping enabled only `damping_factor` of the
//! pending rotation and pan is applied per frame and the remainder decays by
//! `1 - damping_factor`, so the camera eases toward the commanded pose.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Point3, Vector3, Zero};
use log::debug;
use winit::event::MouseButton;

use super::perspective_camera::PerspectiveCamera;

const EPS: f32 = 1e-6;

/// Closest the camera may get to its target unless configured otherwise
pub const DEFAULT_MIN_DISTANCE: f32 = 1.1;

/// What a drag currently does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Rotate,
    Pan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging(DragKind),
}

/// Spherical coordinates around +Y: `theta` is the azimuth measured from +Z
/// toward +X, `phi` the polar angle from +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vector3<f32>) -> Self {
        let radius = offset.magnitude();
        if radius < EPS {
            return Self {
                radius: 0.0,
                theta: 0.0,
                phi: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(self) -> Vector3<f32> {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vector3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    /// Keeps phi strictly inside (0, PI) so the look-at basis never degenerates.
    fn make_safe(&mut self) {
        self.phi = self.phi.clamp(EPS, PI - EPS);
    }
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Point3<f32>,

    pub enable_rotate: bool,
    pub enable_pan: bool,
    pub enable_zoom: bool,
    pub enable_damping: bool,
    pub damping_factor: f32,

    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,

    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    state: InteractionState,
    viewport_height: f32,
    rotate_delta: (f32, f32),
    pan_offset: Vector3<f32>,
    scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(Point3::new(0.0, 0.0, 0.0))
    }
}

impl OrbitControls {
    pub fn new(target: Point3<f32>) -> Self {
        Self {
            target,
            enable_rotate: true,
            enable_pan: true,
            enable_zoom: true,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: DEFAULT_MIN_DISTANCE,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            state: InteractionState::Idle,
            viewport_height: 1.0,
            rotate_delta: (0.0, 0.0),
            pan_offset: Vector3::zero(),
            scale: 1.0,
        }
    }

    /// Builder pattern: enable damping with the given factor
    pub fn with_damping(mut self, damping_factor: f32) -> Self {
        self.enable_damping = true;
        self.damping_factor = damping_factor;
        self
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Pointer deltas are scaled against the viewport height.
    pub fn set_viewport(&mut self, _width: u32, height: u32) {
        if height > 0 {
            self.viewport_height = height as f32;
        }
    }

    /// Pending azimuth and polar deltas that `update` has not applied yet
    pub fn pending_rotation(&self) -> (f32, f32) {
        self.rotate_delta
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.rotate_delta.0 -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.rotate_delta.1 -= angle;
    }

    /// Moves the target (and camera) in the view plane by a screen-space delta
    /// in pixels.
    pub fn pan(&mut self, delta_x: f32, delta_y: f32, camera: &PerspectiveCamera) {
        let offset = camera.position - camera.target;
        let forward = -offset.normalize();
        let right = forward.cross(camera.up).normalize();
        let up = right.cross(forward);

        // Distance the frustum spans vertically at the target plane
        let half_fov = (camera.fov_degrees.to_radians() / 2.0).tan();
        let target_distance = offset.magnitude() * half_fov;
        let pixels_to_world = 2.0 * target_distance / self.viewport_height;

        self.pan_offset += right * (-delta_x * pixels_to_world * self.pan_speed);
        self.pan_offset += up * (delta_y * pixels_to_world * self.pan_speed);
    }

    /// Scales the orbit radius; `factor > 1` moves the camera closer.
    pub fn dolly_in(&mut self, factor: f32) {
        self.scale /= factor;
    }

    /// `factor > 1` moves the camera away from the target.
    pub fn dolly_out(&mut self, factor: f32) {
        self.scale *= factor;
    }

    fn zoom_scale(&self) -> f32 {
        0.95f32.powf(self.zoom_speed)
    }

    pub fn pointer_down(&mut self, button: MouseButton, shift_held: bool) {
        let kind = match button {
            MouseButton::Left if shift_held => DragKind::Pan,
            MouseButton::Left => DragKind::Rotate,
            MouseButton::Right | MouseButton::Middle => DragKind::Pan,
            _ => return,
        };
        let allowed = match kind {
            DragKind::Rotate => self.enable_rotate,
            DragKind::Pan => self.enable_pan,
        };
        if allowed {
            self.state = InteractionState::Dragging(kind);
            debug!("orbit controls: {:?}", self.state);
        }
    }

    /// Relative pointer motion in pixels; ignored unless dragging.
    pub fn pointer_motion(&mut self, delta_x: f32, delta_y: f32, camera: &PerspectiveCamera) {
        match self.state {
            InteractionState::Idle => {}
            InteractionState::Dragging(DragKind::Rotate) => {
                let angle_per_pixel = 2.0 * PI * self.rotate_speed / self.viewport_height;
                self.rotate_left(delta_x * angle_per_pixel);
                self.rotate_up(delta_y * angle_per_pixel);
            }
            InteractionState::Dragging(DragKind::Pan) => self.pan(delta_x, delta_y, camera),
        }
    }

    pub fn pointer_up(&mut self) {
        if self.state != InteractionState::Idle {
            self.state = InteractionState::Idle;
            debug!("orbit controls: {:?}", self.state);
        }
    }

    /// Wheel input in lines; positive scrolls away from the user (zoom in).
    pub fn wheel(&mut self, lines: f32) {
        if !self.enable_zoom || lines == 0.0 {
            return;
        }
        let step = self.zoom_scale().powf(lines.abs()).recip();
        if lines > 0.0 {
            self.dolly_in(step);
        } else {
            self.dolly_out(step);
        }
    }

    /// Applies pending input to the camera. Returns true when the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let before = camera.position;
        let mut spherical = Spherical::from_offset(camera.position - self.target);

        let (d_theta, d_phi) = self.rotate_delta;
        if self.enable_damping {
            spherical.theta += d_theta * self.damping_factor;
            spherical.phi += d_phi * self.damping_factor;
        } else {
            spherical.theta += d_theta;
            spherical.phi += d_phi;
        }

        spherical.phi = spherical.phi.clamp(self.min_polar_angle, self.max_polar_angle);
        spherical.make_safe();
        spherical.radius =
            (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        if self.enable_damping {
            self.target += self.pan_offset * self.damping_factor;
        } else {
            self.target += self.pan_offset;
        }

        camera.position = self.target + spherical.to_offset();
        camera.look_at(self.target);

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.rotate_delta = (d_theta * decay, d_phi * decay);
            self.pan_offset *= decay;
        } else {
            self.rotate_delta = (0.0, 0.0);
            self.pan_offset = Vector3::zero();
        }
        self.scale = 1.0;

        (camera.position - before).magnitude2() > EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::default()
    }

    #[test]
    fn spherical_round_trip() {
        let offset = Vector3::new(1.0, 2.0, -3.0);
        let back = Spherical::from_offset(offset).to_offset();
        assert_relative_eq!(back.x, offset.x, epsilon = 1e-5);
        assert_relative_eq!(back.y, offset.y, epsilon = 1e-5);
        assert_relative_eq!(back.z, offset.z, epsilon = 1e-5);
    }

    #[test]
    fn idle_update_does_not_move_camera() {
        let mut controls = OrbitControls::default().with_damping(0.05);
        let mut cam = camera();
        assert!(!controls.update(&mut cam));
        assert_relative_eq!(cam.position.z, 8.0, epsilon = 1e-5);
    }

    #[test]
    fn undamped_rotation_applies_at_once() {
        let mut controls = OrbitControls::default();
        let mut cam = camera();
        controls.rotate_left(-PI / 2.0);
        assert!(controls.update(&mut cam));
        assert_relative_eq!(cam.position.x, 8.0, epsilon = 1e-4);
        assert_relative_eq!(cam.position.z, 0.0, epsilon = 1e-4);
        assert_eq!(controls.pending_rotation(), (0.0, 0.0));
    }

    #[test]
    fn damping_applies_a_fraction_and_decays() {
        let mut controls = OrbitControls::default().with_damping(0.05);
        let mut cam = camera();
        controls.rotate_left(-1.0);
        controls.update(&mut cam);

        let theta = Spherical::from_offset(cam.position - controls.target).theta;
        assert_relative_eq!(theta, 0.05, epsilon = 1e-5);
        assert_relative_eq!(controls.pending_rotation().0, 0.95, epsilon = 1e-6);
    }

    #[test]
    fn polar_angle_is_clamped() {
        let mut controls = OrbitControls::default();
        let mut cam = camera();
        controls.rotate_up(10.0);
        controls.update(&mut cam);
        let phi = Spherical::from_offset(cam.position - controls.target).phi;
        assert!(phi < 1e-3);
        assert!(cam.position.y > 7.99);
    }

    #[test]
    fn wheel_zooms_only_when_enabled() {
        let mut controls = OrbitControls::default();
        let mut cam = camera();
        controls.wheel(1.0);
        controls.update(&mut cam);
        assert!(cam.distance() < 8.0);

        let mut locked = OrbitControls {
            enable_zoom: false,
            ..OrbitControls::default()
        };
        let mut cam = camera();
        locked.wheel(1.0);
        assert!(!locked.update(&mut cam));
        assert_relative_eq!(cam.distance(), 8.0, epsilon = 1e-5);
    }

    #[test]
    fn distance_limits_hold() {
        let mut controls = OrbitControls {
            min_distance: 5.0,
            ..OrbitControls::default()
        };
        let mut cam = camera();
        controls.dolly_in(100.0);
        controls.update(&mut cam);
        assert_relative_eq!(cam.distance(), 5.0, epsilon = 1e-4);
    }

    #[test]
    fn zooming_in_stops_short_of_the_target_and_recovers() {
        let mut controls = OrbitControls::default();
        let mut cam = camera();
        for _ in 0..400 {
            controls.wheel(1.0);
            controls.update(&mut cam);
        }
        assert_relative_eq!(cam.distance(), DEFAULT_MIN_DISTANCE, epsilon = 1e-4);
        let view_proj = cam.uniform().view_proj;
        assert!(view_proj.iter().flatten().all(|v| v.is_finite()));

        for _ in 0..400 {
            controls.wheel(-1.0);
            controls.update(&mut cam);
        }
        assert!(cam.distance() > 8.0);
    }

    #[test]
    fn pan_moves_target_and_camera_together() {
        let mut controls = OrbitControls::default();
        controls.set_viewport(800, 600);
        let mut cam = camera();
        controls.pan(-100.0, 0.0, &cam);
        controls.update(&mut cam);
        assert!(controls.target.x > 0.0);
        assert_relative_eq!(cam.position.x, controls.target.x, epsilon = 1e-5);
        assert_relative_eq!(cam.distance(), 8.0, epsilon = 1e-4);
    }

    #[test]
    fn drag_state_transitions() {
        let mut controls = OrbitControls::default();
        assert_eq!(controls.state(), InteractionState::Idle);

        controls.pointer_down(MouseButton::Left, false);
        assert_eq!(controls.state(), InteractionState::Dragging(DragKind::Rotate));
        controls.pointer_up();
        assert_eq!(controls.state(), InteractionState::Idle);

        controls.pointer_down(MouseButton::Left, true);
        assert_eq!(controls.state(), InteractionState::Dragging(DragKind::Pan));
        controls.pointer_up();

        controls.pointer_down(MouseButton::Right, false);
        assert_eq!(controls.state(), InteractionState::Dragging(DragKind::Pan));
        controls.pointer_up();

        controls.enable_pan = false;
        controls.pointer_down(MouseButton::Right, false);
        assert_eq!(controls.state(), InteractionState::Idle);
    }

    #[test]
    fn motion_is_ignored_while_idle() {
        let mut controls = OrbitControls::default();
        let cam = camera();
        controls.pointer_motion(50.0, 50.0, &cam);
        assert_eq!(controls.pending_rotation(), (0.0, 0.0));

        controls.pointer_down(MouseButton::Left, false);
        controls.pointer_motion(50.0, 0.0, &cam);
        assert!(controls.pending_rotation().0 < 0.0);
    }
}
