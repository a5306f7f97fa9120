//! Per-frame driving of the scene.
//!
//! [`SceneContext`] owns everything a frame needs (scene, camera, optional
//! orbit controls, viewport size). The host loop calls
//! [`SceneContext::frame_tick`] once per frame and [`SceneContext::resize`]
//! whenever the window changes size; the GPU side sits behind the
//! [`FrameRenderer`] trait.

use cgmath::Point3;
use log::{debug, info};

use crate::{
    config::{AppConfig, CameraMode},
    error::Result,
    gfx::{
        camera::{OrbitControls, PerspectiveCamera},
        resources::material::Color,
        scene::Scene,
    },
    room::{room_scene, LightbulbAnchor, RoomLayout},
};

/// Something that can draw a scene from a camera and be resized.
pub trait FrameRenderer {
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()>;
    fn resize(&mut self, width: u32, height: u32);
}

pub struct SceneContext {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub controls: Option<OrbitControls>,
    viewport: (u32, u32),
}

impl SceneContext {
    pub fn new(
        scene: Scene,
        camera: PerspectiveCamera,
        controls: Option<OrbitControls>,
        viewport: (u32, u32),
    ) -> Self {
        let mut context = Self {
            scene,
            camera,
            controls,
            viewport: (0, 0),
        };
        context.apply_viewport(viewport.0, viewport.1);
        context
    }

    /// Builds the bedroom scene, camera and (in orbit mode) controls from config.
    pub fn from_config(config: &AppConfig, viewport: (u32, u32)) -> Self {
        let layout = RoomLayout::with_lightbulb(LightbulbAnchor::from(config.room.lightbulb));
        let scene = room_scene(&layout, Color::from_hex(config.render.background));

        let cam = &config.camera;
        let [x, y, z] = cam.position;
        let eye = Point3::new(x, y, z);
        let mut camera = PerspectiveCamera::new(cam.fov_degrees, 1.0, cam.near, cam.far, eye);
        let [tx, ty, tz] = cam.target;
        camera.look_at(Point3::new(tx, ty, tz));

        let controls = match cam.mode {
            CameraMode::Fixed => None,
            CameraMode::Orbit => {
                let mut controls = OrbitControls::new(camera.target);
                controls.enable_damping = cam.enable_damping;
                controls.damping_factor = cam.damping_factor;
                controls.enable_pan = cam.enable_pan;
                controls.enable_zoom = cam.enable_zoom;
                controls.min_distance = cam.min_distance;
                Some(controls)
            }
        };

        let stats = scene.statistics();
        info!(
            "scene ready: {} meshes, {} lights, {} triangles, camera {:?}",
            stats.mesh_count,
            stats.light_count,
            stats.total_triangles,
            cam.mode
        );

        Self::new(scene, camera, controls, viewport)
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Advances the controls (if any), then draws the scene exactly once.
    pub fn frame_tick<R: FrameRenderer>(&mut self, renderer: &mut R) -> Result<()> {
        if let Some(controls) = self.controls.as_mut() {
            controls.update(&mut self.camera);
        }
        renderer.render(&self.scene, &self.camera)
    }

    /// Keeps the camera aspect and the renderer in step with the viewport.
    ///
    /// Zero-sized viewports (a minimised window) are ignored.
    pub fn resize<R: FrameRenderer>(&mut self, width: u32, height: u32, renderer: &mut R) {
        if width == 0 || height == 0 {
            debug!("ignoring zero-sized resize {width}x{height}");
            return;
        }
        self.apply_viewport(width, height);
        renderer.resize(width, height);
    }

    fn apply_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = (width, height);
        self.camera.resize_projection(width, height);
        if let Some(controls) = self.controls.as_mut() {
            controls.set_viewport(width, height);
        }
        debug!("viewport {width}x{height}, aspect {:.3}", self.camera.aspect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct Recorder {
        frames: usize,
        sizes: Vec<(u32, u32)>,
        last_eye: Option<Point3<f32>>,
    }

    impl FrameRenderer for Recorder {
        fn render(&mut self, _scene: &Scene, camera: &PerspectiveCamera) -> Result<()> {
            self.frames += 1;
            self.last_eye = Some(camera.position);
            Ok(())
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.sizes.push((width, height));
        }
    }

    fn context(mode: CameraMode) -> SceneContext {
        let mut config = AppConfig::default();
        config.camera.mode = mode;
        SceneContext::from_config(&config, (1280, 800))
    }

    #[test]
    fn initial_aspect_follows_viewport() {
        let ctx = context(CameraMode::Fixed);
        assert_relative_eq!(ctx.camera.aspect, 1.6);
        assert_eq!(ctx.viewport(), (1280, 800));
    }

    #[test]
    fn each_tick_renders_once() {
        let mut ctx = context(CameraMode::Orbit);
        let mut renderer = Recorder::default();
        ctx.frame_tick(&mut renderer).unwrap();
        ctx.frame_tick(&mut renderer).unwrap();
        assert_eq!(renderer.frames, 2);
    }

    #[test]
    fn fixed_mode_has_no_controls() {
        let ctx = context(CameraMode::Fixed);
        assert!(ctx.controls.is_none());
        let ctx = context(CameraMode::Orbit);
        let controls = ctx.controls.as_ref().unwrap();
        assert!(controls.enable_damping);
        assert_eq!(controls.damping_factor, 0.05);
    }

    #[test]
    fn orbit_controls_follow_camera_config() {
        let mut config = AppConfig::default();
        config.camera.enable_damping = false;
        config.camera.damping_factor = 0.2;
        config.camera.enable_pan = false;
        config.camera.enable_zoom = false;
        config.camera.min_distance = 2.5;
        config.camera.target = [1.0, 0.0, 0.0];

        let ctx = SceneContext::from_config(&config, (800, 600));
        let controls = ctx.controls.as_ref().unwrap();
        assert!(!controls.enable_damping);
        assert_eq!(controls.damping_factor, 0.2);
        assert!(!controls.enable_pan);
        assert!(!controls.enable_zoom);
        assert_eq!(controls.min_distance, 2.5);
        assert_eq!(controls.target, Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn resize_updates_camera_and_renderer() {
        let mut ctx = context(CameraMode::Orbit);
        let mut renderer = Recorder::default();
        ctx.resize(1024, 512, &mut renderer);
        assert_relative_eq!(ctx.camera.aspect, 2.0);
        assert_eq!(renderer.sizes, vec![(1024, 512)]);
        assert_eq!(renderer.frames, 0);
    }

    #[test]
    fn zero_sized_resize_is_ignored() {
        let mut ctx = context(CameraMode::Orbit);
        let mut renderer = Recorder::default();
        ctx.resize(0, 0, &mut renderer);
        assert!(renderer.sizes.is_empty());
        assert_relative_eq!(ctx.camera.aspect, 1.6);
    }
}
