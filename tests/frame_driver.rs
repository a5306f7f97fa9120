use approx::assert_relative_eq;
use cgmath::Point3;
use rand::Rng;

use roomview::gfx::camera::{OrbitControls, PerspectiveCamera, Spherical};
use roomview::gfx::scene::Scene;
use roomview::{AppConfig, CameraMode, FrameRenderer, Result, SceneContext};

#[derive(Default)]
struct Headless {
    frames: usize,
    size: Option<(u32, u32)>,
    eyes: Vec<Point3<f32>>,
}

impl FrameRenderer for Headless {
    fn render(&mut self, _scene: &Scene, camera: &PerspectiveCamera) -> Result<()> {
        self.frames += 1;
        self.eyes.push(camera.position);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
    }
}

fn orbit_context() -> SceneContext {
    SceneContext::from_config(&AppConfig::default(), (1280, 720))
}

#[test]
fn resize_keeps_scene_and_tracks_aspect() {
    let mut ctx = orbit_context();
    let mut renderer = Headless::default();
    let before: Vec<_> = ctx.scene.nodes().iter().map(|n| n.position()).collect();

    let mut rng = rand::rng();
    for _ in 0..10 {
        let (w, h) = (rng.random_range(1..4000u32), rng.random_range(1..4000u32));
        ctx.resize(w, h, &mut renderer);
        assert_relative_eq!(ctx.camera.aspect, w as f32 / h as f32, epsilon = 1e-5);
        assert_eq!(renderer.size, Some((w, h)));
        assert_eq!(ctx.viewport(), (w, h));
    }

    let after: Vec<_> = ctx.scene.nodes().iter().map(|n| n.position()).collect();
    assert_eq!(before, after);
    assert_eq!(ctx.scene.child_count(), 38);
}

#[test]
fn fixed_camera_never_moves() {
    let mut config = AppConfig::default();
    config.camera.mode = CameraMode::Fixed;
    let mut ctx = SceneContext::from_config(&config, (800, 600));
    let mut renderer = Headless::default();

    for _ in 0..5 {
        ctx.frame_tick(&mut renderer).unwrap();
    }
    assert_eq!(renderer.frames, 5);
    assert!(renderer.eyes.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn idle_orbit_camera_settles() {
    let mut ctx = orbit_context();
    let mut renderer = Headless::default();
    let start = ctx.camera.position;

    for _ in 0..10 {
        ctx.frame_tick(&mut renderer).unwrap();
    }
    let end = ctx.camera.position;
    assert_relative_eq!(end.x, start.x, epsilon = 1e-4);
    assert_relative_eq!(end.y, start.y, epsilon = 1e-4);
    assert_relative_eq!(end.z, start.z, epsilon = 1e-4);
}

#[test]
fn damped_rotation_approaches_commanded_angle_every_tick() {
    let mut camera = PerspectiveCamera::default();
    let mut controls = OrbitControls::new(Point3::new(0.0, 0.0, 0.0)).with_damping(0.05);

    let theta0 = Spherical::from_offset(camera.position - controls.target).theta;
    controls.rotate_left(0.5);
    let goal = theta0 + controls.pending_rotation().0;

    let mut remaining = (goal - theta0).abs();
    for _ in 0..60 {
        controls.update(&mut camera);
        let theta = Spherical::from_offset(camera.position - controls.target).theta;
        let now = (goal - theta).abs();
        assert!(now < remaining, "distance grew from {remaining} to {now}");
        remaining = now;
    }
    assert!(remaining < 0.5 * 0.95_f32.powi(50));
}
