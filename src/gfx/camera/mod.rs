//! Perspective camera and the orbit controls that drive it.

pub mod camera_utils;
pub mod orbit_controls;
pub mod perspective_camera;

pub use camera_utils::{Camera, CameraUniform};
pub use orbit_controls::{DragKind, InteractionState, OrbitControls, Spherical};
pub use perspective_camera::PerspectiveCamera;
