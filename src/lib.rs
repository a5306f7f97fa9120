//! roomview
//!
//! A static, hand-authored bedroom rendered with wgpu: an append-only scene
//! graph of box, cylinder and sphere meshes, a small lighting rig with one
//! shadow-casting point light, and optional damped orbit camera controls.
//!
//! The library half builds and drives the scene; [`RoomApp`] wraps it in a
//! winit window.

pub mod app;
pub mod config;
pub mod driver;
pub mod error;
pub mod gfx;
pub mod room;
pub mod wgpu_utils;

pub use app::RoomApp;
pub use config::{AppConfig, CameraMode};
pub use driver::{FrameRenderer, SceneContext};
pub use error::{Result, RoomError};
