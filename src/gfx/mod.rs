//! # Graphics Module
//!
//! Everything between the scene description and the GPU:
//!
//! - **Camera** ([`camera`]) - perspective camera and damped orbit controls
//! - **Geometry** ([`geometry`]) - box, cylinder and sphere descriptors and their tessellation
//! - **Scene** ([`scene`]) - append-only scene graph of meshes and lights
//! - **Resources** ([`resources`]) - materials, depth textures, global uniforms
//! - **Rendering** ([`rendering`]) - pipelines and the forward renderer with shadow mapping

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

pub use camera::{OrbitControls, PerspectiveCamera};
pub use rendering::RenderEngine;
