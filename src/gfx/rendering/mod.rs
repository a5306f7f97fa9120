//! Core rendering functionality
//!
//! Pipelines, per-mesh GPU resources and the frame renderer.

pub mod gpu_mesh;
pub mod pipeline_manager;
pub mod render_engine;
pub mod vertex;

pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::{RenderEngine, RenderSettings};
pub use vertex::Vertex3D;
