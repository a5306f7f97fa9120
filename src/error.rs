//! Error types for roomview.

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for the viewer.
#[derive(Error, Debug)]
pub enum RoomError {
    /// Configuration loading or validation failed
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// A material was described with out-of-range values
    #[error("invalid material: {0}")]
    InvalidMaterial(String),

    /// A geometry descriptor had non-positive dimensions or too few segments
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Adapter, device or surface creation failed
    #[error("gpu error: {0}")]
    Gpu(String),

    /// Acquiring the next surface texture failed
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    /// Event loop creation or execution failed
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Window creation failed
    #[error("window error: {0}")]
    Window(#[from] winit::error::OsError),
}

/// Result type alias using [`RoomError`].
pub type Result<T> = std::result::Result<T, RoomError>;
