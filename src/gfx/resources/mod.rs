//! GPU resource management
//!
//! Materials, depth textures and the global uniform block.

pub mod global_bindings;
pub mod material;
pub mod texture_resource;

pub use global_bindings::{GlobalBindings, GlobalUBO, GlobalUniform};
pub use material::{Color, Material, MaterialKind, ShadowFlags};
pub use texture_resource::TextureResource;
