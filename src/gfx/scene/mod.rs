//! # Scene Graph
//!
//! A retained, append-only scene graph: a [`Scene`] root holding
//! [`SceneNode`]s, each either a mesh (geometry + material) or a light.
//!
//! ```rust
//! use roomview::gfx::geometry::Geometry;
//! use roomview::gfx::resources::material::{Color, Material};
//! use roomview::gfx::scene::{Scene, SceneNode, Transform};
//!
//! let mut scene = Scene::new(Color::from_hex(0xB9F3FC));
//! scene.add(SceneNode::mesh(
//!     "floor",
//!     Geometry::cuboid(12.0, 1.0, 10.0).unwrap(),
//!     Material::standard(Color::from_hex(0xDFD3C3)),
//!     Transform::at(0.0, -3.3, 0.0),
//! ));
//! assert_eq!(scene.child_count(), 1);
//! ```

pub mod light;
pub mod node;
pub mod scene;

pub use light::{Light, PointLight};
pub use node::{Mesh, NodePayload, SceneNode, Transform};
pub use scene::{NodeId, Scene, SceneStatistics};
