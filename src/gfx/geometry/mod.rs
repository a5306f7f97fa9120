//! # Procedural Geometry
//!
//! Shape descriptors for the three primitives the room is built from, and
//! their tessellation into GPU-ready triangle lists.
//!
//! ## Supported Primitives
//!
//! - **Box**: axis-aligned box with independent width/height/depth
//! - **Cylinder**: Y-axis cylinder (or truncated cone) with separate top and bottom radii
//! - **Sphere**: UV sphere with configurable resolution
//!
//! ## Usage
//!
//! ```rust
//! use roomview::gfx::geometry::Geometry;
//!
//! let table_top = Geometry::cuboid(2.5, 0.2, 5.0).unwrap();
//! let data = table_top.tessellate();
//! assert_eq!(data.triangle_count(), 12);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::error::{Result, RoomError};
use crate::gfx::rendering::vertex::Vertex3D;

/// Radial segments used when a cylinder is described without an explicit count
pub const DEFAULT_RADIAL_SEGMENTS: u32 = 32;

/// Immutable shape descriptor for a mesh.
///
/// Dimensions are validated on construction; once built a descriptor never
/// changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
}

impl Geometry {
    /// Box centred on the origin. Named `cuboid` because `box` is reserved.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Result<Self> {
        positive("box width", width)?;
        positive("box height", height)?;
        positive("box depth", depth)?;
        Ok(Geometry::Box {
            width,
            height,
            depth,
        })
    }

    /// Cylinder along +Y with the default number of radial segments.
    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32) -> Result<Self> {
        Self::cylinder_with_segments(radius_top, radius_bottom, height, DEFAULT_RADIAL_SEGMENTS)
    }

    pub fn cylinder_with_segments(
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    ) -> Result<Self> {
        non_negative("cylinder top radius", radius_top)?;
        non_negative("cylinder bottom radius", radius_bottom)?;
        if radius_top == 0.0 && radius_bottom == 0.0 {
            return Err(RoomError::InvalidGeometry(
                "cylinder needs at least one non-zero radius".to_string(),
            ));
        }
        positive("cylinder height", height)?;
        if radial_segments < 3 {
            return Err(RoomError::InvalidGeometry(format!(
                "cylinder needs at least 3 radial segments, got {radial_segments}"
            )));
        }
        Ok(Geometry::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
        })
    }

    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Result<Self> {
        positive("sphere radius", radius)?;
        if width_segments < 3 || height_segments < 2 {
            return Err(RoomError::InvalidGeometry(format!(
                "sphere needs at least 3x2 segments, got {width_segments}x{height_segments}"
            )));
        }
        Ok(Geometry::Sphere {
            radius,
            width_segments,
            height_segments,
        })
    }

    /// Generates the triangle list for this shape.
    pub fn tessellate(&self) -> GeometryData {
        match *self {
            Geometry::Box {
                width,
                height,
                depth,
            } => generate_box(width, height, depth),
            Geometry::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => generate_cylinder(radius_top, radius_bottom, height, radial_segments),
            Geometry::Sphere {
                radius,
                width_segments,
                height_segments,
            } => generate_sphere(radius, width_segments, height_segments),
        }
    }

    /// Half extents of the shape's local bounding box.
    pub fn half_extents(&self) -> [f32; 3] {
        match *self {
            Geometry::Box {
                width,
                height,
                depth,
            } => [width * 0.5, height * 0.5, depth * 0.5],
            Geometry::Cylinder {
                radius_top,
                radius_bottom,
                height,
                ..
            } => {
                let r = radius_top.max(radius_bottom);
                [r, height * 0.5, r]
            }
            Geometry::Sphere { radius, .. } => [radius; 3],
        }
    }
}

fn positive(what: &str, value: f32) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(RoomError::InvalidGeometry(format!(
            "{what} must be positive, got {value}"
        )))
    }
}

fn non_negative(what: &str, value: f32) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(RoomError::InvalidGeometry(format!(
            "{what} must be non-negative, got {value}"
        )))
    }
}

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves positions and normals into the renderer's vertex format
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect()
    }
}
