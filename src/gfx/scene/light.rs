//! Light sources.
//!
//! Lights are scene nodes like meshes; a point light takes its position from
//! the node transform.

use crate::gfx::resources::material::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: Color,
    pub intensity: f32,
    /// Range after which the light contributes nothing
    pub distance: f32,
    pub cast_shadow: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Uniform light from every direction
    Ambient { color: Color, intensity: f32 },
    /// Sky color from above blended with ground color from below
    Hemisphere {
        sky: Color,
        ground: Color,
        intensity: f32,
    },
    Point(PointLight),
}

impl Light {
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Light::Ambient {
            color,
            intensity,
        }
    }

    pub fn hemisphere(sky: Color, ground: Color, intensity: f32) -> Self {
        Light::Hemisphere {
            sky,
            ground,
            intensity,
        }
    }

    pub fn point(color: Color, intensity: f32, distance: f32) -> Self {
        Light::Point(PointLight {
            color,
            intensity,
            distance,
            cast_shadow: false,
        })
    }

    /// Builder pattern: toggle shadow casting; a no-op for non-point lights
    pub fn casting_shadow(mut self, cast: bool) -> Self {
        if let Light::Point(ref mut point) = self {
            point.cast_shadow = cast;
        }
        self
    }

    pub fn casts_shadow(&self) -> bool {
        matches!(self, Light::Point(PointLight { cast_shadow: true, .. }))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Light::Ambient { .. } => "ambient",
            Light::Hemisphere { .. } => "hemisphere",
            Light::Point(_) => "point",
        }
    }
}
