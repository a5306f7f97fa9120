//! Material definitions
//!
//! One material per mesh: a 24-bit color, an optional transparency/opacity
//! pair and the mesh's shadow flags. Values are validated when the material
//! is built, so the renderer can trust them.

use crate::error::{Result, RoomError};

/// 24-bit sRGB color, stored as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    pub const WHITE: Color = Color(0xFFFFFF);
    pub const BLACK: Color = Color(0x000000);

    /// Builds a color from a hex literal; bits above the low 24 are dropped.
    pub const fn from_hex(hex: u32) -> Self {
        Color(hex & 0xFF_FFFF)
    }

    pub const fn hex(self) -> u32 {
        self.0
    }

    /// Channels in `[0, 1]`
    pub fn to_rgb(self) -> [f32; 3] {
        [
            ((self.0 >> 16) & 0xFF) as f32 / 255.0,
            ((self.0 >> 8) & 0xFF) as f32 / 255.0,
            (self.0 & 0xFF) as f32 / 255.0,
        ]
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        let [r, g, b] = self.to_rgb();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Color::from_hex(hex)
    }
}

/// Shading model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    /// Lit by every light in the scene
    Standard,
    /// Flat color, ignores lights and shadows
    Basic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShadowFlags {
    pub cast: bool,
    pub receive: bool,
}

impl ShadowFlags {
    pub const NONE: ShadowFlags = ShadowFlags {
        cast: false,
        receive: false,
    };
    pub const BOTH: ShadowFlags = ShadowFlags {
        cast: true,
        receive: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub color: Color,
    transparent: bool,
    opacity: f32,
    pub shadows: ShadowFlags,
}

impl Material {
    /// Lit, opaque material.
    pub fn standard(color: Color) -> Self {
        Self {
            kind: MaterialKind::Standard,
            color,
            transparent: false,
            opacity: 1.0,
            shadows: ShadowFlags::NONE,
        }
    }

    /// Unlit, opaque material.
    pub fn basic(color: Color) -> Self {
        Self {
            kind: MaterialKind::Basic,
            ..Self::standard(color)
        }
    }

    /// Builder pattern: mark as alpha blended with the given opacity
    pub fn transparent(mut self, opacity: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&opacity) {
            return Err(RoomError::InvalidMaterial(format!(
                "opacity must be within [0, 1], got {opacity}"
            )));
        }
        self.transparent = true;
        self.opacity = opacity;
        Ok(self)
    }

    /// Infallible variant of [`Material::transparent`] for literal opacities.
    pub(crate) fn with_opacity(mut self, opacity: f32) -> Self {
        debug_assert!((0.0..=1.0).contains(&opacity));
        self.transparent = true;
        self.opacity = opacity;
        self
    }

    /// Builder pattern: set shadow flags
    pub fn with_shadows(mut self, shadows: ShadowFlags) -> Self {
        self.shadows = shadows;
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// RGBA as consumed by the shader; alpha is only honoured for transparent materials
    pub fn base_color(&self) -> [f32; 4] {
        let [r, g, b] = self.color.to_rgb();
        let alpha = if self.transparent { self.opacity } else { 1.0 };
        [r, g, b, alpha]
    }

    pub(crate) fn uniform(&self) -> MaterialUniform {
        MaterialUniform {
            base_color: self.base_color(),
            unlit: if self.kind == MaterialKind::Basic { 1.0 } else { 0.0 },
            receive_shadow: if self.shadows.receive { 1.0 } else { 0.0 },
            _padding: [0.0; 2],
        }
    }
}

/// GPU uniform data for materials
///
/// MUST match the `Material` struct in `room.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub unlit: f32,
    pub receive_shadow: f32,
    _padding: [f32; 2],
}
