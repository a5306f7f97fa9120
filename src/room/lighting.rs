//! The lighting rig: ambient fill, hemisphere fill and the bulb's point light.

use cgmath::Vector3;
use log::debug;

use crate::gfx::{
    resources::material::Color,
    scene::{Light, Scene, SceneNode, Transform},
};

/// Offset of the point light above the bulb's anchor
pub const LIGHT_OFFSET_Y: f32 = 0.05;

pub const FILL_COLOR: Color = Color::from_hex(0x404040);
pub const AMBIENT_INTENSITY: f32 = 0.3;
pub const HEMISPHERE_INTENSITY: f32 = 1.0;
pub const BULB_LIGHT_COLOR: Color = Color::WHITE;
pub const BULB_LIGHT_INTENSITY: f32 = 0.6;
pub const BULB_LIGHT_DISTANCE: f32 = 100.0;

/// Shared anchor of the lightbulb meshes and the point light.
///
/// Both the bulb assembly and [`add_lighting`] read their positions from this
/// record, so moving the bulb moves its light with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightbulbAnchor {
    pub position: Vector3<f32>,
}

impl LightbulbAnchor {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
        }
    }

    pub fn light_position(&self) -> Vector3<f32> {
        self.position + Vector3::new(0.0, LIGHT_OFFSET_Y, 0.0)
    }
}

impl Default for LightbulbAnchor {
    fn default() -> Self {
        Self::new(0.0, 2.35, 3.0)
    }
}

impl From<[f32; 3]> for LightbulbAnchor {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// Appends the ambient, hemisphere and shadow-casting point lights.
pub fn add_lighting(scene: &mut Scene, anchor: &LightbulbAnchor) {
    let origin = Transform::at(0.0, 0.0, 0.0);

    scene.add(SceneNode::light(
        "ambient-light",
        Light::ambient(FILL_COLOR, AMBIENT_INTENSITY),
        origin,
    ));
    scene.add(SceneNode::light(
        "hemisphere-light",
        Light::hemisphere(FILL_COLOR, FILL_COLOR, HEMISPHERE_INTENSITY),
        origin,
    ));
    scene.add(SceneNode::light(
        "bulb-light",
        Light::point(BULB_LIGHT_COLOR, BULB_LIGHT_INTENSITY, BULB_LIGHT_DISTANCE)
            .casting_shadow(true),
        anchor.light_position(),
    ));

    debug!("lighting rig added, point light at {:?}", anchor.light_position());
}
