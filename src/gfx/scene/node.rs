use cgmath::{Matrix4, Rad, Vector3};

use crate::gfx::{geometry::Geometry, resources::material::Material};

use super::light::Light;

/// Position plus Euler rotation (radians, applied X then Y then Z).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
}

impl Transform {
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            rotation: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vector3::new(x, y, z);
        self
    }

    /// Model matrix: T * Rx * Ry * Rz
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
    }
}

impl From<Vector3<f32>> for Transform {
    fn from(position: Vector3<f32>) -> Self {
        Self::at(position.x, position.y, position.z)
    }
}

/// Renderable payload: one geometry, one material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Material,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodePayload {
    Mesh(Mesh),
    Light(Light),
}

/// A node of the scene graph.
///
/// The transform is fixed when the node is built; once the node is handed to
/// a [`Scene`](super::Scene) there is no way to move it.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    name: String,
    transform: Transform,
    payload: NodePayload,
}

impl SceneNode {
    pub fn mesh(
        name: impl Into<String>,
        geometry: Geometry,
        material: Material,
        transform: impl Into<Transform>,
    ) -> Self {
        Self {
            name: name.into(),
            transform: transform.into(),
            payload: NodePayload::Mesh(Mesh { geometry, material }),
        }
    }

    pub fn light(name: impl Into<String>, light: Light, transform: impl Into<Transform>) -> Self {
        Self {
            name: name.into(),
            transform: transform.into(),
            payload: NodePayload::Light(light),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn position(&self) -> Vector3<f32> {
        self.transform.position
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.payload {
            NodePayload::Mesh(mesh) => Some(mesh),
            NodePayload::Light(_) => None,
        }
    }

    pub fn as_light(&self) -> Option<&Light> {
        match &self.payload {
            NodePayload::Light(light) => Some(light),
            NodePayload::Mesh(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::material::Color;
    use cgmath::{SquareMatrix, Vector4};

    #[test]
    fn translation_only_matrix() {
        let t = Transform::at(-6.0, 0.0, 0.0);
        let origin = t.matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(origin, Vector4::new(-6.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn identity_when_untransformed() {
        assert_eq!(Transform::at(0.0, 0.0, 0.0).matrix(), Matrix4::identity());
    }

    #[test]
    fn z_rotation_turns_x_into_y() {
        let t = Transform::at(0.0, 0.0, 0.0).with_rotation(0.0, 0.0, std::f32::consts::FRAC_PI_2);
        let v = t.matrix() * Vector4::new(1.0, 0.0, 0.0, 0.0);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn payload_accessors() {
        let node = SceneNode::light(
            "ambient",
            Light::ambient(Color::from_hex(0x404040), 0.3),
            Transform::at(0.0, 0.0, 0.0),
        );
        assert!(node.as_light().is_some());
        assert!(node.as_mesh().is_none());
        assert_eq!(node.name(), "ambient");
    }
}
