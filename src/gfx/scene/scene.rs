use cgmath::Vector3;

use crate::gfx::resources::material::Color;

use super::{
    light::{Light, PointLight},
    node::{Mesh, SceneNode},
};

/// Index of a node inside its [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Root of the scene graph: background color plus an append-only list of nodes.
///
/// Nodes are never removed or moved once added. Adding the same content twice
/// yields two copies; nothing deduplicates.
#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Color,
    nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            nodes: Vec::new(),
        }
    }

    /// Appends a node and returns its id
    pub fn add(&mut self, node: SceneNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    /// First node with the given name
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|node| node.name() == name)
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn child_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn meshes(&self) -> impl Iterator<Item = (NodeId, &SceneNode, &Mesh)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| node.as_mesh().map(|mesh| (NodeId(i), node, mesh)))
    }

    pub fn lights(&self) -> impl Iterator<Item = (&SceneNode, &Light)> {
        self.nodes
            .iter()
            .filter_map(|node| node.as_light().map(|light| (node, light)))
    }

    /// The first point light flagged to cast shadows, with its position
    pub fn shadow_light(&self) -> Option<(Vector3<f32>, &PointLight)> {
        self.lights().find_map(|(node, light)| match light {
            Light::Point(point) if point.cast_shadow => Some((node.position(), point)),
            _ => None,
        })
    }

    pub fn statistics(&self) -> SceneStatistics {
        let mut stats = SceneStatistics::default();
        for node in &self.nodes {
            match node.as_mesh() {
                Some(mesh) => {
                    let data = mesh.geometry.tessellate();
                    stats.mesh_count += 1;
                    stats.total_vertices += data.vertex_count();
                    stats.total_triangles += data.triangle_count();
                }
                None => stats.light_count += 1,
            }
        }
        stats
    }
}

/// Scene statistics for logging
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub mesh_count: usize,
    pub light_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::Geometry,
        resources::material::Material,
        scene::node::Transform,
    };

    fn cube(name: &str, x: f32) -> SceneNode {
        SceneNode::mesh(
            name,
            Geometry::cuboid(1.0, 1.0, 1.0).unwrap(),
            Material::standard(Color::from_hex(0xFFFFFF)),
            Transform::at(x, 0.0, 0.0),
        )
    }

    #[test]
    fn add_returns_sequential_ids() {
        let mut scene = Scene::new(Color::from_hex(0));
        let a = scene.add(cube("a", 0.0));
        let b = scene.add(cube("b", 1.0));
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(scene.get(b).unwrap().name(), "b");
    }

    #[test]
    fn duplicates_are_kept() {
        let mut scene = Scene::new(Color::from_hex(0));
        scene.add(cube("a", 0.0));
        scene.add(cube("a", 0.0));
        assert_eq!(scene.child_count(), 2);
    }

    #[test]
    fn shadow_light_requires_flag() {
        let mut scene = Scene::new(Color::from_hex(0));
        scene.add(SceneNode::light(
            "plain",
            Light::point(Color::from_hex(0xFFFFFF), 1.0, 10.0),
            Transform::at(1.0, 1.0, 1.0),
        ));
        assert!(scene.shadow_light().is_none());

        scene.add(SceneNode::light(
            "caster",
            Light::point(Color::from_hex(0xFFFFFF), 1.0, 10.0).casting_shadow(true),
            Transform::at(0.0, 2.0, 0.0),
        ));
        let (position, _) = scene.shadow_light().unwrap();
        assert_eq!(position, Vector3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn statistics_split_meshes_and_lights() {
        let mut scene = Scene::new(Color::from_hex(0));
        scene.add(cube("a", 0.0));
        scene.add(SceneNode::light(
            "ambient",
            Light::ambient(Color::from_hex(0x404040), 0.3),
            Transform::at(0.0, 0.0, 0.0),
        ));

        let stats = scene.statistics();
        assert_eq!(stats.mesh_count, 1);
        assert_eq!(stats.light_count, 1);
        assert_eq!(stats.total_triangles, 12);
        assert_eq!(stats.total_vertices, 24);
    }
}
