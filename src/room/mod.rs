//! # The Bedroom
//!
//! Assembles the static bedroom scene: the room shell (floor, walls, window,
//! ceiling) and the furniture groups (bed, table, chair, laptop, lightbulb).
//!
//! Each furniture group is placed by an anchor, the position of its first
//! piece, with every other piece given as an offset from it. The default
//! [`RoomLayout`] puts every mesh at the coordinates the room was authored
//! with.
//!
//! ```rust
//! use roomview::gfx::{resources::material::Color, scene::Scene};
//! use roomview::room::{add_lighting, assemble_room, RoomLayout};
//!
//! let layout = RoomLayout::default();
//! let mut scene = Scene::new(Color::from_hex(0xB9F3FC));
//! assemble_room(&mut scene, &layout);
//! add_lighting(&mut scene, &layout.lightbulb);
//! assert_eq!(scene.child_count(), 38);
//! ```

pub mod lighting;

pub use lighting::{add_lighting, LightbulbAnchor};

use cgmath::Vector3;
use log::info;

use crate::gfx::{
    geometry::{Geometry, DEFAULT_RADIAL_SEGMENTS},
    resources::material::{Color, Material, ShadowFlags},
    scene::{Scene, SceneNode, Transform},
};

pub const FLOOR_COLOR: Color = Color::from_hex(0xDFD3C3);
pub const WALL_COLOR: Color = Color::from_hex(0xB5D5C5);
pub const GLASS_COLOR: Color = Color::from_hex(0xEDECE0);
pub const GLASS_OPACITY: f32 = 0.5;
pub const BED_WOOD_COLOR: Color = Color::from_hex(0x56310F);
pub const MATTRESS_COLOR: Color = Color::from_hex(0x797878);
pub const TABLE_COLOR: Color = Color::from_hex(0xB9814C);
pub const CHAIR_COLOR: Color = Color::from_hex(0xE5E5E5);
pub const LAPTOP_SHELL_COLOR: Color = Color::from_hex(0x3D3D3D);
pub const LAPTOP_PANEL_COLOR: Color = Color::from_hex(0x5C5C5C);
pub const BULB_COLOR: Color = Color::from_hex(0xF5EA5A);
pub const FITTING_COLOR: Color = Color::from_hex(0xDDDDDD);

/// Tilt of the laptop lid and hinge about Z, in radians
pub const LAPTOP_LID_TILT: f32 = -3.0;

/// Number of meshes [`assemble_room`] appends
pub const ROOM_MESH_COUNT: usize = 35;

/// Anchors of the furniture groups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomLayout {
    /// Bed frame centre
    pub bed: Vector3<f32>,
    /// Table top centre
    pub table: Vector3<f32>,
    /// Chair seat centre
    pub chair: Vector3<f32>,
    /// Laptop base centre
    pub laptop: Vector3<f32>,
    pub lightbulb: LightbulbAnchor,
}

impl Default for RoomLayout {
    fn default() -> Self {
        Self {
            bed: Vector3::new(1.5, -2.0, -2.5),
            table: Vector3::new(-4.25, -1.0, 2.0),
            chair: Vector3::new(-2.0, -1.7, 2.0),
            laptop: Vector3::new(-3.9, -0.85, 2.0),
            lightbulb: LightbulbAnchor::default(),
        }
    }
}

impl RoomLayout {
    /// Default layout with the bulb (and its light) moved to `lightbulb`.
    pub fn with_lightbulb(lightbulb: LightbulbAnchor) -> Self {
        Self {
            lightbulb,
            ..Self::default()
        }
    }
}

/// Appends the room's meshes to `scene` and returns how many were added.
///
/// Every call appends a fresh copy; assembling twice leaves two overlapping
/// rooms in the scene.
pub fn assemble_room(scene: &mut Scene, layout: &RoomLayout) -> usize {
    let before = scene.child_count();

    add_shell(scene);
    add_bed(scene, layout.bed);
    add_table(scene, layout.table);
    add_chair(scene, layout.chair);
    add_laptop(scene, layout.laptop);
    add_lightbulb(scene, &layout.lightbulb);

    let added = scene.child_count() - before;
    info!("room assembled: {added} meshes");
    added
}

/// Scene with the room, its lights and the given background.
pub fn room_scene(layout: &RoomLayout, background: Color) -> Scene {
    let mut scene = Scene::new(background);
    assemble_room(&mut scene, layout);
    add_lighting(&mut scene, &layout.lightbulb);
    scene
}

/// Box from literal dimensions, which must be positive.
fn cuboid(width: f32, height: f32, depth: f32) -> Geometry {
    Geometry::Box {
        width,
        height,
        depth,
    }
}

/// Cylinder from literal radii and segment count, which must be valid.
fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Geometry {
    Geometry::Cylinder {
        radius_top,
        radius_bottom,
        height,
        radial_segments,
    }
}

fn piece(
    scene: &mut Scene,
    name: &str,
    geometry: Geometry,
    material: Material,
    transform: impl Into<Transform>,
) {
    scene.add(SceneNode::mesh(name, geometry, material, transform));
}

fn offset(anchor: Vector3<f32>, x: f32, y: f32, z: f32) -> Vector3<f32> {
    anchor + Vector3::new(x, y, z)
}

fn add_shell(scene: &mut Scene) {
    let shadowed = |color| Material::standard(color).with_shadows(ShadowFlags::BOTH);
    let wall = Material::standard(WALL_COLOR);

    piece(
        scene,
        "floor",
        cuboid(12.0, 1.0, 10.0),
        shadowed(FLOOR_COLOR),
        Transform::at(0.0, -3.3, 0.0),
    );
    piece(
        scene,
        "left-wall",
        cuboid(1.0, 6.0, 10.0),
        shadowed(WALL_COLOR),
        Transform::at(-6.0, 0.0, 0.0),
    );

    // Right wall is built around the window opening
    for (name, height, depth, y, z) in [
        ("right-wall-below-window", 2.0, 10.0, -1.8, 0.0),
        ("right-wall-above-window", 1.0, 10.0, 2.0, 0.0),
        ("right-wall-back", 3.0, 5.0, 0.0, -3.0),
        ("right-wall-front", 3.0, 1.0, 0.0, 4.5),
    ] {
        piece(scene, name, cuboid(0.5, height, depth), wall, Transform::at(6.0, y, z));
    }

    piece(
        scene,
        "window-glass",
        cuboid(0.3, 3.0, 6.0),
        Material::standard(GLASS_COLOR).with_opacity(GLASS_OPACITY),
        Transform::at(6.0, 0.0, 1.8),
    );

    piece(scene, "back-wall", cuboid(12.0, 6.0, 1.0), wall, Transform::at(0.0, 0.0, -5.0));
    piece(
        scene,
        "ceiling",
        cuboid(12.0, 1.0, 10.0),
        Material::standard(FLOOR_COLOR),
        Transform::at(0.0, 3.0, 0.0),
    );
}

fn add_bed(scene: &mut Scene, anchor: Vector3<f32>) {
    let wood = Material::standard(BED_WOOD_COLOR);
    let head_leg = cuboid(0.3, 3.5, 0.3);
    let foot_leg = cuboid(0.3, 2.5, 0.3);

    piece(scene, "bed-frame", cuboid(9.5, 0.6, 4.0), wood, anchor);
    piece(
        scene,
        "bed-mattress",
        cuboid(8.8, 0.5, 3.9),
        Material::standard(MATTRESS_COLOR),
        offset(anchor, -0.2, 0.4, 0.0),
    );

    piece(scene, "bed-head-leg-back", head_leg, wood, offset(anchor, 4.1, 0.0, -1.9));
    piece(scene, "bed-head-leg-front", head_leg, wood, offset(anchor, 4.1, 0.0, 1.85));
    piece(scene, "bed-headboard", cuboid(0.1, 1.0, 4.0), wood, offset(anchor, 4.1, 1.0, 0.0));

    piece(scene, "bed-foot-leg-back", foot_leg, wood, offset(anchor, -4.6, 0.0, -1.85));
    piece(scene, "bed-foot-leg-front", foot_leg, wood, offset(anchor, -4.6, 0.0, 1.85));
    piece(scene, "bed-footboard", cuboid(0.1, 0.4, 4.0), wood, offset(anchor, -4.6, 0.8, 0.0));
}

fn add_table(scene: &mut Scene, anchor: Vector3<f32>) {
    let wood = Material::standard(TABLE_COLOR);
    let leg = cuboid(0.3, 3.0, 0.3);

    piece(scene, "table-top", cuboid(2.5, 0.2, 5.0), wood, anchor);
    for (name, dx, dz) in [
        ("table-leg-1", 1.0, 2.3),
        ("table-leg-2", 1.0, -2.3),
        ("table-leg-3", -1.0, 2.3),
        ("table-leg-4", -1.0, -2.3),
    ] {
        piece(scene, name, leg, wood, offset(anchor, dx, -1.4, dz));
    }
}

fn add_chair(scene: &mut Scene, anchor: Vector3<f32>) {
    let plastic = Material::standard(CHAIR_COLOR);
    let leg = cuboid(0.3, 2.0, 0.3);

    piece(
        scene,
        "chair-seat",
        cylinder(1.0, 1.0, 0.2, DEFAULT_RADIAL_SEGMENTS),
        plastic,
        anchor,
    );
    for (name, dx, dz) in [
        ("chair-leg-1", 0.5, 0.5),
        ("chair-leg-2", 0.5, -0.5),
        ("chair-leg-3", -0.5, -0.5),
        ("chair-leg-4", -0.5, 0.5),
    ] {
        piece(scene, name, leg, plastic, offset(anchor, dx, -1.0, dz));
    }
}

fn add_laptop(scene: &mut Scene, anchor: Vector3<f32>) {
    let shell = Material::standard(LAPTOP_SHELL_COLOR);
    let panel = Material::standard(LAPTOP_PANEL_COLOR);
    let tilted = |position: Vector3<f32>| {
        Transform::from(position).with_rotation(0.0, 0.0, LAPTOP_LID_TILT)
    };

    piece(scene, "laptop-base", cuboid(1.5, 0.1, 2.0), shell, anchor);
    piece(
        scene,
        "laptop-hinge",
        cuboid(0.05, 1.5, 2.0),
        shell,
        tilted(offset(anchor, -0.8, 0.75, 0.0)),
    );
    let keyboard = offset(anchor, -0.1, 0.01, 0.0);
    piece(scene, "laptop-keyboard", cuboid(0.8, 0.1, 1.8), panel, keyboard);
    let trackpad = offset(anchor, 0.53, 0.01, 0.0);
    piece(scene, "laptop-trackpad", cuboid(0.3, 0.1, 0.5), panel, trackpad);
    piece(
        scene,
        "laptop-screen",
        cuboid(0.05, 1.3, 1.8),
        panel,
        tilted(offset(anchor, -0.799, 0.75, 0.0)),
    );
}

fn add_lightbulb(scene: &mut Scene, anchor: &LightbulbAnchor) {
    let fitting = Material::standard(FITTING_COLOR);
    let at = anchor.position;

    piece(
        scene,
        "lightbulb",
        Geometry::Sphere {
            radius: 0.1,
            width_segments: 64,
            height_segments: 32,
        },
        Material::basic(BULB_COLOR),
        at,
    );
    piece(
        scene,
        "lightbulb-base",
        cylinder(0.15, 0.15, 0.01, 64),
        fitting,
        offset(at, 0.0, 0.15, 0.0),
    );
    piece(
        scene,
        "lightbulb-outlet",
        cylinder(0.05, 0.05, 0.1, DEFAULT_RADIAL_SEGMENTS),
        fitting,
        offset(at, 0.0, 0.1, 0.0),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn position(scene: &Scene, name: &str) -> Vector3<f32> {
        scene
            .find(name)
            .unwrap_or_else(|| panic!("missing node {name}"))
            .position()
    }

    fn assert_at(scene: &Scene, name: &str, x: f32, y: f32, z: f32) {
        let p = position(scene, name);
        assert_relative_eq!(p.x, x, epsilon = 1e-5);
        assert_relative_eq!(p.y, y, epsilon = 1e-5);
        assert_relative_eq!(p.z, z, epsilon = 1e-5);
    }

    fn assembled() -> Scene {
        let mut scene = Scene::new(Color::BLACK);
        assemble_room(&mut scene, &RoomLayout::default());
        scene
    }

    #[test]
    fn appends_every_mesh() {
        let mut scene = Scene::new(Color::BLACK);
        let added = assemble_room(&mut scene, &RoomLayout::default());
        assert_eq!(added, ROOM_MESH_COUNT);
        assert_eq!(scene.meshes().count(), ROOM_MESH_COUNT);
        assert_eq!(scene.lights().count(), 0);
    }

    #[rustfmt::skip]
    const AUTHORED_POSITIONS: [(&str, f32, f32, f32); ROOM_MESH_COUNT] = [
        ("floor", 0.0, -3.3, 0.0),
        ("left-wall", -6.0, 0.0, 0.0),
        ("right-wall-below-window", 6.0, -1.8, 0.0),
        ("right-wall-above-window", 6.0, 2.0, 0.0),
        ("right-wall-back", 6.0, 0.0, -3.0),
        ("right-wall-front", 6.0, 0.0, 4.5),
        ("window-glass", 6.0, 0.0, 1.8),
        ("back-wall", 0.0, 0.0, -5.0),
        ("ceiling", 0.0, 3.0, 0.0),
        ("bed-frame", 1.5, -2.0, -2.5),
        ("bed-mattress", 1.3, -1.6, -2.5),
        ("bed-head-leg-back", 5.6, -2.0, -4.4),
        ("bed-head-leg-front", 5.6, -2.0, -0.65),
        ("bed-headboard", 5.6, -1.0, -2.5),
        ("bed-foot-leg-back", -3.1, -2.0, -4.35),
        ("bed-foot-leg-front", -3.1, -2.0, -0.65),
        ("bed-footboard", -3.1, -1.2, -2.5),
        ("table-top", -4.25, -1.0, 2.0),
        ("table-leg-1", -3.25, -2.4, 4.3),
        ("table-leg-2", -3.25, -2.4, -0.3),
        ("table-leg-3", -5.25, -2.4, 4.3),
        ("table-leg-4", -5.25, -2.4, -0.3),
        ("chair-seat", -2.0, -1.7, 2.0),
        ("chair-leg-1", -1.5, -2.7, 2.5),
        ("chair-leg-2", -1.5, -2.7, 1.5),
        ("chair-leg-3", -2.5, -2.7, 1.5),
        ("chair-leg-4", -2.5, -2.7, 2.5),
        ("laptop-base", -3.9, -0.85, 2.0),
        ("laptop-hinge", -4.7, -0.1, 2.0),
        ("laptop-keyboard", -4.0, -0.84, 2.0),
        ("laptop-trackpad", -3.37, -0.84, 2.0),
        ("laptop-screen", -4.699, -0.1, 2.0),
        ("lightbulb", 0.0, 2.35, 3.0),
        ("lightbulb-base", 0.0, 2.5, 3.0),
        ("lightbulb-outlet", 0.0, 2.45, 3.0),
    ];

    #[test]
    fn every_mesh_sits_at_its_authored_position() {
        let scene = assembled();
        let names: Vec<_> = scene.meshes().map(|(_, node, _)| node.name()).collect();
        let expected: Vec<_> = AUTHORED_POSITIONS.iter().map(|(name, ..)| *name).collect();
        assert_eq!(names, expected);

        for (name, x, y, z) in AUTHORED_POSITIONS {
            assert_at(&scene, name, x, y, z);
        }
    }

    #[test]
    fn only_floor_and_left_wall_take_part_in_shadows() {
        let scene = assembled();
        let shadowed: Vec<_> = scene
            .meshes()
            .filter(|(_, _, mesh)| mesh.material.shadows == ShadowFlags::BOTH)
            .map(|(_, node, _)| node.name().to_string())
            .collect();
        assert_eq!(shadowed, ["floor", "left-wall"]);
    }

    #[test]
    fn glass_is_the_only_transparent_mesh() {
        let scene = assembled();
        let transparent: Vec<_> = scene
            .meshes()
            .filter(|(_, _, mesh)| mesh.material.is_transparent())
            .collect();
        assert_eq!(transparent.len(), 1);
        assert_eq!(transparent[0].1.name(), "window-glass");
        assert_eq!(transparent[0].2.material.opacity(), GLASS_OPACITY);
    }

    #[test]
    fn laptop_lid_is_tilted() {
        let scene = assembled();
        for name in ["laptop-hinge", "laptop-screen"] {
            let rotation = scene.find(name).unwrap().transform().rotation;
            assert_eq!(rotation, Vector3::new(0.0, 0.0, LAPTOP_LID_TILT));
        }
        let base = scene.find("laptop-base").unwrap().transform().rotation;
        assert_eq!(base, Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn moving_the_bulb_moves_its_fittings() {
        let layout = RoomLayout::with_lightbulb(LightbulbAnchor::new(1.0, 2.0, -1.0));
        let mut scene = Scene::new(Color::BLACK);
        assemble_room(&mut scene, &layout);
        assert_at(&scene, "lightbulb", 1.0, 2.0, -1.0);
        assert_at(&scene, "lightbulb-base", 1.0, 2.15, -1.0);
        assert_at(&scene, "lightbulb-outlet", 1.0, 2.1, -1.0);
    }

    #[test]
    fn geometry_descriptors_are_valid() {
        let scene = assembled();
        for (_, node, mesh) in scene.meshes() {
            let data = mesh.geometry.tessellate();
            assert!(data.triangle_count() > 0, "{} has no triangles", node.name());
        }
    }
}
