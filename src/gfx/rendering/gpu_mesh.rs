//! GPU-side copies of the scene's meshes.
//!
//! Each mesh node gets its own vertex/index buffers and a small uniform with
//! its model matrix and material, bound at slot 1. Nodes never move, so all of
//! it is written once at upload.

use wgpu::util::DeviceExt;

use crate::{
    gfx::{
        resources::material::{Material, MaterialUniform},
        scene::{NodeId, SceneNode, Transform},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
    },
};

use super::vertex::Vertex3D;

/// Per-object uniform
///
/// MUST match the `Object` struct in `room.wgsl` and `shadow.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub material: MaterialUniform,
}

impl ObjectUniform {
    pub fn new(transform: &Transform, material: &Material) -> Self {
        Self {
            model: transform.matrix().into(),
            material: material.uniform(),
        }
    }
}

pub fn object_bind_group_layout(device: &wgpu::Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_rendering(binding_types::uniform())
        .create(device, "Object Bind Group Layout")
}

pub struct GpuMesh {
    pub node: NodeId,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    // Kept alive for the bind group
    _uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    pub transparent: bool,
    pub cast_shadow: bool,
}

impl GpuMesh {
    /// Uploads a mesh node. Returns `None` for light nodes.
    pub fn upload(
        device: &wgpu::Device,
        layout: &BindGroupLayoutWithDesc,
        id: NodeId,
        node: &SceneNode,
    ) -> Option<Self> {
        let mesh = node.as_mesh()?;
        let data = mesh.geometry.tessellate();
        let vertices: Vec<Vertex3D> = data.to_vertices();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", node.name())),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", node.name())),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform = ObjectUniform::new(node.transform(), &mesh.material);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Object Uniform", node.name())),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = BindGroupBuilder::new(layout)
            .resource(uniform_buffer.as_entire_binding())
            .create(device, &format!("{} Bind Group", node.name()));

        Some(Self {
            node: id,
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
            _uniform_buffer: uniform_buffer,
            bind_group,
            transparent: mesh.material.is_transparent(),
            cast_shadow: mesh.material.shadows.cast,
        })
    }
}

pub trait DrawMesh<'a> {
    /// Binds the mesh's object uniform at `slot` and draws it.
    fn draw_mesh(&mut self, mesh: &'a GpuMesh, slot: u32);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b GpuMesh, slot: u32) {
        self.set_bind_group(slot, &mesh.bind_group, &[]);
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::material::Color;

    #[test]
    fn object_uniform_is_96_bytes() {
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 96);
    }

    #[test]
    fn object_uniform_carries_translation_and_color() {
        let transform = Transform::at(-6.0, 0.0, 0.0);
        let material = Material::standard(Color::from_hex(0xFF0000));
        let uniform = ObjectUniform::new(&transform, &material);
        assert_eq!(uniform.model[3], [-6.0, 0.0, 0.0, 1.0]);
        assert_eq!(uniform.material.base_color, [1.0, 0.0, 0.0, 1.0]);
    }
}
