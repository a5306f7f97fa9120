//! Global uniform bindings for camera and scene lighting
//!
//! One uniform block, bound to slot 0 in every pipeline, carries the camera,
//! the summed fill lights, the point light and the light-space matrix used for
//! shadow mapping. It is rebuilt from the scene each frame; the underlying
//! [`UniformBuffer`] skips the upload when nothing changed.

use cgmath::{perspective, Deg, Matrix4, Point3, SquareMatrix, Vector3};

use crate::{
    gfx::{
        camera::{camera_utils::OPENGL_TO_WGPU_MATRIX, PerspectiveCamera},
        scene::{Light, Scene},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Field of view of the shadow camera looking down from the point light
pub const SHADOW_FOV_DEGREES: f32 = 130.0;
pub const SHADOW_NEAR: f32 = 0.05;

/// Global uniform buffer content
///
/// MUST match the `Globals` struct in `room.wgsl` and `shadow.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
    pub light_view_proj: [[f32; 4]; 4],
    /// rgb = color * intensity
    pub ambient: [f32; 4],
    pub hemisphere_sky: [f32; 4],
    pub hemisphere_ground: [f32; 4],
    /// xyz = position, w = range (0 when there is no point light)
    pub point_position: [f32; 4],
    /// rgb = color * intensity, w = 1 when the shadow map is valid
    pub point_color: [f32; 4],
}

impl GlobalUniform {
    /// Collects the camera and every light in `scene`.
    ///
    /// Ambient and hemisphere lights are summed; only the first point light is
    /// used. `shadows` says whether a shadow map was rendered this frame.
    pub fn from_scene(scene: &Scene, camera: &PerspectiveCamera, shadows: bool) -> Self {
        let camera_uniform = camera.uniform();
        let mut uniform = Self {
            view_position: camera_uniform.view_position,
            view_proj: camera_uniform.view_proj,
            light_view_proj: Matrix4::identity().into(),
            ambient: [0.0; 4],
            hemisphere_sky: [0.0; 4],
            hemisphere_ground: [0.0; 4],
            point_position: [0.0; 4],
            point_color: [0.0; 4],
        };

        let mut have_point = false;
        for (node, light) in scene.lights() {
            match light {
                Light::Ambient { color, intensity } => {
                    accumulate(&mut uniform.ambient, color.to_rgb(), *intensity);
                }
                Light::Hemisphere {
                    sky,
                    ground,
                    intensity,
                } => {
                    accumulate(&mut uniform.hemisphere_sky, sky.to_rgb(), *intensity);
                    accumulate(&mut uniform.hemisphere_ground, ground.to_rgb(), *intensity);
                }
                Light::Point(point) if !have_point => {
                    have_point = true;
                    let p = node.position();
                    uniform.point_position = [p.x, p.y, p.z, point.distance];
                    let [r, g, b] = point.color.to_rgb();
                    let lit_shadows = shadows && point.cast_shadow;
                    uniform.point_color = [
                        r * point.intensity,
                        g * point.intensity,
                        b * point.intensity,
                        if lit_shadows { 1.0 } else { 0.0 },
                    ];
                    uniform.light_view_proj = shadow_view_proj(p, point.distance).into();
                }
                Light::Point(_) => {}
            }
        }

        uniform
    }

    pub fn shadows_enabled(&self) -> bool {
        self.point_color[3] > 0.5
    }
}

fn accumulate(target: &mut [f32; 4], rgb: [f32; 3], intensity: f32) {
    for (channel, value) in target.iter_mut().zip(rgb) {
        *channel += value * intensity;
    }
}

/// View-projection of the shadow camera: a wide perspective frustum at the
/// light, looking straight down.
pub fn shadow_view_proj(light_position: Vector3<f32>, range: f32) -> Matrix4<f32> {
    let eye = Point3::new(light_position.x, light_position.y, light_position.z);
    let view = Matrix4::look_at_rh(eye, eye - Vector3::unit_y(), -Vector3::unit_z());
    let far = range.max(SHADOW_NEAR * 2.0);
    let proj = OPENGL_TO_WGPU_MATRIX * perspective(Deg(SHADOW_FOV_DEGREES), 1.0, SHADOW_NEAR, far);
    proj * view
}

pub type GlobalUBO = UniformBuffer<GlobalUniform>;

/// Bind group layout and bind group for the global uniform (slot 0).
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");
        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
