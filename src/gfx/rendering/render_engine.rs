//! WGPU forward renderer for the room
//!
//! Per frame: an optional depth-only shadow pass from the shadow-casting point
//! light, then one main pass that clears to the scene background, draws every
//! opaque mesh and finally the transparent meshes back to front with alpha
//! blending and no depth writes.

use std::sync::Arc;

use cgmath::InnerSpace;
use log::{debug, info, warn};

use crate::{
    driver::FrameRenderer,
    error::{Result, RoomError},
    gfx::{
        camera::PerspectiveCamera,
        resources::{
            global_bindings::{GlobalBindings, GlobalUBO, GlobalUniform},
            texture_resource::TextureResource,
        },
        scene::Scene,
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
    },
};

use super::{
    gpu_mesh::{object_bind_group_layout, DrawMesh, GpuMesh},
    pipeline_manager::{PipelineConfig, PipelineManager},
};

const SHADOW_PIPELINE: &str = "Shadow";
const OPAQUE_PIPELINE: &str = "Opaque";
const TRANSPARENT_PIPELINE: &str = "Transparent";

/// Largest shadow map the requested device limits allow
const MAX_SHADOW_MAP_SIZE: u32 = 4096;

/// Renderer options taken from the `[render]` config section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub shadows: bool,
    pub shadow_map_size: u32,
    pub vsync: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            shadows: true,
            shadow_map_size: 2048,
            vsync: true,
        }
    }
}

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    shadow_map: TextureResource,
    shadow_bind_group: wgpu::BindGroup,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    object_layout: BindGroupLayoutWithDesc,
    meshes: Vec<GpuMesh>,
    uploaded_nodes: usize,
    settings: RenderSettings,
}

impl RenderEngine {
    /// Creates the surface, device and pipelines for `window`.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        settings: RenderSettings,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| RoomError::Gpu(format!("cannot create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RoomError::Gpu(format!("no suitable adapter: {e}")))?;
        info!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("roomview device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: MAX_SHADOW_MAP_SIZE,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| RoomError::Gpu(format!("cannot open device: {e}")))?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| RoomError::Gpu("surface reports no formats".to_string()))?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(settings.vsync),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = TextureResource::create_depth_texture(
            &device,
            config.width,
            config.height,
            "Depth Texture",
        );

        let shadow_size = settings.shadow_map_size.min(MAX_SHADOW_MAP_SIZE);
        if shadow_size != settings.shadow_map_size {
            warn!(
                "shadow map size {} exceeds the device limit, using {}",
                settings.shadow_map_size, shadow_size
            );
        }
        let shadow_map = TextureResource::create_shadow_map(&device, shadow_size);

        let shadow_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_depth_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Comparison))
            .create(&device, "Shadow Bind Group Layout");
        let shadow_bind_group = BindGroupBuilder::new(&shadow_layout)
            .texture(&shadow_map.view)
            .sampler(&shadow_map.sampler)
            .create(&device, "Shadow Bind Group");

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);
        let object_layout = object_bind_group_layout(&device);

        let device: Arc<wgpu::Device> = device.into();
        let queue: Arc<wgpu::Queue> = queue.into();

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("room", include_str!("room.wgsl"));
        pipeline_manager.load_shader("shadow", include_str!("shadow.wgsl"));

        pipeline_manager.register_pipeline(
            SHADOW_PIPELINE,
            PipelineConfig::default()
                .with_label("Shadow Pipeline")
                .with_shader("shadow")
                .with_bind_group_layouts(vec![
                    global_bindings.layout().clone(),
                    object_layout.layout.clone(),
                ])
                .with_depth(TextureResource::DEPTH_FORMAT, true)
                .with_depth_bias(2, 2.0)
                .with_vertex_only(),
        );

        let main_layouts = vec![
            global_bindings.layout().clone(),
            object_layout.layout.clone(),
            shadow_layout.layout.clone(),
        ];
        pipeline_manager.register_pipeline(
            OPAQUE_PIPELINE,
            PipelineConfig::default()
                .with_label("Opaque Pipeline")
                .with_shader("room")
                .with_bind_group_layouts(main_layouts.clone())
                .with_depth(TextureResource::DEPTH_FORMAT, true)
                .with_color_target(format, Some(wgpu::BlendState::REPLACE)),
        );
        pipeline_manager.register_pipeline(
            TRANSPARENT_PIPELINE,
            PipelineConfig::default()
                .with_label("Transparent Pipeline")
                .with_shader("room")
                .with_bind_group_layouts(main_layouts)
                .with_depth(TextureResource::DEPTH_FORMAT, false)
                .with_color_target(format, Some(wgpu::BlendState::ALPHA_BLENDING)),
        );
        pipeline_manager.create_all_pipelines()?;

        info!(
            "renderer ready: {}x{} {:?}, shadows {} ({}px)",
            config.width,
            config.height,
            format,
            if settings.shadows { "on" } else { "off" },
            shadow_size
        );

        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            depth_texture,
            shadow_map,
            shadow_bind_group,
            pipeline_manager,
            global_ubo,
            global_bindings,
            object_layout,
            meshes: Vec::new(),
            uploaded_nodes: 0,
            settings,
        })
    }

    /// Uploads nodes appended since the last call. Scenes only grow, so the
    /// node count is enough to know what is new.
    fn sync_scene(&mut self, scene: &Scene) {
        let nodes = scene.nodes();
        if self.uploaded_nodes > nodes.len() {
            // A different, smaller scene: start over
            self.meshes.clear();
            self.uploaded_nodes = 0;
        }
        if self.uploaded_nodes == nodes.len() {
            return;
        }

        let before = self.meshes.len();
        let start = self.uploaded_nodes;
        for (id, node, _) in scene.meshes().filter(|(id, _, _)| id.index() >= start) {
            if let Some(mesh) = GpuMesh::upload(&self.device, &self.object_layout, id, node) {
                self.meshes.push(mesh);
            }
        }
        self.uploaded_nodes = nodes.len();
        debug!("uploaded {} meshes", self.meshes.len() - before);
    }

    /// Renders one frame of `scene` as seen from `camera`.
    pub fn render_frame(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()> {
        self.sync_scene(scene);

        let shadows = self.settings.shadows && scene.shadow_light().is_some();
        let globals = GlobalUniform::from_scene(scene, camera, shadows);
        self.global_ubo.update_content(&self.queue, globals);

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("surface timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let shadow_pipeline = self.pipeline(SHADOW_PIPELINE)?;
        let opaque_pipeline = self.pipeline(OPAQUE_PIPELINE)?;
        let transparent_pipeline = self.pipeline(TRANSPARENT_PIPELINE)?;

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        // The shadow map is cleared even when unused so it never holds stale depth
        {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if shadows {
                shadow_pass.set_pipeline(shadow_pipeline);
                shadow_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
                for mesh in self.meshes.iter().filter(|m| m.cast_shadow) {
                    shadow_pass.draw_mesh(mesh, 1);
                }
            }
        }

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(scene.background.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
            render_pass.set_bind_group(2, &self.shadow_bind_group, &[]);

            render_pass.set_pipeline(opaque_pipeline);
            for mesh in self.meshes.iter().filter(|m| !m.transparent) {
                render_pass.draw_mesh(mesh, 1);
            }

            render_pass.set_pipeline(transparent_pipeline);
            for mesh in back_to_front(&self.meshes, scene, camera) {
                render_pass.draw_mesh(mesh, 1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    fn pipeline(&self, name: &str) -> Result<&wgpu::RenderPipeline> {
        self.pipeline_manager
            .pipeline(name)
            .ok_or_else(|| RoomError::Gpu(format!("pipeline '{name}' missing")))
    }

    /// Reconfigures the surface and recreates the depth buffer.
    ///
    /// The shadow map has a fixed size and is left alone.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, width, height, "Depth Texture");
        debug!("surface resized to {width}x{height}");
    }
}

impl FrameRenderer for RenderEngine {
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()> {
        self.render_frame(scene, camera)
    }

    fn resize(&mut self, width: u32, height: u32) {
        RenderEngine::resize(self, width, height);
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

/// Transparent meshes ordered farthest from the camera first.
fn back_to_front<'a>(
    meshes: &'a [GpuMesh],
    scene: &Scene,
    camera: &PerspectiveCamera,
) -> Vec<&'a GpuMesh> {
    let eye = cgmath::Vector3::new(camera.position.x, camera.position.y, camera.position.z);
    let mut transparent: Vec<(f32, &GpuMesh)> = meshes
        .iter()
        .filter(|m| m.transparent)
        .map(|m| {
            let distance = scene
                .get(m.node)
                .map(|node| (node.position() - eye).magnitude2())
                .unwrap_or(0.0);
            (distance, m)
        })
        .collect();
    transparent.sort_by(|a, b| b.0.total_cmp(&a.0));
    transparent.into_iter().map(|(_, m)| m).collect()
}
