// src/rendering_lib/renderer.rs

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use super::vertex::Vertex;
use crate::engine_lib::camera::Camera;
use crate::engine_lib::scene_types::{Light, Material, Part, Scene};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const FALLBACK_COLOR: [f32; 4] = [0.7, 0.7, 0.7, 1.0];

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    view_proj: [[f32; 4]; 4],
    camera_position: [f32; 4],
    ambient: [f32; 4],
    point_color: [f32; 4],
    point_position: [f32; 4],
}

impl FrameUniform {
    pub fn new(scene: &Scene, camera: &Camera) -> Self {
        let mut uniform = Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_position: camera.position.extend(1.0).to_array(),
            ambient: [0.0; 4],
            point_color: [0.0; 4],
            point_position: [0.0, 0.0, 0.0, 1.0],
        };
        let mut point_seen = false;
        for light in &scene.lights {
            match light {
                Light::Ambient { color, intensity } => {
                    for (acc, c) in uniform.ambient.iter_mut().zip(color) {
                        *acc += c * intensity;
                    }
                }
                // The shader has one point light slot.
                Light::Point { color, intensity, position } if !point_seen => {
                    point_seen = true;
                    uniform.point_color = [color[0] * intensity, color[1] * intensity, color[2] * intensity, 0.0];
                    uniform.point_position = position.extend(1.0).to_array();
                }
                Light::Point { .. } => log::warn!("Only the first point light is rendered"),
            }
        }
        uniform
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PartUniform {
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    color: [f32; 4],
}

impl PartUniform {
    pub fn new(part: &Part, material: Option<&Material>) -> Self {
        Self {
            model: part.transform.to_cols_array_2d(),
            normal_matrix: part.transform.inverse().transpose().to_cols_array_2d(),
            color: material.map(|m| m.color).unwrap_or(FALLBACK_COLOR),
        }
    }
}

struct GpuPart {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    bind_group: wgpu::BindGroup,
}

pub struct Renderer {
    render_pipeline: wgpu::RenderPipeline,
    frame_uniform_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    part_bind_group_layout: wgpu::BindGroupLayout,
    depth_view: wgpu::TextureView,
    // Indexed like `Scene::parts`; `None` for parts without geometry.
    parts: Vec<Option<GpuPart>>,
}

fn uniform_layout_entry() -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

impl Renderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        shader_source: &str,
        width: u32,
        height: u32,
    ) -> Self {
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Renderer Shader Module"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let frame_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[uniform_layout_entry()],
            label: Some("frame_bind_group_layout"),
        });
        let part_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[uniform_layout_entry()],
            label: Some("part_bind_group_layout"),
        });

        let frame_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform Buffer"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_uniform_buffer.as_entire_binding(),
            }],
            label: Some("frame_bind_group"),
        });

        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Renderer Pipeline Layout"),
            bind_group_layouts: &[&frame_bind_group_layout, &part_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Renderer Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vs_main",
                buffers: &[Vertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Walls are seen from both sides while orbiting.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        Self {
            render_pipeline,
            frame_uniform_buffer,
            frame_bind_group,
            part_bind_group_layout,
            depth_view: create_depth_view(device, width, height),
            parts: Vec::new(),
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_view = create_depth_view(device, width, height);
    }

    /// Creates GPU buffers for every part. Geometry never changes after load,
    /// so this runs once.
    pub fn upload_scene(&mut self, device: &wgpu::Device, scene: &Scene) {
        self.parts = scene
            .parts
            .iter()
            .map(|part| {
                if part.mesh.is_empty() {
                    return None;
                }
                let vertices: Vec<Vertex> = part
                    .mesh
                    .positions
                    .iter()
                    .zip(&part.mesh.normals)
                    .map(|(p, n)| Vertex::new(*p, *n))
                    .collect();
                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} Vertex Buffer", part.name)),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} Index Buffer", part.name)),
                    contents: bytemuck::cast_slice(&part.mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                let uniform = PartUniform::new(part, scene.material(part.material));
                let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} Uniform Buffer", part.name)),
                    contents: bytemuck::bytes_of(&uniform),
                    usage: wgpu::BufferUsages::UNIFORM,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &self.part_bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    }],
                    label: Some("part_bind_group"),
                });
                Some(GpuPart {
                    vertex_buffer,
                    index_buffer,
                    index_count: part.mesh.indices.len() as u32,
                    bind_group,
                })
            })
            .collect();
        log::info!(
            "Uploaded {} of {} parts to the GPU",
            self.parts.iter().flatten().count(),
            scene.parts.len()
        );
    }

    pub fn render_scene(
        &mut self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        output_view: &wgpu::TextureView,
        scene: &Scene,
        camera: &Camera,
        clear_color: wgpu::Color,
    ) {
        let frame_uniform = FrameUniform::new(scene, camera);
        queue.write_buffer(&self.frame_uniform_buffer, 0, bytemuck::bytes_of(&frame_uniform));

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output_view,
                resolve_target: None,
                ops: wgpu::Operations { load: wgpu::LoadOp::Clear(clear_color), store: wgpu::StoreOp::Store },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations { load: wgpu::LoadOp::Clear(1.0), store: wgpu::StoreOp::Store }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

        for (part, gpu) in scene.parts.iter().zip(&self.parts) {
            let Some(gpu) = gpu else { continue };
            if !part.visible {
                continue;
            }
            render_pass.set_bind_group(1, &gpu.bind_group, &[]);
            render_pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
            render_pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..gpu.index_count, 0, 0..1);
        }
    }
}
