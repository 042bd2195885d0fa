use bytemuck::{Pod, Zeroable};
use portal_assets::{MeshData, PortalModel, TextureData};
use portal_common::Viewport;
use portal_scene::{Fireflies, OrbitCamera, Settings};
use wgpu::util::DeviceExt;

use crate::shaders;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct PortalUniform {
    color_start: [f32; 3],
    time: f32,
    color_end: [f32; 3],
    _pad: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct FireflyUniform {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    resolution: [f32; 2],
    size: f32,
    pixel_ratio: f32,
    time: f32,
    _pad: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct MeshVertex {
    position: [f32; 3],
    uv: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct FireflyInstance {
    position: [f32; 3],
    scale: f32,
}

/// Quad corners for one firefly sprite, drawn as a triangle strip.
const FIREFLY_CORNERS: [[f32; 2]; 4] = [[-0.5, -0.5], [0.5, -0.5], [-0.5, 0.5], [0.5, 0.5]];

const MESH_VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];
const FIREFLY_CORNER_ATTRIBUTES: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![0 => Float32x2];
const FIREFLY_INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![1 => Float32x3, 2 => Float32];

/// Per-frame values the application feeds to the renderer.
#[derive(Debug, Clone, Copy)]
pub struct FrameParams {
    /// Seconds since startup; drives the portal and firefly animations.
    pub elapsed: f32,
    pub viewport: Viewport,
}

/// Convert the settings' sRGB clear color to the linear color wgpu clears with.
pub fn clear_color(settings: &Settings) -> wgpu::Color {
    let [r, g, b] = settings.clear_color.to_linear();
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: 1.0,
    }
}

fn mesh_vertices(mesh: &MeshData) -> Vec<MeshVertex> {
    mesh.positions
        .iter()
        .enumerate()
        .map(|(i, &position)| MeshVertex {
            position,
            uv: mesh.uvs.get(i).copied().unwrap_or_default(),
        })
        .collect()
}

fn firefly_instances(fireflies: &Fireflies) -> Vec<FireflyInstance> {
    fireflies
        .positions()
        .iter()
        .zip(fireflies.scales())
        .map(|(&position, &scale)| FireflyInstance { position, scale })
        .collect()
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, mesh: &MeshData) -> Self {
        let vertices = mesh_vertices(mesh);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{}_vertices", mesh.name)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{}_indices", mesh.name)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// GPU state for the loaded model, created when the async load completes.
struct ModelBuffers {
    baked: GpuMesh,
    portal: GpuMesh,
    pole_a: GpuMesh,
    pole_b: GpuMesh,
    baked_bind_group: wgpu::BindGroup,
}

/// wgpu renderer for the portal scene.
pub struct PortalRenderer {
    baked_pipeline: wgpu::RenderPipeline,
    pole_pipeline: wgpu::RenderPipeline,
    portal_pipeline: wgpu::RenderPipeline,
    firefly_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    portal_buffer: wgpu::Buffer,
    portal_bind_group: wgpu::BindGroup,
    firefly_buffer: wgpu::Buffer,
    firefly_bind_group: wgpu::BindGroup,
    firefly_corner_buffer: wgpu::Buffer,
    firefly_instance_buffer: wgpu::Buffer,
    firefly_count: u32,
    texture_layout: wgpu::BindGroupLayout,
    depth_texture: wgpu::TextureView,
    model: Option<ModelBuffers>,
}

impl PortalRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        fireflies: &Fireflies,
    ) -> Self {
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_buffer"),
            contents: bytemuck::bytes_of(&CameraUniform {
                view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let portal_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("portal_buffer"),
            contents: bytemuck::bytes_of(&PortalUniform::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let firefly_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("firefly_buffer"),
            contents: bytemuck::bytes_of(&FireflyUniform::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout_entry = |visibility| wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_layout"),
            entries: &[uniform_layout_entry(wgpu::ShaderStages::VERTEX)],
        });
        let portal_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("portal_layout"),
            entries: &[uniform_layout_entry(wgpu::ShaderStages::FRAGMENT)],
        });
        let firefly_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("firefly_layout"),
            entries: &[uniform_layout_entry(
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind = |label, layout: &wgpu::BindGroupLayout, buffer: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            })
        };
        let camera_bind_group = bind("camera_bind_group", &camera_layout, &camera_buffer);
        let portal_bind_group = bind("portal_bind_group", &portal_layout, &portal_buffer);
        let firefly_bind_group = bind("firefly_bind_group", &firefly_layout, &firefly_buffer);

        let mesh_vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &MESH_VERTEX_ATTRIBUTES,
        };

        let depth_state = wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        };

        let mesh_pipeline = |label: &str,
                             shader_source: &str,
                             vs: &str,
                             fs: &str,
                             extra_layout: Option<&wgpu::BindGroupLayout>| {
            let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(shader_source.into()),
            });
            let mut layouts = vec![&camera_layout];
            if let Some(extra) = extra_layout {
                layouts.push(extra);
            }
            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(label),
                bind_group_layouts: &layouts,
                push_constant_ranges: &[],
            });
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(vs),
                    compilation_options: Default::default(),
                    buffers: &[mesh_vertex_layout.clone()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fs),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    ..Default::default()
                },
                depth_stencil: Some(depth_state.clone()),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        };

        let baked_pipeline = mesh_pipeline(
            "baked_pipeline",
            shaders::BAKED_SHADER,
            "vs_main",
            "fs_main",
            Some(&texture_layout),
        );
        let pole_pipeline = mesh_pipeline(
            "pole_pipeline",
            shaders::POLE_LIGHT_SHADER,
            "vs_pole",
            "fs_pole",
            None,
        );
        let portal_pipeline = mesh_pipeline(
            "portal_pipeline",
            shaders::PORTAL_SHADER,
            "vs_portal",
            "fs_portal",
            Some(&portal_layout),
        );

        // Fireflies: additive blend, depth test on but no depth write, so the
        // sprites glow through each other without clipping artifacts.
        let firefly_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("firefly_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::FIREFLIES_SHADER.into()),
        });
        let firefly_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("firefly_pipeline_layout"),
                bind_group_layouts: &[&firefly_layout],
                push_constant_ranges: &[],
            });
        let firefly_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("firefly_pipeline"),
            layout: Some(&firefly_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &firefly_shader,
                entry_point: Some("vs_fireflies"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &FIREFLY_CORNER_ATTRIBUTES,
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<FireflyInstance>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &FIREFLY_INSTANCE_ATTRIBUTES,
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &firefly_shader,
                entry_point: Some("fs_fireflies"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::SrcAlpha,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                depth_write_enabled: false,
                ..depth_state
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let firefly_corner_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("firefly_corners"),
            contents: bytemuck::cast_slice(&FIREFLY_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instances = firefly_instances(fireflies);
        let firefly_instance_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("firefly_instances"),
                contents: bytemuck::cast_slice(&instances),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            baked_pipeline,
            pole_pipeline,
            portal_pipeline,
            firefly_pipeline,
            camera_buffer,
            camera_bind_group,
            portal_buffer,
            portal_bind_group,
            firefly_buffer,
            firefly_bind_group,
            firefly_corner_buffer,
            firefly_instance_buffer,
            firefly_count: instances.len() as u32,
            texture_layout,
            depth_texture,
            model: None,
        }
    }

    /// Upload the loaded model: mesh geometry plus the baked texture.
    ///
    /// Called once, whenever the background load completes; the scene was
    /// already rendering fireflies before this point.
    pub fn attach_model(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        model: &PortalModel,
    ) {
        let baked_bind_group = self.upload_texture(device, queue, &model.baked_texture);
        self.model = Some(ModelBuffers {
            baked: GpuMesh::upload(device, &model.baked),
            portal: GpuMesh::upload(device, &model.portal_light),
            pole_a: GpuMesh::upload(device, &model.pole_light_a),
            pole_b: GpuMesh::upload(device, &model.pole_light_b),
            baked_bind_group,
        });
        tracing::info!("portal model attached");
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    /// Render one frame into `view`.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &OrbitCamera,
        settings: &Settings,
        frame: FrameParams,
    ) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform {
                view_proj: camera.view_projection().to_cols_array_2d(),
            }),
        );
        queue.write_buffer(
            &self.portal_buffer,
            0,
            bytemuck::bytes_of(&PortalUniform {
                color_start: settings.portal_color_start.to_linear(),
                time: frame.elapsed,
                color_end: settings.portal_color_end.to_linear(),
                _pad: 0.0,
            }),
        );
        queue.write_buffer(
            &self.firefly_buffer,
            0,
            bytemuck::bytes_of(&FireflyUniform {
                view: camera.view_matrix().to_cols_array_2d(),
                proj: camera.projection_matrix().to_cols_array_2d(),
                resolution: [
                    frame.viewport.width() as f32,
                    frame.viewport.height() as f32,
                ],
                size: settings.firefly_size,
                pixel_ratio: frame.viewport.pixel_ratio(),
                time: frame.elapsed,
                _pad: [0.0; 3],
            }),
        );

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("portal_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("portal_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(settings)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            if let Some(model) = &self.model {
                pass.set_pipeline(&self.baked_pipeline);
                pass.set_bind_group(0, &self.camera_bind_group, &[]);
                pass.set_bind_group(1, &model.baked_bind_group, &[]);
                model.baked.draw(&mut pass);

                pass.set_pipeline(&self.pole_pipeline);
                pass.set_bind_group(0, &self.camera_bind_group, &[]);
                model.pole_a.draw(&mut pass);
                model.pole_b.draw(&mut pass);

                pass.set_pipeline(&self.portal_pipeline);
                pass.set_bind_group(0, &self.camera_bind_group, &[]);
                pass.set_bind_group(1, &self.portal_bind_group, &[]);
                model.portal.draw(&mut pass);
            }

            // Fireflies draw last: depth-tested against the model but never
            // writing depth themselves.
            pass.set_pipeline(&self.firefly_pipeline);
            pass.set_bind_group(0, &self.firefly_bind_group, &[]);
            pass.set_vertex_buffer(0, self.firefly_corner_buffer.slice(..));
            pass.set_vertex_buffer(1, self.firefly_instance_buffer.slice(..));
            pass.draw(0..4, 0..self.firefly_count);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn upload_texture(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture: &TextureData,
    ) -> wgpu::BindGroup {
        let size = wgpu::Extent3d {
            width: texture.width,
            height: texture.height,
            depth_or_array_layers: 1,
        };
        let gpu_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("baked_texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            gpu_texture.as_image_copy(),
            &texture.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * texture.width),
                rows_per_image: Some(texture.height),
            },
            size,
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("baked_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let texture_view = gpu_texture.create_view(&Default::default());

        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("baked_texture_bind_group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        })
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
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
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_common::Color;
    use portal_scene::FIREFLY_COUNT;

    #[test]
    fn clear_color_linearizes_settings() {
        let settings = Settings {
            clear_color: Color::WHITE,
            ..Default::default()
        };
        let c = clear_color(&settings);
        assert!((c.r - 1.0).abs() < 1e-6);

        let settings = Settings {
            clear_color: Color::BLACK,
            ..Default::default()
        };
        let c = clear_color(&settings);
        assert_eq!((c.r, c.g, c.b, c.a), (0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn firefly_instances_pack_position_and_scale() {
        let cloud = Fireflies::new();
        let instances = firefly_instances(&cloud);
        assert_eq!(instances.len(), FIREFLY_COUNT);
        assert_eq!(instances[0].position, cloud.positions()[0]);
        assert_eq!(instances[0].scale, cloud.scales()[0]);
        // Tight std140-compatible layout: vec3 position + f32 scale.
        assert_eq!(std::mem::size_of::<FireflyInstance>(), 16);
    }

    #[test]
    fn uniform_layouts_match_wgsl() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 64);
        assert_eq!(std::mem::size_of::<PortalUniform>(), 32);
        assert_eq!(std::mem::size_of::<FireflyUniform>(), 160);
    }

    #[test]
    fn mesh_vertices_interleave_positions_and_uvs() {
        let mesh = MeshData {
            name: "test".into(),
            positions: vec![[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]],
            uvs: vec![[0.5, 0.5]],
            indices: vec![0, 1, 0],
        };
        let vertices = mesh_vertices(&mesh);
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[0].uv, [0.5, 0.5]);
        // Missing UVs fall back to the origin rather than panicking.
        assert_eq!(vertices[1].uv, [0.0, 0.0]);
    }

    #[test]
    fn shader_sources_declare_their_entry_points() {
        for (source, vs, fs) in [
            (shaders::BAKED_SHADER, "vs_main", "fs_main"),
            (shaders::POLE_LIGHT_SHADER, "vs_pole", "fs_pole"),
            (shaders::PORTAL_SHADER, "vs_portal", "fs_portal"),
            (shaders::FIREFLIES_SHADER, "vs_fireflies", "fs_fireflies"),
        ] {
            assert!(source.contains(&format!("fn {vs}")));
            assert!(source.contains(&format!("fn {fs}")));
        }
    }
}
