use crate::assets::{AssetError, SceneAssets};
use crate::mesh::{GpuModel, GpuSkybox, MaterialData, ModelData};
use crate::pipeline::{DEPTH_FORMAT, Layouts, PipelineCache};
use crate::texture::{CubeFaces, Texture, TextureKind};
use hangar_render::{DrawUniforms, FramePlan, MeshId, ResolvedFrame, ShaderKind, ShaderParams};
use std::collections::HashMap;

/// Bytes between per-draw uniform slots; dynamic offsets must be 256-aligned.
pub const UNIFORM_SLOT: u64 = 512;
/// Draws a single frame may issue.
pub const MAX_DRAWS: usize = 16;

const _: () = assert!(std::mem::size_of::<DrawUniforms>() as u64 <= UNIFORM_SLOT);

/// Executes frame plans with wgpu.
///
/// All passes of a plan are encoded into one wgpu render pass: the clear
/// becomes the pass's load ops, and each draw binds the pipeline baked for
/// the state it was resolved under.
pub struct WgpuRenderer {
    layouts: Layouts,
    pipelines: PipelineCache,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    models: HashMap<MeshId, GpuModel>,
    skybox: GpuSkybox,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
    /// Uniforms each shader program last received.
    params: HashMap<ShaderKind, ShaderParams>,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        assets: &SceneAssets,
    ) -> Result<Self, AssetError> {
        let layouts = Layouts::new(device);
        let pipelines = PipelineCache::new(device, surface_format);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("draw_uniform_buffer"),
            size: UNIFORM_SLOT * MAX_DRAWS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw_uniform_bind_group"),
            layout: &layouts.uniforms,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniforms>() as u64),
                }),
            }],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("material_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let mut models = HashMap::new();
        for mesh in [
            MeshId::Terrain,
            MeshId::Freighter,
            MeshId::Trees,
            MeshId::Station,
        ] {
            let Some(path) = assets.model(mesh) else {
                continue;
            };
            let data = ModelData::load_obj(&path)?;
            let materials = material_bind_groups(device, queue, &layouts, &sampler, &data);
            models.insert(
                mesh,
                GpuModel::upload(device, &format!("{mesh:?}"), &data, materials),
            );
        }

        let skybox = {
            let faces = CubeFaces::load(&assets.skybox_faces());
            let cubemap = Texture::cubemap(device, queue, &faces);
            let sky_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("skybox_sampler"),
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                ..Default::default()
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("skybox_bind_group"),
                layout: &layouts.skybox,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&cubemap.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&sky_sampler),
                    },
                ],
            });
            GpuSkybox::new(device, bind_group)
        };

        tracing::info!(
            root = %assets.root().display(),
            models = models.len(),
            "scene assets uploaded"
        );

        Ok(Self {
            layouts,
            pipelines,
            uniform_buffer,
            uniform_bind_group,
            models,
            skybox,
            depth_texture: Self::create_depth_texture(device, width, height),
            surface_format,
            params: HashMap::new(),
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Encode and submit one frame. Returns the resolved frame so callers can
    /// act on the overlay flag.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        plan: &FramePlan,
    ) -> ResolvedFrame {
        let frame = plan.resolve(&mut self.params);
        if frame.draws.len() > MAX_DRAWS {
            tracing::warn!(
                draws = frame.draws.len(),
                max = MAX_DRAWS,
                "frame exceeds draw budget, extra draws dropped"
            );
        }
        let draws = &frame.draws[..frame.draws.len().min(MAX_DRAWS)];

        for (slot, draw) in draws.iter().enumerate() {
            self.pipelines
                .ensure(device, &self.layouts, draw.draw.shader, &draw.state);
            queue.write_buffer(
                &self.uniform_buffer,
                slot as u64 * UNIFORM_SLOT,
                bytemuck::bytes_of(&draw.uniforms),
            );
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame_encoder"),
        });

        {
            let (color_load, depth_load, stencil_load) = match frame.clear_color {
                Some(c) => (
                    wgpu::LoadOp::Clear(wgpu::Color {
                        r: c.x as f64,
                        g: c.y as f64,
                        b: c.z as f64,
                        a: 1.0,
                    }),
                    wgpu::LoadOp::Clear(1.0),
                    wgpu::LoadOp::Clear(0),
                ),
                None => (wgpu::LoadOp::Load, wgpu::LoadOp::Load, wgpu::LoadOp::Load),
            };

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: depth_load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: stencil_load,
                        store: wgpu::StoreOp::Store,
                    }),
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for (slot, draw) in draws.iter().enumerate() {
                let Some(pipeline) = self.pipelines.get(draw.draw.shader, &draw.state) else {
                    continue;
                };
                pass.set_pipeline(pipeline);
                pass.set_stencil_reference(draw.state.stencil_func.reference as u32);
                pass.set_bind_group(
                    0,
                    &self.uniform_bind_group,
                    &[(slot as u64 * UNIFORM_SLOT) as u32],
                );
                match draw.draw.mesh {
                    MeshId::Skybox => self.skybox.draw(&mut pass),
                    mesh => {
                        if let Some(model) = self.models.get(&mesh) {
                            model.draw(&mut pass);
                        }
                    }
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        tracing::trace!(
            draws = draws.len(),
            pipelines = self.pipelines.len(),
            "frame submitted"
        );
        frame
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_stencil_texture"),
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
}

/// One bind group per material, plus a trailing fallback for meshes that
/// name no material.
fn material_bind_groups(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layouts: &Layouts,
    sampler: &wgpu::Sampler,
    data: &ModelData,
) -> Vec<wgpu::BindGroup> {
    let fallback = MaterialData::default();
    data.materials
        .iter()
        .chain(std::iter::once(&fallback))
        .map(|material| {
            let diffuse = Texture::load_or_fallback(
                device,
                queue,
                material.diffuse.as_deref(),
                TextureKind::Diffuse,
            );
            let specular = Texture::load_or_fallback(
                device,
                queue,
                material.specular.as_deref(),
                TextureKind::Specular,
            );
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("material_bind_group"),
                layout: &layouts.material,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&diffuse.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&specular.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            })
        })
        .collect()
}
