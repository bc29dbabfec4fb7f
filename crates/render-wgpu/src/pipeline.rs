use crate::mesh::{ModelVertex, SkyVertex};
use crate::shaders;
use hangar_render::{BlendFactor, CompareFunc, CullFace, GpuState, ShaderKind, StencilOp};
use std::collections::HashMap;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

pub fn compare_function(func: CompareFunc) -> wgpu::CompareFunction {
    match func {
        CompareFunc::Never => wgpu::CompareFunction::Never,
        CompareFunc::Less => wgpu::CompareFunction::Less,
        CompareFunc::Equal => wgpu::CompareFunction::Equal,
        CompareFunc::LessEqual => wgpu::CompareFunction::LessEqual,
        CompareFunc::Greater => wgpu::CompareFunction::Greater,
        CompareFunc::NotEqual => wgpu::CompareFunction::NotEqual,
        CompareFunc::GreaterEqual => wgpu::CompareFunction::GreaterEqual,
        CompareFunc::Always => wgpu::CompareFunction::Always,
    }
}

pub fn stencil_operation(op: StencilOp) -> wgpu::StencilOperation {
    match op {
        StencilOp::Keep => wgpu::StencilOperation::Keep,
        StencilOp::Zero => wgpu::StencilOperation::Zero,
        StencilOp::Replace => wgpu::StencilOperation::Replace,
        StencilOp::Invert => wgpu::StencilOperation::Invert,
    }
}

pub fn blend_factor(factor: BlendFactor) -> wgpu::BlendFactor {
    match factor {
        BlendFactor::Zero => wgpu::BlendFactor::Zero,
        BlendFactor::One => wgpu::BlendFactor::One,
        BlendFactor::SrcAlpha => wgpu::BlendFactor::SrcAlpha,
        BlendFactor::OneMinusSrcAlpha => wgpu::BlendFactor::OneMinusSrcAlpha,
    }
}

/// Depth/stencil block for a state. A disabled depth test still runs but
/// always passes and never writes, which is what a disabled GL depth test
/// does to the stencil ops too.
pub fn depth_stencil_state(state: &GpuState) -> wgpu::DepthStencilState {
    let (depth_write_enabled, depth_compare) = if state.depth_test {
        (true, compare_function(state.depth_func))
    } else {
        (false, wgpu::CompareFunction::Always)
    };

    let stencil = if state.stencil_test {
        let face = wgpu::StencilFaceState {
            compare: compare_function(state.stencil_func.compare),
            fail_op: stencil_operation(state.stencil_ops.stencil_fail),
            depth_fail_op: stencil_operation(state.stencil_ops.depth_fail),
            pass_op: stencil_operation(state.stencil_ops.pass),
        };
        wgpu::StencilState {
            front: face,
            back: face,
            read_mask: state.stencil_func.read_mask as u32,
            write_mask: state.stencil_write_mask as u32,
        }
    } else {
        wgpu::StencilState::default()
    };

    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled,
        depth_compare,
        stencil,
        bias: Default::default(),
    }
}

pub fn blend_state(state: &GpuState) -> Option<wgpu::BlendState> {
    if !state.blend {
        return None;
    }
    let (src, dst) = state.blend_func;
    let component = wgpu::BlendComponent {
        src_factor: blend_factor(src),
        dst_factor: blend_factor(dst),
        operation: wgpu::BlendOperation::Add,
    };
    Some(wgpu::BlendState {
        color: component,
        alpha: component,
    })
}

pub fn cull_mode(state: &GpuState) -> Option<wgpu::Face> {
    state.cull_face.map(|face| match face {
        CullFace::Front => wgpu::Face::Front,
        CullFace::Back => wgpu::Face::Back,
    })
}

/// Layouts every pipeline is built against.
pub struct Layouts {
    pub uniforms: wgpu::BindGroupLayout,
    pub material: wgpu::BindGroupLayout,
    pub skybox: wgpu::BindGroupLayout,
    model_pipeline: wgpu::PipelineLayout,
    sky_pipeline: wgpu::PipelineLayout,
}

impl Layouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniforms = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_uniforms_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<hangar_render::DrawUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let texture_entry = |binding, view_dimension| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension,
                multisampled: false,
            },
            count: None,
        };
        let sampler_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        };

        let material = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_layout"),
            entries: &[
                texture_entry(0, wgpu::TextureViewDimension::D2),
                texture_entry(1, wgpu::TextureViewDimension::D2),
                sampler_entry(2),
            ],
        });
        let skybox = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("skybox_layout"),
            entries: &[
                texture_entry(0, wgpu::TextureViewDimension::Cube),
                sampler_entry(1),
            ],
        });

        let model_pipeline = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("model_pipeline_layout"),
            bind_group_layouts: &[&uniforms, &material],
            push_constant_ranges: &[],
        });
        let sky_pipeline = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sky_pipeline_layout"),
            bind_group_layouts: &[&uniforms, &skybox],
            push_constant_ranges: &[],
        });

        Self {
            uniforms,
            material,
            skybox,
            model_pipeline,
            sky_pipeline,
        }
    }
}

/// Render pipelines keyed by shader and baked GPU state. wgpu fixes depth,
/// stencil, blend and cull state at pipeline creation, so each distinct
/// state a shader is drawn under gets its own pipeline.
pub struct PipelineCache {
    surface_format: wgpu::TextureFormat,
    modules: HashMap<ShaderKind, wgpu::ShaderModule>,
    pipelines: HashMap<(ShaderKind, GpuState), wgpu::RenderPipeline>,
}

impl PipelineCache {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let modules = ShaderKind::ALL
            .into_iter()
            .map(|kind| {
                let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some(&format!("{kind:?}_shader")),
                    source: wgpu::ShaderSource::Wgsl(shaders::source(kind).into()),
                });
                (kind, module)
            })
            .collect();
        Self {
            surface_format,
            modules,
            pipelines: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    /// Build the pipeline for `(shader, state)` if it does not exist yet.
    pub fn ensure(
        &mut self,
        device: &wgpu::Device,
        layouts: &Layouts,
        shader: ShaderKind,
        state: &GpuState,
    ) {
        let key = (shader, state.pipeline_key());
        if self.pipelines.contains_key(&key) {
            return;
        }
        let Some(module) = self.modules.get(&shader) else {
            return;
        };

        let (layout, buffers) = match shader {
            ShaderKind::Skybox => (&layouts.sky_pipeline, [SkyVertex::LAYOUT]),
            _ => (&layouts.model_pipeline, [ModelVertex::LAYOUT]),
        };

        tracing::debug!(?shader, pipelines = self.pipelines.len() + 1, "building pipeline");
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{shader:?}_pipeline")),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.surface_format,
                    blend: blend_state(state),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: cull_mode(state),
                ..Default::default()
            },
            depth_stencil: Some(depth_stencil_state(state)),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });
        self.pipelines.insert(key, pipeline);
    }

    pub fn get(&self, shader: ShaderKind, state: &GpuState) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(&(shader, state.pipeline_key()))
    }
}
