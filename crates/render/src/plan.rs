use crate::state::{GpuState, StateChange};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use hangar_common::PointLight;
use std::collections::HashMap;

/// Meshes the scene draws. Backends map these to loaded GPU geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshId {
    Terrain,
    Freighter,
    Trees,
    Station,
    Skybox,
}

/// Shader programs. Each keeps its own uploaded parameters between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Terrain,
    Station,
    Outline,
    Trees,
    Skybox,
}

impl ShaderKind {
    pub const ALL: [ShaderKind; 5] = [
        ShaderKind::Terrain,
        ShaderKind::Station,
        ShaderKind::Outline,
        ShaderKind::Trees,
        ShaderKind::Skybox,
    ];
}

/// Position of a pass within the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    Clear,
    LightUpdate,
    Outline,
    Opaque,
    Translucent,
    StencilMasked,
    Skybox,
    Overlay,
}

impl PassKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::LightUpdate => "light_update",
            Self::Outline => "outline",
            Self::Opaque => "opaque",
            Self::Translucent => "translucent",
            Self::StencilMasked => "stencil_masked",
            Self::Skybox => "skybox",
            Self::Overlay => "overlay",
        }
    }
}

/// Light and material parameters a lit program keeps until the next upload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderParams {
    pub light: PointLight,
    pub view_position: Vec3,
    pub shininess: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub mesh: MeshId,
    pub shader: ShaderKind,
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub outlining: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderCommand {
    /// Clear colour (alpha 1), depth to 1.0 and stencil to 0.
    Clear { color: Vec3 },
    SetState(StateChange),
    Upload { shader: ShaderKind, params: ShaderParams },
    Draw(DrawCall),
    /// Hand the frame to the overlay renderer.
    Overlay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PassDescriptor {
    pub kind: PassKind,
    pub commands: Vec<RenderCommand>,
}

impl PassDescriptor {
    pub fn new(kind: PassKind) -> Self {
        Self {
            kind,
            commands: Vec::new(),
        }
    }

    pub fn with(mut self, command: RenderCommand) -> Self {
        self.commands.push(command);
        self
    }

    pub fn state(self, change: StateChange) -> Self {
        self.with(RenderCommand::SetState(change))
    }

    pub fn draw(self, draw: DrawCall) -> Self {
        self.with(RenderCommand::Draw(draw))
    }
}

/// Light block as laid out in the shaders' uniform buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LightBlock {
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// constant, linear, quadratic, unused
    pub attenuation: [f32; 4],
}

impl From<&PointLight> for LightBlock {
    fn from(light: &PointLight) -> Self {
        Self {
            position: light.position.extend(1.0).to_array(),
            ambient: light.ambient.extend(0.0).to_array(),
            diffuse: light.diffuse.extend(0.0).to_array(),
            specular: light.specular.extend(0.0).to_array(),
            attenuation: [light.constant, light.linear, light.quadratic, 0.0],
        }
    }
}

/// Per-draw uniform block shared by every program.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub light: LightBlock,
    pub view_position: [f32; 4],
    /// shininess, outlining, unused, unused
    pub material: [f32; 4],
}

impl DrawUniforms {
    pub fn new(draw: &DrawCall, params: Option<&ShaderParams>) -> Self {
        let (light, view_position, shininess) = match params {
            Some(p) => (LightBlock::from(&p.light), p.view_position, p.shininess),
            None => (LightBlock::zeroed(), Vec3::ZERO, 0.0),
        };
        Self {
            model: draw.model.to_cols_array_2d(),
            view: draw.view.to_cols_array_2d(),
            projection: draw.projection.to_cols_array_2d(),
            light,
            view_position: view_position.extend(1.0).to_array(),
            material: [shininess, if draw.outlining { 1.0 } else { 0.0 }, 0.0, 0.0],
        }
    }
}

/// A draw together with the state and uniforms it executes under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedDraw {
    pub pass: PassKind,
    pub draw: DrawCall,
    pub state: GpuState,
    pub uniforms: DrawUniforms,
}

/// A plan flattened into what a backend needs: clear colour, draws, overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFrame {
    pub clear_color: Option<Vec3>,
    pub draws: Vec<ResolvedDraw>,
    pub overlay: bool,
}

/// GPU state around one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassTrace {
    pub kind: PassKind,
    pub before: GpuState,
    pub after: GpuState,
}

/// One frame's ordered passes, starting from `initial` state.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    /// Elapsed seconds the plan was built for.
    pub time: f32,
    pub initial: GpuState,
    pub passes: Vec<PassDescriptor>,
}

impl FramePlan {
    pub fn pass(&self, kind: PassKind) -> Option<&PassDescriptor> {
        self.passes.iter().find(|p| p.kind == kind)
    }

    pub fn pass_kinds(&self) -> Vec<PassKind> {
        self.passes.iter().map(|p| p.kind).collect()
    }

    pub fn wants_overlay(&self) -> bool {
        self.passes
            .iter()
            .flat_map(|p| &p.commands)
            .any(|c| matches!(c, RenderCommand::Overlay))
    }

    /// Walk every pass and record the GPU state before and after it.
    pub fn replay(&self) -> Vec<PassTrace> {
        let mut state = self.initial;
        self.passes
            .iter()
            .map(|pass| {
                let before = state;
                for command in &pass.commands {
                    if let RenderCommand::SetState(change) = command {
                        state.apply(*change);
                    }
                }
                PassTrace {
                    kind: pass.kind,
                    before,
                    after: state,
                }
            })
            .collect()
    }

    /// Flatten the plan. `params` holds what each program kept from earlier
    /// frames and is updated by this frame's uploads.
    pub fn resolve(&self, params: &mut HashMap<ShaderKind, ShaderParams>) -> ResolvedFrame {
        let mut state = self.initial;
        let mut frame = ResolvedFrame {
            clear_color: None,
            draws: Vec::new(),
            overlay: false,
        };

        for pass in &self.passes {
            for command in &pass.commands {
                match command {
                    RenderCommand::Clear { color } => frame.clear_color = Some(*color),
                    RenderCommand::SetState(change) => state.apply(*change),
                    RenderCommand::Upload { shader, params: p } => {
                        params.insert(*shader, *p);
                    }
                    RenderCommand::Draw(draw) => frame.draws.push(ResolvedDraw {
                        pass: pass.kind,
                        draw: *draw,
                        state,
                        uniforms: DrawUniforms::new(draw, params.get(&draw.shader)),
                    }),
                    RenderCommand::Overlay => frame.overlay = true,
                }
            }
        }
        frame
    }
}
