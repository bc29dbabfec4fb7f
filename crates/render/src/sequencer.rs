use crate::plan::{
    DrawCall, FramePlan, MeshId, PassDescriptor, PassKind, RenderCommand, ShaderKind,
    ShaderParams,
};
use crate::state::{CompareFunc, GpuState, StateChange, StencilFunc};
use glam::Mat4;
use hangar_scene::{ProgramState, orbit};

pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 100_000.0;
pub const SKY_FOV_DEGREES: f32 = 45.0;
pub const SKY_FAR: f32 = 1000.0;

pub const TERRAIN_SHININESS: f32 = 32.0;
pub const STATION_SHININESS: f32 = 12.0;
pub const TREE_SHININESS: f32 = 32.0;

/// Window size the projections are built for. It stays fixed when the
/// framebuffer is resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Camera matrices shared by every pass of one frame.
#[derive(Debug, Clone, Copy)]
struct Camera {
    view: Mat4,
    projection: Mat4,
}

/// Builds the ordered pass list for each frame.
#[derive(Debug, Clone)]
pub struct FrameSequencer {
    viewport: Viewport,
}

impl FrameSequencer {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn projection(&self, state: &ProgramState) -> Mat4 {
        Mat4::perspective_rh(
            state.camera.zoom().to_radians(),
            self.viewport.aspect(),
            NEAR,
            FAR,
        )
    }

    pub fn sky_projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            SKY_FOV_DEGREES.to_radians(),
            self.viewport.aspect(),
            NEAR,
            SKY_FAR,
        )
    }

    /// Plan the frame at elapsed time `t`. Moves the point light along its
    /// orbit as a side effect.
    pub fn plan(&self, state: &mut ProgramState, t: f32) -> FramePlan {
        state.update_light(t);
        let camera = Camera {
            view: state.camera.view_matrix(),
            projection: self.projection(state),
        };

        let mut passes = vec![
            clear_pass(state),
            light_pass(state),
            outline_pass(state, &camera, t),
            opaque_pass(state, &camera, t),
            translucent_pass(state, &camera),
            stencil_masked_pass(state, &camera),
            self.skybox_pass(&camera),
        ];
        if state.ui_enabled {
            passes.push(PassDescriptor::new(PassKind::Overlay).with(RenderCommand::Overlay));
        }

        tracing::trace!(t, passes = passes.len(), "frame planned");
        FramePlan {
            time: t,
            initial: GpuState::scene(),
            passes,
        }
    }

    fn skybox_pass(&self, camera: &Camera) -> PassDescriptor {
        PassDescriptor::new(PassKind::Skybox)
            .state(StateChange::DepthFunc(CompareFunc::LessEqual))
            .draw(DrawCall {
                mesh: MeshId::Skybox,
                shader: ShaderKind::Skybox,
                model: Mat4::IDENTITY,
                view: orbit::rotation_only(camera.view),
                projection: self.sky_projection(),
                outlining: false,
            })
            .state(StateChange::DepthFunc(CompareFunc::Less))
    }
}

fn lit(state: &ProgramState, shininess: f32) -> ShaderParams {
    ShaderParams {
        light: state.point_light,
        view_position: state.camera.position,
        shininess,
    }
}

fn draw(mesh: MeshId, shader: ShaderKind, model: Mat4, camera: &Camera) -> DrawCall {
    DrawCall {
        mesh,
        shader,
        model,
        view: camera.view,
        projection: camera.projection,
        outlining: false,
    }
}

fn clear_pass(state: &ProgramState) -> PassDescriptor {
    PassDescriptor::new(PassKind::Clear).with(RenderCommand::Clear {
        color: state.clear_color,
    })
}

fn light_pass(state: &ProgramState) -> PassDescriptor {
    PassDescriptor::new(PassKind::LightUpdate)
        .with(RenderCommand::Upload {
            shader: ShaderKind::Terrain,
            params: lit(state, TERRAIN_SHININESS),
        })
        .with(RenderCommand::Upload {
            shader: ShaderKind::Station,
            params: lit(state, STATION_SHININESS),
        })
}

fn freighter(state: &ProgramState, t: f32) -> Mat4 {
    orbit::freighter_model(t, state.object_position, state.object_scale)
}

fn outline_pass(state: &ProgramState, camera: &Camera, t: f32) -> PassDescriptor {
    let mut silhouette = draw(MeshId::Freighter, ShaderKind::Outline, freighter(state, t), camera);
    silhouette.outlining = true;
    PassDescriptor::new(PassKind::Outline)
        .state(StateChange::StencilFunc(StencilFunc::new(CompareFunc::Always, 1, 0xFF)))
        .state(StateChange::StencilMask(0xFF))
        .draw(silhouette)
}

fn opaque_pass(state: &ProgramState, camera: &Camera, t: f32) -> PassDescriptor {
    let terrain = orbit::terrain_model(state.object_position, state.object_scale);
    PassDescriptor::new(PassKind::Opaque)
        .draw(draw(MeshId::Terrain, ShaderKind::Terrain, terrain, camera))
        .draw(draw(MeshId::Freighter, ShaderKind::Terrain, freighter(state, t), camera))
}

fn translucent_pass(state: &ProgramState, camera: &Camera) -> PassDescriptor {
    PassDescriptor::new(PassKind::Translucent)
        .state(StateChange::Blend(true))
        .with(RenderCommand::Upload {
            shader: ShaderKind::Trees,
            params: lit(state, TREE_SHININESS),
        })
        .draw(draw(
            MeshId::Trees,
            ShaderKind::Trees,
            orbit::tree_model(state.object_scale),
            camera,
        ))
        .state(StateChange::Blend(false))
}

/// The masking state is set and immediately restored before the station is
/// drawn; the station itself draws under the default stencil/depth state.
fn stencil_masked_pass(state: &ProgramState, camera: &Camera) -> PassDescriptor {
    PassDescriptor::new(PassKind::StencilMasked)
        .state(StateChange::StencilFunc(StencilFunc::new(CompareFunc::NotEqual, 1, 0xFF)))
        .state(StateChange::StencilMask(0x00))
        .state(StateChange::DepthTest(false))
        .state(StateChange::StencilMask(0xFF))
        .state(StateChange::StencilFunc(StencilFunc::new(CompareFunc::Always, 0, 0xFF)))
        .state(StateChange::DepthTest(true))
        .draw(draw(
            MeshId::Station,
            ShaderKind::Station,
            orbit::station_model(state.object_position, state.object_scale),
            camera,
        ))
}
