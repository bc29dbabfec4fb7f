//! Rendering adapter: renderer-agnostic frame sequencing.
//!
//! # Invariants
//! - Pass order is fixed: clear, light update, outline, opaque, translucent,
//!   stencil-masked, skybox, then overlay when the UI is enabled.
//! - Later passes rely on depth/stencil state left by earlier ones; every
//!   transition is an explicit `StateChange` in the plan.
//! - Renderers consume a `FramePlan`; only the sequencer touches `ProgramState`.

pub mod plan;
mod renderer;
pub mod sequencer;
pub mod state;

pub use plan::{
    DrawCall, DrawUniforms, FramePlan, LightBlock, MeshId, PassDescriptor, PassKind, PassTrace,
    RenderCommand, ResolvedDraw, ResolvedFrame, ShaderKind, ShaderParams,
};
pub use renderer::{DebugTextRenderer, Renderer};
pub use sequencer::{FrameSequencer, Viewport};
pub use state::{
    BlendFactor, CompareFunc, CullFace, GpuState, StateChange, StencilFunc, StencilOp, StencilOps,
};

pub fn crate_info() -> &'static str {
    "hangar-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
