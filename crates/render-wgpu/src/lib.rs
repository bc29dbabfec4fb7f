//! wgpu backend for hangar frame plans.
//!
//! Loads the scene's OBJ models, material textures and skybox cubemap, then
//! executes each `FramePlan` produced by the sequencer.
//!
//! # Invariants
//! - Draws are issued in plan order within a single render pass.
//! - Each draw runs under the pipeline baked for its resolved `GpuState`;
//!   only the stencil reference is set dynamically.
//! - A missing model aborts construction; a missing texture only degrades.

mod assets;
mod gpu;
mod mesh;
mod pipeline;
mod shaders;
mod texture;

pub use assets::{AssetError, SceneAssets};
pub use gpu::{MAX_DRAWS, UNIFORM_SLOT, WgpuRenderer};
pub use pipeline::DEPTH_FORMAT;
