//! Shared scene types for the hangar viewer.
//!
//! # Invariants
//! - Camera basis vectors are always derived from yaw/pitch (or a restored front) and stay orthonormal.
//! - Light position is a per-frame derived value, never an authored one.

mod camera;
mod light;

pub use camera::{Camera, Movement};
pub use light::PointLight;
