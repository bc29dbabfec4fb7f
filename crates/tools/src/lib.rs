//! Developer tooling: scene/camera inspector and the egui debug overlay.
//!
//! # Invariants
//! - The inspector never mutates program state.
//! - The overlay only edits fields a user can see in its windows.

mod inspector;
mod overlay;

pub use inspector::{CameraInfo, SceneInspector, SceneSummary};
pub use overlay::{
    ATTENUATION_RANGE, ATTENUATION_SPEED, DebugOverlay, OBJECT_SCALE_RANGE, OBJECT_SCALE_SPEED,
};

pub fn crate_info() -> &'static str {
    "hangar-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
