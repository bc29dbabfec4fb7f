use glam::Vec3;
use hangar_common::{Camera, PointLight};
use serde::{Deserialize, Serialize};

/// Where the camera starts when no saved state exists.
pub const DEFAULT_CAMERA_POSITION: Vec3 = Vec3::new(0.0, 0.0, 3.0);
pub const DEFAULT_OBJECT_SCALE: f32 = 1000.0;

/// Everything the viewer mutates across frames.
///
/// Input routing, the overlay and the frame sequencer all read and write this
/// record on the render thread, in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramState {
    /// RGB clear colour, each channel in [0, 1].
    pub clear_color: Vec3,
    pub ui_enabled: bool,
    pub camera: Camera,
    /// When false, cursor motion is absorbed instead of rotating the camera.
    pub camera_mouse_update_enabled: bool,
    /// Scene anchor: terrain, freighter and station are placed relative to it.
    pub object_position: Vec3,
    pub object_scale: f32,
    pub point_light: PointLight,
}

impl Default for ProgramState {
    fn default() -> Self {
        Self {
            clear_color: Vec3::ZERO,
            ui_enabled: false,
            camera: Camera::new(DEFAULT_CAMERA_POSITION),
            camera_mouse_update_enabled: true,
            object_position: Vec3::ZERO,
            object_scale: DEFAULT_OBJECT_SCALE,
            point_light: PointLight::default(),
        }
    }
}

impl ProgramState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the overlay. Enabling it also stops camera mouse-look; disabling it
    /// leaves mouse-look off until re-enabled from the overlay checkbox.
    ///
    /// Returns the new UI-enabled value.
    pub fn toggle_overlay(&mut self) -> bool {
        self.ui_enabled = !self.ui_enabled;
        if self.ui_enabled {
            self.camera_mouse_update_enabled = false;
        }
        tracing::debug!(ui_enabled = self.ui_enabled, "overlay toggled");
        self.ui_enabled
    }

    /// Recompute the light position for elapsed time `t` (seconds).
    pub fn update_light(&mut self, t: f32) {
        self.point_light.position = crate::orbit::light_position(t);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = ProgramState::new();
        assert_eq!(s.clear_color, Vec3::ZERO);
        assert!(!s.ui_enabled);
        assert!(s.camera_mouse_update_enabled);
        assert_eq!(s.camera.position, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(s.object_scale, 1000.0);
    }

    #[test]
    fn overlay_toggle_is_asymmetric() {
        let mut s = ProgramState::new();
        assert!(s.toggle_overlay());
        assert!(s.ui_enabled);
        assert!(!s.camera_mouse_update_enabled);

        assert!(!s.toggle_overlay());
        assert!(!s.ui_enabled);
        assert!(!s.camera_mouse_update_enabled);
    }

    #[test]
    fn update_light_follows_orbit() {
        let mut s = ProgramState::new();
        s.update_light(0.0);
        assert_eq!(s.point_light.position, Vec3::new(300.0, -200.0, 0.0));
    }
}
