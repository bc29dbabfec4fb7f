use glam::Vec3;
use hangar_scene::ProgramState;

/// Read-only views of the program state for debugging tools.
pub struct SceneInspector;

impl SceneInspector {
    pub fn summary(state: &ProgramState) -> SceneSummary {
        SceneSummary {
            clear_color: state.clear_color.to_array(),
            ui_enabled: state.ui_enabled,
            camera_mouse_update_enabled: state.camera_mouse_update_enabled,
            object_position: state.object_position.to_array(),
            object_scale: state.object_scale,
            attenuation: [
                state.point_light.constant,
                state.point_light.linear,
                state.point_light.quadratic,
            ],
        }
    }

    pub fn camera(state: &ProgramState) -> CameraInfo {
        let camera = &state.camera;
        CameraInfo {
            position: camera.position.to_array(),
            front: camera.front().to_array(),
            yaw: camera.yaw(),
            pitch: camera.pitch(),
            zoom: camera.zoom(),
        }
    }
}

/// Scene-level fields of the program state.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSummary {
    pub clear_color: [f32; 3],
    pub ui_enabled: bool,
    pub camera_mouse_update_enabled: bool,
    pub object_position: [f32; 3],
    pub object_scale: f32,
    /// constant, linear, quadratic
    pub attenuation: [f32; 3],
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [r, g, b] = self.clear_color;
        let [x, y, z] = self.object_position;
        let [c, l, q] = self.attenuation;
        write!(
            f,
            "Scene: clear=({r:.3}, {g:.3}, {b:.3}) ui={} mouse_look={} object=({x:.2}, {y:.2}, {z:.2}) scale={:.2} attenuation=({c}, {l}, {q})",
            self.ui_enabled, self.camera_mouse_update_enabled, self.object_scale,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraInfo {
    pub position: [f32; 3],
    pub front: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub zoom: f32,
}

impl CameraInfo {
    pub fn front_vec(&self) -> Vec3 {
        Vec3::from_array(self.front)
    }
}

impl std::fmt::Display for CameraInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [x, y, z] = self.position;
        let [fx, fy, fz] = self.front;
        write!(
            f,
            "Camera: pos=({x:.2}, {y:.2}, {z:.2}) front=({fx:.3}, {fy:.3}, {fz:.3}) yaw={:.1} pitch={:.1} zoom={:.1}",
            self.yaw, self.pitch, self.zoom,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_defaults() {
        let summary = SceneInspector::summary(&ProgramState::default());
        assert_eq!(summary.clear_color, [0.0, 0.0, 0.0]);
        assert!(!summary.ui_enabled);
        assert!(summary.camera_mouse_update_enabled);
        assert_eq!(summary.object_scale, 1000.0);
        assert_eq!(summary.attenuation[0], 0.505);
    }

    #[test]
    fn camera_info_of_defaults() {
        let info = SceneInspector::camera(&ProgramState::default());
        assert_eq!(info.position, [0.0, 0.0, 3.0]);
        assert_eq!(info.yaw, -90.0);
        assert_eq!(info.pitch, 0.0);
        assert_eq!(info.zoom, 45.0);
        assert!((info.front_vec() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn displays_are_readable() {
        let state = ProgramState::default();
        let scene = format!("{}", SceneInspector::summary(&state));
        assert!(scene.contains("ui=false"));
        assert!(scene.contains("scale=1000.00"));
        let camera = format!("{}", SceneInspector::camera(&state));
        assert!(camera.contains("pos=(0.00, 0.00, 3.00)"));
        assert!(camera.contains("yaw=-90.0"));
    }
}
