use crate::inspector::SceneInspector;
use hangar_scene::ProgramState;
use std::ops::RangeInclusive;

pub const OBJECT_SCALE_RANGE: RangeInclusive<f32> = 0.1..=1000.0;
pub const OBJECT_SCALE_SPEED: f64 = 0.55;
pub const ATTENUATION_RANGE: RangeInclusive<f32> = 0.0..=1.0;
pub const ATTENUATION_SPEED: f64 = 0.05;

/// The F1 debug overlay: a scene editor and a camera info window.
#[derive(Debug, Default)]
pub struct DebugOverlay;

impl DebugOverlay {
    pub fn new() -> Self {
        Self
    }

    /// Lay out both windows for this frame, editing `state` in place.
    pub fn show(&mut self, ctx: &egui::Context, state: &mut ProgramState) {
        self.scene_window(ctx, state);
        self.camera_window(ctx, state);
    }

    fn scene_window(&mut self, ctx: &egui::Context, state: &mut ProgramState) {
        egui::Window::new("Scene")
            .default_pos([10.0, 10.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Clear colour");
                    let mut rgb = state.clear_color.to_array();
                    if ui.color_edit_button_rgb(&mut rgb).changed() {
                        state.clear_color = glam::Vec3::from_array(rgb);
                    }
                });

                ui.horizontal(|ui| {
                    ui.label("Object position");
                    ui.add(egui::DragValue::new(&mut state.object_position.x).prefix("x "));
                    ui.add(egui::DragValue::new(&mut state.object_position.y).prefix("y "));
                    ui.add(egui::DragValue::new(&mut state.object_position.z).prefix("z "));
                });

                ui.horizontal(|ui| {
                    ui.label("Object scale");
                    ui.add(
                        egui::DragValue::new(&mut state.object_scale)
                            .range(OBJECT_SCALE_RANGE)
                            .speed(OBJECT_SCALE_SPEED),
                    );
                });

                ui.separator();
                ui.label("Light attenuation");
                let light = &mut state.point_light;
                for (name, value) in [
                    ("constant", &mut light.constant),
                    ("linear", &mut light.linear),
                    ("quadratic", &mut light.quadratic),
                ] {
                    ui.horizontal(|ui| {
                        ui.label(name);
                        ui.add(
                            egui::DragValue::new(value)
                                .range(ATTENUATION_RANGE)
                                .speed(ATTENUATION_SPEED),
                        );
                    });
                }
            });
    }

    fn camera_window(&mut self, ctx: &egui::Context, state: &mut ProgramState) {
        let info = SceneInspector::camera(state);
        egui::Window::new("Camera info")
            .default_pos([10.0, 260.0])
            .show(ctx, |ui| {
                let [x, y, z] = info.position;
                ui.label(format!("Position: ({x:.2}, {y:.2}, {z:.2})"));
                ui.label(format!("Yaw: {:.1}  Pitch: {:.1}", info.yaw, info.pitch));
                let [fx, fy, fz] = info.front;
                ui.label(format!("Front: ({fx:.3}, {fy:.3}, {fz:.3})"));
                ui.checkbox(
                    &mut state.camera_mouse_update_enabled,
                    "Camera mouse update",
                );
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_frame(overlay: &mut DebugOverlay, state: &mut ProgramState) {
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| overlay.show(ctx, state));
    }

    #[test]
    fn showing_without_input_leaves_state_alone() {
        let mut overlay = DebugOverlay::new();
        let mut state = ProgramState::default();
        let before = state.clone();
        run_frame(&mut overlay, &mut state);
        run_frame(&mut overlay, &mut state);
        assert_eq!(state, before);
    }

    fn screen_input(events: Vec<egui::Event>) -> egui::RawInput {
        egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(1280.0, 720.0),
            )),
            events,
            ..Default::default()
        }
    }

    fn find_text(shape: &egui::Shape, text: &str) -> Option<egui::Rect> {
        match shape {
            egui::Shape::Text(t) if t.galley.text() == text => {
                Some(t.galley.rect.translate(t.pos.to_vec2()))
            }
            egui::Shape::Vec(shapes) => shapes.iter().find_map(|s| find_text(s, text)),
            _ => None,
        }
    }

    #[test]
    fn out_of_range_values_are_clamped_by_the_widgets() {
        let ctx = egui::Context::default();
        let mut overlay = DebugOverlay::new();
        let mut state = ProgramState::default();
        state.object_scale = 5000.0;
        state.point_light.linear = -0.5;
        for _ in 0..2 {
            let _ = ctx.run(screen_input(Vec::new()), |ctx| overlay.show(ctx, &mut state));
        }
        assert_eq!(state.object_scale, *OBJECT_SCALE_RANGE.end());
        assert_eq!(state.point_light.linear, 0.0);
    }

    #[test]
    fn clicking_mouse_update_checkbox_toggles_flag() {
        let ctx = egui::Context::default();
        let mut overlay = DebugOverlay::new();
        let mut state = ProgramState::default();
        assert!(state.camera_mouse_update_enabled);

        let mut label = None;
        for _ in 0..3 {
            let output = ctx.run(screen_input(Vec::new()), |ctx| overlay.show(ctx, &mut state));
            label = output
                .shapes
                .iter()
                .find_map(|clipped| find_text(&clipped.shape, "Camera mouse update"));
        }
        let pos = label.expect("checkbox label painted").center();

        let press = vec![
            egui::Event::PointerMoved(pos),
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed: true,
                modifiers: egui::Modifiers::NONE,
            },
        ];
        let release = vec![egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed: false,
            modifiers: egui::Modifiers::NONE,
        }];
        let _ = ctx.run(screen_input(press), |ctx| overlay.show(ctx, &mut state));
        let _ = ctx.run(screen_input(release), |ctx| overlay.show(ctx, &mut state));
        let _ = ctx.run(screen_input(Vec::new()), |ctx| overlay.show(ctx, &mut state));

        assert!(!state.camera_mouse_update_enabled);
        assert_eq!(state.object_scale, ProgramState::default().object_scale);
    }

    #[test]
    fn edit_ranges() {
        assert_eq!(*OBJECT_SCALE_RANGE.start(), 0.1);
        assert_eq!(*OBJECT_SCALE_RANGE.end(), 1000.0);
        assert!(ATTENUATION_RANGE.contains(&0.505));
        assert!(ATTENUATION_RANGE.contains(&0.575));
    }
}
