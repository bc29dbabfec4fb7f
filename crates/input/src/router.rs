use crate::action::{Action, HostRequest};
use hangar_scene::ProgramState;
use std::collections::HashSet;

/// Turns absolute cursor positions into deltas. The first sample only seeds
/// the baseline.
#[derive(Debug, Clone, Default)]
pub struct MouseTracker {
    last: Option<(f32, f32)>,
}

impl MouseTracker {
    /// Record a cursor position and return `(dx, dy)` with dy inverted so
    /// that moving the cursor up yields a positive value.
    pub fn sample(&mut self, x: f32, y: f32) -> (f32, f32) {
        let (last_x, last_y) = self.last.unwrap_or((x, y));
        self.last = Some((x, y));
        (x - last_x, last_y - y)
    }
}

/// Routes input to the program state for one window.
#[derive(Debug, Default)]
pub struct InputRouter {
    held: HashSet<Action>,
    mouse: MouseTracker,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// Record a key transition. Overlay toggling fires on the press edge only;
    /// repeats of an already-held key are ignored.
    pub fn key_event(
        &mut self,
        state: &mut ProgramState,
        action: Action,
        pressed: bool,
    ) -> Option<HostRequest> {
        if !pressed {
            self.held.remove(&action);
            return None;
        }
        let edge = self.held.insert(action);
        if edge && action == Action::ToggleOverlay {
            let request = if state.toggle_overlay() {
                HostRequest::ReleaseCursor
            } else {
                HostRequest::CaptureCursor
            };
            return Some(request);
        }
        None
    }

    /// Apply held keys for this frame.
    pub fn poll(&self, state: &mut ProgramState, dt: f32) -> Option<HostRequest> {
        for action in Action::MOVES {
            if let Action::Move(direction) = action {
                if self.held.contains(&action) {
                    state.camera.process_keyboard(direction, dt);
                }
            }
        }
        self.held.contains(&Action::Exit).then_some(HostRequest::Exit)
    }

    /// Cursor moved to `(x, y)` in window pixels.
    pub fn cursor_moved(&mut self, state: &mut ProgramState, x: f32, y: f32) {
        let (dx, dy) = self.mouse.sample(x, y);
        if state.camera_mouse_update_enabled {
            state.camera.process_mouse_movement(dx, dy);
        }
    }

    /// Raw pointer motion while the cursor is captured. `dy` is positive when
    /// looking up. Unlike cursor positions, raw motion is not bounded by the
    /// window edge.
    pub fn mouse_delta(&self, state: &mut ProgramState, dx: f32, dy: f32) {
        if state.camera_mouse_update_enabled {
            state.camera.process_mouse_movement(dx, dy);
        }
    }

    /// Advance the cursor baseline without rotating the camera.
    pub fn track_cursor(&mut self, x: f32, y: f32) {
        self.mouse.sample(x, y);
    }

    /// Vertical scroll in wheel ticks.
    pub fn scroll(&self, state: &mut ProgramState, dy: f32) {
        state.camera.process_mouse_scroll(dy);
    }

    /// Forget held keys, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use hangar_common::Movement;

    #[test]
    fn first_cursor_sample_seeds_baseline() {
        let mut tracker = MouseTracker::default();
        assert_eq!(tracker.sample(512.0, 384.0), (0.0, 0.0));
        assert_eq!(tracker.sample(522.0, 380.0), (10.0, 4.0));
    }

    #[test]
    fn cursor_rotates_camera_when_enabled() {
        let mut router = InputRouter::new();
        let mut state = ProgramState::default();
        router.cursor_moved(&mut state, 100.0, 100.0);
        let yaw = state.camera.yaw();
        router.cursor_moved(&mut state, 110.0, 100.0);
        assert!((state.camera.yaw() - (yaw + 1.0)).abs() < 1e-4);
    }

    #[test]
    fn cursor_absorbed_when_disabled() {
        let mut router = InputRouter::new();
        let mut state = ProgramState::default();
        state.camera_mouse_update_enabled = false;
        let before = state.camera;
        router.cursor_moved(&mut state, 0.0, 0.0);
        router.cursor_moved(&mut state, 300.0, -20.0);
        assert_eq!(state.camera, before);

        // Baseline kept moving, so re-enabling does not replay the jump.
        state.camera_mouse_update_enabled = true;
        router.cursor_moved(&mut state, 300.0, -20.0);
        assert_eq!(state.camera, before);
    }

    #[test]
    fn raw_motion_turns_past_window_width() {
        let mut router = InputRouter::new();
        let mut state = ProgramState::default();
        let yaw = state.camera.yaw();
        // Far more than a 1024 px window could report as cursor positions.
        for _ in 0..30 {
            router.mouse_delta(&mut state, 100.0, 0.0);
        }
        assert!((state.camera.yaw() - (yaw + 300.0)).abs() < 1e-2);
    }

    #[test]
    fn raw_motion_respects_mouse_update_flag() {
        let mut router = InputRouter::new();
        let mut state = ProgramState::default();
        state.camera_mouse_update_enabled = false;
        let before = state.camera;
        router.mouse_delta(&mut state, 50.0, 20.0);
        assert_eq!(state.camera, before);

        state.camera_mouse_update_enabled = true;
        router.mouse_delta(&mut state, 0.0, 10.0);
        assert!((state.camera.pitch() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn tracked_cursor_does_not_replay_skipped_motion() {
        let mut router = InputRouter::new();
        let mut state = ProgramState::default();
        router.cursor_moved(&mut state, 100.0, 100.0);
        // Positions seen while the cursor is busy elsewhere only move the baseline.
        router.track_cursor(400.0, 250.0);
        let before = state.camera;
        router.cursor_moved(&mut state, 400.0, 250.0);
        assert_eq!(state.camera, before);

        router.cursor_moved(&mut state, 410.0, 250.0);
        assert!((state.camera.yaw() - (before.yaw() + 1.0)).abs() < 1e-4);
    }

    #[test]
    fn scroll_reaches_camera_in_ui_mode() {
        let router = InputRouter::new();
        let mut state = ProgramState::default();
        state.ui_enabled = true;
        state.camera_mouse_update_enabled = false;
        router.scroll(&mut state, 5.0);
        assert_eq!(state.camera.zoom(), 40.0);
    }

    #[test]
    fn held_keys_move_each_poll() {
        let mut router = InputRouter::new();
        let mut state = ProgramState::default();
        state.camera.position = Vec3::ZERO;
        router.key_event(&mut state, Action::Move(Movement::Forward), true);
        assert_eq!(router.poll(&mut state, 1.0), None);
        assert!((state.camera.position - Vec3::new(0.0, 0.0, -2.5)).length() < 1e-4);

        router.key_event(&mut state, Action::Move(Movement::Forward), false);
        router.poll(&mut state, 1.0);
        assert!((state.camera.position - Vec3::new(0.0, 0.0, -2.5)).length() < 1e-4);
    }

    #[test]
    fn escape_requests_exit() {
        let mut router = InputRouter::new();
        let mut state = ProgramState::default();
        assert_eq!(router.key_event(&mut state, Action::Exit, true), None);
        assert_eq!(router.poll(&mut state, 0.016), Some(HostRequest::Exit));
    }

    #[test]
    fn overlay_toggle_scenario() {
        let mut router = InputRouter::new();
        let mut state = ProgramState::default();

        let req = router.key_event(&mut state, Action::ToggleOverlay, true);
        assert_eq!(req, Some(HostRequest::ReleaseCursor));
        assert!(state.ui_enabled);
        assert!(!state.camera_mouse_update_enabled);
        router.key_event(&mut state, Action::ToggleOverlay, false);

        let req = router.key_event(&mut state, Action::ToggleOverlay, true);
        assert_eq!(req, Some(HostRequest::CaptureCursor));
        assert!(!state.ui_enabled);
        assert!(!state.camera_mouse_update_enabled);
    }

    #[test]
    fn overlay_toggle_ignores_repeat() {
        let mut router = InputRouter::new();
        let mut state = ProgramState::default();
        router.key_event(&mut state, Action::ToggleOverlay, true);
        assert_eq!(router.key_event(&mut state, Action::ToggleOverlay, true), None);
        assert!(state.ui_enabled);
    }

    #[test]
    fn release_all_stops_movement() {
        let mut router = InputRouter::new();
        let mut state = ProgramState::default();
        router.key_event(&mut state, Action::Move(Movement::Left), true);
        router.release_all();
        let before = state.camera.position;
        router.poll(&mut state, 1.0);
        assert_eq!(state.camera.position, before);
    }
}
