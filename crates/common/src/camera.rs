use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Default yaw in degrees. Points the camera down -Z.
pub const YAW: f32 = -90.0;
pub const PITCH: f32 = 0.0;
pub const SPEED: f32 = 2.5;
pub const SENSITIVITY: f32 = 0.1;
pub const ZOOM: f32 = 45.0;

/// Pitch limit in degrees; keeps the look-at basis from flipping.
pub const PITCH_LIMIT: f32 = 89.0;
pub const ZOOM_MIN: f32 = 1.0;
pub const ZOOM_MAX: f32 = 45.0;

/// Keyboard movement directions relative to the camera basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
}

/// First-person camera with yaw/pitch in degrees and zoom as vertical field of view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    pub speed: f32,
    pub sensitivity: f32,
    zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        let mut cam = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: YAW,
            pitch: PITCH,
            speed: SPEED,
            sensitivity: SENSITIVITY,
            zoom: ZOOM,
        };
        cam.update_vectors();
        cam
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Translate along the front/right vectors by `speed * dt`.
    pub fn process_keyboard(&mut self, direction: Movement, dt: f32) {
        let velocity = self.speed * dt;
        match direction {
            Movement::Forward => self.position += self.front * velocity,
            Movement::Backward => self.position -= self.front * velocity,
            Movement::Left => self.position -= self.right * velocity,
            Movement::Right => self.position += self.right * velocity,
        }
    }

    /// Rotate by a cursor delta in pixels. `dy` must already be inverted
    /// (positive means look up).
    pub fn process_mouse_movement(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch += dy * self.sensitivity;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Narrow (positive `dy`) or widen the field of view.
    pub fn process_mouse_scroll(&mut self, dy: f32) {
        self.zoom = (self.zoom - dy).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// Restore a saved viewing direction.
    ///
    /// Yaw and pitch are derived from the normalized direction, pitch is
    /// clamped, and the basis is rebuilt from the angles. A zero or
    /// non-finite front is ignored.
    pub fn set_front(&mut self, front: Vec3) {
        let Some(dir) = front.try_normalize() else {
            return;
        };
        self.pitch = dir.y.clamp(-1.0, 1.0).asin().to_degrees().clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.yaw = dir.z.atan2(dir.x).to_degrees();
        self.update_vectors();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn default_camera_looks_down_negative_z() {
        let cam = Camera::new(Vec3::new(0.0, 0.0, 3.0));
        assert!((cam.front() - Vec3::NEG_Z).length() < EPS);
        assert_eq!(cam.zoom(), 45.0);
        let view = cam.view_matrix();
        assert!(!view.col(0).x.is_nan());
    }

    #[test]
    fn forward_one_second_moves_by_speed() {
        let mut cam = Camera::new(Vec3::ZERO);
        cam.process_keyboard(Movement::Forward, 1.0);
        assert!((cam.position - Vec3::new(0.0, 0.0, -2.5)).length() < EPS);
    }

    #[test]
    fn zero_dt_is_noop() {
        let mut cam = Camera::new(Vec3::new(1.0, 2.0, 3.0));
        for dir in [
            Movement::Forward,
            Movement::Backward,
            Movement::Left,
            Movement::Right,
        ] {
            cam.process_keyboard(dir, 0.0);
        }
        assert_eq!(cam.position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn strafe_uses_right_vector() {
        let mut cam = Camera::new(Vec3::ZERO);
        cam.process_keyboard(Movement::Right, 2.0);
        assert!((cam.position - Vec3::new(5.0, 0.0, 0.0)).length() < EPS);
        cam.process_keyboard(Movement::Left, 2.0);
        assert!(cam.position.length() < EPS);
    }

    #[test]
    fn horizontal_look_changes_yaw_only() {
        let mut cam = Camera::new(Vec3::ZERO);
        let before = cam.front();
        cam.process_mouse_movement(10.0, 0.0);
        assert!((cam.yaw() - (YAW + 1.0)).abs() < EPS);
        assert_eq!(cam.pitch(), 0.0);
        assert!((cam.front().y - before.y).abs() < EPS);
        assert!((cam.front().x - before.x).abs() > 1e-3);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = Camera::new(Vec3::ZERO);
        cam.process_mouse_movement(0.0, 10_000.0);
        assert_eq!(cam.pitch(), PITCH_LIMIT);
        cam.process_mouse_movement(0.0, -50_000.0);
        assert_eq!(cam.pitch(), -PITCH_LIMIT);
    }

    #[test]
    fn basis_stays_orthonormal_under_look() {
        let mut cam = Camera::new(Vec3::ZERO);
        let deltas = [
            (13.0, 7.0),
            (-400.0, 120.0),
            (3600.0, -900.0),
            (0.5, 2000.0),
            (-77.0, -3.0),
        ];
        for (dx, dy) in deltas {
            cam.process_mouse_movement(dx, dy);
            assert!((cam.front().length() - 1.0).abs() < EPS);
            assert!((cam.right().length() - 1.0).abs() < EPS);
            assert!((cam.up().length() - 1.0).abs() < EPS);
            assert!(cam.front().dot(cam.right()).abs() < EPS);
            assert!(cam.front().dot(cam.up()).abs() < EPS);
            assert!(cam.right().dot(cam.up()).abs() < EPS);
        }
    }

    #[test]
    fn scroll_is_clamped() {
        let mut cam = Camera::new(Vec3::ZERO);
        for _ in 0..100 {
            cam.process_mouse_scroll(1.0);
        }
        assert_eq!(cam.zoom(), ZOOM_MIN);
        for _ in 0..100 {
            cam.process_mouse_scroll(-1.0);
        }
        assert_eq!(cam.zoom(), ZOOM_MAX);
    }

    #[test]
    fn scroll_is_monotonic() {
        let mut cam = Camera::new(Vec3::ZERO);
        let mut last = cam.zoom();
        for _ in 0..60 {
            cam.process_mouse_scroll(0.75);
            assert!(cam.zoom() <= last);
            last = cam.zoom();
        }
    }

    #[test]
    fn set_front_keeps_direction_and_syncs_angles() {
        let mut cam = Camera::new(Vec3::ZERO);
        let front = Vec3::new(1.0, 0.0, 0.0);
        cam.set_front(front);
        assert!((cam.front() - front).length() < EPS);
        assert!(cam.yaw().abs() < EPS);
        assert!((cam.right() - Vec3::Z).length() < EPS);

        // Next look continues from the restored yaw, not the default one.
        cam.process_mouse_movement(0.0, 0.0);
        assert!((cam.front() - front).length() < EPS);
    }

    #[test]
    fn set_front_ignores_zero_vector() {
        let mut cam = Camera::new(Vec3::ZERO);
        let before = cam;
        cam.set_front(Vec3::ZERO);
        assert_eq!(cam, before);
    }

    #[test]
    fn set_front_normalizes_loaded_vector() {
        let mut cam = Camera::new(Vec3::ZERO);
        cam.set_front(Vec3::new(0.0, 0.0, -5.0));
        assert!((cam.front() - Vec3::NEG_Z).length() < EPS);
        assert!((cam.front().length() - 1.0).abs() < EPS);

        cam.process_keyboard(Movement::Forward, 1.0);
        assert!((cam.position.length() - cam.speed).abs() < EPS);
    }

    #[test]
    fn set_front_clamps_steep_direction() {
        let mut cam = Camera::new(Vec3::ZERO);
        cam.set_front(Vec3::new(0.0, 0.99999, 0.0045));
        assert_eq!(cam.pitch(), PITCH_LIMIT);
        assert!((cam.front().y - PITCH_LIMIT.to_radians().sin()).abs() < EPS);

        // A still mouse leaves the restored direction where it is.
        let restored = cam.front();
        cam.process_mouse_movement(0.0, 0.0);
        assert!((cam.front() - restored).length() < EPS);

        let (f, r, u) = (cam.front(), cam.right(), cam.up());
        assert!(f.dot(r).abs() < EPS);
        assert!(f.dot(u).abs() < EPS);
        assert!(r.dot(u).abs() < EPS);
        assert!((r.length() - 1.0).abs() < EPS);
    }
}
