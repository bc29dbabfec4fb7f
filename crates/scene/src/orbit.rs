//! Closed-form transforms driven by elapsed time.
//!
//! Every function here is a pure `fn(t, ..) -> Mat4/Vec3`; the frame sequencer
//! calls them once per frame and nothing stores their results across frames.

use glam::{Mat3, Mat4, Vec3};

/// Point light orbit: an ellipse that dips below the ground twice per period.
pub fn light_position(t: f32) -> Vec3 {
    Vec3::new(300.0 * t.cos(), -t.cos().abs() * 200.0, 500.0 * t.sin())
}

/// Terrain placement: translate to the anchor, then uniform scale.
pub fn terrain_model(position: Vec3, scale: f32) -> Mat4 {
    Mat4::from_translation(position) * Mat4::from_scale(Vec3::splat(scale))
}

/// Freighter yaw wobble in radians: `sin t * 12 * cos t` degrees.
pub fn freighter_yaw(t: f32) -> f32 {
    (t.sin() * 12.0 * t.cos()).to_radians()
}

/// Freighter offset along its slow circular path, applied after the wobble.
pub fn freighter_offset(t: f32) -> Vec3 {
    Vec3::new((t / 4.0).cos() * 50.0, 10.0, (t / 4.0).sin() * 50.0)
}

pub fn freighter_model(t: f32, position: Vec3, scale: f32) -> Mat4 {
    terrain_model(position, scale)
        * Mat4::from_scale(Vec3::splat(scale / 100_000.0))
        * Mat4::from_rotation_y(freighter_yaw(t))
        * Mat4::from_translation(freighter_offset(t))
}

pub fn tree_model(scale: f32) -> Mat4 {
    Mat4::from_scale(Vec3::splat(scale / 100.0)) * Mat4::from_translation(Vec3::new(20.0, 0.0, 80.2))
}

pub fn station_model(position: Vec3, scale: f32) -> Mat4 {
    terrain_model(position, scale) * Mat4::from_scale(Vec3::splat(scale / 1_000_000.0))
}

/// View matrix with the translation stripped, for geometry at infinity.
pub fn rotation_only(view: Mat4) -> Mat4 {
    Mat4::from_mat3(Mat3::from_mat4(view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-3;

    #[test]
    fn light_orbit_samples() {
        assert_eq!(light_position(0.0), Vec3::new(300.0, -200.0, 0.0));
        let quarter = light_position(FRAC_PI_2);
        assert!(quarter.x.abs() < EPS);
        assert!(quarter.y.abs() < EPS);
        assert!((quarter.z - 500.0).abs() < EPS);
    }

    #[test]
    fn light_never_rises_above_ground() {
        for i in 0..200 {
            assert!(light_position(i as f32 * 0.1).y <= 0.0);
        }
    }

    #[test]
    fn freighter_wobble_is_zero_at_rest_points() {
        assert_eq!(freighter_yaw(0.0), 0.0);
        assert!(freighter_yaw(FRAC_PI_2).abs() < 1e-6);
        // sin*cos peaks at pi/4 with value 0.5 -> 6 degrees.
        let peak = freighter_yaw(std::f32::consts::FRAC_PI_4);
        assert!((peak - 6.0_f32.to_radians()).abs() < 1e-5);
    }

    #[test]
    fn freighter_origin_at_t0() {
        let m = freighter_model(0.0, Vec3::ZERO, 1000.0);
        // scale 1000 * 0.01 = 10, offset (50, 10, 0) -> (500, 100, 0)
        let origin = m.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(500.0, 100.0, 0.0)).length() < EPS);
    }

    #[test]
    fn terrain_model_translates_then_scales() {
        let m = terrain_model(Vec3::new(1.0, 2.0, 3.0), 2.0);
        let p = m.transform_point3(Vec3::ONE);
        assert_eq!(p, Vec3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn tree_and_station_scale() {
        let tree = tree_model(1000.0).transform_point3(Vec3::ZERO);
        assert!((tree - Vec3::new(200.0, 0.0, 802.0)).length() < EPS);

        let station = station_model(Vec3::ZERO, 1000.0).transform_vector3(Vec3::X);
        assert!((station.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn rotation_only_drops_translation() {
        let view = Mat4::look_at_rh(Vec3::new(5.0, 6.0, 7.0), Vec3::ZERO, Vec3::Y);
        let sky = rotation_only(view);
        assert_eq!(sky.transform_point3(Vec3::ZERO), Vec3::ZERO);
        assert_eq!(sky.w_axis, glam::Vec4::W);
    }
}
