use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Point light with distance attenuation `1 / (constant + linear*d + quadratic*d^2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    /// Recomputed every frame from elapsed time.
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            ambient: Vec3::splat(0.4),
            diffuse: Vec3::splat(2000.0),
            specular: Vec3::splat(50.0),
            constant: 0.505,
            linear: 0.575,
            quadratic: 0.000_000_3,
        }
    }
}

impl PointLight {
    /// Attenuation factor at `distance` from the light.
    pub fn attenuation(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}
