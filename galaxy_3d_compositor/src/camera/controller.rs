//! Camera controllers.
//!
//! A controller is the only writer of the camera's position, target and up
//! vector. The frame driver calls `advance()` once per tick, before the
//! viewport and content updates.

use glam::{Quat, Vec3};
use crate::config::ControlsConfig;
use super::Camera;

const EPS: f32 = 0.000_001;

/// Per-tick camera motion.
pub trait CameraController {
    /// Apply pending motion to the camera. Returns true if the camera moved.
    fn advance(&mut self, camera: &mut Camera) -> bool;
}

/// Spherical coordinates around the +Y axis (radius, polar phi, azimuth theta).
#[derive(Debug, Clone, Copy, Default)]
struct Spherical {
    radius: f32,
    phi: f32,
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

/// Map-style orbit controller.
///
/// Orbits the camera around its target with `up` as the pole axis. Input
/// hooks (`rotate_left`, `rotate_up`, `dolly_in`, `dolly_out`, `pan`)
/// accumulate motion; `advance()` applies it, optionally damped, together
/// with auto-rotation, then clamps polar angle and distance.
#[derive(Debug, Clone)]
pub struct OrbitController {
    config: ControlsConfig,
    enabled: bool,
    spherical_delta: Spherical,
    scale: f32,
    pan_offset: Vec3,
    last_position: Option<Vec3>,
}

impl OrbitController {
    pub fn new(config: ControlsConfig) -> Self {
        Self {
            config,
            enabled: true,
            spherical_delta: Spherical::default(),
            scale: 1.0,
            pan_offset: Vec3::ZERO,
            last_position: None,
        }
    }

    pub fn config(&self) -> &ControlsConfig {
        &self.config
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_auto_rotate(&mut self, auto_rotate: bool) {
        self.config.auto_rotate = auto_rotate;
    }

    /// Angle added per tick by auto-rotation (one turn per 60 / speed seconds at 60 Hz).
    pub fn auto_rotation_angle(&self) -> f32 {
        std::f32::consts::TAU / 60.0 / 60.0 * self.config.auto_rotate_speed
    }

    /// Multiplicative distance step for one dolly notch.
    pub fn zoom_scale(&self) -> f32 {
        0.95f32.powf(self.config.zoom_speed)
    }

    // ===== INPUT HOOKS =====

    /// Orbit horizontally by `angle` radians.
    pub fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.theta -= angle;
    }

    /// Orbit vertically by `angle` radians.
    pub fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.phi -= angle;
    }

    /// Move one zoom step toward the target.
    pub fn dolly_in(&mut self) {
        self.scale *= self.zoom_scale();
    }

    /// Move one zoom step away from the target.
    pub fn dolly_out(&mut self) {
        self.scale /= self.zoom_scale();
    }

    /// Pan by a pointer delta in pixels over a viewport `viewport_height` pixels tall.
    pub fn pan(&mut self, camera: &Camera, delta_x: f32, delta_y: f32, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }

        // Half the visible height at the target distance
        let target_distance =
            camera.distance_to_target() * (camera.fov_y_degrees().to_radians() / 2.0).tan();
        let left = 2.0 * delta_x * target_distance / viewport_height * self.config.pan_speed;
        let up = 2.0 * delta_y * target_distance / viewport_height * self.config.pan_speed;

        let world = camera.view_matrix().inverse();
        let right_axis = world.x_axis.truncate();
        self.pan_offset += right_axis * -left;

        let up_axis = if self.config.screen_space_panning {
            world.y_axis.truncate()
        } else {
            camera.up().cross(right_axis)
        };
        self.pan_offset += up_axis * up;
    }
}

impl CameraController for OrbitController {
    fn advance(&mut self, camera: &mut Camera) -> bool {
        if !self.enabled {
            return false;
        }

        let up = camera.up().normalize_or_zero();
        if up == Vec3::ZERO {
            return false;
        }

        // Work in a frame where `up` is +Y
        let to_y_up = Quat::from_rotation_arc(up, Vec3::Y);
        let from_y_up = to_y_up.inverse();

        let mut target = camera.target();
        let offset = to_y_up * (camera.position() - target);
        let mut spherical = Spherical::from_offset(offset);

        if self.config.auto_rotate {
            self.rotate_left(self.auto_rotation_angle());
        }

        let damping = if self.config.enable_damping { self.config.damping_factor } else { 1.0 };

        spherical.theta += self.spherical_delta.theta * damping;
        spherical.phi += self.spherical_delta.phi * damping;

        spherical.phi = spherical
            .phi
            .clamp(self.config.min_polar_angle, self.config.max_polar_angle)
            .clamp(EPS, std::f32::consts::PI - EPS);

        spherical.radius = (spherical.radius * self.scale)
            .clamp(self.config.min_distance, self.config.max_distance);

        target += self.pan_offset * damping;

        let position = target + from_y_up * spherical.to_offset();
        camera.set_target(target);
        camera.set_position(position);

        if self.config.enable_damping {
            let decay = 1.0 - self.config.damping_factor;
            self.spherical_delta.theta *= decay;
            self.spherical_delta.phi *= decay;
            self.pan_offset *= decay;
        } else {
            self.spherical_delta = Spherical::default();
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        let moved = match self.last_position {
            Some(last) => last.distance_squared(position) > EPS,
            None => true,
        };
        self.last_position = Some(position);
        moved
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
