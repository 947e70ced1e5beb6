/// Camera — perspective camera state.
///
/// Two writers share a camera without overlapping:
/// - the `CameraController` moves `position` / `target` / `up`
/// - the viewport manager sets `aspect` and rebuilds the projection
///
/// Everything else reads it.

use glam::{Mat4, Vec3};
use crate::config::CameraConfig;

/// Right-handed perspective camera looking from `position` at `target`.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    target: Vec3,
    up: Vec3,
    fov_y_degrees: f32,
    near: f32,
    far: f32,
    aspect: f32,
    projection_matrix: Mat4,
}

impl Camera {
    /// Create a camera with aspect 1.0 and its projection already derived.
    pub fn new(position: Vec3, target: Vec3, up: Vec3, fov_y_degrees: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position,
            target,
            up,
            fov_y_degrees,
            near,
            far,
            aspect: 1.0,
            projection_matrix: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(
            config.position,
            config.target,
            config.up,
            config.fov_y_degrees,
            config.near,
            config.far,
        )
    }

    // ===== GETTERS =====

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Vertical field of view in degrees.
    pub fn fov_y_degrees(&self) -> f32 {
        self.fov_y_degrees
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Projection matrix as of the last `update_projection_matrix()`.
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// View matrix derived from position, target and up.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix()
    }

    /// Distance from the camera to its target.
    pub fn distance_to_target(&self) -> f32 {
        (self.position - self.target).length()
    }

    // ===== SETTERS =====

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn set_up(&mut self, up: Vec3) {
        self.up = up;
    }

    /// Store the aspect ratio. The projection is NOT rebuilt.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Rebuild the projection matrix from fov, aspect, near and far.
    pub fn update_projection_matrix(&mut self) {
        self.projection_matrix = Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
